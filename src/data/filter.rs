use super::model::{ClaimRecord, ClaimsDataset};
use super::range::DateRange;
use super::table::PageSize;

// ---------------------------------------------------------------------------
// Filter predicate: date range plus optional status / diagnosis equality
// ---------------------------------------------------------------------------

/// Equality constraint on a categorical column. [`Selection::All`] is the
/// "inactive" sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    /// Label of the sentinel in option lists.
    pub const ALL_LABEL: &'static str = "All";

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Selection::All => Self::ALL_LABEL,
            Selection::Only(value) => value,
        }
    }
}

/// Everything the user has chosen in one interaction.
///
/// Only the date range, status and diagnosis narrow the record set; the
/// search term and paging apply to the table section alone.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub date_range: DateRange,
    pub status: Selection,
    pub diagnosis: Selection,
    pub search: String,
    pub page_size: PageSize,
    /// 1-based.
    pub page_number: usize,
}

impl FilterCriteria {
    pub fn new(date_range: DateRange) -> Self {
        FilterCriteria {
            date_range,
            status: Selection::All,
            diagnosis: Selection::All,
            search: String::new(),
            page_size: PageSize::default(),
            page_number: 1,
        }
    }

    pub fn with_status(mut self, status: Selection) -> Self {
        self.status = status;
        self
    }

    pub fn with_diagnosis(mut self, diagnosis: Selection) -> Self {
        self.diagnosis = diagnosis;
        self
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn with_page(mut self, page_size: PageSize, page_number: usize) -> Self {
        self.page_size = page_size;
        self.page_number = page_number;
        self
    }

    /// All three predicates are conjunctive.
    pub fn matches(&self, record: &ClaimRecord) -> bool {
        self.date_range.contains(record.accepted_date)
            && self.status.matches(&record.claimstatus)
            && self.diagnosis.matches(&record.diagnosis)
    }
}

// ---------------------------------------------------------------------------
// FilteredView – borrowed subset of the dataset
// ---------------------------------------------------------------------------

/// Records passing a [`FilterCriteria`], in dataset order. Borrows from the
/// dataset and never modifies it.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'a> {
    records: Vec<&'a ClaimRecord>,
}

impl<'a> FilteredView<'a> {
    pub fn apply(dataset: &'a ClaimsDataset, criteria: &FilterCriteria) -> Self {
        FilteredView {
            records: dataset
                .records()
                .iter()
                .filter(|r| criteria.matches(r))
                .collect(),
        }
    }

    /// Filter this subset again.
    pub fn refine(&self, criteria: &FilterCriteria) -> FilteredView<'a> {
        FilteredView {
            records: self
                .records
                .iter()
                .copied()
                .filter(|r| criteria.matches(r))
                .collect(),
        }
    }

    pub fn records(&self) -> &[&'a ClaimRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a ClaimRecord> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// One numeric column of the subset.
    pub fn column(&self, value: impl Fn(&ClaimRecord) -> f64) -> Vec<f64> {
        self.records.iter().map(|r| value(r)).collect()
    }
}
