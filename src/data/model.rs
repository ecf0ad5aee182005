use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};

use super::aggregate::{rank_by_frequency, CategoryCount, TOP_DIAGNOSES};

// ---------------------------------------------------------------------------
// MonthPeriod – the `month_year` bucket key
// ---------------------------------------------------------------------------

/// A calendar month, e.g. `2020-03`.
///
/// Ordering compares `(year, month)` numerically, so buckets sort
/// chronologically rather than by their text form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthPeriod {
    pub year: i32,
    pub month: u32,
}

impl MonthPeriod {
    pub fn of(date: NaiveDate) -> Self {
        MonthPeriod {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Months since year 0, used as a continuous plot axis.
    pub fn ordinal(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    /// Inverse of [`MonthPeriod::ordinal`].
    pub fn from_ordinal(ordinal: i64) -> Self {
        MonthPeriod {
            year: ordinal.div_euclid(12) as i32,
            month: ordinal.rem_euclid(12) as u32 + 1,
        }
    }
}

impl fmt::Display for MonthPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthPeriod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// ClaimRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single insurance claim plus the calendar attributes derived from
/// `accepted_date`. Field order is the export column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClaimRecord {
    pub member_id: String,
    pub diagnosis: String,
    pub claimstatus: String,
    pub accepted_date: NaiveDate,
    pub claimsubmitted: f64,
    pub claimpaid: f64,
    pub percentagepaid: f64,
    pub year: i32,
    pub month: u32,
    pub month_year: MonthPeriod,
}

impl ClaimRecord {
    /// Column names in display/export order.
    pub const COLUMNS: [&'static str; 10] = [
        "member_id",
        "diagnosis",
        "claimstatus",
        "accepted_date",
        "claimsubmitted",
        "claimpaid",
        "percentagepaid",
        "year",
        "month",
        "month_year",
    ];

    pub fn new(
        member_id: impl Into<String>,
        diagnosis: impl Into<String>,
        claimstatus: impl Into<String>,
        accepted_date: NaiveDate,
        claimsubmitted: f64,
        claimpaid: f64,
        percentagepaid: f64,
    ) -> Self {
        ClaimRecord {
            member_id: member_id.into(),
            diagnosis: diagnosis.into(),
            claimstatus: claimstatus.into(),
            accepted_date,
            claimsubmitted,
            claimpaid,
            percentagepaid,
            year: accepted_date.year(),
            month: accepted_date.month(),
            month_year: MonthPeriod::of(accepted_date),
        }
    }

    /// Every column rendered as plain text, in [`ClaimRecord::COLUMNS`] order.
    /// Floats always carry a decimal point (`10.0`, not `10`).
    pub fn text_fields(&self) -> [String; 10] {
        [
            self.member_id.clone(),
            self.diagnosis.clone(),
            self.claimstatus.clone(),
            self.accepted_date.to_string(),
            format!("{:?}", self.claimsubmitted),
            format!("{:?}", self.claimpaid),
            format!("{:?}", self.percentagepaid),
            self.year.to_string(),
            self.month.to_string(),
            self.month_year.to_string(),
        ]
    }
}

// ---------------------------------------------------------------------------
// ClaimsDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The loaded dataset with pre-computed column summaries.
///
/// Immutable once built: there are no `&mut self` methods, so a single
/// instance can be shared by reference across any number of readers.
#[derive(Debug, Clone)]
pub struct ClaimsDataset {
    records: Vec<ClaimRecord>,
    /// Distinct statuses in order of first appearance.
    statuses: Vec<String>,
    /// Sorted distinct years.
    years: Vec<i32>,
    /// Most frequent diagnoses across the whole table.
    top_diagnoses: Vec<CategoryCount>,
    date_span: Option<(NaiveDate, NaiveDate)>,
    total_submitted: f64,
}

impl ClaimsDataset {
    /// Build column summaries from the loaded records.
    pub fn from_records(records: Vec<ClaimRecord>) -> Self {
        let mut statuses: Vec<String> = Vec::new();
        let mut years: BTreeSet<i32> = BTreeSet::new();
        let mut date_span: Option<(NaiveDate, NaiveDate)> = None;
        let mut total_submitted = 0.0;

        for rec in &records {
            if !statuses.iter().any(|s| s == &rec.claimstatus) {
                statuses.push(rec.claimstatus.clone());
            }
            years.insert(rec.year);
            date_span = Some(match date_span {
                None => (rec.accepted_date, rec.accepted_date),
                Some((lo, hi)) => (lo.min(rec.accepted_date), hi.max(rec.accepted_date)),
            });
            total_submitted += rec.claimsubmitted;
        }

        let top_diagnoses = rank_by_frequency(
            records.iter().map(|r| r.diagnosis.as_str()),
            TOP_DIAGNOSES,
        );

        ClaimsDataset {
            records,
            statuses,
            years: years.into_iter().collect(),
            top_diagnoses,
            date_span,
            total_submitted,
        }
    }

    pub fn records(&self) -> &[ClaimRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn statuses(&self) -> &[String] {
        &self.statuses
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn top_diagnoses(&self) -> &[CategoryCount] {
        &self.top_diagnoses
    }

    /// Earliest and latest `accepted_date`, `None` for an empty table.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.date_span
    }

    /// Sum of `claimsubmitted` over every record.
    pub fn total_submitted(&self) -> f64 {
        self.total_submitted
    }
}
