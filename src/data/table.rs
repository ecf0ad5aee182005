use super::model::ClaimRecord;

// ---------------------------------------------------------------------------
// Page sizes
// ---------------------------------------------------------------------------

/// Allowed rows-per-page choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    Ten,
    #[default]
    TwentyFive,
    Fifty,
    Hundred,
}

impl PageSize {
    pub const ALL: [PageSize; 4] = [
        PageSize::Ten,
        PageSize::TwentyFive,
        PageSize::Fifty,
        PageSize::Hundred,
    ];

    pub fn rows(self) -> usize {
        match self {
            PageSize::Ten => 10,
            PageSize::TwentyFive => 25,
            PageSize::Fifty => 50,
            PageSize::Hundred => 100,
        }
    }

    pub fn from_rows(rows: usize) -> Option<PageSize> {
        Self::ALL.into_iter().find(|p| p.rows() == rows)
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Records where any column's text contains `term`, ignoring case.
/// The term is matched as typed, surrounding spaces included. An empty term
/// keeps everything.
pub fn search<'a>(records: &[&'a ClaimRecord], term: &str) -> Vec<&'a ClaimRecord> {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .copied()
        .filter(|r| {
            r.text_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Highest valid 1-based page number; always at least 1.
pub fn max_page(count: usize, page_size: PageSize) -> usize {
    count.div_ceil(page_size.rows()).max(1)
}

/// One page of table rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a> {
    pub rows: Vec<&'a ClaimRecord>,
    pub page_number: usize,
    pub max_page: usize,
    /// Rows before paging.
    pub total: usize,
}

/// Slice out page `page_number` (1-based). Pages past the end, and page 0,
/// are empty.
pub fn paginate<'a>(records: &[&'a ClaimRecord], page_size: PageSize, page_number: usize) -> Page<'a> {
    let size = page_size.rows();
    let rows = match page_number.checked_sub(1) {
        Some(idx) => {
            let start = idx.saturating_mul(size).min(records.len());
            let end = start.saturating_add(size).min(records.len());
            records[start..end].to_vec()
        }
        None => Vec::new(),
    };
    Page {
        rows,
        page_number,
        max_page: max_page(records.len(), page_size),
        total: records.len(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn records(n: usize) -> Vec<ClaimRecord> {
        let d = NaiveDate::from_ymd_opt(2020, 5, 17).unwrap();
        (1..=n)
            .map(|i| ClaimRecord::new(format!("M{i:03}"), "Typhoid", "Accepted", d, 10.0, 5.0, 0.5))
            .collect()
    }

    #[test]
    fn pages_of_sixty() {
        let owned = records(60);
        let refs: Vec<&ClaimRecord> = owned.iter().collect();

        let first = paginate(&refs, PageSize::TwentyFive, 1);
        assert_eq!(first.rows.len(), 25);
        assert_eq!(first.rows[0].member_id, "M001");
        assert_eq!(first.rows[24].member_id, "M025");
        assert_eq!(first.max_page, 3);

        let third = paginate(&refs, PageSize::TwentyFive, 3);
        assert_eq!(third.rows.len(), 10);
        assert_eq!(third.rows[0].member_id, "M051");
        assert_eq!(third.rows[9].member_id, "M060");

        assert!(paginate(&refs, PageSize::TwentyFive, 4).rows.is_empty());
        assert!(paginate(&refs, PageSize::TwentyFive, 0).rows.is_empty());
        assert!(paginate(&refs, PageSize::TwentyFive, usize::MAX).rows.is_empty());
    }

    #[test]
    fn max_page_is_at_least_one() {
        assert_eq!(max_page(0, PageSize::Ten), 1);
        assert_eq!(max_page(10, PageSize::Ten), 1);
        assert_eq!(max_page(11, PageSize::Ten), 2);
        assert_eq!(max_page(100, PageSize::Fifty), 2);
    }

    #[test]
    fn page_size_choices() {
        assert_eq!(PageSize::from_rows(50), Some(PageSize::Fifty));
        assert_eq!(PageSize::from_rows(20), None);
        assert_eq!(PageSize::default().rows(), 25);
    }

    #[test]
    fn search_is_case_insensitive_over_every_column() {
        let d = NaiveDate::from_ymd_opt(2016, 8, 3).unwrap();
        let owned = vec![
            ClaimRecord::new("A1", "Dengue Fever", "Accepted", d, 10.0, 5.0, 0.5),
            ClaimRecord::new("B2", "Influenza", "Rejected", d, 10.0, 0.0, 0.0),
        ];
        let refs: Vec<&ClaimRecord> = owned.iter().collect();

        assert_eq!(search(&refs, "dengue").len(), 1);
        assert_eq!(search(&refs, "REJECTED")[0].member_id, "B2");
        assert_eq!(search(&refs, "2016-08").len(), 2);
        assert_eq!(search(&refs, "").len(), 2);
        assert!(search(&refs, "malaria").is_empty());
    }

    #[test]
    fn search_term_is_not_trimmed_and_floats_keep_a_decimal() {
        let d = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        let owned = vec![
            ClaimRecord::new("A1", "Flu", "Accepted", d, 10.0, 10.0, 1.0),
            ClaimRecord::new("B2", "Flu", "Partially Accepted", d, 10.0, 4.0, 0.4),
        ];
        let refs: Vec<&ClaimRecord> = owned.iter().collect();

        let spaced = search(&refs, " accepted");
        assert_eq!(spaced.len(), 1);
        assert_eq!(spaced[0].member_id, "B2");
        assert_eq!(search(&refs, "10.0").len(), 2);
        assert_eq!(search(&refs, "  ").len(), 0);
    }
}
