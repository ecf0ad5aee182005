use std::collections::{BTreeMap, HashMap};

use super::filter::FilteredView;
use super::model::{ClaimsDataset, MonthPeriod};

/// Length of the diagnosis ranking.
pub const TOP_DIAGNOSES: usize = 10;

/// Bin count of the percentage-paid histogram.
pub const HISTOGRAM_BINS: usize = 30;

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodCount {
    pub period: MonthPeriod,
    pub count: usize,
}

/// Claims per `month_year`, oldest month first. Months without claims are
/// not emitted.
pub fn monthly_counts(view: &FilteredView<'_>) -> Vec<PeriodCount> {
    let mut buckets: BTreeMap<MonthPeriod, usize> = BTreeMap::new();
    for rec in view.iter() {
        *buckets.entry(rec.month_year).or_default() += 1;
    }
    buckets
        .into_iter()
        .map(|(period, count)| PeriodCount { period, count })
        .collect()
}

// ---------------------------------------------------------------------------
// Categorical counts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// Claims per status. Statuses appear in the order the dataset first
/// mentions them; statuses absent from `view` are omitted.
pub fn status_distribution(view: &FilteredView<'_>, dataset: &ClaimsDataset) -> Vec<CategoryCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for rec in view.iter() {
        *counts.entry(rec.claimstatus.as_str()).or_default() += 1;
    }
    dataset
        .statuses()
        .iter()
        .filter_map(|status| {
            counts.get(status.as_str()).map(|&count| CategoryCount {
                label: status.clone(),
                count,
            })
        })
        .collect()
}

/// The `limit` most frequent diagnoses in `view`, most frequent first.
pub fn top_diagnoses(view: &FilteredView<'_>, limit: usize) -> Vec<CategoryCount> {
    rank_by_frequency(view.iter().map(|r| r.diagnosis.as_str()), limit)
}

/// Count occurrences and keep the `limit` largest counts.
///
/// Equal counts keep first-encountered order.
pub fn rank_by_frequency<'a>(items: impl IntoIterator<Item = &'a str>, limit: usize) -> Vec<CategoryCount> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut ranked: Vec<CategoryCount> = Vec::new();

    for item in items {
        match slots.get(item) {
            Some(&slot) => ranked[slot].count += 1,
            None => {
                slots.insert(item, ranked.len());
                ranked.push(CategoryCount {
                    label: item.to_string(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram over `min..=max` of `values`.
///
/// The last bin is closed on the right. When every value is equal a single
/// bin holds them all.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if range.abs() < f64::EPSILON {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: values.len(),
        }];
    }

    let width = range / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for &v in values {
        let idx = (((v - min) / width).floor() as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::data::filter::FilterCriteria;
    use crate::data::model::ClaimRecord;
    use crate::data::range::DateRange;

    fn rec(date: (i32, u32, u32), status: &str, diagnosis: &str) -> ClaimRecord {
        let d = NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap();
        ClaimRecord::new("m", diagnosis, status, d, 100.0, 50.0, 0.5)
    }

    fn everything(ds: &ClaimsDataset) -> FilteredView<'_> {
        let (lo, hi) = ds.date_span().unwrap();
        FilteredView::apply(ds, &FilterCriteria::new(DateRange::new(lo, hi)))
    }

    #[test]
    fn monthly_buckets_ignore_row_order() {
        let ds = ClaimsDataset::from_records(vec![
            rec((2020, 10, 3), "Accepted", "A"),
            rec((2020, 2, 1), "Accepted", "A"),
            rec((2019, 12, 31), "Accepted", "A"),
            rec((2020, 10, 20), "Accepted", "A"),
        ]);
        let series = monthly_counts(&everything(&ds));
        let labels: Vec<String> = series.iter().map(|p| p.period.to_string()).collect();
        assert_eq!(labels, ["2019-12", "2020-02", "2020-10"]);
        assert_eq!(series[2].count, 2);
        assert!(series.windows(2).all(|w| w[0].period < w[1].period));
    }

    #[test]
    fn status_counts_follow_dataset_order_and_sum_to_view() {
        let ds = ClaimsDataset::from_records(vec![
            rec((2020, 1, 1), "Rejected", "A"),
            rec((2020, 1, 2), "Accepted", "A"),
            rec((2020, 1, 3), "Partially Accepted", "A"),
            rec((2020, 1, 4), "Accepted", "A"),
        ]);
        let view = everything(&ds);
        let dist = status_distribution(&view, &ds);
        let labels: Vec<&str> = dist.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["Rejected", "Accepted", "Partially Accepted"]);
        assert_eq!(dist.iter().map(|c| c.count).sum::<usize>(), view.len());
    }

    #[test]
    fn ranking_is_stable_and_bounded() {
        let items = ["b", "a", "c", "a", "b", "d"];
        let ranked = rank_by_frequency(items, 3);
        let labels: Vec<&str> = ranked.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["b", "a", "c"]);

        let many: Vec<String> = (0..25).map(|i| format!("dx{}", i % 12)).collect();
        let ranked = rank_by_frequency(many.iter().map(String::as_str), TOP_DIAGNOSES);
        assert_eq!(ranked.len(), TOP_DIAGNOSES);
        assert!(ranked.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn histogram_edges() {
        assert!(histogram(&[], HISTOGRAM_BINS).is_empty());

        let flat = histogram(&[0.5, 0.5, 0.5], HISTOGRAM_BINS);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].count, 3);

        let bins = histogram(&[0.0, 0.25, 0.5, 1.0], 4);
        let counts: Vec<usize> = bins.iter().map(|b| b.count).collect();
        assert_eq!(counts, [1, 1, 1, 1]);
        assert_eq!(bins[3].upper, 1.0);
    }
}
