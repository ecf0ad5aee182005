use super::filter::FilteredView;
use super::model::ClaimsDataset;
use super::stats::{mean, median};

/// Headline numbers of the metrics row.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryMetrics {
    pub total_claims: usize,
    pub dataset_claims: usize,
    pub total_submitted: f64,
    /// `total_submitted` as a percentage of the dataset-wide submitted sum.
    pub submitted_share: Option<f64>,
    pub total_paid: f64,
    /// `total_paid` as a percentage of `total_submitted`.
    pub paid_ratio: Option<f64>,
    /// NaN for an empty view.
    pub avg_percentage_paid: f64,
    /// NaN for an empty view.
    pub median_percentage_paid: f64,
}

impl SummaryMetrics {
    pub fn compute(view: &FilteredView<'_>, dataset: &ClaimsDataset) -> Self {
        let total_submitted: f64 = view.iter().map(|r| r.claimsubmitted).sum();
        let total_paid: f64 = view.iter().map(|r| r.claimpaid).sum();
        let percentages = view.column(|r| r.percentagepaid);

        SummaryMetrics {
            total_claims: view.len(),
            dataset_claims: dataset.len(),
            total_submitted,
            submitted_share: percent_of(total_submitted, dataset.total_submitted()),
            total_paid,
            paid_ratio: percent_of(total_paid, total_submitted),
            avg_percentage_paid: mean(&percentages),
            median_percentage_paid: median(&percentages),
        }
    }
}

/// `part / whole * 100`, or `None` when `whole` is zero.
pub fn percent_of(part: f64, whole: f64) -> Option<f64> {
    if whole == 0.0 {
        None
    } else {
        Some(part / whole * 100.0)
    }
}
