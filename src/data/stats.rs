use super::filter::FilteredView;
use super::model::ClaimRecord;

// ---------------------------------------------------------------------------
// Scalar statistics
// ---------------------------------------------------------------------------

/// Arithmetic mean, NaN for no values.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1), NaN below two values.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

pub fn median(values: &[f64]) -> f64 {
    quantile_sorted(&sorted(values), 0.5)
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(f64::total_cmp);
    out
}

/// Quantile of already sorted data with linear interpolation between the
/// two nearest ranks. NaN for no values.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
        }
    }
}

// ---------------------------------------------------------------------------
// describe()
// ---------------------------------------------------------------------------

/// The eight-row summary of one numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl Describe {
    pub fn of(values: &[f64]) -> Self {
        let s = sorted(values);
        Describe {
            count: s.len(),
            mean: mean(&s),
            std: sample_std(&s),
            min: s.first().copied().unwrap_or(f64::NAN),
            q1: quantile_sorted(&s, 0.25),
            median: quantile_sorted(&s, 0.5),
            q3: quantile_sorted(&s, 0.75),
            max: s.last().copied().unwrap_or(f64::NAN),
        }
    }

    /// Row labels with their values, in display order.
    pub fn rows(&self) -> [(&'static str, f64); 8] {
        [
            ("count", self.count as f64),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q1),
            ("50%", self.median),
            ("75%", self.q3),
            ("max", self.max),
        ]
    }
}

/// The numeric columns summarised by the statistics table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericColumn {
    ClaimSubmitted,
    ClaimPaid,
    PercentagePaid,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 3] = [
        NumericColumn::ClaimSubmitted,
        NumericColumn::ClaimPaid,
        NumericColumn::PercentagePaid,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NumericColumn::ClaimSubmitted => "claimsubmitted",
            NumericColumn::ClaimPaid => "claimpaid",
            NumericColumn::PercentagePaid => "percentagepaid",
        }
    }

    pub fn value(self, record: &ClaimRecord) -> f64 {
        match self {
            NumericColumn::ClaimSubmitted => record.claimsubmitted,
            NumericColumn::ClaimPaid => record.claimpaid,
            NumericColumn::PercentagePaid => record.percentagepaid,
        }
    }

    /// Whether values are ratios (rendered as percentages) rather than money.
    pub fn is_ratio(self) -> bool {
        self == NumericColumn::PercentagePaid
    }
}

/// [`Describe`] for every [`NumericColumn`] of a view.
pub fn describe_view(view: &FilteredView<'_>) -> Vec<(NumericColumn, Describe)> {
    NumericColumn::ALL
        .iter()
        .map(|&col| (col, Describe::of(&view.column(|r| col.value(r)))))
        .collect()
}

// ---------------------------------------------------------------------------
// Outliers
// ---------------------------------------------------------------------------

/// Values outside `[Q1 - 1.5 IQR, Q3 + 1.5 IQR]`.
pub fn outlier_count(values: &[f64]) -> usize {
    if values.is_empty() {
        return 0;
    }
    let s = sorted(values);
    let q1 = quantile_sorted(&s, 0.25);
    let q3 = quantile_sorted(&s, 0.75);
    let iqr = q3 - q1;
    let (low, high) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);
    s.iter().filter(|&&v| v < low || v > high).count()
}

// ---------------------------------------------------------------------------
// Insights
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentLevel {
    VeryGood,
    FairlyGood,
    NeedsAttention,
}

impl PaymentLevel {
    /// NaN falls through to `NeedsAttention`.
    pub fn from_average(avg_percentage: f64) -> Self {
        if avg_percentage >= 0.8 {
            PaymentLevel::VeryGood
        } else if avg_percentage >= 0.6 {
            PaymentLevel::FairlyGood
        } else {
            PaymentLevel::NeedsAttention
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaymentLevel::VeryGood => "Payment rate is very good",
            PaymentLevel::FairlyGood => "Payment rate is fairly good",
            PaymentLevel::NeedsAttention => "Payment rate needs attention",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variability {
    Low,
    Moderate,
    High,
    Undefined,
}

impl Variability {
    pub fn from_std(std: f64) -> Self {
        if std.is_nan() {
            Variability::Undefined
        } else if std <= 0.2 {
            Variability::Low
        } else if std <= 0.4 {
            Variability::Moderate
        } else {
            Variability::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Variability::Low => "low (consistent)",
            Variability::Moderate => "moderate",
            Variability::High => "high (varied)",
            Variability::Undefined => "undefined",
        }
    }
}

/// Short narrative facts shown under the statistics table.
#[derive(Debug, Clone, PartialEq)]
pub struct Insights {
    pub avg_submitted: f64,
    pub avg_paid: f64,
    pub avg_percentage_paid: f64,
    pub payment_level: PaymentLevel,
    pub variability: Variability,
    pub records: usize,
    /// Outliers on `claimpaid`.
    pub outliers: usize,
    /// `outliers` as a percentage of `records`; `None` when there are none.
    pub outlier_share: Option<f64>,
}

impl Insights {
    pub fn compute(view: &FilteredView<'_>) -> Self {
        let percentages = view.column(|r| r.percentagepaid);
        let paid = view.column(|r| r.claimpaid);
        let avg_percentage_paid = mean(&percentages);
        let outliers = outlier_count(&paid);

        Insights {
            avg_submitted: mean(&view.column(|r| r.claimsubmitted)),
            avg_paid: mean(&paid),
            avg_percentage_paid,
            payment_level: PaymentLevel::from_average(avg_percentage_paid),
            variability: Variability::from_std(sample_std(&percentages)),
            records: view.len(),
            outliers,
            outlier_share: super::summary::percent_of(outliers as f64, view.len() as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn linear_interpolation_matches_pandas() {
        let s = [1.0, 2.0, 3.0, 4.0];
        assert!(close(quantile_sorted(&s, 0.25), 1.75));
        assert!(close(quantile_sorted(&s, 0.5), 2.5));
        assert!(close(quantile_sorted(&s, 0.75), 3.25));
        assert_eq!(quantile_sorted(&s, 0.0), 1.0);
        assert_eq!(quantile_sorted(&s, 1.0), 4.0);
    }

    #[test]
    fn describe_unsorted_input() {
        let d = Describe::of(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(d.count, 4);
        assert!(close(d.mean, 2.5));
        assert!(close(d.std, (5.0f64 / 3.0).sqrt()));
        assert_eq!(d.min, 1.0);
        assert_eq!(d.max, 4.0);
        assert!(close(d.q1, 1.75));
    }

    #[test]
    fn single_value_has_undefined_std() {
        let d = Describe::of(&[42.0]);
        assert_eq!(d.count, 1);
        assert!(d.std.is_nan());
        for v in [d.mean, d.min, d.q1, d.median, d.q3, d.max] {
            assert_eq!(v, 42.0);
        }
    }

    #[test]
    fn empty_describe_is_all_nan() {
        let d = Describe::of(&[]);
        assert_eq!(d.count, 0);
        assert!(d.rows()[1..].iter().all(|(_, v)| v.is_nan()));
    }

    #[test]
    fn outliers() {
        assert_eq!(outlier_count(&[]), 0);
        assert_eq!(outlier_count(&[7.0; 20]), 0);
        let mut values: Vec<f64> = (1..=20).map(f64::from).collect();
        values.push(1000.0);
        assert_eq!(outlier_count(&values), 1);
    }

    #[test]
    fn insight_thresholds() {
        assert_eq!(PaymentLevel::from_average(0.8), PaymentLevel::VeryGood);
        assert_eq!(PaymentLevel::from_average(0.6), PaymentLevel::FairlyGood);
        assert_eq!(PaymentLevel::from_average(0.59), PaymentLevel::NeedsAttention);
        assert_eq!(PaymentLevel::from_average(f64::NAN), PaymentLevel::NeedsAttention);
        assert_eq!(Variability::from_std(0.2), Variability::Low);
        assert_eq!(Variability::from_std(0.3), Variability::Moderate);
        assert_eq!(Variability::from_std(0.41), Variability::High);
        assert_eq!(Variability::from_std(f64::NAN), Variability::Undefined);
    }
}
