use super::aggregate::{
    histogram, monthly_counts, status_distribution, top_diagnoses, CategoryCount, HistogramBin,
    PeriodCount, HISTOGRAM_BINS, TOP_DIAGNOSES,
};
use super::filter::{FilterCriteria, FilteredView};
use super::model::ClaimsDataset;
use super::stats::{describe_view, Describe, Insights, NumericColumn};
use super::summary::SummaryMetrics;
use super::table::{paginate, search, Page};

/// Every derived view of one filter selection.
///
/// Recomputed from the base dataset whenever the criteria change; nothing
/// here is updated incrementally.
#[derive(Debug, Clone)]
pub struct DashboardReport<'a> {
    pub view: FilteredView<'a>,
    pub summary: SummaryMetrics,
    pub monthly: Vec<PeriodCount>,
    pub statuses: Vec<CategoryCount>,
    pub top_diagnoses: Vec<CategoryCount>,
    pub percentage_histogram: Vec<HistogramBin>,
    pub describe: Vec<(NumericColumn, Describe)>,
    pub insights: Insights,
}

impl<'a> DashboardReport<'a> {
    pub fn compute(dataset: &'a ClaimsDataset, criteria: &FilterCriteria) -> Self {
        let view = FilteredView::apply(dataset, criteria);
        log::debug!(
            "recomputing report: {} of {} claims in {}",
            view.len(),
            dataset.len(),
            criteria.date_range.describe()
        );

        DashboardReport {
            summary: SummaryMetrics::compute(&view, dataset),
            monthly: monthly_counts(&view),
            statuses: status_distribution(&view, dataset),
            top_diagnoses: top_diagnoses(&view, TOP_DIAGNOSES),
            percentage_histogram: histogram(&view.column(|r| r.percentagepaid), HISTOGRAM_BINS),
            describe: describe_view(&view),
            insights: Insights::compute(&view),
            view,
        }
    }

    /// Search then paginate the filtered records using the criteria's
    /// table settings.
    pub fn table_page(&self, criteria: &FilterCriteria) -> Page<'a> {
        let matches = search(self.view.records(), &criteria.search);
        paginate(&matches, criteria.page_size, criteria.page_number)
    }

    /// `(search matches, records in the view)` for the "showing X of Y"
    /// line above the table.
    pub fn table_counts(&self, page: &Page<'_>) -> (usize, usize) {
        (page.total, self.view.len())
    }
}
