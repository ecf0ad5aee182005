use std::path::{Path, PathBuf};

use anyhow::Result;

use claims_dashboard::data::export::export_to_path;
use claims_dashboard::data::filter::{FilterCriteria, Selection};
use claims_dashboard::data::model::ClaimsDataset;
use claims_dashboard::data::range::{DateRange, DateSelection, Preset};
use claims_dashboard::data::report::DashboardReport;
use claims_dashboard::data::table::{Page, PageSize};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Year/month pickers of the custom range mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomMonths {
    pub start_year: i32,
    pub start_month: u32,
    pub end_year: i32,
    pub end_month: u32,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// The process-wide dataset.
    pub dataset: &'static ClaimsDataset,

    /// Custom year/month range instead of a preset.
    pub use_custom_range: bool,
    pub preset: Preset,
    pub custom: CustomMonths,

    /// Active selection; recomputing the report reads this.
    pub criteria: FilterCriteria,

    /// Every view of the current selection (cached until the next change).
    pub report: DashboardReport<'static>,

    /// Status colours for the distribution chart.
    pub status_colors: ColorMap,

    /// Where the save dialog starts.
    pub export_dir: PathBuf,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(
        dataset: &'static ClaimsDataset,
        preset: Preset,
        page_size: PageSize,
        export_dir: PathBuf,
    ) -> Self {
        let first_year = dataset.years().first().copied().unwrap_or(2020);
        let last_year = dataset.years().last().copied().unwrap_or(first_year);
        let criteria = FilterCriteria::new(preset.resolve(dataset)).with_page(page_size, 1);

        Self {
            dataset,
            use_custom_range: false,
            preset,
            custom: CustomMonths {
                start_year: first_year,
                start_month: 1,
                end_year: last_year,
                end_month: 12,
            },
            report: DashboardReport::compute(dataset, &criteria),
            criteria,
            status_colors: ColorMap::for_statuses(dataset.statuses()),
            export_dir,
            status_message: None,
        }
    }

    pub fn date_selection(&self) -> DateSelection {
        if self.use_custom_range {
            DateSelection::Custom {
                start_year: self.custom.start_year,
                start_month: self.custom.start_month,
                end_year: self.custom.end_year,
                end_month: self.custom.end_month,
            }
        } else {
            DateSelection::Preset(self.preset)
        }
    }

    /// Recompute every view after a filter change. Paging restarts at 1.
    pub fn refilter(&mut self) {
        self.criteria.date_range = match self.date_selection().resolve(self.dataset) {
            Ok(range) => {
                self.status_message = None;
                range
            }
            Err(e) => {
                log::warn!("invalid date selection: {e}");
                self.status_message = Some(format!("Error: {e}"));
                DateRange::EMPTY
            }
        };
        self.criteria.page_number = 1;
        self.report = DashboardReport::compute(self.dataset, &self.criteria);
    }

    pub fn set_status(&mut self, status: Selection) {
        if self.criteria.status != status {
            self.criteria.status = status;
            self.refilter();
        }
    }

    pub fn set_diagnosis(&mut self, diagnosis: Selection) {
        if self.criteria.diagnosis != diagnosis {
            self.criteria.diagnosis = diagnosis;
            self.refilter();
        }
    }

    /// Search only narrows the table, so the report is left alone.
    pub fn set_search(&mut self, term: String) {
        self.criteria.search = term;
        self.criteria.page_number = 1;
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.criteria.page_size = page_size;
        self.criteria.page_number = 1;
    }

    pub fn set_page(&mut self, page_number: usize) {
        self.criteria.page_number = page_number.max(1);
    }

    /// Current table page.
    pub fn table_page(&self) -> Page<'static> {
        self.report.table_page(&self.criteria)
    }

    /// "All" followed by the statuses in dataset order.
    pub fn status_options(&self) -> Vec<Selection> {
        std::iter::once(Selection::All)
            .chain(self.dataset.statuses().iter().cloned().map(Selection::Only))
            .collect()
    }

    /// "All" followed by the dataset's ten most frequent diagnoses.
    pub fn diagnosis_options(&self) -> Vec<Selection> {
        std::iter::once(Selection::All)
            .chain(
                self.dataset
                    .top_diagnoses()
                    .iter()
                    .map(|c| Selection::Only(c.label.clone())),
            )
            .collect()
    }

    /// Write the filtered records to `path`.
    pub fn export(&mut self, path: &Path) -> Result<()> {
        export_to_path(path, self.report.view.records())?;
        self.status_message = Some(format!("Exported {} records to {}", self.report.view.len(), path.display()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use claims_dashboard::data::model::ClaimRecord;

    use super::*;

    fn leaked_dataset() -> &'static ClaimsDataset {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        Box::leak(Box::new(ClaimsDataset::from_records(vec![
            ClaimRecord::new("1", "Flu", "Accepted", d(2016, 4, 2), 100.0, 100.0, 1.0),
            ClaimRecord::new("2", "Dengue", "Rejected", d(2020, 2, 10), 200.0, 0.0, 0.0),
            ClaimRecord::new("3", "Flu", "Accepted", d(2020, 6, 1), 300.0, 150.0, 0.5),
        ])))
    }

    #[test]
    fn starts_with_everything_visible() {
        let state = AppState::new(leaked_dataset(), Preset::All, PageSize::Ten, PathBuf::from("."));
        assert_eq!(state.report.view.len(), 3);
        assert_eq!(state.custom.start_year, 2016);
        assert_eq!(state.custom.end_year, 2020);
        assert_eq!(state.status_options().len(), 3);
        assert_eq!(state.diagnosis_options()[0], Selection::All);
    }

    #[test]
    fn filter_change_resets_paging() {
        let mut state = AppState::new(leaked_dataset(), Preset::All, PageSize::Ten, PathBuf::from("."));
        state.set_page(3);
        state.set_status(Selection::Only("Accepted".into()));
        assert_eq!(state.criteria.page_number, 1);
        assert_eq!(state.report.view.len(), 2);

        state.use_custom_range = true;
        state.custom = CustomMonths {
            start_year: 2020,
            start_month: 1,
            end_year: 2020,
            end_month: 2,
        };
        state.refilter();
        assert!(state.report.view.is_empty());
    }

    #[test]
    fn starts_on_the_requested_period() {
        let state = AppState::new(leaked_dataset(), Preset::Year2016, PageSize::Ten, PathBuf::from("."));
        assert_eq!(state.report.view.len(), 1);
        assert_eq!(state.date_selection(), DateSelection::Preset(Preset::Year2016));
    }

    #[test]
    fn search_narrows_table_only() {
        let mut state = AppState::new(leaked_dataset(), Preset::All, PageSize::Ten, PathBuf::from("."));
        state.set_search("dengue".into());
        assert_eq!(state.table_page().rows.len(), 1);
        assert_eq!(state.report.view.len(), 3);
    }
}
