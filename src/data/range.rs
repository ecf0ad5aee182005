use chrono::NaiveDate;

use super::error::RangeError;
use super::model::ClaimsDataset;

/// English month names, index 0 = January.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

// ---------------------------------------------------------------------------
// DateRange – inclusive [start, end]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Matches no date at all.
    pub const EMPTY: DateRange = DateRange {
        start: NaiveDate::MAX,
        end: NaiveDate::MIN,
    };

    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    /// Inclusive on both ends. A reversed range contains nothing.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// e.g. `"01 January 2020 - 31 March 2020"`.
    pub fn describe(&self) -> String {
        if self.start > self.end {
            return "no dates".to_string();
        }
        format!(
            "{} - {}",
            self.start.format("%d %B %Y"),
            self.end.format("%d %B %Y")
        )
    }
}

/// First day of `start_month` through the last calendar day of `end_month`.
pub fn month_range(
    start_year: i32,
    start_month: u32,
    end_year: i32,
    end_month: u32,
) -> Result<DateRange, RangeError> {
    let start = NaiveDate::from_ymd_opt(start_year, start_month, 1).ok_or(RangeError::InvalidMonth {
        year: start_year,
        month: start_month,
    })?;
    let end = last_day_of_month(end_year, end_month)?;
    Ok(DateRange { start, end })
}

/// The day before the first of the following month.
pub fn last_day_of_month(year: i32, month: u32) -> Result<NaiveDate, RangeError> {
    let invalid = RangeError::InvalidMonth { year, month };
    if !(1..=12).contains(&month) {
        return Err(invalid);
    }
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .ok_or(invalid)
}

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

/// Named shortcut ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    All,
    Year2020,
    Year2016,
    FirstHalf2020,
    SecondHalf2020,
    Q1Of2020,
    Q2Of2020,
    Q3Of2020,
    Q4Of2020,
}

/// Fixed month span of a preset: `(start_year, start_month, end_year, end_month)`.
type MonthSpan = (i32, u32, i32, u32);

/// Preset table: identifier, label, and fixed month span (`None` = whole dataset).
const PRESET_TABLE: [(Preset, &str, &str, Option<MonthSpan>); 9] = [
    (Preset::All, "all", "All data", None),
    (Preset::Year2020, "year_2020", "Year 2020", Some((2020, 1, 2020, 12))),
    (Preset::Year2016, "year_2016", "Year 2016", Some((2016, 1, 2016, 12))),
    (Preset::FirstHalf2020, "first_half_2020", "First half 2020", Some((2020, 1, 2020, 6))),
    (Preset::SecondHalf2020, "second_half_2020", "Second half 2020", Some((2020, 7, 2020, 12))),
    (Preset::Q1Of2020, "q1_2020", "Q1 2020 (Jan-Mar)", Some((2020, 1, 2020, 3))),
    (Preset::Q2Of2020, "q2_2020", "Q2 2020 (Apr-Jun)", Some((2020, 4, 2020, 6))),
    (Preset::Q3Of2020, "q3_2020", "Q3 2020 (Jul-Sep)", Some((2020, 7, 2020, 9))),
    (Preset::Q4Of2020, "q4_2020", "Q4 2020 (Oct-Dec)", Some((2020, 10, 2020, 12))),
];

impl Preset {
    pub const ALL: [Preset; 9] = [
        Preset::All,
        Preset::Year2020,
        Preset::Year2016,
        Preset::FirstHalf2020,
        Preset::SecondHalf2020,
        Preset::Q1Of2020,
        Preset::Q2Of2020,
        Preset::Q3Of2020,
        Preset::Q4Of2020,
    ];

    fn entry(self) -> (Preset, &'static str, &'static str, Option<MonthSpan>) {
        PRESET_TABLE[self as usize]
    }

    /// Stable identifier, e.g. `"q1_2020"`.
    pub fn id(self) -> &'static str {
        self.entry().1
    }

    pub fn label(self) -> &'static str {
        self.entry().2
    }

    pub fn from_id(id: &str) -> Option<Preset> {
        PRESET_TABLE
            .iter()
            .find(|(_, pid, _, _)| *pid == id)
            .map(|(preset, _, _, _)| *preset)
    }

    /// Concrete bounds. Only [`Preset::All`] looks at the dataset; an empty
    /// dataset gives [`DateRange::EMPTY`].
    pub fn resolve(self, dataset: &ClaimsDataset) -> DateRange {
        match self.entry().3 {
            None => dataset
                .date_span()
                .map(|(first, last)| DateRange::new(first, last))
                .unwrap_or(DateRange::EMPTY),
            Some((sy, sm, ey, em)) => month_range(sy, sm, ey, em).unwrap_or_else(|e| {
                log::error!("preset {} has an invalid span: {e}", self.id());
                DateRange::EMPTY
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// DateSelection – what the user picked
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSelection {
    Preset(Preset),
    Custom {
        start_year: i32,
        start_month: u32,
        end_year: i32,
        end_month: u32,
    },
}

impl Default for DateSelection {
    fn default() -> Self {
        DateSelection::Preset(Preset::All)
    }
}

impl DateSelection {
    pub fn resolve(&self, dataset: &ClaimsDataset) -> Result<DateRange, RangeError> {
        match *self {
            DateSelection::Preset(preset) => Ok(preset.resolve(dataset)),
            DateSelection::Custom {
                start_year,
                start_month,
                end_year,
                end_month,
            } => month_range(start_year, start_month, end_year, end_month),
        }
    }
}
