use std::path::PathBuf;

use clap::Parser;

use claims_dashboard::data::range::Preset;
use claims_dashboard::data::table::PageSize;

/// Insurance claims reporting dashboard.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct DashboardArgs {
    /// Claims table to load (.xlsx, .csv, .json or .parquet)
    #[arg(long, env = "CLAIMS_DATA", default_value = "clean.xlsx")]
    pub data: PathBuf,

    /// Directory suggested for CSV exports
    #[arg(long, env = "CLAIMS_EXPORT_DIR", default_value = ".")]
    pub export_dir: PathBuf,

    /// Rows per table page: 10, 25, 50 or 100
    #[arg(long, default_value = "25", value_parser = parse_page_size)]
    pub page_size: PageSize,

    /// Initial period preset, e.g. `all`, `year_2016` or `q1_2020`
    #[arg(long, default_value = "all", value_parser = parse_preset)]
    pub period: Preset,
}

fn parse_page_size(s: &str) -> Result<PageSize, String> {
    let rows: usize = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    PageSize::from_rows(rows).ok_or_else(|| format!("page size must be 10, 25, 50 or 100, got {rows}"))
}

fn parse_preset(s: &str) -> Result<Preset, String> {
    Preset::from_id(s).ok_or_else(|| {
        let known: Vec<&str> = Preset::ALL.iter().map(|p| p.id()).collect();
        format!("unknown period '{s}', expected one of: {}", known.join(", "))
    })
}
