use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;

use super::model::ClaimRecord;

/// e.g. `claims_filtered_20240131_235959.csv`.
pub fn export_file_name(generated_at: NaiveDateTime) -> String {
    format!("claims_filtered_{}.csv", generated_at.format("%Y%m%d_%H%M%S"))
}

/// Write `records` as CSV with every original and derived column. The
/// header is written even when there are no records.
pub fn write_csv<W: Write>(out: W, records: &[&ClaimRecord]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);

    writer
        .write_record(ClaimRecord::COLUMNS)
        .context("writing CSV header")?;
    for (i, rec) in records.iter().enumerate() {
        writer
            .serialize(rec)
            .with_context(|| format!("writing CSV row {i}"))?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}

/// Write `records` to `path`.
pub fn export_to_path(path: &Path, records: &[&ClaimRecord]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_csv(file, records)?;
    log::info!("Exported {} claims to {}", records.len(), path.display());
    Ok(())
}

/// Write `records` into `dir` under a timestamped name and return the path.
pub fn export_to_dir(dir: &Path, records: &[&ClaimRecord], generated_at: NaiveDateTime) -> Result<PathBuf> {
    let path = dir.join(export_file_name(generated_at));
    export_to_path(&path, records)?;
    Ok(path)
}
