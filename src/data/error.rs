use std::path::PathBuf;

use thiserror::Error;

/// Fatal problems with the source table. Raised only at load time; no
/// partial dataset is ever returned alongside one of these.
#[derive(Debug, Error)]
pub enum DataFormatError {
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Excel: {0}")]
    Excel(#[from] calamine::Error),

    #[error("Arrow: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("unexpected layout: {0}")]
    Layout(String),

    #[error("missing required column '{column}'")]
    MissingColumn { column: String },

    #[error("row {row}: '{value}' is not a valid accepted_date")]
    InvalidDate { row: usize, value: String },

    #[error("row {row}, column '{column}': '{value}' is not a number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: missing value in column '{column}'")]
    MissingValue { row: usize, column: String },
}

/// A custom year/month selection that does not name a real calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("{year}-{month:02} is not a valid calendar month")]
    InvalidMonth { year: i32, month: u32 },
}
