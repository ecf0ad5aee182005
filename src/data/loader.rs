use std::fs::File;
use std::io::Read;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Date32Type, Float64Type};
use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::error::DataFormatError;
use super::model::{ClaimRecord, ClaimsDataset};

/// Columns every source table must provide (exact, case-sensitive names).
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "accepted_date",
    "diagnosis",
    "claimstatus",
    "claimsubmitted",
    "claimpaid",
    "percentagepaid",
    "member_id",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the claims table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with at least the [`REQUIRED_COLUMNS`]
/// * `.json`    – `[{ "member_id": ..., "accepted_date": ..., ... }, ...]`
/// * `.parquet` – one column per field; dates as Date32/Date64/Timestamp or text
/// * `.xlsx`    – first worksheet, header in the first row; dates as Excel
///   date cells or text
pub fn load_file(path: &Path) -> Result<ClaimsDataset, DataFormatError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => read_csv(open(path)?),
        "json" => read_json(open(path)?),
        "parquet" | "pq" => load_parquet(path),
        "xlsx" | "xlsm" | "xls" => load_workbook(path),
        other => Err(DataFormatError::UnsupportedExtension(other.to_string())),
    }?;

    match dataset.date_span() {
        Some((first, last)) => log::info!(
            "Loaded {} claims from {} ({first} to {last})",
            dataset.len(),
            path.display()
        ),
        None => log::warn!("{} contains no claim records", path.display()),
    }
    Ok(dataset)
}

fn open(path: &Path) -> Result<File, DataFormatError> {
    File::open(path).map_err(|source| DataFormatError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Shared cell parsing
// ---------------------------------------------------------------------------

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse an `accepted_date` cell. Any time-of-day part is dropped.
pub fn parse_accepted_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(text, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

fn date_cell(row: usize, text: &str) -> Result<NaiveDate, DataFormatError> {
    parse_accepted_date(text).ok_or_else(|| DataFormatError::InvalidDate {
        row,
        value: text.to_string(),
    })
}

fn number_cell(row: usize, column: &str, text: &str) -> Result<f64, DataFormatError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DataFormatError::MissingValue {
            row,
            column: column.to_string(),
        });
    }
    finite(row, column, text.parse::<f64>().ok(), text)
}

fn finite(row: usize, column: &str, value: Option<f64>, raw: &str) -> Result<f64, DataFormatError> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(DataFormatError::InvalidNumber {
            row,
            column: column.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Positions of the required columns in a tabular source.
struct ColumnIndex {
    accepted_date: usize,
    diagnosis: usize,
    claimstatus: usize,
    claimsubmitted: usize,
    claimpaid: usize,
    percentagepaid: usize,
    member_id: usize,
}

impl ColumnIndex {
    fn locate(position: impl Fn(&str) -> Option<usize>) -> Result<Self, DataFormatError> {
        let find = |column: &str| {
            position(column).ok_or_else(|| DataFormatError::MissingColumn {
                column: column.to_string(),
            })
        };
        Ok(ColumnIndex {
            accepted_date: find("accepted_date")?,
            diagnosis: find("diagnosis")?,
            claimstatus: find("claimstatus")?,
            claimsubmitted: find("claimsubmitted")?,
            claimpaid: find("claimpaid")?,
            percentagepaid: find("percentagepaid")?,
            member_id: find("member_id")?,
        })
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read a CSV table. Columns beyond the required ones are ignored.
pub fn read_csv<R: Read>(source: R) -> Result<ClaimsDataset, DataFormatError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);
    let headers = reader.headers()?.clone();
    let columns = ColumnIndex::locate(|name| headers.iter().position(|h| h == name))?;

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        records.push(ClaimRecord::new(
            cell(columns.member_id),
            cell(columns.diagnosis),
            cell(columns.claimstatus),
            date_cell(row, cell(columns.accepted_date))?,
            number_cell(row, "claimsubmitted", cell(columns.claimsubmitted))?,
            number_cell(row, "claimpaid", cell(columns.claimpaid))?,
            number_cell(row, "percentagepaid", cell(columns.percentagepaid))?,
        ));
    }

    Ok(ClaimsDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "member_id": 1001,
///     "diagnosis": "Influenza",
///     "claimstatus": "Accepted",
///     "accepted_date": "2020-01-15",
///     "claimsubmitted": 1500000,
///     "claimpaid": 1200000,
///     "percentagepaid": 0.8
///   },
///   ...
/// ]
/// ```
///
/// `accepted_date` may also be epoch milliseconds, the Pandas default.
pub fn read_json<R: Read>(source: R) -> Result<ClaimsDataset, DataFormatError> {
    let root: JsonValue = serde_json::from_reader(source)?;
    let rows = root
        .as_array()
        .ok_or_else(|| DataFormatError::Layout("expected a top-level JSON array".into()))?;

    let mut records = Vec::with_capacity(rows.len());
    for (row, value) in rows.iter().enumerate() {
        let obj = value
            .as_object()
            .ok_or_else(|| DataFormatError::Layout(format!("row {row} is not a JSON object")))?;
        records.push(json_record(row, obj)?);
    }

    Ok(ClaimsDataset::from_records(records))
}

fn json_record(row: usize, obj: &Map<String, JsonValue>) -> Result<ClaimRecord, DataFormatError> {
    let accepted_date = match json_field(obj, "accepted_date")? {
        JsonValue::String(s) => date_cell(row, s)?,
        JsonValue::Number(n) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| DataFormatError::InvalidDate {
                row,
                value: n.to_string(),
            })?,
        other => {
            return Err(DataFormatError::InvalidDate {
                row,
                value: other.to_string(),
            })
        }
    };

    Ok(ClaimRecord::new(
        json_text(json_field(obj, "member_id")?),
        json_text(json_field(obj, "diagnosis")?),
        json_text(json_field(obj, "claimstatus")?),
        accepted_date,
        json_number(row, "claimsubmitted", json_field(obj, "claimsubmitted")?)?,
        json_number(row, "claimpaid", json_field(obj, "claimpaid")?)?,
        json_number(row, "percentagepaid", json_field(obj, "percentagepaid")?)?,
    ))
}

fn json_field<'a>(
    obj: &'a Map<String, JsonValue>,
    column: &str,
) -> Result<&'a JsonValue, DataFormatError> {
    obj.get(column).ok_or_else(|| DataFormatError::MissingColumn {
        column: column.to_string(),
    })
}

fn json_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

fn json_number(row: usize, column: &str, val: &JsonValue) -> Result<f64, DataFormatError> {
    match val {
        JsonValue::Number(n) => finite(row, column, n.as_f64(), &n.to_string()),
        JsonValue::String(s) => number_cell(row, column, s),
        JsonValue::Null => Err(DataFormatError::MissingValue {
            row,
            column: column.to_string(),
        }),
        other => finite(row, column, None, &other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by Pandas (`df.to_parquet()`) or Polars.
///
/// Text columns may be any type castable to Utf8, numeric columns any type
/// castable to Float64.
fn load_parquet(path: &Path) -> Result<ClaimsDataset, DataFormatError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    // Checked against the file schema so a file without row groups is still rejected.
    let schema = builder.schema().clone();
    let columns = ColumnIndex::locate(|name| schema.index_of(name).ok())?;
    let reader = builder.build()?;

    let mut records = Vec::new();
    let mut offset = 0;

    for batch_result in reader {
        let batch = batch_result?;

        let member_id = cast(batch.column(columns.member_id), &DataType::Utf8)?;
        let diagnosis = cast(batch.column(columns.diagnosis), &DataType::Utf8)?;
        let claimstatus = cast(batch.column(columns.claimstatus), &DataType::Utf8)?;
        let submitted = cast(batch.column(columns.claimsubmitted), &DataType::Float64)?;
        let paid = cast(batch.column(columns.claimpaid), &DataType::Float64)?;
        let percentage = cast(batch.column(columns.percentagepaid), &DataType::Float64)?;
        let dates = DateColumn::new(batch.column(columns.accepted_date))?;

        for i in 0..batch.num_rows() {
            let row = offset + i;
            records.push(ClaimRecord::new(
                text_at(&member_id, i),
                text_at(&diagnosis, i),
                text_at(&claimstatus, i),
                dates.value(row, i)?,
                number_at(&submitted, row, i, "claimsubmitted")?,
                number_at(&paid, row, i, "claimpaid")?,
                number_at(&percentage, row, i, "percentagepaid")?,
            ));
        }
        offset += batch.num_rows();
    }

    Ok(ClaimsDataset::from_records(records))
}

// -- Parquet / Arrow helpers --

/// `accepted_date` column either as text to parse or as days since epoch.
enum DateColumn {
    Text(ArrayRef),
    Days(ArrayRef),
}

impl DateColumn {
    fn new(col: &ArrayRef) -> Result<Self, DataFormatError> {
        match col.data_type() {
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
                Ok(DateColumn::Text(cast(col, &DataType::Utf8)?))
            }
            _ => Ok(DateColumn::Days(cast(col, &DataType::Date32)?)),
        }
    }

    fn value(&self, row: usize, i: usize) -> Result<NaiveDate, DataFormatError> {
        match self {
            DateColumn::Text(arr) => {
                if arr.is_null(i) {
                    return Err(missing(row, "accepted_date"));
                }
                date_cell(row, arr.as_string::<i32>().value(i))
            }
            DateColumn::Days(arr) => {
                if arr.is_null(i) {
                    return Err(missing(row, "accepted_date"));
                }
                let days = arr.as_primitive::<Date32Type>();
                days.value_as_date(i)
                    .ok_or_else(|| DataFormatError::InvalidDate {
                        row,
                        value: days.value(i).to_string(),
                    })
            }
        }
    }
}

fn missing(row: usize, column: &str) -> DataFormatError {
    DataFormatError::MissingValue {
        row,
        column: column.to_string(),
    }
}

fn text_at(col: &ArrayRef, i: usize) -> String {
    if col.is_null(i) {
        return String::new();
    }
    col.as_string::<i32>().value(i).to_string()
}

fn number_at(col: &ArrayRef, row: usize, i: usize, column: &str) -> Result<f64, DataFormatError> {
    if col.is_null(i) {
        return Err(missing(row, column));
    }
    let value = col.as_primitive::<Float64Type>().value(i);
    finite(row, column, Some(value), &value.to_string())
}

// ---------------------------------------------------------------------------
// Excel loader
// ---------------------------------------------------------------------------

static EMPTY_CELL: Data = Data::Empty;

/// Load the first worksheet of an Excel workbook.
fn load_workbook(path: &Path) -> Result<ClaimsDataset, DataFormatError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DataFormatError::Layout("workbook has no worksheets".into()))??;
    read_sheet(&range)
}

/// Read a worksheet whose first row holds the column names.
pub fn read_sheet(range: &Range<Data>) -> Result<ClaimsDataset, DataFormatError> {
    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|cells| cells.iter().map(sheet_text).collect())
        .unwrap_or_default();
    let columns = ColumnIndex::locate(|name| headers.iter().position(|h| h.trim() == name))?;

    let mut records = Vec::new();
    for (row, cells) in rows.enumerate() {
        let cell = |idx: usize| cells.get(idx).unwrap_or(&EMPTY_CELL);
        records.push(ClaimRecord::new(
            sheet_text(cell(columns.member_id)),
            sheet_text(cell(columns.diagnosis)),
            sheet_text(cell(columns.claimstatus)),
            sheet_date(row, cell(columns.accepted_date))?,
            sheet_number(row, "claimsubmitted", cell(columns.claimsubmitted))?,
            sheet_number(row, "claimpaid", cell(columns.claimpaid))?,
            sheet_number(row, "percentagepaid", cell(columns.percentagepaid))?,
        ));
    }

    Ok(ClaimsDataset::from_records(records))
}

fn sheet_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn sheet_date(row: usize, cell: &Data) -> Result<NaiveDate, DataFormatError> {
    match cell {
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|dt| dt.date())
            .ok_or_else(|| DataFormatError::InvalidDate {
                row,
                value: cell.to_string(),
            }),
        Data::DateTimeIso(s) | Data::String(s) => date_cell(row, s),
        Data::Empty => Err(missing(row, "accepted_date")),
        other => Err(DataFormatError::InvalidDate {
            row,
            value: other.to_string(),
        }),
    }
}

fn sheet_number(row: usize, column: &str, cell: &Data) -> Result<f64, DataFormatError> {
    match cell {
        Data::Float(v) => finite(row, column, Some(*v), &v.to_string()),
        Data::Int(v) => Ok(*v as f64),
        Data::String(s) => number_cell(row, column, s),
        Data::Empty => Err(missing(row, column)),
        other => finite(row, column, None, &other.to_string()),
    }
}
