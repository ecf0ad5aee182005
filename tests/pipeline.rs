use std::fs;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    ArrayRef, Date32Array, Date64Array, Float64Array, Int64Array, StringArray, TimestampMillisecondArray,
};
use arrow::datatypes::{DataType, Date32Type, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::ArrowWriter;

use claims_dashboard::data::cache::DatasetCache;
use claims_dashboard::data::error::DataFormatError;
use claims_dashboard::data::export::export_to_dir;
use claims_dashboard::data::filter::{FilterCriteria, FilteredView, Selection};
use claims_dashboard::data::loader::{load_file, REQUIRED_COLUMNS};
use claims_dashboard::data::range::{DateSelection, Preset};
use claims_dashboard::data::report::DashboardReport;
use claims_dashboard::data::table::PageSize;

const CLAIMS_CSV: &str = "\
member_id,diagnosis,claimstatus,accepted_date,claimsubmitted,claimpaid,percentagepaid
M1,Dengue Fever,Accepted,2016-03-04,1000000,1000000,1.0
M2,Typhoid,Rejected,2016-11-20,500000,0,0.0
M3,Dengue Fever,Accepted,2020-01-15,2000000,2000000,1.0
M4,Asthma,Partially Accepted,2020-02-10,1000000,600000,0.6
M5,Dengue Fever,Rejected,2020-03-31,400000,0,0.0
M6,Asthma,Accepted,2020-04-01,300000,300000,1.0
M7,Typhoid,Partially Accepted,2020-12-31,800000,400000,0.5
";

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn csv_load_filter_report_and_export() {
    let dir = tempfile::tempdir().unwrap();
    let source = write(dir.path(), "clean.csv", CLAIMS_CSV);

    let dataset = load_file(&source).unwrap();
    assert_eq!(dataset.len(), 7);
    assert_eq!(dataset.years(), &[2016, 2020]);
    assert_eq!(dataset.statuses(), &["Accepted", "Rejected", "Partially Accepted"]);

    let criteria = FilterCriteria::new(Preset::Q1Of2020.resolve(&dataset));
    let report = DashboardReport::compute(&dataset, &criteria);
    assert_eq!(report.summary.total_claims, 3);
    assert_eq!(report.summary.total_submitted, 3_400_000.0);
    assert_eq!(report.summary.total_paid, 2_600_000.0);
    assert_eq!(report.monthly.len(), 3);
    assert_eq!(report.top_diagnoses[0].label, "Dengue Fever");
    assert_eq!(report.top_diagnoses[0].count, 2);

    // Month-end boundary is inclusive, the day after is not.
    let dates: Vec<_> = report.view.iter().map(|r| r.accepted_date).collect();
    assert!(dates.contains(&date(2020, 3, 31)));
    assert!(!dates.contains(&date(2020, 4, 1)));

    let out = export_to_dir(dir.path(), report.view.records(), date(2024, 5, 6).and_hms_opt(7, 8, 9).unwrap()).unwrap();
    assert_eq!(out.file_name().unwrap(), "claims_filtered_20240506_070809.csv");

    // The export carries derived columns but still loads as a claims table.
    let reloaded = load_file(&out).unwrap();
    assert_eq!(reloaded.len(), 3);
    let back = FilteredView::apply(&reloaded, &FilterCriteria::new(Preset::All.resolve(&reloaded)));
    assert_eq!(
        back.iter().map(|r| r.member_id.as_str()).collect::<Vec<_>>(),
        report.view.iter().map(|r| r.member_id.as_str()).collect::<Vec<_>>()
    );
}

#[test]
fn status_diagnosis_and_custom_range_combine() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = load_file(&write(dir.path(), "clean.csv", CLAIMS_CSV)).unwrap();

    let range = DateSelection::Custom {
        start_year: 2016,
        start_month: 1,
        end_year: 2020,
        end_month: 2,
    }
    .resolve(&dataset)
    .unwrap();
    let criteria = FilterCriteria::new(range)
        .with_status(Selection::Only("Accepted".into()))
        .with_diagnosis(Selection::Only("Dengue Fever".into()));
    let view = FilteredView::apply(&dataset, &criteria);
    assert_eq!(
        view.iter().map(|r| r.member_id.as_str()).collect::<Vec<_>>(),
        ["M1", "M3"]
    );

    let bad = DateSelection::Custom {
        start_year: 2020,
        start_month: 13,
        end_year: 2020,
        end_month: 12,
    };
    assert!(bad.resolve(&dataset).is_err());
}

#[test]
fn search_and_pages_over_the_filtered_view() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = load_file(&write(dir.path(), "clean.csv", CLAIMS_CSV)).unwrap();

    let criteria = FilterCriteria::new(Preset::Year2020.resolve(&dataset))
        .with_search("typhoid")
        .with_page(PageSize::Ten, 1);
    let report = DashboardReport::compute(&dataset, &criteria);
    let page = report.table_page(&criteria);
    assert_eq!(page.total, 1);
    assert_eq!(page.rows[0].member_id, "M7");
    assert_eq!(page.max_page, 1);

    let beyond = report.table_page(&criteria.clone().with_page(PageSize::Ten, 2));
    assert!(beyond.rows.is_empty());
}

#[test]
fn every_required_column_is_enforced() {
    let dir = tempfile::tempdir().unwrap();
    let mut lines = CLAIMS_CSV.lines();
    let header: Vec<&str> = lines.next().unwrap().split(',').collect();
    let first_row: Vec<&str> = lines.next().unwrap().split(',').collect();

    for missing in REQUIRED_COLUMNS {
        let keep: Vec<usize> = (0..header.len()).filter(|&i| header[i] != missing).collect();
        let pick = |cells: &[&str]| keep.iter().map(|&i| cells[i]).collect::<Vec<_>>().join(",");
        let contents = format!("{}\n{}\n", pick(&header), pick(&first_row));
        let path = write(dir.path(), &format!("without_{missing}.csv"), &contents);

        match load_file(&path) {
            Err(DataFormatError::MissingColumn { column }) => assert_eq!(column, missing),
            other => panic!("expected missing '{missing}', got {other:?}"),
        }
    }
}

#[test]
fn json_and_csv_sources_agree() {
    let dir = tempfile::tempdir().unwrap();
    let json = r#"[
        {"member_id": "M1", "diagnosis": "Dengue Fever", "claimstatus": "Accepted",
         "accepted_date": "2016-03-04", "claimsubmitted": 1000000, "claimpaid": 1000000, "percentagepaid": 1.0},
        {"member_id": "M2", "diagnosis": "Typhoid", "claimstatus": "Rejected",
         "accepted_date": 1479600000000, "claimsubmitted": 500000, "claimpaid": 0, "percentagepaid": 0.0}
    ]"#;
    let from_json = load_file(&write(dir.path(), "claims.json", json)).unwrap();
    let csv: String = CLAIMS_CSV.lines().take(3).map(|l| format!("{l}\n")).collect();
    let from_csv = load_file(&write(dir.path(), "claims.csv", &csv)).unwrap();

    assert_eq!(from_json.records(), from_csv.records());
}

#[test]
fn parquet_with_date32_and_integer_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("claims.parquet");

    let schema = Arc::new(Schema::new(vec![
        Field::new("member_id", DataType::Int64, false),
        Field::new("diagnosis", DataType::Utf8, false),
        Field::new("claimstatus", DataType::Utf8, false),
        Field::new("accepted_date", DataType::Date32, false),
        Field::new("claimsubmitted", DataType::Int64, false),
        Field::new("claimpaid", DataType::Int64, false),
        Field::new("percentagepaid", DataType::Float64, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(vec![1001, 1002])),
            Arc::new(StringArray::from(vec!["Asthma", "Typhoid"])),
            Arc::new(StringArray::from(vec!["Accepted", "Partially Accepted"])),
            Arc::new(Date32Array::from(vec![
                Date32Type::from_naive_date(date(2020, 7, 1)),
                Date32Type::from_naive_date(date(2016, 8, 31)),
            ])),
            Arc::new(Int64Array::from(vec![100_000, 200_000])),
            Arc::new(Int64Array::from(vec![100_000, 50_000])),
            Arc::new(Float64Array::from(vec![1.0, 0.25])),
        ],
    )
    .unwrap();
    let mut writer = ArrowWriter::try_new(fs::File::create(&path).unwrap(), schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let dataset = load_file(&path).unwrap();
    assert_eq!(dataset.len(), 2);
    let second = &dataset.records()[1];
    assert_eq!(second.member_id, "1002");
    assert_eq!(second.accepted_date, date(2016, 8, 31));
    assert_eq!(second.claimpaid, 50_000.0);
    assert_eq!(dataset.years(), &[2016, 2020]);
}

/// Two-row claims file whose `accepted_date` column is `dates`.
fn write_parquet_with_dates(path: &Path, dates: ArrayRef) {
    let schema = Arc::new(Schema::new(vec![
        Field::new("member_id", DataType::Utf8, false),
        Field::new("diagnosis", DataType::Utf8, false),
        Field::new("claimstatus", DataType::Utf8, false),
        Field::new("accepted_date", dates.data_type().clone(), true),
        Field::new("claimsubmitted", DataType::Float64, false),
        Field::new("claimpaid", DataType::Float64, false),
        Field::new("percentagepaid", DataType::Float64, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(vec!["M1", "M2"])),
            Arc::new(StringArray::from(vec!["Asthma", "Typhoid"])),
            Arc::new(StringArray::from(vec!["Accepted", "Rejected"])),
            dates,
            Arc::new(Float64Array::from(vec![100.0, 200.0])),
            Arc::new(Float64Array::from(vec![100.0, 0.0])),
            Arc::new(Float64Array::from(vec![1.0, 0.0])),
        ],
    )
    .unwrap();
    let mut writer = ArrowWriter::try_new(fs::File::create(path).unwrap(), schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
}

fn epoch_millis(d: NaiveDate, hour: u32) -> i64 {
    d.and_hms_opt(hour, 30, 0).unwrap().and_utc().timestamp_millis()
}

#[test]
fn parquet_timestamp_date64_and_text_dates() {
    let dir = tempfile::tempdir().unwrap();
    let (first, second) = (date(2020, 3, 31), date(2016, 1, 1));

    let columns: [(&str, ArrayRef); 3] = [
        (
            "timestamps.parquet",
            Arc::new(TimestampMillisecondArray::from(vec![
                epoch_millis(first, 23),
                epoch_millis(second, 8),
            ])) as ArrayRef,
        ),
        (
            "date64.parquet",
            Arc::new(Date64Array::from(vec![epoch_millis(first, 0), epoch_millis(second, 0)])) as ArrayRef,
        ),
        (
            "text.parquet",
            Arc::new(StringArray::from(vec!["2020-03-31 23:30:00", "2016/01/01"])) as ArrayRef,
        ),
    ];

    for (name, dates) in columns {
        let path = dir.path().join(name);
        write_parquet_with_dates(&path, dates);
        let dataset = load_file(&path).unwrap();
        let loaded: Vec<_> = dataset.records().iter().map(|r| r.accepted_date).collect();
        assert_eq!(loaded, [first, second], "{name}");
    }
}

#[test]
fn parquet_null_date_is_a_missing_value() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nulls.parquet");
    write_parquet_with_dates(
        &path,
        Arc::new(Date32Array::from(vec![Some(Date32Type::from_naive_date(date(2020, 1, 1))), None])),
    );

    match load_file(&path) {
        Err(DataFormatError::MissingValue { row, column }) => {
            assert_eq!(row, 1);
            assert_eq!(column, "accepted_date");
        }
        other => panic!("expected a missing accepted_date, got {other:?}"),
    }
}

#[test]
fn parquet_without_rows_still_needs_every_column() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.parquet");
    let schema = Arc::new(Schema::new(vec![Field::new("unrelated", DataType::Utf8, true)]));
    let writer = ArrowWriter::try_new(fs::File::create(&path).unwrap(), schema, None).unwrap();
    writer.close().unwrap();

    match load_file(&path) {
        Err(DataFormatError::MissingColumn { column }) => assert_eq!(column, "accepted_date"),
        other => panic!("expected a missing column, got {other:?}"),
    }
}

#[test]
fn cache_reads_the_source_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "clean.csv", CLAIMS_CSV);
    let cache = DatasetCache::new();

    let first = cache.load(&path).unwrap();
    fs::remove_file(&path).unwrap();
    let second = cache.load(&path).unwrap();

    assert!(std::ptr::eq(first, second));
    assert_eq!(second.len(), 7);
}
