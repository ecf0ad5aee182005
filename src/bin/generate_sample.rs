use std::fs::File;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Date32Array, Float64Array, StringArray};
use arrow::datatypes::{DataType, Date32Type, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::ArrowWriter;

use claims_dashboard::data::export::write_csv;
use claims_dashboard::data::model::ClaimRecord;

const CLAIMS_PER_YEAR: usize = 600;
const YEARS: [i32; 2] = [2016, 2020];

const DIAGNOSES: [&str; 14] = [
    "Dengue Fever",
    "Typhoid",
    "Acute Bronchitis",
    "Gastroenteritis",
    "Hypertension",
    "Type 2 Diabetes",
    "Asthma",
    "Appendicitis",
    "Pneumonia",
    "Migraine",
    "Fracture of Forearm",
    "Urinary Tract Infection",
    "Cataract",
    "Otitis Media",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    /// Skewed towards the front of `items`, so a few diagnoses dominate.
    fn pick_skewed<'a>(&mut self, items: &[&'a str]) -> &'a str {
        let u = self.next_f64();
        items[((u * u) * items.len() as f64) as usize % items.len()]
    }
}

fn generate_claim(rng: &mut SimpleRng, year: i32, member: usize) -> Result<ClaimRecord> {
    let month = rng.below(12) as u32 + 1;
    let day = rng.below(28) as u32 + 1;
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .with_context(|| format!("building date {year}-{month}-{day}"))?;

    // Amounts in whole thousands of rupiah, 250k .. ~25M.
    let submitted = ((250.0 + rng.next_f64().powi(3) * 25_000.0).round()) * 1_000.0;
    let roll = rng.next_f64();
    let (status, pct) = if roll < 0.6 {
        ("Accepted", 1.0)
    } else if roll < 0.9 {
        ("Partially Accepted", 0.3 + rng.next_f64() * 0.65)
    } else {
        ("Rejected", 0.0)
    };
    let paid = (submitted * pct).round();
    let percentage = if submitted > 0.0 { paid / submitted } else { 0.0 };

    Ok(ClaimRecord::new(
        format!("M{:05}", member),
        rng.pick_skewed(&DIAGNOSES),
        status,
        date,
        submitted,
        paid,
        percentage,
    ))
}

fn write_parquet(path: &str, records: &[ClaimRecord]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("member_id", DataType::Utf8, false),
        Field::new("diagnosis", DataType::Utf8, false),
        Field::new("claimstatus", DataType::Utf8, false),
        Field::new("accepted_date", DataType::Date32, false),
        Field::new("claimsubmitted", DataType::Float64, false),
        Field::new("claimpaid", DataType::Float64, false),
        Field::new("percentagepaid", DataType::Float64, false),
    ]));

    let text = |f: fn(&ClaimRecord) -> &str| StringArray::from(records.iter().map(f).collect::<Vec<_>>());
    let number = |f: fn(&ClaimRecord) -> f64| Float64Array::from(records.iter().map(f).collect::<Vec<_>>());
    let dates = Date32Array::from(
        records
            .iter()
            .map(|r| Date32Type::from_naive_date(r.accepted_date))
            .collect::<Vec<_>>(),
    );

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(text(|r| r.member_id.as_str())),
            Arc::new(text(|r| r.diagnosis.as_str())),
            Arc::new(text(|r| r.claimstatus.as_str())),
            Arc::new(dates),
            Arc::new(number(|r| r.claimsubmitted)),
            Arc::new(number(|r| r.claimpaid)),
            Arc::new(number(|r| r.percentagepaid)),
        ],
    )
    .context("building record batch")?;

    let file = File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let mut records = Vec::with_capacity(YEARS.len() * CLAIMS_PER_YEAR);
    for year in YEARS {
        for _ in 0..CLAIMS_PER_YEAR {
            let member = rng.below(400) + 1;
            records.push(generate_claim(&mut rng, year, member)?);
        }
    }
    records.sort_by_key(|r| r.accepted_date);

    let parquet_path = "sample_claims.parquet";
    write_parquet(parquet_path, &records)?;

    let csv_path = "sample_claims.csv";
    let file = File::create(csv_path).with_context(|| format!("creating {csv_path}"))?;
    write_csv(file, &records.iter().collect::<Vec<_>>())?;

    println!(
        "Wrote {} claims for {:?} to {parquet_path} and {csv_path}",
        records.len(),
        YEARS
    );
    Ok(())
}
