/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → ClaimsDataset (derived year / month / month_year)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  cache    │  write-once, shared read-only
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  date range + status + diagnosis → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────────────────────────────────┐
///   │ summary · aggregate · stats · table · export │
///   └──────────────────────────────────────────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod range;
pub mod report;
pub mod stats;
pub mod summary;
pub mod table;
