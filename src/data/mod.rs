/// Data layer: core types, loading, cleaning, and export.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (or a typed LoadError)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ cleaner   │  fill → normalize → strip → dedupe, plus before/after reports
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  Dataset → cleaned_dataset.csv, reports → JSON
///   └──────────┘
/// ```

pub mod cleaner;
pub mod export;
pub mod loader;
pub mod model;

pub use cleaner::{clean, clean_with_progress, CleanOutcome, Stage};
pub use loader::{load_file, read_csv, LoadError};
pub use model::{Column, ColumnKind, Dataset, MissingValueReport, Value};
