//! File input utilities

pub mod tabular;

pub use tabular::{DEFAULT_BATCH_SIZE, TableFormat, read_csv, read_parquet, read_table};
