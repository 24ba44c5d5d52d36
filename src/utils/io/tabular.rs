//! Reading encoded training corpora from CSV and Parquet files

use std::fs::File;
use std::io::Seek;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use arrow::compute::concat_batches;
use arrow::csv::reader::{Format, ReaderBuilder};
use arrow::datatypes::SchemaRef;
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::{Result, RiskError};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Default batch size for reading tabular files
pub const DEFAULT_BATCH_SIZE: usize = 8192;

/// Number of CSV records sampled for schema inference
pub const CSV_INFERENCE_RECORDS: usize = 1000;

/// Supported tabular file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Comma separated values with a header row
    Csv,
    /// Apache Parquet
    Parquet,
}

impl TableFormat {
    /// Detect the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Ok(Self::Csv),
            Some(ext) if ext.eq_ignore_ascii_case("parquet") => Ok(Self::Parquet),
            _ => Err(RiskError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Unsupported table format: {}", path.display()),
            ))),
        }
    }
}

/// Read a CSV or Parquet file into a single record batch
pub fn read_table(path: &Path) -> Result<RecordBatch> {
    let start = Instant::now();
    log_operation_start("Reading table", path);

    let (schema, batches) = match TableFormat::from_path(path)? {
        TableFormat::Csv => read_csv(path)?,
        TableFormat::Parquet => read_parquet(path)?,
    };
    let batch = concat_batches(&schema, &batches)?;

    log_operation_complete("read", path, batch.num_rows(), Some(start.elapsed()));
    Ok(batch)
}

/// Read a CSV file with a header row, inferring column types
pub fn read_csv(path: &Path) -> Result<(SchemaRef, Vec<RecordBatch>)> {
    let mut file = File::open(path)?;
    let format = Format::default().with_header(true);
    let (schema, _) = format.infer_schema(&mut file, Some(CSV_INFERENCE_RECORDS))?;
    file.rewind()?;

    let schema = Arc::new(schema);
    let reader = ReaderBuilder::new(Arc::clone(&schema))
        .with_format(format)
        .with_batch_size(DEFAULT_BATCH_SIZE)
        .build(file)?;
    let batches = reader.collect::<std::result::Result<Vec<_>, ArrowError>>()?;

    Ok((schema, batches))
}

/// Read every row group of a Parquet file
pub fn read_parquet(path: &Path) -> Result<(SchemaRef, Vec<RecordBatch>)> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = Arc::clone(builder.schema());
    let reader = builder.with_batch_size(DEFAULT_BATCH_SIZE).build()?;
    let batches = reader.collect::<std::result::Result<Vec<_>, ArrowError>>()?;

    Ok((schema, batches))
}
