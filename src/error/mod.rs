//! Error handling for the risk prediction pipeline.

use std::io;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

use crate::survey::Substance;

/// Errors raised while encoding responses or serving predictions
#[derive(Debug, thiserror::Error)]
pub enum RiskError {
    /// A request row does not have the shape of a survey response
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A categorical value outside its fixed table's domain
    #[error("Unmapped value '{value}' for field '{field}'")]
    UnmappedValue {
        /// Feature or question the value belongs to
        field: String,
        /// The offending value
        value: String,
    },

    /// A rule predicate could not be evaluated
    #[error("Predicate failure in {rule}: {reason}")]
    PredicateFailure {
        /// Name of the failing rule
        rule: String,
        /// Why evaluation failed
        reason: String,
    },

    /// Training schema or classifier could not be loaded
    #[error("Failed to load {substance} artifacts: {reason}")]
    SchemaLoad {
        /// Substance whose artifacts failed to load
        substance: Substance,
        /// Description of the failure
        reason: String,
    },

    /// A request touched a substance whose artifacts are not available
    #[error("{substance} predictions are unavailable: {reason}")]
    SubstanceUnavailable {
        /// Substance that cannot be served
        substance: Substance,
        /// Load failure that made it unavailable
        reason: String,
    },

    /// The classifier rejected its input or produced no class
    #[error("Model error: {0}")]
    Model(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error opening or reading a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error processing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RiskError {
    /// Create an unmapped value error
    pub fn unmapped(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::UnmappedValue {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a predicate failure error
    pub fn predicate(rule: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PredicateFailure {
            rule: rule.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, RiskError>;
