//! Treatment-risk assessment for cannabis and psilocybin survey responses.
//!
//! Raw questionnaire rows are normalized, encoded into classifier features
//! and split per substance. For each substance an expert-system rule set
//! assigns a risk tier and, where that tier is well represented in the
//! training data, a trained classifier predicts one as well.

pub mod config;
pub mod encoding;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod rules;
pub mod schema;
pub mod survey;
pub mod utils;

// Re-export the most common types for easier use
pub use config::{PipelineConfig, SubstanceConfig};
pub use encoding::{FeatureFrame, FeatureName, RiskLevelEncoder, RiskTier, encode_records};
pub use error::{Result, RiskError};
pub use model::{Classifier, TreeEnsemble};
pub use pipeline::{PredictionRequest, PredictionResponse, PredictionResult, RiskPipeline};
pub use rules::{RiskRule, RuleEngine, RuleSet};
pub use schema::{SchemaAligner, SubstanceSplitter, TrainingCorpus, TrainingSchema};
pub use survey::{Cell, NormalizedRecord, Question, RawResponse, ResponseNormalizer, Substance};

// Arrow types
pub use arrow::record_batch::RecordBatch;
