//! Frozen training schemas and the corpora they are derived from

use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, AsArray, BooleanArray};
use arrow::compute::{cast, filter_record_batch};
use arrow::datatypes::{DataType, Int64Type, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use rustc_hash::FxHashMap;

use crate::encoding::RiskTier;
use crate::error::{Result, RiskError};
use crate::survey::Substance;
use crate::utils::read_table;

/// Ordered feature list a classifier was trained on, plus its target column
/// and the number of training examples per target class
#[derive(Debug, Clone)]
pub struct TrainingSchema {
    substance: Substance,
    target: String,
    features: SchemaRef,
    class_support: FxHashMap<i64, usize>,
}

impl TrainingSchema {
    /// Create a schema from its parts
    #[must_use]
    pub fn new(
        substance: Substance,
        target: impl Into<String>,
        features: SchemaRef,
        class_support: FxHashMap<i64, usize>,
    ) -> Self {
        Self {
            substance,
            target: target.into(),
            features,
            class_support,
        }
    }

    /// Substance the schema belongs to
    #[must_use]
    pub const fn substance(&self) -> Substance {
        self.substance
    }

    /// Name of the target column
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Arrow schema of the feature columns, in training order
    #[must_use]
    pub const fn features(&self) -> &SchemaRef {
        &self.features
    }

    /// Feature names in training order
    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.features.fields().iter().map(|f| f.name().as_str())
    }

    /// Number of features
    #[must_use]
    pub fn num_features(&self) -> usize {
        self.features.fields().len()
    }

    /// Number of training examples labelled with `code`
    #[must_use]
    pub fn class_support(&self, code: i64) -> usize {
        self.class_support.get(&code).copied().unwrap_or(0)
    }

    /// Target classes present in the corpus, ascending
    #[must_use]
    pub fn classes(&self) -> Vec<i64> {
        self.class_support.keys().copied().sorted().collect()
    }
}

/// Encoded training rows of one substance
///
/// Rows labelled `Unknown` and rows of classes with fewer than the minimum
/// number of examples are removed on load, as they were before training.
#[derive(Debug, Clone)]
pub struct TrainingCorpus {
    schema: Arc<TrainingSchema>,
    features: RecordBatch,
    targets: Vec<i64>,
}

impl TrainingCorpus {
    /// Load a corpus from a CSV or Parquet file
    pub fn load(
        substance: Substance,
        path: &Path,
        target: &str,
        min_class_support: usize,
    ) -> Result<Self> {
        let batch = read_table(path)?;
        Self::from_batch(substance, &batch, target, min_class_support)
    }

    /// Build a corpus from an encoded record batch
    pub fn from_batch(
        substance: Substance,
        batch: &RecordBatch,
        target: &str,
        min_class_support: usize,
    ) -> Result<Self> {
        let schema_error = |reason: String| RiskError::SchemaLoad { substance, reason };

        let target_idx = batch
            .schema()
            .index_of(target)
            .map_err(|_| schema_error(format!("target column '{target}' not found")))?;
        let codes = target_codes(target, batch.column(target_idx))?;

        let labelled: Vec<bool> = codes
            .iter()
            .map(|code| code.is_some_and(|c| c != RiskTier::Unknown.code()))
            .collect();

        let mut support: FxHashMap<i64, usize> = FxHashMap::default();
        for (code, _) in codes.iter().zip(&labelled).filter(|(_, keep)| **keep) {
            if let Some(code) = code {
                *support.entry(*code).or_default() += 1;
            }
        }

        let keep: Vec<bool> = codes
            .iter()
            .zip(&labelled)
            .map(|(code, labelled)| {
                *labelled
                    && code
                        .and_then(|c| support.get(&c))
                        .is_some_and(|n| *n >= min_class_support)
            })
            .collect();
        let targets: Vec<i64> = codes
            .iter()
            .zip(&keep)
            .filter(|(_, keep)| **keep)
            .filter_map(|(code, _)| *code)
            .collect();

        if targets.is_empty() {
            return Err(schema_error(format!(
                "no target class has at least {min_class_support} examples"
            )));
        }

        let mut projected = batch.clone();
        projected.remove_column(target_idx);
        let features = filter_record_batch(&projected, &BooleanArray::from(keep))?;

        if let Some(field) = features
            .schema()
            .fields()
            .iter()
            .find(|f| !is_feature_type(f.data_type()))
        {
            return Err(schema_error(format!(
                "feature '{}' has non-numeric type {}",
                field.name(),
                field.data_type()
            )));
        }

        let feature_schema: SchemaRef = Arc::new(Schema::new(
            features
                .schema()
                .fields()
                .iter()
                .map(|f| f.as_ref().clone().with_nullable(false))
                .collect::<Vec<_>>(),
        ));

        log::info!(
            "{substance} training corpus: {} rows, {} features, classes {:?}",
            features.num_rows(),
            feature_schema.fields().len(),
            support.keys().sorted().collect_vec()
        );

        Ok(Self {
            schema: Arc::new(TrainingSchema::new(substance, target, feature_schema, support)),
            features,
            targets,
        })
    }

    /// The frozen schema derived from this corpus
    #[must_use]
    pub fn schema(&self) -> &Arc<TrainingSchema> {
        &self.schema
    }

    /// Feature rows, target column excluded
    #[must_use]
    pub const fn features(&self) -> &RecordBatch {
        &self.features
    }

    /// Target code of every row
    #[must_use]
    pub fn targets(&self) -> &[i64] {
        &self.targets
    }

    /// Number of rows
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.targets.len()
    }
}

fn is_feature_type(data_type: &DataType) -> bool {
    data_type == &DataType::Boolean || data_type.is_integer() || data_type.is_floating()
}

/// Target codes of a column holding either ordinal codes or tier labels
fn target_codes(target: &str, column: &ArrayRef) -> Result<Vec<Option<i64>>> {
    if let Some(labels) = column.as_string_opt::<i32>() {
        return labels
            .iter()
            .map(|label| {
                label
                    .map(|l| {
                        RiskTier::from_label(l)
                            .map(RiskTier::code)
                            .ok_or_else(|| RiskError::unmapped(target, l))
                    })
                    .transpose()
            })
            .collect();
    }

    let codes = cast(column, &DataType::Int64)?;
    Ok(codes.as_primitive::<Int64Type>().iter().collect())
}
