//! Alignment of per-substance frames to a frozen training schema

use std::sync::Arc;

use arrow::array::{Array, ArrayRef};
use arrow::compute::cast;
use itertools::Itertools;

use crate::encoding::{FeatureFrame, FeatureName, RiskTier, false_array};
use crate::error::Result;
use crate::schema::training::TrainingSchema;

/// Minimum number of training examples a tier needs before the classifier is
/// consulted for respondents assigned to it
pub const DEFAULT_MIN_CLASS_SUPPORT: usize = 2;

/// Reconciles an encoded frame with the columns a classifier was trained on
#[derive(Debug, Clone, Copy)]
pub struct SchemaAligner {
    min_class_support: usize,
}

impl Default for SchemaAligner {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_CLASS_SUPPORT)
    }
}

impl SchemaAligner {
    /// Create an aligner with a class-support threshold
    #[must_use]
    pub const fn new(min_class_support: usize) -> Self {
        Self { min_class_support }
    }

    /// Class-support threshold
    #[must_use]
    pub const fn min_class_support(&self) -> usize {
        self.min_class_support
    }

    /// Conform `frame` to `schema`.
    ///
    /// Missing features are synthesized as `false` cast to the schema type,
    /// present ones are cast, everything is reordered to schema order and
    /// columns the schema does not know are dropped. Aligning an aligned
    /// frame returns it unchanged.
    pub fn align(&self, frame: &FeatureFrame, schema: &TrainingSchema) -> Result<FeatureFrame> {
        let num_rows = frame.num_rows();
        let mut aligned = FeatureFrame::new(num_rows);
        let mut missing = 0usize;

        for field in schema.features().fields() {
            let name = field.name().as_str();
            let target_type = field.data_type();

            let column: ArrayRef = match frame.column(name) {
                Some(source) if source.data_type() == target_type => Arc::clone(source),
                Some(source) => cast(source, target_type)?,
                None => {
                    missing += 1;
                    cast(&false_array(num_rows), target_type)?
                }
            };
            aligned.insert(FeatureName::from(name), column)?;
        }

        let extras = frame
            .names()
            .filter(|name| schema.features().index_of(name.as_str()).is_err())
            .collect_vec();
        if !extras.is_empty() {
            log::debug!(
                "{} alignment dropped {} unknown features: {}",
                schema.substance(),
                extras.len(),
                extras.iter().join(", ")
            );
        }
        if missing > 0 {
            log::debug!(
                "{} alignment filled {missing} missing features with false",
                schema.substance()
            );
        }

        Ok(aligned)
    }

    /// Whether the classifier may be consulted for a respondent of this tier
    #[must_use]
    pub fn is_supported(&self, tier: RiskTier, schema: &TrainingSchema) -> bool {
        tier != RiskTier::Unknown && schema.class_support(tier.code()) >= self.min_class_support
    }

    /// Indices of the respondents whose tier has enough training support
    #[must_use]
    pub fn select_supported(&self, tiers: &[RiskTier], schema: &TrainingSchema) -> Vec<usize> {
        tiers
            .iter()
            .enumerate()
            .filter(|(i, tier)| {
                let supported = self.is_supported(**tier, schema);
                if !supported {
                    log::debug!(
                        "{} respondent {i} excluded: tier '{tier}' has support {}",
                        schema.substance(),
                        schema.class_support(tier.code())
                    );
                }
                supported
            })
            .map(|(i, _)| i)
            .collect()
    }
}
