//! The classifier seam

use crate::error::{Result, RiskError};

/// A trained classifier mapping an aligned feature vector to an ordinal class
///
/// Implementations are loaded once per substance and shared read-only across
/// requests.
pub trait Classifier: Send + Sync {
    /// Human-readable model name
    fn name(&self) -> &str;

    /// Predict the ordinal class of one feature vector in schema order
    fn predict(&self, features: &[f64]) -> Result<i64>;

    /// Number of features the classifier expects, when known
    fn n_features(&self) -> Option<usize> {
        None
    }
}

/// Reject vectors whose width differs from what the classifier expects
pub fn check_width(classifier: &dyn Classifier, features: &[f64]) -> Result<()> {
    match classifier.n_features() {
        Some(expected) if expected != features.len() => Err(RiskError::Model(format!(
            "{} expects {expected} features, got {}",
            classifier.name(),
            features.len()
        ))),
        _ => Ok(()),
    }
}
