//! Request and response bodies

use serde::{Deserialize, Serialize};

use crate::encoding::{RiskLevelEncoder, RiskTier};
use crate::survey::{Cell, Substance};

/// Label rendered for classifier codes outside the tier table
pub const UNMAPPED_LABEL: &str = "None";

/// Model label of a substance whose artifacts failed to load
pub const UNAVAILABLE_LABEL: &str = "Unavailable";

/// Prediction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// One row of answers per respondent, in question order
    pub data_to_predict: Vec<Vec<Cell>>,
}

/// Expert-system and classifier labels for one substance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstancePrediction {
    /// Tier assigned by the rules
    #[serde(rename = "expert-system")]
    pub expert_system: String,
    /// Tier predicted by the classifier
    pub model: String,
    /// Why the classifier could not be consulted for this substance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubstancePrediction {
    /// Render an expert tier and a classifier code
    #[must_use]
    pub fn new(expert: RiskTier, model_code: i64) -> Self {
        Self {
            expert_system: expert.label().to_string(),
            model: RiskLevelEncoder
                .decode(model_code)
                .unwrap_or(UNMAPPED_LABEL)
                .to_string(),
            error: None,
        }
    }

    /// Render an expert tier for a substance without a classifier
    #[must_use]
    pub fn unavailable(expert: RiskTier, reason: &str) -> Self {
        Self {
            expert_system: expert.label().to_string(),
            model: UNAVAILABLE_LABEL.to_string(),
            error: Some(reason.to_string()),
        }
    }
}

/// Dual prediction for one respondent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Cannabis labels
    #[serde(rename = "risk-cannabis")]
    pub cannabis: SubstancePrediction,
    /// Psilocybin labels
    #[serde(rename = "risk-psilocybin")]
    pub psilocybin: SubstancePrediction,
}

impl PredictionResult {
    /// Labels of one substance
    #[must_use]
    pub const fn substance(&self, substance: Substance) -> &SubstancePrediction {
        match substance {
            Substance::Cannabis => &self.cannabis,
            Substance::Psilocybin => &self.psilocybin,
        }
    }
}

/// A single object for one respondent, an array otherwise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionResponse {
    /// One respondent
    Single(PredictionResult),
    /// Several respondents, in request order
    Batch(Vec<PredictionResult>),
}

impl From<Vec<PredictionResult>> for PredictionResponse {
    fn from(mut results: Vec<PredictionResult>) -> Self {
        if results.len() == 1 {
            if let Some(single) = results.pop() {
                return Self::Single(single);
            }
        }
        Self::Batch(results)
    }
}
