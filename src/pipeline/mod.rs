//! Orchestration from raw request rows to dual risk predictions

pub mod artifacts;
pub mod response;

use rayon::prelude::*;

pub use artifacts::{ArtifactState, Artifacts, SubstanceArtifacts};
pub use response::{
    PredictionRequest, PredictionResponse, PredictionResult, SubstancePrediction,
    UNAVAILABLE_LABEL, UNMAPPED_LABEL,
};

use crate::config::PipelineConfig;
use crate::encoding::{FeatureFrame, RiskTier, encode_records};
use crate::error::Result;
use crate::rules::{RuleEngine, RuleSet};
use crate::schema::{SchemaAligner, SubstanceSplitter};
use crate::survey::{Cell, NormalizedRecord, RawResponse, ResponseNormalizer, Substance};

/// Ordinal reported for respondents the classifier is not consulted for
pub const DEFAULT_MODEL_CODE: i64 = 0;

/// Classifier side of an assessment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelOutcome {
    /// Ordinal per respondent; [`DEFAULT_MODEL_CODE`] where it was not consulted
    Codes(Vec<i64>),
    /// The substance's artifacts failed to load
    Unavailable(String),
}

/// Expert tiers and classifier outcome of one substance, per respondent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstanceAssessment {
    /// Rule-assigned tiers
    pub expert: Vec<RiskTier>,
    /// Classifier ordinals, or why there are none
    pub model: ModelOutcome,
}

impl SubstanceAssessment {
    /// Labels of one respondent
    #[must_use]
    pub fn prediction(&self, row: usize) -> SubstancePrediction {
        let expert = self.expert[row];
        match &self.model {
            ModelOutcome::Codes(codes) => SubstancePrediction::new(expert, codes[row]),
            ModelOutcome::Unavailable(reason) => SubstancePrediction::unavailable(expert, reason),
        }
    }
}

/// End-to-end risk assessment of survey responses
pub struct RiskPipeline {
    artifacts: Artifacts,
    cannabis_rules: RuleSet,
    psilocybin_rules: RuleSet,
    aligner: SchemaAligner,
}

impl RiskPipeline {
    /// Create a pipeline with the default rule sets
    #[must_use]
    pub fn new(artifacts: Artifacts, min_class_support: usize) -> Self {
        Self {
            artifacts,
            cannabis_rules: RuleSet::cannabis(),
            psilocybin_rules: RuleSet::psilocybin(),
            aligner: SchemaAligner::new(min_class_support),
        }
    }

    /// Load artifacts as configured and build a pipeline around them
    #[must_use]
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(Artifacts::load(config), config.min_class_support)
    }

    /// Replace the rule set of a substance
    #[must_use]
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        match rules.substance() {
            Substance::Cannabis => self.cannabis_rules = rules,
            Substance::Psilocybin => self.psilocybin_rules = rules,
        }
        self
    }

    /// Loaded artifacts
    #[must_use]
    pub const fn artifacts(&self) -> &Artifacts {
        &self.artifacts
    }

    /// Rule set of a substance
    #[must_use]
    pub const fn rules(&self, substance: Substance) -> &RuleSet {
        match substance {
            Substance::Cannabis => &self.cannabis_rules,
            Substance::Psilocybin => &self.psilocybin_rules,
        }
    }

    /// Predict both substances for every row of a request.
    ///
    /// A substance whose artifacts are unavailable still gets its expert tier;
    /// only its model entry is marked unavailable.
    pub fn predict(&self, rows: &[Vec<Cell>]) -> Result<Vec<PredictionResult>> {
        let responses = RawResponse::from_rows(rows)?;
        let records = ResponseNormalizer.normalize_all(&responses);
        let frame = encode_records(&records)?;
        let (cannabis_frame, psilocybin_frame) = SubstanceSplitter.split(&frame);

        let cannabis = self.assess(Substance::Cannabis, &records, &cannabis_frame)?;
        let psilocybin = self.assess(Substance::Psilocybin, &records, &psilocybin_frame)?;

        Ok((0..records.len())
            .map(|i| PredictionResult {
                cannabis: cannabis.prediction(i),
                psilocybin: psilocybin.prediction(i),
            })
            .collect())
    }

    /// Run the rules and, where the substance is available and the assigned
    /// tier has enough training support, the classifier for one substance
    pub fn assess(
        &self,
        substance: Substance,
        records: &[NormalizedRecord],
        frame: &FeatureFrame,
    ) -> Result<SubstanceAssessment> {
        let expert = RuleEngine.assign(self.rules(substance), records);

        let artifacts = match self.artifacts.get(substance) {
            Ok(artifacts) => artifacts,
            Err(err) => {
                log::debug!("{substance}: serving expert tiers only: {err}");
                return Ok(SubstanceAssessment {
                    expert,
                    model: ModelOutcome::Unavailable(err.to_string()),
                });
            }
        };
        let schema = artifacts.schema();
        let supported = self.aligner.select_supported(&expert, schema);

        let mut model = vec![DEFAULT_MODEL_CODE; records.len()];
        if supported.is_empty() {
            log::debug!("{substance}: no respondent with a supported tier, classifier skipped");
            return Ok(SubstanceAssessment {
                expert,
                model: ModelOutcome::Codes(model),
            });
        }

        let aligned = self.aligner.align(frame, schema)?;
        let classifier = artifacts.classifier();
        let predictions = supported
            .par_iter()
            .map(|&row| {
                let features = aligned.row_values(row)?;
                Ok((row, classifier.predict(&features)?))
            })
            .collect::<Result<Vec<(usize, i64)>>>()?;

        for (row, code) in predictions {
            model[row] = code;
        }

        log::debug!(
            "{substance}: classifier consulted for {} of {} respondents",
            supported.len(),
            records.len()
        );
        Ok(SubstanceAssessment {
            expert,
            model: ModelOutcome::Codes(model),
        })
    }
}
