//! Loading of per-substance training schemas and classifiers

use std::sync::Arc;
use std::time::Instant;

use crate::config::{PipelineConfig, SubstanceConfig};
use crate::error::{Result, RiskError};
use crate::model::{Classifier, TreeEnsemble};
use crate::schema::{TrainingCorpus, TrainingSchema};
use crate::survey::Substance;
use crate::utils::logging::log_substance_unavailable;

/// Schema and classifier of one substance
#[derive(Clone)]
pub struct SubstanceArtifacts {
    schema: Arc<TrainingSchema>,
    classifier: Arc<dyn Classifier>,
    corpus: Option<Arc<TrainingCorpus>>,
}

impl SubstanceArtifacts {
    /// Pair a schema with a classifier
    pub fn new(schema: Arc<TrainingSchema>, classifier: Arc<dyn Classifier>) -> Result<Self> {
        if let Some(expected) = classifier
            .n_features()
            .filter(|n| *n != schema.num_features())
        {
            return Err(RiskError::SchemaLoad {
                substance: schema.substance(),
                reason: format!(
                    "classifier '{}' expects {expected} features, training schema has {}",
                    classifier.name(),
                    schema.num_features()
                ),
            });
        }
        Ok(Self {
            schema,
            classifier,
            corpus: None,
        })
    }

    /// Load the corpus and model configured for a substance
    pub fn load(config: &SubstanceConfig, min_class_support: usize) -> Result<Self> {
        let start = Instant::now();
        let substance = config.substance;
        let as_load_error = |err: RiskError| match err {
            err @ RiskError::SchemaLoad { .. } => err,
            other => RiskError::SchemaLoad {
                substance,
                reason: other.to_string(),
            },
        };

        let corpus = TrainingCorpus::load(
            substance,
            &config.training_data,
            &config.target_column,
            min_class_support,
        )
        .map_err(as_load_error)?;
        let model = TreeEnsemble::load(&config.model).map_err(as_load_error)?;

        let mut artifacts = Self::new(Arc::clone(corpus.schema()), Arc::new(model))?;
        artifacts.corpus = Some(Arc::new(corpus));

        log::info!("{substance} artifacts ready in {:?}", start.elapsed());
        Ok(artifacts)
    }

    /// Frozen training schema
    #[must_use]
    pub fn schema(&self) -> &TrainingSchema {
        &self.schema
    }

    /// Classifier
    #[must_use]
    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    /// Training corpus, when loaded from disk
    #[must_use]
    pub fn corpus(&self) -> Option<&TrainingCorpus> {
        self.corpus.as_deref()
    }
}

/// Load outcome of one substance
#[derive(Clone)]
pub enum ArtifactState {
    /// Artifacts loaded
    Ready(SubstanceArtifacts),
    /// Loading failed; requests for the substance are refused
    Unavailable(String),
}

impl ArtifactState {
    fn from_result(substance: Substance, result: Result<SubstanceArtifacts>) -> Self {
        match result {
            Ok(artifacts) => Self::Ready(artifacts),
            Err(err) => {
                let reason = err.to_string();
                log_substance_unavailable(substance, &reason);
                Self::Unavailable(reason)
            }
        }
    }
}

/// Artifacts of both substances
#[derive(Clone)]
pub struct Artifacts {
    cannabis: ArtifactState,
    psilocybin: ArtifactState,
}

impl Artifacts {
    /// Build from already loaded states
    #[must_use]
    pub const fn new(cannabis: ArtifactState, psilocybin: ArtifactState) -> Self {
        Self {
            cannabis,
            psilocybin,
        }
    }

    /// Load both substances in parallel. Never fails: a substance whose
    /// artifacts cannot be loaded is marked unavailable.
    #[must_use]
    pub fn load(config: &PipelineConfig) -> Self {
        let min = config.min_class_support;
        let (cannabis, psilocybin) = rayon::join(
            || SubstanceArtifacts::load(&config.cannabis, min),
            || SubstanceArtifacts::load(&config.psilocybin, min),
        );

        Self {
            cannabis: ArtifactState::from_result(Substance::Cannabis, cannabis),
            psilocybin: ArtifactState::from_result(Substance::Psilocybin, psilocybin),
        }
    }

    /// Load state of a substance
    #[must_use]
    pub const fn state(&self, substance: Substance) -> &ArtifactState {
        match substance {
            Substance::Cannabis => &self.cannabis,
            Substance::Psilocybin => &self.psilocybin,
        }
    }

    /// Artifacts of a substance, or why they are unavailable
    pub fn get(&self, substance: Substance) -> Result<&SubstanceArtifacts> {
        match self.state(substance) {
            ArtifactState::Ready(artifacts) => Ok(artifacts),
            ArtifactState::Unavailable(reason) => Err(RiskError::SubstanceUnavailable {
                substance,
                reason: reason.clone(),
            }),
        }
    }

    /// Whether a substance can be served
    #[must_use]
    pub fn is_available(&self, substance: Substance) -> bool {
        matches!(self.state(substance), ArtifactState::Ready(_))
    }
}
