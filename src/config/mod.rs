//! Configuration for the risk pipeline.
//!
//! Every value has a default and can be overridden through an environment
//! variable. [`PipelineConfig::from_lookup`] takes any variable source so that
//! overrides can be exercised without touching the process environment.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Result, RiskError};
use crate::schema::DEFAULT_MIN_CLASS_SUPPORT;
use crate::survey::Substance;

/// Seed used for holdout splits when none is configured
pub const DEFAULT_RANDOM_STATE: u64 = 42;

/// Share of the corpus held out for evaluation
pub const DEFAULT_HOLDOUT_FRACTION: f64 = 0.2;

/// Artifacts and settings of one substance
#[derive(Debug, Clone, PartialEq)]
pub struct SubstanceConfig {
    /// Substance these settings belong to
    pub substance: Substance,
    /// Seed for the holdout split
    pub random_state: u64,
    /// Target column of the training corpus
    pub target_column: String,
    /// Encoded training corpus (`.csv` or `.parquet`)
    pub training_data: PathBuf,
    /// Exported classifier
    pub model: PathBuf,
}

impl SubstanceConfig {
    /// Default settings for a substance
    #[must_use]
    pub fn new(substance: Substance) -> Self {
        let slug = substance.name().to_lowercase();
        Self {
            substance,
            random_state: DEFAULT_RANDOM_STATE,
            target_column: format!("{} Risk", substance.name()),
            training_data: PathBuf::from(format!("data/{slug}_training.csv")),
            model: PathBuf::from(format!("models/{slug}_model.json")),
        }
    }

    fn apply(&mut self, lookup: &impl Fn(&str) -> Option<String>) -> Result<()> {
        let prefix = self.substance.name().to_uppercase();

        if let Some(seed) = parse_var(lookup, &format!("RANDOM_STATE_{prefix}"))? {
            self.random_state = seed;
        }
        if let Some(target) = lookup(&format!("TARGET_COL_{prefix}")) {
            self.target_column = target;
        }
        if let Some(path) = lookup(&format!("{prefix}_TRAINING_DATA")) {
            self.training_data = PathBuf::from(path);
        }
        if let Some(path) = lookup(&format!("{prefix}_MODEL")) {
            self.model = PathBuf::from(path);
        }
        Ok(())
    }
}

/// Configuration for [`RiskPipeline`](crate::pipeline::RiskPipeline)
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Cannabis settings
    pub cannabis: SubstanceConfig,
    /// Psilocybin settings
    pub psilocybin: SubstanceConfig,
    /// Training examples a tier needs before the classifier is consulted
    pub min_class_support: usize,
    /// Share of the corpus held out by `evaluate`
    pub holdout_fraction: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cannabis: SubstanceConfig::new(Substance::Cannabis),
            psilocybin: SubstanceConfig::new(Substance::Psilocybin),
            min_class_support: DEFAULT_MIN_CLASS_SUPPORT,
            holdout_fraction: DEFAULT_HOLDOUT_FRACTION,
        }
    }
}

impl PipelineConfig {
    /// Read overrides from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        config.cannabis.apply(&lookup)?;
        config.psilocybin.apply(&lookup)?;

        if let Some(min) = parse_var(&lookup, "MIN_CLASS_SUPPORT")? {
            config.min_class_support = min;
        }
        if let Some(fraction) = parse_var::<f64>(&lookup, "HOLDOUT_FRACTION")? {
            if !(fraction > 0.0 && fraction < 1.0) {
                return Err(RiskError::Config(format!(
                    "HOLDOUT_FRACTION must be between 0 and 1, got {fraction}"
                )));
            }
            config.holdout_fraction = fraction;
        }

        Ok(config)
    }

    /// Settings of one substance
    #[must_use]
    pub const fn substance(&self, substance: Substance) -> &SubstanceConfig {
        match substance {
            Substance::Cannabis => &self.cannabis,
            Substance::Psilocybin => &self.psilocybin,
        }
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| RiskError::Config(format!("{key}='{raw}': {e}")))
        })
        .transpose()
}

impl fmt::Display for SubstanceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.substance)?;
        writeln!(f, "  Target column: {}", self.target_column)?;
        writeln!(f, "  Training data: {}", self.training_data.display())?;
        writeln!(f, "  Model: {}", self.model.display())?;
        writeln!(f, "  Random state: {}", self.random_state)
    }
}

impl fmt::Display for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pipeline Configuration:")?;
        write!(f, "{}", self.cannabis)?;
        write!(f, "{}", self.psilocybin)?;
        writeln!(f, "Min class support: {}", self.min_class_support)?;
        writeln!(f, "Holdout fraction: {}", self.holdout_fraction)
    }
}
