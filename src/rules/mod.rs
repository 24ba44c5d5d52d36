//! Expert-system risk rules evaluated on normalized survey answers
//!
//! Each substance has a [`RuleSet`] with one predicate per tier. The
//! [`RuleEngine`] applies them stepwise, so the first matching tier in
//! low → medium → high order wins.

pub mod cannabis;
pub mod engine;
pub mod psilocybin;

use std::fmt;

pub use engine::RuleEngine;

use crate::encoding::RiskTier;
use crate::encoding::transform::parse_binary;
use crate::error::Result;
use crate::survey::{NormalizedRecord, Question, Substance};

/// A boolean predicate over one respondent's answers
pub trait RiskRule: Send + Sync {
    /// Name used when reporting evaluation failures
    fn name(&self) -> &str;

    /// Whether the rule holds for the respondent
    fn evaluate(&self, record: &NormalizedRecord) -> Result<bool>;
}

/// A rule backed by a closure
pub struct FnRule<F> {
    name: String,
    predicate: F,
}

impl<F> FnRule<F>
where
    F: Fn(&NormalizedRecord) -> Result<bool> + Send + Sync,
{
    /// Wrap a closure as a named rule
    pub fn new(name: impl Into<String>, predicate: F) -> Self {
        Self {
            name: name.into(),
            predicate,
        }
    }
}

impl<F> RiskRule for FnRule<F>
where
    F: Fn(&NormalizedRecord) -> Result<bool> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, record: &NormalizedRecord) -> Result<bool> {
        (self.predicate)(record)
    }
}

impl<F> fmt::Debug for FnRule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRule").field("name", &self.name).finish()
    }
}

/// The low, medium and high predicates of one substance
pub struct RuleSet {
    substance: Substance,
    low: Box<dyn RiskRule>,
    medium: Box<dyn RiskRule>,
    high: Box<dyn RiskRule>,
}

impl RuleSet {
    /// Assemble a rule set from its three predicates
    #[must_use]
    pub fn new(
        substance: Substance,
        low: Box<dyn RiskRule>,
        medium: Box<dyn RiskRule>,
        high: Box<dyn RiskRule>,
    ) -> Self {
        Self {
            substance,
            low,
            medium,
            high,
        }
    }

    /// Default cannabis rules
    #[must_use]
    pub fn cannabis() -> Self {
        cannabis::rules()
    }

    /// Default psilocybin rules
    #[must_use]
    pub fn psilocybin() -> Self {
        psilocybin::rules()
    }

    /// Default rules for a substance
    #[must_use]
    pub fn for_substance(substance: Substance) -> Self {
        match substance {
            Substance::Cannabis => Self::cannabis(),
            Substance::Psilocybin => Self::psilocybin(),
        }
    }

    /// Substance these rules assess
    #[must_use]
    pub const fn substance(&self) -> Substance {
        self.substance
    }

    /// Tiers paired with their rules, in evaluation order
    pub fn steps(&self) -> [(RiskTier, &dyn RiskRule); 3] {
        [
            (RiskTier::Low, self.low.as_ref()),
            (RiskTier::Medium, self.medium.as_ref()),
            (RiskTier::High, self.high.as_ref()),
        ]
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("substance", &self.substance)
            .field("low", &self.low.name())
            .field("medium", &self.medium.name())
            .field("high", &self.high.name())
            .finish()
    }
}

/// Conditions treated as severe for both substances
pub(crate) const SEVERE_CONDITIONS: &[&str] = &[
    "Psychosis",
    "Paranoia",
    "Schizophrenia",
    "Bipolar Disorder (I, II)",
];

/// Family history entries that raise the risk of a psychotic episode
pub(crate) const SEVERE_FAMILY_HISTORY: &[&str] =
    &["Psychosis", "Schizophrenia", "Bipolar Disorder (I, II)"];

/// Yes/no answer as a boolean; `No data` counts as no
pub(crate) fn answered_yes(record: &NormalizedRecord, question: Question) -> Result<bool> {
    parse_binary(question.label(), record.get(question))
}

/// Whether a multi-select answer includes any of `options`
pub(crate) fn has_any(record: &NormalizedRecord, question: Question, options: &[&str]) -> bool {
    options.iter().any(|option| record.has_option(question, option))
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::survey::{Cell, NormalizedRecord, Question, RawResponse, ResponseNormalizer};

    /// Record with every answer blank except the given ones
    pub fn record(answers: &[(Question, &str)]) -> NormalizedRecord {
        let mut row = vec![Cell::Null; Question::all().len()];
        for (question, answer) in answers {
            row[question.index()] = Cell::from(*answer);
        }
        let raw = RawResponse::from_row(&row).unwrap();
        ResponseNormalizer.normalize(&raw)
    }
}
