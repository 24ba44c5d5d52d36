//! Stepwise tier assignment

use crate::encoding::RiskTier;
use crate::error::RiskError;
use crate::rules::{RiskRule, RuleSet};
use crate::survey::NormalizedRecord;

/// Assigns an expert-system tier to each respondent
///
/// Every respondent starts `Unknown`. The low rule is applied, then the medium
/// rule to respondents still `Unknown`, then the high rule. A rule that cannot
/// be evaluated is logged and leaves the tier as it was.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleEngine;

impl RuleEngine {
    /// Tier of every respondent, in input order
    #[must_use]
    pub fn assign(&self, rules: &RuleSet, records: &[NormalizedRecord]) -> Vec<RiskTier> {
        let mut tiers = vec![RiskTier::Unknown; records.len()];

        for (tier, rule) in rules.steps() {
            for (i, record) in records.iter().enumerate() {
                if tiers[i] != RiskTier::Unknown {
                    continue;
                }
                if self.holds(rule, record, i) {
                    tiers[i] = tier;
                }
            }
        }

        log::debug!("{} expert tiers: {tiers:?}", rules.substance());
        tiers
    }

    /// Tier of a single respondent
    #[must_use]
    pub fn assign_one(&self, rules: &RuleSet, record: &NormalizedRecord) -> RiskTier {
        self.assign(rules, std::slice::from_ref(record))
            .pop()
            .unwrap_or_default()
    }

    fn holds(&self, rule: &dyn RiskRule, record: &NormalizedRecord, row: usize) -> bool {
        match rule.evaluate(record) {
            Ok(holds) => holds,
            Err(err) => {
                let failure = match err {
                    failure @ RiskError::PredicateFailure { .. } => failure,
                    other => RiskError::predicate(rule.name(), other.to_string()),
                };
                log::warn!("Respondent {row}: {failure}");
                false
            }
        }
    }
}
