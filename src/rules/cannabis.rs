//! Default cannabis rules

use crate::encoding::FREQUENCY;
use crate::error::Result;
use crate::rules::{
    FnRule, RuleSet, SEVERE_CONDITIONS, SEVERE_FAMILY_HISTORY, answered_yes, has_any,
};
use crate::survey::{NormalizedRecord, Question, Substance};

/// Negative effects that suggest cannabis is already poorly tolerated
const WARNING_EFFECTS: &[&str] = &["Paranoia", "Anxiety"];

/// Frequency rank; daily and several times a week rank 1 and 2
fn frequency_rank(record: &NormalizedRecord) -> Result<i64> {
    FREQUENCY.encode(
        Question::CannabisFrequency.label(),
        record.get(Question::CannabisFrequency),
    )
}

fn is_heavy_use(rank: i64) -> bool {
    (1..=2).contains(&rank)
}

fn severe_condition(record: &NormalizedRecord) -> bool {
    has_any(record, Question::Condition, SEVERE_CONDITIONS)
}

fn low(record: &NormalizedRecord) -> Result<bool> {
    Ok(!answered_yes(record, Question::CannabisDependency)?
        && !answered_yes(record, Question::CannabisAbuse)?
        && !severe_condition(record)
        && !is_heavy_use(frequency_rank(record)?))
}

fn medium(record: &NormalizedRecord) -> Result<bool> {
    if answered_yes(record, Question::CannabisDependency)? || severe_condition(record) {
        return Ok(false);
    }
    Ok(answered_yes(record, Question::CannabisAbuse)?
        || is_heavy_use(frequency_rank(record)?)
        || has_any(record, Question::FamilyHistory, SEVERE_FAMILY_HISTORY)
        || has_any(record, Question::CannabisNegativeEffects, WARNING_EFFECTS))
}

fn high(record: &NormalizedRecord) -> Result<bool> {
    Ok(answered_yes(record, Question::CannabisDependency)? || severe_condition(record))
}

/// Cannabis rule set
pub fn rules() -> RuleSet {
    RuleSet::new(
        Substance::Cannabis,
        Box::new(FnRule::new("cannabis low risk", low)),
        Box::new(FnRule::new("cannabis medium risk", medium)),
        Box::new(FnRule::new("cannabis high risk", high)),
    )
}
