//! Default psilocybin rules

use crate::encoding::{FREQUENCY, MACRODOSE_SESSIONS};
use crate::encoding::ordinal::encode_rating;
use crate::error::Result;
use crate::rules::{
    FnRule, RuleSet, SEVERE_CONDITIONS, SEVERE_FAMILY_HISTORY, answered_yes, has_any,
};
use crate::survey::{NormalizedRecord, Question, Substance};

/// Lowest treatment rating still read as a good previous experience
const MIN_GOOD_RATING: i64 = 3;

const DIFFICULT_EXPERIENCE: &str = "Difficult experience";

const MACRODOSE: &str = "Macrodose";

/// Psilocybin carries a family-history component on top of the respondent's
/// own diagnosis
fn severe(record: &NormalizedRecord) -> bool {
    has_any(record, Question::Condition, SEVERE_CONDITIONS)
        || has_any(record, Question::FamilyHistory, SEVERE_FAMILY_HISTORY)
}

fn good_previous_treatment(record: &NormalizedRecord) -> Result<bool> {
    let rating = encode_rating(
        Question::TreatmentRating.label(),
        record.get(Question::TreatmentRating),
    )?;
    Ok(rating == 0 || rating >= MIN_GOOD_RATING)
}

/// Frequent macrodosing, or many or unspecified macrodose sessions
fn intensive_macrodosing(record: &NormalizedRecord) -> Result<bool> {
    let sessions = MACRODOSE_SESSIONS.encode(
        Question::MacrodoseSessions.label(),
        record.get(Question::MacrodoseSessions),
    )?;
    let frequency = FREQUENCY.encode(
        Question::PsilocybinFrequency.label(),
        record.get(Question::PsilocybinFrequency),
    )?;
    let macrodose = record.get(Question::DoseType) == MACRODOSE;
    Ok(sessions >= 3 || (macrodose && (1..=2).contains(&frequency)))
}

fn low(record: &NormalizedRecord) -> Result<bool> {
    Ok(!answered_yes(record, Question::PsilocybinDependency)?
        && !answered_yes(record, Question::PsilocybinAbuse)?
        && !severe(record)
        && good_previous_treatment(record)?
        && !record.has_option(Question::PsilocybinNegativeEffects, DIFFICULT_EXPERIENCE)
        && !intensive_macrodosing(record)?)
}

fn medium(record: &NormalizedRecord) -> Result<bool> {
    Ok(!answered_yes(record, Question::PsilocybinDependency)? && !severe(record))
}

fn high(record: &NormalizedRecord) -> Result<bool> {
    Ok(answered_yes(record, Question::PsilocybinDependency)? || severe(record))
}

/// Psilocybin rule set
pub fn rules() -> RuleSet {
    RuleSet::new(
        Substance::Psilocybin,
        Box::new(FnRule::new("psilocybin low risk", low)),
        Box::new(FnRule::new("psilocybin medium risk", medium)),
        Box::new(FnRule::new("psilocybin high risk", high)),
    )
}
