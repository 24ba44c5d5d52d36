use psyrisk::encoding::RiskLevelEncoder;
use psyrisk::rules::FnRule;
use psyrisk::{
    NormalizedRecord, Question, RawResponse, ResponseNormalizer, RiskError, RiskTier, RuleEngine,
    RuleSet, Substance,
};

use crate::utils::{blank_row, row};

fn normalize(rows: &[Vec<psyrisk::Cell>]) -> Vec<NormalizedRecord> {
    ResponseNormalizer.normalize_all(&RawResponse::from_rows(rows).unwrap())
}

type Predicate = fn(&NormalizedRecord) -> psyrisk::Result<bool>;

fn rule(name: &str, holds: Predicate) -> Box<FnRule<Predicate>> {
    Box::new(FnRule::new(name, holds))
}

#[test]
fn test_low_wins_when_every_rule_holds() {
    let rules = RuleSet::new(
        Substance::Cannabis,
        rule("low", |_| Ok(true)),
        rule("medium", |_| Ok(true)),
        rule("high", |_| Ok(true)),
    );
    let tiers = RuleEngine.assign(&rules, &normalize(&[blank_row(), blank_row()]));
    assert_eq!(tiers, vec![RiskTier::Low, RiskTier::Low]);
}

#[test]
fn test_tiers_are_assigned_per_respondent() {
    let rules = RuleSet::new(
        Substance::Psilocybin,
        rule("low", |r| Ok(r.is_no_data(Question::PsilocybinFrequency))),
        rule("medium", |r| Ok(r.get(Question::PsilocybinFrequency) == "Monthly")),
        rule("high", |r| {
            if r.get(Question::PsilocybinFrequency) == "Daily" {
                Err(RiskError::predicate("high", "daily use is not covered"))
            } else {
                Ok(true)
            }
        }),
    );

    let records = normalize(&[
        blank_row(),
        row(&[(Question::PsilocybinFrequency, "Monthly")]),
        row(&[(Question::PsilocybinFrequency, "Weekly")]),
        row(&[(Question::PsilocybinFrequency, "Daily")]),
    ]);
    assert_eq!(
        RuleEngine.assign(&rules, &records),
        vec![RiskTier::Low, RiskTier::Medium, RiskTier::High, RiskTier::Unknown]
    );
}

#[test]
fn test_default_rules() {
    let records = normalize(&[
        blank_row(),
        row(&[
            (Question::CannabisFrequency, "Several times a week"),
            (Question::PsilocybinNegativeEffects, "Difficult experience"),
        ]),
        row(&[
            (Question::CannabisDependency, "Yes"),
            (Question::Condition, "Bipolar Disorder (I, II)"),
        ]),
    ]);

    assert_eq!(
        RuleEngine.assign(&RuleSet::cannabis(), &records),
        vec![RiskTier::Low, RiskTier::Medium, RiskTier::High]
    );
    assert_eq!(
        RuleEngine.assign(&RuleSet::psilocybin(), &records),
        vec![RiskTier::Low, RiskTier::Medium, RiskTier::High]
    );
}

#[test]
fn test_unmapped_answer_degrades_to_later_rules() {
    let records = normalize(&[row(&[(Question::CannabisFrequency, "Hourly")])]);
    // low and medium both need the frequency rank; high does not
    assert_eq!(
        RuleEngine.assign(&RuleSet::cannabis(), &records),
        vec![RiskTier::Unknown]
    );
}

#[test]
fn test_tier_labels_round_trip() {
    let encoder = RiskLevelEncoder;
    for tier in RiskTier::all() {
        assert_eq!(encoder.encode(&tier.to_string()), Some(tier.code()));
        assert_eq!(encoder.decode(tier.code()), Some(tier.label()));
    }
    assert_eq!(encoder.decode(7), None);
}
