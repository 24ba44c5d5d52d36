use arrow::array::{Array, AsArray};
use arrow::datatypes::Int64Type;
use psyrisk::encoding::{PSYCHOSIS_PARANOIA, canonical_name, sanitize_name};
use psyrisk::{
    Question, RawResponse, ResponseNormalizer, RiskError, encode_records, survey::NO_DATA,
};

use crate::utils::{blank_row, row};

fn encode(rows: &[Vec<psyrisk::Cell>]) -> psyrisk::Result<psyrisk::FeatureFrame> {
    let responses = RawResponse::from_rows(rows)?;
    encode_records(&ResponseNormalizer.normalize_all(&responses))
}

#[test]
fn test_multi_select_expansion() {
    let frame = encode(&[
        row(&[(Question::CannabisNegativeEffects, "Anxiety;Paranoia")]),
        row(&[(Question::CannabisNegativeEffects, "Paranoia ; Anxiety")]),
        blank_row(),
    ])
    .unwrap();

    for name in [
        "Cannabis Negative Effects_Anxiety",
        "Cannabis Negative Effects_Paranoia",
    ] {
        let column = frame.boolean(name).unwrap().unwrap();
        assert!(column.value(0) && column.value(1) && !column.value(2));
        assert_eq!(column.null_count(), 0);
    }

    // every other catalog option gets an all-false column
    let field = Question::CannabisNegativeEffects;
    for option in field
        .known_options()
        .iter()
        .filter(|option| !["Anxiety", "Paranoia"].contains(*option))
    {
        let name = format!("{}_{option}", field.label());
        let name = sanitize_name(canonical_name(&name).unwrap_or(name.as_str()));
        let column = frame.boolean(&name).unwrap().unwrap();
        assert_eq!(column.true_count(), 0, "{name}");
        assert_eq!(column.null_count(), 0, "{name}");
    }
}

#[test]
fn test_ordinal_encoding() {
    let frame = encode(&[
        row(&[
            (Question::CannabisFrequency, "Daily"),
            (Question::PsilocybinFrequency, "Yearly"),
            (Question::TreatmentCount, "Two"),
            (Question::MacrodoseSessions, "1-5 single-day sessions"),
        ]),
        blank_row(),
    ])
    .unwrap();

    let ranks = |name: &str| -> Vec<i64> {
        frame
            .column(name)
            .unwrap()
            .as_primitive::<Int64Type>()
            .values()
            .to_vec()
    };
    assert_eq!(ranks("Cannabis Frequency"), vec![1, 0]);
    assert_eq!(ranks("Psilocybin Frequency"), vec![7, 0]);
    assert_eq!(ranks("Treatment Count"), vec![2, 0]);
    assert_eq!(ranks("Macrodose Sessions"), vec![2, 0]);
    assert_eq!(ranks("Treatment Rating"), vec![0, 0]);
}

#[test]
fn test_unmapped_frequency_is_rejected() {
    let err = encode(&[row(&[(Question::CannabisFrequency, "Hourly")])]).unwrap_err();
    match err {
        RiskError::UnmappedValue { field, value } => {
            assert_eq!(field, "Cannabis Frequency");
            assert_eq!(value, "Hourly");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_psychosis_and_paranoia_are_merged() {
    let frame = encode(&[
        row(&[(Question::FamilyHistory, "Paranoia")]),
        row(&[(Question::Condition, "Psychosis;Depression")]),
        row(&[(Question::Condition, "Depression")]),
    ])
    .unwrap();

    let merged = frame.boolean(PSYCHOSIS_PARANOIA).unwrap().unwrap();
    assert!(merged.value(0) && merged.value(1) && !merged.value(2));
    assert!(!frame.contains("Condition_Psychosis"));
    assert!(!frame.contains("Family History_Paranoia"));
}

#[test]
fn test_renamed_option_joins_the_typed_short_label() {
    let frame = encode(&[
        row(&[(Question::Condition, "Bipolar Disorder (I, II)")]),
        row(&[(Question::Condition, "Bipolar Disorder")]),
        row(&[(Question::Condition, "Anxiety")]),
    ])
    .unwrap();

    let bipolar = frame.boolean("Condition_Bipolar Disorder").unwrap().unwrap();
    assert!(bipolar.value(0) && bipolar.value(1) && !bipolar.value(2));
    assert_eq!(
        frame
            .names()
            .filter(|name| name.as_str().starts_with("Condition_Bipolar"))
            .count(),
        1
    );
}

#[test]
fn test_every_feature_is_numeric_after_encoding() {
    let frame = encode(&[row(&[
        (Question::CannabisPurpose, "Medical"),
        (Question::CannabisDependency, "Yes"),
        (Question::TreatmentRating, "4"),
        (Question::Condition, "Bipolar Disorder (I, II)"),
    ])])
    .unwrap();

    assert!(frame.text_columns().is_empty());
    assert!(frame.contains("Cannabis Purpose_Medical"));
    assert!(frame.contains(&format!("Dose Type_{NO_DATA}")));
    assert!(frame.contains("Condition_Bipolar Disorder"));
    assert!(frame.boolean("Cannabis Dependency").unwrap().unwrap().value(0));
    assert!(frame.row_values(0).is_ok());
}

#[test]
fn test_wrong_row_length_is_malformed() {
    let mut short = blank_row();
    short.pop();
    assert!(matches!(encode(&[short]), Err(RiskError::MalformedInput(_))));
}
