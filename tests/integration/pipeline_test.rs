use psyrisk::pipeline::{Artifacts, UNAVAILABLE_LABEL, UNMAPPED_LABEL};
use psyrisk::{PredictionResponse, Question, RiskError, RiskPipeline, RiskTier, Substance};

use crate::utils::{blank_row, fixture_config, row, temp_dir};

#[test]
fn test_blank_respondent_with_unsupported_low_tier() {
    // Low risk has a single training example in both corpora
    let dir = temp_dir("unsupported");
    let config = fixture_config(
        dir.path(),
        [&[1, 2, 2, 3, 3, 0], &[1, 2, 2, 3, 3]],
        [&[2, 3], &[2, 3]],
        [3, 3],
    );
    let pipeline = RiskPipeline::from_config(&config);

    let results = pipeline.predict(&[blank_row()]).unwrap();
    assert_eq!(results.len(), 1);
    for substance in Substance::all() {
        let prediction = results[0].substance(substance);
        assert_eq!(prediction.expert_system, RiskTier::Low.label());
        assert_eq!(prediction.model, RiskTier::Unknown.label());
    }
}

#[test]
fn test_classifier_runs_for_supported_tiers() {
    let dir = temp_dir("supported");
    let config = fixture_config(
        dir.path(),
        [&[1, 1, 1, 2, 2, 3, 3], &[1, 1, 2, 2, 3, 3]],
        [&[1, 2, 3], &[1, 2, 3]],
        [2, 3],
    );
    let pipeline = RiskPipeline::from_config(&config);

    let results = pipeline
        .predict(&[
            blank_row(),
            row(&[
                (Question::CannabisFrequency, "Daily"),
                (Question::PsilocybinDependency, "Yes"),
            ]),
        ])
        .unwrap();

    assert_eq!(results[0].cannabis.expert_system, "Low Risk");
    assert_eq!(results[0].cannabis.model, "Medium Risk");
    assert_eq!(results[0].psilocybin.expert_system, "Low Risk");
    assert_eq!(results[0].psilocybin.model, "High Risk");

    assert_eq!(results[1].cannabis.expert_system, "Medium Risk");
    assert_eq!(results[1].psilocybin.expert_system, "High Risk");
    assert_eq!(results[1].psilocybin.model, "High Risk");
}

#[test]
fn test_classes_outside_the_table_render_as_none() {
    let dir = temp_dir("unmapped");
    let config = fixture_config(
        dir.path(),
        [&[1, 1, 3, 3], &[1, 1, 3, 3]],
        [&[1, 9], &[1, 3]],
        [9, 1],
    );
    let pipeline = RiskPipeline::from_config(&config);

    let results = pipeline.predict(&[blank_row()]).unwrap();
    assert_eq!(results[0].cannabis.model, UNMAPPED_LABEL);
    assert_eq!(results[0].psilocybin.model, "Low Risk");
}

#[test]
fn test_response_json_shape() {
    let dir = temp_dir("json");
    let config = fixture_config(dir.path(), [&[1, 1], &[1, 1]], [&[1], &[1]], [1, 1]);
    let pipeline = RiskPipeline::from_config(&config);

    let single = PredictionResponse::from(pipeline.predict(&[blank_row()]).unwrap());
    let value = serde_json::to_value(&single).unwrap();
    assert_eq!(value["risk-cannabis"]["expert-system"], "Low Risk");
    assert_eq!(value["risk-psilocybin"]["model"], "Low Risk");

    let batch = PredictionResponse::from(pipeline.predict(&[blank_row(), blank_row()]).unwrap());
    assert!(serde_json::to_value(&batch).unwrap().is_array());
}

#[test]
fn test_unavailable_substance_keeps_the_other_served() {
    let dir = temp_dir("unavailable");
    let mut config = fixture_config(
        dir.path(),
        [&[1, 1, 2, 2], &[1, 1, 2, 2]],
        [&[1, 2], &[1, 2]],
        [2, 2],
    );
    config.psilocybin.model = dir.path().join("missing.json");

    let artifacts = Artifacts::load(&config);
    assert!(artifacts.is_available(Substance::Cannabis));
    assert!(!artifacts.is_available(Substance::Psilocybin));
    assert!(matches!(
        artifacts.get(Substance::Psilocybin),
        Err(RiskError::SubstanceUnavailable {
            substance: Substance::Psilocybin,
            ..
        })
    ));

    let pipeline = RiskPipeline::new(artifacts, config.min_class_support);
    let results = pipeline.predict(&[blank_row()]).unwrap();

    assert_eq!(results[0].cannabis.expert_system, "Low Risk");
    assert_eq!(results[0].cannabis.model, "Medium Risk");
    assert_eq!(results[0].cannabis.error, None);

    let psilocybin = &results[0].psilocybin;
    assert_eq!(psilocybin.expert_system, "Low Risk");
    assert_eq!(psilocybin.model, UNAVAILABLE_LABEL);
    assert!(
        psilocybin
            .error
            .as_deref()
            .is_some_and(|reason| reason.contains("Psilocybin"))
    );
}

#[test]
fn test_model_width_must_match_schema() {
    let dir = temp_dir("width");
    let config = fixture_config(dir.path(), [&[1, 1], &[1, 1]], [&[1], &[1]], [1, 1]);
    let model = serde_json::json!({
        "name": "narrow",
        "classes": [1],
        "n_features": 2,
        "learning_rate": 0.1,
        "init": [0.0],
        "stages": []
    });
    std::fs::write(&config.cannabis.model, model.to_string()).unwrap();

    let artifacts = Artifacts::load(&config);
    assert!(!artifacts.is_available(Substance::Cannabis));
    assert!(artifacts.is_available(Substance::Psilocybin));
}

#[test]
fn test_empty_request_is_malformed() {
    let dir = temp_dir("empty");
    let config = fixture_config(dir.path(), [&[1, 1], &[1, 1]], [&[1], &[1]], [1, 1]);
    let pipeline = RiskPipeline::from_config(&config);
    assert!(matches!(
        pipeline.predict(&[]),
        Err(RiskError::MalformedInput(_))
    ));
}
