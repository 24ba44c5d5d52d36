use psyrisk::encoding::FeatureName;
use psyrisk::{
    Question, RawResponse, ResponseNormalizer, SchemaAligner, Substance, SubstanceSplitter,
    TrainingCorpus, encode_records,
};

use crate::utils::{corpus_features, row, temp_dir, write_corpus};

fn encoded_frame() -> psyrisk::FeatureFrame {
    let rows = vec![
        row(&[
            (Question::CannabisFrequency, "Weekly"),
            (Question::PsilocybinFrequency, "Monthly"),
            (Question::DoseType, "Microdose"),
            (Question::Condition, "Anxiety;Other"),
            (Question::PsilocybinNegativeEffects, "Nausea"),
        ]),
        row(&[(Question::CannabisPositiveEffects, "Improved sleep")]),
    ];
    let responses = RawResponse::from_rows(&rows).unwrap();
    encode_records(&ResponseNormalizer.normalize_all(&responses)).unwrap()
}

#[test]
fn test_substance_isolation() {
    let (cannabis, psilocybin) = SubstanceSplitter.split(&encoded_frame());

    for name in cannabis.names().map(FeatureName::as_str) {
        for marker in ["Psilocybin", "Other", "No data", "Dose Type", "No Reason"] {
            assert!(!name.contains(marker), "cannabis frame kept {name}");
        }
    }
    for name in psilocybin.names().map(FeatureName::as_str) {
        for marker in ["Cannabis", "Other", "No data", "No Reason"] {
            assert!(!name.contains(marker), "psilocybin frame kept {name}");
        }
    }

    assert!(cannabis.contains("Cannabis Frequency"));
    assert!(cannabis.contains("Condition_Anxiety"));
    assert!(psilocybin.contains("Dose Type_Microdose"));
    assert!(psilocybin.contains("Psilocybin Negative Effects_Nausea"));
}

#[test]
fn test_alignment_to_loaded_schema() {
    let dir = temp_dir("align");
    let path = dir.path().join("cannabis.csv");
    write_corpus(&path, Substance::Cannabis, &[1, 1, 2, 2, 3, 3]);
    let corpus = TrainingCorpus::load(Substance::Cannabis, &path, "Cannabis Risk", 2).unwrap();
    let schema = corpus.schema();

    let (cannabis, _) = SubstanceSplitter.split(&encoded_frame());
    let aligner = SchemaAligner::default();
    let aligned = aligner.align(&cannabis, schema).unwrap();

    let names: Vec<&str> = aligned.names().map(FeatureName::as_str).collect();
    assert_eq!(names, corpus_features(Substance::Cannabis).to_vec());
    assert!(!aligned.contains("Cannabis Risk"));
    assert_eq!(aligned.row_values(0).unwrap(), vec![3.0, 0.0, 1.0, 0.0]);

    let again = aligner.align(&aligned, schema).unwrap();
    assert_eq!(
        again.to_record_batch().unwrap(),
        aligned.to_record_batch().unwrap()
    );
}

#[test]
fn test_corpus_types_follow_the_file() {
    let dir = temp_dir("types");
    let path = dir.path().join("psilocybin.csv");
    write_corpus(&path, Substance::Psilocybin, &[0, 1, 1, 3]);
    let corpus =
        TrainingCorpus::load(Substance::Psilocybin, &path, "Psilocybin Risk", 2).unwrap();

    assert_eq!(corpus.num_rows(), 2);
    assert_eq!(corpus.schema().classes(), vec![1, 3]);
    assert_eq!(corpus.schema().class_support(3), 1);
    assert_eq!(corpus.schema().num_features(), 4);
}
