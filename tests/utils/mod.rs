use std::fs;
use std::path::Path;

use psyrisk::model::TreeEnsemble;
use psyrisk::{Cell, PipelineConfig, Question, Substance};
use tempfile::TempDir;

/// Fresh scratch directory for one test, removed when dropped
#[must_use]
pub fn temp_dir(name: &str) -> TempDir {
    tempfile::Builder::new()
        .prefix(&format!("psyrisk-{name}-"))
        .tempdir()
        .unwrap()
}

/// Feature columns of the fixture corpus of a substance
#[must_use]
pub fn corpus_features(substance: Substance) -> [&'static str; 4] {
    match substance {
        Substance::Cannabis => [
            "Cannabis Frequency",
            "Cannabis Dependency",
            "Condition_Anxiety",
            "Condition_Psychosis/Paranoia",
        ],
        Substance::Psilocybin => [
            "Psilocybin Frequency",
            "Psilocybin Dependency",
            "Dose Type_Microdose",
            "Condition_Anxiety",
        ],
    }
}

/// Target column of the fixture corpus of a substance
#[must_use]
pub fn target_column(substance: Substance) -> String {
    format!("{} Risk", substance.name())
}

/// Write an encoded training corpus with one row per target code
pub fn write_corpus(path: &Path, substance: Substance, targets: &[i64]) {
    let features = corpus_features(substance);
    let mut csv = features.join(",");
    csv.push(',');
    csv.push_str(&target_column(substance));
    csv.push('\n');

    for (i, target) in targets.iter().enumerate() {
        let frequency = i % 8;
        let flag = |n: usize| if (i + n) % 3 == 0 { "true" } else { "false" };
        csv.push_str(&format!(
            "{frequency},{},{},{},{target}\n",
            flag(0),
            flag(1),
            flag(2)
        ));
    }
    fs::write(path, csv).unwrap();
}

/// Write a model that always predicts `class`
pub fn write_constant_model(path: &Path, classes: &[i64], class: i64) {
    let winner = classes.iter().position(|c| *c == class).unwrap();
    let init = if classes.len() == 2 {
        vec![if winner == 1 { 5.0 } else { -5.0 }]
    } else {
        (0..classes.len())
            .map(|i| if i == winner { 5.0 } else { 0.0 })
            .collect()
    };
    let model = TreeEnsemble {
        name: format!("constant-{class}"),
        classes: classes.to_vec(),
        n_features: 4,
        learning_rate: 0.1,
        init,
        stages: Vec::new(),
    };
    fs::write(path, serde_json::to_string(&model).unwrap()).unwrap();
}

/// Configuration pointing at corpora and models written into `dir`
///
/// `targets` gives the corpus target codes and `predicted` the class the
/// model always returns, for cannabis and psilocybin in that order.
#[must_use]
pub fn fixture_config(
    dir: &Path,
    targets: [&[i64]; 2],
    classes: [&[i64]; 2],
    predicted: [i64; 2],
) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    for (i, substance) in Substance::all().into_iter().enumerate() {
        let slug = substance.name().to_lowercase();
        let data = dir.join(format!("{slug}.csv"));
        let model = dir.join(format!("{slug}.json"));
        write_corpus(&data, substance, targets[i]);
        write_constant_model(&model, classes[i], predicted[i]);

        let settings = match substance {
            Substance::Cannabis => &mut config.cannabis,
            Substance::Psilocybin => &mut config.psilocybin,
        };
        settings.training_data = data;
        settings.model = model;
        settings.target_column = target_column(substance);
    }
    config
}

/// A request row with every answer missing
#[must_use]
pub fn blank_row() -> Vec<Cell> {
    vec![Cell::Null; Question::all().len()]
}

/// A request row with the given answers and every other answer missing
#[must_use]
pub fn row(answers: &[(Question, &str)]) -> Vec<Cell> {
    let mut row = blank_row();
    for (question, answer) in answers {
        row[question.index()] = Cell::from(*answer);
    }
    row
}
