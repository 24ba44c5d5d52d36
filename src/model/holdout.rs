//! Seeded stratified holdout evaluation against a training corpus

use std::fmt;

use indicatif::ProgressBar;
use itertools::Itertools;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rustc_hash::FxHashMap;

use crate::encoding::{FeatureFrame, RiskTier};
use crate::error::{Result, RiskError};
use crate::model::classifier::Classifier;
use crate::schema::TrainingCorpus;
use crate::survey::Substance;

/// Row indices of a train/test partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldoutSplit {
    /// Rows kept for training
    pub train: Vec<usize>,
    /// Rows held out for evaluation
    pub test: Vec<usize>,
}

/// Partition rows so every class contributes to the test set in proportion
/// to its size. The same seed always yields the same split.
///
/// Classes with at least two rows keep at least one row on each side.
pub fn stratified_split(targets: &[i64], test_fraction: f64, seed: u64) -> Result<HoldoutSplit> {
    if !(0.0..1.0).contains(&test_fraction) || test_fraction == 0.0 {
        return Err(RiskError::Config(format!(
            "holdout fraction must be in (0, 1), got {test_fraction}"
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut by_class: FxHashMap<i64, Vec<usize>> = FxHashMap::default();
    for (i, target) in targets.iter().enumerate() {
        by_class.entry(*target).or_default().push(i);
    }

    let mut train = Vec::with_capacity(targets.len());
    let mut test = Vec::new();

    for class in by_class.keys().copied().sorted().collect_vec() {
        let Some(mut rows) = by_class.remove(&class) else {
            continue;
        };
        rows.shuffle(&mut rng);

        let n = rows.len();
        let n_test = if n < 2 {
            0
        } else {
            ((n as f64 * test_fraction).round() as usize).clamp(1, n - 1)
        };
        test.extend_from_slice(&rows[..n_test]);
        train.extend_from_slice(&rows[n_test..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    Ok(HoldoutSplit { train, test })
}

/// Agreement between a classifier and the held-out corpus labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldoutReport {
    /// Substance evaluated
    pub substance: Substance,
    /// Number of held-out rows
    pub evaluated: usize,
    /// Rows where prediction and label agree
    pub correct: usize,
    /// `(label, prediction)` counts
    pub confusion: FxHashMap<(i64, i64), usize>,
}

impl HoldoutReport {
    /// Share of held-out rows predicted correctly
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        if self.evaluated == 0 {
            0.0
        } else {
            self.correct as f64 / self.evaluated as f64
        }
    }
}

impl fmt::Display for HoldoutReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {}/{} correct ({:.1}%)",
            self.substance,
            self.correct,
            self.evaluated,
            self.accuracy() * 100.0
        )?;
        for ((label, predicted), count) in self.confusion.iter().sorted() {
            let tier = |code: &i64| {
                RiskTier::from_code(*code).map_or_else(|| code.to_string(), |t| t.to_string())
            };
            writeln!(f, "  {} -> {}: {count}", tier(label), tier(predicted))?;
        }
        Ok(())
    }
}

/// Score the held-out part of a corpus
pub fn evaluate(
    classifier: &dyn Classifier,
    corpus: &TrainingCorpus,
    test_fraction: f64,
    seed: u64,
    progress: Option<&ProgressBar>,
) -> Result<HoldoutReport> {
    let split = stratified_split(corpus.targets(), test_fraction, seed)?;
    let frame = FeatureFrame::from_record_batch(corpus.features());

    let mut correct = 0;
    let mut confusion: FxHashMap<(i64, i64), usize> = FxHashMap::default();
    for &row in &split.test {
        let label = corpus.targets()[row];
        let predicted = classifier.predict(&frame.row_values(row)?)?;
        if predicted == label {
            correct += 1;
        }
        *confusion.entry((label, predicted)).or_default() += 1;
        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    let report = HoldoutReport {
        substance: corpus.schema().substance(),
        evaluated: split.test.len(),
        correct,
        confusion,
    };
    log::info!(
        "{} holdout: {} of {} rows held out (seed {seed}), accuracy {:.3}",
        report.substance,
        report.evaluated,
        corpus.num_rows(),
        report.accuracy()
    );
    Ok(report)
}
