//! Gradient-boosted decision tree ensembles exported as JSON
//!
//! The file holds the class labels, the initial raw score per class, the
//! learning rate, and for every boosting stage one regression tree per class
//! (a single tree when there are two classes). Trees are flat node arrays;
//! a node without a feature is a leaf.
//!
//! ```json
//! {
//!   "name": "cannabis",
//!   "classes": [1, 2, 3],
//!   "n_features": 2,
//!   "learning_rate": 0.1,
//!   "init": [0.0, 0.0, 0.0],
//!   "stages": [[{"nodes": [{"feature": 0, "threshold": 0.5, "left": 1, "right": 2},
//!                          {"value": 1.0}, {"value": -1.0}]}, ...]]
//! }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RiskError};
use crate::model::classifier::{Classifier, check_width};

/// One node of a regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Split feature; `None` marks a leaf
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<usize>,
    /// Samples with `x[feature] <= threshold` go left
    #[serde(default)]
    pub threshold: f64,
    /// Index of the left child
    #[serde(default)]
    pub left: usize,
    /// Index of the right child
    #[serde(default)]
    pub right: usize,
    /// Leaf output
    #[serde(default)]
    pub value: f64,
}

impl TreeNode {
    /// Create a leaf
    #[must_use]
    pub fn leaf(value: f64) -> Self {
        Self {
            feature: None,
            threshold: 0.0,
            left: 0,
            right: 0,
            value,
        }
    }

    /// Create a split node
    #[must_use]
    pub fn split(feature: usize, threshold: f64, left: usize, right: usize) -> Self {
        Self {
            feature: Some(feature),
            threshold,
            left,
            right,
            value: 0.0,
        }
    }
}

/// A regression tree; the root is node 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    /// Flat node array
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Output of the leaf `features` falls into
    fn evaluate(&self, features: &[f64]) -> f64 {
        let mut index = 0;
        // validated trees reach a leaf in at most `nodes.len()` steps
        for _ in 0..self.nodes.len() {
            let node = &self.nodes[index];
            match node.feature {
                None => return node.value,
                Some(feature) => {
                    index = if features[feature] <= node.threshold {
                        node.left
                    } else {
                        node.right
                    };
                }
            }
        }
        self.nodes[index].value
    }

    fn validate(&self, n_features: usize) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            let Some(feature) = node.feature else {
                continue;
            };
            if feature >= n_features {
                return Err(format!("node {i} splits on feature {feature} of {n_features}"));
            }
            // children must come after their parent, which rules out cycles
            for child in [node.left, node.right] {
                if child <= i || child >= self.nodes.len() {
                    return Err(format!("node {i} has invalid child {child}"));
                }
            }
        }
        Ok(())
    }
}

/// A gradient-boosted tree classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    /// Model name
    pub name: String,
    /// Ordinal class of each output, ascending
    pub classes: Vec<i64>,
    /// Width of the feature vector
    pub n_features: usize,
    /// Shrinkage applied to every tree output
    pub learning_rate: f64,
    /// Initial raw score per output
    pub init: Vec<f64>,
    /// Trees per boosting stage, one per output
    pub stages: Vec<Vec<RegressionTree>>,
}

impl TreeEnsemble {
    /// Load and validate a model file
    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let model: Self = serde_json::from_reader(reader)?;
        model.validate()?;
        log::info!(
            "Loaded model '{}' from {}: {} stages, classes {:?}",
            model.name,
            path.display(),
            model.stages.len(),
            model.classes
        );
        Ok(model)
    }

    /// Parse and validate a model from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Number of raw scores per sample; binary models keep a single one
    #[must_use]
    pub fn n_outputs(&self) -> usize {
        if self.classes.len() == 2 { 1 } else { self.classes.len() }
    }

    /// Check that the structure is internally consistent
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| RiskError::Model(format!("{}: {reason}", self.name));

        if self.classes.is_empty() {
            return Err(invalid("no classes".to_string()));
        }
        if self.init.len() != self.n_outputs() {
            return Err(invalid(format!(
                "{} initial scores for {} outputs",
                self.init.len(),
                self.n_outputs()
            )));
        }
        for (s, stage) in self.stages.iter().enumerate() {
            if stage.len() != self.n_outputs() {
                return Err(invalid(format!(
                    "stage {s} has {} trees, expected {}",
                    stage.len(),
                    self.n_outputs()
                )));
            }
            for tree in stage {
                tree.validate(self.n_features)
                    .map_err(|reason| invalid(format!("stage {s}: {reason}")))?;
            }
        }
        Ok(())
    }

    /// Raw additive score per output
    pub fn decision_function(&self, features: &[f64]) -> Result<Vec<f64>> {
        check_width(self, features)?;
        let mut scores = self.init.clone();
        for stage in &self.stages {
            for (score, tree) in scores.iter_mut().zip(stage) {
                *score += self.learning_rate * tree.evaluate(features);
            }
        }
        Ok(scores)
    }
}

impl Classifier for TreeEnsemble {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &[f64]) -> Result<i64> {
        let scores = self.decision_function(features)?;

        if self.classes.len() == 2 {
            let probability = 1.0 / (1.0 + (-scores[0]).exp());
            return Ok(self.classes[usize::from(probability > 0.5)]);
        }

        scores
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| self.classes[i])
            .ok_or_else(|| RiskError::Model(format!("{}: no scores", self.name)))
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.n_features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: usize, below: f64, above: f64) -> RegressionTree {
        RegressionTree {
            nodes: vec![
                TreeNode::split(feature, 0.5, 1, 2),
                TreeNode::leaf(below),
                TreeNode::leaf(above),
            ],
        }
    }

    fn three_class() -> TreeEnsemble {
        TreeEnsemble {
            name: "test".to_string(),
            classes: vec![1, 2, 3],
            n_features: 2,
            learning_rate: 1.0,
            init: vec![0.0, 0.0, 0.0],
            stages: vec![vec![
                stump(0, 1.0, -1.0),
                stump(1, -1.0, 3.0),
                stump(0, -1.0, 2.0),
            ]],
        }
    }

    #[test]
    fn test_multiclass_argmax() {
        let model = three_class();
        model.validate().unwrap();
        assert_eq!(model.predict(&[0.0, 0.0]).unwrap(), 1);
        assert_eq!(model.predict(&[0.0, 1.0]).unwrap(), 2);
        assert_eq!(model.predict(&[1.0, 0.0]).unwrap(), 3);
    }

    #[test]
    fn test_binary_sigmoid() {
        let model = TreeEnsemble {
            name: "binary".to_string(),
            classes: vec![1, 3],
            n_features: 1,
            learning_rate: 0.5,
            init: vec![0.0],
            stages: vec![vec![stump(0, -2.0, 2.0)]],
        };
        assert_eq!(model.predict(&[0.0]).unwrap(), 1);
        assert_eq!(model.predict(&[1.0]).unwrap(), 3);
    }

    #[test]
    fn test_json_round_trip() {
        let model = three_class();
        let json = serde_json::to_string(&model).unwrap();
        assert_eq!(TreeEnsemble::from_json(&json).unwrap(), model);
    }

    #[test]
    fn test_rejects_bad_structure() {
        let mut model = three_class();
        model.stages[0][0].nodes[0].left = 0;
        assert!(model.validate().is_err());

        let mut model = three_class();
        model.stages[0][1] = stump(5, 0.0, 0.0);
        assert!(model.validate().is_err());

        let mut model = three_class();
        model.init.pop();
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_rejects_wrong_width() {
        assert!(three_class().predict(&[1.0]).is_err());
    }
}
