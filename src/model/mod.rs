//! Classifiers and their evaluation

pub mod classifier;
pub mod holdout;
pub mod tree_ensemble;

pub use classifier::Classifier;
pub use holdout::{HoldoutReport, HoldoutSplit, evaluate, stratified_split};
pub use tree_ensemble::{RegressionTree, TreeEnsemble, TreeNode};
