//! Training schemas, alignment to them, and per-substance splitting

pub mod align;
pub mod split;
pub mod training;

pub use align::{DEFAULT_MIN_CLASS_SUPPORT, SchemaAligner};
pub use split::SubstanceSplitter;
pub use training::{TrainingCorpus, TrainingSchema};
