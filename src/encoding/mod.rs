//! Encoding of normalized responses into classifier features.
//!
//! Stages run in a fixed order: multi-select expansion, feature
//! transformation, categorical encoding. [`encode_records`] chains them.

pub mod frame;
pub mod multi_select;
pub mod ordinal;
pub mod risk_level;
pub mod transform;

pub use frame::{FeatureFrame, FeatureName, false_array};
pub use multi_select::{MultiSelectExpander, selected_options, split_options};
pub use ordinal::{CategoricalEncoder, FREQUENCY, MACRODOSE_SESSIONS, OrdinalTable, TREATMENT_COUNT};
pub use risk_level::{RiskLevelEncoder, RiskTier};
pub use transform::{FeatureTransformer, PSYCHOSIS_PARANOIA, canonical_name, sanitize_name};

use crate::error::Result;
use crate::survey::NormalizedRecord;

/// Expand, transform and encode a batch of normalized records
pub fn encode_records(records: &[NormalizedRecord]) -> Result<FeatureFrame> {
    let frame = MultiSelectExpander::default().expand(records)?;
    let frame = FeatureTransformer.transform(frame)?;
    CategoricalEncoder.encode(frame)
}
