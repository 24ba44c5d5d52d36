//! Per-substance projection of the encoded feature frame

use crate::encoding::FeatureFrame;
use crate::survey::Substance;

/// Splits one encoded frame into a cannabis and a psilocybin frame by
/// dropping columns whose name contains an excluded marker
#[derive(Debug, Default, Clone, Copy)]
pub struct SubstanceSplitter;

impl SubstanceSplitter {
    /// Name fragments whose columns are excluded from a substance's frame.
    /// Matching is exact and case-sensitive.
    #[must_use]
    pub const fn excluded_markers(substance: Substance) -> &'static [&'static str] {
        match substance {
            Substance::Cannabis => &["Psilocybin", "Other", "No data", "Dose Type", "No Reason"],
            Substance::Psilocybin => &["Cannabis", "Other", "No data", "No Reason"],
        }
    }

    /// Whether a column belongs in the substance's frame
    #[must_use]
    pub fn keeps(substance: Substance, name: &str) -> bool {
        !Self::excluded_markers(substance)
            .iter()
            .any(|marker| name.contains(marker))
    }

    /// Frame holding only the substance's columns
    #[must_use]
    pub fn frame_for(&self, frame: &FeatureFrame, substance: Substance) -> FeatureFrame {
        let mut projected = frame.clone();
        projected.retain(|name| Self::keeps(substance, name.as_str()));
        log::debug!(
            "{substance} frame keeps {} of {} features",
            projected.num_columns(),
            frame.num_columns()
        );
        projected
    }

    /// Cannabis and psilocybin frames, in that order
    #[must_use]
    pub fn split(&self, frame: &FeatureFrame) -> (FeatureFrame, FeatureFrame) {
        (
            self.frame_for(frame, Substance::Cannabis),
            self.frame_for(frame, Substance::Psilocybin),
        )
    }
}
