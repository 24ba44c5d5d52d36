//! Feature transformations applied after multi-select expansion
//!
//! Four steps, always in this order:
//! 1. psychosis/paranoia indicators of condition and family history are
//!    merged into one `Condition_Psychosis/Paranoia` indicator;
//! 2. the yes/no dependency and abuse answers become booleans;
//! 3. verbose option labels are replaced by short canonical labels;
//! 4. feature names are sanitized.

use std::sync::{Arc, LazyLock};

use arrow::array::{Array, ArrayRef, BooleanArray};
use arrow::compute::or;
use rustc_hash::FxHashMap;

use crate::encoding::frame::{FeatureFrame, FeatureName};
use crate::error::{Result, RiskError};
use crate::survey::{NO_DATA, Question};

/// Name of the merged psychosis/paranoia indicator
pub const PSYCHOSIS_PARANOIA: &str = "Condition_Psychosis/Paranoia";

/// Indicators folded into [`PSYCHOSIS_PARANOIA`]
pub const PSYCHOSIS_PARANOIA_SOURCES: [&str; 4] = [
    "Condition_Psychosis",
    "Condition_Paranoia",
    "Family History_Psychosis",
    "Family History_Paranoia",
];

/// Two-valued table for the dependency and abuse answers
const BINARY_TABLE: [(&str, bool); 3] = [(NO_DATA, false), ("No", false), ("Yes", true)];

/// Verbose feature name → canonical short feature name
const RENAMES: &[(&str, &str)] = &[
    ("Family History_Addiction to gambling or betting", "Family History_Gambling Addiction"),
    ("Family History_Addiction to nicotine", "Family History_Nicotine Addiction"),
    (
        "Family History_Addiction to synthetic substances or illegal drugs",
        "Family History_Synthetic or Illegal Drug Addiction",
    ),
    (
        "Family History_Addiction to prescription medication",
        "Family History_Prescription Medication Addiction",
    ),
    ("Family History_Addiction to alcohol", "Family History_Alcohol Addiction"),
    ("Family History_Bipolar Disorder (I, II)", "Family History_Bipolar Disorder"),
    (
        "Family History_No relevant conditions in my family",
        "Family History_No Relevant Condition",
    ),
    ("Condition_Addiction to gambling or betting", "Condition_Gambling Addiction"),
    ("Condition_Addiction to nicotine", "Condition_Nicotine Addiction"),
    (
        "Condition_Addiction to synthetic substances or illegal drugs",
        "Condition_Synthetic or Illegal Drug Addiction",
    ),
    (
        "Condition_Addiction to prescription medication",
        "Condition_Prescription Medication Addiction",
    ),
    ("Condition_Addiction to alcohol", "Condition_Alcohol Addiction"),
    ("Condition_Bipolar Disorder (I, II)", "Condition_Bipolar Disorder"),
    (
        "Condition_I do not suffer from any relevant condition",
        "Condition_No Relevant Condition",
    ),
    (
        "Cannabis Positive Effects_Relief of chronic pain",
        "Cannabis Positive Effects_Chronic Pain Relief",
    ),
    (
        "Cannabis Positive Effects_Increased appetite",
        "Cannabis Positive Effects_Increased Appetite",
    ),
    (
        "Cannabis Positive Effects_Increased creativity",
        "Cannabis Positive Effects_Increased Creativity",
    ),
    ("Cannabis Positive Effects_Improved sleep", "Cannabis Positive Effects_Improved Sleep"),
    ("Cannabis Positive Effects_Improved mood", "Cannabis Positive Effects_Improved Mood"),
    (
        "Cannabis Positive Effects_Improved introspection / connection with the self",
        "Cannabis Positive Effects_Improved Introspection",
    ),
    (
        "Cannabis Positive Effects_Had no positive effect",
        "Cannabis Positive Effects_No Positive Effect",
    ),
    ("Cannabis Positive Effects_Reduced anxiety", "Cannabis Positive Effects_Reduced Anxiety"),
    (
        "Cannabis Positive Effects_Reduced inflammation or spasms",
        "Cannabis Positive Effects_Reduced Inflammation or Spasms",
    ),
    ("Cannabis Negative Effects_Lack of appetite", "Cannabis Negative Effects_Appetite Loss"),
    (
        "Cannabis Negative Effects_Had no negative effect",
        "Cannabis Negative Effects_No Negative Effect",
    ),
    (
        "Cannabis Negative Effects_Memory or attention problems",
        "Cannabis Negative Effects_Memory or Attention Problems",
    ),
    (
        "Psilocybin Positive Effects_Relief of chronic pain",
        "Psilocybin Positive Effects_Chronic Pain Relief",
    ),
    (
        "Psilocybin Positive Effects_Increased appetite",
        "Psilocybin Positive Effects_Increased Appetite",
    ),
    (
        "Psilocybin Positive Effects_Increased introspection",
        "Psilocybin Positive Effects_Improved Introspection",
    ),
    (
        "Psilocybin Positive Effects_Greater sense of purpose or life satisfaction",
        "Psilocybin Positive Effects_Greater Life Satisfaction",
    ),
    ("Psilocybin Positive Effects_Improved sleep", "Psilocybin Positive Effects_Improved Sleep"),
    (
        "Psilocybin Positive Effects_Had no positive effect",
        "Psilocybin Positive Effects_No Positive Effect",
    ),
    (
        "Psilocybin Positive Effects_Reduced anxiety",
        "Psilocybin Positive Effects_Reduced Anxiety",
    ),
    (
        "Psilocybin Positive Effects_Reduced symptoms of depression",
        "Psilocybin Positive Effects_Reduced Depression Symptoms",
    ),
    (
        "Psilocybin Negative Effects_Had no negative effect",
        "Psilocybin Negative Effects_No Negative Effect",
    ),
    (
        "Psilocybin Negative Effects_Memory or attention problems",
        "Psilocybin Negative Effects_Memory or Attention Problems",
    ),
];

static RENAME_TABLE: LazyLock<FxHashMap<&'static str, &'static str>> =
    LazyLock::new(|| RENAMES.iter().copied().collect());

/// Canonical short name for a verbose feature name, if it has one
#[must_use]
pub fn canonical_name(name: &str) -> Option<&'static str> {
    RENAME_TABLE.get(name).copied()
}

/// Replace characters outside alphanumerics, `_`, whitespace, `/`, `,` and `'`
///
/// Training corpora carry the same character set in their headers, commas
/// included.
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '/' | ',' | '\'') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Map a yes/no answer through the two-valued table
pub fn parse_binary(field: &str, value: &str) -> Result<bool> {
    BINARY_TABLE
        .iter()
        .find(|(label, _)| *label == value)
        .map(|(_, flag)| *flag)
        .ok_or_else(|| RiskError::unmapped(field, value))
}

/// Applies the merge, boolean cast, rename and sanitize steps
#[derive(Debug, Default, Clone, Copy)]
pub struct FeatureTransformer;

impl FeatureTransformer {
    /// Run every transformation step on the frame
    pub fn transform(&self, mut frame: FeatureFrame) -> Result<FeatureFrame> {
        self.merge_psychosis_paranoia(&mut frame)?;
        self.cast_booleans(&mut frame)?;
        self.rename(&mut frame)?;
        self.sanitize(&mut frame)?;
        Ok(frame)
    }

    /// Fold the psychosis and paranoia indicators into one.
    ///
    /// Only the indicators present in the frame take part; nothing happens
    /// when none of them exist.
    pub fn merge_psychosis_paranoia(&self, frame: &mut FeatureFrame) -> Result<()> {
        let mut merged: Option<BooleanArray> = None;
        let mut found = 0usize;

        for source in PSYCHOSIS_PARANOIA_SOURCES {
            let Some(column) = frame.boolean(source)? else {
                continue;
            };
            found += 1;
            merged = Some(match merged {
                Some(acc) => or(&acc, column)?,
                None => column.clone(),
            });
        }

        if let Some(merged) = merged {
            for source in PSYCHOSIS_PARANOIA_SOURCES {
                frame.remove(source);
            }
            frame.insert(FeatureName::from(PSYCHOSIS_PARANOIA), Arc::new(merged))?;
            log::trace!("Merged {found} psychosis/paranoia indicators");
        }
        Ok(())
    }

    /// Turn the yes/no dependency and abuse answers into booleans
    pub fn cast_booleans(&self, frame: &mut FeatureFrame) -> Result<()> {
        for question in Question::dependency_and_abuse() {
            let name = question.label();
            let Some(column) = frame.text(name)? else {
                continue;
            };

            let values = (0..column.len())
                .map(|i| {
                    let value = if column.is_null(i) { NO_DATA } else { column.value(i) };
                    parse_binary(name, value).map(Some)
                })
                .collect::<Result<BooleanArray>>()?;

            frame.insert(FeatureName::from(name), Arc::new(values) as ArrayRef)?;
        }
        Ok(())
    }

    /// Replace verbose option labels with their canonical labels
    pub fn rename(&self, frame: &mut FeatureFrame) -> Result<()> {
        frame.rename_with(|name| {
            canonical_name(name.as_str()).map_or_else(|| name.clone(), FeatureName::from)
        })
    }

    /// Make every feature name a safe identifier
    pub fn sanitize(&self, frame: &mut FeatureFrame) -> Result<()> {
        frame.rename_with(|name| FeatureName::from(sanitize_name(name.as_str())))
    }
}
