//! Expansion of multi-select answers into boolean indicator features

use std::collections::BTreeSet;
use std::sync::Arc;

use arrow::array::{BooleanArray, StringArray};
use itertools::Itertools;
use smallvec::SmallVec;

use crate::encoding::frame::{FeatureFrame, FeatureName};
use crate::error::Result;
use crate::survey::{MULTI_SELECT_SEPARATOR, NormalizedRecord, Question};

/// Split a joined multi-select answer into its options.
///
/// Options are trimmed and empty pieces are skipped.
pub fn split_options(answer: &str) -> impl Iterator<Item = &str> {
    answer
        .split(MULTI_SELECT_SEPARATOR)
        .map(str::trim)
        .filter(|option| !option.is_empty())
}

/// Distinct options of an answer, in first-seen order
#[must_use]
pub fn selected_options(answer: &str) -> SmallVec<[&str; 8]> {
    split_options(answer).unique().collect()
}

/// Turns `;`-joined answers into `<field>_<option>` indicator columns.
///
/// The result is the same as exploding every multi-select field into one
/// row per option combination, one-hot encoding each row and OR-ing the rows
/// back together per respondent: an indicator is true iff its option appears
/// anywhere in the respondent's answer.
#[derive(Debug, Clone)]
pub struct MultiSelectExpander {
    fields: Vec<Question>,
}

impl Default for MultiSelectExpander {
    fn default() -> Self {
        Self::new(Question::multi_select().to_vec())
    }
}

impl MultiSelectExpander {
    /// Create an expander for the given multi-select fields
    #[must_use]
    pub fn new(fields: Vec<Question>) -> Self {
        Self { fields }
    }

    /// Build the feature frame for a batch of normalized records.
    ///
    /// Unexpanded questions come first as text columns in request order,
    /// followed by the indicator columns of each expanded field with options
    /// in lexical order.
    pub fn expand(&self, records: &[NormalizedRecord]) -> Result<FeatureFrame> {
        let mut frame = FeatureFrame::new(records.len());

        for question in Question::all()
            .iter()
            .copied()
            .filter(|q| !self.fields.contains(q))
        {
            let values = StringArray::from_iter_values(records.iter().map(|r| r.get(question)));
            frame.insert(FeatureName::question(question), Arc::new(values))?;
        }

        for &field in &self.fields {
            let selections: Vec<SmallVec<[&str; 8]>> = records
                .iter()
                .map(|record| selected_options(record.get(field)))
                .collect();

            let options: BTreeSet<&str> = field
                .known_options()
                .iter()
                .copied()
                .chain(selections.iter().flatten().copied())
                .collect();

            for option in options {
                let values: BooleanArray = selections
                    .iter()
                    .map(|selected| Some(selected.contains(&option)))
                    .collect();
                frame.insert(FeatureName::indicator(field.label(), option), Arc::new(values))?;
            }
        }

        log::debug!(
            "Expanded {} records into {} features",
            records.len(),
            frame.num_columns()
        );
        Ok(frame)
    }
}
