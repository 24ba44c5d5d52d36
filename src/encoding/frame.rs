//! Named, ordered feature columns backed by Arrow arrays
//!
//! A [`FeatureFrame`] is the unit every encoding stage consumes and produces.
//! It holds one column per feature and one row per respondent, and converts
//! to and from Arrow [`RecordBatch`]es at the edges (training corpus, model).

use std::fmt;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, BooleanArray, StringArray};
use arrow::compute::{cast, or};
use arrow::datatypes::{DataType, Field, Float64Type, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};

use crate::error::{Result, RiskError};
use crate::survey::Question;

/// Name of an encoded feature column
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureName(String);

impl FeatureName {
    /// Feature carrying a whole question's answer
    #[must_use]
    pub fn question(question: Question) -> Self {
        Self(question.label().to_string())
    }

    /// Indicator feature for one option of a field, `<field>_<option>`
    #[must_use]
    pub fn indicator(field: &str, option: &str) -> Self {
        Self(format!("{field}_{option}"))
    }

    /// Borrow the name as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-sensitive substring test
    #[must_use]
    pub fn contains(&self, pattern: &str) -> bool {
        self.0.contains(pattern)
    }
}

impl From<&str> for FeatureName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for FeatureName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for FeatureName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered feature columns for a batch of respondents
#[derive(Debug, Clone)]
pub struct FeatureFrame {
    num_rows: usize,
    columns: Vec<(FeatureName, ArrayRef)>,
}

impl FeatureFrame {
    /// Create an empty frame for `num_rows` respondents
    #[must_use]
    pub fn new(num_rows: usize) -> Self {
        Self {
            num_rows,
            columns: Vec::new(),
        }
    }

    /// Build a frame from the columns of a record batch
    #[must_use]
    pub fn from_record_batch(batch: &RecordBatch) -> Self {
        let columns = batch
            .schema()
            .fields()
            .iter()
            .zip(batch.columns())
            .map(|(field, array)| (FeatureName::from(field.name().as_str()), Arc::clone(array)))
            .collect();

        Self {
            num_rows: batch.num_rows(),
            columns,
        }
    }

    /// Number of respondents
    #[must_use]
    pub const fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Number of feature columns
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Feature names in column order
    pub fn names(&self) -> impl Iterator<Item = &FeatureName> {
        self.columns.iter().map(|(name, _)| name)
    }

    /// Whether a column with this name exists
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|(n, _)| n.as_str() == name)
    }

    /// Look up a column by name
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ArrayRef> {
        self.position(name).map(|i| &self.columns[i].1)
    }

    /// Append a column, replacing an existing column of the same name in place
    pub fn insert(&mut self, name: FeatureName, array: ArrayRef) -> Result<()> {
        if array.len() != self.num_rows {
            return Err(RiskError::MalformedInput(format!(
                "column '{name}' has {} rows, frame has {}",
                array.len(),
                self.num_rows
            )));
        }

        match self.position(name.as_str()) {
            Some(i) => self.columns[i].1 = array,
            None => self.columns.push((name, array)),
        }
        Ok(())
    }

    /// Remove a column and return it
    pub fn remove(&mut self, name: &str) -> Option<ArrayRef> {
        self.position(name).map(|i| self.columns.remove(i).1)
    }

    /// Keep only the columns whose name satisfies the predicate
    pub fn retain(&mut self, mut keep: impl FnMut(&FeatureName) -> bool) {
        self.columns.retain(|(name, _)| keep(name));
    }

    /// Rename every column through `rename`.
    ///
    /// Boolean columns that map to the same name are OR-ed together. For any
    /// other collision the later column wins.
    pub fn rename_with(
        &mut self,
        mut rename: impl FnMut(&FeatureName) -> FeatureName,
    ) -> Result<()> {
        let columns = std::mem::take(&mut self.columns);
        for (name, array) in columns {
            let renamed = rename(&name);
            let Some(i) = self.position(renamed.as_str()) else {
                self.columns.push((renamed, array));
                continue;
            };

            let merged = match (self.columns[i].1.as_boolean_opt(), array.as_boolean_opt()) {
                (Some(left), Some(right)) => Some(or(left, right)?),
                _ => None,
            };
            self.columns[i].1 = if let Some(merged) = merged {
                log::debug!("Merged indicator '{name}' into '{renamed}'");
                Arc::new(merged)
            } else {
                log::warn!("Feature '{name}' collides with '{renamed}' after renaming");
                array
            };
        }
        Ok(())
    }

    /// Text column by name, `None` if absent
    pub fn text(&self, name: &str) -> Result<Option<&StringArray>> {
        self.column(name)
            .map(|array| {
                array.as_string_opt::<i32>().ok_or_else(|| {
                    RiskError::MalformedInput(format!("column '{name}' is not a text column"))
                })
            })
            .transpose()
    }

    /// Boolean column by name, `None` if absent
    pub fn boolean(&self, name: &str) -> Result<Option<&BooleanArray>> {
        self.column(name)
            .map(|array| {
                array.as_boolean_opt().ok_or_else(|| {
                    RiskError::MalformedInput(format!("column '{name}' is not a boolean column"))
                })
            })
            .transpose()
    }

    /// Names of the columns still holding text
    #[must_use]
    pub fn text_columns(&self) -> Vec<FeatureName> {
        self.columns
            .iter()
            .filter(|(_, array)| array.data_type() == &DataType::Utf8)
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// A frame holding only the given row
    #[must_use]
    pub fn row(&self, row: usize) -> Self {
        Self {
            num_rows: 1,
            columns: self
                .columns
                .iter()
                .map(|(name, array)| (name.clone(), array.slice(row, 1)))
                .collect(),
        }
    }

    /// Numeric view of one row in column order; booleans become 0/1.
    ///
    /// Text and null values cannot be fed to a classifier and are rejected.
    pub fn row_values(&self, row: usize) -> Result<Vec<f64>> {
        self.columns
            .iter()
            .map(|(name, array)| {
                if array.data_type() == &DataType::Utf8 {
                    return Err(RiskError::Model(format!(
                        "feature '{name}' is still textual"
                    )));
                }
                let numeric = cast(&array.slice(row, 1), &DataType::Float64)?;
                let values = numeric.as_primitive::<Float64Type>();
                if values.is_null(0) {
                    return Err(RiskError::Model(format!("feature '{name}' is null")));
                }
                Ok(values.value(0))
            })
            .collect()
    }

    /// Materialize the frame as a record batch
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let fields: Vec<Field> = self
            .columns
            .iter()
            .map(|(name, array)| Field::new(name.as_str(), array.data_type().clone(), false))
            .collect();
        let arrays = self.columns.iter().map(|(_, array)| Arc::clone(array)).collect();
        let options = RecordBatchOptions::new().with_row_count(Some(self.num_rows));

        Ok(RecordBatch::try_new_with_options(
            Arc::new(Schema::new(fields)),
            arrays,
            &options,
        )?)
    }
}

/// Boolean column of `len` false values
#[must_use]
pub fn false_array(len: usize) -> ArrayRef {
    Arc::new(BooleanArray::from(vec![false; len]))
}
