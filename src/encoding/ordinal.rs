//! Ordinal encoding of ordered categorical answers
//!
//! The tables are fixed. The frequency scale ranks *more* frequent use lower
//! (daily = 1, yearly = 7); the trained classifiers depend on this convention.

use std::collections::BTreeSet;
use std::sync::Arc;

use arrow::array::{Array, BooleanArray, Int64Array, StringArray};

use crate::encoding::frame::{FeatureFrame, FeatureName};
use crate::error::{Result, RiskError};
use crate::survey::{NO_DATA, Question};

/// A fixed label → rank table
#[derive(Debug, Clone, Copy)]
pub struct OrdinalTable {
    name: &'static str,
    entries: &'static [(&'static str, i64)],
}

impl OrdinalTable {
    /// Name of the table, used in error messages
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Labels and ranks in rank order
    #[must_use]
    pub const fn entries(&self) -> &'static [(&'static str, i64)] {
        self.entries
    }

    /// Rank of a label
    pub fn encode(&self, field: &str, value: &str) -> Result<i64> {
        self.entries
            .iter()
            .find(|(label, _)| *label == value)
            .map(|(_, rank)| *rank)
            .ok_or_else(|| RiskError::unmapped(field, value))
    }
}

/// Consumption frequency, any field whose name contains `Frequency`
pub const FREQUENCY: OrdinalTable = OrdinalTable {
    name: "frequency",
    entries: &[
        (NO_DATA, 0),
        ("Daily", 1),
        ("Several times a week", 2),
        ("Weekly", 3),
        ("Several times a month", 4),
        ("Monthly", 5),
        ("Several times a year", 6),
        ("Yearly", 7),
    ],
};

/// Number of single-day macrodose sessions
pub const MACRODOSE_SESSIONS: OrdinalTable = OrdinalTable {
    name: "macrodose sessions",
    entries: &[
        (NO_DATA, 0),
        ("One single-day session", 1),
        ("1-5 single-day sessions", 2),
        ("More than 10 single-day sessions", 3),
        ("Other", 4),
    ],
};

/// Number of previous treatments
pub const TREATMENT_COUNT: OrdinalTable = OrdinalTable {
    name: "treatment count",
    entries: &[(NO_DATA, 0), ("One", 1), ("Two", 2), ("More than three", 3)],
};

/// Highest rating a respondent can give a previous treatment
pub const MAX_TREATMENT_RATING: i64 = 5;

/// Encode a treatment rating: `No data` is 0, otherwise an integer 1..=5
pub fn encode_rating(field: &str, value: &str) -> Result<i64> {
    if value == NO_DATA {
        return Ok(0);
    }
    value
        .parse::<i64>()
        .ok()
        .filter(|rating| (1..=MAX_TREATMENT_RATING).contains(rating))
        .ok_or_else(|| RiskError::unmapped(field, value))
}

/// Maps ordered categorical answers to integer ranks and one-hot encodes the
/// remaining single-select text answers
#[derive(Debug, Default, Clone, Copy)]
pub struct CategoricalEncoder;

impl CategoricalEncoder {
    /// Ordinal table for a feature, if it is ordinally encoded
    #[must_use]
    pub fn table_for(name: &str) -> Option<OrdinalTable> {
        if name.contains("Frequency") {
            Some(FREQUENCY)
        } else if name == Question::MacrodoseSessions.label() {
            Some(MACRODOSE_SESSIONS)
        } else if name == Question::TreatmentCount.label() {
            Some(TREATMENT_COUNT)
        } else {
            None
        }
    }

    /// Encode every ordinal and rating column, then one-hot encode whatever
    /// text remains
    pub fn encode(&self, mut frame: FeatureFrame) -> Result<FeatureFrame> {
        self.encode_ordinals(&mut frame)?;
        self.one_hot_remaining(&mut frame)?;
        Ok(frame)
    }

    /// Replace ordinal and rating text columns with `Int64` ranks
    pub fn encode_ordinals(&self, frame: &mut FeatureFrame) -> Result<()> {
        for name in frame.text_columns() {
            let is_rating = name.as_str() == Question::TreatmentRating.label();
            let table = Self::table_for(name.as_str());
            if table.is_none() && !is_rating {
                continue;
            }

            let encoded = {
                let Some(column) = frame.text(name.as_str())? else {
                    continue;
                };
                (0..column.len())
                    .map(|i| {
                        let value = if column.is_null(i) { NO_DATA } else { column.value(i) };
                        match table {
                            Some(table) => table.encode(name.as_str(), value),
                            None => encode_rating(name.as_str(), value),
                        }
                        .map(Some)
                    })
                    .collect::<Result<Int64Array>>()?
            };

            frame.insert(name, Arc::new(encoded))?;
        }
        Ok(())
    }

    /// One-hot encode the remaining text columns as `<field>_<value>` and
    /// drop the source columns. Only values present in the batch get columns.
    pub fn one_hot_remaining(&self, frame: &mut FeatureFrame) -> Result<()> {
        for name in frame.text_columns() {
            let Some(column) = frame.remove(name.as_str()) else {
                continue;
            };
            let Some(text) = column.as_any().downcast_ref::<StringArray>() else {
                continue;
            };

            let values: BTreeSet<&str> = (0..text.len())
                .filter(|i| !text.is_null(*i))
                .map(|i| text.value(i))
                .collect();

            for value in values {
                let indicator: BooleanArray = (0..text.len())
                    .map(|i| Some(!text.is_null(i) && text.value(i) == value))
                    .collect();
                frame.insert(FeatureName::indicator(name.as_str(), value), Arc::new(indicator))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::AsArray;
    use arrow::datatypes::Int64Type;

    #[test]
    fn test_frequency_ranks() {
        assert_eq!(FREQUENCY.encode("Cannabis Frequency", "Daily").unwrap(), 1);
        assert_eq!(FREQUENCY.encode("Cannabis Frequency", NO_DATA).unwrap(), 0);
        assert_eq!(FREQUENCY.encode("Cannabis Frequency", "Yearly").unwrap(), 7);
        assert!(matches!(
            FREQUENCY.encode("Cannabis Frequency", "Hourly"),
            Err(RiskError::UnmappedValue { .. })
        ));
    }

    #[test]
    fn test_frequency_rank_decreases_with_intensity() {
        let ranks: Vec<i64> = FREQUENCY.entries().iter().skip(1).map(|(_, r)| *r).collect();
        assert_eq!(ranks, (1..=7).collect::<Vec<_>>());
    }

    #[test]
    fn test_rating_encoding() {
        assert_eq!(encode_rating("Treatment Rating", NO_DATA).unwrap(), 0);
        assert_eq!(encode_rating("Treatment Rating", "4").unwrap(), 4);
        assert!(encode_rating("Treatment Rating", "9").is_err());
        assert!(encode_rating("Treatment Rating", "great").is_err());
    }

    #[test]
    fn test_encode_frame() {
        let mut frame = FeatureFrame::new(2);
        frame
            .insert(
                "Psilocybin Frequency".into(),
                Arc::new(StringArray::from(vec!["Monthly", NO_DATA])),
            )
            .unwrap();
        frame
            .insert(
                "Treatment Count".into(),
                Arc::new(StringArray::from(vec!["Two", "More than three"])),
            )
            .unwrap();
        frame
            .insert(
                "Dose Type".into(),
                Arc::new(StringArray::from(vec!["Microdose", NO_DATA])),
            )
            .unwrap();

        let frame = CategoricalEncoder.encode(frame).unwrap();

        let frequency = frame.column("Psilocybin Frequency").unwrap();
        assert_eq!(
            frequency.as_primitive::<Int64Type>(),
            &Int64Array::from(vec![5, 0])
        );
        let count = frame.column("Treatment Count").unwrap();
        assert_eq!(count.as_primitive::<Int64Type>(), &Int64Array::from(vec![2, 3]));

        assert!(!frame.contains("Dose Type"));
        let micro = frame.boolean("Dose Type_Microdose").unwrap().unwrap();
        assert!(micro.value(0) && !micro.value(1));
        assert!(frame.contains("Dose Type_No data"));
    }
}
