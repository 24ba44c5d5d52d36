//! Raw survey responses as received at the request boundary

use serde::{Deserialize, Serialize};

use crate::error::{Result, RiskError};
use crate::survey::question::{QUESTION_COUNT, Question};

/// A single request cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Textual answer, possibly `;`-joined
    Text(String),
    /// Numeric answer (treatment rating)
    Number(f64),
    /// Missing answer
    Null,
}

impl Cell {
    /// Render the cell as text; `None` for missing answers
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text.clone()),
            Self::Number(value) if value.fract() == 0.0 && value.is_finite() => {
                Some(format!("{}", *value as i64))
            }
            Self::Number(value) => Some(value.to_string()),
            Self::Null => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// One respondent's answers, one optional value per question
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    answers: [Option<String>; QUESTION_COUNT],
}

impl RawResponse {
    /// Build a response from a request row
    ///
    /// Rows must carry exactly one cell per question.
    pub fn from_row(row: &[Cell]) -> Result<Self> {
        if row.len() != QUESTION_COUNT {
            return Err(RiskError::MalformedInput(format!(
                "expected {QUESTION_COUNT} cells per row, got {}",
                row.len()
            )));
        }

        Ok(Self {
            answers: std::array::from_fn(|i| row[i].as_text()),
        })
    }

    /// Build responses from every row of a request
    pub fn from_rows(rows: &[Vec<Cell>]) -> Result<Vec<Self>> {
        if rows.is_empty() {
            return Err(RiskError::MalformedInput(
                "request contains no rows".to_string(),
            ));
        }

        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                Self::from_row(row).map_err(|e| match e {
                    RiskError::MalformedInput(msg) => {
                        RiskError::MalformedInput(format!("row {i}: {msg}"))
                    }
                    other => other,
                })
            })
            .collect()
    }

    /// Raw answer to a question
    #[must_use]
    pub fn get(&self, question: Question) -> Option<&str> {
        self.answers[question.index()].as_deref()
    }
}
