//! Replacement of missing and not-applicable answers

use crate::survey::question::{QUESTION_COUNT, Question};
use crate::survey::response::RawResponse;

/// Canonical label for missing or not-applicable answers
pub const NO_DATA: &str = "No data";

/// Token respondents use for questions that do not apply to them
pub const NOT_APPLICABLE: &str = "N/A";

/// A response whose every answer is present
///
/// Missing, blank and `N/A` answers are replaced by [`NO_DATA`]; multi-select
/// answers are still `;`-joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    answers: [String; QUESTION_COUNT],
}

impl NormalizedRecord {
    /// Answer to a question
    #[must_use]
    pub fn get(&self, question: Question) -> &str {
        &self.answers[question.index()]
    }

    /// Whether the question was left without data
    #[must_use]
    pub fn is_no_data(&self, question: Question) -> bool {
        self.get(question) == NO_DATA
    }

    /// Whether a multi-select answer includes `option`
    #[must_use]
    pub fn has_option(&self, question: Question, option: &str) -> bool {
        crate::encoding::split_options(self.get(question)).any(|o| o == option)
    }

    /// Whether the answer equals any of the given values
    #[must_use]
    pub fn is_one_of(&self, question: Question, values: &[&str]) -> bool {
        values.contains(&self.get(question))
    }
}

/// Fills absent answers with the [`NO_DATA`] sentinel
#[derive(Debug, Default, Clone, Copy)]
pub struct ResponseNormalizer;

impl ResponseNormalizer {
    /// Normalize a single response. Never fails.
    #[must_use]
    pub fn normalize(&self, response: &RawResponse) -> NormalizedRecord {
        NormalizedRecord {
            answers: std::array::from_fn(|i| {
                normalize_answer(response.get(Question::all()[i]))
            }),
        }
    }

    /// Normalize every response of a batch
    #[must_use]
    pub fn normalize_all(&self, responses: &[RawResponse]) -> Vec<NormalizedRecord> {
        responses.iter().map(|r| self.normalize(r)).collect()
    }
}

fn normalize_answer(answer: Option<&str>) -> String {
    match answer.map(str::trim) {
        None | Some("" | NOT_APPLICABLE) => NO_DATA.to_string(),
        Some(value) => value.to_string(),
    }
}
