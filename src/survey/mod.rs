//! Survey questionnaire, raw responses and normalization.

pub mod normalize;
pub mod question;
pub mod response;

pub use normalize::{NO_DATA, NOT_APPLICABLE, NormalizedRecord, ResponseNormalizer};
pub use question::{MULTI_SELECT_SEPARATOR, QUESTION_COUNT, Question, Substance};
pub use response::{Cell, RawResponse};
