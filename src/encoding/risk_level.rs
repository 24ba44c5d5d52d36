//! Risk tiers and their ordinal codes

use std::fmt;

/// Treatment risk tier
///
/// `Unknown` is what a respondent gets when no rule matched; it is ordered
/// below the other tiers for precedence but is not a risk level itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum RiskTier {
    /// No rule matched
    #[default]
    Unknown = 0,
    /// Low treatment risk
    Low = 1,
    /// Medium treatment risk
    Medium = 2,
    /// High treatment risk
    High = 3,
}

impl RiskTier {
    /// All tiers in code order
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Unknown, Self::Low, Self::Medium, Self::High]
    }

    /// Convert an ordinal code to a tier; codes outside the table yield `None`
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Unknown),
            1 => Some(Self::Low),
            2 => Some(Self::Medium),
            3 => Some(Self::High),
            _ => None,
        }
    }

    /// Get the ordinal code for this tier
    #[must_use]
    pub const fn code(self) -> i64 {
        self as i64
    }

    /// Get the label for this tier
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown Risk",
            Self::Low => "Low Risk",
            Self::Medium => "Medium Risk",
            Self::High => "High Risk",
        }
    }

    /// Parse a tier label
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::all().into_iter().find(|tier| tier.label() == label)
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Bidirectional mapping between tier labels and ordinal codes
#[derive(Debug, Default, Clone, Copy)]
pub struct RiskLevelEncoder;

impl RiskLevelEncoder {
    /// Ordinal code of a tier label, `None` for unknown labels
    #[must_use]
    pub fn encode(&self, label: &str) -> Option<i64> {
        RiskTier::from_label(label).map(RiskTier::code)
    }

    /// Label of an ordinal code, `None` for codes outside the table
    #[must_use]
    pub fn decode(&self, code: i64) -> Option<&'static str> {
        RiskTier::from_code(code).map(RiskTier::label)
    }
}
