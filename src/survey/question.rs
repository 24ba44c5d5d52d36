//! Survey questions and substances
//!
//! The questionnaire is fixed: every request row carries one cell per
//! [`Question`], in the order returned by [`Question::all`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of cells in a request row
pub const QUESTION_COUNT: usize = 18;

/// Separator between the answers of a multi-select question
pub const MULTI_SELECT_SEPARATOR: char = ';';

/// Substances covered by the questionnaire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Substance {
    /// Cannabis
    Cannabis,
    /// Psilocybin
    Psilocybin,
}

impl Substance {
    /// Get the display name for this substance
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cannabis => "Cannabis",
            Self::Psilocybin => "Psilocybin",
        }
    }

    /// Both substances in response order
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::Cannabis, Self::Psilocybin]
    }
}

impl fmt::Display for Substance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Survey questions, declared in request column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Question {
    CannabisFrequency,
    PsilocybinFrequency,
    CannabisPurpose,
    PsilocybinPurpose,
    CannabisDependency,
    PsilocybinDependency,
    CannabisAbuse,
    PsilocybinAbuse,
    TreatmentCount,
    DoseType,
    MacrodoseSessions,
    TreatmentRating,
    FamilyHistory,
    Condition,
    CannabisPositiveEffects,
    CannabisNegativeEffects,
    PsilocybinPositiveEffects,
    PsilocybinNegativeEffects,
}

const ALL_QUESTIONS: [Question; QUESTION_COUNT] = [
    Question::CannabisFrequency,
    Question::PsilocybinFrequency,
    Question::CannabisPurpose,
    Question::PsilocybinPurpose,
    Question::CannabisDependency,
    Question::PsilocybinDependency,
    Question::CannabisAbuse,
    Question::PsilocybinAbuse,
    Question::TreatmentCount,
    Question::DoseType,
    Question::MacrodoseSessions,
    Question::TreatmentRating,
    Question::FamilyHistory,
    Question::Condition,
    Question::CannabisPositiveEffects,
    Question::CannabisNegativeEffects,
    Question::PsilocybinPositiveEffects,
    Question::PsilocybinNegativeEffects,
];

const MULTI_SELECT: [Question; 6] = [
    Question::FamilyHistory,
    Question::Condition,
    Question::CannabisPositiveEffects,
    Question::CannabisNegativeEffects,
    Question::PsilocybinPositiveEffects,
    Question::PsilocybinNegativeEffects,
];

const DEPENDENCY_ABUSE: [Question; 4] = [
    Question::CannabisDependency,
    Question::CannabisAbuse,
    Question::PsilocybinDependency,
    Question::PsilocybinAbuse,
];

impl Question {
    /// All questions in request column order
    #[must_use]
    pub const fn all() -> &'static [Self; QUESTION_COUNT] {
        &ALL_QUESTIONS
    }

    /// Questions that accept several `;`-joined answers
    #[must_use]
    pub const fn multi_select() -> &'static [Self] {
        &MULTI_SELECT
    }

    /// Yes/no questions about dependency and abusive use
    #[must_use]
    pub const fn dependency_and_abuse() -> &'static [Self] {
        &DEPENDENCY_ABUSE
    }

    /// Column header used in the training corpus and feature names
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CannabisFrequency => "Cannabis Frequency",
            Self::PsilocybinFrequency => "Psilocybin Frequency",
            Self::CannabisPurpose => "Cannabis Purpose",
            Self::PsilocybinPurpose => "Psilocybin Purpose",
            Self::CannabisDependency => "Cannabis Dependency",
            Self::PsilocybinDependency => "Psilocybin Dependency",
            Self::CannabisAbuse => "Cannabis Abuse",
            Self::PsilocybinAbuse => "Psilocybin Abuse",
            Self::TreatmentCount => "Treatment Count",
            Self::DoseType => "Dose Type",
            Self::MacrodoseSessions => "Macrodose Sessions",
            Self::TreatmentRating => "Treatment Rating",
            Self::FamilyHistory => "Family History",
            Self::Condition => "Condition",
            Self::CannabisPositiveEffects => "Cannabis Positive Effects",
            Self::CannabisNegativeEffects => "Cannabis Negative Effects",
            Self::PsilocybinPositiveEffects => "Psilocybin Positive Effects",
            Self::PsilocybinNegativeEffects => "Psilocybin Negative Effects",
        }
    }

    /// Look a question up by its label
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        ALL_QUESTIONS.iter().copied().find(|q| q.label() == label)
    }

    /// Position of this question in a request row
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether the question accepts several answers
    #[must_use]
    pub fn is_multi_select(self) -> bool {
        MULTI_SELECT.contains(&self)
    }

    /// Options the questionnaire offers for a multi-select question.
    ///
    /// Every known option gets an indicator column, even when no respondent
    /// in the batch picked it. Single-select questions return an empty slice.
    #[must_use]
    pub const fn known_options(self) -> &'static [&'static str] {
        match self {
            Self::FamilyHistory => &[
                "Addiction to gambling or betting",
                "Addiction to nicotine",
                "Addiction to synthetic substances or illegal drugs",
                "Addiction to prescription medication",
                "Addiction to alcohol",
                "Bipolar Disorder (I, II)",
                "Schizophrenia",
                "Psychosis",
                "Paranoia",
                "Depression",
                "Anxiety",
                "Other",
                "No relevant conditions in my family",
            ],
            Self::Condition => &[
                "Addiction to gambling or betting",
                "Addiction to nicotine",
                "Addiction to synthetic substances or illegal drugs",
                "Addiction to prescription medication",
                "Addiction to alcohol",
                "Bipolar Disorder (I, II)",
                "Schizophrenia",
                "Psychosis",
                "Paranoia",
                "Depression",
                "Anxiety",
                "Other",
                "I do not suffer from any relevant condition",
            ],
            Self::CannabisPositiveEffects => &[
                "Relief of chronic pain",
                "Increased appetite",
                "Increased creativity",
                "Improved sleep",
                "Improved mood",
                "Improved introspection / connection with the self",
                "Reduced anxiety",
                "Reduced inflammation or spasms",
                "Had no positive effect",
                "Other",
            ],
            Self::CannabisNegativeEffects => &[
                "Lack of appetite",
                "Memory or attention problems",
                "Anxiety",
                "Paranoia",
                "Dependency",
                "Had no negative effect",
                "Other",
            ],
            Self::PsilocybinPositiveEffects => &[
                "Relief of chronic pain",
                "Increased appetite",
                "Increased introspection",
                "Greater sense of purpose or life satisfaction",
                "Improved sleep",
                "Reduced anxiety",
                "Reduced symptoms of depression",
                "Had no positive effect",
                "Other",
            ],
            Self::PsilocybinNegativeEffects => &[
                "Memory or attention problems",
                "Anxiety",
                "Nausea",
                "Difficult experience",
                "Had no negative effect",
                "Other",
            ],
            _ => &[],
        }
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
