//! # Content Vocabularies
//!
//! The closed value sets that lesson and quiz documents draw from. Each
//! enum has a single string spelling used both on disk and in reports.
//! `QuestionType`'s `FromStr` accepts exactly that spelling;
//! `Difficulty::parse_lenient` is the forgiving path the normalizer uses to
//! repair capitalisation and legacy synonyms.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::GcaError;

/// Legacy difficulty words and the level each stands for.
const DIFFICULTY_SYNONYMS: &[(&str, Difficulty)] =
    &[("basic", Difficulty::Beginner), ("expert", Difficulty::Advanced)];

/// Difficulty level of a lesson or a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// Entry level.
    Beginner,
    /// Assumes the beginner material.
    Intermediate,
    /// Specialist material.
    Advanced,
}

impl Difficulty {
    /// Accepted spellings, in canonical order.
    pub const NAMES: &'static [&'static str] = &["Beginner", "Intermediate", "Advanced"];

    /// Returns all difficulty levels in canonical order.
    pub fn all() -> &'static [Difficulty] {
        &[Self::Beginner, Self::Intermediate, Self::Advanced]
    }

    /// Returns the on-disk spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }

    /// Parse ignoring surrounding whitespace and letter case, accepting the
    /// synonyms found in older content (`Basic`, `Expert`).
    ///
    /// `" beginner "` becomes `Beginner` and `"basic"` becomes `Beginner`.
    /// Anything else is `None`.
    pub fn parse_lenient(s: &str) -> Option<Self> {
        let wanted = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|d| d.as_str().eq_ignore_ascii_case(wanted))
            .or_else(|| {
                DIFFICULTY_SYNONYMS
                    .iter()
                    .find(|(word, _)| word.eq_ignore_ascii_case(wanted))
                    .map(|(_, d)| *d)
            })
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of assessment item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    /// Pick one of several choices.
    MultipleChoice,
    /// Pick one of two choices.
    TrueFalse,
    /// Answered with code; graded outside the quiz file.
    Coding,
    /// Free-text answer; no choices.
    OpenEnded,
}

impl QuestionType {
    /// Accepted spellings, in canonical order.
    pub const NAMES: &'static [&'static str] =
        &["multiple-choice", "true-false", "coding", "open-ended"];

    /// Returns the on-disk spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "multiple-choice",
            Self::TrueFalse => "true-false",
            Self::Coding => "coding",
            Self::OpenEnded => "open-ended",
        }
    }

    /// Whether questions of this type carry `choices` and an answer index.
    pub fn is_choice_based(&self) -> bool {
        matches!(self, Self::MultipleChoice | Self::TrueFalse)
    }

    /// Canonical number of choices for choice-based types.
    pub fn canonical_choice_count(&self) -> Option<usize> {
        match self {
            Self::MultipleChoice => Some(4),
            Self::TrueFalse => Some(2),
            Self::Coding | Self::OpenEnded => None,
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = GcaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multiple-choice" => Ok(Self::MultipleChoice),
            "true-false" => Ok(Self::TrueFalse),
            "coding" => Ok(Self::Coding),
            "open-ended" => Ok(Self::OpenEnded),
            other => Err(GcaError::unknown_variant("question type", other, Self::NAMES)),
        }
    }
}

/// The two kinds of content file the toolchain understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// A file holding an array of lessons for one module.
    Lesson,
    /// A file holding the assessment for one module.
    Quiz,
}

impl ContentKind {
    /// Returns both kinds.
    pub fn all() -> &'static [ContentKind] {
        &[Self::Lesson, Self::Quiz]
    }

    /// Returns the lowercase name used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lesson => "lesson",
            Self::Quiz => "quiz",
        }
    }

    /// Name of the directory that holds files of this kind.
    pub fn directory_name(&self) -> &'static str {
        match self {
            Self::Lesson => "lessons",
            Self::Quiz => "quizzes",
        }
    }

    /// File-name suffix used when the directory gives no hint.
    pub fn file_suffix(&self) -> &'static str {
        match self {
            Self::Lesson => "-lesson.json",
            Self::Quiz => "-quiz.json",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_lenient_parse_fixes_case_and_whitespace() {
        assert_eq!(Difficulty::parse_lenient(" beginner "), Some(Difficulty::Beginner));
        assert_eq!(Difficulty::parse_lenient("ADVANCED"), Some(Difficulty::Advanced));
        assert_eq!(Difficulty::parse_lenient("Novice"), None);
    }

    #[test]
    fn difficulty_lenient_parse_maps_legacy_synonyms() {
        assert_eq!(Difficulty::parse_lenient("Basic"), Some(Difficulty::Beginner));
        assert_eq!(Difficulty::parse_lenient("expert"), Some(Difficulty::Advanced));
        assert_eq!(Difficulty::parse_lenient(" EXPERT "), Some(Difficulty::Advanced));
    }

    #[test]
    fn difficulty_names_match_as_str() {
        let names: Vec<&str> = Difficulty::all().iter().map(|d| d.as_str()).collect();
        assert_eq!(names, Difficulty::NAMES);
    }

    #[test]
    fn question_type_serde_uses_kebab_case() {
        let json = serde_json::to_string(&QuestionType::MultipleChoice).unwrap();
        assert_eq!(json, "\"multiple-choice\"");
        let parsed: QuestionType = serde_json::from_str("\"open-ended\"").unwrap();
        assert_eq!(parsed, QuestionType::OpenEnded);
    }

    #[test]
    fn question_type_choice_rules() {
        assert!(QuestionType::MultipleChoice.is_choice_based());
        assert!(QuestionType::TrueFalse.is_choice_based());
        assert!(!QuestionType::OpenEnded.is_choice_based());
        assert!(!QuestionType::Coding.is_choice_based());
        assert_eq!(QuestionType::MultipleChoice.canonical_choice_count(), Some(4));
        assert_eq!(QuestionType::TrueFalse.canonical_choice_count(), Some(2));
        assert_eq!(QuestionType::OpenEnded.canonical_choice_count(), None);
    }

    #[test]
    fn unknown_question_type_is_rejected() {
        let err = "essay".parse::<QuestionType>().unwrap_err();
        assert!(err.to_string().contains("open-ended"));
    }

    #[test]
    fn content_kind_layout_conventions() {
        assert_eq!(ContentKind::Lesson.directory_name(), "lessons");
        assert_eq!(ContentKind::Quiz.directory_name(), "quizzes");
        assert_eq!(ContentKind::Lesson.file_suffix(), "-lesson.json");
        assert_eq!(ContentKind::Quiz.file_suffix(), "-quiz.json");
    }
}
