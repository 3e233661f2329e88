//! Resolution of `correctAnswer` values to choice indices.
//!
//! Content files store the answer either as a 0-based index or as text:
//! the full choice text, the text with different capitalisation or
//! spacing, or a single letter `a`..`d`. Resolution tries those forms in
//! that order and never guesses between two candidates.

use serde_json::Value;

use crate::check::{is_integer, json_type_name};

/// Letters accepted as answer references, in index order.
const ANSWER_LETTERS: [char; 4] = ['a', 'b', 'c', 'd'];

/// Which rule resolved a textual answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// The value was already an integer index.
    Index,
    /// Identical to a choice.
    Exact,
    /// Equal to a choice ignoring case and whitespace runs.
    Normalized,
    /// A single letter `a`..`d`.
    Letter,
}

/// Outcome of [`resolve_answer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerResolution {
    /// In-range index.
    Index {
        /// 0-based choice index.
        index: usize,
        /// How it was found.
        rule: MatchRule,
    },
    /// An index (given or derived from a letter) outside `0..choices`.
    OutOfRange {
        /// The offending index.
        index: i64,
        /// Number of choices available.
        choices: usize,
    },
    /// Text matching several choices once normalized.
    Ambiguous {
        /// The answer text.
        text: String,
        /// Indices of the candidate choices.
        candidates: Vec<usize>,
    },
    /// Text matching no choice by any rule.
    Unresolved(String),
    /// Neither an integer nor a string.
    WrongType(&'static str),
}

impl AnswerResolution {
    /// The resolved index, if any.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Index { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Message for a failed resolution, or `None` on success.
    pub fn failure_message(&self, field: &str, raw: &Value) -> Option<String> {
        match self {
            Self::Index { .. } => None,
            Self::OutOfRange { choices, .. } => Some(format!(
                "{field} {raw} is out of range for {choices} choices (expected 0..{})",
                choices.saturating_sub(1)
            )),
            Self::Ambiguous { text, candidates } => Some(format!(
                "{field} \"{text}\" matches several choices ({})",
                candidates.iter().map(usize::to_string).collect::<Vec<_>>().join(", ")
            )),
            Self::Unresolved(text) => {
                Some(format!("{field} \"{text}\" does not match any choice"))
            }
            Self::WrongType(actual) => Some(format!(
                "wrong type for '{field}': expected integer index or answer text, got {actual}"
            )),
        }
    }
}

/// Lowercase and collapse whitespace runs into single spaces.
fn normalize_text(s: &str) -> String {
    s.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

fn letter_index(s: &str) -> Option<usize> {
    let mut chars = s.trim().chars();
    let c = chars.next()?.to_ascii_lowercase();
    if chars.next().is_some() {
        return None;
    }
    ANSWER_LETTERS.iter().position(|l| *l == c)
}

/// Resolve an answer value against the question's choices.
pub fn resolve_answer(value: &Value, choices: &[String]) -> AnswerResolution {
    if is_integer(value) {
        let index = value.as_i64().unwrap_or(i64::MAX);
        return match usize::try_from(index) {
            Ok(i) if i < choices.len() => AnswerResolution::Index { index: i, rule: MatchRule::Index },
            _ => AnswerResolution::OutOfRange { index, choices: choices.len() },
        };
    }
    let Some(text) = value.as_str() else {
        return AnswerResolution::WrongType(json_type_name(value));
    };

    if let Some(i) = choices.iter().position(|c| c == text) {
        return AnswerResolution::Index { index: i, rule: MatchRule::Exact };
    }

    let wanted = normalize_text(text);
    let candidates: Vec<usize> = choices
        .iter()
        .enumerate()
        .filter(|(_, c)| normalize_text(c) == wanted)
        .map(|(i, _)| i)
        .collect();
    match candidates.as_slice() {
        [i] => return AnswerResolution::Index { index: *i, rule: MatchRule::Normalized },
        [] => {}
        _ => return AnswerResolution::Ambiguous { text: text.to_string(), candidates },
    }

    match letter_index(text) {
        Some(i) if i < choices.len() => AnswerResolution::Index { index: i, rule: MatchRule::Letter },
        Some(i) => AnswerResolution::OutOfRange { index: i as i64, choices: choices.len() },
        None => AnswerResolution::Unresolved(text.to_string()),
    }
}
