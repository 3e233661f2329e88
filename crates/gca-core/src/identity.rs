//! # Content Identifiers
//!
//! Newtype wrappers for the identifiers found in content files.
//!
//! Content ids have flip-flopped between integers and strings across
//! backend migrations, so `ContentId` is opaque: it accepts either form on
//! the way in and is always written back as a string. Nothing inside the
//! toolchain branches on the original JSON type.

use std::path::Path;

use serde_json::Value;

/// Identifier of a lesson or a question.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentId(String);

impl ContentId {
    /// Wrap an identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The canonical id for a 1-based position.
    pub fn sequential(position: usize) -> Self {
        Self(position.to_string())
    }

    /// Read an id from a JSON value.
    ///
    /// Accepts strings and integers. Floats, booleans, null and containers
    /// are not identifiers and yield `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self(s.clone())),
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(Self(n.to_string())),
            _ => None,
        }
    }

    /// Access the id text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric value when the id is a plain non-negative integer.
    pub fn as_number(&self) -> Option<u64> {
        if self.0.is_empty() || !self.0.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        self.0.parse().ok()
    }

    /// The canonical JSON form (always a string).
    pub fn to_json(&self) -> Value {
        Value::String(self.0.clone())
    }
}

impl std::fmt::Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Slug naming the module that owns a lesson file or quiz.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleSlug(String);

impl ModuleSlug {
    /// Wrap a slug string.
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// Derive the slug from a content file name.
    ///
    /// `react-fundamentals.json` and `react-fundamentals-quiz.json` both
    /// give `react-fundamentals`.
    pub fn from_file_name(path: &Path) -> Option<Self> {
        let stem = path.file_stem()?.to_str()?;
        let slug = stem
            .strip_suffix("-lesson")
            .or_else(|| stem.strip_suffix("-lessons"))
            .or_else(|| stem.strip_suffix("-quiz"))
            .unwrap_or(stem);
        if slug.is_empty() {
            None
        } else {
            Some(Self(slug.to_string()))
        }
    }

    /// Access the slug text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable title: `react-fundamentals` becomes `React Fundamentals`.
    pub fn title_case(&self) -> String {
        self.0
            .split(['-', '_'])
            .filter(|w| !w.is_empty())
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for ModuleSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integer_and_string_ids_are_interchangeable() {
        assert_eq!(ContentId::from_json(&json!(3)), ContentId::from_json(&json!("3")));
    }

    #[test]
    fn non_identifier_values_are_rejected() {
        assert!(ContentId::from_json(&json!(1.5)).is_none());
        assert!(ContentId::from_json(&json!(true)).is_none());
        assert!(ContentId::from_json(&json!(null)).is_none());
        assert!(ContentId::from_json(&json!([1])).is_none());
    }

    #[test]
    fn id_is_written_as_string() {
        let id = ContentId::from_json(&json!(12)).unwrap();
        assert_eq!(id.to_json(), json!("12"));
    }

    #[test]
    fn numeric_view_only_for_plain_digits() {
        assert_eq!(ContentId::new("42").as_number(), Some(42));
        assert_eq!(ContentId::new("lesson-4").as_number(), None);
        assert_eq!(ContentId::new("").as_number(), None);
        assert_eq!(ContentId::new("-1").as_number(), None);
    }

    #[test]
    fn sequential_is_one_based_text() {
        assert_eq!(ContentId::sequential(1).as_str(), "1");
    }

    #[test]
    fn slug_from_file_name_strips_kind_suffix() {
        let slug = ModuleSlug::from_file_name(Path::new("content/quizzes/react-fundamentals-quiz.json"));
        assert_eq!(slug.unwrap().as_str(), "react-fundamentals");
        let slug = ModuleSlug::from_file_name(Path::new("lessons/web-fundamentals.json"));
        assert_eq!(slug.unwrap().as_str(), "web-fundamentals");
    }

    #[test]
    fn slug_title_case() {
        assert_eq!(ModuleSlug::new("dotnet-fundamentals").title_case(), "Dotnet Fundamentals");
        assert_eq!(ModuleSlug::new("e2e_testing").title_case(), "E2e Testing");
    }
}
