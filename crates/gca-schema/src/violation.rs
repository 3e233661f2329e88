//! Violations and change records.
//!
//! Both are plain data. A violation never aborts anything: validators
//! collect them and the batch runner attaches them to the file report.

use serde::Serialize;

/// Category of a violation, for machine-readable reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A required field is absent or null.
    MissingField,
    /// A field has the wrong JSON shape.
    WrongType,
    /// A field has the right shape but a value outside its allowed set or range.
    InvalidValue,
    /// Two fields disagree (declared count, alias pair, duplicate order).
    Inconsistent,
    /// An answer that cannot be resolved to a choice.
    UnresolvedAnswer,
    /// The document shape itself is wrong (not an array, not an object).
    Structure,
    /// The file is not parseable JSON.
    MalformedJson,
    /// The file could not be read or written.
    Io,
}

/// One problem found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Position inside the document, e.g. `Lesson 0: pitfalls[1]`. Empty
    /// for document-level problems.
    pub location: String,
    /// Category.
    pub kind: ViolationKind,
    /// Human-readable message.
    pub message: String,
}

impl Violation {
    /// Build a violation.
    pub fn new(location: impl Into<String>, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self { location: location.into(), kind, message: message.into() }
    }

    /// `missing field: NAME`.
    pub fn missing_field(location: &str, field: &str) -> Self {
        Self::new(location, ViolationKind::MissingField, format!("missing field: {field}"))
    }

    /// `wrong type for 'NAME': expected X, got Y`.
    pub fn wrong_type(location: &str, field: &str, expected: &str, actual: &str) -> Self {
        Self::new(
            location,
            ViolationKind::WrongType,
            format!("wrong type for '{field}': expected {expected}, got {actual}"),
        )
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.location.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.location, self.message)
        }
    }
}

/// A collection of violations for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationViolations(Vec<Violation>);

impl ValidationViolations {
    /// Wrap a list of violations.
    pub fn new(violations: Vec<Violation>) -> Self {
        Self(violations)
    }

    /// Number of violations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no violation was found.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Access the violations.
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    /// Iterate over the violations.
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }
}

impl std::fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {v}")?;
        }
        Ok(())
    }
}

/// One edit the normalizer made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    /// Position inside the document, same convention as [`Violation`].
    pub location: String,
    /// What was done.
    pub description: String,
}

impl Change {
    /// Build a change record.
    pub fn new(location: impl Into<String>, description: impl Into<String>) -> Self {
        Self { location: location.into(), description: description.into() }
    }
}

impl std::fmt::Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.location.is_empty() {
            f.write_str(&self.description)
        } else {
            write!(f, "{}: {}", self.location, self.description)
        }
    }
}

/// Append a segment to a location path.
pub fn locate(parent: &str, segment: impl std::fmt::Display) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{parent}: {segment}")
    }
}

/// Location of a list element: `pitfalls[1]`.
pub fn element(parent: &str, field: &str, index: usize) -> String {
    locate(parent, format_args!("{field}[{index}]"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_location() {
        let v = Violation::missing_field("Lesson 0: pitfalls[1]", "severity");
        assert_eq!(v.to_string(), "Lesson 0: pitfalls[1]: missing field: severity");
    }

    #[test]
    fn display_without_location_is_message_only() {
        let v = Violation::missing_field("", "totalQuestions");
        assert_eq!(v.to_string(), "missing field: totalQuestions");
    }

    #[test]
    fn wrong_type_names_both_types() {
        let v = Violation::wrong_type("Question 2", "tags", "list of strings", "string");
        assert_eq!(v.message, "wrong type for 'tags': expected list of strings, got string");
        assert_eq!(v.kind, ViolationKind::WrongType);
    }

    #[test]
    fn location_helpers_compose() {
        assert_eq!(locate("", "Lesson 3"), "Lesson 3");
        assert_eq!(element("Lesson 3", "exercises", 0), "Lesson 3: exercises[0]");
    }

    #[test]
    fn collection_display_indents_each_line() {
        let vs = ValidationViolations::new(vec![
            Violation::missing_field("", "a"),
            Violation::missing_field("", "b"),
        ]);
        assert_eq!(vs.len(), 2);
        assert_eq!(vs.to_string(), "  missing field: a\n  missing field: b");
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&ViolationKind::MalformedJson).unwrap();
        assert_eq!(json, "\"malformed_json\"");
    }
}
