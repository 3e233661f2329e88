//! # Error Types
//!
//! Library-level errors for the content toolchain. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! Per-file content problems are *not* errors: they are collected as
//! violations by `gca-schema` and never abort a batch. `GcaError` covers
//! the operations that genuinely fail (reading configuration, producing
//! output, parsing a closed vocabulary from user input).

use thiserror::Error;

/// Top-level error type for the content toolchain.
#[derive(Error, Debug)]
pub enum GcaError {
    /// A value did not belong to a closed vocabulary.
    #[error("unknown {field} {value:?}: expected one of {allowed}")]
    UnknownVariant {
        /// Name of the vocabulary (e.g. "difficulty").
        field: &'static str,
        /// The rejected input.
        value: String,
        /// Comma-separated list of accepted values.
        allowed: String,
    },

    /// JSON serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration could not be loaded or was rejected.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl GcaError {
    /// Build an [`GcaError::UnknownVariant`] from a vocabulary listing.
    pub fn unknown_variant(field: &'static str, value: &str, allowed: &[&str]) -> Self {
        Self::UnknownVariant {
            field,
            value: value.to_string(),
            allowed: allowed.join(", "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_variant_lists_allowed_values() {
        let err = GcaError::unknown_variant("difficulty", "Expert", &["Beginner", "Advanced"]);
        let msg = err.to_string();
        assert!(msg.contains("\"Expert\""));
        assert!(msg.contains("Beginner, Advanced"));
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: GcaError = io.into();
        assert!(matches!(err, GcaError::Io(_)));
    }
}
