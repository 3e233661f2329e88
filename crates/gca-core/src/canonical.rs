//! # Canonical JSON: the on-disk layout of content files
//!
//! `CanonicalJson` is the sole construction path for bytes written back to
//! a lesson or quiz file. The layout is the one the content repository
//! already uses: two-space indentation, `": "` separators, UTF-8 kept as-is
//! (no `\u` escaping of non-ASCII text) and a single trailing newline.
//!
//! ## Invariants
//!
//! - Object keys keep their document order. The workspace enables
//!   `serde_json/preserve_order`, so re-serializing a parsed file does not
//!   shuffle fields.
//! - Serializing the same value twice yields identical bytes.
//! - The inner `String` is private; the only constructor is
//!   [`CanonicalJson::new`].

use serde::Serialize;

use crate::error::GcaError;

/// Serialized content document in the repository's canonical layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalJson(String);

impl CanonicalJson {
    /// Serialize any value into the canonical layout.
    ///
    /// # Errors
    ///
    /// Returns `GcaError::Serialization` if the value cannot be represented
    /// as JSON (for example a map with non-string keys).
    pub fn new(obj: &impl Serialize) -> Result<Self, GcaError> {
        let mut text = serde_json::to_string_pretty(obj)?;
        text.push('\n');
        Ok(Self(text))
    }

    /// Access the serialized text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Access the serialized bytes for writing.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

}
