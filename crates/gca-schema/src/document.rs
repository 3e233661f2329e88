//! # Document I/O
//!
//! Reading content files into `serde_json::Value` and writing them back in
//! the canonical layout.
//!
//! Writes go to a temporary file in the target's directory which is then
//! renamed over the original, so a crash leaves either the old or the new
//! content on disk, never a truncated file. The original file's
//! permissions are carried over.

use std::io::Write;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use gca_core::CanonicalJson;

use crate::violation::{Violation, ViolationKind};

/// Errors from reading or writing a content file.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The file could not be read.
    #[error("cannot read {path}: {reason}")]
    Read {
        /// File path.
        path: String,
        /// Underlying cause.
        reason: String,
    },

    /// The file is not valid JSON.
    #[error("malformed JSON in {path}: {reason}")]
    Malformed {
        /// File path.
        path: String,
        /// Parser message with line and column.
        reason: String,
    },

    /// The file could not be written.
    #[error("cannot write {path}: {reason}")]
    Write {
        /// File path.
        path: String,
        /// Underlying cause.
        reason: String,
    },
}

impl DocumentError {
    /// The violation attributed to the whole file.
    pub fn to_violation(&self) -> Violation {
        let (kind, message) = match self {
            Self::Read { reason, .. } => (ViolationKind::Io, format!("cannot read file: {reason}")),
            Self::Malformed { reason, .. } => (ViolationKind::MalformedJson, format!("malformed JSON: {reason}")),
            Self::Write { reason, .. } => (ViolationKind::Io, format!("cannot write file: {reason}")),
        };
        Violation::new("", kind, message)
    }
}

/// Read and parse a JSON file.
///
/// # Errors
///
/// `DocumentError::Read` for I/O failures (including invalid UTF-8) and
/// `DocumentError::Malformed` for unparseable content. Malformed files are
/// never repaired.
pub fn read_document(path: &Path) -> Result<Value, DocumentError> {
    let content = std::fs::read_to_string(path).map_err(|e| DocumentError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| DocumentError::Malformed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Write `doc` to `path` in the canonical layout, atomically.
///
/// # Errors
///
/// `DocumentError::Write` if serialization, the temporary file, or the
/// final rename fails. The original file is untouched in that case.
pub fn write_document(path: &Path, doc: &Value) -> Result<(), DocumentError> {
    let write_err = |reason: String| DocumentError::Write { path: path.display().to_string(), reason };

    let canonical = CanonicalJson::new(doc).map_err(|e| write_err(e.to_string()))?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| write_err(e.to_string()))?;
    tmp.write_all(canonical.as_bytes()).map_err(|e| write_err(e.to_string()))?;
    tmp.as_file().sync_all().map_err(|e| write_err(e.to_string()))?;
    if let Ok(meta) = std::fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(|e| write_err(e.to_string()))?;
    }
    tmp.persist(path).map_err(|e| write_err(e.error.to_string()))?;
    Ok(())
}
