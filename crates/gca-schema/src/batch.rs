//! # Batch Runner
//!
//! Walks a content root, validates every lesson and quiz file, and
//! normalizes each one in memory. Apply mode writes the canonical form
//! back; a dry run only reports the edits it would make.
//!
//! Files are processed one at a time in sorted walk order. A failure in
//! one file (unreadable, malformed, unwritable) becomes a violation in that
//! file's report and the walk continues. Only a missing root is an error.

use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use gca_core::{ContentKind, ModuleSlug};

use crate::classify::{classify, is_json};
use crate::document::{read_document, write_document};
use crate::normalize::{NormalizeOptions, Normalizer};
use crate::registry::ValidationMode;
use crate::report::{BatchReport, FileReport};
use crate::violation::{ValidationViolations, Violation, ViolationKind};

/// Settings for one batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Write normalized files back.
    pub apply: bool,
    /// Validation strictness.
    pub mode: ValidationMode,
    /// Drop `legacy` fields when applying.
    pub remove_legacy: bool,
    /// Path substrings (relative to the root) to skip.
    pub exclude: Vec<String>,
}

/// Errors that stop a batch before any file is processed.
#[derive(Error, Debug)]
pub enum BatchError {
    /// The root does not exist or is not a directory.
    #[error("content root not found: {0}")]
    RootNotFound(PathBuf),
}

impl BatchOptions {
    fn is_excluded(&self, relative: &Path) -> bool {
        let text = relative.to_string_lossy();
        self.exclude.iter().any(|pattern| !pattern.is_empty() && text.contains(pattern.as_str()))
    }
}

/// Run validation and normalization over a content tree.
///
/// # Errors
///
/// `BatchError::RootNotFound` if `root` is not a directory.
pub fn run_batch(root: &Path, options: &BatchOptions) -> Result<BatchReport, BatchError> {
    if !root.is_dir() {
        return Err(BatchError::RootNotFound(root.to_path_buf()));
    }

    let mut files = Vec::new();
    let mut skipped = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                tracing::warn!(path = %path.display(), error = %e, "failed to read directory entry");
                let violation = Violation::new("", ViolationKind::Io, format!("cannot read: {e}"));
                files.push(FileReport::failed(path, None, violation));
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file() || !is_json(path) {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        if options.is_excluded(relative) {
            tracing::debug!(path = %path.display(), "excluded");
            skipped.push(path.to_path_buf());
            continue;
        }
        let Some(kind) = classify(path, root) else {
            tracing::debug!(path = %path.display(), "not a lesson or quiz file, skipping");
            skipped.push(path.to_path_buf());
            continue;
        };

        files.push(process_file(path, kind, options));
    }

    let report = BatchReport::new(root.to_path_buf(), options.apply, options.mode, files, skipped);
    tracing::info!(
        total = report.summary.total,
        valid = report.summary.valid,
        invalid = report.summary.invalid,
        skipped = report.summary.skipped,
        "batch complete"
    );
    Ok(report)
}

/// Validate and normalize one file, rewriting it in apply mode.
pub fn process_file(path: &Path, kind: ContentKind, options: &BatchOptions) -> FileReport {
    tracing::debug!(path = %path.display(), %kind, "validating");

    let doc = match read_document(path) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file");
            return FileReport::failed(path.to_path_buf(), Some(kind), e.to_violation());
        }
    };

    let violations = ValidationViolations::new(crate::validate(&doc, kind, options.mode));
    let normalizer = Normalizer::new(NormalizeOptions {
        remove_legacy: options.remove_legacy,
        module_slug: ModuleSlug::from_file_name(path),
    });
    let normalized = normalizer.normalize(&doc, kind);

    if !options.apply {
        if !normalized.is_unchanged() {
            tracing::debug!(path = %path.display(), changes = normalized.changes.len(), "would normalize");
        }
        return FileReport {
            path: path.to_path_buf(),
            kind: Some(kind),
            remaining: violations.clone(),
            violations,
            changes: normalized.changes,
            written: false,
        };
    }

    let mut remaining = crate::validate(&normalized.document, kind, options.mode);

    let mut written = false;
    if !normalized.is_unchanged() {
        match write_document(path, &normalized.document) {
            Ok(()) => {
                written = true;
                tracing::info!(
                    path = %path.display(),
                    changes = normalized.changes.len(),
                    "wrote normalized file"
                );
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to write normalized file");
                remaining.push(e.to_violation());
            }
        }
    }

    let remaining = ValidationViolations::new(remaining);
    if !remaining.is_empty() {
        tracing::debug!(path = %path.display(), "violations left after normalizing:\n{remaining}");
    }

    FileReport {
        path: path.to_path_buf(),
        kind: Some(kind),
        violations,
        changes: normalized.changes,
        remaining,
        written,
    }
}
