//! Batch report model.
//!
//! Pure data produced by [`crate::batch::run_batch`]; rendering lives in
//! the CLI.

use std::path::PathBuf;

use serde::Serialize;

use gca_core::ContentKind;

use crate::registry::ValidationMode;
use crate::violation::{Change, ValidationViolations, Violation};

/// Outcome for one content file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Path as discovered under the root.
    pub path: PathBuf,
    /// Classification; `None` when the file could not be reached at all.
    pub kind: Option<ContentKind>,
    /// Violations found in the file as read.
    pub violations: ValidationViolations,
    /// Edits made by the normalizer. In dry-run mode, the edits `--apply` would make.
    pub changes: Vec<Change>,
    /// Violations left after the run. Equal to `violations` in dry-run mode.
    pub remaining: ValidationViolations,
    /// Whether the file was rewritten.
    pub written: bool,
}

impl FileReport {
    /// Report for a file that failed before validation (I/O, parse).
    pub fn failed(path: PathBuf, kind: Option<ContentKind>, violation: Violation) -> Self {
        let violations = ValidationViolations::new(vec![violation]);
        Self {
            path,
            kind,
            remaining: violations.clone(),
            violations,
            changes: Vec::new(),
            written: false,
        }
    }

    /// Valid after the run.
    pub fn is_valid(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Had violations that the run removed.
    pub fn was_fixed(&self) -> bool {
        !self.violations.is_empty() && self.remaining.is_empty()
    }
}

/// Aggregate counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Content files validated.
    pub total: usize,
    /// Files with no remaining violations.
    pub valid: usize,
    /// Files with remaining violations.
    pub invalid: usize,
    /// Files that were invalid before the run and valid after it.
    pub fixed: usize,
    /// JSON files that were excluded or not recognised as content.
    pub skipped: usize,
}

/// Everything one batch run found and did.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// Root that was walked.
    pub root: PathBuf,
    /// Whether fixes were written.
    pub apply: bool,
    /// Validation mode used.
    pub mode: ValidationMode,
    /// Per-file outcomes, in walk order.
    pub files: Vec<FileReport>,
    /// JSON files skipped, in walk order.
    pub skipped: Vec<PathBuf>,
    /// Totals.
    pub summary: BatchSummary,
}

impl BatchReport {
    /// Assemble a report and compute its summary.
    pub fn new(
        root: PathBuf,
        apply: bool,
        mode: ValidationMode,
        files: Vec<FileReport>,
        skipped: Vec<PathBuf>,
    ) -> Self {
        let valid = files.iter().filter(|f| f.is_valid()).count();
        let summary = BatchSummary {
            total: files.len(),
            valid,
            invalid: files.len() - valid,
            fixed: files.iter().filter(|f| f.was_fixed()).count(),
            skipped: skipped.len(),
        };
        Self { root, apply, mode, files, skipped, summary }
    }

    /// True when no file remains invalid.
    pub fn is_success(&self) -> bool {
        self.summary.invalid == 0
    }
}
