//! # gca-schema: Content Schema Validation and Normalization
//!
//! Validates GlassCode Academy lesson and quiz files against a static
//! schema registry and rewrites them into canonical form.
//!
//! ## Architecture
//!
//! - [`registry`]: fields, types, presence rules, defaults and aliases for
//!   every document shape.
//! - [`check`]: generic shape checks against registry entries.
//! - [`alias`]: canonicalization of alternate field names, run before any
//!   validation.
//! - [`answer`]: resolution of answer values to choice indices.
//! - [`lesson`] and [`quiz`]: document validators.
//! - [`normalize`]: the idempotent fixer.
//! - [`classify`], [`document`], [`batch`], [`report`]: the directory
//!   walk, file I/O and aggregate reporting.
//!
//! ## Error Model
//!
//! Validation never fails: problems are [`Violation`] values. Only
//! operations that touch the file system return `Result`.

pub mod alias;
pub mod answer;
pub mod batch;
pub mod check;
pub mod classify;
pub mod document;
pub mod lesson;
pub mod normalize;
pub mod quiz;
pub mod registry;
pub mod report;
pub mod violation;

use serde_json::Value;

use gca_core::ContentKind;

pub use answer::{resolve_answer, AnswerResolution};
pub use batch::{run_batch, BatchError, BatchOptions};
pub use document::DocumentError;
pub use lesson::{validate_lesson, validate_lesson_file};
pub use normalize::{normalize, NormalizeOptions, Normalized, Normalizer};
pub use quiz::{validate_question, validate_quiz};
pub use registry::{SchemaKind, ValidationMode};
pub use report::{BatchReport, BatchSummary, FileReport};
pub use violation::{Change, ValidationViolations, Violation, ViolationKind};

/// Validate a whole content file of the given kind.
pub fn validate(doc: &Value, kind: ContentKind, mode: ValidationMode) -> Vec<Violation> {
    match kind {
        ContentKind::Lesson => validate_lesson_file(doc, mode),
        ContentKind::Quiz => validate_quiz(doc, mode),
    }
}
