//! # gca-core: Foundational Types for the Content Toolchain
//!
//! Leaf crate of the workspace. It defines the vocabulary shared by the
//! schema, normalization and CLI layers: the small closed enums that content
//! files draw their values from, identifier newtypes, and the one code path
//! that turns a JSON document back into file bytes.
//!
//! ## Key Design Principles
//!
//! 1. **Opaque identifiers.** Lesson and question ids arrive as strings or
//!    integers depending on which tool last touched the file. `ContentId`
//!    accepts both and always writes a string.
//!
//! 2. **Closed enums for closed vocabularies.** `Difficulty`, `QuestionType`
//!    and `ContentKind` are exhaustive; adding a variant forces every
//!    consumer to handle it.
//!
//! 3. **`CanonicalJson` newtype.** Every write back to a content file goes
//!    through `CanonicalJson::new()`, so all files share one layout.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `gca-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod domain;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalJson;
pub use domain::{ContentKind, Difficulty, QuestionType};
pub use error::GcaError;
pub use identity::{ContentId, ModuleSlug};
pub use temporal::ContentDate;
