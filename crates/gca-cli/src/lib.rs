//! # gca-cli: GlassCode Academy Content Tool
//!
//! Library half of the `gca` binary. Subcommand handlers live here so
//! integration tests can drive them without spawning a process.
//!
//! ## Subcommands
//!
//! - `gca validate <ROOT>`: validate every lesson and quiz file under a
//!   content root; with `--apply`, rewrite them into canonical form.
//! - `gca schema [KIND]`: print the schema registry.

pub mod config;
pub mod output;
pub mod schema;
pub mod validate;
