//! # Validate Subcommand
//!
//! Runs the batch validator over a content root and prints a report.
//! Settings come from the config file first; command-line flags are
//! applied on top.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use gca_schema::{run_batch, BatchOptions, ValidationMode};

use crate::config::{load_config, ContentConfig, OutputFormat};
use crate::output::write_report;

/// Arguments for the `gca validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Content root to walk (usually the `content/` directory).
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Write normalized files back. Without it, nothing is modified.
    #[arg(long)]
    pub apply: bool,

    /// Enforce canonical cardinalities, ordering and explicit ids.
    #[arg(long)]
    pub strict: bool,

    /// Drop `legacy` fields when applying fixes.
    #[arg(long)]
    pub remove_legacy: bool,

    /// Report format.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Skip files whose path (relative to ROOT) contains PATTERN. Repeatable.
    #[arg(long, value_name = "PATTERN")]
    pub exclude: Vec<String>,
}

/// Settings after layering flags over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    /// Use strict validation.
    pub strict: bool,
    /// Drop `legacy` fields.
    pub remove_legacy: bool,
    /// Report format.
    pub format: OutputFormat,
    /// Combined exclusion patterns.
    pub exclude: Vec<String>,
}

impl ResolvedSettings {
    /// Layer `args` over `config`.
    pub fn resolve(config: ContentConfig, args: &ValidateArgs) -> Self {
        let mut exclude = config.exclude;
        exclude.extend(args.exclude.iter().cloned());
        Self {
            strict: config.strict || args.strict,
            remove_legacy: config.remove_legacy || args.remove_legacy,
            format: args.format.unwrap_or(config.format),
            exclude,
        }
    }

    fn batch_options(&self, apply: bool) -> BatchOptions {
        BatchOptions {
            apply,
            mode: if self.strict { ValidationMode::Strict } else { ValidationMode::Lenient },
            remove_legacy: self.remove_legacy,
            exclude: self.exclude.clone(),
        }
    }
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when every content file is valid after the run,
/// 1 otherwise. A missing root or unreadable config is an error.
pub fn run_validate(args: &ValidateArgs, config_path: Option<&Path>) -> Result<u8> {
    run_validate_to(args, config_path, &mut std::io::stdout().lock())
}

/// Like [`run_validate`], writing the report to `out`.
pub fn run_validate_to(
    args: &ValidateArgs,
    config_path: Option<&Path>,
    out: &mut impl std::io::Write,
) -> Result<u8> {
    let config = load_config(config_path, &args.root).context("failed to load configuration")?;
    let settings = ResolvedSettings::resolve(config, args);
    let options = settings.batch_options(args.apply);

    tracing::info!(
        root = %args.root.display(),
        apply = options.apply,
        mode = ?options.mode,
        "validating content"
    );

    let report = run_batch(&args.root, &options)
        .with_context(|| format!("cannot validate {}", args.root.display()))?;
    write_report(&report, settings.format, out)?;

    Ok(if report.is_success() { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(root: &str) -> ValidateArgs {
        ValidateArgs {
            root: PathBuf::from(root),
            apply: false,
            strict: false,
            remove_legacy: false,
            format: None,
            exclude: Vec::new(),
        }
    }

    #[test]
    fn config_values_apply_without_flags() {
        let config = ContentConfig {
            strict: true,
            remove_legacy: true,
            format: OutputFormat::Json,
            exclude: vec!["SCHEMA".into()],
        };
        let settings = ResolvedSettings::resolve(config, &args("content"));
        assert!(settings.strict);
        assert!(settings.remove_legacy);
        assert_eq!(settings.format, OutputFormat::Json);
        assert_eq!(settings.exclude, vec!["SCHEMA"]);
    }

    #[test]
    fn flags_switch_on_and_extend() {
        let mut a = args("content");
        a.strict = true;
        a.exclude = vec!["archive".into()];
        a.format = Some(OutputFormat::Text);
        let config = ContentConfig {
            format: OutputFormat::Json,
            exclude: vec!["SCHEMA".into()],
            ..Default::default()
        };
        let settings = ResolvedSettings::resolve(config, &a);
        assert!(settings.strict);
        assert!(!settings.remove_legacy);
        assert_eq!(settings.format, OutputFormat::Text);
        assert_eq!(settings.exclude, vec!["SCHEMA", "archive"]);
    }

    #[test]
    fn unset_flag_does_not_switch_config_off() {
        let config = ContentConfig { strict: true, ..Default::default() };
        let settings = ResolvedSettings::resolve(config, &args("content"));
        assert_eq!(settings.batch_options(false).mode, ValidationMode::Strict);
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let a = args(&dir.path().join("absent").to_string_lossy());
        let mut out = Vec::new();
        let err = run_validate_to(&a, None, &mut out).unwrap_err();
        assert!(format!("{err:#}").contains("content root not found"));
        assert!(out.is_empty());
    }
}
