//! # Configuration
//!
//! Optional YAML settings for `gca validate`. Looked up from `--config`
//! or `<ROOT>/gca.yaml`; command-line flags are layered on top by the
//! validate handler.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use gca_core::GcaError;

/// File name probed in the content root when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "gca.yaml";

/// Report rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable report.
    #[default]
    Text,
    /// A single JSON document on stdout.
    Json,
}

/// Settings read from `gca.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    /// Use strict validation.
    pub strict: bool,
    /// Drop `legacy` fields when applying fixes.
    pub remove_legacy: bool,
    /// Report format.
    pub format: OutputFormat,
    /// Path substrings to skip.
    pub exclude: Vec<String>,
}

impl ContentConfig {
    /// Parse a YAML document. A document with no content yields defaults.
    pub fn from_yaml(text: &str) -> Result<Self, GcaError> {
        let has_content = text
            .lines()
            .map(str::trim)
            .any(|line| !line.is_empty() && !line.starts_with('#') && line != "---");
        if !has_content {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| GcaError::Config(e.to_string()))
    }
}

/// Load configuration for a run over `root`.
///
/// An explicit path must exist. Without one, `<root>/gca.yaml` is used when
/// present and defaults otherwise.
pub fn load_config(explicit: Option<&Path>, root: &Path) -> Result<ContentConfig, GcaError> {
    let path: PathBuf = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = root.join(DEFAULT_CONFIG_FILE);
            if !candidate.is_file() {
                tracing::debug!(root = %root.display(), "no config file, using defaults");
                return Ok(ContentConfig::default());
            }
            candidate
        }
    };

    let text = std::fs::read_to_string(&path)?;
    let config = ContentConfig::from_yaml(&text)
        .map_err(|e| match e {
            GcaError::Config(reason) => GcaError::Config(format!("{}: {reason}", path.display())),
            other => other,
        })?;
    tracing::debug!(path = %path.display(), ?config, "loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_keys() {
        let config = ContentConfig::from_yaml(
            "strict: true\nremove_legacy: true\nformat: json\nexclude: [\"SCHEMA\", archive]\n",
        )
        .unwrap();
        assert!(config.strict);
        assert!(config.remove_legacy);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.exclude, vec!["SCHEMA", "archive"]);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ContentConfig::from_yaml("strict: true\n").unwrap();
        assert!(config.strict);
        assert_eq!(config.format, OutputFormat::Text);
        assert!(config.exclude.is_empty());
    }

    #[test]
    fn empty_and_comment_only_files_are_defaults() {
        assert_eq!(ContentConfig::from_yaml("").unwrap(), ContentConfig::default());
        assert_eq!(
            ContentConfig::from_yaml("# nothing here\n---\n").unwrap(),
            ContentConfig::default()
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = ContentConfig::from_yaml("strict: true\ncolour: blue\n").unwrap_err();
        assert!(matches!(err, GcaError::Config(_)));
        assert!(err.to_string().contains("colour"));
    }

    #[test]
    fn bad_format_is_rejected() {
        assert!(ContentConfig::from_yaml("format: xml\n").is_err());
    }

    #[test]
    fn missing_default_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_config(None, dir.path()).unwrap(), ContentConfig::default());
    }

    #[test]
    fn default_file_is_picked_up_from_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "remove_legacy: true\n").unwrap();
        assert!(load_config(None, dir.path()).unwrap().remove_legacy);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("nope.yaml")), dir.path()).unwrap_err();
        assert!(matches!(err, GcaError::Io(_)));
    }

    #[test]
    fn config_error_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "strict: [1, 2]\n").unwrap();
        let err = load_config(Some(&path), dir.path()).unwrap_err();
        assert!(err.to_string().contains("bad.yaml"));
    }
}
