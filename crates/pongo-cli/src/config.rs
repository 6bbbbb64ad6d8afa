//! CLI settings file
//!
//! Optional TOML file supplying defaults for command-line flags:
//!
//! ```toml
//! default_action = "serialize"
//! output = "json"
//! strict_version = false
//! ```

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

use crate::cli::commands::ActionArg;
use crate::cli::output::OutputFormat;

/// Settings read from the `--config` file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Action used when `--action` is not given
    pub default_action: ActionArg,

    /// Output format used when `--format` is not given
    pub output: OutputFormat,

    /// Require the schema envelope and its `$version`.
    ///
    /// When disabled, a bare schema node is accepted and wrapped in a
    /// current-version envelope before decoding.
    pub strict_version: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            default_action: ActionArg::Parse,
            output: OutputFormat::Table,
            strict_version: true,
        }
    }
}

impl CliConfig {
    /// Parse settings from TOML text
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("Invalid settings file")
    }

    /// Load settings from `path`, or the defaults when no path is given
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file '{}'", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to load settings from '{}'", path.display()))?;

        tracing::debug!(path = %path.display(), ?config, "loaded CLI settings");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::from_toml_str("").unwrap();
        assert_eq!(config, CliConfig::default());
        assert!(config.strict_version);
    }

    #[test]
    fn test_partial_file() {
        let config = CliConfig::from_toml_str("output = \"yaml\"\nstrict_version = false").unwrap();
        assert_eq!(config.output, OutputFormat::Yaml);
        assert_eq!(config.default_action, ActionArg::Parse);
        assert!(!config.strict_version);
    }

    #[test]
    fn test_rejects_unknown_fields() {
        assert!(CliConfig::from_toml_str("colour = true").is_err());
        assert!(CliConfig::from_toml_str("default_action = \"validate\"").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = CliConfig::load(Some(Path::new("/nonexistent/pongo.toml"))).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read settings file"));
    }
}
