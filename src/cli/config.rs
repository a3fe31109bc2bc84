//! TOML configuration file support.
//!
//! Instead of repeating `--group` on every command, the base group can be
//! set in a config file:
//!
//! ```toml
//! # mrdset.toml
//! [dataset]
//! group_name = "/dataset"
//! ```
//!
//! A `--group` flag always wins over the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use mrdset::dataset::DatasetConfig;

/// Root configuration structure for mrdset.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Dataset settings.
    #[serde(default)]
    pub dataset: DatasetSection,
}

/// The `[dataset]` table.
#[derive(Debug, Default, Deserialize)]
pub struct DatasetSection {
    /// Base group of the dataset inside the container.
    pub group_name: Option<String>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load the file when given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map(Self::from_file).transpose().map(Option::unwrap_or_default)
    }

    /// Base group after applying a command-line override.
    pub fn group_name(&self, flag: Option<String>) -> String {
        flag.or_else(|| self.dataset.group_name.clone())
            .unwrap_or_else(|| DatasetConfig::default().group_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [dataset]
            group_name = "/study/series_2"
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.dataset.group_name.as_deref(), Some("/study/series_2"));
        assert_eq!(config.group_name(None), "/study/series_2");
    }

    #[test]
    fn test_flag_overrides_file() {
        let config = Config::from_str("[dataset]\ngroup_name = \"/a\"\n").unwrap();
        assert_eq!(config.group_name(Some("/b".to_string())), "/b");
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.dataset.group_name, None);
        assert_eq!(config.group_name(None), "/dataset");
    }

    #[test]
    fn test_load_without_file() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.group_name(None), "/dataset");
    }
}
