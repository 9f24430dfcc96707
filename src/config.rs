//! Configuration file support
//!
//! Loads settings from ~/.wmltag.toml (or %USERPROFILE%\.wmltag.toml on Windows)
//!
//! Example:
//! ```text
//! # wmltag configuration
//! store-dir = "/home/me/.wmltag"
//! line-numbers = true
//! seed-library = true
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, TagError};
use crate::storage::FileStore;

/// Configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Directory holding the dictionary and settings blobs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_dir: Option<PathBuf>,
    /// Whether to show line numbers
    pub line_numbers: bool,
    /// Merge the built-in tag library on startup
    pub seed_library: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: None,
            line_numbers: true,
            seed_library: true,
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".wmltag.toml"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".wmltag.toml"))
        }
    }

    /// Load configuration from the default file
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Config::default(),
        }
    }

    /// Load configuration from `path`; a missing or bad file gives defaults
    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = fs::read_to_string(path) else {
            return Config::default();
        };
        Self::parse(&contents).unwrap_or_else(|e| {
            warn!("Ignoring {}: {}", path.display(), e);
            Config::default()
        })
    }

    /// Parse config file contents
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| TagError::Config(e.to_string()))
    }

    /// Directory for the blob store
    pub fn store_dir(&self) -> Option<PathBuf> {
        self.store_dir.clone().or_else(FileStore::default_dir)
    }

    /// Save current configuration to the default file
    pub fn save(&self) -> Result<()> {
        match Self::config_path() {
            Some(path) => self.save_to(&path),
            None => Err(TagError::Config("no home directory".to_string())),
        }
    }

    /// Save current configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let body = toml::to_string(self).map_err(|e| TagError::Config(e.to_string()))?;
        fs::write(path, format!("# wmltag configuration\n\n{}", body))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let contents = r#"
# Comment
store-dir = "/tmp/tags"
line-numbers = false
seed-library = false
        "#;

        let config = Config::parse(contents).unwrap();
        assert_eq!(config.store_dir, Some(PathBuf::from("/tmp/tags")));
        assert!(!config.line_numbers);
        assert!(!config.seed_library);
        assert_eq!(config.store_dir(), Some(PathBuf::from("/tmp/tags")));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = Config::parse("line-numbers = false\n").unwrap();
        assert_eq!(config.store_dir, None);
        assert!(!config.line_numbers);
        assert!(config.seed_library);
    }

    #[test]
    fn test_bad_config() {
        assert!(matches!(
            Config::parse("line-numbers = \"maybe\""),
            Err(TagError::Config(_))
        ));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "line-numbers = [").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
        assert_eq!(Config::load_from(&dir.path().join("absent.toml")), Config::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wmltag.toml");
        let config = Config {
            store_dir: Some(dir.path().join("store")),
            line_numbers: false,
            seed_library: true,
        };

        config.save_to(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# wmltag configuration"));
        assert!(text.contains("line-numbers = false"));
        assert_eq!(Config::load_from(&path), config);
    }
}
