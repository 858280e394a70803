//! Configuration management for photodup.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. Every section implements `Default`, so partial files are fine.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for photodup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Photo collection location and media kinds
    pub store: StoreConfig,

    /// Fingerprint computation
    pub fingerprint: FingerprintConfig,

    /// Similarity tier thresholds
    pub similarity: SimilarityConfig,

    /// Duplicate grouping
    pub grouping: GroupingConfig,

    /// Background scan jobs
    pub jobs: JobsConfig,

    /// HTTP server
    pub server: ServerConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.photodup.photodup/config.toml
    /// - Linux: ~/.config/photodup/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\photodup\config\config.toml
    ///
    /// Falls back to ~/.photodup/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "photodup", "photodup")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".photodup").join("config.toml")
            })
    }

    /// Get the resolved photo root directory (with ~ expansion).
    pub fn store_root(&self) -> PathBuf {
        let path_str = self.store.root.to_string_lossy();
        let expanded = shellexpand::tilde(&path_str);
        PathBuf::from(expanded.into_owned())
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.similarity.global_max_distance, 5);
        assert_eq!(config.similarity.segment_max_distance, 10);
        assert_eq!(config.similarity.segment_match_fraction, 0.5);
        assert_eq!(config.similarity.resize_max_distance, 10);
        assert_eq!(config.grouping.max_group_size, 12);
        assert_eq!(config.fingerprint.resize_dimension, 128);
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[similarity]"));
        assert!(toml.contains("[grouping]"));
        assert!(toml.contains("[fingerprint.segments]"));
    }

    #[test]
    fn test_config_toml_round_trip() {
        let mut config = Config::default();
        config.similarity.segment_match_fraction = 0.15;
        config.similarity.resize_max_distance = 18;
        let parsed = Config::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed.similarity.segment_match_fraction, 0.15);
        assert_eq!(parsed.similarity.resize_max_distance, 18);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_toml("[grouping]\nmax_group_size = 4\n").unwrap();
        assert_eq!(config.grouping.max_group_size, 4);
        assert_eq!(config.grouping.progress_batch, 2000);
        assert_eq!(config.similarity.global_max_distance, 5);
    }

    #[test]
    fn test_invalid_config_is_rejected_on_load() {
        let err = Config::from_toml("[grouping]\nmax_group_size = 1\n").unwrap_err();
        assert!(err.to_string().contains("max_group_size"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nbind = \"0.0.0.0:9000\"\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:9000");
    }

    #[test]
    fn test_store_root_expands_tilde() {
        let config = Config::default();
        assert!(!config.store_root().to_string_lossy().starts_with('~'));
    }
}
