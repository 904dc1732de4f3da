//! Configuration management for the CLI
//!
//! This module handles loading and merging configuration from:
//! - Default values
//! - Configuration files (YAML/JSON/TOML)
//! - Environment variables
//! - Command-line arguments

use crate::error::{Error, Result};
use intake_core::ValidationConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the manual review threshold
pub const REVIEW_THRESHOLD_ENV: &str = "INTAKE_REVIEW_THRESHOLD";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Engine settings
    pub validation: ValidationConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingOptions,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Issues listed in the human-readable summary
    pub summary_issues: usize,

    /// Show progress indicators
    pub progress: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Log format (compact, full, json)
    pub format: String,

    /// Log file path
    pub file: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            summary_issues: intake_core::DEFAULT_SUMMARY_ISSUES,
            progress: true,
        }
    }
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            format: "compact".to_string(),
            file: None,
        }
    }
}

/// Serialization format of a configuration file, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    Yaml,
    Toml,
}

impl FileFormat {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => FileFormat::Yaml,
            Some("toml") => FileFormat::Toml,
            _ => FileFormat::Json,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let config = match FileFormat::of(path) {
            FileFormat::Yaml => serde_yaml::from_str(&content)?,
            FileFormat::Toml => toml::from_str(&content).map_err(|e| Error::InvalidFormat {
                path: path.to_path_buf(),
                expected: "TOML".to_string(),
                reason: e.to_string(),
            })?,
            FileFormat::Json => serde_json::from_str(&content)?,
        };

        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_first(&Self::default_config_paths())
    }

    /// Load the first existing file among `paths`
    ///
    /// A file that exists but cannot be parsed is an error.
    fn load_first(paths: &[PathBuf]) -> Result<Self> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => Self::from_file(path).map_err(|e| Error::InvalidFormat {
                path: path.clone(),
                expected: "configuration file".to_string(),
                reason: e.to_string(),
            }),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file or default locations,
    /// then apply environment overrides
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::load()?,
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(raw) = std::env::var(REVIEW_THRESHOLD_ENV) {
            self.validation.require_manual_review_threshold = raw.trim().parse().map_err(|_| {
                Error::config(format!("{} is not a number: {}", REVIEW_THRESHOLD_ENV, raw))
            })?;
        }
        Ok(())
    }

    /// Check that every setting is within range
    pub fn validate(&self) -> Result<()> {
        self.validation.validate()?;

        if !["compact", "full", "json"].contains(&self.logging.format.as_str()) {
            return Err(Error::config(format!(
                "unknown log format '{}' (expected compact, full or json)",
                self.logging.format
            )));
        }

        Ok(())
    }

    /// Path of the per-user configuration file
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("intake").join("config.yaml"))
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".intake.yaml"),
            PathBuf::from(".intake.toml"),
            PathBuf::from(".intake.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let intake_dir = config_dir.join("intake");
            paths.push(intake_dir.join("config.yaml"));
            paths.push(intake_dir.join("config.toml"));
            paths.push(intake_dir.join("config.json"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".intake.yaml"));
        }

        paths
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = match FileFormat::of(path) {
            FileFormat::Yaml => serde_yaml::to_string(self)?,
            FileFormat::Toml => toml::to_string_pretty(self)
                .map_err(|e| Error::config(format!("Failed to serialize as TOML: {}", e)))?,
            FileFormat::Json => serde_json::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.validation.require_manual_review_threshold, 0.5);
        assert_eq!(config.output.summary_issues, 5);
        assert_eq!(config.logging.format, "compact");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "validation:\n  require_manual_review_threshold: 0.8\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.validation.require_manual_review_threshold, 0.8);
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_toml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[validation]\nrequire_manual_review_threshold = 0.3\n\n[output]\nsummary_issues = 10\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.validation.require_manual_review_threshold, 0.3);
        assert_eq!(config.output.summary_issues, 10);
    }

    #[test]
    fn test_malformed_default_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let broken = dir.path().join(".intake.yaml");
        std::fs::write(&broken, "validation: [not, a, mapping").unwrap();
        let fallback = dir.path().join("config.json");
        std::fs::write(&fallback, "{}").unwrap();

        let result = Config::load_first(&[broken.clone(), fallback]);
        match result {
            Err(Error::InvalidFormat { path, .. }) => assert_eq!(path, broken),
            other => panic!("expected InvalidFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_first_existing_default_file_wins() {
        let dir = TempDir::new().unwrap();
        let absent = dir.path().join(".intake.yaml");
        let present = dir.path().join("config.json");
        std::fs::write(&present, r#"{"output": {"summary_issues": 2}}"#).unwrap();

        let config = Config::load_first(&[absent, present]).unwrap();
        assert_eq!(config.output.summary_issues, 2);
        assert_eq!(Config::load_first(&[]).unwrap(), Config::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.logging.format = "json".to_string();

        for name in ["nested/config.json", "config.yaml", "config.toml"] {
            let path = dir.path().join(name);
            config.save(&path).unwrap();
            assert_eq!(Config::from_file(&path).unwrap(), config);
        }
    }

    #[test]
    fn test_missing_file() {
        let result = Config::from_file(Path::new("/nonexistent/intake.yaml"));
        assert!(matches!(result, Err(Error::FileNotFound { .. })));
    }

    #[test]
    fn test_validate_rejects_out_of_range_threshold() {
        let mut config = Config::default();
        config.validation.require_manual_review_threshold = 1.5;
        assert!(matches!(config.validate(), Err(Error::Core(_))));

        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
