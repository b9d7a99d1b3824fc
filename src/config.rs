//! Configuration file
//!
//! `schemakit.json`, every field optional:
//!
//! ```json
//! { "schema_dir": "./schemas", "log_level": "warn", "max_reported_issues": 100 }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::{log_event_with_fields, Event, Severity};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory of `*.schema.json` documents
    #[serde(default = "default_schema_dir")]
    pub schema_dir: String,

    /// Minimum severity written by the logger
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Cap on issues printed per validation
    #[serde(default = "default_max_reported_issues")]
    pub max_reported_issues: usize,
}

fn default_schema_dir() -> String {
    "./schemas".to_string()
}
fn default_log_level() -> String {
    "warn".to_string()
}
fn default_max_reported_issues() -> usize {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_dir: default_schema_dir(),
            log_level: default_log_level(),
            max_reported_issues: default_max_reported_issues(),
        }
    }
}

impl Config {
    /// Loads and validates a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Config = serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;

        log_event_with_fields(
            Event::ConfigLoaded,
            &[
                ("path", path.display().to_string().as_str()),
                ("schema_dir", config.schema_dir.as_str()),
            ],
        );
        Ok(config)
    }

    /// Loads `path` when it exists; defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.schema_dir.trim().is_empty() {
            return Err(ConfigError::Invalid("schema_dir must not be empty".into()));
        }
        if self.max_reported_issues == 0 {
            return Err(ConfigError::Invalid("max_reported_issues must be > 0".into()));
        }
        self.severity()?;
        Ok(())
    }

    pub fn severity(&self) -> Result<Severity, ConfigError> {
        Severity::parse(&self.log_level).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "log_level '{}' must be one of trace, info, warn, error, fatal",
                self.log_level
            ))
        })
    }

    pub fn schema_path(&self) -> &Path {
        Path::new(&self.schema_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("schemakit.json");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&write(&dir, "{}")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.severity().unwrap(), Severity::Warn);
    }

    #[test]
    fn test_explicit_fields() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            r#"{"schema_dir": "/srv/schemas", "log_level": "trace", "max_reported_issues": 5}"#,
        );
        let config = Config::load(&path).unwrap();
        assert_eq!(config.schema_path(), Path::new("/srv/schemas"));
        assert_eq!(config.severity().unwrap(), Severity::Trace);
        assert_eq!(config.max_reported_issues, 5);
    }

    #[test]
    fn test_rejects_zero_issue_cap() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(&write(&dir, r#"{"max_reported_issues": 0}"#)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_unknown_level() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(&write(&dir, r#"{"log_level": "loud"}"#)).unwrap_err();
        assert!(err.to_string().contains("loud"));
    }

    #[test]
    fn test_malformed_json() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(&write(&dir, "{not json")).unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_or_default(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }
}
