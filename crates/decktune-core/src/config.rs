//! Recorder configuration
//!
//! Capacities, cadences and retention are configuration rather than behavior.
//! Everything is supplied at construction; there is no runtime reconfiguration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default black box storage directory
pub const DEFAULT_STORAGE_PATH: &str = "/tmp/decktune_blackbox/";

/// Errors loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for this schema
    #[error("Failed to parse config {}: {source}", .path.display())]
    Parse {
        /// Config file path
        path: PathBuf,
        /// Parse error
        #[source]
        source: serde_json::Error,
    },

    /// A setting is out of range
    #[error("Invalid value for '{field}': {message}")]
    Invalid {
        /// Dotted name of the setting
        field: &'static str,
        /// What is wrong with it
        message: String,
    },
}

/// Forensic (black box) buffer and recording store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlackBoxConfig {
    /// Directory holding persisted recordings
    pub storage_path: PathBuf,
    /// Number of samples kept in memory
    pub buffer_capacity: usize,
    /// Intended sampling cadence. Not enforced by the recorder.
    pub sample_interval_ms: u64,
    /// Maximum recordings retained on disk
    pub max_recordings: usize,
}

impl Default for BlackBoxConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            buffer_capacity: 60,
            sample_interval_ms: 500,
            max_recordings: 5,
        }
    }
}

impl BlackBoxConfig {
    /// Use a different storage directory
    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = path.into();
        self
    }

    /// Seconds of history a full buffer covers at the intended cadence
    pub fn retained_secs(&self) -> f64 {
        self.buffer_capacity as f64 * self.sample_interval_ms as f64 / 1000.0
    }
}

/// Live telemetry buffer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Number of samples kept in memory
    pub buffer_capacity: usize,
    /// Intended sampling cadence. Not enforced by the recorder.
    pub sample_interval_ms: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: 300,
            sample_interval_ms: 1000,
        }
    }
}

impl TelemetryConfig {
    /// Seconds of history a full buffer covers at the intended cadence
    pub fn retained_secs(&self) -> f64 {
        self.buffer_capacity as f64 * self.sample_interval_ms as f64 / 1000.0
    }
}

/// Top-level diagnostics configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Forensic recorder
    pub blackbox: BlackBoxConfig,
    /// Live telemetry
    pub telemetry: TelemetryConfig,
}

impl DiagnosticsConfig {
    /// Load and validate a JSON config file. Missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise use the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Reject settings that would leave a recorder unable to hold anything
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.blackbox.buffer_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "blackbox.buffer_capacity",
                message: "must be at least 1".into(),
            });
        }
        if self.blackbox.max_recordings == 0 {
            return Err(ConfigError::Invalid {
                field: "blackbox.max_recordings",
                message: "must be at least 1".into(),
            });
        }
        if self.blackbox.storage_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: "blackbox.storage_path",
                message: "must not be empty".into(),
            });
        }
        if self.telemetry.buffer_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "telemetry.buffer_capacity",
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_recorder_constants() {
        let config = DiagnosticsConfig::default();
        assert_eq!(config.blackbox.buffer_capacity, 60);
        assert_eq!(config.blackbox.max_recordings, 5);
        assert_eq!(config.blackbox.retained_secs(), 30.0);
        assert_eq!(config.telemetry.buffer_capacity, 300);
        assert_eq!(config.telemetry.retained_secs(), 300.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("diagnostics.json");
        fs::write(&path, r#"{"blackbox": {"max_recordings": 3}}"#).unwrap();

        let config = DiagnosticsConfig::load(&path).unwrap();
        assert_eq!(config.blackbox.max_recordings, 3);
        assert_eq!(config.blackbox.buffer_capacity, 60);
        assert_eq!(config.telemetry, TelemetryConfig::default());
    }

    #[test]
    fn test_zero_retention_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("diagnostics.json");
        fs::write(&path, r#"{"blackbox": {"max_recordings": 0}}"#).unwrap();

        match DiagnosticsConfig::load(&path) {
            Err(ConfigError::Invalid { field, .. }) => {
                assert_eq!(field, "blackbox.max_recordings")
            }
            other => panic!("Expected invalid config, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("diagnostics.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            DiagnosticsConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_file_falls_back_only_when_unset() {
        assert!(DiagnosticsConfig::load_or_default(None).is_ok());
        assert!(matches!(
            DiagnosticsConfig::load_or_default(Some(Path::new("/nonexistent/diag.json"))),
            Err(ConfigError::Io { .. })
        ));
    }
}
