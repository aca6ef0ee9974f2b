//! Settings file support for the layout tool.
//!
//! Settings are stored as JSON. Every field is optional; missing fields take
//! their defaults.

use std::path::Path;

use msd_gpu::{GpuError, UploadConfig};
use serde::{Deserialize, Serialize};

/// Current settings file format version.
/// Increment this when making breaking changes to the format.
pub const CONFIG_VERSION: u32 = 1;

/// Log level setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    #[default]
    Warn,
    /// Show errors, warnings, and info messages
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Settings for the layout tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Version of the settings file format
    #[serde(default = "default_version")]
    pub version: u32,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Uniform ring and frame pool sizing
    #[serde(default)]
    pub upload: UploadConfig,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            log_level: LogLevel::default(),
            upload: UploadConfig::default(),
        }
    }
}

impl Settings {
    /// Serialize the settings to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize settings from JSON and validate them.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;

        if settings.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: settings.version,
                supported_version: CONFIG_VERSION,
            });
        }
        settings.upload.validate()?;

        Ok(settings)
    }

    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Get the default settings filename.
    pub fn default_filename() -> &'static str {
        "msd-layout.json"
    }
}

/// Errors that can occur when loading settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse settings: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Settings version is newer than supported
    #[error("Settings file version {file_version} is newer than supported version {supported_version}")]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading settings
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Upload configuration failed validation
    #[error(transparent)]
    Invalid(#[from] GpuError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.log_level.to_level_filter(), log::LevelFilter::Warn);
    }

    #[test]
    fn test_json_roundtrip() {
        let settings = Settings {
            log_level: LogLevel::Debug,
            upload: UploadConfig::default().with_frames_in_flight(2),
            ..Settings::default()
        };
        let json = settings.to_json().unwrap();
        assert!(json.contains("\"log_level\": \"debug\""));
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_rejects_newer_version() {
        let err = Settings::from_json(r#"{ "version": 99 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::VersionTooNew {
                file_version: 99,
                supported_version: CONFIG_VERSION
            }
        ));
    }

    #[test]
    fn test_rejects_invalid_upload_config() {
        let err = Settings::from_json(r#"{ "upload": { "uniform_alignment": 3 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(GpuError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_oversized_upload_config() {
        for json in [
            r#"{ "upload": { "pool_size": 18446744073709551615 } }"#,
            r#"{ "upload": { "uniform_alignment": 9223372036854775808 } }"#,
            r#"{ "upload": { "frames_in_flight": 1000000, "pool_size": 1000000 } }"#,
        ] {
            let err = Settings::from_json(json).unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid(GpuError::InvalidConfig(_))),
                "{}: {:?}",
                json,
                err
            );
        }
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("msd-layout-does-not-exist.json");
        assert!(matches!(Settings::load(&path), Err(ConfigError::IoError(_))));
    }
}
