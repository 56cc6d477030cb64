//! Configuration loading.
//!
//! Settings come from an optional TOML file merged with `QUARRY_*`
//! environment variables (`QUARRY_LOGGING__LEVEL`,
//! `QUARRY_STORAGE__ROOT`, ...). When no file is passed explicitly, the
//! platform config directory is probed for `config.toml`.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::CoreError;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level or full `EnvFilter` directive string.
    pub level: String,
    /// Output format: "text" or "json".
    pub format: String,
    /// Log to this file instead of stderr.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            format: "text".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root of the local storage; defaults to the home directory.
    pub root: Option<PathBuf>,
    /// Display name of the local storage.
    pub name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            root: None,
            name: "Local".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuarryConfig {
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
}

impl QuarryConfig {
    /// Load configuration, with an explicit file taking precedence over
    /// the platform default location.
    pub fn load(file: Option<&Path>) -> Result<Self, CoreError> {
        let mut builder = Config::builder();

        match file {
            Some(path) => {
                builder = builder.add_source(File::from(path.to_path_buf()));
            }
            None => {
                if let Some(default) = Self::default_config_path() {
                    if default.exists() {
                        builder = builder.add_source(File::from(default));
                    }
                }
            }
        }

        let settings = builder
            .add_source(Environment::with_prefix("QUARRY").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "quarry", "quarry")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
