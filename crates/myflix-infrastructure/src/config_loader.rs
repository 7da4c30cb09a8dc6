//! Client configuration loading.
//!
//! Configuration priority: config.toml > environment variables > defaults.

use crate::paths::{MyflixPaths, PathError};
use myflix_core::ClientConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_API_URL: &str = "MYFLIX_API_URL";
pub const ENV_STORAGE_DIR: &str = "MYFLIX_STORAGE_DIR";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "MYFLIX_REQUEST_TIMEOUT_SECS";

/// Errors that can occur while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("TOML parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error(transparent)]
    Path(#[from] PathError),
}

/// On-disk shape of config.toml. Every field is optional.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    api_url: Option<String>,
    storage_dir: Option<PathBuf>,
    request_timeout_secs: Option<u64>,
}

/// Loads [`ClientConfig`] from the config file, the environment and defaults.
pub struct ConfigLoader {
    path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Uses the default config file (`~/.config/myflix/config.toml`).
    pub fn new() -> Self {
        Self {
            path: MyflixPaths::config_file().ok(),
        }
    }

    /// Uses a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Resolves the configuration using the process environment.
    pub fn load(&self) -> Result<ClientConfig, ConfigError> {
        self.load_with_env(|key| std::env::var(key).ok())
    }

    /// Resolves the configuration with an injectable environment lookup.
    pub fn load_with_env<F>(&self, env: F) -> Result<ClientConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match &self.path {
            Some(path) => Self::read_file(path)?,
            None => ConfigFile::default(),
        };

        let storage_dir = match file
            .storage_dir
            .or_else(|| env(ENV_STORAGE_DIR).map(PathBuf::from))
        {
            Some(dir) => dir,
            None => MyflixPaths::storage_dir()?,
        };

        let mut config = ClientConfig::new(storage_dir);

        if let Some(api_url) = file.api_url.or_else(|| env(ENV_API_URL)) {
            config = config.with_api_url(api_url);
        }

        let timeout = match file.request_timeout_secs {
            Some(secs) => Some(secs),
            None => env(ENV_REQUEST_TIMEOUT_SECS)
                .map(|raw| {
                    raw.trim()
                        .parse::<u64>()
                        .map_err(|_| ConfigError::InvalidValue {
                            key: ENV_REQUEST_TIMEOUT_SECS,
                            value: raw,
                        })
                })
                .transpose()?,
        };
        if let Some(secs) = timeout {
            config = config.with_request_timeout_secs(secs);
        }

        tracing::debug!(
            "Resolved config: api_url={}, storage_dir={}",
            config.api_url,
            config.storage_dir.display()
        );

        Ok(config)
    }

    fn read_file(path: &Path) -> Result<ConfigFile, ConfigError> {
        if !path.exists() {
            return Ok(ConfigFile::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
