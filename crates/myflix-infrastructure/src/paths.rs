//! Unified path management for myflix files.
//!
//! This ensures consistency across all platforms (Linux, macOS, Windows).

use std::path::PathBuf;

const APP_DIR: &str = "myflix";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for myflix.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/myflix/            # Config directory
/// └── config.toml              # Client configuration
///
/// ~/.local/share/myflix/       # Data directory
/// └── storage/                 # Durable session entries
///     └── local_storage.json
/// ```
pub struct MyflixPaths;

impl MyflixPaths {
    /// Returns the myflix configuration directory (e.g., `~/.config/myflix/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the myflix data directory (e.g., `~/.local/share/myflix/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the default directory for durable session storage.
    pub fn storage_dir() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("storage"))
    }
}
