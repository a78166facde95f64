//! Unified path management for pomo files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/pomo/              # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/pomo/         # Data directory
//! ├── pomodoro-tasks.json      # Persisted task list
//! └── logs/                    # Application logs
//!     └── pomo.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};

use pomo_core::error::PomoError;

const APP_DIR: &str = "pomo";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// The platform config directory could not be determined.
    ConfigDirNotFound,
    /// The platform data directory could not be determined.
    DataDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
            PathError::DataDirNotFound => write!(f, "Cannot find data directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for PomoError {
    fn from(err: PathError) -> Self {
        PomoError::config(err.to_string())
    }
}

/// Resolved locations of the pomo config and data directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PomoPaths {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl PomoPaths {
    /// Resolves the platform directories (XDG on Linux, `Library` on macOS,
    /// `AppData` on Windows), each with a `pomo` subdirectory.
    pub fn from_platform() -> Result<Self, PathError> {
        let config_dir = dirs::config_dir()
            .ok_or(PathError::ConfigDirNotFound)?
            .join(APP_DIR);
        let data_dir = dirs::data_dir()
            .ok_or(PathError::DataDirNotFound)?
            .join(APP_DIR);
        Ok(Self {
            config_dir,
            data_dir,
        })
    }

    pub fn with_dirs(config_dir: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            data_dir: data_dir.into(),
        }
    }

    /// Returns a copy with the data directory replaced.
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Root of the key-value task storage.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path to config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Directory holding the rolling log files.
    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let paths = PomoPaths::with_dirs("/cfg/pomo", "/data/pomo");
        assert_eq!(paths.config_file(), PathBuf::from("/cfg/pomo/config.toml"));
        assert_eq!(paths.logs_dir(), PathBuf::from("/data/pomo/logs"));
        assert_eq!(paths.data_dir(), Path::new("/data/pomo"));
    }

    #[test]
    fn test_with_data_dir_overrides_only_data() {
        let paths = PomoPaths::with_dirs("/cfg/pomo", "/data/pomo").with_data_dir("/elsewhere");
        assert_eq!(paths.config_file(), PathBuf::from("/cfg/pomo/config.toml"));
        assert_eq!(paths.logs_dir(), PathBuf::from("/elsewhere/logs"));
    }

    #[test]
    fn test_path_error_converts_to_config_error() {
        let err: PomoError = PathError::DataDirNotFound.into();
        assert!(err.is_config());
    }
}
