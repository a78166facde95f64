//! Configuration loading.
//!
//! Reads `config.toml` from the pomo config directory. Every field is
//! optional; a missing or empty file yields the defaults.

use std::fs;
use std::path::{Path, PathBuf};

use pomo_core::error::{PomoError, Result};
use pomo_core::timer::{DEFAULT_BREAK_SECONDS, DEFAULT_WORK_SECONDS};
use pomo_core::{CoordinatorOptions, TimerSettings};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Root configuration.
///
/// ```toml
/// work_seconds = 1500
/// break_seconds = 300
/// auto_start_on_select = true
/// reset_clears_session_count = false
/// clear_task_on_work_complete = false
/// sound_enabled = true
/// data_dir = "/custom/path"
/// log_level = "info"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub work_seconds: u32,
    pub break_seconds: u32,
    pub auto_start_on_select: bool,
    pub reset_clears_session_count: bool,
    pub clear_task_on_work_complete: bool,
    pub sound_enabled: bool,
    /// Overrides the platform data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Default log filter; `RUST_LOG` takes precedence.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            work_seconds: DEFAULT_WORK_SECONDS,
            break_seconds: DEFAULT_BREAK_SECONDS,
            auto_start_on_select: true,
            reset_clears_session_count: false,
            clear_task_on_work_complete: false,
            sound_enabled: true,
            data_dir: None,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads and validates the config at `path`.
    ///
    /// # Returns
    ///
    /// - `Ok(AppConfig)`: parsed config, or defaults if the file is missing
    ///   or empty
    /// - `Err(PomoError::Serialization)`: the file is not valid TOML for this
    ///   schema
    /// - `Err(PomoError::Config)`: a value is out of range
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        let config = Self::parse(&content)?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Parses and validates config text.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.work_seconds == 0 {
            return Err(PomoError::config("work_seconds must be greater than 0"));
        }
        if self.break_seconds == 0 {
            return Err(PomoError::config("break_seconds must be greater than 0"));
        }
        Ok(())
    }

    pub fn timer_settings(&self) -> TimerSettings {
        TimerSettings {
            work_seconds: self.work_seconds,
            break_seconds: self.break_seconds,
            reset_clears_session_count: self.reset_clears_session_count,
            clear_task_on_work_complete: self.clear_task_on_work_complete,
        }
    }

    pub fn coordinator_options(&self) -> CoordinatorOptions {
        CoordinatorOptions {
            timer: self.timer_settings(),
            auto_start_on_select: self.auto_start_on_select,
        }
    }
}
