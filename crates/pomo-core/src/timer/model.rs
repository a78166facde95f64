//! Session timer domain model.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Default focus interval, in seconds.
pub const DEFAULT_WORK_SECONDS: u32 = 25 * 60;
/// Default rest interval, in seconds.
pub const DEFAULT_BREAK_SECONDS: u32 = 5 * 60;

/// The kind of interval the timer is counting down.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SessionType {
    /// A focus interval.
    #[default]
    Work,
    /// A rest interval.
    Break,
}

impl SessionType {
    /// Returns the session type that follows this one.
    pub fn next(self) -> Self {
        match self {
            SessionType::Work => SessionType::Break,
            SessionType::Break => SessionType::Work,
        }
    }
}

/// Durations and policies of the session timer.
///
/// The policies cover behavior that differed between revisions of the
/// widget; both default to the conservative choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    /// Length of a work session in seconds. Must be non-zero.
    pub work_seconds: u32,
    /// Length of a break session in seconds. Must be non-zero.
    pub break_seconds: u32,
    /// Zero the completed-session counter on reset.
    pub reset_clears_session_count: bool,
    /// Release the bound task once its work session completes.
    pub clear_task_on_work_complete: bool,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_seconds: DEFAULT_WORK_SECONDS,
            break_seconds: DEFAULT_BREAK_SECONDS,
            reset_clears_session_count: false,
            clear_task_on_work_complete: false,
        }
    }
}

impl TimerSettings {
    /// Returns the configured length of the given session type.
    pub fn duration_for(&self, session_type: SessionType) -> u32 {
        match session_type {
            SessionType::Work => self.work_seconds,
            SessionType::Break => self.break_seconds,
        }
    }
}

/// Read model of the timer handed to the display layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub session_type: SessionType,
    pub time_left_seconds: u32,
    pub duration_seconds: u32,
    /// `time_left_seconds` rendered as `mm:ss`.
    pub formatted: String,
    /// Elapsed percentage of the current session, in `[0, 100]`.
    pub progress: f64,
    pub is_active: bool,
    pub session_count: u32,
    pub current_task_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_default_durations() {
        let settings = TimerSettings::default();
        assert_eq!(settings.duration_for(SessionType::Work), 1500);
        assert_eq!(settings.duration_for(SessionType::Break), 300);
    }

    #[test]
    fn test_session_type_parses_case_insensitively() {
        assert_eq!(SessionType::from_str("work").unwrap(), SessionType::Work);
        assert_eq!(SessionType::from_str("Break").unwrap(), SessionType::Break);
        assert!(SessionType::from_str("lunch").is_err());
        assert_eq!(SessionType::Break.to_string(), "break");
    }

    #[test]
    fn test_next_alternates() {
        assert_eq!(SessionType::Work.next(), SessionType::Break);
        assert_eq!(SessionType::Break.next(), SessionType::Work);
    }
}
