//! Side-effect ports the coordinator calls into.
//!
//! Sound and notifications are best-effort: implementations report failures
//! through `Result`, and the coordinator logs and drops them so a missing
//! audio device never interrupts a timer transition.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The audible cues the timer emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    /// The countdown was started by the user.
    Start,
    /// The timer was reset.
    Reset,
    /// A work session finished and a break begins.
    Break,
}

/// Plays sound cues.
pub trait SoundPlayer: Send {
    fn play(&self, cue: SoundCue) -> Result<()>;
}

/// What a notification announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    WorkSessionComplete,
    BreakOver,
}

/// A user-facing pop-up message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    /// The message shown when a work session ends, naming the task when one
    /// was bound.
    pub fn work_session_complete(task_text: Option<&str>) -> Self {
        let description = match task_text {
            Some(text) => format!("Great job on \"{}\"! Time for a break.", text),
            None => "Time for a well-deserved break! Great job staying focused.".to_string(),
        };
        Self {
            kind: NotificationKind::WorkSessionComplete,
            title: "Work Session Complete!".to_string(),
            description,
        }
    }

    /// The message shown when a break ends.
    pub fn break_over() -> Self {
        Self {
            kind: NotificationKind::BreakOver,
            title: "Break Over!".to_string(),
            description: "Ready for another focused work session? Let's go!".to_string(),
        }
    }
}

/// Presents notifications to the user.
pub trait Notifier: Send {
    fn notify(&self, notification: &Notification) -> Result<()>;
}

/// A `SoundPlayer` that stays silent.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSound;

impl SoundPlayer for NoopSound {
    fn play(&self, _cue: SoundCue) -> Result<()> {
        Ok(())
    }
}

/// A `Notifier` that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _notification: &Notification) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_notification_names_task() {
        let n = Notification::work_session_complete(Some("clean desk"));
        assert_eq!(n.kind, NotificationKind::WorkSessionComplete);
        assert!(n.description.contains("\"clean desk\""));

        let n = Notification::work_session_complete(None);
        assert!(n.description.starts_with("Time for a well-deserved break"));
    }
}
