//! Task domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// A to-do item that completed work sessions can be attributed to.
///
/// Serialized as `{"id", "text", "pomodoroCount", "completed"}`. Lists
/// written before completion toggling existed lack `completed` and load
/// as not completed; unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// A unique identifier, assigned at creation.
    pub id: String,
    /// Display text. Never empty.
    pub text: String,
    /// Number of completed work sessions attributed to this task.
    pub pomodoro_count: u32,
    /// Whether the user has ticked the task off.
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Creates a fresh task with a new id.
    ///
    /// Returns `None` when `text` is blank after trimming.
    pub fn new(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            pomodoro_count: 0,
            completed: false,
        })
    }

    /// The first eight characters of the id, for compact display.
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }
}

/// Serializes a task list into its stored JSON form.
pub fn serialize_tasks(tasks: &[Task]) -> Result<String> {
    Ok(serde_json::to_string(tasks)?)
}

/// Parses a stored task list.
pub fn deserialize_tasks(raw: &str) -> Result<Vec<Task>> {
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_and_rejects_blank() {
        assert!(Task::new("").is_none());
        assert!(Task::new("   \t ").is_none());

        let task = Task::new("  clean desk ").unwrap();
        assert_eq!(task.text, "clean desk");
        assert_eq!(task.pomodoro_count, 0);
        assert!(!task.completed);
        assert!(!task.id.is_empty());
    }

    #[test]
    fn test_new_assigns_unique_ids() {
        let a = Task::new("a").unwrap();
        let b = Task::new("a").unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.short_id().len(), 8);
    }

    #[test]
    fn test_wire_format_uses_camel_case() {
        let task = Task {
            id: "1700000000000".to_string(),
            text: "write report".to_string(),
            pomodoro_count: 3,
            completed: true,
        };
        let json = serialize_tasks(std::slice::from_ref(&task)).unwrap();
        assert_eq!(
            json,
            r#"[{"id":"1700000000000","text":"write report","pomodoroCount":3,"completed":true}]"#
        );
        assert_eq!(deserialize_tasks(&json).unwrap(), vec![task]);
    }

    #[test]
    fn test_legacy_records_load() {
        // Older lists carry `isActive` and no `completed` flag.
        let raw = r#"[{"id":"1","text":"legacy","pomodoroCount":2,"isActive":true}]"#;
        let tasks = deserialize_tasks(raw).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].pomodoro_count, 2);
        assert!(!tasks[0].completed);
    }

    #[test]
    fn test_corrupted_text_is_an_error() {
        assert!(deserialize_tasks("{not json").is_err());
        assert!(deserialize_tasks(r#"[{"id":"1"}]"#).is_err());
        assert!(deserialize_tasks(r#"[{"id":"1","text":"x","pomodoroCount":-1}]"#).is_err());
    }
}
