use serde::{Deserialize, Serialize};

use super::SessionType;

/// Transitions reported by the session timer.
///
/// Timer operations return these instead of calling collaborators, so the
/// state machine stays free of side effects. The coordinator turns them into
/// sound cues, notifications and task-store updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEvent {
    /// The countdown started running. `auto` is set when binding a task
    /// started it rather than an explicit start request.
    Started { auto: bool },
    /// The countdown was paused.
    Paused,
    /// The timer was reset to an idle work session.
    Reset,
    /// The session type changed and the countdown was reinitialised.
    SessionChanged { session_type: SessionType },
    /// A session ran down to zero.
    SessionCompleted {
        finished: SessionType,
        task_id: Option<String>,
        session_count: u32,
    },
    /// A work session bound to a task ran down to zero.
    WorkSessionCompleted { task_id: String },
    /// A task was bound to the timer.
    TaskBound { task_id: String },
    /// The bound task was released.
    TaskReleased { task_id: String },
}
