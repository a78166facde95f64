pub mod coordinator;
pub mod error;
pub mod ports;
pub mod storage;
pub mod task;
pub mod ticker;
pub mod timer;

// Re-export common types
pub use coordinator::{Coordinator, CoordinatorOptions};
pub use error::{PomoError, Result};
pub use task::{Task, TaskStore};
pub use timer::{SessionTimer, SessionType, TimerEvent, TimerSettings, TimerSnapshot};
