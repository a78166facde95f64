//! Task domain module.
//!
//! # Module Structure
//!
//! - `model`: the persisted `Task` entity and its JSON encoding
//! - `store`: `TaskStore`, the task list written through to key-value storage

mod model;
pub mod store;

pub use model::{Task, deserialize_tasks, serialize_tasks};
pub use store::{TASKS_STORAGE_KEY, TaskStore};
