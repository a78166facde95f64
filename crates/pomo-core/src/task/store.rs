//! The persisted task list.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, error, warn};

use super::model::{Task, deserialize_tasks, serialize_tasks};
use crate::storage::KeyValueStore;

/// Storage key the task list is persisted under.
pub const TASKS_STORAGE_KEY: &str = "pomodoro-tasks";

/// Owns the task list and writes it through to durable storage.
///
/// Every mutation that changes the list serializes the whole list under a
/// fixed key before returning. Mutations addressing an unknown id are silent
/// no-ops. Storage failures are logged and never roll back the in-memory
/// list; the next successful write persists it in full.
pub struct TaskStore {
    storage: Arc<dyn KeyValueStore>,
    key: String,
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Loads the task list from `storage` under [`TASKS_STORAGE_KEY`].
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        Self::load_with_key(storage, TASKS_STORAGE_KEY)
    }

    /// Loads the task list stored under `key`.
    ///
    /// A missing key yields an empty list. Unreadable or malformed data is
    /// logged and also yields an empty list; it is left in place until the
    /// first mutation overwrites it. Individual records with blank text or a
    /// repeated id are skipped.
    pub fn load_with_key(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let tasks = match storage.get(&key) {
            Ok(Some(raw)) => match deserialize_tasks(&raw) {
                Ok(tasks) => retain_valid(tasks, &key),
                Err(e) => {
                    warn!(key = %key, error = %e, "Discarding malformed task list");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to read task list, starting empty");
                Vec::new()
            }
        };
        debug!(key = %key, count = tasks.len(), "Task store loaded");
        Self { storage, key, tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Looks a task up the way a user would type it.
    ///
    /// Tries, in order: the exact id, a 1-based list position, and a prefix
    /// that matches exactly one id.
    pub fn resolve(&self, reference: &str) -> Option<&Task> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }
        if let Some(task) = self.get(reference) {
            return Some(task);
        }
        if let Ok(position) = reference.parse::<usize>() {
            if let Some(task) = position.checked_sub(1).and_then(|i| self.tasks.get(i)) {
                return Some(task);
            }
        }
        let mut matches = self.tasks.iter().filter(|task| task.id.starts_with(reference));
        match (matches.next(), matches.next()) {
            (Some(task), None) => Some(task),
            _ => None,
        }
    }

    /// Appends a new task. Blank text is ignored and returns `None`.
    pub fn add(&mut self, text: &str) -> Option<Task> {
        let task = Task::new(text)?;
        self.tasks.push(task.clone());
        self.persist();
        Some(task)
    }

    /// Removes a task. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        let removed = self.tasks.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    /// Flips the completed flag. Returns the new value, or `None` if the id
    /// is unknown.
    pub fn toggle_completion(&mut self, id: &str) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|task| task.id == id)?;
        task.completed = !task.completed;
        let completed = task.completed;
        self.persist();
        Some(completed)
    }

    /// Adds `delta` to a task's pomodoro count, clamping at zero.
    ///
    /// Returns the new count, or `None` if the id is unknown.
    pub fn adjust_count(&mut self, id: &str, delta: i64) -> Option<u32> {
        let task = self.tasks.iter_mut().find(|task| task.id == id)?;
        let adjusted = (i64::from(task.pomodoro_count) + delta).clamp(0, i64::from(u32::MAX));
        task.pomodoro_count = adjusted as u32;
        let count = task.pomodoro_count;
        self.persist();
        Some(count)
    }

    /// Credits one completed work session to a task.
    pub fn increment_on_session_complete(&mut self, id: &str) -> Option<u32> {
        let count = self.adjust_count(id, 1);
        if count.is_none() {
            debug!(task_id = id, "Completed session for unknown task, ignoring");
        }
        count
    }

    fn persist(&self) {
        let raw = match serialize_tasks(&self.tasks) {
            Ok(raw) => raw,
            Err(e) => {
                error!(error = %e, "Failed to serialize task list");
                return;
            }
        };
        if let Err(e) = self.storage.set(&self.key, &raw) {
            error!(key = %self.key, error = %e, "Failed to persist task list");
        }
    }
}

/// Drops records that break the task invariants: blank text, blank id, or an
/// id already seen earlier in the list.
fn retain_valid(tasks: Vec<Task>, key: &str) -> Vec<Task> {
    let mut seen = HashSet::new();
    tasks
        .into_iter()
        .filter(|task| {
            if task.id.is_empty() || task.text.trim().is_empty() {
                warn!(key, id = %task.id, "Skipping stored task with blank id or text");
                return false;
            }
            if !seen.insert(task.id.clone()) {
                warn!(key, id = %task.id, "Skipping stored task with duplicate id");
                return false;
            }
            true
        })
        .collect()
}
