//! The work/break countdown state machine.

use tracing::{debug, info};

use super::format::{format_time, progress};
use super::{SessionType, TimerEvent, TimerSettings, TimerSnapshot};

/// Countdown state for alternating work and break sessions.
///
/// The four states (work/break × idle/running) are kept as two orthogonal
/// flags. The machine has no terminal state: completed sessions roll over
/// into the next session type forever.
///
/// Invariant: `0 <= time_left <= settings.duration_for(session_type)`.
#[derive(Debug, Clone)]
pub struct SessionTimer {
    settings: TimerSettings,
    session_type: SessionType,
    time_left: u32,
    is_active: bool,
    session_count: u32,
    current_task_id: Option<String>,
}

impl SessionTimer {
    /// Creates an idle timer at the start of a work session.
    pub fn new(settings: TimerSettings) -> Self {
        Self {
            settings,
            session_type: SessionType::Work,
            time_left: settings.duration_for(SessionType::Work),
            is_active: false,
            session_count: 0,
            current_task_id: None,
        }
    }

    pub fn session_type(&self) -> SessionType {
        self.session_type
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn session_count(&self) -> u32 {
        self.session_count
    }

    pub fn current_task_id(&self) -> Option<&str> {
        self.current_task_id.as_deref()
    }

    /// Length of the current session type.
    pub fn duration(&self) -> u32 {
        self.settings.duration_for(self.session_type)
    }

    /// Elapsed percentage of the current session.
    pub fn progress(&self) -> f64 {
        progress(self.duration(), self.time_left)
    }

    /// Time left in the current session as `mm:ss`.
    pub fn formatted(&self) -> String {
        format_time(self.time_left)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            session_type: self.session_type,
            time_left_seconds: self.time_left,
            duration_seconds: self.duration(),
            formatted: self.formatted(),
            progress: self.progress(),
            is_active: self.is_active,
            session_count: self.session_count,
            current_task_id: self.current_task_id.clone(),
        }
    }

    /// Start/pause button: flips the running flag.
    pub fn toggle(&mut self) -> TimerEvent {
        self.is_active = !self.is_active;
        debug!(
            session_type = %self.session_type,
            time_left = self.time_left,
            active = self.is_active,
            "Timer toggled"
        );
        if self.is_active {
            TimerEvent::Started { auto: false }
        } else {
            TimerEvent::Paused
        }
    }

    /// Switches to another session type (the work/break tabs).
    ///
    /// Returns `None` and leaves the state untouched while the countdown is
    /// running.
    pub fn select_session(&mut self, session_type: SessionType) -> Option<TimerEvent> {
        if self.is_active {
            debug!(requested = %session_type, "Ignoring session switch while running");
            return None;
        }
        self.switch_to(session_type);
        Some(TimerEvent::SessionChanged { session_type })
    }

    /// Advances the countdown by one second.
    ///
    /// Does nothing while paused. When the countdown reaches zero the timer
    /// deactivates and rolls over into the next session type.
    pub fn tick(&mut self) -> Vec<TimerEvent> {
        if !self.is_active {
            return Vec::new();
        }
        self.time_left = self.time_left.saturating_sub(1);
        if self.time_left > 0 {
            return Vec::new();
        }
        self.is_active = false;
        self.complete_session()
    }

    /// Stops the countdown and returns to the start of a work session.
    pub fn reset(&mut self) -> TimerEvent {
        self.is_active = false;
        self.switch_to(SessionType::Work);
        if self.settings.reset_clears_session_count {
            self.session_count = 0;
        }
        debug!(session_count = self.session_count, "Timer reset");
        TimerEvent::Reset
    }

    /// Binds a task to the timer.
    ///
    /// Edge triggered: binding the id that is already bound does nothing.
    /// With `auto_start`, a newly bound task restarts a full work session and
    /// sets it running.
    pub fn bind_task(&mut self, task_id: &str, auto_start: bool) -> Vec<TimerEvent> {
        if self.current_task_id.as_deref() == Some(task_id) {
            return Vec::new();
        }
        self.current_task_id = Some(task_id.to_string());
        let mut events = vec![TimerEvent::TaskBound {
            task_id: task_id.to_string(),
        }];
        if auto_start {
            self.switch_to(SessionType::Work);
            self.is_active = true;
            events.push(TimerEvent::SessionChanged {
                session_type: SessionType::Work,
            });
            events.push(TimerEvent::Started { auto: true });
        }
        debug!(task_id, auto_start, "Task bound to timer");
        events
    }

    /// Releases the bound task, if any.
    pub fn release_task(&mut self) -> Option<TimerEvent> {
        self.current_task_id
            .take()
            .map(|task_id| TimerEvent::TaskReleased { task_id })
    }

    fn switch_to(&mut self, session_type: SessionType) {
        self.session_type = session_type;
        self.time_left = self.settings.duration_for(session_type);
    }

    fn complete_session(&mut self) -> Vec<TimerEvent> {
        let finished = self.session_type;
        let task_id = self.current_task_id.clone();
        let mut events = Vec::new();

        if finished == SessionType::Work {
            self.session_count += 1;
            if let Some(id) = &task_id {
                events.push(TimerEvent::WorkSessionCompleted {
                    task_id: id.clone(),
                });
            }
        }

        let next = finished.next();
        self.switch_to(next);
        info!(
            %finished,
            %next,
            session_count = self.session_count,
            task_id = task_id.as_deref().unwrap_or("-"),
            "Session completed"
        );

        events.push(TimerEvent::SessionCompleted {
            finished,
            task_id,
            session_count: self.session_count,
        });
        events.push(TimerEvent::SessionChanged { session_type: next });

        if finished == SessionType::Work && self.settings.clear_task_on_work_complete {
            events.extend(self.release_task());
        }
        events
    }
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new(TimerSettings::default())
    }
}
