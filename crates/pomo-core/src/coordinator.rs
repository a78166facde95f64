//! Wires the session timer to the task store.
//!
//! The coordinator is the only object the front end talks to. It forwards
//! user actions and ticks to the timer, routes the timer's events into the
//! task store and the side-effect ports, and keeps the ticker registration
//! in step with the timer's running flag.

use tracing::{debug, warn};

use crate::ports::{NoopNotifier, NoopSound, Notification, Notifier, SoundCue, SoundPlayer};
use crate::task::{Task, TaskStore};
use crate::ticker::{Registration, TICK_PERIOD, Ticker};
use crate::timer::{SessionTimer, SessionType, TimerEvent, TimerSettings, TimerSnapshot};

/// Construction-time options for a [`Coordinator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorOptions {
    pub timer: TimerSettings,
    /// Start a work session as soon as a task is selected.
    pub auto_start_on_select: bool,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self {
            timer: TimerSettings::default(),
            auto_start_on_select: true,
        }
    }
}

/// Owns the timer, the task store, the ticker and the side-effect ports.
///
/// Single-threaded: every operation takes `&mut self` and runs to completion,
/// so ticks and user actions never interleave. While the timer is running
/// exactly one ticker registration exists; while it is paused there is none.
pub struct Coordinator<T: Ticker> {
    timer: SessionTimer,
    tasks: TaskStore,
    ticker: T,
    sound: Box<dyn SoundPlayer>,
    notifier: Box<dyn Notifier>,
    auto_start_on_select: bool,
}

impl<T: Ticker> Coordinator<T> {
    /// Creates a coordinator with silent ports.
    pub fn new(tasks: TaskStore, ticker: T, options: CoordinatorOptions) -> Self {
        Self {
            timer: SessionTimer::new(options.timer),
            tasks,
            ticker,
            sound: Box::new(NoopSound),
            notifier: Box::new(NoopNotifier),
            auto_start_on_select: options.auto_start_on_select,
        }
    }

    pub fn with_sound(mut self, sound: impl SoundPlayer + 'static) -> Self {
        self.sound = Box::new(sound);
        self
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.timer.snapshot()
    }

    /// The task currently bound to the timer.
    pub fn current_task(&self) -> Option<&Task> {
        self.timer
            .current_task_id()
            .and_then(|id| self.tasks.get(id))
    }

    // ========================================================================
    // Timer controls
    // ========================================================================

    /// Start/pause.
    pub fn toggle(&mut self) -> Vec<TimerEvent> {
        let event = self.timer.toggle();
        self.dispatch(vec![event])
    }

    pub fn reset(&mut self) -> Vec<TimerEvent> {
        let event = self.timer.reset();
        self.dispatch(vec![event])
    }

    /// Switches between work and break. Ignored while the timer runs.
    pub fn select_session(&mut self, session_type: SessionType) -> Vec<TimerEvent> {
        let events = self.timer.select_session(session_type).into_iter().collect();
        self.dispatch(events)
    }

    /// Applies a tick delivered by `registration`.
    ///
    /// Ticks from any registration other than the live one were queued
    /// before a pause or restart cancelled it, and are dropped.
    pub fn tick_from(&mut self, registration: Registration) -> Vec<TimerEvent> {
        if self.ticker.registration() != Some(registration) {
            debug!(registration, "Dropping tick from cancelled registration");
            return Vec::new();
        }
        self.tick()
    }

    /// Applies one tick of the live registration.
    ///
    /// For hosts that tick synchronously. A tick while the timer is paused
    /// is dropped.
    pub fn tick(&mut self) -> Vec<TimerEvent> {
        if !self.timer.is_active() {
            debug!("Dropping tick for inactive timer");
            self.sync_ticker(false);
            return Vec::new();
        }
        let events = self.timer.tick();
        self.dispatch(events)
    }

    // ========================================================================
    // Task binding
    // ========================================================================

    /// Binds a task to the timer, auto-starting per the options.
    ///
    /// Unknown ids and re-selecting the bound task are no-ops.
    pub fn select_task(&mut self, task_id: &str) -> Vec<TimerEvent> {
        if self.tasks.get(task_id).is_none() {
            debug!(task_id, "Ignoring selection of unknown task");
            return Vec::new();
        }
        let events = self.timer.bind_task(task_id, self.auto_start_on_select);
        self.dispatch(events)
    }

    pub fn release_task(&mut self) -> Vec<TimerEvent> {
        let events = self.timer.release_task().into_iter().collect();
        self.dispatch(events)
    }

    // ========================================================================
    // Task list
    // ========================================================================

    pub fn add_task(&mut self, text: &str) -> Option<Task> {
        self.tasks.add(text)
    }

    /// Removes a task, releasing it first if it is bound to the timer.
    ///
    /// Returns `None` for an unknown id, otherwise the release events (empty
    /// when the task was not bound).
    pub fn remove_task(&mut self, task_id: &str) -> Option<Vec<TimerEvent>> {
        self.tasks.get(task_id)?;
        let released = if self.timer.current_task_id() == Some(task_id) {
            self.timer.release_task()
        } else {
            None
        };
        let events = self.dispatch(released.into_iter().collect());
        self.tasks.remove(task_id);
        Some(events)
    }

    pub fn toggle_task(&mut self, task_id: &str) -> Option<bool> {
        self.tasks.toggle_completion(task_id)
    }

    pub fn adjust_task(&mut self, task_id: &str, delta: i64) -> Option<u32> {
        self.tasks.adjust_count(task_id, delta)
    }

    // ========================================================================
    // Event routing
    // ========================================================================

    fn dispatch(&mut self, events: Vec<TimerEvent>) -> Vec<TimerEvent> {
        let mut restart = false;
        for event in &events {
            match event {
                TimerEvent::Started { auto } => {
                    restart = true;
                    if !auto {
                        self.play(SoundCue::Start);
                    }
                }
                TimerEvent::Reset => self.play(SoundCue::Reset),
                TimerEvent::WorkSessionCompleted { task_id } => {
                    self.tasks.increment_on_session_complete(task_id);
                }
                TimerEvent::SessionCompleted {
                    finished: SessionType::Work,
                    task_id,
                    ..
                } => {
                    self.play(SoundCue::Break);
                    let text = task_id
                        .as_deref()
                        .and_then(|id| self.tasks.get(id))
                        .map(|task| task.text.clone());
                    self.notify(&Notification::work_session_complete(text.as_deref()));
                }
                TimerEvent::SessionCompleted {
                    finished: SessionType::Break,
                    ..
                } => self.notify(&Notification::break_over()),
                TimerEvent::Paused
                | TimerEvent::SessionChanged { .. }
                | TimerEvent::TaskBound { .. }
                | TimerEvent::TaskReleased { .. } => {}
            }
        }
        self.sync_ticker(restart);
        events
    }

    /// Keeps exactly one registration while running and none while paused.
    /// A restart always cancels before registering again.
    fn sync_ticker(&mut self, restart: bool) {
        if self.timer.is_active() {
            if restart || !self.ticker.is_running() {
                self.ticker.stop();
                let registration = self.ticker.start(TICK_PERIOD);
                debug!(registration, "Ticker registered");
            }
        } else if self.ticker.is_running() {
            self.ticker.stop();
        }
    }

    fn play(&self, cue: SoundCue) {
        if let Err(e) = self.sound.play(cue) {
            warn!(?cue, error = %e, "Sound cue failed");
        }
    }

    fn notify(&self, notification: &Notification) {
        if let Err(e) = self.notifier.notify(notification) {
            warn!(kind = ?notification.kind, error = %e, "Notification failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PomoError, Result};
    use crate::ports::NotificationKind;
    use crate::storage::MemoryKeyValueStore;
    use crate::ticker::ManualTicker;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct RecordingSound(Arc<Mutex<Vec<SoundCue>>>);

    impl SoundPlayer for RecordingSound {
        fn play(&self, cue: SoundCue) -> Result<()> {
            self.0.lock().unwrap().push(cue);
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct RecordingNotifier(Arc<Mutex<Vec<Notification>>>);

    impl Notifier for RecordingNotifier {
        fn notify(&self, notification: &Notification) -> Result<()> {
            self.0.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    struct BrokenSpeaker;

    impl SoundPlayer for BrokenSpeaker {
        fn play(&self, _cue: SoundCue) -> Result<()> {
            Err(PomoError::port("no audio device"))
        }
    }

    fn short_options() -> CoordinatorOptions {
        CoordinatorOptions {
            timer: TimerSettings {
                work_seconds: 3,
                break_seconds: 2,
                ..TimerSettings::default()
            },
            auto_start_on_select: true,
        }
    }

    fn coordinator(options: CoordinatorOptions) -> Coordinator<ManualTicker> {
        let tasks = TaskStore::load(Arc::new(MemoryKeyValueStore::new()));
        Coordinator::new(tasks, ManualTicker::new(), options)
    }

    fn tick_n(c: &mut Coordinator<ManualTicker>, n: usize) -> Vec<TimerEvent> {
        (0..n).flat_map(|_| c.tick()).collect()
    }

    #[test]
    fn test_toggle_registers_and_cancels_ticker() {
        let mut c = coordinator(CoordinatorOptions::default());
        c.toggle();
        assert!(c.ticker().is_running());
        assert_eq!(c.ticker().period(), Some(TICK_PERIOD));

        c.toggle();
        assert!(!c.ticker().is_running());
        assert_eq!(c.ticker().starts(), 1);
        assert_eq!(c.ticker().stops(), 1);
    }

    #[test]
    fn test_never_overlaps_registrations() {
        let mut c = coordinator(short_options());
        let a = c.add_task("a").unwrap();
        let b = c.add_task("b").unwrap();

        c.toggle();
        c.select_task(&a.id);
        c.select_task(&b.id);
        tick_n(&mut c, 1);
        c.toggle();
        c.toggle();

        assert_eq!(c.ticker().overlapping_starts(), 0);
        assert!(c.ticker().is_running());
    }

    #[test]
    fn test_completion_stops_ticker_and_credits_task() {
        let mut c = coordinator(short_options());
        let task = c.add_task("write report").unwrap();
        c.select_task(&task.id);
        assert!(c.ticker().is_running());

        let events = tick_n(&mut c, 3);
        assert!(events.contains(&TimerEvent::WorkSessionCompleted {
            task_id: task.id.clone()
        }));
        assert!(!c.ticker().is_running());
        assert_eq!(c.tasks().get(&task.id).unwrap().pomodoro_count, 1);
        assert_eq!(c.timer().session_type(), SessionType::Break);
    }

    #[test]
    fn test_stale_tick_after_pause_is_dropped() {
        let mut c = coordinator(CoordinatorOptions::default());
        c.toggle();
        tick_n(&mut c, 5);
        c.toggle();

        assert!(c.tick().is_empty());
        assert_eq!(c.timer().time_left(), 1495);
    }

    #[test]
    fn test_tick_from_cancelled_registration_is_dropped() {
        let mut c = coordinator(CoordinatorOptions::default());
        let a = c.add_task("a").unwrap();
        let b = c.add_task("b").unwrap();

        c.select_task(&a.id);
        let first = c.ticker().registration().unwrap();
        c.tick_from(first);
        assert_eq!(c.timer().time_left(), 1499);

        // Switching task while running restarts the countdown and the ticker.
        c.select_task(&b.id);
        let second = c.ticker().registration().unwrap();
        assert_ne!(first, second);

        assert!(c.tick_from(first).is_empty());
        assert_eq!(c.timer().time_left(), 1500);

        c.tick_from(second);
        assert_eq!(c.timer().time_left(), 1499);
    }

    #[test]
    fn test_tick_after_pause_is_dropped_by_registration() {
        let mut c = coordinator(CoordinatorOptions::default());
        c.toggle();
        let registration = c.ticker().registration().unwrap();
        c.toggle();

        assert!(c.tick_from(registration).is_empty());
        assert_eq!(c.timer().time_left(), 1500);
    }

    #[test]
    fn test_remove_unbound_and_unknown_tasks() {
        let mut c = coordinator(CoordinatorOptions::default());
        let a = c.add_task("a").unwrap();
        let b = c.add_task("b").unwrap();
        c.select_task(&a.id);

        assert_eq!(c.remove_task(&b.id), Some(Vec::new()));
        assert_eq!(c.remove_task("missing"), None);
        assert_eq!(c.current_task(), Some(&a));
    }

    #[test]
    fn test_session_switch_rejected_while_running() {
        let mut c = coordinator(CoordinatorOptions::default());
        c.toggle();
        let before = c.snapshot();
        assert!(c.select_session(SessionType::Break).is_empty());
        assert_eq!(c.snapshot(), before);
    }

    #[test]
    fn test_select_unknown_task_is_noop() {
        let mut c = coordinator(CoordinatorOptions::default());
        assert!(c.select_task("missing").is_empty());
        assert!(c.current_task().is_none());
        assert!(!c.timer().is_active());
    }

    #[test]
    fn test_select_without_auto_start_only_binds() {
        let mut c = coordinator(CoordinatorOptions {
            auto_start_on_select: false,
            ..short_options()
        });
        let task = c.add_task("a").unwrap();
        c.select_task(&task.id);

        assert_eq!(c.current_task(), Some(&task));
        assert!(!c.timer().is_active());
        assert!(!c.ticker().is_running());
    }

    #[test]
    fn test_removing_bound_task_releases_it() {
        let mut c = coordinator(short_options());
        let task = c.add_task("a").unwrap();
        c.select_task(&task.id);
        assert_eq!(
            c.remove_task(&task.id),
            Some(vec![TimerEvent::TaskReleased {
                task_id: task.id.clone()
            }])
        );
        assert!(c.timer().current_task_id().is_none());
        assert!(c.tasks().is_empty());

        // The session keeps running, just unattributed.
        let events = tick_n(&mut c, 3);
        assert!(!events
            .iter()
            .any(|e| matches!(e, TimerEvent::WorkSessionCompleted { .. })));
    }

    #[test]
    fn test_sound_cues_and_notifications() {
        let sound = RecordingSound::default();
        let notifier = RecordingNotifier::default();
        let mut c = coordinator(short_options())
            .with_sound(sound.clone())
            .with_notifier(notifier.clone());
        let task = c.add_task("clean desk").unwrap();

        c.select_task(&task.id); // auto start: no cue
        tick_n(&mut c, 3);
        c.toggle();
        tick_n(&mut c, 2);
        c.reset();

        assert_eq!(
            *sound.0.lock().unwrap(),
            vec![SoundCue::Break, SoundCue::Start, SoundCue::Reset]
        );
        let notes = notifier.0.lock().unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].kind, NotificationKind::WorkSessionComplete);
        assert!(notes[0].description.contains("clean desk"));
        assert_eq!(notes[1].kind, NotificationKind::BreakOver);
    }

    #[test]
    fn test_failing_sound_does_not_block_transitions() {
        let mut c = coordinator(short_options()).with_sound(BrokenSpeaker);
        c.toggle();
        tick_n(&mut c, 3);
        c.reset();

        assert_eq!(c.timer().session_count(), 1);
        assert_eq!(c.timer().session_type(), SessionType::Work);
        assert!(!c.timer().is_active());
    }

    #[test]
    fn test_task_list_passthrough() {
        let mut c = coordinator(CoordinatorOptions::default());
        let task = c.add_task("a").unwrap();
        assert_eq!(c.toggle_task(&task.id), Some(true));
        assert_eq!(c.adjust_task(&task.id, 2), Some(2));
        assert_eq!(c.adjust_task(&task.id, -3), Some(0));
        assert!(c.add_task("  ").is_none());
        assert_eq!(c.tasks().len(), 1);
    }
}
