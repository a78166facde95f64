//! Plain-text views of the timer and task list.
//!
//! Colour is applied by the caller so these stay testable.

use pomo_core::{SessionType, Task, TimerEvent, TimerSnapshot};

const BAR_WIDTH: usize = 24;

pub fn session_label(session_type: SessionType) -> &'static str {
    match session_type {
        SessionType::Work => "Focus Session",
        SessionType::Break => "Break Time",
    }
}

/// A fixed-width bar filled proportionally to `progress` (0-100).
pub fn progress_bar(progress: f64, width: usize) -> String {
    let filled = ((progress.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Whether a running countdown is worth redrawing unprompted: on each whole
/// minute, and every second of the final ten.
pub fn is_countdown_milestone(time_left: u32) -> bool {
    time_left > 0 && (time_left % 60 == 0 || time_left <= 10)
}

/// One-line timer summary, e.g.
/// `Focus Session 24:59 [░░░...] 0% running | sessions: 1 | task: Write report`.
pub fn status_line(snapshot: &TimerSnapshot, task: Option<&Task>) -> String {
    let state = if snapshot.is_active { "running" } else { "paused" };
    let mut line = format!(
        "{} {} [{}] {:.0}% {} | sessions: {}",
        session_label(snapshot.session_type),
        snapshot.formatted,
        progress_bar(snapshot.progress, BAR_WIDTH),
        snapshot.progress,
        state,
        snapshot.session_count,
    );
    if let Some(task) = task {
        line.push_str(&format!(" | task: {}", task.text));
    }
    line
}

/// Numbered task rows. The bound task is marked with `>`.
pub fn task_lines(tasks: &[Task], current_task_id: Option<&str>) -> Vec<String> {
    if tasks.is_empty() {
        return vec!["No tasks yet. Add one with /add <text>.".to_string()];
    }
    tasks
        .iter()
        .enumerate()
        .map(|(index, task)| {
            let marker = if current_task_id == Some(task.id.as_str()) {
                ">"
            } else {
                " "
            };
            let check = if task.completed { "x" } else { " " };
            format!(
                "{} {:>2}. [{}] {} ({} pomodoro{}) {}",
                marker,
                index + 1,
                check,
                task.text,
                task.pomodoro_count,
                if task.pomodoro_count == 1 { "" } else { "s" },
                task.short_id(),
            )
        })
        .collect()
}

/// A short description of a timer event, or `None` for events that are
/// reported elsewhere (completions arrive as notifications).
pub fn describe_event(event: &TimerEvent, tasks: &[Task]) -> Option<String> {
    let task_text = |id: &str| {
        tasks
            .iter()
            .find(|task| task.id == id)
            .map(|task| task.text.clone())
            .unwrap_or_else(|| id.to_string())
    };
    match event {
        TimerEvent::Started { auto: false } => Some("Timer started.".to_string()),
        TimerEvent::Started { auto: true } => Some("Timer started automatically.".to_string()),
        TimerEvent::Paused => Some("Timer paused.".to_string()),
        TimerEvent::Reset => Some("Timer reset.".to_string()),
        TimerEvent::SessionChanged { session_type } => {
            Some(format!("Switched to {}.", session_label(*session_type)))
        }
        TimerEvent::TaskBound { task_id } => Some(format!("Working on: {}", task_text(task_id))),
        TimerEvent::TaskReleased { task_id } => {
            Some(format!("Released task: {}", task_text(task_id)))
        }
        TimerEvent::WorkSessionCompleted { task_id } => {
            Some(format!("+1 pomodoro for {}", task_text(task_id)))
        }
        TimerEvent::SessionCompleted { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomo_core::SessionTimer;

    fn task(id: &str, text: &str, count: u32, completed: bool) -> Task {
        Task {
            id: id.to_string(),
            text: text.to_string(),
            pomodoro_count: count,
            completed,
        }
    }

    #[test]
    fn test_progress_bar_bounds() {
        assert_eq!(progress_bar(0.0, 4), "░░░░");
        assert_eq!(progress_bar(50.0, 4), "██░░");
        assert_eq!(progress_bar(100.0, 4), "████");
        assert_eq!(progress_bar(250.0, 4), "████");
    }

    #[test]
    fn test_countdown_milestones() {
        assert!(is_countdown_milestone(1440));
        assert!(is_countdown_milestone(60));
        assert!(is_countdown_milestone(10));
        assert!(is_countdown_milestone(1));
        assert!(!is_countdown_milestone(1499));
        assert!(!is_countdown_milestone(61));
        assert!(!is_countdown_milestone(0));
    }

    #[test]
    fn test_status_line_for_fresh_timer() {
        let snapshot = SessionTimer::default().snapshot();
        let line = status_line(&snapshot, None);
        assert!(line.starts_with("Focus Session 25:00 ["));
        assert!(line.ends_with("0% paused | sessions: 0"));
    }

    #[test]
    fn test_status_line_names_task() {
        let snapshot = SessionTimer::default().snapshot();
        let bound = task("abcdef123456", "Write report", 0, false);
        assert!(status_line(&snapshot, Some(&bound)).ends_with("| task: Write report"));
    }

    #[test]
    fn test_task_lines_mark_bound_and_completed() {
        let tasks = vec![
            task("aaaaaaaa-1", "Write report", 1, false),
            task("bbbbbbbb-2", "Inbox zero", 3, true),
        ];
        let lines = task_lines(&tasks, Some("bbbbbbbb-2"));
        assert_eq!(lines[0], "   1. [ ] Write report (1 pomodoro) aaaaaaaa");
        assert_eq!(lines[1], ">  2. [x] Inbox zero (3 pomodoros) bbbbbbbb");
    }

    #[test]
    fn test_task_lines_empty_hint() {
        assert_eq!(task_lines(&[], None).len(), 1);
    }

    #[test]
    fn test_describe_event() {
        let tasks = vec![task("id-1", "Write report", 0, false)];
        assert_eq!(
            describe_event(&TimerEvent::TaskBound { task_id: "id-1".into() }, &tasks).as_deref(),
            Some("Working on: Write report")
        );
        assert_eq!(
            describe_event(
                &TimerEvent::SessionChanged { session_type: SessionType::Break },
                &tasks
            )
            .as_deref(),
            Some("Switched to Break Time.")
        );
        let completed = TimerEvent::SessionCompleted {
            finished: SessionType::Work,
            task_id: None,
            session_count: 1,
        };
        assert_eq!(describe_event(&completed, &tasks), None);
    }
}
