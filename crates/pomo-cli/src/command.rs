//! REPL command parsing.

use anyhow::{Result, bail};
use pomo_core::SessionType;

/// Every command the REPL understands, for completion and help.
pub const COMMANDS: &[(&str, &str)] = &[
    ("/start", "start the countdown"),
    ("/pause", "pause the countdown"),
    ("/reset", "stop and return to a fresh work session"),
    ("/work", "switch to a work session (while paused)"),
    ("/break", "switch to a break session (while paused)"),
    ("/add", "/add <text> - add a task"),
    ("/select", "/select <task> - bind a task to the timer"),
    ("/release", "unbind the current task"),
    ("/done", "/done <task> - toggle a task's completion"),
    ("/inc", "/inc <task> - add a pomodoro to a task"),
    ("/dec", "/dec <task> - remove a pomodoro from a task"),
    ("/rm", "/rm <task> - delete a task"),
    ("/tasks", "list tasks"),
    ("/status", "show the timer"),
    ("/help", "show this help"),
    ("/quit", "exit"),
];

/// Commands whose argument is a task reference.
pub const TASK_COMMANDS: &[&str] = &["/select", "/done", "/inc", "/dec", "/rm"];

/// A parsed REPL line. Task references are resolved later against the
/// store: an id, an id prefix or a 1-based list position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Reset,
    Session(SessionType),
    Add(String),
    Select(String),
    Release,
    ToggleDone(String),
    Adjust(String, i64),
    Remove(String),
    Tasks,
    Status,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };
        let name = head.strip_prefix('/').unwrap_or(head).to_lowercase();

        let command = match name.as_str() {
            "start" => Command::Start,
            "pause" => Command::Pause,
            "reset" => Command::Reset,
            "work" | "focus" => Command::Session(SessionType::Work),
            "break" => Command::Session(SessionType::Break),
            "add" => Command::Add(required(rest, "/add <text>")?),
            "select" => Command::Select(required(rest, "/select <task>")?),
            "release" => Command::Release,
            "done" => Command::ToggleDone(required(rest, "/done <task>")?),
            "inc" => Command::Adjust(required(rest, "/inc <task>")?, 1),
            "dec" => Command::Adjust(required(rest, "/dec <task>")?, -1),
            "rm" | "remove" => Command::Remove(required(rest, "/rm <task>")?),
            "tasks" | "list" | "ls" => Command::Tasks,
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => bail!("Unknown command: {}. Type /help for commands.", head),
        };
        Ok(command)
    }
}

fn required(rest: &str, usage: &str) -> Result<String> {
    if rest.is_empty() {
        bail!("Usage: {}", usage);
    }
    Ok(rest.to_string())
}
