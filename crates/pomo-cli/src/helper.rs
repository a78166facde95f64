//! Line editing for the REPL.
//!
//! Completes slash commands, then task positions for the commands that take
//! a task. The task titles are shared with the event loop, which refreshes
//! them after every command.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::{Arc, RwLock};

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hint, Hinter};
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::command::{COMMANDS, TASK_COMMANDS};

/// Task titles in list order, shared between the event loop and the editor.
pub type TaskTitles = Arc<RwLock<Vec<String>>>;

/// Greyed-out text after the cursor. Only command-name hints can be accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineHint {
    display: String,
    completion: Option<String>,
}

impl Hint for LineHint {
    fn display(&self) -> &str {
        &self.display
    }

    fn completion(&self) -> Option<&str> {
        self.completion.as_deref()
    }
}

pub struct CliHelper {
    titles: TaskTitles,
}

impl CliHelper {
    pub fn new(titles: TaskTitles) -> Self {
        Self { titles }
    }

    fn titles(&self) -> Vec<String> {
        self.titles
            .read()
            .map(|titles| titles.clone())
            .unwrap_or_default()
    }

    /// `(position, title)` for every task whose position starts with `prefix`.
    fn task_candidates(&self, prefix: &str) -> Vec<(String, String)> {
        self.titles()
            .into_iter()
            .enumerate()
            .map(|(index, title)| ((index + 1).to_string(), title))
            .filter(|(position, _)| position.starts_with(prefix))
            .collect()
    }

    fn line_hint(&self, line: &str) -> Option<LineHint> {
        if let Some((_, argument)) = task_argument(line) {
            let titles = self.titles();
            if titles.is_empty() {
                return Some(LineHint {
                    display: "  (no tasks yet)".to_string(),
                    completion: None,
                });
            }
            if argument.is_empty() {
                return Some(LineHint {
                    display: format!("1-{}", titles.len()),
                    completion: None,
                });
            }
            let index = argument.parse::<usize>().ok()?.checked_sub(1)?;
            return titles.get(index).map(|title| LineHint {
                display: format!("  {}", title),
                completion: None,
            });
        }

        if !line.starts_with('/') || line.contains(char::is_whitespace) {
            return None;
        }
        COMMANDS
            .iter()
            .map(|(name, _)| *name)
            .find(|name| name.starts_with(line) && name.len() > line.len())
            .map(|name| {
                let rest = name[line.len()..].to_string();
                LineHint {
                    display: rest.clone(),
                    completion: Some(rest),
                }
            })
    }
}

/// The byte offset and text of the task argument typed so far, when `line`
/// starts with a command that takes a task.
fn task_argument(line: &str) -> Option<(usize, &str)> {
    let (head, rest) = line.split_once(' ')?;
    if !TASK_COMMANDS.contains(&head) {
        return None;
    }
    let argument = rest.trim_start();
    Some((line.len() - argument.len(), argument))
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if let Some((start, argument)) = task_argument(line) {
            let candidates = self
                .task_candidates(argument)
                .into_iter()
                .map(|(position, title)| Pair {
                    display: format!("{:>3}  {}", position, title),
                    replacement: position,
                })
                .collect();
            return Ok((start, candidates));
        }

        if !line.starts_with('/') || line.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        let candidates = COMMANDS
            .iter()
            .filter(|(name, _)| name.starts_with(line))
            .map(|(name, description)| Pair {
                display: format!("{:<9} {}", name, description),
                replacement: format!("{} ", name),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if !line.starts_with('/') {
            return Borrowed(line);
        }
        match line.split_once(' ') {
            Some((head, rest)) => Owned(format!("{} {}", head.bright_cyan(), rest)),
            None => Owned(line.bright_cyan().to_string()),
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = LineHint;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<LineHint> {
        if pos < line.len() {
            return None;
        }
        self.line_hint(line)
    }
}

impl Validator for CliHelper {}

#[cfg(test)]
mod tests {
    use super::*;

    fn helper(titles: &[&str]) -> CliHelper {
        let titles = titles.iter().map(|title| title.to_string()).collect();
        CliHelper::new(Arc::new(RwLock::new(titles)))
    }

    #[test]
    fn test_task_argument_offsets() {
        assert_eq!(task_argument("/select 2"), Some((8, "2")));
        assert_eq!(task_argument("/rm   1"), Some((6, "1")));
        assert_eq!(task_argument("/done "), Some((6, "")));
        assert_eq!(task_argument("/add 2"), None);
        assert_eq!(task_argument("/select"), None);
    }

    #[test]
    fn test_task_candidates_by_position() {
        let titles: Vec<String> = (1..=12).map(|n| format!("task {n}")).collect();
        let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
        let helper = helper(&refs);

        let found = helper.task_candidates("1");
        let positions: Vec<_> = found.iter().map(|(position, _)| position.as_str()).collect();
        assert_eq!(positions, vec!["1", "10", "11", "12"]);
        assert_eq!(helper.task_candidates("").len(), 12);
    }

    #[test]
    fn test_hint_names_the_referenced_task() {
        let helper = helper(&["clean desk", "write report"]);
        assert_eq!(
            helper.line_hint("/select 2").map(|hint| hint.display),
            Some("  write report".to_string())
        );
        assert_eq!(
            helper.line_hint("/done ").map(|hint| hint.display),
            Some("1-2".to_string())
        );
        assert_eq!(helper.line_hint("/inc 9"), None);
    }

    #[test]
    fn test_command_hint_can_be_accepted() {
        let hint = helper(&[]).line_hint("/sta").unwrap();
        assert_eq!(hint.display(), "rt");
        assert_eq!(hint.completion(), Some("rt"));
        assert_eq!(helper(&[]).line_hint("/start now"), None);
    }

    #[test]
    fn test_hint_without_tasks() {
        let hint = helper(&[]).line_hint("/rm ").unwrap();
        assert_eq!(hint.completion(), None);
    }
}
