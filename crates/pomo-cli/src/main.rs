mod command;
mod helper;
mod notifier;
mod render;

use std::path::PathBuf;
use std::sync::mpsc as std_mpsc;
use std::sync::{Arc, RwLock};
use std::thread;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use colored::Colorize;
use pomo_core::ticker::Registration;
use pomo_core::{Coordinator, TaskStore, TimerEvent};
use pomo_infrastructure::logging::init_logging;
use pomo_infrastructure::{AppConfig, FileKeyValueStore, PomoPaths, TerminalBell, TokioTicker};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Editor, ExternalPrinter};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{info, warn};

use crate::command::{COMMANDS, Command};
use crate::helper::{CliHelper, TaskTitles};
use crate::notifier::ConsoleNotifier;

const PROMPT: &str = "pomo> ";

#[derive(Parser)]
#[command(name = "pomo", version)]
#[command(about = "Pomodoro timer with a persisted task list", long_about = None)]
struct Cli {
    /// Config file to read instead of the platform default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding tasks and logs
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Do not ring the terminal bell
    #[arg(long, global = true)]
    no_sound: bool,

    /// Do not start the countdown when a task is selected
    #[arg(long, global = true)]
    no_auto_start: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive timer (default)
    Run,
    /// Print the task list
    Tasks,
    /// Add a task
    Add {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Print the effective configuration
    Config,
}

/// Everything the event loop reacts to.
enum AppEvent {
    Tick(Registration),
    Line(String),
    /// Prints above the prompt without disturbing the line being edited.
    Printer(Box<dyn ExternalPrinter + Send>),
    Quit,
}

type App = Coordinator<TokioTicker<AppEvent>>;

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let platform = PomoPaths::from_platform()?;
    let config_path = cli.config.clone().unwrap_or_else(|| platform.config_file());
    let mut config = AppConfig::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    if let Some(data_dir) = cli.data_dir {
        config.data_dir = Some(data_dir);
    }
    if cli.no_sound {
        config.sound_enabled = false;
    }
    if cli.no_auto_start {
        config.auto_start_on_select = false;
    }

    let paths = match config.data_dir.clone() {
        Some(data_dir) => platform.with_data_dir(data_dir),
        None => platform,
    };
    let _log_guard = init_logging(&paths.logs_dir(), &config.log_level)
        .context("Failed to initialise logging")?;
    info!(
        config = %config_path.display(),
        data_dir = %paths.data_dir().display(),
        "pomo starting"
    );

    let storage = Arc::new(FileKeyValueStore::new(paths.data_dir()));
    let mut tasks = TaskStore::load(storage);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_repl(tasks, &config).await?,
        Commands::Tasks => {
            for line in render::task_lines(tasks.tasks(), None) {
                println!("{}", line);
            }
        }
        Commands::Add { text } => {
            let task = tasks
                .add(&text.join(" "))
                .ok_or_else(|| anyhow!("Task text cannot be empty"))?;
            println!("Added task {} ({})", task.text.bold(), task.short_id());
        }
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

async fn run_repl(tasks: TaskStore, config: &AppConfig) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();

    let ticker = TokioTicker::new(event_tx.clone(), AppEvent::Tick);
    let titles: TaskTitles = Arc::new(RwLock::new(Vec::new()));
    let mut app: App = Coordinator::new(tasks, ticker, config.coordinator_options())
        .with_notifier(ConsoleNotifier);
    if config.sound_enabled {
        app = app.with_sound(TerminalBell);
    }

    println!("{}", "pomo - type /help for commands".bright_black());
    print_status(&app);
    refresh_titles(&app, &titles);

    // The reader waits for an ack after each line so command output is
    // printed before the next prompt.
    let (ack_tx, ack_rx) = std_mpsc::channel::<()>();
    spawn_reader(event_tx, ack_rx, titles.clone());
    let mut printer: Option<Box<dyn ExternalPrinter + Send>> = None;

    while let Some(event) = event_rx.recv().await {
        match event {
            AppEvent::Tick(registration) => {
                let events = app.tick_from(registration);
                if !events.is_empty() {
                    print_events(&app, &events);
                    print_status(&app);
                } else if app.timer().is_active()
                    && render::is_countdown_milestone(app.timer().time_left())
                {
                    let line = render::status_line(&app.snapshot(), app.current_task());
                    print_above_prompt(&mut printer, line.bright_green().to_string());
                }
            }
            AppEvent::Printer(external) => printer = Some(external),
            AppEvent::Line(line) => {
                let flow = match Command::parse(&line) {
                    Ok(command) => execute(&mut app, command).unwrap_or_else(|e| {
                        println!("{}", e.to_string().red());
                        Flow::Continue
                    }),
                    Err(e) => {
                        println!("{}", e.to_string().red());
                        Flow::Continue
                    }
                };
                if flow == Flow::Quit {
                    break;
                }
                refresh_titles(&app, &titles);
                let _ = ack_tx.send(());
            }
            AppEvent::Quit => break,
        }
    }

    info!("pomo exiting");
    println!("{}", "Goodbye!".bright_cyan());
    Ok(())
}

/// Reads lines on a blocking thread and forwards them to the event loop.
fn spawn_reader(
    event_tx: UnboundedSender<AppEvent>,
    ack_rx: std_mpsc::Receiver<()>,
    titles: TaskTitles,
) {
    thread::spawn(move || {
        let mut rl: Editor<CliHelper, DefaultHistory> = match Editor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("{}", format!("Failed to open terminal: {}", e).red());
                let _ = event_tx.send(AppEvent::Quit);
                return;
            }
        };
        rl.set_helper(Some(CliHelper::new(titles)));
        match rl.create_external_printer() {
            Ok(printer) => {
                let _ = event_tx.send(AppEvent::Printer(Box::new(printer)));
            }
            Err(e) => warn!("External printer unavailable: {}", e),
        }

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(line);
                    if event_tx.send(AppEvent::Line(line.to_string())).is_err() {
                        break;
                    }
                    if ack_rx.recv().is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "CTRL-C detected. Type /quit to exit.".yellow());
                }
                Err(ReadlineError::Eof) => {
                    let _ = event_tx.send(AppEvent::Quit);
                    break;
                }
                Err(err) => {
                    warn!("Readline error: {:?}", err);
                    eprintln!("{}", format!("Error: {:?}", err).red());
                    let _ = event_tx.send(AppEvent::Quit);
                    break;
                }
            }
        }
    });
}

fn execute(app: &mut App, command: Command) -> Result<Flow> {
    match command {
        Command::Start => {
            if app.timer().is_active() {
                println!("Timer is already running.");
            } else {
                let events = app.toggle();
                print_events(app, &events);
                print_status(app);
            }
        }
        Command::Pause => {
            if app.timer().is_active() {
                let events = app.toggle();
                print_events(app, &events);
                print_status(app);
            } else {
                println!("Timer is not running.");
            }
        }
        Command::Reset => {
            let events = app.reset();
            print_events(app, &events);
            print_status(app);
        }
        Command::Session(session_type) => {
            let events = app.select_session(session_type);
            if events.is_empty() {
                println!("Pause the timer before switching sessions.");
            } else {
                print_events(app, &events);
                print_status(app);
            }
        }
        Command::Add(text) => {
            let task = app
                .add_task(&text)
                .ok_or_else(|| anyhow!("Task text cannot be empty"))?;
            println!(
                "Added task {}: {}",
                app.tasks().len(),
                task.text.bold()
            );
        }
        Command::Select(reference) => {
            let id = resolve_id(app, &reference)?;
            let events = app.select_task(&id);
            if events.is_empty() {
                println!("Already working on that task.");
            } else {
                print_events(app, &events);
                print_status(app);
            }
        }
        Command::Release => {
            let events = app.release_task();
            if events.is_empty() {
                println!("No task is selected.");
            } else {
                print_events(app, &events);
            }
        }
        Command::ToggleDone(reference) => {
            let id = resolve_id(app, &reference)?;
            match app.toggle_task(&id) {
                Some(true) => println!("Completed: {}", task_text(app, &id).bold()),
                Some(false) => println!("Reopened: {}", task_text(app, &id).bold()),
                None => println!("Task not found."),
            }
        }
        Command::Adjust(reference, delta) => {
            let id = resolve_id(app, &reference)?;
            if let Some(count) = app.adjust_task(&id, delta) {
                println!("{}: {} pomodoros", task_text(app, &id).bold(), count);
            }
        }
        Command::Remove(reference) => {
            let id = resolve_id(app, &reference)?;
            let text = task_text(app, &id);
            if let Some(events) = app.remove_task(&id) {
                if events
                    .iter()
                    .any(|event| matches!(event, TimerEvent::TaskReleased { .. }))
                {
                    println!("Released task: {}", text);
                }
                println!("Removed: {}", text);
            }
        }
        Command::Tasks => {
            let current = app.timer().current_task_id();
            for line in render::task_lines(app.tasks().tasks(), current) {
                println!("{}", line);
            }
        }
        Command::Status => print_status(app),
        Command::Help => {
            for (name, description) in COMMANDS {
                println!("  {:<10} {}", name.bright_cyan(), description);
            }
        }
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn resolve_id(app: &App, reference: &str) -> Result<String> {
    app.tasks()
        .resolve(reference)
        .map(|task| task.id.clone())
        .ok_or_else(|| anyhow!("No task matches '{}'. See /tasks.", reference))
}

fn task_text(app: &App, id: &str) -> String {
    app.tasks()
        .get(id)
        .map(|task| task.text.clone())
        .unwrap_or_default()
}

fn refresh_titles(app: &App, titles: &TaskTitles) {
    if let Ok(mut titles) = titles.write() {
        *titles = app.tasks().tasks().iter().map(|task| task.text.clone()).collect();
    }
}

/// Falls back to stdout until the reader has handed over its printer.
fn print_above_prompt(printer: &mut Option<Box<dyn ExternalPrinter + Send>>, line: String) {
    match printer {
        Some(printer) => {
            if let Err(e) = printer.print(line) {
                warn!("External print failed: {}", e);
            }
        }
        None => println!("{}", line),
    }
}

fn print_events(app: &App, events: &[TimerEvent]) {
    for event in events {
        if let Some(message) = render::describe_event(event, app.tasks().tasks()) {
            println!("{}", message.bright_black());
        }
    }
}

fn print_status(app: &App) {
    let line = render::status_line(&app.snapshot(), app.current_task());
    if app.timer().is_active() {
        println!("{}", line.bright_green());
    } else {
        println!("{}", line.bright_white());
    }
}
