//! Tracing subscriber setup.
//!
//! Logs go to a daily rolling file so the interactive terminal stays clean.

use std::fs;
use std::path::Path;

use pomo_core::error::{PomoError, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// File name prefix of the rolling log files.
pub const LOG_FILE_PREFIX: &str = "pomo.log";

/// Builds the log filter: `RUST_LOG` if set, else `default_directive`,
/// else `info`.
pub fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber writing to `<logs_dir>/pomo.log.YYYY-MM-DD`.
///
/// The returned guard flushes buffered lines when dropped; keep it alive for
/// the life of the process.
pub fn init_logging(logs_dir: &Path, default_directive: &str) -> Result<WorkerGuard> {
    fs::create_dir_all(logs_dir)?;
    let file_appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_env_filter(env_filter(default_directive))
        .try_init()
        .map_err(|e| PomoError::internal(format!("Failed to install log subscriber: {}", e)))?;

    Ok(guard)
}
