//! Minimal diagnostic logging.
//!
//! The TUI owns the terminal, so log lines go to a file under the state
//! directory rather than stderr. Verbose mode (from `--verbose`) enables
//! info-level lines; warnings and errors are always written.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

pub fn set_verbose(enabled: bool) {
    VERBOSE.store(enabled, Ordering::Relaxed);
}

#[must_use]
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

fn log_path() -> Option<PathBuf> {
    let dir = dirs::state_dir()
        .or_else(dirs::data_dir)?
        .join("promptdeck");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir.join("promptdeck.log"))
}

fn append(level: &str, message: &str) {
    let Some(path) = log_path() else {
        return;
    };
    if let Ok(mut file) = OpenOptions::new().append(true).create(true).open(path) {
        let timestamp = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f");
        let _ = writeln!(file, "{timestamp} [{level}] {message}");
    }
}

pub fn info(message: impl Into<String>) {
    let message = message.into();
    tracing::info!("{message}");
    if is_verbose() {
        append("INFO", &message);
    }
}

pub fn warn(message: impl Into<String>) {
    let message = message.into();
    tracing::warn!("{message}");
    append("WARN", &message);
}

pub fn error(message: impl Into<String>) {
    let message = message.into();
    tracing::error!("{message}");
    append("ERROR", &message);
}
