//! External editor handoff: suspend the TUI, hand the pane text to the
//! configured editor in a tempfile, and read the result back on exit.

use std::io::{Stdout, Write};
use std::process::Command;

use anyhow::{Context, Result};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

/// What came back from the editor session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Updated(String),
    Unchanged,
    /// Editor exited non-zero; the pane keeps its previous content.
    EditorFailed,
}

/// Run `editor_cmd` on `content` while the TUI is suspended. The terminal
/// is always restored, including when the editor fails to launch.
pub fn edit_in_external_editor(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    use_alt_screen: bool,
    editor_cmd: &str,
    content: &str,
) -> Result<EditOutcome> {
    let mut parts = editor_cmd.split_whitespace();
    let program = parts.next().context("Editor command is empty")?;
    let args: Vec<&str> = parts.collect();

    let mut file = tempfile::Builder::new()
        .prefix("promptdeck-")
        .suffix(".txt")
        .tempfile()
        .context("Failed to create temporary file")?;
    file.write_all(content.as_bytes())
        .context("Failed to write temporary file")?;
    file.flush().context("Failed to flush temporary file")?;

    disable_raw_mode()?;
    if use_alt_screen {
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    }

    let status = Command::new(program).args(&args).arg(file.path()).status();

    enable_raw_mode()?;
    if use_alt_screen {
        execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    }
    terminal.clear()?;

    let status = status.with_context(|| format!("Failed to launch editor '{program}'"))?;
    if !status.success() {
        return Ok(EditOutcome::EditorFailed);
    }

    let edited = std::fs::read_to_string(file.path())
        .context("Failed to read edited content back")?;
    if edited == content {
        Ok(EditOutcome::Unchanged)
    } else {
        Ok(EditOutcome::Updated(edited))
    }
}
