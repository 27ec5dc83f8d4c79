//! Terminal lifecycle and the single-threaded UI event loop.
//!
//! One iteration drains background LLM events, redraws if anything
//! changed, then waits up to 50ms for input. All pane-tree mutation
//! happens here on the UI task; background request tasks only enqueue
//! events into the channel drained at the top of the loop.

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::client::{LlmClient, LlmEvent};
use crate::config::Config;
use crate::conversation::ConversationHistory;
use crate::palette;
use crate::persistence::PaneStore;
use crate::settings::Settings;
use crate::tui::app::{App, NoticeLevel, TuiOptions, UiRequest};
use crate::tui::editor::{EditOutcome, edit_in_external_editor};
use crate::tui::widgets::{pane_areas, render_pane, render_status_bar, row_constraints, visible_rows};

/// Run the interactive TUI until the user quits.
pub async fn run_tui(config: &Config, settings: &Settings, options: TuiOptions) -> Result<()> {
    let use_alt_screen = options.use_alt_screen;

    let store = PaneStore::default_location()?;
    store.ensure_files()?;
    let history = ConversationHistory::load(store.history_path(), settings.max_history_items);
    let client = LlmClient::new(config.clone());
    let (event_tx, event_rx) = tokio::sync::mpsc::unbounded_channel();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if use_alt_screen {
        execute!(stdout, EnterAlternateScreen)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(options, store, history, client, event_tx);
    let result = run_event_loop(&mut terminal, &mut app, event_rx, use_alt_screen).await;

    disable_raw_mode()?;
    if use_alt_screen {
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    }
    terminal.show_cursor()?;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    mut event_rx: UnboundedReceiver<LlmEvent>,
    use_alt_screen: bool,
) -> Result<()> {
    loop {
        // First, fold in any background request events (non-blocking).
        while let Ok(event) = event_rx.try_recv() {
            app.on_llm_event(event);
        }

        if app.needs_redraw {
            terminal.draw(|frame| draw(frame, app))?;
            app.needs_redraw = false;
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if app.view_stack.is_empty() {
                        match app.handle_key(key) {
                            Some(UiRequest::Quit) => break,
                            Some(UiRequest::OpenEditor(pane)) => {
                                open_external_editor(terminal, app, pane, use_alt_screen);
                            }
                            None => {}
                        }
                    } else {
                        let events = app.view_stack.handle_key(key);
                        for event in events {
                            app.apply_view_event(event);
                        }
                        app.needs_redraw = true;
                    }
                }
                Event::Resize(..) => {
                    app.needs_redraw = true;
                }
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn open_external_editor(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    pane: crate::layout::PaneId,
    use_alt_screen: bool,
) {
    let content = app
        .buffer(pane)
        .map(|buffer| buffer.content.clone())
        .unwrap_or_default();
    let editor_cmd = app.editor_cmd.clone();

    match edit_in_external_editor(terminal, use_alt_screen, &editor_cmd, &content) {
        Ok(EditOutcome::Updated(edited)) => {
            app.set_buffer_text(pane, edited);
            app.save_focused();
            app.notify(NoticeLevel::Info, format!("{} updated", pane.label()));
        }
        Ok(EditOutcome::Unchanged) => {}
        Ok(EditOutcome::EditorFailed) => {
            app.notify(NoticeLevel::Warning, "Editor exited with error");
        }
        Err(err) => {
            app.notify(NoticeLevel::Error, format!("Error opening editor: {err}"));
        }
    }
    app.needs_redraw = true;
}

fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Fill(1), Constraint::Length(1)])
        .split(frame.area());
    let body = chunks[0];
    let footer = chunks[1];

    let rows = visible_rows(&app.tree);
    if rows.is_empty() {
        let placeholder = Paragraph::new(Line::from(
            "All panes hidden - press Esc to open the pane menu",
        ))
        .style(Style::default().fg(palette::TEXT_MUTED));
        frame.render_widget(placeholder, body);
    } else {
        let constraints = row_constraints(&app.tree);
        let row_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(body);
        for ((_, row), row_area) in rows.iter().copied().zip(row_chunks.iter()) {
            for (pane, pane_area) in pane_areas(&app.tree, row, *row_area) {
                render_pane(frame, app, pane, pane_area);
            }
        }
    }

    render_status_bar(frame, app, footer);
    app.view_stack.render(frame.area(), frame.buffer_mut());
}
