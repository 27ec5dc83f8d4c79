//! Modal view stack: trait, event plumbing, and the help overlay.

use crossterm::event::KeyEvent;
use ratatui::{buffer::Buffer, layout::Rect};
use std::fmt;

use crate::layout::{PaneId, PaneTree};
use crate::palette;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    PaneMenu,
    Help,
}

/// Events modal views emit back to the application loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    FocusPane { pane: PaneId },
    HidePane { pane: PaneId },
    UnhidePane { pane: PaneId },
    HideAllPanes,
    ShowAllPanes,
    ResetLayout,
}

#[derive(Debug, Clone)]
pub enum ViewAction {
    None,
    Close,
    Emit(ViewEvent),
    EmitAndClose(ViewEvent),
}

pub trait ModalView {
    fn kind(&self) -> ModalKind;
    fn handle_key(&mut self, key: KeyEvent) -> ViewAction;
    fn render(&self, area: Rect, buf: &mut Buffer);
    /// Refresh any cached pane state after the tree was mutated. Returns
    /// true when the view consumed the update.
    fn update_layout(&mut self, _tree: &PaneTree) -> bool {
        false
    }
}

#[derive(Default)]
pub struct ViewStack {
    views: Vec<Box<dyn ModalView>>,
}

impl ViewStack {
    #[must_use]
    pub fn new() -> Self {
        Self { views: Vec::new() }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    #[must_use]
    pub fn top_kind(&self) -> Option<ModalKind> {
        self.views.last().map(|view| view.kind())
    }

    pub fn push<V: ModalView + 'static>(&mut self, view: V) {
        self.views.push(Box::new(view));
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        for view in &self.views {
            view.render(area, buf);
        }
    }

    pub fn update_layout(&mut self, tree: &PaneTree) -> bool {
        self.views
            .last_mut()
            .map(|view| view.update_layout(tree))
            .unwrap_or(false)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<ViewEvent> {
        let action = self
            .views
            .last_mut()
            .map(|view| view.handle_key(key))
            .unwrap_or(ViewAction::None);
        self.apply_action(action)
    }

    fn apply_action(&mut self, action: ViewAction) -> Vec<ViewEvent> {
        let mut events = Vec::new();
        match action {
            ViewAction::None => {}
            ViewAction::Close => {
                self.views.pop();
            }
            ViewAction::Emit(event) => {
                events.push(event);
            }
            ViewAction::EmitAndClose(event) => {
                events.push(event);
                self.views.pop();
            }
        }
        events
    }
}

impl fmt::Debug for ViewStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewStack")
            .field("len", &self.views.len())
            .field("top", &self.top_kind())
            .finish()
    }
}

pub struct HelpView {
    scroll: usize,
}

impl HelpView {
    #[must_use]
    pub fn new() -> Self {
        Self { scroll: 0 }
    }
}

impl Default for HelpView {
    fn default() -> Self {
        Self::new()
    }
}

impl ModalView for HelpView {
    fn kind(&self) -> ModalKind {
        ModalKind::Help
    }

    fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
        use crossterm::event::KeyCode;

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => ViewAction::Close,
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(1);
                ViewAction::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll = self.scroll.saturating_add(1);
                ViewAction::None
            }
            _ => ViewAction::None,
        }
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        use ratatui::{
            prelude::Stylize,
            style::Style,
            text::{Line, Span},
            widgets::{Block, Borders, Clear, Paragraph, Widget},
        };

        let popup_width = 62.min(area.width.saturating_sub(4));
        let popup_height = 26.min(area.height.saturating_sub(4));

        let popup_area = Rect {
            x: (area.width - popup_width) / 2,
            y: (area.height - popup_height) / 2,
            width: popup_width,
            height: popup_height,
        };

        Clear.render(popup_area, buf);

        let help_lines: Vec<Line> = vec![
            Line::from(vec![Span::styled(
                "promptdeck Help",
                Style::default().fg(palette::DECK_BLUE).bold(),
            )]),
            Line::from(""),
            Line::from(vec![Span::styled(
                "=== Focus ===",
                Style::default().fg(palette::DECK_SKY).bold(),
            )]),
            Line::from("  1-5               - Focus a pane directly"),
            Line::from("  Tab / Shift+Tab   - Cycle focus through all panes"),
            Line::from(""),
            Line::from(vec![Span::styled(
                "=== Layout ===",
                Style::default().fg(palette::DECK_SKY).bold(),
            )]),
            Line::from("  m                 - Toggle maximize on focused pane"),
            Line::from("  n                 - Toggle minimize on focused pane"),
            Line::from("  Ctrl+Up / Ctrl+Down - Cycle pane height up / down"),
            Line::from("  Esc               - Open the pane management menu"),
            Line::from(""),
            Line::from(vec![Span::styled(
                "=== Editing ===",
                Style::default().fg(palette::DECK_SKY).bold(),
            )]),
            Line::from("  i                 - Edit focused pane in place"),
            Line::from("  Esc (editing)     - Back to command mode"),
            Line::from("  e                 - Open focused pane in external editor"),
            Line::from("  Ctrl+S            - Save focused pane"),
            Line::from(""),
            Line::from(vec![Span::styled(
                "=== Requests ===",
                Style::default().fg(palette::DECK_SKY).bold(),
            )]),
            Line::from("  Enter             - Send prompts to the selected model"),
            Line::from("  s                 - Toggle streaming"),
            Line::from("  c                 - Clear the response pane"),
            Line::from("  Ctrl+E            - Export conversation history"),
            Line::from(""),
            Line::from(vec![Span::styled(
                "=== Application ===",
                Style::default().fg(palette::DECK_SKY).bold(),
            )]),
            Line::from("  ?                 - Toggle this help view"),
            Line::from("  q                 - Quit"),
        ];

        let total_lines = help_lines.len();
        let visible_lines = (popup_height as usize).saturating_sub(3);
        let max_scroll = total_lines.saturating_sub(visible_lines);
        let scroll = self.scroll.min(max_scroll);

        let scroll_indicator = if total_lines > visible_lines {
            format!(" [{}/{} ↑↓] ", scroll + 1, max_scroll + 1)
        } else {
            String::new()
        };

        let help = Paragraph::new(help_lines)
            .block(
                Block::default()
                    .title(Line::from(vec![Span::styled(
                        " Help ",
                        Style::default().fg(palette::DECK_BLUE).bold(),
                    )]))
                    .title_bottom(Line::from(vec![
                        Span::styled(" Esc to close ", Style::default().fg(palette::TEXT_MUTED)),
                        Span::styled(scroll_indicator, Style::default().fg(palette::DECK_SKY)),
                    ]))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(palette::DECK_SKY)),
            )
            .scroll((scroll as u16, 0));

        help.render(popup_area, buf);
    }
}
