//! Pane management menu: hierarchy with per-pane status plus bulk actions.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    prelude::Stylize,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::layout::{PaneId, PaneStatus, PaneTree};
use crate::palette;
use crate::tui::views::{ModalKind, ModalView, ViewAction, ViewEvent};

/// Bulk and targeted actions offered below the pane list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Select,
    Hide,
    Unhide,
    HideAll,
    ShowAll,
    Reset,
}

impl MenuAction {
    fn label(self) -> &'static str {
        match self {
            MenuAction::Select => "Select/Focus Pane",
            MenuAction::Hide => "Hide Selected Pane",
            MenuAction::Unhide => "Unhide Selected Pane",
            MenuAction::HideAll => "Hide All Children",
            MenuAction::ShowAll => "Show All Children",
            MenuAction::Reset => "Reset Layout",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuEntry {
    Header(&'static str),
    Separator,
    Pane(PaneId),
    Action(MenuAction),
}

impl MenuEntry {
    fn selectable(self) -> bool {
        matches!(self, MenuEntry::Pane(_) | MenuEntry::Action(_))
    }
}

/// Modal pane menu. Holds a status snapshot refreshed through
/// `update_layout` after every action that mutates the tree, so an open
/// menu always reflects current state.
pub struct PaneMenuView {
    entries: Vec<MenuEntry>,
    statuses: Vec<(PaneId, PaneStatus)>,
    selected: usize,
    /// Most recently highlighted child pane; the hide/unhide action rows
    /// operate on it.
    target: PaneId,
}

impl PaneMenuView {
    #[must_use]
    pub fn new(tree: &PaneTree) -> Self {
        let mut entries = vec![MenuEntry::Header("Pane Hierarchy")];
        entries.push(MenuEntry::Pane(PaneId::Root));
        for pane in tree.child_panes() {
            entries.push(MenuEntry::Pane(pane));
        }
        entries.extend([
            MenuEntry::Separator,
            MenuEntry::Header("Pane Actions"),
            MenuEntry::Action(MenuAction::Select),
            MenuEntry::Action(MenuAction::Hide),
            MenuEntry::Action(MenuAction::Unhide),
            MenuEntry::Separator,
            MenuEntry::Header("Root Actions"),
            MenuEntry::Action(MenuAction::HideAll),
            MenuEntry::Action(MenuAction::ShowAll),
            MenuEntry::Action(MenuAction::Reset),
        ]);

        let mut view = Self {
            entries,
            statuses: Vec::new(),
            selected: 1,
            target: PaneId::UserPrompt,
        };
        view.refresh(tree);
        view
    }

    fn refresh(&mut self, tree: &PaneTree) {
        self.statuses = tree
            .child_panes()
            .into_iter()
            .map(|pane| (pane, tree.status_of(pane)))
            .collect();
    }

    fn status_of(&self, pane: PaneId) -> PaneStatus {
        self.statuses
            .iter()
            .find(|(id, _)| *id == pane)
            .map(|(_, status)| *status)
            .unwrap_or(PaneStatus::Visible)
    }

    /// Move the highlight by one selectable row, wrapping at both ends.
    fn step(&mut self, forward: bool) {
        let len = self.entries.len();
        let mut index = self.selected;
        for _ in 0..len {
            index = if forward {
                (index + 1) % len
            } else {
                (index + len - 1) % len
            };
            if self.entries[index].selectable() {
                self.selected = index;
                if let MenuEntry::Pane(pane) = self.entries[index]
                    && pane != PaneId::Root
                {
                    self.target = pane;
                }
                return;
            }
        }
    }

    fn activate(&mut self) -> ViewAction {
        match self.entries[self.selected] {
            MenuEntry::Header(_) | MenuEntry::Separator => ViewAction::None,
            MenuEntry::Pane(PaneId::Root) => ViewAction::EmitAndClose(ViewEvent::FocusPane {
                pane: PaneId::Root,
            }),
            MenuEntry::Pane(pane) => {
                if self.status_of(pane) == PaneStatus::Hidden {
                    ViewAction::Emit(ViewEvent::UnhidePane { pane })
                } else {
                    ViewAction::EmitAndClose(ViewEvent::FocusPane { pane })
                }
            }
            MenuEntry::Action(MenuAction::Select) => ViewAction::Close,
            MenuEntry::Action(MenuAction::Hide) => ViewAction::Emit(ViewEvent::HidePane {
                pane: self.target,
            }),
            MenuEntry::Action(MenuAction::Unhide) => ViewAction::Emit(ViewEvent::UnhidePane {
                pane: self.target,
            }),
            MenuEntry::Action(MenuAction::HideAll) => ViewAction::Emit(ViewEvent::HideAllPanes),
            MenuEntry::Action(MenuAction::ShowAll) => ViewAction::Emit(ViewEvent::ShowAllPanes),
            MenuEntry::Action(MenuAction::Reset) => {
                ViewAction::EmitAndClose(ViewEvent::ResetLayout)
            }
        }
    }

    fn status_style(status: PaneStatus) -> Style {
        let color = match status {
            PaneStatus::Visible => palette::STATUS_VISIBLE,
            PaneStatus::Hidden => palette::STATUS_HIDDEN,
            PaneStatus::Minimized => palette::STATUS_MINIMIZED,
            PaneStatus::Maximized => palette::STATUS_MAXIMIZED,
        };
        Style::default().fg(color)
    }
}

impl ModalView for PaneMenuView {
    fn kind(&self) -> ModalKind {
        ModalKind::PaneMenu
    }

    fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => ViewAction::Close,
            KeyCode::Up | KeyCode::Char('k') => {
                self.step(false);
                ViewAction::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.step(true);
                ViewAction::None
            }
            KeyCode::Enter => self.activate(),
            _ => ViewAction::None,
        }
    }

    fn update_layout(&mut self, tree: &PaneTree) -> bool {
        self.refresh(tree);
        true
    }

    fn render(&self, area: Rect, buf: &mut Buffer) {
        let popup_width = 52.min(area.width.saturating_sub(4));
        let popup_height = (self.entries.len() as u16 + 2).min(area.height.saturating_sub(4));

        let popup_area = Rect {
            x: (area.width - popup_width) / 2,
            y: (area.height - popup_height) / 2,
            width: popup_width,
            height: popup_height,
        };

        Clear.render(popup_area, buf);

        let mut lines: Vec<Line> = Vec::with_capacity(self.entries.len());
        for (index, entry) in self.entries.iter().enumerate() {
            let highlighted = index == self.selected;
            let marker = if highlighted { "> " } else { "  " };
            let line = match entry {
                MenuEntry::Header(title) => Line::from(Span::styled(
                    format!("=== {title} ==="),
                    Style::default().fg(palette::DECK_SKY).bold(),
                )),
                MenuEntry::Separator => Line::from(Span::styled(
                    "-".repeat(popup_width.saturating_sub(4) as usize),
                    Style::default().fg(palette::TEXT_MUTED),
                )),
                MenuEntry::Pane(PaneId::Root) => Line::from(Span::styled(
                    format!("{marker}{}", PaneId::Root.label()),
                    if highlighted {
                        Style::default()
                            .fg(palette::TEXT_PRIMARY)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(palette::DECK_BLUE)
                    },
                )),
                MenuEntry::Pane(pane) => {
                    let status = self.status_of(*pane);
                    let mut name_style = Self::status_style(status);
                    if highlighted {
                        name_style = name_style.add_modifier(Modifier::BOLD);
                    }
                    Line::from(vec![
                        Span::styled(
                            format!("{marker}|- {:<16}", pane.label()),
                            name_style,
                        ),
                        Span::styled(status.label(), Self::status_style(status)),
                    ])
                }
                MenuEntry::Action(action) => Line::from(Span::styled(
                    format!("{marker}{}", action.label()),
                    if highlighted {
                        Style::default()
                            .fg(palette::TEXT_PRIMARY)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(palette::TEXT_DIM)
                    },
                )),
            };
            lines.push(line);
        }

        let menu = Paragraph::new(lines).block(
            Block::default()
                .title(Line::from(Span::styled(
                    " Pane Menu ",
                    Style::default().fg(palette::DECK_BLUE).bold(),
                )))
                .title_bottom(Line::from(Span::styled(
                    " Up/Down Navigate | Enter Select | Esc/Q Close ",
                    Style::default().fg(palette::TEXT_MUTED),
                )))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette::DECK_SKY)),
        );

        menu.render(popup_area, buf);
    }
}
