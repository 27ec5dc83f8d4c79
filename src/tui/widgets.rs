//! Rendering helpers for pane chrome, pane contents, and the status bar.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    prelude::Stylize,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::layout::{Axis, HeightTier, PaneId, PaneTree, Row};
use crate::models::{AVAILABLE_MODELS, Provider, models_for_provider};
use crate::palette;
use crate::tui::app::{App, InputMode, NoticeLevel, RequestState};

const MINIMIZED_HEIGHT: u16 = 3;

/// Rows that currently occupy screen space, with their original indices.
#[must_use]
pub fn visible_rows(tree: &PaneTree) -> Vec<(usize, &Row)> {
    tree.rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            !row.suppressed
                && row
                    .panes
                    .iter()
                    .any(|pane| tree.pane(*pane).is_some_and(|p| p.is_shown()))
        })
        .collect()
}

/// Vertical constraint for each visible row, derived from its panes'
/// height tiers.
#[must_use]
pub fn row_constraints(tree: &PaneTree) -> Vec<Constraint> {
    visible_rows(tree)
        .iter()
        .map(|(_, row)| {
            let shown: Vec<&crate::layout::Pane> = row
                .panes
                .iter()
                .filter_map(|pane| tree.pane(*pane))
                .filter(|pane| pane.is_shown())
                .collect();
            if shown
                .iter()
                .all(|pane| pane.tier == HeightTier::Minimized)
            {
                Constraint::Length(MINIMIZED_HEIGHT)
            } else {
                let weight = shown.iter().map(|pane| pane.tier.weight()).max().unwrap_or(1);
                Constraint::Fill(weight)
            }
        })
        .collect()
}

/// Split one row's area between its shown panes along the row axis.
#[must_use]
pub fn pane_areas(tree: &PaneTree, row: &Row, area: Rect) -> Vec<(PaneId, Rect)> {
    let shown: Vec<PaneId> = row
        .panes
        .iter()
        .copied()
        .filter(|pane| tree.pane(*pane).is_some_and(|p| p.is_shown()))
        .collect();
    if shown.is_empty() {
        return Vec::new();
    }
    let direction = match row.axis {
        Axis::Horizontal => Direction::Horizontal,
        Axis::Vertical => Direction::Vertical,
    };
    let constraints: Vec<Constraint> = shown.iter().map(|_| Constraint::Fill(1)).collect();
    let chunks = Layout::default()
        .direction(direction)
        .constraints(constraints)
        .split(area);
    shown.into_iter().zip(chunks.iter().copied()).collect()
}

fn pane_block(app: &App, pane: PaneId) -> Block<'static> {
    let focused = app.focused_pane() == pane;
    let border_style = if focused {
        Style::default().fg(palette::BORDER_FOCUSED)
    } else {
        Style::default().fg(palette::BORDER_IDLE)
    };
    let mut title_style = Style::default().fg(if focused {
        palette::DECK_SKY
    } else {
        palette::TEXT_DIM
    });
    if focused {
        title_style = title_style.add_modifier(Modifier::BOLD);
    }

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Line::from(Span::styled(
            format!(" {} ", pane.label()),
            title_style,
        )));

    if focused && pane.is_editable() {
        let hint = match app.mode {
            InputMode::Edit => " -- EDIT -- Esc: command mode | Ctrl+S: save ",
            InputMode::Command => " i: edit | e: editor | Ctrl+S: save ",
        };
        block = block.title_bottom(Line::from(Span::styled(
            hint,
            Style::default().fg(palette::TEXT_MUTED),
        )));
    }
    block
}

/// Render one pane into its area, honoring the minimized tier.
pub fn render_pane(frame: &mut Frame, app: &App, pane: PaneId, area: Rect) {
    let minimized = app
        .tree
        .pane(pane)
        .is_some_and(|p| p.tier == HeightTier::Minimized);
    let area = if minimized {
        Rect {
            height: area.height.min(MINIMIZED_HEIGHT),
            ..area
        }
    } else {
        area
    };

    let block = pane_block(app, pane);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if minimized || inner.height == 0 {
        return;
    }

    match pane {
        PaneId::ModelSelection => render_model_selection(frame, app, inner),
        PaneId::Response => render_response(frame, app, inner),
        _ => render_editable(frame, app, pane, inner),
    }
}

fn render_editable(frame: &mut Frame, app: &App, pane: PaneId, area: Rect) {
    let Some(buffer) = app.buffer(pane) else {
        return;
    };
    let paragraph = Paragraph::new(buffer.content.as_str())
        .style(Style::default().fg(palette::TEXT_PRIMARY))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_model_selection(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    for provider in [Provider::OpenAi, Provider::Anthropic] {
        lines.push(Line::from(Span::styled(
            format!("{} Models", provider.label()),
            Style::default().fg(palette::DECK_SKY).bold(),
        )));
        for model in models_for_provider(provider) {
            let index = AVAILABLE_MODELS
                .iter()
                .position(|m| m.name == model.name)
                .unwrap_or(0);
            let cursor = if index == app.model_cursor { "> " } else { "  " };
            let selected = app.selected_model.as_deref() == Some(model.name);
            let marker = if selected { " *" } else { "" };
            let style = if index == app.model_cursor {
                Style::default()
                    .fg(palette::TEXT_PRIMARY)
                    .add_modifier(Modifier::BOLD)
            } else if selected {
                Style::default().fg(palette::DECK_SKY)
            } else {
                Style::default().fg(palette::TEXT_DIM)
            };
            lines.push(Line::from(Span::styled(
                format!("{cursor}{}{marker}", model.display_name),
                style,
            )));
        }
    }

    lines.push(Line::from(""));
    for info_line in AVAILABLE_MODELS[app.model_cursor].info_text().lines() {
        lines.push(Line::from(Span::styled(
            info_line.to_string(),
            Style::default().fg(palette::TEXT_MUTED),
        )));
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_response(frame: &mut Frame, app: &App, area: Rect) {
    let status_style = match app.request_state {
        RequestState::Failed(_) => Style::default().fg(palette::NOTICE_ERROR),
        RequestState::Cancelled => Style::default().fg(palette::NOTICE_WARNING),
        _ => Style::default().fg(palette::TEXT_MUTED),
    };
    let streaming = if app.streaming { "stream on" } else { "stream off" };

    let mut lines: Vec<Line> = vec![Line::from(vec![
        Span::styled(app.request_state.label().to_string(), status_style),
        Span::styled(
            format!("  [{streaming}]"),
            Style::default().fg(palette::TEXT_MUTED),
        ),
    ])];
    if let RequestState::Failed(message) = &app.request_state {
        lines.push(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(palette::NOTICE_ERROR),
        )));
    }
    lines.push(Line::from(""));
    for text_line in app.response.lines() {
        lines.push(Line::from(text_line.to_string()));
    }

    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(palette::TEXT_PRIMARY))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// One-line footer: focus, mode, model on the left; the latest notice on
/// the right.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mode = match app.mode {
        InputMode::Command => "CMD",
        InputMode::Edit => "EDIT",
    };
    let model = app.selected_model.as_deref().unwrap_or("no model");
    let left = format!(" [{}] {mode} | {model}", app.focused_pane().label());

    let (notice_text, notice_style) = match &app.notice {
        Some(notice) => (
            notice.text.as_str(),
            Style::default().fg(match notice.level {
                NoticeLevel::Info => palette::NOTICE_INFO,
                NoticeLevel::Warning => palette::NOTICE_WARNING,
                NoticeLevel::Error => palette::NOTICE_ERROR,
            }),
        ),
        None => ("", Style::default()),
    };

    let width = area.width as usize;
    let left_width = left.width();
    let notice_width = notice_text.width();
    let padding = width
        .saturating_sub(left_width)
        .saturating_sub(notice_width + 1);

    let line = Line::from(vec![
        Span::styled(left, Style::default().fg(palette::TEXT_DIM)),
        Span::raw(" ".repeat(padding)),
        Span::styled(notice_text.to_string(), notice_style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutAction, dispatch};

    #[test]
    fn suppressed_rows_are_not_visible() {
        let mut tree = PaneTree::new();
        dispatch(&mut tree, PaneId::Response, LayoutAction::ToggleMaximize);

        let rows = visible_rows(&tree);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, 2);
    }

    #[test]
    fn fully_hidden_rows_drop_out() {
        let mut tree = PaneTree::new();
        dispatch(&mut tree, PaneId::UserPrompt, LayoutAction::Hide);
        dispatch(&mut tree, PaneId::SystemPrompt, LayoutAction::Hide);

        let rows = visible_rows(&tree);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|(idx, _)| *idx != 0));
    }

    #[test]
    fn minimized_rows_collapse_to_fixed_height() {
        let mut tree = PaneTree::new();
        dispatch(&mut tree, PaneId::Response, LayoutAction::ToggleMinimize);

        let constraints = row_constraints(&tree);
        assert_eq!(constraints.len(), 3);
        assert_eq!(constraints[2], Constraint::Length(MINIMIZED_HEIGHT));
    }

    #[test]
    fn doubled_pane_raises_row_weight() {
        let mut tree = PaneTree::new();
        dispatch(&mut tree, PaneId::Context, LayoutAction::IncreaseHeight);

        let constraints = row_constraints(&tree);
        assert_eq!(constraints[1], Constraint::Fill(2));
        assert_eq!(constraints[0], Constraint::Fill(1));
    }

    #[test]
    fn pane_areas_skip_hidden_siblings() {
        let mut tree = PaneTree::new();
        dispatch(&mut tree, PaneId::SystemPrompt, LayoutAction::Hide);

        let area = Rect::new(0, 0, 80, 10);
        let areas = pane_areas(&tree, &tree.rows()[0], area);
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].0, PaneId::UserPrompt);
        assert_eq!(areas[0].1.width, 80);
    }
}
