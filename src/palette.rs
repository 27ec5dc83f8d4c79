//! Color palette and semantic roles for the TUI.

use ratatui::style::Color;

pub const DECK_BLUE_RGB: (u8, u8, u8) = (72, 118, 214);
pub const DECK_SKY_RGB: (u8, u8, u8) = (120, 170, 238);
pub const DECK_AMBER_RGB: (u8, u8, u8) = (226, 176, 70);
pub const DECK_RED_RGB: (u8, u8, u8) = (222, 84, 98);

pub const DECK_BLUE: Color = Color::Rgb(DECK_BLUE_RGB.0, DECK_BLUE_RGB.1, DECK_BLUE_RGB.2);
pub const DECK_SKY: Color = Color::Rgb(DECK_SKY_RGB.0, DECK_SKY_RGB.1, DECK_SKY_RGB.2);
pub const DECK_AMBER: Color = Color::Rgb(DECK_AMBER_RGB.0, DECK_AMBER_RGB.1, DECK_AMBER_RGB.2);
pub const DECK_RED: Color = Color::Rgb(DECK_RED_RGB.0, DECK_RED_RGB.1, DECK_RED_RGB.2);

pub const TEXT_PRIMARY: Color = Color::White;
pub const TEXT_MUTED: Color = Color::DarkGray;
pub const TEXT_DIM: Color = Color::Gray;

pub const BORDER_IDLE: Color = TEXT_MUTED;
pub const BORDER_FOCUSED: Color = DECK_SKY;

// Pane status accents used in the menu and status bar
pub const STATUS_VISIBLE: Color = TEXT_PRIMARY;
pub const STATUS_HIDDEN: Color = TEXT_MUTED;
pub const STATUS_MINIMIZED: Color = DECK_AMBER;
pub const STATUS_MAXIMIZED: Color = DECK_SKY;

// Notice levels in the footer
pub const NOTICE_INFO: Color = DECK_BLUE;
pub const NOTICE_WARNING: Color = DECK_AMBER;
pub const NOTICE_ERROR: Color = DECK_RED;
