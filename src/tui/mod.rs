//! Terminal UI module for promptdeck.

// === Submodules ===

pub mod app;
pub mod editor;
pub mod menu;
pub mod ui;
pub mod views;
pub mod widgets;

// === Re-exports ===

pub use app::TuiOptions;
pub use ui::run_tui;
