//! UI rendering module for widgetdash
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod dashboard;
pub mod help_overlay;
pub mod ticker;

pub use dashboard::render as render_dashboard;
pub use help_overlay::render as render_help_overlay;

use ratatui::Frame;

use crate::app::App;

/// Renders one frame for the current application state
pub fn render(frame: &mut Frame, app: &App) {
    render_dashboard(frame, app);
    if app.show_help {
        render_help_overlay(frame, &app.theme.palette());
    }
}
