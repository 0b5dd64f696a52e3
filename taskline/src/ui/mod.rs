//! Terminal UI rendering.

pub mod advisory_panel;
pub mod form_panel;
pub mod status_bar;
pub mod task_panel;
pub mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::app::App;

/// Main draw function for the entire UI.
pub fn draw(frame: &mut Frame, app: &App) {
    // Form on top, content in the middle, status bar at bottom
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let form_area = main_chunks[0];
    let content_area = main_chunks[1];
    let status_area = main_chunks[2];

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(60), // Tasks
            Constraint::Percentage(40), // Advice
        ])
        .split(content_area);

    form_panel::render(frame, form_area, app);
    task_panel::render(frame, content_chunks[0], app);
    advisory_panel::render(frame, content_chunks[1], app);
    status_bar::render(frame, status_area, app);
}
