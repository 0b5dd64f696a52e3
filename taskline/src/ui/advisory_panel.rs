//! Advisory text rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::theme;
use crate::app::App;

/// Render the advisory panel: loading indicator, last error, last advice.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let panel = &app.advisory;
    let mut lines: Vec<Line> = Vec::new();

    if panel.is_loading() {
        lines.push(Line::from(Span::styled(
            "Thinking\u{2026}",
            theme::normal().fg(theme::WARNING),
        )));
    }
    if let Some(error) = panel.error() {
        lines.push(Line::from(Span::styled(
            error,
            theme::normal().fg(theme::ERROR),
        )));
    }
    match panel.text() {
        Some(text) => lines.extend(text.lines().map(|l| Line::from(Span::raw(l)))),
        None if !panel.is_loading() => lines.push(Line::from(Span::styled(
            "Press Ctrl-G for advice on your active tasks.",
            theme::dimmed(),
        ))),
        None => {}
    }

    let block = Block::default()
        .title(Span::styled(
            "Advice",
            theme::panel_title(theme::ADVISORY_TITLE),
        ))
        .borders(Borders::ALL)
        .border_style(theme::normal());

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
