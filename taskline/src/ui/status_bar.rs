//! Status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::{App, PanelFocus};

/// Render the status bar at the bottom of the screen.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let help_text = match app.focus {
        PanelFocus::Name | PanelFocus::Deadline => {
            "Enter: add task | Tab: next field | ^G: advice | Esc: quit"
        }
        PanelFocus::Priority => "\u{2190}\u{2192}: change | Enter: add task | Tab: next | Esc: quit",
        PanelFocus::Tasks => {
            "\u{2191}\u{2193}/jk: navigate | Space: toggle | d: delete | a: advice | Esc: quit"
        }
    };

    let (dot_color, summary) = if app.advisory.is_loading() {
        (theme::WARNING, "advice pending".to_string())
    } else {
        (
            theme::SUCCESS,
            format!(
                "{} active, {} done",
                app.store().active_tasks().len(),
                app.store().completed_tasks().len()
            ),
        )
    };

    let mut spans = vec![
        Span::styled(concat!("Taskline v", env!("CARGO_PKG_VERSION")), theme::bold()),
        Span::raw(" | "),
        Span::styled("\u{25cf}", theme::normal().fg(dot_color)),
        Span::raw(format!(" {summary}")),
        Span::raw(" | "),
    ];
    if let Some(message) = &app.status_message {
        spans.push(Span::styled(message.as_str(), theme::normal()));
        spans.push(Span::raw(" | "));
    }
    spans.push(Span::styled(help_text, theme::dimmed()));

    let paragraph = Paragraph::new(Line::from(spans)).style(theme::status_bar_bg());
    frame.render_widget(paragraph, area);
}
