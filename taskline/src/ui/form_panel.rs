//! New-task form rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::theme;
use crate::app::{App, PanelFocus};

/// Render the new-task form: name, deadline and priority rows.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let form_focused = app.focus.form_field().is_some();

    let lines = vec![
        text_row(
            "Name",
            &app.form.name,
            format!("at least {} characters", app.min_name_len()),
            app.focus == PanelFocus::Name,
        ),
        text_row(
            "Deadline",
            &app.form.deadline,
            "YYYY-MM-DD HH:MM".to_string(),
            app.focus == PanelFocus::Deadline,
        ),
        priority_row(app),
    ];

    let block = Block::default()
        .title(Span::styled("New task", theme::panel_title(theme::FORM_TITLE)))
        .borders(Borders::ALL)
        .border_style(theme::border(form_focused));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn label(name: &str, focused: bool) -> Span<'static> {
    let style = if focused {
        theme::highlighted()
    } else {
        theme::dimmed()
    };
    Span::styled(format!("{name:<10}"), style)
}

fn text_row<'a>(name: &str, value: &'a str, placeholder: String, focused: bool) -> Line<'a> {
    let mut spans = vec![label(name, focused)];
    if value.is_empty() && !focused {
        spans.push(Span::styled(placeholder, theme::dimmed()));
    } else {
        spans.push(Span::styled(value, theme::normal()));
    }
    if focused {
        spans.push(Span::styled("\u{258f}", theme::input_cursor()));
    }
    Line::from(spans)
}

fn priority_row(app: &App) -> Line<'static> {
    let focused = app.focus == PanelFocus::Priority;
    let priority = app.form.priority;
    let mut spans = vec![label("Priority", focused)];
    if focused {
        spans.push(Span::styled("< ", theme::highlighted()));
    }
    spans.push(Span::styled(priority.to_string(), theme::priority(priority)));
    if focused {
        spans.push(Span::styled(" >", theme::highlighted()));
    }
    Line::from(spans)
}
