//! Task list rendering: active tasks above, completed tasks below.

use std::fmt::Write as _;

use chrono::{Local, Utc};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    style::Style,
    widgets::{Block, Borders, List, ListItem, ListState},
};
use taskline_core::Task;

use super::theme;
use crate::app::{App, PanelFocus};

/// Render the active and completed task lists.
///
/// Both lists are stateful so the selected task is always scrolled into
/// view, however long the list grows.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus == PanelFocus::Tasks;
    let active = app.store().active_tasks();
    let completed = app.store().completed_tasks();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let (active_selected, completed_selected) =
        split_selection(app.selected, active.len(), completed.len());
    let highlight = if is_focused {
        theme::selected()
    } else {
        Style::default()
    };

    let active_items: Vec<ListItem> = active.iter().map(|task| task_item(task, app)).collect();
    let completed_items: Vec<ListItem> =
        completed.iter().map(|task| task_item(task, app)).collect();

    let active_block = Block::default()
        .title(Span::styled(
            format!("Active ({})", active.len()),
            theme::panel_title(theme::TASKS_TITLE),
        ))
        .borders(Borders::ALL)
        .border_style(theme::border(is_focused));
    let completed_block = Block::default()
        .title(Span::styled(
            format!("Completed ({})", completed.len()),
            theme::panel_title(theme::TASKS_TITLE),
        ))
        .borders(Borders::ALL)
        .border_style(theme::border(is_focused));

    let mut active_state = ListState::default().with_selected(active_selected);
    let mut completed_state = ListState::default().with_selected(completed_selected);

    frame.render_stateful_widget(
        List::new(active_items)
            .block(active_block)
            .highlight_style(highlight),
        chunks[0],
        &mut active_state,
    );
    frame.render_stateful_widget(
        List::new(completed_items)
            .block(completed_block)
            .highlight_style(highlight),
        chunks[1],
        &mut completed_state,
    );
}

/// Maps an index into the canonical order onto the two list widgets.
///
/// The canonical order lists every active task before any completed one,
/// so indices past the active count fall into the completed list.
fn split_selection(
    selected: usize,
    active_len: usize,
    completed_len: usize,
) -> (Option<usize>, Option<usize>) {
    if selected < active_len {
        (Some(selected), None)
    } else if selected - active_len < completed_len {
        (None, Some(selected - active_len))
    } else {
        (None, None)
    }
}

fn task_item<'a>(task: &'a Task, app: &App) -> ListItem<'a> {
    let checkbox = if task.is_completed { "[\u{2713}]" } else { "[ ]" };
    let local = task.end_time.with_timezone(&Local);
    let mut deadline = String::new();
    // A bad user-supplied format string surfaces as a fmt error.
    if write!(deadline, "{}", local.format(app.deadline_format())).is_err() {
        deadline = local.to_rfc3339();
    }

    let (name_style, deadline_style) = if task.is_completed {
        (theme::completed(), theme::dimmed())
    } else if task.end_time < Utc::now() {
        (theme::normal(), theme::overdue())
    } else {
        (theme::normal(), theme::dimmed())
    };

    let line = Line::from(vec![
        Span::styled(checkbox, name_style),
        Span::raw(" "),
        Span::styled(format!("{:<4}", task.priority), theme::priority(task.priority)),
        Span::raw(" "),
        Span::styled(task.name.as_str(), name_style),
        Span::raw("  "),
        Span::styled(deadline, deadline_style),
    ]);

    ListItem::new(line)
}
