//! Theme and styling constants for the TUI.

use ratatui::style::{Color, Modifier, Style};
use taskline_core::Priority;

/// Primary foreground color.
pub const FG_PRIMARY: Color = Color::White;

/// Secondary foreground color (dimmed text).
pub const FG_SECONDARY: Color = Color::Gray;

/// Highlight color for focused elements.
pub const HIGHLIGHT: Color = Color::Cyan;

/// Success indicator color.
pub const SUCCESS: Color = Color::Green;

/// Warning / loading indicator color.
pub const WARNING: Color = Color::Yellow;

/// Error color.
pub const ERROR: Color = Color::Red;

/// Color for `High` priority badges.
pub const PRIORITY_HIGH: Color = Color::LightRed;

/// Color for `Low` priority badges.
pub const PRIORITY_LOW: Color = Color::LightBlue;

/// Panel title color for the form panel.
pub const FORM_TITLE: Color = Color::Blue;

/// Panel title color for the task panels.
pub const TASKS_TITLE: Color = Color::Green;

/// Panel title color for the advisory panel.
pub const ADVISORY_TITLE: Color = Color::LightMagenta;

/// Normal text style.
#[must_use]
pub fn normal() -> Style {
    Style::default().fg(FG_PRIMARY)
}

/// Dimmed text style (completed tasks, metadata).
#[must_use]
pub fn dimmed() -> Style {
    Style::default().fg(FG_SECONDARY)
}

/// Bold text style.
#[must_use]
pub fn bold() -> Style {
    Style::default().fg(FG_PRIMARY).add_modifier(Modifier::BOLD)
}

/// Highlighted text style (focused panel borders).
#[must_use]
pub fn highlighted() -> Style {
    Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

/// Selected item style (in lists).
#[must_use]
pub fn selected() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Style for a priority badge.
#[must_use]
pub fn priority(priority: Priority) -> Style {
    let color = match priority {
        Priority::High => PRIORITY_HIGH,
        Priority::Low => PRIORITY_LOW,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Style for deadlines that have already passed.
#[must_use]
pub fn overdue() -> Style {
    Style::default().fg(ERROR).add_modifier(Modifier::BOLD)
}

/// Style for completed task names (dim, struck through).
#[must_use]
pub fn completed() -> Style {
    dimmed().add_modifier(Modifier::CROSSED_OUT)
}

/// Style for the input cursor (bright white, bold).
#[must_use]
pub fn input_cursor() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

/// Style for the status bar background (dark background with white foreground).
#[must_use]
pub fn status_bar_bg() -> Style {
    Style::default().fg(Color::White).bg(Color::Rgb(30, 30, 50))
}

/// Style for panel titles with a given color (bold).
#[must_use]
pub fn panel_title(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Border style for a panel, highlighted when focused.
#[must_use]
pub fn border(focused: bool) -> Style {
    if focused { highlighted() } else { normal() }
}
