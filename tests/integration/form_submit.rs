//! Integration tests for task creation: keyboard input into the form,
//! validation, and the hand-off to the store.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use chrono::{DateTime, Local, TimeZone, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use taskline::app::{App, PanelFocus};
use taskline::config::{CliArgs, ClientConfig};
use taskline::form::{FormError, FormErrors, TaskForm};
use taskline_core::Priority;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn type_str(app: &mut App, s: &str) {
    for c in s.chars() {
        app.handle_key_event(key(KeyCode::Char(c)));
    }
}

fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Local
        .with_ymd_and_hms(y, m, d, h, min, 0)
        .earliest()
        .unwrap()
        .with_timezone(&Utc)
}

#[test]
fn typed_task_is_created_with_low_priority() {
    let mut app = App::new();

    type_str(&mut app, "Write report");
    app.handle_key_event(key(KeyCode::Tab));
    type_str(&mut app, "2030-06-15 17:30");
    app.handle_key_event(key(KeyCode::Tab));
    assert_eq!(app.focus, PanelFocus::Priority);
    app.handle_key_event(key(KeyCode::Right));
    app.handle_key_event(key(KeyCode::Enter));

    assert_eq!(app.store().len(), 1);
    let task = &app.store().tasks()[0];
    assert_eq!(task.name, "Write report");
    assert_eq!(task.priority, Priority::Low);
    assert_eq!(task.end_time, local(2030, 6, 15, 17, 30));
    assert!(task.is_active());

    // The form resets and focus returns to the name field.
    assert_eq!(app.form, TaskForm::new());
    assert_eq!(app.focus, PanelFocus::Name);
}

#[test]
fn backspace_edits_the_focused_field() {
    let mut app = App::new();
    type_str(&mut app, "Taxesx");
    app.handle_key_event(key(KeyCode::Backspace));
    assert_eq!(app.form.name, "Taxes");
    assert!(app.form.deadline.is_empty());
}

#[test]
fn invalid_form_leaves_store_untouched_and_reports_every_error() {
    let mut app = App::new();
    type_str(&mut app, "ab");
    app.handle_key_event(key(KeyCode::Tab));
    type_str(&mut app, "tomorrow");
    app.handle_key_event(key(KeyCode::Enter));

    assert!(app.store().is_empty());
    let status = app.status_message.clone().unwrap();
    assert!(status.contains("at least 3"));
    assert!(status.contains("tomorrow"));

    // Input is kept so the user can fix it.
    assert_eq!(app.form.name, "ab");
    assert_eq!(app.form.deadline, "tomorrow");
}

#[test]
fn missing_deadline_is_rejected() {
    let mut app = App::new();
    type_str(&mut app, "Dentist");
    app.handle_key_event(key(KeyCode::Enter));

    assert!(app.store().is_empty());
    assert_eq!(
        app.form.validate(3),
        Err(FormErrors(vec![FormError::DeadlineMissing]))
    );
}

#[test]
fn whitespace_padding_does_not_count_toward_name_length() {
    let form = TaskForm {
        name: "  ab  ".to_string(),
        deadline: "2030-01-01".to_string(),
        priority: Priority::High,
    };
    assert_eq!(
        form.validate(3),
        Err(FormErrors(vec![FormError::NameTooShort { min: 3 }]))
    );
}

#[test]
fn configured_minimum_name_length_is_enforced() {
    let mut app = App::new().with_min_name_len(6);
    app.form = TaskForm {
        name: "Taxes".to_string(),
        deadline: "2030-04-15".to_string(),
        priority: Priority::High,
    };
    app.submit_form();
    assert!(app.store().is_empty());

    app.form.name = "Taxes!".to_string();
    app.submit_form();
    assert_eq!(app.store().len(), 1);
    assert_eq!(app.store().tasks()[0].end_time, local(2030, 4, 15, 23, 59));
}

#[test]
fn config_file_cannot_lower_the_name_minimum() {
    let path = std::env::temp_dir().join(format!(
        "taskline-min-name-{}.toml",
        std::process::id()
    ));
    std::fs::write(&path, "[form]\nmin_name_len = 0\n").unwrap();
    let cli = CliArgs {
        config: Some(path.clone()),
        ..CliArgs::default()
    };
    let config = ClientConfig::load(&cli).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(config.min_name_len, 3);

    let mut app = App::new().with_min_name_len(config.min_name_len);
    for name in ["   ", "x"] {
        app.form = TaskForm {
            name: name.to_string(),
            deadline: "2030-01-01".to_string(),
            priority: Priority::High,
        };
        app.submit_form();
    }
    assert!(app.store().is_empty());
}

#[test]
fn offset_deadline_is_kept_exact() {
    let mut app = App::new();
    app.form = TaskForm {
        name: "Call abroad".to_string(),
        deadline: "2030-02-01T08:00:00+02:00".to_string(),
        priority: Priority::High,
    };
    app.submit_form();

    let task = &app.store().tasks()[0];
    assert_eq!(
        task.end_time,
        Utc.with_ymd_and_hms(2030, 2, 1, 6, 0, 0).unwrap()
    );
}

#[test]
fn new_task_is_selected_at_its_sorted_position() {
    let mut app = App::new();
    for (name, deadline) in [("Later", "2030-05-02 09:00"), ("Sooner", "2030-05-01 09:00")] {
        app.form = TaskForm {
            name: name.to_string(),
            deadline: deadline.to_string(),
            priority: Priority::High,
        };
        app.submit_form();
    }
    assert_eq!(app.selected, 0);
    assert_eq!(app.selected_task().unwrap().name, "Sooner");
}
