//! Integration tests for advisory requests: the store stays usable while a
//! request is outstanding, results apply in arrival order, and the loading
//! flag always clears.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use taskline::advisory::{
    AdvisoryError, AdvisoryEvent, AdvisoryGenerator, AdvisoryRequest, AdvisoryService,
};
use taskline::app::{App, AppCommand};
use taskline::form::TaskForm;
use taskline_core::Priority;
use tokio::sync::{Notify, mpsc};

// ---------------------------------------------------------------------------
// Fake generators
// ---------------------------------------------------------------------------

/// Answers with the number of task lines in the prompt. Prompts that do not
/// mention `fast_marker` are held until `release` is notified.
struct Gated {
    fast_marker: &'static str,
    release: Arc<Notify>,
}

impl AdvisoryGenerator for Gated {
    async fn generate(&self, prompt: &str) -> Result<String, AdvisoryError> {
        if !prompt.contains(self.fast_marker) {
            self.release.notified().await;
        }
        let count = prompt
            .lines()
            .filter(|l| l.starts_with(|c: char| c.is_ascii_digit()))
            .count();
        Ok(format!("saw {count} task(s)"))
    }
}

/// Returns the prompt unchanged.
struct Echo;

impl AdvisoryGenerator for Echo {
    async fn generate(&self, prompt: &str) -> Result<String, AdvisoryError> {
        Ok(prompt.to_string())
    }
}

/// Always fails.
struct Down;

impl AdvisoryGenerator for Down {
    async fn generate(&self, _prompt: &str) -> Result<String, AdvisoryError> {
        Err(AdvisoryError::Status {
            status: 503,
            body: "overloaded".to_string(),
        })
    }
}

/// Succeeds with nothing to say.
struct Silent;

impl AdvisoryGenerator for Silent {
    async fn generate(&self, _prompt: &str) -> Result<String, AdvisoryError> {
        Ok("\n  \n".to_string())
    }
}

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

fn add(app: &mut App, name: &str, deadline: &str, priority: Priority) {
    app.form = TaskForm {
        name: name.to_string(),
        deadline: deadline.to_string(),
        priority,
    };
    app.submit_form();
}

fn request(app: &mut App) -> AdvisoryRequest {
    app.request_advice().expect("app has active tasks")
}

async fn next_event(rx: &mut mpsc::Receiver<AdvisoryEvent>) -> AdvisoryEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("advisory event within timeout")
        .expect("advisory channel open")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn store_is_usable_while_request_is_outstanding() {
    let release = Arc::new(Notify::new());
    let (service, mut rx) = AdvisoryService::new(
        Gated {
            fast_marker: "never present",
            release: Arc::clone(&release),
        },
        4,
    );

    let mut app = App::new();
    add(&mut app, "Alpha", "2030-01-10 09:00", Priority::High);
    add(&mut app, "Bravo", "2030-01-12 09:00", Priority::Low);

    let handle = service.request(request(&mut app));
    assert!(app.advisory.is_loading());

    // Mutations go through while the request is held.
    add(&mut app, "Charlie", "2030-01-11 09:00", Priority::High);
    let bravo = app.store().tasks()[2].id.clone();
    app.toggle_task(&bravo);
    let alpha = app.store().tasks()[0].id.clone();
    app.delete_task(&alpha);
    assert!(rx.try_recv().is_err());

    let before = app.store().tasks().to_vec();
    release.notify_one();
    app.apply_advisory_event(next_event(&mut rx).await);
    handle.await.unwrap();

    // The request saw the two tasks active when it was issued.
    assert_eq!(app.advisory.text(), Some("saw 2 task(s)"));
    assert!(!app.advisory.is_loading());
    assert_eq!(app.store().tasks(), before.as_slice());
}

#[tokio::test]
async fn slower_older_response_overwrites_newer_one() {
    let release = Arc::new(Notify::new());
    let (service, mut rx) = AdvisoryService::new(
        Gated {
            fast_marker: "Second",
            release: Arc::clone(&release),
        },
        4,
    );

    let mut app = App::new();
    add(&mut app, "First", "2030-01-10 09:00", Priority::High);
    let older = request(&mut app);

    add(&mut app, "Second", "2030-01-11 09:00", Priority::High);
    let newer = request(&mut app);
    assert!(newer.generation > older.generation);

    service.request(older.clone());
    service.request(newer.clone());

    let first_arrival = next_event(&mut rx).await;
    assert_eq!(first_arrival.generation(), newer.generation);
    app.apply_advisory_event(first_arrival);
    assert_eq!(app.advisory.text(), Some("saw 2 task(s)"));
    assert!(app.advisory.is_loading());

    release.notify_one();
    let second_arrival = next_event(&mut rx).await;
    assert_eq!(second_arrival.generation(), older.generation);
    app.apply_advisory_event(second_arrival);

    assert_eq!(app.advisory.text(), Some("saw 1 task(s)"));
    assert_eq!(app.advisory.shown_generation(), Some(older.generation));
    assert!(!app.advisory.is_loading());
}

#[tokio::test]
async fn prompt_lists_only_active_tasks_in_order() {
    let (service, mut rx) = AdvisoryService::new(Echo, 4);

    let mut app = App::new();
    add(&mut app, "Low task", "2030-01-01 09:00", Priority::Low);
    add(&mut app, "Done task", "2030-01-01 09:00", Priority::High);
    add(&mut app, "High task", "2030-01-05 09:00", Priority::High);
    let done = app
        .store()
        .tasks()
        .iter()
        .find(|t| t.name == "Done task")
        .unwrap()
        .id
        .clone();
    app.toggle_task(&done);

    service.request(request(&mut app));
    app.apply_advisory_event(next_event(&mut rx).await);

    let text = app.advisory.text().unwrap();
    assert!(!text.contains("Done task"));
    let high = text.find("High task").unwrap();
    let low = text.find("Low task").unwrap();
    assert!(high < low);
}

#[tokio::test]
async fn failure_clears_loading_and_keeps_previous_advice() {
    let mut app = App::new();
    add(&mut app, "Alpha", "2030-01-10 09:00", Priority::High);

    let (echo, mut echo_rx) = AdvisoryService::new(Echo, 4);
    echo.request(request(&mut app));
    app.apply_advisory_event(next_event(&mut echo_rx).await);
    let previous = app.advisory.text().unwrap().to_string();

    let (down, mut down_rx) = AdvisoryService::new(Down, 4);
    down.request(request(&mut app));
    assert!(app.advisory.is_loading());
    app.apply_advisory_event(next_event(&mut down_rx).await);

    assert!(!app.advisory.is_loading());
    assert!(app.advisory.error().unwrap().contains("503"));
    assert_eq!(app.advisory.text(), Some(previous.as_str()));
    assert!(app.status_message.clone().unwrap().starts_with("Advice failed"));
}

#[tokio::test]
async fn blank_response_is_reported_as_failure() {
    let (service, mut rx) = AdvisoryService::new(Silent, 4);
    let mut app = App::new();
    add(&mut app, "Alpha", "2030-01-10 09:00", Priority::High);

    service.request(request(&mut app));
    let event = next_event(&mut rx).await;
    assert!(matches!(event, AdvisoryEvent::Failed { .. }));
    app.apply_advisory_event(event);

    assert!(!app.advisory.is_loading());
    assert!(app.advisory.text().is_none());
    assert!(app.advisory.error().is_some());
}

#[test]
fn unconfigured_advice_fails_immediately() {
    let mut app = App::new();
    add(&mut app, "Alpha", "2030-01-10 09:00", Priority::High);

    let key = crossterm::event::KeyEvent::new(
        crossterm::event::KeyCode::Char('g'),
        crossterm::event::KeyModifiers::CONTROL,
    );
    let Some(AppCommand::RequestAdvice(req)) = app.handle_key_event(key) else {
        panic!("expected an advice request");
    };
    assert!(app.advisory.is_loading());

    app.apply_advisory_event(AdvisoryEvent::failed(
        req.generation,
        &AdvisoryError::NotConfigured,
    ));
    assert!(!app.advisory.is_loading());
    assert!(app.advisory.error().unwrap().contains("not configured"));
}

#[test]
fn no_request_without_active_tasks() {
    let mut app = App::new();
    assert!(app.request_advice().is_none());
    assert!(!app.advisory.is_loading());

    add(&mut app, "Alpha", "2030-01-10 09:00", Priority::High);
    let id = app.store().tasks()[0].id.clone();
    app.toggle_task(&id);
    assert!(app.request_advice().is_none());
    assert!(!app.advisory.is_loading());
}
