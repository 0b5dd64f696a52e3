//! Application state and event handling.
//!
//! `App` owns the [`TaskStore`] and is the only caller of its mutating
//! operations. The advisory layer sees nothing but the prompt built from
//! `active_tasks()`.

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use taskline_core::{Task, TaskId, TaskStore};

use crate::advisory::{AdvisoryEvent, AdvisoryPanel, AdvisoryRequest, build_prompt};
use crate::form::{DEFAULT_MIN_NAME_LEN, FormField, TaskForm};

/// Which panel (or form field) is currently focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    /// Task name input (default).
    Name,
    /// Deadline input.
    Deadline,
    /// Priority selector.
    Priority,
    /// Task list.
    Tasks,
}

impl PanelFocus {
    /// The form field behind this focus, if any.
    #[must_use]
    pub const fn form_field(self) -> Option<FormField> {
        match self {
            Self::Name => Some(FormField::Name),
            Self::Deadline => Some(FormField::Deadline),
            Self::Priority => Some(FormField::Priority),
            Self::Tasks => None,
        }
    }
}

/// Work the main loop must dispatch outside the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Send an advisory request.
    RequestAdvice(AdvisoryRequest),
}

/// Main application state.
pub struct App {
    store: TaskStore,
    /// New-task form input.
    pub form: TaskForm,
    /// Which panel is focused.
    pub focus: PanelFocus,
    /// Selected index into the canonical task order.
    pub selected: usize,
    /// Advisory display state.
    pub advisory: AdvisoryPanel,
    /// Last status or validation message.
    pub status_message: Option<String>,
    /// Whether the app should quit.
    pub should_quit: bool,
    min_name_len: usize,
    deadline_format: String,
}

impl App {
    /// Create an application with an empty task list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: TaskStore::new(),
            form: TaskForm::new(),
            focus: PanelFocus::Name,
            selected: 0,
            advisory: AdvisoryPanel::new(),
            status_message: None,
            should_quit: false,
            min_name_len: DEFAULT_MIN_NAME_LEN,
            deadline_format: "%Y-%m-%d %H:%M".to_string(),
        }
    }

    /// Set the minimum task name length enforced by the form.
    ///
    /// Values below [`DEFAULT_MIN_NAME_LEN`] are raised to it.
    #[must_use]
    pub fn with_min_name_len(mut self, min: usize) -> Self {
        self.min_name_len = min.max(DEFAULT_MIN_NAME_LEN);
        self
    }

    /// Set the chrono format used to display deadlines.
    #[must_use]
    pub fn with_deadline_format(mut self, format: impl Into<String>) -> Self {
        self.deadline_format = format.into();
        self
    }

    /// Read-only access to the task store.
    #[must_use]
    pub const fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Minimum task name length enforced by the form.
    #[must_use]
    pub const fn min_name_len(&self) -> usize {
        self.min_name_len
    }

    /// Deadline display format.
    #[must_use]
    pub fn deadline_format(&self) -> &str {
        &self.deadline_format
    }

    /// The task under the selection cursor.
    #[must_use]
    pub fn selected_task(&self) -> Option<&Task> {
        self.store.tasks().get(self.selected)
    }

    /// Handle a key event.
    ///
    /// Returns an [`AppCommand`] when the action needs work outside the app.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<AppCommand> {
        // Global shortcuts
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Esc, _) => {
                self.should_quit = true;
                return None;
            }
            (KeyCode::Char('g'), KeyModifiers::CONTROL) => {
                return self.request_advice().map(AppCommand::RequestAdvice);
            }
            (KeyCode::BackTab, _) | (KeyCode::Tab, KeyModifiers::SHIFT) => {
                self.cycle_focus_backward();
                return None;
            }
            (KeyCode::Tab, _) => {
                self.cycle_focus_forward();
                return None;
            }
            _ => {}
        }

        match self.focus {
            PanelFocus::Name | PanelFocus::Deadline => {
                self.handle_text_key(key);
                None
            }
            PanelFocus::Priority => {
                self.handle_priority_key(key);
                None
            }
            PanelFocus::Tasks => self.handle_tasks_key(key),
        }
    }

    /// Handle key event when a text field is focused.
    fn handle_text_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit_form(),
            KeyCode::Char(c) => {
                if let Some(buf) = self.focus.form_field().and_then(|f| self.form.text_mut(f)) {
                    buf.push(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(buf) = self.focus.form_field().and_then(|f| self.form.text_mut(f)) {
                    buf.pop();
                }
            }
            _ => {}
        }
    }

    /// Handle key event when the priority selector is focused.
    fn handle_priority_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit_form(),
            KeyCode::Left
            | KeyCode::Right
            | KeyCode::Char(' ' | 'h' | 'l')
            | KeyCode::Up
            | KeyCode::Down => {
                self.form.priority = self.form.priority.toggled();
            }
            _ => {}
        }
    }

    /// Handle key event when the task list is focused.
    fn handle_tasks_key(&mut self, key: KeyEvent) -> Option<AppCommand> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_selected(),
            KeyCode::Delete | KeyCode::Char('d') => self.delete_selected(),
            KeyCode::Char('a') => return self.request_advice().map(AppCommand::RequestAdvice),
            _ => {}
        }
        None
    }

    /// Cycle focus forward: Name -> Deadline -> Priority -> Tasks -> Name.
    const fn cycle_focus_forward(&mut self) {
        self.focus = match self.focus {
            PanelFocus::Name => PanelFocus::Deadline,
            PanelFocus::Deadline => PanelFocus::Priority,
            PanelFocus::Priority => PanelFocus::Tasks,
            PanelFocus::Tasks => PanelFocus::Name,
        };
    }

    /// Cycle focus backward: Name -> Tasks -> Priority -> Deadline -> Name.
    const fn cycle_focus_backward(&mut self) {
        self.focus = match self.focus {
            PanelFocus::Name => PanelFocus::Tasks,
            PanelFocus::Tasks => PanelFocus::Priority,
            PanelFocus::Priority => PanelFocus::Deadline,
            PanelFocus::Deadline => PanelFocus::Name,
        };
    }

    /// Validate the form and, if valid, create the task.
    ///
    /// On failure every field error is shown and the store is untouched.
    pub fn submit_form(&mut self) {
        match self.form.submit(self.min_name_len) {
            Ok(valid) => {
                let task = self.store.create(valid.name, valid.end_time, valid.priority);
                tracing::info!(task_id = %task.id, "task added");
                self.select_task(&task.id);
                self.status_message = Some(format!("Added \"{}\"", task.name));
                self.focus = PanelFocus::Name;
            }
            Err(errors) => {
                tracing::debug!(%errors, "form rejected");
                self.status_message = Some(errors.to_string());
            }
        }
    }

    /// Toggle completion of the selected task.
    pub fn toggle_selected(&mut self) {
        let Some(id) = self.selected_task().map(|t| t.id.clone()) else {
            return;
        };
        self.toggle_task(&id);
    }

    /// Toggle completion of the task with `id`, keeping it selected.
    pub fn toggle_task(&mut self, id: &TaskId) {
        if self.store.toggle_complete(id) {
            self.select_task(id);
            if let Some(task) = self.store.get(id) {
                let state = if task.is_completed { "Completed" } else { "Reopened" };
                self.status_message = Some(format!("{state} \"{}\"", task.name));
            }
        }
    }

    /// Delete the selected task.
    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_task().map(|t| t.id.clone()) else {
            return;
        };
        self.delete_task(&id);
    }

    /// Delete the task with `id`.
    pub fn delete_task(&mut self, id: &TaskId) {
        let name = self.store.get(id).map(|t| t.name.clone());
        if self.store.delete(id) {
            self.clamp_selection();
            if let Some(name) = name {
                self.status_message = Some(format!("Deleted \"{name}\""));
            }
        }
    }

    /// Start an advisory request from the current active tasks.
    ///
    /// Returns `None` (and sets a status message) when there is nothing to
    /// advise on.
    pub fn request_advice(&mut self) -> Option<AdvisoryRequest> {
        let active = self.store.active_tasks();
        if active.is_empty() {
            self.status_message = Some("No active tasks to advise on".to_string());
            return None;
        }
        let generation = self.advisory.begin_request();
        self.status_message = Some("Requesting advice...".to_string());
        Some(AdvisoryRequest {
            generation,
            prompt: build_prompt(&active, Utc::now()),
        })
    }

    /// Apply a finished advisory request. Never touches the task list.
    pub fn apply_advisory_event(&mut self, event: AdvisoryEvent) {
        self.status_message = Some(match &event {
            AdvisoryEvent::Completed { .. } => "Advice updated".to_string(),
            AdvisoryEvent::Failed { message, .. } => format!("Advice failed: {message}"),
        });
        self.advisory.apply(event);
    }

    /// Move the selection onto the task with `id`, if present.
    fn select_task(&mut self, id: &TaskId) {
        if let Some(idx) = self.store.tasks().iter().position(|t| &t.id == id) {
            self.selected = idx;
        }
    }

    /// Keep the selection inside the task list.
    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.store.len().saturating_sub(1));
    }

    /// Select the previous task.
    const fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    /// Select the next task.
    fn select_next(&mut self) {
        if self.selected < self.store.len().saturating_sub(1) {
            self.selected += 1;
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
