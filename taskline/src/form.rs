//! New-task form and its field validation.
//!
//! The store trusts its inputs, so this is the only place a name, deadline
//! or priority is checked. A form either yields a [`ValidTask`] or reports
//! every failing field at once.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use taskline_core::Priority;

/// Minimum task name length (in characters, after trimming).
pub const DEFAULT_MIN_NAME_LEN: usize = 3;

/// Naive deadline formats accepted by the form, tried in order.
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

/// A single field validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// Name is shorter than the minimum after trimming.
    #[error("task name must be at least {min} characters")]
    NameTooShort {
        /// Required minimum length.
        min: usize,
    },
    /// No deadline was entered.
    #[error("deadline is required")]
    DeadlineMissing,
    /// The deadline could not be parsed.
    #[error("invalid deadline {0:?} (use YYYY-MM-DD HH:MM)")]
    DeadlineInvalid(String),
}

/// All field errors produced by one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", join_errors(.0))]
pub struct FormErrors(pub Vec<FormError>);

fn join_errors(errors: &[FormError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Which form field has input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    /// Task name text field.
    Name,
    /// Deadline text field.
    Deadline,
    /// Priority selector.
    Priority,
}

/// A validated task-creation record, ready for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTask {
    /// Trimmed task name.
    pub name: String,
    /// Parsed deadline.
    pub end_time: DateTime<Utc>,
    /// Selected priority.
    pub priority: Priority,
}

/// Raw form input as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    /// Task name text.
    pub name: String,
    /// Deadline text.
    pub deadline: String,
    /// Selected priority (defaults to `High`).
    pub priority: Priority,
}

impl TaskForm {
    /// Creates an empty form with `High` priority selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the text buffer backing `field`, if it is a text field.
    pub fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Name => Some(&mut self.name),
            FormField::Deadline => Some(&mut self.deadline),
            FormField::Priority => None,
        }
    }

    /// Validates every field.
    ///
    /// `min_name_len` below [`DEFAULT_MIN_NAME_LEN`] is raised to it, so a
    /// blank name never validates.
    ///
    /// # Errors
    ///
    /// Returns [`FormErrors`] listing each field that failed.
    pub fn validate(&self, min_name_len: usize) -> Result<ValidTask, FormErrors> {
        let mut errors = Vec::new();
        let min_name_len = min_name_len.max(DEFAULT_MIN_NAME_LEN);

        let name = self.name.trim();
        if name.chars().count() < min_name_len {
            errors.push(FormError::NameTooShort { min: min_name_len });
        }

        let end_time = match parse_deadline(&self.deadline) {
            Ok(t) => Some(t),
            Err(e) => {
                errors.push(e);
                None
            }
        };

        match end_time {
            Some(end_time) if errors.is_empty() => Ok(ValidTask {
                name: name.to_string(),
                end_time,
                priority: self.priority,
            }),
            _ => Err(FormErrors(errors)),
        }
    }

    /// Validates the form and, on success, resets it to its initial state.
    ///
    /// # Errors
    ///
    /// Returns [`FormErrors`] and leaves the input untouched if any field
    /// is invalid.
    pub fn submit(&mut self, min_name_len: usize) -> Result<ValidTask, FormErrors> {
        let valid = self.validate(min_name_len)?;
        *self = Self::new();
        Ok(valid)
    }
}

/// Parses a deadline string.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM`, `YYYY-MM-DD HH:MM` and a bare
/// `YYYY-MM-DD` (end of day). Values without an offset are read as local
/// time.
///
/// # Errors
///
/// Returns [`FormError::DeadlineMissing`] for blank input and
/// [`FormError::DeadlineInvalid`] when no format matches.
pub fn parse_deadline(input: &str) -> Result<DateTime<Utc>, FormError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(FormError::DeadlineMissing);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(23, 59, 0))
        })
        .ok_or_else(|| FormError::DeadlineInvalid(input.to_string()))?;

    // Nonexistent local times (DST gaps) are rejected.
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| FormError::DeadlineInvalid(input.to_string()))
}
