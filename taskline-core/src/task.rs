//! Task model types for `Taskline`.
//!
//! A [`Task`] is the only entity the store keeps. Everything except the
//! completion flag is fixed at creation time.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a task, based on UUID v7 (millisecond timestamp
/// plus random bits).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new time-ordered task identifier (UUID v7).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `TaskId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID value.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Priority tier of a task. `High` tasks are scheduled ahead of `Low` ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Urgent work, listed first among active tasks.
    #[default]
    High,
    /// Everything else.
    Low,
}

impl Priority {
    /// Returns the other tier.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::High => Self::Low,
            Self::Low => Self::High,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Self::High => "High",
            Self::Low => "Low",
        })
    }
}

/// Error returned when a string is not a known priority tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown priority {0:?} (expected High or Low)")]
pub struct ParsePriorityError(String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "low" => Ok(Self::Low),
            _ => Err(ParsePriorityError(s.to_string())),
        }
    }
}

/// A single entry in the task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier, never reused.
    pub id: TaskId,
    /// Display name, validated before it reaches the store.
    pub name: String,
    /// Deadline supplied by the caller.
    pub end_time: DateTime<Utc>,
    /// Priority tier.
    pub priority: Priority,
    /// Whether the task has been checked off.
    pub is_completed: bool,
    /// Creation instant. Also used as the recency key for completed tasks.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Returns `true` if the task has not been completed.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.is_completed
    }
}
