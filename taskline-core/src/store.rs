//! Task store: the sole owner and mutator of the task collection.
//!
//! Every mutating operation finishes by re-running the ordering step, so the
//! collection is in canonical order whenever a caller can observe it. Views
//! handed out to renderers and the advisory layer are copies.

use chrono::{DateTime, Utc};

use crate::clock::{Clock, SystemClock};
use crate::ordering;
use crate::task::{Priority, Task, TaskId};

/// Owns the task list and keeps it in canonical order.
pub struct TaskStore<C = SystemClock> {
    /// Tasks in canonical order.
    tasks: Vec<Task>,
    /// Source for `created_at` stamps.
    clock: C,
}

impl TaskStore<SystemClock> {
    /// Creates an empty store stamped by the wall clock.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for TaskStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> TaskStore<C> {
    /// Creates an empty store that reads creation times from `clock`.
    #[must_use]
    pub const fn with_clock(clock: C) -> Self {
        Self {
            tasks: Vec::new(),
            clock,
        }
    }

    /// Creates a new active task and inserts it in canonical position.
    ///
    /// Inputs are expected to have passed form validation already; the
    /// store does not re-check them.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        end_time: DateTime<Utc>,
        priority: Priority,
    ) -> Task {
        let task = Task {
            id: TaskId::new(),
            name: name.into(),
            end_time,
            priority,
            is_completed: false,
            created_at: self.clock.now(),
        };
        tracing::debug!(task_id = %task.id, %priority, "task created");

        self.tasks.push(task.clone());
        self.reorder();
        task
    }

    /// Flips the completion flag of the task with `id`.
    ///
    /// Returns `false` and leaves the collection untouched if no such task
    /// exists (a delete can race a toggle issued from a stale view).
    pub fn toggle_complete(&mut self, id: &TaskId) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| &t.id == id) else {
            tracing::debug!(task_id = %id, "toggle ignored, task not found");
            return false;
        };
        task.is_completed = !task.is_completed;
        tracing::debug!(task_id = %id, completed = task.is_completed, "task toggled");

        self.reorder();
        true
    }

    /// Removes the task with `id`.
    ///
    /// Returns `false` if no such task exists; that is not an error.
    pub fn delete(&mut self, id: &TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| &t.id != id);
        let removed = self.tasks.len() != before;
        if removed {
            tracing::debug!(task_id = %id, "task deleted");
            self.reorder();
        } else {
            tracing::debug!(task_id = %id, "delete ignored, task not found");
        }
        removed
    }

    /// Returns the active tasks in canonical order.
    #[must_use]
    pub fn active_tasks(&self) -> Vec<Task> {
        self.tasks.iter().filter(|t| t.is_active()).cloned().collect()
    }

    /// Returns the completed tasks in canonical order.
    #[must_use]
    pub fn completed_tasks(&self) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|t| t.is_completed)
            .cloned()
            .collect()
    }

    /// The full collection in canonical order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up a task by id.
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Number of live tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` if the store holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Re-establishes canonical order. Called at the end of every mutation.
    fn reorder(&mut self) {
        ordering::sort(&mut self.tasks);
        debug_assert!(ordering::is_sorted(&self.tasks));
    }
}
