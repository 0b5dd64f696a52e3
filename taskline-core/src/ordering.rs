//! Canonical ordering of the task collection.
//!
//! The rule chain, applied until one rule discriminates:
//! 1. Active tasks before completed tasks.
//! 2. Completed tasks: most recently created first.
//! 3. Active tasks: `High` before `Low`.
//! 4. Active tasks of the same priority: earliest deadline first.
//!
//! Tasks that tie on every rule compare `Equal`, and [`sort`] is stable, so
//! they keep their relative position.

use std::cmp::Ordering;

use crate::task::{Priority, Task};

/// Compares two tasks under the canonical ordering.
///
/// Pure: reads only the two tasks.
#[must_use]
pub fn compare(a: &Task, b: &Task) -> Ordering {
    match (a.is_completed, b.is_completed) {
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        // No completion time is recorded; creation time stands in for it.
        (true, true) => b.created_at.cmp(&a.created_at),
        (false, false) => priority_rank(a.priority)
            .cmp(&priority_rank(b.priority))
            .then_with(|| a.end_time.cmp(&b.end_time)),
    }
}

/// Stable in-place sort of `tasks` into canonical order.
pub fn sort(tasks: &mut [Task]) {
    tasks.sort_by(compare);
}

/// Returns `true` if `tasks` is already in canonical order.
#[must_use]
pub fn is_sorted(tasks: &[Task]) -> bool {
    tasks
        .windows(2)
        .all(|pair| compare(&pair[0], &pair[1]) != Ordering::Greater)
}

const fn priority_rank(priority: Priority) -> u8 {
    match priority {
        Priority::High => 0,
        Priority::Low => 1,
    }
}
