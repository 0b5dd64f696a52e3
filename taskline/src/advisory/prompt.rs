//! Prompt construction from the active-task snapshot.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use taskline_core::Task;

/// Renders the active tasks (already in canonical order) into a prompt.
///
/// `now` is used only to describe how much time is left on each deadline.
#[must_use]
pub fn build_prompt(active: &[Task], now: DateTime<Utc>) -> String {
    let mut prompt = format!(
        "It is now {}. Here are my pending tasks, most important first:\n",
        now.format("%Y-%m-%d %H:%M UTC")
    );

    if active.is_empty() {
        prompt.push_str("(none)\n");
    }

    for (i, task) in active.iter().enumerate() {
        let _ = writeln!(
            prompt,
            "{}. {} (priority {}, due {}, {})",
            i + 1,
            task.name,
            task.priority,
            task.end_time.format("%Y-%m-%d %H:%M UTC"),
            time_left(task.end_time, now)
        );
    }

    prompt.push_str(
        "\nSuggest the order I should tackle these in and point out any \
         task at risk of missing its deadline.",
    );
    prompt
}

/// Human-readable distance from `now` to `deadline`.
fn time_left(deadline: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = deadline - now;
    if delta.num_minutes() < 0 {
        return "overdue".to_string();
    }
    let hours = delta.num_hours();
    if hours >= 48 {
        format!("{} days left", delta.num_days())
    } else if hours >= 1 {
        format!("{hours} hours left")
    } else {
        format!("{} minutes left", delta.num_minutes())
    }
}
