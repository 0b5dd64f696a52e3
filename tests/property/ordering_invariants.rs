//! Property-based tests for the task store ordering invariants.
//!
//! Uses proptest to drive random sequences of create / toggle / delete
//! operations and verify after every step:
//! 1. `active_tasks() ++ completed_tasks()` is exactly the live collection.
//! 2. No id is duplicated or lost.
//! 3. Every active task precedes every completed task.
//! 4. The collection is sorted under the canonical comparator.
//! 5. Exact ties keep insertion order.

use std::cell::Cell;
use std::collections::HashSet;

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use taskline_core::ordering;
use taskline_core::{Clock, Priority, TaskId, TaskStore};

/// A single store operation. Indexes are resolved modulo the number of ids
/// ever created, so they may point at already-deleted tasks.
#[derive(Debug, Clone)]
enum Op {
    Create { priority: Priority, due_hours: i64 },
    Toggle(usize),
    Delete(usize),
    ToggleUnknown,
}

fn arb_priority() -> impl Strategy<Value = Priority> {
    prop_oneof![Just(Priority::High), Just(Priority::Low)]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (arb_priority(), 0i64..6).prop_map(|(priority, due_hours)| Op::Create { priority, due_hours }),
        2 => any::<usize>().prop_map(Op::Toggle),
        1 => any::<usize>().prop_map(Op::Delete),
        1 => Just(Op::ToggleUnknown),
    ]
}

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

/// Clock that advances one second per reading.
fn stepping_clock() -> impl Clock {
    let ticks = Cell::new(0);
    move || {
        let n = ticks.get();
        ticks.set(n + 1);
        epoch() + Duration::seconds(n)
    }
}

fn assert_invariants<C: Clock>(store: &TaskStore<C>, live: &HashSet<TaskId>) {
    let active = store.active_tasks();
    let completed = store.completed_tasks();

    assert!(active.iter().all(|t| !t.is_completed));
    assert!(completed.iter().all(|t| t.is_completed));

    let joined: Vec<_> = active.iter().chain(completed.iter()).cloned().collect();
    assert_eq!(joined.as_slice(), store.tasks());

    let ids: HashSet<TaskId> = joined.iter().map(|t| t.id.clone()).collect();
    assert_eq!(ids.len(), joined.len(), "duplicate id in collection");
    assert_eq!(&ids, live, "collection does not match live ids");

    assert!(ordering::is_sorted(store.tasks()));
}

proptest! {
    #[test]
    fn invariants_hold_after_every_operation(ops in prop::collection::vec(arb_op(), 1..60)) {
        let mut store = TaskStore::with_clock(stepping_clock());
        let mut created: Vec<TaskId> = Vec::new();
        let mut live: HashSet<TaskId> = HashSet::new();

        for op in ops {
            match op {
                Op::Create { priority, due_hours } => {
                    let task = store.create("generated", epoch() + Duration::hours(due_hours), priority);
                    created.push(task.id.clone());
                    live.insert(task.id);
                }
                Op::Toggle(i) if !created.is_empty() => {
                    let id = &created[i % created.len()];
                    prop_assert_eq!(store.toggle_complete(id), live.contains(id));
                }
                Op::Delete(i) if !created.is_empty() => {
                    let id = created[i % created.len()].clone();
                    prop_assert_eq!(store.delete(&id), live.remove(&id));
                }
                Op::Toggle(_) | Op::Delete(_) => {}
                Op::ToggleUnknown => {
                    let before = store.tasks().to_vec();
                    prop_assert!(!store.toggle_complete(&TaskId::new()));
                    prop_assert_eq!(store.tasks(), before.as_slice());
                }
            }
            assert_invariants(&store, &live);
        }
    }

    #[test]
    fn tied_active_tasks_keep_insertion_order(
        count in 2usize..8,
        noise in prop::collection::vec((arb_priority(), 0i64..6), 0..10),
        toggles in prop::collection::vec(any::<usize>(), 0..10),
    ) {
        let mut store = TaskStore::with_clock(stepping_clock());
        let due = epoch() + Duration::hours(3);

        let mut tied = Vec::new();
        for i in 0..count {
            tied.push(store.create(format!("tied-{i}"), due, Priority::Low).id);
        }
        let mut others = Vec::new();
        for (priority, hours) in noise {
            others.push(store.create("noise", epoch() + Duration::hours(hours), priority).id);
        }
        if !others.is_empty() {
            for t in toggles {
                store.toggle_complete(&others[t % others.len()]);
            }
        }

        let order: Vec<TaskId> = store
            .active_tasks()
            .into_iter()
            .filter(|t| t.name.starts_with("tied-"))
            .map(|t| t.id)
            .collect();
        prop_assert_eq!(order, tied);
    }
}
