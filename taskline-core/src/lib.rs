//! Core task model and ordering engine for `Taskline`.

pub mod clock;
pub mod ordering;
pub mod store;
pub mod task;

pub use clock::{Clock, SystemClock};
pub use store::TaskStore;
pub use task::{Priority, Task, TaskId};
