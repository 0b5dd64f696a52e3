//! `Taskline`: terminal task list with priority ordering and advice.

pub mod advisory;
pub mod app;
pub mod config;
pub mod form;
pub mod ui;
