//! Domain facades for task management.
//!
//! The scorer, readiness evaluation and selector are pure functions over
//! task slices; the store and the AI domain combine them with storage.

mod ai;
mod config;
pub mod readiness;
pub mod scoring;
pub mod selector;
mod store;

pub use ai::AIDomain;
pub use config::ConfigDomain;
pub use readiness::{BlockedTask, DependencyReport};
pub use store::{StatusTarget, SubtaskDraft, TaskDraft, TaskStore, TaskUpdate};
