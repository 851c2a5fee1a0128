#![warn(clippy::pedantic)]
// Allow common pedantic lints that don't affect correctness
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_precision_loss)]

//! # devtasks
//!
//! A file-backed task tracker for AI-assisted development.
//!
//! This crate provides:
//! - Tasks and subtasks with priorities and dependencies
//! - A deterministic complexity scorer with user and assistant overrides
//! - Dependency readiness and next-task selection
//! - File storage in the project's `.tasks/` directory
//! - Assistant-driven PRD parsing, task expansion and complexity assessment
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use devtasks::{FileStorage, TaskDraft, TaskStore};
//!
//! let store = TaskStore::new(Arc::new(FileStorage::with_defaults(".")));
//! store.add_task(TaskDraft::new("Set up CI", "Run tests on every push")).await?;
//! let next = store.next_task().await?;
//! ```

// Core entities
pub mod entities;

// Error types
pub mod errors;

// Storage layer
pub mod storage;

// Domain facades
pub mod domain;

// Terminal UI helpers
pub mod ui;

// Assistant integration
pub mod ai;

// Re-export key types for convenience
pub use domain::{AIDomain, ConfigDomain, SubtaskDraft, TaskDraft, TaskStore, TaskUpdate};
pub use entities::{
    ComplexityLevel, ComplexityScore, ComplexitySource, Subtask, Task, TaskPriority, TaskStatus,
};
pub use errors::{ErrorKind, TasksError, TasksResult};
pub use storage::{FileStorage, Storage};
