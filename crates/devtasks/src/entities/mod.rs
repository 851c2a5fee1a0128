//! Core data structures for task tracking.

mod complexity;
mod config;
mod subtask;
mod task;

pub use complexity::{ComplexityFactor, ComplexityLevel, ComplexityScore, ComplexitySource};
pub use config::{GlobalConfig, ModelSettings, StorageConfig, TasksConfig};
pub use subtask::Subtask;
pub use task::{Task, TaskPriority, TaskStatus};
