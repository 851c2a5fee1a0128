//! Storage trait definitions.

use async_trait::async_trait;

use crate::entities::Task;
use crate::errors::TasksResult;

/// Storage interface for task persistence
///
/// Implementations hold the whole collection as one unit: `load_tasks`
/// returns every task and `save_tasks` replaces every task.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initialize storage (create directories and an empty collection)
    async fn initialize(&self) -> TasksResult<()>;

    /// Get storage type identifier
    fn storage_type(&self) -> &'static str;

    /// Check if storage is initialized
    async fn is_initialized(&self) -> TasksResult<bool>;

    /// Load the full task collection, in stored order.
    ///
    /// Fails when the collection is missing or unreadable.
    async fn load_tasks(&self) -> TasksResult<Vec<Task>>;

    /// Overwrite the full task collection
    async fn save_tasks(&self, tasks: &[Task]) -> TasksResult<()>;

    /// Write the standalone copy of a single task record
    async fn save_task_file(&self, task: &Task) -> TasksResult<()>;
}
