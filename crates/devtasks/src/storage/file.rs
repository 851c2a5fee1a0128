//! File-based storage implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use tokio::fs;
use tracing::{debug, warn};

use super::traits::Storage;
use crate::entities::{StorageConfig, Task, TaskStatus};
use crate::errors::{TasksError, TasksResult};

/// File-based storage implementation
pub struct FileStorage {
    /// Path to the collection file (tasks.json)
    tasks_file: PathBuf,

    /// Directory holding per-task mirror files
    task_files_dir: PathBuf,

    write_task_files: bool,
}

/// Accepted on-disk layouts of the collection file
#[derive(Deserialize)]
#[serde(untagged)]
enum TasksDocument {
    Wrapped { tasks: Vec<Task> },
    Bare(Vec<Task>),
}

impl FileStorage {
    /// Create a file storage rooted at `project_path` with the given layout
    pub fn new(project_path: impl AsRef<Path>, config: &StorageConfig) -> Self {
        let (tasks_file, task_files_dir) = config.resolve(project_path.as_ref());
        Self {
            tasks_file,
            task_files_dir,
            write_task_files: config.write_task_files,
        }
    }

    /// Create a file storage using the default `.tasks/` layout
    pub fn with_defaults(project_path: impl AsRef<Path>) -> Self {
        Self::new(project_path, &StorageConfig::default())
    }

    /// Get the collection file path
    pub fn tasks_file(&self) -> &Path {
        &self.tasks_file
    }

    /// Get the mirror directory path
    pub fn task_files_dir(&self) -> &Path {
        &self.task_files_dir
    }

    /// File name of the mirror copy for a task
    pub fn task_file_name(task_id: u32) -> String {
        format!("task_{task_id:03}.json")
    }

    async fn read_tasks_file(&self) -> TasksResult<Vec<Task>> {
        let content = match fs::read_to_string(&self.tasks_file).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TasksError::NotInitialized)
            }
            Err(e) => {
                return Err(TasksError::FileReadError {
                    path: self.tasks_file.display().to_string(),
                    reason: e.to_string(),
                })
            }
        };

        let document: TasksDocument =
            serde_json::from_str(&content).map_err(|e| TasksError::FileReadError {
                path: self.tasks_file.display().to_string(),
                reason: format!("invalid task collection: {e}"),
            })?;

        Ok(match document {
            TasksDocument::Wrapped { tasks } | TasksDocument::Bare(tasks) => tasks,
        })
    }

    /// Write via a sibling temp file and rename so readers never see a partial file
    async fn write_tasks_file(&self, data: &Value) -> TasksResult<()> {
        if let Some(parent) = self.tasks_file.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(data)?;
        let tmp_path = self.tasks_file.with_extension("json.tmp");
        let write_err = |e: std::io::Error| TasksError::FileWriteError {
            path: self.tasks_file.display().to_string(),
            reason: e.to_string(),
        };

        fs::write(&tmp_path, content).await.map_err(write_err)?;
        fs::rename(&tmp_path, &self.tasks_file)
            .await
            .map_err(write_err)
    }

    /// Build metadata for saving
    fn build_metadata(tasks: &[Task]) -> Value {
        let completed_count = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Done)
            .count();

        serde_json::json!({
            "version": "1.0.0",
            "lastModified": Utc::now().to_rfc3339(),
            "taskCount": tasks.len(),
            "completedCount": completed_count,
        })
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn initialize(&self) -> TasksResult<()> {
        if self.write_task_files {
            fs::create_dir_all(&self.task_files_dir).await?;
        }

        if !self.tasks_file.exists() {
            let data = serde_json::json!({
                "tasks": [],
                "metadata": Self::build_metadata(&[]),
            });
            self.write_tasks_file(&data).await?;
        }

        Ok(())
    }

    fn storage_type(&self) -> &'static str {
        "file"
    }

    async fn is_initialized(&self) -> TasksResult<bool> {
        Ok(self.tasks_file.exists())
    }

    async fn load_tasks(&self) -> TasksResult<Vec<Task>> {
        let tasks = self.read_tasks_file().await?;
        debug!(count = tasks.len(), path = %self.tasks_file.display(), "Loaded tasks");
        Ok(tasks)
    }

    async fn save_tasks(&self, tasks: &[Task]) -> TasksResult<()> {
        let data = serde_json::json!({
            "tasks": tasks,
            "metadata": Self::build_metadata(tasks),
        });
        self.write_tasks_file(&data).await?;
        debug!(count = tasks.len(), path = %self.tasks_file.display(), "Saved tasks");

        if self.write_task_files {
            for task in tasks {
                if let Err(e) = self.save_task_file(task).await {
                    warn!(task_id = task.id, error = %e, "Failed to write task file");
                }
            }
        }

        Ok(())
    }

    async fn save_task_file(&self, task: &Task) -> TasksResult<()> {
        fs::create_dir_all(&self.task_files_dir).await?;
        let path = self.task_files_dir.join(Self::task_file_name(task.id));
        let content = serde_json::to_string_pretty(task)?;
        fs::write(&path, content)
            .await
            .map_err(|e| TasksError::FileWriteError {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
    }
}
