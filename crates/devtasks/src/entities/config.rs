//! Configuration entities.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::TaskPriority;

/// Main configuration structure (stored in `.tasks/config.json`)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TasksConfig {
    /// Assistant model configuration
    #[serde(default)]
    pub model: ModelSettings,

    /// Global settings
    #[serde(default)]
    pub global: GlobalConfig,

    /// Where the task collection lives
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Assistant model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Provider name (e.g., "anthropic")
    pub provider: String,

    /// Model ID
    #[serde(rename = "modelId")]
    pub model_id: String,

    /// Maximum tokens
    #[serde(default = "default_max_tokens", rename = "maxTokens")]
    pub max_tokens: u32,

    /// Temperature (0.0 - 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Optional base URL override
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "baseURL")]
    pub base_url: Option<String>,
}

const fn default_max_tokens() -> u32 {
    8000
}

const fn default_temperature() -> f32 {
    0.2
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model_id: "claude-sonnet-4-20250514".to_string(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            base_url: None,
        }
    }
}

/// Global configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Default tracing filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level", rename = "logLevel")]
    pub log_level: String,

    /// Default number of tasks when parsing a PRD
    #[serde(default = "default_num_tasks", rename = "defaultNumTasks")]
    pub default_num_tasks: u8,

    /// Default number of subtasks when expanding
    #[serde(default = "default_subtasks", rename = "defaultSubtasks")]
    pub default_subtasks: u8,

    /// Priority given to tasks that do not state one
    #[serde(default, rename = "defaultPriority")]
    pub default_priority: TaskPriority,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "projectName"
    )]
    pub project_name: Option<String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

const fn default_num_tasks() -> u8 {
    10
}

const fn default_subtasks() -> u8 {
    5
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            default_num_tasks: default_num_tasks(),
            default_subtasks: default_subtasks(),
            default_priority: TaskPriority::default(),
            project_name: None,
        }
    }
}

/// Storage locations, relative to the project root unless absolute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// The authoritative task collection
    #[serde(default = "default_tasks_file", rename = "tasksFile")]
    pub tasks_file: PathBuf,

    /// Directory for the per-task mirror files
    #[serde(default = "default_task_files_dir", rename = "taskFilesDir")]
    pub task_files_dir: PathBuf,

    /// Whether to write per-task mirror files at all
    #[serde(default = "default_true", rename = "writeTaskFiles")]
    pub write_task_files: bool,
}

fn default_tasks_file() -> PathBuf {
    PathBuf::from(".tasks/tasks.json")
}

fn default_task_files_dir() -> PathBuf {
    PathBuf::from(".tasks/tasks")
}

const fn default_true() -> bool {
    true
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            tasks_file: default_tasks_file(),
            task_files_dir: default_task_files_dir(),
            write_task_files: true,
        }
    }
}

impl StorageConfig {
    /// Resolve both paths against a project root
    pub fn resolve(&self, project_path: &Path) -> (PathBuf, PathBuf) {
        (
            project_path.join(&self.tasks_file),
            project_path.join(&self.task_files_dir),
        )
    }
}
