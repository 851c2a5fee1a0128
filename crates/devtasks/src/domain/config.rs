//! Configuration domain facade.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::entities::{ModelSettings, TasksConfig};
use crate::errors::{TasksError, TasksResult};

/// Configuration domain facade
pub struct ConfigDomain {
    config_path: PathBuf,
}

impl ConfigDomain {
    /// Create a new config domain
    pub fn new(project_path: impl AsRef<Path>) -> Self {
        Self {
            config_path: project_path.as_ref().join(".tasks/config.json"),
        }
    }

    /// Load configuration, falling back to defaults when the file is absent
    pub async fn load(&self) -> TasksResult<TasksConfig> {
        match fs::read_to_string(&self.config_path).await {
            Ok(content) => {
                let config: TasksConfig =
                    serde_json::from_str(&content).map_err(|e| TasksError::ConfigError {
                        reason: format!("{}: {e}", self.config_path.display()),
                    })?;
                debug!(path = %self.config_path.display(), "Loaded configuration");
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(TasksConfig::default()),
            Err(e) => Err(TasksError::FileReadError {
                path: self.config_path.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Save configuration
    pub async fn save(&self, config: &TasksConfig) -> TasksResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_path, content)
            .await
            .map_err(|e| TasksError::FileWriteError {
                path: self.config_path.display().to_string(),
                reason: e.to_string(),
            })
    }

    /// Set the assistant model
    pub async fn set_model(&self, settings: ModelSettings) -> TasksResult<()> {
        let mut config = self.load().await?;
        config.model = settings;
        self.save(&config).await
    }

    /// Set project name
    pub async fn set_project_name(&self, name: impl Into<String>) -> TasksResult<()> {
        let mut config = self.load().await?;
        config.global.project_name = Some(name.into());
        self.save(&config).await
    }
}
