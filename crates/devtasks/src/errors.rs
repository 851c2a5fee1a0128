//! Error types for the devtasks crate.

use thiserror::Error;

/// Coarse classification of a [`TasksError`], used when reporting a failed
/// operation back to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced task or subtask does not exist
    NotFound,
    /// Input or assistant output had the wrong shape
    ValidationFailure,
    /// Reading or writing the task collection failed
    PersistenceFailure,
    /// No ready task is available
    NoCandidate,
    /// The external assistant failed
    Assistant,
    /// The user aborted the operation
    Cancelled,
    /// Configuration could not be used
    Configuration,
}

/// Error types for task tracking operations
#[derive(Error, Debug, Clone)]
pub enum TasksError {
    // Lookup errors
    #[error("Task '{task_id}' not found")]
    TaskNotFound { task_id: u32 },

    #[error("No ready task available: every open task is done, deferred or blocked")]
    NoCandidate,

    // Validation errors
    #[error("Invalid status: '{status}'")]
    InvalidStatus { status: String },

    #[error("Invalid priority: '{priority}'")]
    InvalidPriority { priority: String },

    #[error("Invalid complexity level: '{level}'")]
    InvalidComplexityLevel { level: String },

    #[error("Invalid task ID: '{id}'")]
    InvalidId { id: String },

    #[error("Validation failed: {reason}")]
    Validation { reason: String },

    // Storage errors
    #[error("Storage error: {reason}")]
    StorageError { reason: String },

    #[error("Failed to read file '{path}': {reason}")]
    FileReadError { path: String, reason: String },

    #[error("Failed to write file '{path}': {reason}")]
    FileWriteError { path: String, reason: String },

    #[error("Failed to parse JSON: {reason}")]
    JsonParseError { reason: String },

    #[error("Project not initialized. Run 'devtasks init' first.")]
    NotInitialized,

    // Configuration errors
    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },

    // AI errors
    #[error("AI error: {0}")]
    Ai(String),

    #[error("AI provider error ({code}): {message}")]
    AiApi { code: String, message: String },

    #[error("AI provider not configured: {provider}")]
    ProviderNotConfigured { provider: String },

    #[error("AI response parse error: {reason}")]
    AiResponseParseError { reason: String },

    #[error("Operation cancelled")]
    Cancelled,
}

impl TasksError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TaskNotFound { .. } => ErrorKind::NotFound,
            Self::NoCandidate => ErrorKind::NoCandidate,
            Self::InvalidStatus { .. }
            | Self::InvalidPriority { .. }
            | Self::InvalidComplexityLevel { .. }
            | Self::InvalidId { .. }
            | Self::Validation { .. }
            | Self::AiResponseParseError { .. } => ErrorKind::ValidationFailure,
            Self::StorageError { .. }
            | Self::FileReadError { .. }
            | Self::FileWriteError { .. }
            | Self::JsonParseError { .. }
            | Self::NotInitialized => ErrorKind::PersistenceFailure,
            Self::ConfigError { .. } => ErrorKind::Configuration,
            Self::Ai(_) | Self::AiApi { .. } | Self::ProviderNotConfigured { .. } => {
                ErrorKind::Assistant
            }
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Provider error code, when the assistant reported one.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::AiApi { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TasksError {
    fn from(err: std::io::Error) -> Self {
        Self::StorageError {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for TasksError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParseError {
            reason: err.to_string(),
        }
    }
}

/// Result type alias for task operations
pub type TasksResult<T> = Result<T, TasksError>;
