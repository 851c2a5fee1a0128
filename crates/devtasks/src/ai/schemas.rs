//! Shapes the assistant is expected to answer with.
//!
//! Each response is validated and converted into store drafts before the
//! store is touched.

use serde::Deserialize;

use crate::domain::{SubtaskDraft, TaskDraft};
use crate::entities::{ComplexityScore, ComplexitySource, TaskPriority};
use crate::errors::{TasksError, TasksResult};

/// A task as produced by PRD parsing or manual-AI add.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedTask {
    /// Numbering used by the assistant; only meaningful inside one batch
    #[serde(default)]
    pub id: Option<u32>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    pub dependencies: Vec<u32>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub test_strategy: Option<String>,
}

/// A subtask as produced by task expansion.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedSubtask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

/// Response of an assessment.
#[derive(Debug, Clone, Deserialize)]
pub struct ComplexityAssessment {
    pub complexity: ComplexityScore,
}

/// A task list, bare or wrapped in `{"tasks": [...]}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TaskListResponse {
    Bare(Vec<GeneratedTask>),
    Wrapped { tasks: Vec<GeneratedTask> },
}

/// A subtask list, bare or wrapped in `{"subtasks": [...]}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SubtaskListResponse {
    Bare(Vec<GeneratedSubtask>),
    Wrapped { subtasks: Vec<GeneratedSubtask> },
}

fn shape_error(reason: impl Into<String>) -> TasksError {
    TasksError::AiResponseParseError {
        reason: reason.into(),
    }
}

fn require_title(title: &str, what: &str, index: usize) -> TasksResult<()> {
    if title.trim().is_empty() {
        return Err(shape_error(format!("{what} #{} has an empty title", index + 1)));
    }
    Ok(())
}

impl GeneratedTask {
    /// Convert into a store draft, keeping the assistant's id for batch renumbering.
    pub fn into_draft(self) -> TaskDraft {
        TaskDraft {
            title: self.title,
            description: self.description,
            priority: self.priority,
            status: None,
            dependencies: self.dependencies,
            details: self.details,
            test_strategy: self.test_strategy,
            subtasks: Vec::new(),
            source_id: self.id,
        }
    }
}

impl From<GeneratedSubtask> for SubtaskDraft {
    fn from(subtask: GeneratedSubtask) -> Self {
        Self {
            title: subtask.title,
            description: subtask.description,
            details: subtask.details,
            status: None,
        }
    }
}

impl TaskListResponse {
    /// Validate and convert into drafts
    pub fn into_drafts(self) -> TasksResult<Vec<TaskDraft>> {
        let (Self::Bare(tasks) | Self::Wrapped { tasks }) = self;
        if tasks.is_empty() {
            return Err(shape_error("assistant returned no tasks"));
        }
        for (index, task) in tasks.iter().enumerate() {
            require_title(&task.title, "task", index)?;
        }
        Ok(tasks.into_iter().map(GeneratedTask::into_draft).collect())
    }
}

impl SubtaskListResponse {
    /// Validate and convert into drafts
    pub fn into_drafts(self) -> TasksResult<Vec<SubtaskDraft>> {
        let (Self::Bare(subtasks) | Self::Wrapped { subtasks }) = self;
        if subtasks.is_empty() {
            return Err(shape_error("assistant returned no subtasks"));
        }
        for (index, subtask) in subtasks.iter().enumerate() {
            require_title(&subtask.title, "subtask", index)?;
        }
        Ok(subtasks.into_iter().map(SubtaskDraft::from).collect())
    }
}

impl ComplexityAssessment {
    /// Validate the score and mark it as assistant-supplied
    pub fn into_score(self) -> TasksResult<ComplexityScore> {
        let mut complexity = self.complexity;
        complexity
            .validate()
            .map_err(|e| shape_error(format!("invalid complexity: {e}")))?;
        complexity.source = ComplexitySource::Assistant;
        Ok(complexity)
    }
}
