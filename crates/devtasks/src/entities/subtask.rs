//! Subtask entity.

use serde::{Deserialize, Serialize};

use super::task::TaskStatus;

/// Subtask structure (nested within tasks)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    /// Numeric ID, unique only within the parent task
    pub id: u32,

    /// Parent task ID
    #[serde(rename = "parentId")]
    pub parent_id: u32,

    /// Brief, descriptive title
    pub title: String,

    /// Current status
    #[serde(default)]
    pub status: TaskStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Implementation details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Subtask {
    /// Create a new subtask
    pub fn new(id: u32, parent_id: u32, title: impl Into<String>) -> Self {
        Self {
            id,
            parent_id,
            title: title.into(),
            status: TaskStatus::default(),
            description: None,
            details: None,
        }
    }

    /// Get full ID (parentId.subtaskId format)
    pub fn full_id(&self) -> String {
        format!("{}.{}", self.parent_id, self.id)
    }
}
