//! Task entity and related types.

use serde::{Deserialize, Serialize};

use super::{ComplexityScore, Subtask};
use crate::errors::TasksError;

/// Task status values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Done,
    Deferred,
}

impl TaskStatus {
    /// All statuses, in the order the list view groups them.
    pub const ALL: [Self; 4] = [Self::InProgress, Self::Pending, Self::Deferred, Self::Done];

    /// Selection rank: lower ranks are recommended first.
    pub const fn rank(self) -> u8 {
        match self {
            Self::InProgress => 0,
            Self::Pending => 1,
            Self::Deferred => 2,
            Self::Done => 3,
        }
    }

    /// Whether a task in this status can still be picked up.
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in-progress"),
            Self::Done => write!(f, "done"),
            Self::Deferred => write!(f, "deferred"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = TasksError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "in-progress" | "inprogress" | "in_progress" => Ok(Self::InProgress),
            "done" | "completed" => Ok(Self::Done),
            "deferred" => Ok(Self::Deferred),
            _ => Err(TasksError::InvalidStatus {
                status: s.to_string(),
            }),
        }
    }
}

/// Task priority levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    /// Ordinal weight used by scoring and selection (low=1, medium=2, high=3).
    pub const fn weight(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for TaskPriority {
    type Err = TasksError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" | "med" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(TasksError::InvalidPriority {
                priority: s.to_string(),
            }),
        }
    }
}

/// Core task structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Positive identifier, unique within a collection
    pub id: u32,

    /// Brief, descriptive title
    pub title: String,

    /// Concise description of what the task involves
    #[serde(default)]
    pub description: String,

    /// Current task status
    #[serde(default)]
    pub status: TaskStatus,

    /// Task priority level
    #[serde(default)]
    pub priority: TaskPriority,

    /// IDs of prerequisite tasks (not required to exist)
    #[serde(default)]
    pub dependencies: Vec<u32>,

    /// Subtasks in display order
    #[serde(default)]
    pub subtasks: Vec<Subtask>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<ComplexityScore>,

    /// In-depth implementation notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    /// Verification approach
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "testStrategy"
    )]
    pub test_strategy: Option<String>,
}

impl Task {
    /// Create a new task with minimal required fields
    pub fn new(id: u32, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            dependencies: Vec::new(),
            subtasks: Vec::new(),
            complexity: None,
            details: None,
            test_strategy: None,
        }
    }

    /// Builder-style priority setter
    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Builder-style status setter
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Builder-style dependency setter
    pub fn with_dependencies(mut self, dependencies: impl IntoIterator<Item = u32>) -> Self {
        self.dependencies = Vec::new();
        self.add_dependencies(dependencies);
        self
    }

    /// Add dependencies, skipping ids already present
    pub fn add_dependencies(&mut self, dependencies: impl IntoIterator<Item = u32>) {
        for dep in dependencies {
            if !self.dependencies.contains(&dep) {
                self.dependencies.push(dep);
            }
        }
    }

    /// Whether the task lists its own id as a dependency
    pub fn depends_on_itself(&self) -> bool {
        self.dependencies.contains(&self.id)
    }

    /// Whether the current complexity was supplied by something other than the scorer
    pub fn has_complexity_override(&self) -> bool {
        self.complexity.as_ref().is_some_and(ComplexityScore::is_override)
    }

    /// Get subtask by ID
    pub fn subtask(&self, subtask_id: u32) -> Option<&Subtask> {
        self.subtasks.iter().find(|s| s.id == subtask_id)
    }

    /// Get mutable subtask by ID
    pub fn subtask_mut(&mut self, subtask_id: u32) -> Option<&mut Subtask> {
        self.subtasks.iter_mut().find(|s| s.id == subtask_id)
    }

    /// Get next available subtask ID, `None` once the id space is used up
    pub fn next_subtask_id(&self) -> Option<u32> {
        self.subtasks.iter().map(|s| s.id).max().unwrap_or(0).checked_add(1)
    }

    /// Count subtasks in the given status
    pub fn subtasks_in(&self, status: TaskStatus) -> usize {
        self.subtasks.iter().filter(|s| s.status == status).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_new() {
        let task = Task::new(1, "Test Task", "A test task description");
        assert_eq!(task.id, 1);
        assert_eq!(task.title, "Test Task");
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert!(task.complexity.is_none());
    }

    #[test]
    fn test_task_status_parsing() {
        assert_eq!(
            "pending".parse::<TaskStatus>().unwrap(),
            TaskStatus::Pending
        );
        assert_eq!(
            "in-progress".parse::<TaskStatus>().unwrap(),
            TaskStatus::InProgress
        );
        assert_eq!("done".parse::<TaskStatus>().unwrap(), TaskStatus::Done);
        assert!("cancelled".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_priority_weights() {
        assert_eq!(TaskPriority::Low.weight(), 1);
        assert_eq!(TaskPriority::Medium.weight(), 2);
        assert_eq!(TaskPriority::High.weight(), 3);
        assert!("critical".parse::<TaskPriority>().is_err());
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
    }

    #[test]
    fn test_dependencies_are_deduplicated() {
        let task = Task::new(3, "T", "D").with_dependencies([1, 2, 1]);
        assert_eq!(task.dependencies, vec![1, 2]);
    }

    #[test]
    fn test_self_dependency_detection() {
        let task = Task::new(3, "T", "D").with_dependencies([3]);
        assert!(task.depends_on_itself());
    }

    #[test]
    fn test_deserialize_minimal_record() {
        let task: Task = serde_json::from_str(r#"{"id": 7, "title": "Minimal"}"#).unwrap();
        assert_eq!(task.id, 7);
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.dependencies.is_empty());
        assert!(task.details.is_none());
    }

    #[test]
    fn test_next_subtask_id() {
        let mut task = Task::new(1, "Parent", "");
        assert_eq!(task.next_subtask_id(), Some(1));

        task.subtasks.push(Subtask::new(4, 1, "Four"));
        assert_eq!(task.next_subtask_id(), Some(5));

        task.subtasks.push(Subtask::new(u32::MAX, 1, "Last"));
        assert_eq!(task.next_subtask_id(), None);
    }
}
