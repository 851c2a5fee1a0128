//! Task store: mutations over the persisted task collection.
//!
//! Every operation reads the whole collection from [`Storage`], applies its
//! change in memory, re-scores the tasks it touched and writes the whole
//! collection back. There is no locking and no version check, so two
//! commands running at the same time can lose an update.

use std::collections::HashMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, info};

use super::readiness::{self, BlockedTask, DependencyReport};
use super::{scoring, selector};
use crate::entities::{
    ComplexityScore, ComplexitySource, Subtask, Task, TaskPriority, TaskStatus,
};
use crate::errors::{TasksError, TasksResult};
use crate::storage::Storage;

/// Input for a task that does not have an id yet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    /// Falls back to the store's default priority
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    pub dependencies: Vec<u32>,
    pub details: Option<String>,
    pub test_strategy: Option<String>,
    pub subtasks: Vec<SubtaskDraft>,
    /// Id the draft was given by its producer. Inside one `append_tasks`
    /// batch, dependencies on this id are rewritten to the assigned id.
    pub source_id: Option<u32>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }
}

/// Input for a subtask that does not have an id yet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubtaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub details: Option<String>,
    pub status: Option<TaskStatus>,
}

impl SubtaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Field changes for an existing task; `None` leaves a field as is
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// Replaces the dependency list
    pub dependencies: Option<Vec<u32>>,
    pub details: Option<String>,
    pub test_strategy: Option<String>,
}

impl TaskUpdate {
    fn apply(self, task: &mut Task) -> TasksResult<()> {
        if let Some(title) = self.title {
            task.title = non_empty_title(title)?;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(dependencies) = self.dependencies {
            task.dependencies.clear();
            task.add_dependencies(dependencies);
        }
        if let Some(details) = self.details {
            task.details = Some(details);
        }
        if let Some(test_strategy) = self.test_strategy {
            task.test_strategy = Some(test_strategy);
        }
        Ok(())
    }
}

/// A task or subtask addressed by a status change, written `3` or `3.2`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTarget {
    Task(u32),
    Subtask { task_id: u32, subtask_id: u32 },
}

impl FromStr for StatusTarget {
    type Err = TasksError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim()
                .parse::<u32>()
                .ok()
                .filter(|id| *id > 0)
                .ok_or_else(|| TasksError::InvalidId { id: s.to_string() })
        };
        match s.split_once('.') {
            Some((task_id, subtask_id)) => Ok(Self::Subtask {
                task_id: parse(task_id)?,
                subtask_id: parse(subtask_id)?,
            }),
            None => parse(s).map(Self::Task),
        }
    }
}

impl fmt::Display for StatusTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Task(id) => write!(f, "{id}"),
            Self::Subtask {
                task_id,
                subtask_id,
            } => write!(f, "{task_id}.{subtask_id}"),
        }
    }
}

fn non_empty_title(title: String) -> TasksResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TasksError::Validation {
            reason: "task title must not be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

fn ids_exhausted(what: &str) -> TasksError {
    TasksError::Validation {
        reason: format!("{what} ids exhausted at {}", u32::MAX),
    }
}

/// Ids for `count` new tasks, following the current maximum
fn next_task_ids(tasks: &[Task], count: usize) -> TasksResult<RangeInclusive<u32>> {
    let max = tasks.iter().map(|t| t.id).max().unwrap_or(0);
    u32::try_from(count.max(1))
        .ok()
        .and_then(|n| max.checked_add(n))
        .map(|last| max + 1..=last)
        .ok_or_else(|| ids_exhausted("task"))
}

fn find_mut(tasks: &mut [Task], task_id: u32) -> TasksResult<&mut Task> {
    tasks
        .iter_mut()
        .find(|t| t.id == task_id)
        .ok_or(TasksError::TaskNotFound { task_id })
}

/// Append drafted subtasks with ids following the current maximum
fn push_subtasks(task: &mut Task, drafts: Vec<SubtaskDraft>) -> TasksResult<Vec<Subtask>> {
    let mut next_id = task.next_subtask_id();
    let mut created = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let id = next_id.ok_or_else(|| ids_exhausted("subtask"))?;
        let mut subtask = Subtask::new(id, task.id, non_empty_title(draft.title)?);
        subtask.description = draft.description;
        subtask.details = draft.details;
        subtask.status = draft.status.unwrap_or_default();
        next_id = id.checked_add(1);
        created.push(subtask);
    }
    task.subtasks.extend(created.iter().cloned());
    Ok(created)
}

/// Task store facade over a [`Storage`] backend
pub struct TaskStore {
    storage: Arc<dyn Storage>,
    default_priority: TaskPriority,
}

impl TaskStore {
    /// Create a new task store
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            default_priority: TaskPriority::default(),
        }
    }

    /// Priority for drafts that do not state one
    pub fn with_default_priority(mut self, priority: TaskPriority) -> Self {
        self.default_priority = priority;
        self
    }

    /// Initialize the project
    pub async fn init(&self) -> TasksResult<()> {
        self.storage.initialize().await
    }

    /// Check if project is initialized
    pub async fn is_initialized(&self) -> TasksResult<bool> {
        self.storage.is_initialized().await
    }

    /// Load, mutate and write back the whole collection
    async fn mutate<T, F>(&self, operation: &'static str, change: F) -> TasksResult<T>
    where
        F: FnOnce(&mut Vec<Task>) -> TasksResult<T> + Send,
        T: Send,
    {
        let mut tasks = self.storage.load_tasks().await?;
        let outcome = change(&mut tasks)?;
        self.storage.save_tasks(&tasks).await?;
        info!(operation, count = tasks.len(), "Task collection updated");
        Ok(outcome)
    }

    fn build_task(&self, id: u32, draft: TaskDraft) -> TasksResult<Task> {
        let mut task = Task::new(id, non_empty_title(draft.title)?, draft.description);
        task.priority = draft.priority.unwrap_or(self.default_priority);
        task.status = draft.status.unwrap_or_default();
        task.add_dependencies(draft.dependencies);
        task.details = draft.details;
        task.test_strategy = draft.test_strategy;
        push_subtasks(&mut task, draft.subtasks)?;
        scoring::rescore(&mut task);
        Ok(task)
    }

    // === Reads ===

    /// List all tasks with optional status filter
    pub async fn list_tasks(&self, status_filter: Option<TaskStatus>) -> TasksResult<Vec<Task>> {
        let tasks = self.storage.load_tasks().await?;
        Ok(match status_filter {
            Some(status) => tasks.into_iter().filter(|t| t.status == status).collect(),
            None => tasks,
        })
    }

    /// Get a specific task by ID
    pub async fn get_task(&self, task_id: u32) -> TasksResult<Task> {
        self.storage
            .load_tasks()
            .await?
            .into_iter()
            .find(|t| t.id == task_id)
            .ok_or(TasksError::TaskNotFound { task_id })
    }

    /// Tasks that can be worked on now, in recommendation order
    pub async fn ready_tasks(&self) -> TasksResult<Vec<Task>> {
        let tasks = self.storage.load_tasks().await?;
        let ready = readiness::ready_tasks(&tasks);
        Ok(selector::rank(&ready).into_iter().cloned().collect())
    }

    /// Open tasks waiting on dependencies
    pub async fn blocked_tasks(&self) -> TasksResult<Vec<BlockedTask>> {
        let tasks = self.storage.load_tasks().await?;
        Ok(readiness::blocked_tasks(&tasks))
    }

    /// Get the next task to work on
    pub async fn next_task(&self) -> TasksResult<Task> {
        let tasks = self.storage.load_tasks().await?;
        let ready = readiness::ready_tasks(&tasks);
        debug!(ready = ready.len(), total = tasks.len(), "Selecting next task");
        selector::select_next(&ready)
            .cloned()
            .ok_or(TasksError::NoCandidate)
    }

    /// Missing references, self-references and cycles
    pub async fn dependency_report(&self) -> TasksResult<DependencyReport> {
        let tasks = self.storage.load_tasks().await?;
        Ok(readiness::dependency_report(&tasks))
    }

    // === Mutations ===

    /// Add a new task with the next free id
    pub async fn add_task(&self, draft: TaskDraft) -> TasksResult<Task> {
        self.mutate("add_task", |tasks| {
            let id = *next_task_ids(tasks, 1)?.start();
            let task = self.build_task(id, draft)?;
            tasks.push(task.clone());
            Ok(task)
        })
        .await
    }

    /// Add several tasks at once, in order, with consecutive ids
    pub async fn append_tasks(&self, drafts: Vec<TaskDraft>) -> TasksResult<Vec<Task>> {
        self.mutate("append_tasks", |tasks| {
            let ids = next_task_ids(tasks, drafts.len())?;
            let renumbered: HashMap<u32, u32> = drafts
                .iter()
                .zip(ids.clone())
                .filter_map(|(draft, id)| draft.source_id.map(|source| (source, id)))
                .collect();

            let mut created = Vec::with_capacity(drafts.len());
            for (mut draft, id) in drafts.into_iter().zip(ids) {
                for dep in &mut draft.dependencies {
                    if let Some(assigned) = renumbered.get(dep) {
                        *dep = *assigned;
                    }
                }
                created.push(self.build_task(id, draft)?);
            }

            tasks.extend(created.iter().cloned());
            Ok(created)
        })
        .await
    }

    /// Merge field changes into a task and recompute its complexity.
    ///
    /// Any previous override is dropped: the result is always a computed score.
    pub async fn update_task_rescoring(&self, task_id: u32, update: TaskUpdate) -> TasksResult<Task> {
        self.mutate("update_task_rescoring", |tasks| {
            let task = find_mut(tasks, task_id)?;
            update.apply(task)?;
            task.complexity = Some(scoring::score(task));
            Ok(task.clone())
        })
        .await
    }

    /// Merge field changes into a task and install a caller-supplied complexity.
    ///
    /// A value marked `Computed` is stored as `Manual` so later rescoring keeps it.
    pub async fn update_task_preserving_complexity(
        &self,
        task_id: u32,
        update: TaskUpdate,
        mut complexity: ComplexityScore,
    ) -> TasksResult<Task> {
        complexity.validate()?;
        if complexity.source == ComplexitySource::Computed {
            complexity.source = ComplexitySource::Manual;
        }
        self.mutate("update_task_preserving_complexity", |tasks| {
            let task = find_mut(tasks, task_id)?;
            update.apply(task)?;
            task.complexity = Some(complexity);
            Ok(task.clone())
        })
        .await
    }

    /// Manually set a task's complexity
    pub async fn set_complexity(
        &self,
        task_id: u32,
        complexity: ComplexityScore,
    ) -> TasksResult<Task> {
        self.update_task_preserving_complexity(task_id, TaskUpdate::default(), complexity)
            .await
    }

    /// Set the status of one or more tasks. Fails without writing if any id is unknown.
    pub async fn set_status(&self, task_ids: &[u32], status: TaskStatus) -> TasksResult<Vec<Task>> {
        self.mutate("set_status", |tasks| {
            let mut updated = Vec::with_capacity(task_ids.len());
            for &task_id in task_ids {
                let task = find_mut(tasks, task_id)?;
                task.status = status;
                scoring::rescore(task);
                updated.push(task.clone());
            }
            Ok(updated)
        })
        .await
    }

    /// Set the status of tasks and subtasks in one write.
    ///
    /// Fails without writing if any target is unknown.
    pub async fn set_target_status(
        &self,
        targets: &[StatusTarget],
        status: TaskStatus,
    ) -> TasksResult<usize> {
        self.mutate("set_target_status", |tasks| {
            for target in targets {
                match *target {
                    StatusTarget::Task(task_id) => {
                        let task = find_mut(tasks, task_id)?;
                        task.status = status;
                        scoring::rescore(task);
                    }
                    StatusTarget::Subtask {
                        task_id,
                        subtask_id,
                    } => {
                        let task = find_mut(tasks, task_id)?;
                        task.subtask_mut(subtask_id)
                            .ok_or_else(|| TasksError::InvalidId {
                                id: target.to_string(),
                            })?
                            .status = status;
                        scoring::rescore(task);
                    }
                }
            }
            Ok(targets.len())
        })
        .await
    }

    /// Append subtasks to a task; new ids continue from the task's highest subtask id
    pub async fn add_subtasks_to_task(
        &self,
        task_id: u32,
        drafts: Vec<SubtaskDraft>,
    ) -> TasksResult<Vec<Subtask>> {
        self.mutate("add_subtasks_to_task", |tasks| {
            let task = find_mut(tasks, task_id)?;
            let created = push_subtasks(task, drafts)?;
            scoring::rescore(task);
            Ok(created)
        })
        .await
    }

    /// Re-apply the scorer to every task without an override.
    ///
    /// Returns the number of tasks whose stored complexity changed.
    pub async fn rescore_all(&self) -> TasksResult<usize> {
        self.mutate("rescore_all", |tasks| {
            Ok(tasks
                .iter_mut()
                .map(scoring::rescore)
                .filter(|changed| *changed)
                .count())
        })
        .await
    }
}
