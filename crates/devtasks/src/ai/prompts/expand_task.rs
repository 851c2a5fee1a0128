//! Expand task prompt template.

use serde::Serialize;

use super::PromptTemplate;
use crate::entities::Task;

/// Context for the expand-task prompt.
#[derive(Debug, Clone, Serialize)]
pub struct ExpandTaskContext {
    /// Number of subtasks to generate (0 = let the assistant decide)
    pub subtask_count: u32,
    pub task: TaskSummary,
    pub additional_context: String,
}

/// The parts of a task the assistant needs to see.
#[derive(Debug, Clone, Serialize)]
pub struct TaskSummary {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub details: String,
    /// Titles of subtasks the task already has
    pub existing_subtasks: Vec<String>,
}

impl From<&Task> for TaskSummary {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            details: task.details.clone().unwrap_or_default(),
            existing_subtasks: task.subtasks.iter().map(|s| s.title.clone()).collect(),
        }
    }
}

/// Get the expand-task template.
pub fn template() -> PromptTemplate {
    PromptTemplate::new(super::EXPAND_TASK, SYSTEM_PROMPT, USER_PROMPT)
        .with_description("Break down a task into subtasks")
}

const SYSTEM_PROMPT: &str = r#"You are an assistant helping break software development tasks into specific, actionable subtasks that can be implemented in order.

Your response MUST be a JSON array of subtask objects. Do NOT include ids; they are assigned when the subtasks are saved. Each subtask has:
- title: a clear, actionable title
- description: what the subtask delivers
- details: implementation notes"#;

const USER_PROMPT: &str = r#"Break down this task into {{#if (gt subtask_count 0)}}exactly {{subtask_count}}{{else}}an appropriate number of{{/if}} subtasks:

Task ID: {{task.id}}
Title: {{task.title}}
Description: {{task.description}}
Current details: {{#if task.details}}{{task.details}}{{else}}None{{/if}}{{#if task.existing_subtasks}}

Existing subtasks (do not repeat them):
{{#each task.existing_subtasks}}- {{this}}
{{/each}}{{/if}}{{#if additional_context}}

Additional context: {{additional_context}}{{/if}}

Respond with a single ```json fenced block."#;
