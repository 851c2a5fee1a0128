//! Parse PRD prompt template.
//!
//! Turns a requirements document into a list of top-level tasks.

use serde::Serialize;

use super::PromptTemplate;

/// Context for the parse-prd prompt.
#[derive(Debug, Clone, Serialize)]
pub struct ParsePrdContext {
    /// Target number of tasks (0 = let the assistant decide)
    pub num_tasks: u32,
    /// Id the assistant should start numbering from
    pub next_id: u32,
    pub prd_content: String,
    pub default_task_priority: String,
}

impl Default for ParsePrdContext {
    fn default() -> Self {
        Self {
            num_tasks: 10,
            next_id: 1,
            prd_content: String::new(),
            default_task_priority: "medium".to_string(),
        }
    }
}

/// Get the parse-prd template.
pub fn template() -> PromptTemplate {
    PromptTemplate::new(super::PARSE_PRD, SYSTEM_PROMPT, USER_PROMPT)
        .with_description("Parse a Product Requirements Document into structured tasks")
}

const SYSTEM_PROMPT: &str = r#"You are an assistant that analyzes Product Requirements Documents (PRDs) and produces a logically ordered, dependency-aware list of development tasks in JSON format.

Generate {{#if (gt num_tasks 0)}}approximately {{num_tasks}}{{else}}an appropriate number of{{/if}} top-level tasks. Each task is one logical unit of work and takes the most direct path to the requirement without overengineering.
Assign sequential IDs starting from {{next_id}}. A task may only depend on tasks with lower IDs.
Use priority '{{default_task_priority}}' unless the PRD makes a task clearly more or less critical.

Each task follows this JSON structure:
{
	"id": number,
	"title": string,
	"description": string,
	"priority": "high" | "medium" | "low",
	"dependencies": number[],
	"details": string,
	"testStrategy": string
}

If the PRD names specific libraries, schemas, frameworks or stacks, keep to them."#;

const USER_PROMPT: &str = r#"Here is the PRD to break down into {{#if (gt num_tasks 0)}}approximately {{num_tasks}}{{else}}an appropriate number of{{/if}} tasks, starting IDs from {{next_id}}:

{{prd_content}}

Respond with a single ```json fenced block containing the array of task objects and nothing else."#;
