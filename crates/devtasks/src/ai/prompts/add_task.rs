//! Add task prompt template.

use serde::Serialize;

use super::PromptTemplate;

/// Context for the add-task prompt.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AddTaskContext {
    /// The user's description of the task
    pub prompt: String,
    /// Existing tasks as `{id, title}` pairs, for dependency hints
    pub existing_tasks: serde_json::Value,
    pub priority: Option<String>,
}

/// Get the add-task template.
pub fn template() -> PromptTemplate {
    PromptTemplate::new(super::ADD_TASK, SYSTEM_PROMPT, USER_PROMPT)
        .with_description("Generate a new task from a description")
}

const SYSTEM_PROMPT: &str = r#"You are an assistant that creates well-structured tasks for a software development project. Generate a single new task from the user's description.

Your response MUST be one JSON object with these fields and no id:
{
	"title": string,
	"description": string,
	"priority": "high" | "medium" | "low",
	"dependencies": number[] (ids of existing tasks this one needs),
	"details": string,
	"testStrategy": string
}"#;

const USER_PROMPT: &str = r#"Create a task for: {{prompt}}{{#if priority}}

Use priority "{{priority}}".{{/if}}

Existing tasks:
{{{json existing_tasks}}}

Respond with a single ```json fenced block."#;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_renders_existing_tasks() {
        let context = AddTaskContext {
            prompt: "Add rate limiting".to_string(),
            existing_tasks: json!([{"id": 1, "title": "HTTP server"}]),
            priority: Some("high".to_string()),
        };
        let (_, user) = template().render(&context).unwrap();
        assert!(user.contains("Add rate limiting"));
        assert!(user.contains("\"title\": \"HTTP server\""));
        assert!(user.contains("Use priority \"high\""));
    }
}
