//! Assess complexity prompt template.

use serde::Serialize;

use super::PromptTemplate;

/// Context for the assess-complexity prompt.
#[derive(Debug, Clone, Serialize)]
pub struct AssessComplexityContext {
    /// The task being assessed, as JSON
    pub task: serde_json::Value,
}

/// Get the assess-complexity template.
pub fn template() -> PromptTemplate {
    PromptTemplate::new(super::ASSESS_COMPLEXITY, SYSTEM_PROMPT, USER_PROMPT)
        .with_description("Assess the complexity of a single task")
}

const SYSTEM_PROMPT: &str = r#"You are an expert software architect assessing task complexity. Consider implementation effort, technical risk, dependencies and testing needs.

Your response MUST be a JSON object of this shape:
{
	"complexity": {
		"level": "simple" | "moderate" | "complex" | "veryComplex",
		"score": number (0 or greater, roughly 0-15),
		"factors": [{ "name": string, "weight": number, "description": string }]
	}
}"#;

const USER_PROMPT: &str = r#"Assess the complexity of this task:

{{{json task}}}

Respond with a single ```json fenced block."#;
