//! Prompt template system for assistant operations.
//!
//! Templates are Handlebars strings with a system and a user part, rendered
//! against a serializable context.

use std::collections::HashMap;

use handlebars::Handlebars;
use serde::Serialize;

use crate::errors::{TasksError, TasksResult};

mod add_task;
mod assess_complexity;
mod expand_task;
mod parse_prd;

pub use add_task::AddTaskContext;
pub use assess_complexity::AssessComplexityContext;
pub use expand_task::{ExpandTaskContext, TaskSummary};
pub use parse_prd::ParsePrdContext;

/// Template ids
pub const PARSE_PRD: &str = "parse-prd";
pub const EXPAND_TASK: &str = "expand-task";
pub const ADD_TASK: &str = "add-task";
pub const ASSESS_COMPLEXITY: &str = "assess-complexity";

/// A prompt template with system and user messages.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub id: String,
    pub description: String,
    /// System prompt template
    pub system: String,
    /// User prompt template
    pub user: String,
}

impl PromptTemplate {
    /// Create a new prompt template.
    pub fn new(id: impl Into<String>, system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            system: system.into(),
            user: user.into(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Render the template with the given context.
    pub fn render<T: Serialize>(&self, context: &T) -> TasksResult<(String, String)> {
        let mut handlebars = create_handlebars();

        handlebars
            .register_template_string("system", &self.system)
            .map_err(|e| TasksError::Ai(format!("Invalid system template: {e}")))?;
        handlebars
            .register_template_string("user", &self.user)
            .map_err(|e| TasksError::Ai(format!("Invalid user template: {e}")))?;

        let system = handlebars
            .render("system", context)
            .map_err(|e| TasksError::Ai(format!("Failed to render system prompt: {e}")))?;
        let user = handlebars
            .render("user", context)
            .map_err(|e| TasksError::Ai(format!("Failed to render user prompt: {e}")))?;

        Ok((system, user))
    }
}

/// Create a Handlebars instance with custom helpers.
fn create_handlebars() -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(false);

    // Prompts are plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    // {{#if (gt count 0)}}
    handlebars.register_helper(
        "gt",
        Box::new(
            |h: &handlebars::Helper,
             _: &Handlebars,
             _: &handlebars::Context,
             _: &mut handlebars::RenderContext,
             out: &mut dyn handlebars::Output| {
                let a = h.param(0).and_then(|v| v.value().as_i64()).unwrap_or(0);
                let b = h.param(1).and_then(|v| v.value().as_i64()).unwrap_or(0);
                out.write(if a > b { "true" } else { "" })?;
                Ok(())
            },
        ),
    );

    // {{{json value}}}
    handlebars.register_helper(
        "json",
        Box::new(
            |h: &handlebars::Helper,
             _: &Handlebars,
             _: &handlebars::Context,
             _: &mut handlebars::RenderContext,
             out: &mut dyn handlebars::Output| {
                if let Some(param) = h.param(0) {
                    let json = serde_json::to_string_pretty(param.value())
                        .unwrap_or_else(|_| "null".to_string());
                    out.write(&json)?;
                }
                Ok(())
            },
        ),
    );

    handlebars
}

/// Prompt manager holding the built-in templates.
pub struct PromptManager {
    templates: HashMap<String, PromptTemplate>,
}

impl PromptManager {
    /// Create a new prompt manager with default templates.
    pub fn new() -> Self {
        let mut manager = Self {
            templates: HashMap::new(),
        };

        manager.register(parse_prd::template());
        manager.register(expand_task::template());
        manager.register(add_task::template());
        manager.register(assess_complexity::template());

        manager
    }

    /// Register a template, replacing any with the same id.
    pub fn register(&mut self, template: PromptTemplate) {
        self.templates.insert(template.id.clone(), template);
    }

    /// Get a template by ID.
    pub fn get(&self, id: &str) -> Option<&PromptTemplate> {
        self.templates.get(id)
    }

    /// Render a template with context.
    pub fn render<T: Serialize>(&self, id: &str, context: &T) -> TasksResult<(String, String)> {
        let template = self
            .get(id)
            .ok_or_else(|| TasksError::Ai(format!("Template '{id}' not found")))?;
        template.render(context)
    }
}

impl Default for PromptManager {
    fn default() -> Self {
        Self::new()
    }
}
