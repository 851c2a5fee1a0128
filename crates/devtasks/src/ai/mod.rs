//! Assistant integration.
//!
//! This module provides:
//! - AI provider abstraction and the Anthropic implementation
//! - Prompt template system with Handlebars
//! - Response schemas and their validation
//! - Provider registry

pub mod anthropic;
pub mod prompts;
pub mod provider;
pub mod registry;
pub mod schemas;

pub use anthropic::AnthropicProvider;
pub use prompts::{PromptManager, PromptTemplate};
pub use provider::{
    extract_json, parse_ai_response, AIMessage, AIProvider, AIResponse, AIRole, GenerateOptions,
    TokenUsage,
};
pub use registry::ProviderRegistry;
pub use schemas::{
    ComplexityAssessment, GeneratedSubtask, GeneratedTask, SubtaskListResponse, TaskListResponse,
};
