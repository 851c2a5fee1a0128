//! AI Provider trait and common types.
//!
//! Defines the interface that all AI providers must implement, plus the
//! extraction of structured JSON from free-text responses.

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::{TasksError, TasksResult};

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AIRole {
    /// System message (sets context/behavior)
    System,
    /// User message (input)
    User,
    /// Assistant message (AI response)
    Assistant,
}

/// A message in a conversation with an AI model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AIMessage {
    pub role: AIRole,
    pub content: String,
}

impl AIMessage {
    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: AIRole::System,
            content: content.into(),
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: AIRole::User,
            content: content.into(),
        }
    }
}

/// Token usage information from an AI response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

/// Response from an AI model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AIResponse {
    /// Generated text content
    pub text: String,
    pub usage: TokenUsage,
    /// Model that generated the response
    pub model: String,
    /// Provider that generated the response
    pub provider: String,
}

/// Options for text generation.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Temperature for sampling (0.0 to 1.0)
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Stop sequences
    pub stop_sequences: Option<Vec<String>>,
}

/// Trait for AI providers.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Get the provider name (e.g., "anthropic").
    fn name(&self) -> &'static str;

    /// Get the environment variable name for the API key.
    fn api_key_env_var(&self) -> &'static str;

    /// Check if the provider is configured (has API key).
    fn is_configured(&self) -> bool;

    /// Generate text from messages.
    async fn generate_text(
        &self,
        model: &str,
        messages: &[AIMessage],
        options: &GenerateOptions,
    ) -> TasksResult<AIResponse>;
}

fn fenced_block() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)```[ \t]*(?:json|JSON)?[ \t]*\r?\n(.*?)```")
            .unwrap_or_else(|e| unreachable!("fence pattern is valid: {e}"))
    })
}

/// The JSON payload of a response: the first fenced code block, or the
/// whole trimmed text when there is no fence.
pub fn extract_json(text: &str) -> &str {
    fenced_block()
        .captures(text)
        .and_then(|c| c.get(1))
        .map_or_else(|| text.trim(), |m| m.as_str().trim())
}

/// Deserialize the JSON payload of a response.
///
/// This is a standalone function rather than a trait method because
/// generic methods are not dyn-compatible.
pub fn parse_ai_response<T: DeserializeOwned>(response: &AIResponse) -> TasksResult<T> {
    let json_text = extract_json(&response.text);
    serde_json::from_str(json_text).map_err(|e| TasksError::AiResponseParseError {
        reason: format!("Failed to parse AI response as JSON: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(text: &str) -> AIResponse {
        AIResponse {
            text: text.to_string(),
            usage: TokenUsage::default(),
            model: "test".to_string(),
            provider: "test".to_string(),
        }
    }

    #[test]
    fn test_extracts_first_fenced_block() {
        let text = "Here you go:\n```json\n{\"a\": 1}\n```\nand also\n```json\n{\"a\": 2}\n```";
        assert_eq!(extract_json(text), "{\"a\": 1}");
    }

    #[test]
    fn test_extracts_unlabelled_fence() {
        let text = "```\n[1, 2]\n```";
        assert_eq!(extract_json(text), "[1, 2]");
    }

    #[test]
    fn test_falls_back_to_whole_text() {
        assert_eq!(extract_json("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_failure_is_parse_error() {
        let result: TasksResult<Vec<u32>> = parse_ai_response(&response("no json here"));
        assert!(matches!(
            result,
            Err(TasksError::AiResponseParseError { .. })
        ));
    }

    #[test]
    fn test_parse_fenced_payload() {
        let parsed: Vec<u32> =
            parse_ai_response(&response("Sure!\n```json\n[3, 4]\n```")).unwrap();
        assert_eq!(parsed, vec![3, 4]);
    }
}
