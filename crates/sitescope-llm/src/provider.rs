//! Core LLM provider trait and request/response types.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Trait for LLM providers supporting single-shot completion.
///
/// The audit pipeline depends on exactly this surface: send a prompt, get
/// text back. Provider implementations must be thread-safe (Send + Sync)
/// for use in async contexts.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Complete a prompt with a single response.
    ///
    /// # Errors
    /// Returns error if the provider fails, network issues occur, or
    /// response parsing fails.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Verify the provider is reachable and usable.
    ///
    /// Called once before the crawl starts; a failure here is fatal to the
    /// run.
    ///
    /// # Errors
    /// Returns the same error classes as [`complete`](Self::complete).
    async fn healthcheck(&self) -> Result<()>;

    /// Get the unique identifier for this provider.
    fn provider_id(&self) -> &str;
}

/// Request for LLM completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The prompt or conversation messages
    pub messages: Vec<Message>,

    /// Maximum tokens to generate (optional)
    pub max_tokens: Option<u32>,

    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative)
    pub temperature: Option<f32>,

    /// System prompt (optional)
    pub system_prompt: Option<String>,
}

impl CompletionRequest {
    /// Create a new completion request with a simple user message.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(content)],
            max_tokens: None,
            temperature: None,
            system_prompt: None,
        }
    }

    /// Set the maximum tokens to generate.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the system prompt.
    #[must_use]
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }
}

/// A message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: Role,

    /// Content of the message
    pub content: String,
}

impl Message {
    /// Create a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System message (instructions, context)
    System,
    /// User message (prompt, question)
    User,
    /// Assistant message (response)
    Assistant,
}

/// Response from LLM completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// The generated text
    pub content: String,

    /// Model that generated the response
    pub model: String,

    /// Stop reason (e.g., "`stop`", "`length`")
    pub stop_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_request_builder() {
        let req = CompletionRequest::new("Review this page")
            .with_max_tokens(256)
            .with_temperature(0.4)
            .with_system_prompt("You are a website auditor");

        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.messages[0].content, "Review this page");
        assert_eq!(req.max_tokens, Some(256));
        assert_eq!(req.temperature, Some(0.4));
        assert_eq!(
            req.system_prompt,
            Some("You are a website auditor".to_string())
        );
    }

    #[test]
    fn test_message_constructors() {
        let user_msg = Message::user("Hello");
        assert_eq!(user_msg.role, Role::User);
        assert_eq!(user_msg.content, "Hello");

        let system_msg = Message::system("You are helpful");
        assert_eq!(system_msg.role, Role::System);
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(
            serde_json::to_string(&Role::User).expect("serialize role"),
            "\"user\""
        );
        assert_eq!(
            serde_json::to_string(&Role::System).expect("serialize role"),
            "\"system\""
        );
    }
}
