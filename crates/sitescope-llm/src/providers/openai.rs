//! OpenAI-compatible hosted chat-completion provider.

use crate::error::{LlmError, Result};
use crate::provider::{CompletionRequest, CompletionResponse, LlmProvider, Role};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Request timeout for the hosted API.
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Hosted chat-completion API provider (OpenAI-compatible wire shape).
///
/// Bearer-token authenticated. Auth failures, rate limits and unknown
/// models map to distinct error classes so the run controller can abort
/// with a precise message before any page is crawled.
pub struct OpenAiProvider {
    api_key: String,
    model: String,
    client: Client,
    base_url: String,
}

impl OpenAiProvider {
    /// Create a new provider against a custom base URL.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn with_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            api_key: api_key.into(),
            model: model.into(),
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Convert internal request to the chat-completion wire format.
    fn to_api_request(&self, request: &CompletionRequest) -> ChatRequest {
        let mut messages = Vec::new();

        if let Some(system) = &request.system_prompt {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }

        for message in &request.messages {
            messages.push(ChatMessage {
                role: match message.role {
                    Role::System => "system".to_string(),
                    Role::User => "user".to_string(),
                    Role::Assistant => "assistant".to_string(),
                },
                content: message.content.clone(),
            });
        }

        ChatRequest {
            model: self.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }

    fn map_status_error(&self, status: u16, message: String) -> LlmError {
        match status {
            401 | 403 => LlmError::AuthenticationFailed {
                provider: "openai".to_string(),
                message,
            },
            404 => LlmError::ModelNotFound {
                provider: "openai".to_string(),
                model: self.model.clone(),
            },
            429 => LlmError::RateLimitExceeded {
                provider: "openai".to_string(),
                message,
            },
            _ => LlmError::ApiError {
                provider: "openai".to_string(),
                status,
                message,
            },
        }
    }

    fn map_send_error(e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout {
                seconds: REQUEST_TIMEOUT_SECS,
            }
        } else {
            LlmError::Network(e)
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let api_request = self.to_api_request(&request);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&api_request)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(self.map_status_error(status.as_u16(), error_text));
        }

        let api_response: ChatResponse =
            response.json().await.map_err(|e| LlmError::ParseError {
                provider: "openai".to_string(),
                message: format!("Failed to parse response: {e}"),
            })?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::ParseError {
                provider: "openai".to_string(),
                message: "response contained no choices".to_string(),
            })?;

        Ok(CompletionResponse {
            content: choice.message.content,
            model: api_response.model,
            stop_reason: choice.finish_reason,
        })
    }

    async fn healthcheck(&self) -> Result<()> {
        let response = self
            .client
            .get(format!("{}/models", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "healthcheck failed".to_string());
            Err(self.map_status_error(status.as_u16(), message))
        }
    }

    fn provider_id(&self) -> &'static str {
        "openai"
    }
}

// Chat-completion wire types

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    model: String,
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    finish_reason: Option<String>,
}
