//! Ollama local LLM provider implementation.

use crate::error::{LlmError, Result};
use crate::provider::{CompletionRequest, CompletionResponse, LlmProvider, Role};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Request timeout for the local model server.
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Ollama local LLM provider.
///
/// Connects to a local model-serving endpoint; no data leaves the machine
/// and no credentials are involved.
pub struct OllamaProvider {
    model: String,
    client: Client,
    base_url: String,
}

impl OllamaProvider {
    /// Create a new Ollama provider with custom URL and model.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn with_url(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| LlmError::Internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            model: model.into(),
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Convert internal request to Ollama API format.
    fn to_api_request(&self, request: &CompletionRequest) -> OllamaRequest {
        // Ollama's generate endpoint takes one flat prompt
        let mut prompt_parts = Vec::new();

        if let Some(system) = &request.system_prompt {
            prompt_parts.push(format!("System: {system}"));
        }

        for message in &request.messages {
            let prefix = match message.role {
                Role::User => "User:",
                Role::Assistant => "Assistant:",
                Role::System => "System:",
            };
            prompt_parts.push(format!("{prefix} {}", message.content));
        }

        prompt_parts.push("Assistant:".to_string());

        OllamaRequest {
            model: self.model.clone(),
            prompt: prompt_parts.join("\n\n"),
            stream: false,
            options: OllamaOptions {
                temperature: request.temperature,
                num_predict: request
                    .max_tokens
                    .map(i32::try_from)
                    .transpose()
                    .ok()
                    .flatten(),
            },
        }
    }

    fn convert_api_response(response: OllamaResponse) -> CompletionResponse {
        CompletionResponse {
            content: response.response,
            model: response.model,
            stop_reason: if response.done {
                Some("stop".to_string())
            } else {
                None
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
impl LlmProvider for OllamaProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let api_request = self.to_api_request(&request);

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
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
            if status.as_u16() == 404 {
                return Err(LlmError::ModelNotFound {
                    provider: "ollama".to_string(),
                    model: self.model.clone(),
                });
            }
            return Err(LlmError::ApiError {
                provider: "ollama".to_string(),
                status: status.as_u16(),
                message: error_text,
            });
        }

        let api_response: OllamaResponse =
            response.json().await.map_err(|e| LlmError::ParseError {
                provider: "ollama".to_string(),
                message: format!("Failed to parse response: {e}"),
            })?;

        Ok(Self::convert_api_response(api_response))
    }

    async fn healthcheck(&self) -> Result<()> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
            .map_err(|e| {
                LlmError::Configuration(format!(
                    "local model server unreachable at {}: {e}",
                    self.base_url
                ))
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(LlmError::ApiError {
                provider: "ollama".to_string(),
                status: response.status().as_u16(),
                message: "healthcheck failed".to_string(),
            })
        }
    }

    fn provider_id(&self) -> &'static str {
        "ollama"
    }
}

// Ollama API types

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Default, Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    model: String,
    response: String,
    done: bool,
}
