//! LLM provider implementations.

pub mod ollama;
pub mod openai;

pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

use crate::error::{LlmError, Result};
use crate::provider::LlmProvider;
use sitescope_core::LlmConfig;
use std::sync::Arc;

/// Build the configured provider.
///
/// This is the initialization gate for the AI stage: a bad provider name or
/// missing credentials fails here, before any page is crawled.
///
/// # Errors
/// Returns [`LlmError::Configuration`] for an unknown provider name or a
/// hosted provider without an API key.
pub fn build_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>> {
    match config.provider.as_str() {
        "ollama" => {
            let provider = OllamaProvider::with_url(&config.ollama_url, &config.model)?;
            Ok(Arc::new(provider))
        }
        "openai" => {
            let api_key = config.api_key.as_deref().ok_or_else(|| {
                LlmError::Configuration(
                    "no API key configured for provider 'openai' (set SITESCOPE_API_KEY)"
                        .to_string(),
                )
            })?;
            let provider = OpenAiProvider::with_url(&config.api_base_url, api_key, &config.model)?;
            Ok(Arc::new(provider))
        }
        other => Err(LlmError::Configuration(format!(
            "unknown LLM provider '{other}' (expected 'ollama' or 'openai')"
        ))),
    }
}
