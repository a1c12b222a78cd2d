//! Fake LLM providers for analyzer tests.

use sitescope_llm::{
    CompletionRequest, CompletionResponse, LlmError, LlmProvider, Result as LlmResult,
};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Provider that answers every prompt with the same text.
pub struct CannedProvider {
    answer: String,
    calls: AtomicUsize,
}

impl CannedProvider {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl LlmProvider for CannedProvider {
    async fn complete(&self, _request: CompletionRequest) -> LlmResult<CompletionResponse> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(CompletionResponse {
            content: self.answer.clone(),
            model: "canned".to_string(),
            stop_reason: Some("stop".to_string()),
        })
    }

    async fn healthcheck(&self) -> LlmResult<()> {
        Ok(())
    }

    fn provider_id(&self) -> &'static str {
        "canned"
    }
}

/// Provider that fails every call.
pub struct FailingProvider;

#[async_trait::async_trait]
impl LlmProvider for FailingProvider {
    async fn complete(&self, _request: CompletionRequest) -> LlmResult<CompletionResponse> {
        Err(LlmError::Internal("simulated provider outage".to_string()))
    }

    async fn healthcheck(&self) -> LlmResult<()> {
        Err(LlmError::Internal("simulated provider outage".to_string()))
    }

    fn provider_id(&self) -> &'static str {
        "failing"
    }
}
