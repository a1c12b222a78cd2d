use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{stage} stage failed: {message}")]
    Stage { stage: String, message: String },

    #[error("LLM error: {0}")]
    Llm(#[from] sitescope_llm::LlmError),

    #[error("failed to merge analysis results: {0}")]
    Merge(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AnalysisError {
    /// Shorthand for a named stage failure.
    #[must_use]
    pub fn stage(stage: &str, message: impl Into<String>) -> Self {
        Self::Stage {
            stage: stage.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_error_display() {
        let err = AnalysisError::stage("links", "probe pool exhausted");
        assert_eq!(err.to_string(), "links stage failed: probe pool exhausted");
    }
}
