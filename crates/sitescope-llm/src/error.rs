//! Error types for the LLM subsystem.

use thiserror::Error;

/// Errors that can occur during LLM operations.
///
/// The distinguishable classes matter at startup: an authentication or
/// configuration failure aborts the run before the crawl begins, instead of
/// failing every page's AI stage identically later.
#[derive(Error, Debug)]
pub enum LlmError {
    /// Provider selection or credentials are unusable
    #[error("provider configuration error: {0}")]
    Configuration(String),

    /// API error with status code
    #[error("API error ({provider}): status {status}, {message}")]
    ApiError {
        /// Provider name
        provider: String,
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {provider}: {message}")]
    RateLimitExceeded {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Invalid API key or authentication failure
    #[error("authentication failed for {provider}: {message}")]
    AuthenticationFailed {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Requested model does not exist on the provider
    #[error("model not found on {provider}: {model}")]
    ModelNotFound {
        /// Provider name
        provider: String,
        /// Model identifier
        model: String,
    },

    /// Request validation error
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Response parsing error
    #[error("failed to parse response from {provider}: {message}")]
    ParseError {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Timeout error
    #[error("request timed out after {seconds}s")]
    Timeout {
        /// Timeout duration in seconds
        seconds: u64,
    },

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for LLM operations.
pub type Result<T> = std::result::Result<T, LlmError>;
