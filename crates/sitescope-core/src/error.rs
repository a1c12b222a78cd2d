//! Core error types for the Sitescope application.
//!
//! This module defines the central error type used across all subsystems.
//! Each subsystem error is represented as a variant for clear error propagation.

use thiserror::Error;

/// Central error type for all Sitescope operations.
///
/// Each variant represents an error from a specific subsystem, allowing
/// for clear error propagation and handling across module boundaries.
#[derive(Error, Debug)]
pub enum AuditError {
    /// Configuration errors (file loading, parsing, validation)
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Browser automation errors (launch, navigation, page extraction)
    #[error("browser error: {0}")]
    Browser(String),

    /// Crawl errors (frontier, fetch, URL handling)
    #[error("crawl error: {0}")]
    Crawl(String),

    /// Analysis errors (stage execution, result merging)
    #[error("analysis error: {0}")]
    Analysis(String),

    /// LLM errors (provider connection, completions)
    #[error("LLM error: {0}")]
    Llm(String),

    /// Report errors (checkpoint and report rendering)
    #[error("report error: {0}")]
    Report(String),

    /// Validation errors (invalid input, constraints)
    #[error("validation error: {0}")]
    Validation(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory path
    #[error("could not determine config directory (XDG base directories not available)")]
    NoConfigDir,

    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config
    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// I/O error reading/writing config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Result type alias using `AuditError`.
pub type Result<T> = std::result::Result<T, AuditError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
