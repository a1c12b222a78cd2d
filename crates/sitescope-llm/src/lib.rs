//! Sitescope LLM - provider abstraction for the AI review stage.
//!
//! This crate provides a unified interface over two chat-completion
//! backends: a local model-serving endpoint (Ollama) and a hosted
//! bearer-token API (OpenAI-compatible). The audit pipeline depends only on
//! the [`LlmProvider`] trait (send a prompt, get text back), so tests and
//! the orchestrator never care which backend is configured.
//!
//! # Example
//!
//! ```rust,ignore
//! use sitescope_llm::{build_provider, CompletionRequest};
//!
//! let provider = build_provider(&config.llm)?;
//! provider.healthcheck().await?; // fatal before the crawl if this fails
//!
//! let response = provider
//!     .complete(CompletionRequest::new("Summarize this page"))
//!     .await?;
//! println!("{}", response.content);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod error;
pub mod provider;
pub mod providers;

// Re-export commonly used types
pub use error::{LlmError, Result};
pub use provider::{CompletionRequest, CompletionResponse, LlmProvider, Message, Role};
pub use providers::{build_provider, OllamaProvider, OpenAiProvider};
