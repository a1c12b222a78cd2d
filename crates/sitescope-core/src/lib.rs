//! Sitescope Core - Foundation crate for the Sitescope website auditor.
//!
//! This crate provides the shared data model, error handling and
//! configuration management that all other Sitescope crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - The audit data model (`PageRecord`, `StageResult`,
//!   `AnalysisRecord`, `AggregateResult`)
//!
//! # Example
//!
//! ```rust
//! use sitescope_core::{AppConfig, StageResult};
//!
//! let config = AppConfig::default();
//! assert!(config.browser.headless);
//!
//! let outcome: StageResult<u32> = StageResult::failed("deadline exceeded", true);
//! assert!(!outcome.is_ok());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{
    AnalysisConfig, AppConfig, BasicAuth, BrowserConfig, CrawlConfig, LlmConfig, ReportConfig,
};
pub use error::{AuditError, ConfigError, ConfigResult, Result};
pub use types::{
    AccessibilityReport, AggregateResult, AiReport, AnalysisRecord, AverageScores, BrokenLink,
    Issue, IssueCategory, IssueSeverity, LinkReport, PageMetadata, PageRecord, PageResult,
    PerformanceReport, SeoCheck, SeoReport, SiteCategory, StageResult, Summary, Violation,
};
