//! Sitescope Analyzer - per-page analysis orchestration with bounded,
//! failure-isolated stages.
//!
//! # How a page flows through
//!
//! 1. The run controller hands one `PageRecord` to [`PageAnalyzer`].
//! 2. The four technical stages (links, accessibility, seo, performance)
//!    run concurrently, each behind [`run_bounded`]: one attempt, one
//!    deadline, a tagged fallback on failure or timeout.
//! 3. Once all four settle, the AI stage fans its seven sub-prompts out
//!    concurrently against the configured LLM provider, embedding the
//!    technical outcomes in its prompts.
//! 4. The assembled `AnalysisRecord` always carries all five stage fields.
//!
//! After the last page, [`information_architecture`] folds the whole page
//! list into the run summary.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod bounded;
pub mod categorize;
pub mod error;
pub mod ia;
pub mod orchestrator;
pub mod prompts;
pub mod stages;

#[cfg(test)]
pub(crate) mod testing;

pub use bounded::{run_bounded, DEFAULT_DEADLINE};
pub use categorize::categorize;
pub use error::{AnalysisError, Result};
pub use ia::information_architecture;
pub use orchestrator::PageAnalyzer;
pub use stages::{AiAnalyzer, LinkAuditor, TechnicalFindings};
