//! Sitescope Report - checkpoint persistence and report rendering.
//!
//! The run controller feeds this crate the growing
//! [`AggregateResult`](sitescope_core::AggregateResult): the
//! [`Checkpointer`] rewrites `intermediate_results.json` wholesale every
//! fifth analyzed page, and at the end of the run the JSON and Markdown
//! renderers produce the final reports.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod checkpoint;
pub mod error;
pub mod json;
pub mod markdown;

pub use checkpoint::{Checkpointer, CHECKPOINT_EVERY};
pub use error::{ReportError, Result};
pub use json::write_json_report;
pub use markdown::{render, write_markdown_report};
