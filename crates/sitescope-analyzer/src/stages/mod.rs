//! Analyzer stages. The four technical stages (links, accessibility, seo,
//! performance) are independent; the AI stage consumes their outcomes.

pub mod accessibility;
pub mod ai;
pub mod links;
pub mod performance;
pub mod seo;

pub use ai::{AiAnalyzer, TechnicalFindings};
pub use links::LinkAuditor;
