//! Per-page analysis orchestration.
//!
//! For one [`PageRecord`], every stage runs exactly once behind the bounded
//! wrapper; a failure or timeout in any stage never prevents the others from
//! running or being recorded. The AI stage is sequenced strictly after the
//! four technical stages because its prompts embed their outcomes.

use crate::bounded::run_bounded;
use crate::error::Result;
use crate::stages::{accessibility, performance, seo, AiAnalyzer, LinkAuditor, TechnicalFindings};
use sitescope_core::{AnalysisConfig, AnalysisRecord, PageRecord};
use std::time::Duration;

/// Runs the analyzer set against one page at a time.
///
/// Pages are analyzed sequentially by the run controller; only the stages
/// within a page run concurrently. That keeps pressure on the shared
/// browser session and the AI provider predictable.
pub struct PageAnalyzer {
    links: LinkAuditor,
    ai: AiAnalyzer,
    deadline: Duration,
}

impl PageAnalyzer {
    /// Create an analyzer from the analysis settings and a ready AI stage.
    pub fn new(config: &AnalysisConfig, ai: AiAnalyzer) -> Result<Self> {
        Ok(Self {
            links: LinkAuditor::new(config)?,
            ai,
            deadline: Duration::from_secs(config.stage_deadline_secs),
        })
    }

    /// Run every stage against one page and assemble the record.
    ///
    /// Every field of the returned [`AnalysisRecord`] is populated, with
    /// the stage's result or its tagged fallback. An error escaping this
    /// method (not one of the wrapped stages) is the per-page catastrophic
    /// case; the caller records the page with `analysis: None` and
    /// continues the run.
    pub async fn analyze_page(&self, page: &PageRecord) -> Result<AnalysisRecord> {
        let deadline = self.deadline;

        let (links, accessibility, seo, performance) = tokio::join!(
            run_bounded("links", deadline, self.links.audit(page)),
            run_bounded("accessibility", deadline, async {
                accessibility::scan(page)
            }),
            run_bounded("seo", deadline, async { seo::scan(page) }),
            run_bounded("performance", deadline, async { performance::probe(page) }),
        );

        // Technical gate: all four outcomes are settled before the AI stage
        // sees them
        let findings = TechnicalFindings {
            links: &links,
            accessibility: &accessibility,
            seo: &seo,
            performance: &performance,
        };
        let ai = run_bounded("ai", deadline, self.ai.review(page, &findings)).await;

        Ok(AnalysisRecord {
            links,
            accessibility,
            seo,
            performance,
            ai,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CannedProvider, FailingProvider};
    use sitescope_core::{PageMetadata, SiteCategory, StageResult};
    use std::sync::Arc;

    fn page() -> PageRecord {
        PageRecord {
            url: "https://example.com/".to_string(),
            title: "Home - example".to_string(),
            html: r#"<html lang="en"><body><h1>Hi</h1><p>Welcome to example.</p></body></html>"#
                .to_string(),
            text_content: "Hi Welcome to example.".to_string(),
            metadata: PageMetadata::default(),
            status_code: 200,
            depth: 0,
            load_time_ms: 150,
            screenshot_path: None,
            archive_path: None,
        }
    }

    fn analyzer_with(provider: Arc<dyn sitescope_llm::LlmProvider>) -> PageAnalyzer {
        let ai = AiAnalyzer::new(provider, SiteCategory::Other, None, 256, 0.4);
        PageAnalyzer::new(&AnalysisConfig::default(), ai).expect("analyzer")
    }

    #[tokio::test]
    async fn test_all_five_stage_fields_present() {
        let analyzer = analyzer_with(Arc::new(CannedProvider::new("fine")));
        let record = analyzer.analyze_page(&page()).await.expect("analyze");

        assert!(record.links.is_ok());
        assert!(record.accessibility.is_ok());
        assert!(record.seo.is_ok());
        assert!(record.performance.is_ok());
        assert!(record.ai.is_ok());
    }

    #[tokio::test]
    async fn test_failing_ai_stage_does_not_block_others() {
        let analyzer = analyzer_with(Arc::new(FailingProvider));
        let record = analyzer.analyze_page(&page()).await.expect("analyze");

        assert!(record.links.is_ok());
        assert!(record.accessibility.is_ok());
        assert!(record.seo.is_ok());
        assert!(record.performance.is_ok());
        match &record.ai {
            StageResult::Failed { error, timed_out, .. } => {
                assert!(!timed_out);
                assert!(error.contains("ai stage failed"));
            }
            StageResult::Ok { .. } => panic!("ai stage should have failed"),
        }
    }

    #[tokio::test]
    async fn test_ai_prompts_embed_technical_outcomes() {
        // The canned provider counts calls: the seven sub-prompts only fire
        // after the technical stages settle, so a completed record implies
        // the gate held.
        let provider = Arc::new(CannedProvider::new("ok"));
        let analyzer = analyzer_with(provider.clone());
        let record = analyzer.analyze_page(&page()).await.expect("analyze");

        assert_eq!(provider.calls(), 7);
        assert!(record.ai.is_ok());
    }
}
