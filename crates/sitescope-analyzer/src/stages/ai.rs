//! AI review stage: a second-pass, cross-cutting review whose prompts embed
//! the outcomes of the four technical stages.
//!
//! The seven sub-prompts run concurrently with each other, but the stage as
//! a whole is only invoked after the technical stages have settled; the
//! orchestrator enforces that gate.

use crate::error::{AnalysisError, Result};
use crate::prompts;
use sitescope_core::{
    AccessibilityReport, AiReport, LinkReport, PageRecord, PerformanceReport, SeoReport,
    SiteCategory, StageResult,
};
use sitescope_llm::{CompletionRequest, LlmProvider};
use std::sync::Arc;

/// Borrowed outcomes of the technical stages, as prompt inputs.
pub struct TechnicalFindings<'a> {
    /// Link validation outcome
    pub links: &'a StageResult<LinkReport>,
    /// Accessibility scan outcome
    pub accessibility: &'a StageResult<AccessibilityReport>,
    /// SEO checklist outcome
    pub seo: &'a StageResult<SeoReport>,
    /// Performance probe outcome
    pub performance: &'a StageResult<PerformanceReport>,
}

/// Drives the sub-prompt fan-out against the configured provider.
pub struct AiAnalyzer {
    provider: Arc<dyn LlmProvider>,
    category: SiteCategory,
    context: Option<String>,
    max_tokens: u32,
    temperature: f32,
}

impl AiAnalyzer {
    /// Create an analyzer.
    #[must_use]
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        category: SiteCategory,
        context: Option<String>,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        Self {
            provider,
            category,
            context,
            max_tokens,
            temperature,
        }
    }

    /// Review one page.
    ///
    /// An individual sub-prompt failure degrades that narrative to `None`
    /// (logged); the stage only fails when every sub-prompt failed, which
    /// almost always means the provider itself is down.
    pub async fn review(
        &self,
        page: &PageRecord,
        findings: &TechnicalFindings<'_>,
    ) -> Result<AiReport> {
        let category = self.category;
        let context = self.context.as_deref();

        let (
            accessibility_review,
            seo_review,
            content_review,
            ux_review,
            structured_data_review,
            link_text_review,
            performance_review,
        ) = tokio::join!(
            self.sub_review(
                "accessibility",
                prompts::accessibility_prompt(page, category, context, findings.accessibility),
            ),
            self.sub_review(
                "seo",
                prompts::seo_prompt(page, category, context, findings.seo),
            ),
            self.sub_review("content", prompts::content_prompt(page, category, context)),
            self.sub_review("ux", prompts::ux_prompt(page, category, context)),
            self.sub_review(
                "structured-data",
                prompts::structured_data_prompt(page, category, context),
            ),
            self.sub_review(
                "link-text",
                prompts::link_text_prompt(page, category, context, findings.links),
            ),
            self.sub_review(
                "performance",
                prompts::performance_prompt(page, category, context, findings.performance),
            ),
        );

        let report = AiReport {
            accessibility_review,
            seo_review,
            content_review,
            ux_review,
            structured_data_review,
            link_text_review,
            performance_review,
        };

        if all_none(&report) {
            return Err(AnalysisError::stage(
                "ai",
                "all sub-prompts failed; provider is unusable",
            ));
        }
        Ok(report)
    }

    async fn sub_review(&self, label: &str, prompt: String) -> Option<String> {
        let request = CompletionRequest::new(prompt)
            .with_system_prompt(prompts::SYSTEM_PROMPT)
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature);

        match self.provider.complete(request).await {
            Ok(response) => Some(response.content),
            Err(e) => {
                tracing::warn!("{} sub-review failed: {}", label, e);
                None
            }
        }
    }
}

fn all_none(report: &AiReport) -> bool {
    report.accessibility_review.is_none()
        && report.seo_review.is_none()
        && report.content_review.is_none()
        && report.ux_review.is_none()
        && report.structured_data_review.is_none()
        && report.link_text_review.is_none()
        && report.performance_review.is_none()
}
