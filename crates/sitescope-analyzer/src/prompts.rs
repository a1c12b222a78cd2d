//! Prompt builders for the AI review stage.
//!
//! Each sub-prompt embeds the page text (truncated), the operator's context
//! and category, and for the narrative prompts the outcome of the
//! corresponding technical stage, so the model reviews findings instead of
//! guessing.

use scraper::{Html, Selector};
use serde::Serialize;
use sitescope_core::{PageRecord, SiteCategory, StageResult};

/// Character budget for page text embedded in a prompt.
const TEXT_BUDGET: usize = 4000;

/// Anchors sampled for the link-label prompt.
const ANCHOR_SAMPLE: usize = 30;

/// System prompt shared by all sub-reviews.
pub const SYSTEM_PROMPT: &str = "You are a website audit assistant. You review one page at a time. \
    Be specific, cite what you see, and keep each review under 200 words.";

/// Shared prompt header: what page this is and what the operator told us.
fn header(page: &PageRecord, category: SiteCategory, context: Option<&str>) -> String {
    let mut out = format!(
        "Page under review: {} (crawl depth {})\nSite category: {}\n",
        page.url, page.depth, category
    );
    if let Some(context) = context {
        out.push_str("Operator context: ");
        out.push_str(context);
        out.push('\n');
    }
    out
}

/// Truncate to a character budget on a char boundary.
#[must_use]
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    text.chars().take(max_chars).collect()
}

/// Render a technical stage outcome for embedding in a prompt.
fn stage_json<T: Serialize>(stage: &StageResult<T>) -> String {
    match stage {
        StageResult::Ok { result } => serde_json::to_string_pretty(result)
            .unwrap_or_else(|_| "unavailable (serialization failed)".to_string()),
        StageResult::Failed { error, .. } => format!("unavailable (stage failed: {error})"),
    }
}

pub fn accessibility_prompt<T: Serialize>(
    page: &PageRecord,
    category: SiteCategory,
    context: Option<&str>,
    stage: &StageResult<T>,
) -> String {
    format!(
        "{}Accessibility scan findings:\n{}\n\nExplain the impact of these findings on real \
         users and suggest the most valuable fixes, in priority order.",
        header(page, category, context),
        stage_json(stage)
    )
}

pub fn seo_prompt<T: Serialize>(
    page: &PageRecord,
    category: SiteCategory,
    context: Option<&str>,
    stage: &StageResult<T>,
) -> String {
    format!(
        "{}SEO checklist results:\n{}\n\nPage title: {:?}\n\nAssess how well this page is \
         positioned for search and what to change first.",
        header(page, category, context),
        stage_json(stage),
        page.title
    )
}

pub fn content_prompt(page: &PageRecord, category: SiteCategory, context: Option<&str>) -> String {
    format!(
        "{}Page text:\n{}\n\nReview the written content: clarity, tone, audience fit for a {} \
         site, and anything missing a visitor would expect.",
        header(page, category, context),
        truncate(&page.text_content, TEXT_BUDGET),
        category
    )
}

pub fn ux_prompt(page: &PageRecord, category: SiteCategory, context: Option<&str>) -> String {
    format!(
        "{}Page text:\n{}\n\nReview the user experience signals visible in this content: \
         navigation clarity, calls to action, trust signals, and obvious friction.",
        header(page, category, context),
        truncate(&page.text_content, TEXT_BUDGET)
    )
}

pub fn structured_data_prompt(
    page: &PageRecord,
    category: SiteCategory,
    context: Option<&str>,
) -> String {
    let blocks = if page.metadata.structured_data.is_empty() {
        "none found".to_string()
    } else {
        serde_json::to_string_pretty(&page.metadata.structured_data)
            .unwrap_or_else(|_| "unserializable".to_string())
    };
    format!(
        "{}JSON-LD structured data on this page:\n{}\n\nEvaluate whether the structured data is \
         appropriate for a {} site and what schema types are missing.",
        header(page, category, context),
        truncate(&blocks, TEXT_BUDGET),
        category
    )
}

pub fn link_text_prompt<T: Serialize>(
    page: &PageRecord,
    category: SiteCategory,
    context: Option<&str>,
    links_stage: &StageResult<T>,
) -> String {
    let anchors = sample_anchor_labels(&page.html);
    format!(
        "{}Link validation results:\n{}\n\nAnchor labels on this page:\n{}\n\nJudge the quality \
         of these link labels: are they descriptive out of context, or generic (\"click here\", \
         \"read more\")?",
        header(page, category, context),
        stage_json(links_stage),
        anchors.join("\n")
    )
}

pub fn performance_prompt<T: Serialize>(
    page: &PageRecord,
    category: SiteCategory,
    context: Option<&str>,
    stage: &StageResult<T>,
) -> String {
    format!(
        "{}Performance measurements:\n{}\n\nExplain what these numbers mean for visitors and \
         which reductions would pay off most.",
        header(page, category, context),
        stage_json(stage)
    )
}

/// Up to [`ANCHOR_SAMPLE`] `label -> href` pairs from the page.
fn sample_anchor_labels(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    doc.select(&selector)
        .take(ANCHOR_SAMPLE)
        .map(|el| {
            let label = el.text().collect::<String>();
            let label = label.split_whitespace().collect::<Vec<_>>().join(" ");
            let href = el.value().attr("href").unwrap_or("");
            format!("\"{label}\" -> {href}")
        })
        .collect()
}
