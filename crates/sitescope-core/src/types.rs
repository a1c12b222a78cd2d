//! Shared types used across the Sitescope application.
//!
//! This module defines the audit data model: the immutable record of a
//! crawled page, the per-stage result union, and the aggregate shapes handed
//! to the information-architecture pass and to reporting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// One crawled page.
///
/// Created by the page fetcher on successful load and never mutated after.
/// A URL is fetched at most once per run; `depth` is the depth at which the
/// URL was first discovered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    /// Canonical URL after redirects and normalization
    pub url: String,
    /// Document title (empty string when the page has none)
    pub title: String,
    /// Raw HTML as served
    pub html: String,
    /// Visible text with script/style/noscript content stripped
    pub text_content: String,
    /// Meta tags and structured data extracted from the document head
    pub metadata: PageMetadata,
    /// Final HTTP status code
    pub status_code: u16,
    /// Crawl depth at which this URL was first discovered (start URL = 0)
    pub depth: usize,
    /// Navigation wall time in milliseconds, as observed by the fetcher
    pub load_time_ms: u64,
    /// Path to the full-page screenshot, when capture was enabled and succeeded
    pub screenshot_path: Option<PathBuf>,
    /// Path to the archived raw HTML, when archival was enabled and succeeded
    pub archive_path: Option<PathBuf>,
}

/// Meta tags and structured data for one page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageMetadata {
    /// Meta tag name/property -> content
    pub meta_tags: BTreeMap<String, String>,
    /// Parsed JSON-LD blocks; malformed blocks are dropped at extraction
    pub structured_data: Vec<serde_json::Value>,
}

/// Outcome of one analyzer stage: the stage's result, or a tagged fallback.
///
/// Downstream consumers pattern-match on this instead of probing for field
/// presence. Every stage field of an [`AnalysisRecord`] is always populated
/// with one of these two variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageResult<T> {
    /// The stage completed within its deadline
    Ok {
        /// The stage's result, unchanged
        result: T,
    },
    /// The stage failed or timed out; a fallback stands in for the result
    Failed {
        /// Error message describing the failure
        error: String,
        /// True when the stage exceeded its deadline
        timed_out: bool,
        /// When the failure was recorded
        at: DateTime<Utc>,
    },
}

impl<T> StageResult<T> {
    /// Wrap a successful stage result.
    #[must_use]
    pub fn ok(result: T) -> Self {
        Self::Ok { result }
    }

    /// Record a stage failure, stamped with the current time.
    #[must_use]
    pub fn failed(error: impl Into<String>, timed_out: bool) -> Self {
        Self::Failed {
            error: error.into(),
            timed_out,
            at: Utc::now(),
        }
    }

    /// True if the stage completed.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    /// The stage result, if the stage completed.
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Ok { result } => Some(result),
            Self::Failed { .. } => None,
        }
    }
}

/// Result of the link validation stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkReport {
    /// Total anchors found on the page
    pub total: usize,
    /// Links resolving within the audited site
    pub internal: usize,
    /// Links resolving off-site
    pub external: usize,
    /// How many links were actually probed over HTTP
    pub checked: usize,
    /// Links that answered with an error status or did not answer at all
    pub broken: Vec<BrokenLink>,
}

/// One link that failed validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokenLink {
    /// The resolved link URL
    pub url: String,
    /// HTTP status, when a response was received
    pub status: Option<u16>,
    /// Human-readable failure reason
    pub reason: String,
}

/// Result of the accessibility rule scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessibilityReport {
    /// Weighted score, 0-100
    pub score: u8,
    /// Rule violations found on the page
    pub violations: Vec<Violation>,
}

/// One accessibility rule violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Stable rule identifier, e.g. `img-alt`
    pub rule: String,
    /// What the rule requires
    pub description: String,
    /// How serious a failure of this rule is
    pub severity: IssueSeverity,
    /// Number of offending elements
    pub count: usize,
}

/// Result of the SEO checklist stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeoReport {
    /// Pass-ratio score, 0-100
    pub score: u8,
    /// Individual checks with outcomes
    pub checks: Vec<SeoCheck>,
}

/// One SEO check outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeoCheck {
    /// Check identifier, e.g. `meta-description`
    pub name: String,
    /// Whether the page passed the check
    pub passed: bool,
    /// Detail for the report (observed value, threshold, ...)
    pub details: String,
}

/// Result of the performance stage, derived from fetch timing and HTML weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// Navigation wall time in milliseconds
    pub load_time_ms: u64,
    /// Size of the served HTML in bytes
    pub html_bytes: usize,
    /// Number of script tags
    pub script_count: usize,
    /// Number of stylesheet links
    pub stylesheet_count: usize,
    /// Number of images
    pub image_count: usize,
    /// Derived score, 0-100
    pub score: u8,
}

/// Narratives produced by the AI review stage.
///
/// Each field corresponds to one sub-prompt; a sub-prompt that failed leaves
/// its field `None` while the others still carry their narratives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiReport {
    /// Narrative on the accessibility findings
    pub accessibility_review: Option<String>,
    /// Narrative on the SEO findings
    pub seo_review: Option<String>,
    /// Review of the page's written content
    pub content_review: Option<String>,
    /// Review of the page's user experience
    pub ux_review: Option<String>,
    /// Review of structured data usage
    pub structured_data_review: Option<String>,
    /// Review of link label quality
    pub link_text_review: Option<String>,
    /// Narrative on the performance findings
    pub performance_review: Option<String>,
}

/// Per-page collection of analyzer stage outputs.
///
/// Every field is always present; consumers never special-case a missing
/// stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// Link validation outcome
    pub links: StageResult<LinkReport>,
    /// Accessibility scan outcome
    pub accessibility: StageResult<AccessibilityReport>,
    /// SEO checklist outcome
    pub seo: StageResult<SeoReport>,
    /// Performance probe outcome
    pub performance: StageResult<PerformanceReport>,
    /// AI review outcome
    pub ai: StageResult<AiReport>,
}

/// One entry of the aggregate result list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    /// The crawled page
    pub page: PageRecord,
    /// Stage outputs; `None` when analysis failed outside any stage wrapper
    pub analysis: Option<AnalysisRecord>,
    /// Error recorded when analysis failed outside any stage wrapper
    pub error: Option<String>,
}

/// The whole-run output: pages in fetch order plus the cross-page summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Per-page results, in the order pages were fetched
    pub pages: Vec<PageResult>,
    /// Cross-page summary; filled by the information-architecture pass
    pub summary: Option<Summary>,
}

impl AggregateResult {
    /// Create an empty aggregate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Cross-page summary produced by the information-architecture pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    /// Number of pages crawled
    pub pages_crawled: usize,
    /// Site-wide issues, most severe first
    pub issues: Vec<Issue>,
    /// Actionable recommendations derived from the issues
    pub recommendations: Vec<String>,
    /// Average stage scores across pages where the stage completed
    pub average_scores: AverageScores,
}

/// Average stage scores across the crawled site.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AverageScores {
    /// Mean accessibility score, when any page completed the stage
    pub accessibility: Option<f64>,
    /// Mean SEO score, when any page completed the stage
    pub seo: Option<f64>,
    /// Mean performance score, when any page completed the stage
    pub performance: Option<f64>,
}

/// One site-wide issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// How serious the issue is
    pub severity: IssueSeverity,
    /// Which audit area the issue belongs to
    pub category: IssueCategory,
    /// Human-readable description
    pub message: String,
    /// URLs of the affected pages
    pub pages: Vec<String>,
}

/// Severity of an issue or violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    /// Cosmetic or informational
    Minor,
    /// Should be fixed
    Moderate,
    /// Actively harms users or rankings
    Serious,
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Minor => "minor",
            Self::Moderate => "moderate",
            Self::Serious => "serious",
        };
        write!(f, "{s}")
    }
}

/// Audit area an issue is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueCategory {
    /// Accessibility problems
    Accessibility,
    /// Search engine optimization problems
    Seo,
    /// Loading and rendering cost problems
    Performance,
    /// Broken or low-quality links
    Links,
    /// Content quality problems
    Content,
    /// Navigation and site structure problems
    Structure,
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Accessibility => "accessibility",
            Self::Seo => "seo",
            Self::Performance => "performance",
            Self::Links => "links",
            Self::Content => "content",
            Self::Structure => "structure",
        };
        write!(f, "{s}")
    }
}

/// Operator-supplied site category; shapes the AI review prompts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteCategory {
    /// Online store
    Ecommerce,
    /// Blog or news site
    Blog,
    /// Corporate or marketing site
    Corporate,
    /// Documentation site
    Documentation,
    /// Personal portfolio
    Portfolio,
    /// Anything else
    #[default]
    Other,
}

impl fmt::Display for SiteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ecommerce => "ecommerce",
            Self::Blog => "blog",
            Self::Corporate => "corporate",
            Self::Documentation => "documentation",
            Self::Portfolio => "portfolio",
            Self::Other => "other",
        };
        write!(f, "{s}")
    }
}
