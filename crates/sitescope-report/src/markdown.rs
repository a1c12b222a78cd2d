//! Markdown report: the human-readable run summary plus a section per page.

use crate::error::Result;
use chrono::Utc;
use sitescope_core::{AggregateResult, AnalysisRecord, PageResult, StageResult, Summary};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Write `report.md` under `output_dir`.
pub fn write_markdown_report(output_dir: &Path, aggregate: &AggregateResult) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join("report.md");
    fs::write(&path, render(aggregate))?;
    Ok(path)
}

/// Render the whole report.
#[must_use]
pub fn render(aggregate: &AggregateResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Site audit report");
    let _ = writeln!(out);
    let _ = writeln!(out, "Generated: {}", Utc::now().to_rfc3339());
    let _ = writeln!(out, "Pages analyzed: {}", aggregate.pages.len());
    let _ = writeln!(out);

    if let Some(summary) = &aggregate.summary {
        render_summary(&mut out, summary);
    }

    let _ = writeln!(out, "## Pages");
    let _ = writeln!(out);
    for page_result in &aggregate.pages {
        render_page(&mut out, page_result);
    }

    out
}

fn render_summary(out: &mut String, summary: &Summary) {
    let _ = writeln!(out, "## Summary");
    let _ = writeln!(out);

    let scores = &summary.average_scores;
    let _ = writeln!(out, "| Area | Average score |");
    let _ = writeln!(out, "|---|---|");
    let _ = writeln!(out, "| Accessibility | {} |", fmt_score(scores.accessibility));
    let _ = writeln!(out, "| SEO | {} |", fmt_score(scores.seo));
    let _ = writeln!(out, "| Performance | {} |", fmt_score(scores.performance));
    let _ = writeln!(out);

    if !summary.issues.is_empty() {
        let _ = writeln!(out, "### Issues");
        let _ = writeln!(out);
        for issue in &summary.issues {
            let _ = writeln!(
                out,
                "- **{}** [{}] {} ({} page(s))",
                issue.severity,
                issue.category,
                issue.message,
                issue.pages.len()
            );
        }
        let _ = writeln!(out);
    }

    if !summary.recommendations.is_empty() {
        let _ = writeln!(out, "### Recommendations");
        let _ = writeln!(out);
        for rec in &summary.recommendations {
            let _ = writeln!(out, "- {rec}");
        }
        let _ = writeln!(out);
    }
}

fn render_page(out: &mut String, page_result: &PageResult) {
    let page = &page_result.page;
    let _ = writeln!(out, "### {}", page.url);
    let _ = writeln!(out);
    let title = if page.title.is_empty() {
        "(untitled)"
    } else {
        &page.title
    };
    let _ = writeln!(
        out,
        "{title} (HTTP {}, depth {}, loaded in {}ms)",
        page.status_code, page.depth, page.load_time_ms
    );
    let _ = writeln!(out);

    match (&page_result.analysis, &page_result.error) {
        (Some(record), _) => render_stages(out, record),
        (None, Some(error)) => {
            let _ = writeln!(out, "Analysis failed: {error}");
            let _ = writeln!(out);
        }
        (None, None) => {
            let _ = writeln!(out, "Analysis missing");
            let _ = writeln!(out);
        }
    }
}

fn render_stages(out: &mut String, record: &AnalysisRecord) {
    match &record.links {
        StageResult::Ok { result } => {
            let _ = writeln!(
                out,
                "- links: {} total ({} internal, {} external), {} checked, {} broken",
                result.total,
                result.internal,
                result.external,
                result.checked,
                result.broken.len()
            );
            for broken in &result.broken {
                let _ = writeln!(out, "  - broken: {} ({})", broken.url, broken.reason);
            }
        }
        StageResult::Failed { error, .. } => {
            let _ = writeln!(out, "- links: unavailable ({error})");
        }
    }

    match &record.accessibility {
        StageResult::Ok { result } => {
            let _ = writeln!(
                out,
                "- accessibility: score {}, {} violation type(s)",
                result.score,
                result.violations.len()
            );
            for violation in &result.violations {
                let _ = writeln!(
                    out,
                    "  - [{}] {} ({}x)",
                    violation.severity, violation.description, violation.count
                );
            }
        }
        StageResult::Failed { error, .. } => {
            let _ = writeln!(out, "- accessibility: unavailable ({error})");
        }
    }

    match &record.seo {
        StageResult::Ok { result } => {
            let failed: Vec<_> = result.checks.iter().filter(|c| !c.passed).collect();
            let _ = writeln!(
                out,
                "- seo: score {}, {} failing check(s)",
                result.score,
                failed.len()
            );
            for check in failed {
                let _ = writeln!(out, "  - {}: {}", check.name, check.details);
            }
        }
        StageResult::Failed { error, .. } => {
            let _ = writeln!(out, "- seo: unavailable ({error})");
        }
    }

    match &record.performance {
        StageResult::Ok { result } => {
            let _ = writeln!(
                out,
                "- performance: score {}, {} bytes HTML, {} scripts, {} images",
                result.score, result.html_bytes, result.script_count, result.image_count
            );
        }
        StageResult::Failed { error, .. } => {
            let _ = writeln!(out, "- performance: unavailable ({error})");
        }
    }

    match &record.ai {
        StageResult::Ok { result } => {
            let _ = writeln!(out, "- ai review:");
            for (label, review) in [
                ("accessibility", &result.accessibility_review),
                ("seo", &result.seo_review),
                ("content", &result.content_review),
                ("ux", &result.ux_review),
                ("structured data", &result.structured_data_review),
                ("link text", &result.link_text_review),
                ("performance", &result.performance_review),
            ] {
                if let Some(text) = review {
                    let _ = writeln!(out, "  - {label}: {text}");
                }
            }
        }
        StageResult::Failed { error, timed_out, .. } => {
            let cause = if *timed_out { "timed out" } else { "failed" };
            let _ = writeln!(out, "- ai review: {cause} ({error})");
        }
    }

    let _ = writeln!(out);
}

fn fmt_score(score: Option<f64>) -> String {
    score.map_or_else(|| "n/a".to_string(), |s| format!("{s:.0}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitescope_core::{
        AccessibilityReport, AiReport, AverageScores, Issue, IssueCategory, IssueSeverity,
        LinkReport, PageMetadata, PageRecord, PerformanceReport,
    };

    fn sample_aggregate() -> AggregateResult {
        let page = PageRecord {
            url: "https://example.com/".to_string(),
            title: "Home".to_string(),
            html: String::new(),
            text_content: String::new(),
            metadata: PageMetadata::default(),
            status_code: 200,
            depth: 0,
            load_time_ms: 250,
            screenshot_path: None,
            archive_path: None,
        };
        let record = AnalysisRecord {
            links: StageResult::ok(LinkReport::default()),
            accessibility: StageResult::ok(AccessibilityReport {
                score: 85,
                violations: Vec::new(),
            }),
            seo: StageResult::failed("timed out after 300s", true),
            performance: StageResult::ok(PerformanceReport {
                load_time_ms: 250,
                html_bytes: 1024,
                script_count: 2,
                stylesheet_count: 1,
                image_count: 3,
                score: 100,
            }),
            ai: StageResult::ok(AiReport {
                content_review: Some("Clear copy.".to_string()),
                ..AiReport::default()
            }),
        };
        AggregateResult {
            pages: vec![PageResult {
                page,
                analysis: Some(record),
                error: None,
            }],
            summary: Some(Summary {
                pages_crawled: 1,
                issues: vec![Issue {
                    severity: IssueSeverity::Moderate,
                    category: IssueCategory::Seo,
                    message: "1 page(s) missing a meta description".to_string(),
                    pages: vec!["https://example.com/".to_string()],
                }],
                recommendations: vec!["Plan a fix: 1 page(s) missing a meta description".to_string()],
                average_scores: AverageScores {
                    accessibility: Some(85.0),
                    seo: None,
                    performance: Some(100.0),
                },
            }),
        }
    }

    #[test]
    fn test_render_contains_summary_and_page() {
        let report = render(&sample_aggregate());
        assert!(report.contains("# Site audit report"));
        assert!(report.contains("## Summary"));
        assert!(report.contains("missing a meta description"));
        assert!(report.contains("### https://example.com/"));
        assert!(report.contains("accessibility: score 85"));
        assert!(report.contains("seo: unavailable"));
        assert!(report.contains("content: Clear copy."));
    }

    #[test]
    fn test_failed_page_renders_error() {
        let mut aggregate = sample_aggregate();
        aggregate.pages[0].analysis = None;
        aggregate.pages[0].error = Some("merge blew up".to_string());
        let report = render(&aggregate);
        assert!(report.contains("Analysis failed: merge blew up"));
    }

    #[test]
    fn test_write_markdown_report() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let path = write_markdown_report(tmp.path(), &sample_aggregate()).expect("write");
        let contents = fs::read_to_string(path).expect("read");
        assert!(contents.contains("# Site audit report"));
    }
}
