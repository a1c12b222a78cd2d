//! Information-architecture pass: a pure cross-page function over the full
//! analyzed page list, producing the run summary handed to reporting.

use crate::categorize::categorize;
use sitescope_core::{
    AverageScores, Issue, IssueSeverity, PageResult, StageResult, Summary,
};
use std::collections::BTreeMap;

/// Depth past which pages are considered buried.
const DEEP_PAGE_THRESHOLD: usize = 4;

/// Accessibility score below which a page is flagged.
const LOW_ACCESSIBILITY_SCORE: u8 = 70;

/// Run the cross-page pass.
#[must_use]
pub fn information_architecture(pages: &[PageResult]) -> Summary {
    let mut issues = Vec::new();

    collect_title_issues(pages, &mut issues);
    collect_broken_link_issues(pages, &mut issues);
    collect_accessibility_issues(pages, &mut issues);
    collect_description_issues(pages, &mut issues);
    collect_depth_issues(pages, &mut issues);

    issues.sort_by(|a, b| b.severity.cmp(&a.severity));
    let recommendations = recommendations_for(&issues);

    Summary {
        pages_crawled: pages.len(),
        average_scores: average_scores(pages),
        issues,
        recommendations,
    }
}

fn push_issue(issues: &mut Vec<Issue>, severity: IssueSeverity, message: String, pages: Vec<String>) {
    let category = categorize(&message);
    issues.push(Issue {
        severity,
        category,
        message,
        pages,
    });
}

fn collect_title_issues(pages: &[PageResult], issues: &mut Vec<Issue>) {
    let untitled: Vec<String> = pages
        .iter()
        .filter(|p| p.page.title.trim().is_empty())
        .map(|p| p.page.url.clone())
        .collect();
    if !untitled.is_empty() {
        push_issue(
            issues,
            IssueSeverity::Serious,
            format!("{} page(s) have no title", untitled.len()),
            untitled,
        );
    }

    let mut by_title: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for p in pages {
        let title = p.page.title.trim();
        if !title.is_empty() {
            by_title.entry(title).or_default().push(p.page.url.clone());
        }
    }
    for (title, urls) in by_title {
        if urls.len() > 1 {
            push_issue(
                issues,
                IssueSeverity::Moderate,
                format!("Duplicate title \"{title}\" on {} pages", urls.len()),
                urls,
            );
        }
    }
}

fn collect_broken_link_issues(pages: &[PageResult], issues: &mut Vec<Issue>) {
    let mut total_broken = 0;
    let mut affected = Vec::new();
    for p in pages {
        if let Some(record) = &p.analysis {
            if let StageResult::Ok { result } = &record.links {
                if !result.broken.is_empty() {
                    total_broken += result.broken.len();
                    affected.push(p.page.url.clone());
                }
            }
        }
    }
    if total_broken > 0 {
        push_issue(
            issues,
            IssueSeverity::Serious,
            format!("{total_broken} broken link(s) across the site"),
            affected,
        );
    }
}

fn collect_accessibility_issues(pages: &[PageResult], issues: &mut Vec<Issue>) {
    let low: Vec<String> = pages
        .iter()
        .filter_map(|p| {
            let record = p.analysis.as_ref()?;
            match &record.accessibility {
                StageResult::Ok { result } if result.score < LOW_ACCESSIBILITY_SCORE => {
                    Some(p.page.url.clone())
                }
                _ => None,
            }
        })
        .collect();
    if !low.is_empty() {
        push_issue(
            issues,
            IssueSeverity::Serious,
            format!(
                "{} page(s) score below {LOW_ACCESSIBILITY_SCORE} on accessibility",
                low.len()
            ),
            low,
        );
    }
}

fn collect_description_issues(pages: &[PageResult], issues: &mut Vec<Issue>) {
    let missing: Vec<String> = pages
        .iter()
        .filter(|p| !p.page.metadata.meta_tags.contains_key("description"))
        .map(|p| p.page.url.clone())
        .collect();
    if !missing.is_empty() {
        push_issue(
            issues,
            IssueSeverity::Moderate,
            format!("{} page(s) missing a meta description", missing.len()),
            missing,
        );
    }
}

fn collect_depth_issues(pages: &[PageResult], issues: &mut Vec<Issue>) {
    let deep: Vec<String> = pages
        .iter()
        .filter(|p| p.page.depth >= DEEP_PAGE_THRESHOLD)
        .map(|p| p.page.url.clone())
        .collect();
    if !deep.is_empty() {
        push_issue(
            issues,
            IssueSeverity::Minor,
            format!(
                "{} page(s) buried at depth {DEEP_PAGE_THRESHOLD} or more",
                deep.len()
            ),
            deep,
        );
    }
}

fn recommendations_for(issues: &[Issue]) -> Vec<String> {
    let mut recs = Vec::new();
    for issue in issues {
        let rec = match issue.severity {
            IssueSeverity::Serious => format!("Fix first: {}", issue.message),
            IssueSeverity::Moderate => format!("Plan a fix: {}", issue.message),
            IssueSeverity::Minor => continue,
        };
        recs.push(rec);
    }
    if recs.is_empty() && !issues.is_empty() {
        recs.push("Only minor issues found; address them opportunistically".to_string());
    }
    recs
}

fn average_scores(pages: &[PageResult]) -> AverageScores {
    let mut accessibility = Vec::new();
    let mut seo = Vec::new();
    let mut performance = Vec::new();

    for p in pages {
        let Some(record) = &p.analysis else { continue };
        if let StageResult::Ok { result } = &record.accessibility {
            accessibility.push(f64::from(result.score));
        }
        if let StageResult::Ok { result } = &record.seo {
            seo.push(f64::from(result.score));
        }
        if let StageResult::Ok { result } = &record.performance {
            performance.push(f64::from(result.score));
        }
    }

    AverageScores {
        accessibility: mean(&accessibility),
        seo: mean(&seo),
        performance: mean(&performance),
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitescope_core::{
        AccessibilityReport, AiReport, AnalysisRecord, BrokenLink, IssueCategory, LinkReport,
        PageMetadata, PageRecord, PerformanceReport, SeoReport,
    };

    fn page(url: &str, title: &str, depth: usize) -> PageRecord {
        PageRecord {
            url: url.to_string(),
            title: title.to_string(),
            html: String::new(),
            text_content: String::new(),
            metadata: PageMetadata::default(),
            status_code: 200,
            depth,
            load_time_ms: 100,
            screenshot_path: None,
            archive_path: None,
        }
    }

    fn analysis(a11y_score: u8, seo_score: u8, broken: Vec<BrokenLink>) -> AnalysisRecord {
        AnalysisRecord {
            links: StageResult::ok(LinkReport {
                total: broken.len(),
                internal: 0,
                external: 0,
                checked: broken.len(),
                broken,
            }),
            accessibility: StageResult::ok(AccessibilityReport {
                score: a11y_score,
                violations: Vec::new(),
            }),
            seo: StageResult::ok(SeoReport {
                score: seo_score,
                checks: Vec::new(),
            }),
            performance: StageResult::ok(PerformanceReport {
                load_time_ms: 100,
                html_bytes: 1000,
                script_count: 0,
                stylesheet_count: 0,
                image_count: 0,
                score: 90,
            }),
            ai: StageResult::failed("disabled in test", false),
        }
    }

    fn result(page: PageRecord, analysis_record: Option<AnalysisRecord>) -> PageResult {
        PageResult {
            page,
            analysis: analysis_record,
            error: None,
        }
    }

    #[test]
    fn test_duplicate_titles_flagged() {
        let pages = vec![
            result(page("https://e.com/a", "Same", 1), Some(analysis(90, 90, vec![]))),
            result(page("https://e.com/b", "Same", 1), Some(analysis(90, 90, vec![]))),
            result(page("https://e.com/c", "Unique", 1), Some(analysis(90, 90, vec![]))),
        ];
        let summary = information_architecture(&pages);
        let dup = summary
            .issues
            .iter()
            .find(|i| i.message.contains("Duplicate title"))
            .expect("duplicate title issue");
        assert_eq!(dup.pages.len(), 2);
        assert_eq!(dup.category, IssueCategory::Seo);
    }

    #[test]
    fn test_broken_links_aggregated_site_wide() {
        let broken = vec![BrokenLink {
            url: "https://e.com/dead".to_string(),
            status: Some(404),
            reason: "HTTP 404".to_string(),
        }];
        let pages = vec![
            result(page("https://e.com/", "Home", 0), Some(analysis(90, 90, broken.clone()))),
            result(page("https://e.com/a", "A", 1), Some(analysis(90, 90, broken))),
        ];
        let summary = information_architecture(&pages);
        let issue = summary
            .issues
            .iter()
            .find(|i| i.category == IssueCategory::Links)
            .expect("broken link issue");
        assert!(issue.message.contains("2 broken link(s)"));
        assert_eq!(issue.severity, IssueSeverity::Serious);
    }

    #[test]
    fn test_low_accessibility_pages_flagged() {
        let pages = vec![
            result(page("https://e.com/", "Home", 0), Some(analysis(40, 90, vec![]))),
            result(page("https://e.com/a", "A", 1), Some(analysis(95, 90, vec![]))),
        ];
        let summary = information_architecture(&pages);
        let issue = summary
            .issues
            .iter()
            .find(|i| i.category == IssueCategory::Accessibility)
            .expect("accessibility issue");
        assert_eq!(issue.pages, vec!["https://e.com/"]);
    }

    #[test]
    fn test_average_scores_skip_failed_stages_and_failed_pages() {
        let pages = vec![
            result(page("https://e.com/", "Home", 0), Some(analysis(80, 60, vec![]))),
            result(page("https://e.com/a", "A", 1), Some(analysis(100, 80, vec![]))),
            PageResult {
                page: page("https://e.com/b", "B", 1),
                analysis: None,
                error: Some("merge failed".to_string()),
            },
        ];
        let summary = information_architecture(&pages);
        assert_eq!(summary.pages_crawled, 3);
        assert_eq!(summary.average_scores.accessibility, Some(90.0));
        assert_eq!(summary.average_scores.seo, Some(70.0));
    }

    #[test]
    fn test_issues_sorted_most_severe_first() {
        let pages = vec![
            result(page("https://e.com/deep/a/b/c/d", "Deep", 5), Some(analysis(40, 90, vec![]))),
        ];
        let summary = information_architecture(&pages);
        assert!(summary.issues.len() >= 2);
        assert_eq!(summary.issues[0].severity, IssueSeverity::Serious);
    }

    #[test]
    fn test_empty_run_produces_empty_summary() {
        let summary = information_architecture(&[]);
        assert_eq!(summary.pages_crawled, 0);
        assert!(summary.issues.is_empty());
        assert!(summary.recommendations.is_empty());
        assert!(summary.average_scores.accessibility.is_none());
    }
}
