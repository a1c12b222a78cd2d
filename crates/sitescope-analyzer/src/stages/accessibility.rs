//! Accessibility rule scan over the served HTML.
//!
//! A fixed rule set, not a full WCAG engine: each rule counts offending
//! elements and contributes a severity-weighted penalty to the score.

use crate::error::Result;
use scraper::{ElementRef, Html, Selector};
use sitescope_core::{AccessibilityReport, IssueSeverity, PageRecord, Violation};

/// Penalty per offending element, by severity.
fn penalty(severity: IssueSeverity) -> u32 {
    match severity {
        IssueSeverity::Serious => 10,
        IssueSeverity::Moderate => 5,
        IssueSeverity::Minor => 2,
    }
}

/// Scan one page.
pub fn scan(page: &PageRecord) -> Result<AccessibilityReport> {
    let doc = Html::parse_document(&page.html);
    let mut violations = Vec::new();

    push_rule(
        &mut violations,
        "img-alt",
        "Images must have an alt attribute",
        IssueSeverity::Serious,
        count_selected(&doc, "img:not([alt])"),
    );

    push_rule(
        &mut violations,
        "html-lang",
        "The html element must declare a lang attribute",
        IssueSeverity::Serious,
        count_selected(&doc, "html:not([lang])"),
    );

    push_rule(
        &mut violations,
        "input-label",
        "Form inputs must be labelled",
        IssueSeverity::Moderate,
        count_unlabelled_inputs(&doc),
    );

    push_rule(
        &mut violations,
        "link-name",
        "Links must have discernible text",
        IssueSeverity::Moderate,
        count_nameless(&doc, "a[href]"),
    );

    push_rule(
        &mut violations,
        "button-name",
        "Buttons must have discernible text",
        IssueSeverity::Moderate,
        count_nameless(&doc, "button"),
    );

    push_rule(
        &mut violations,
        "heading-order",
        "Heading levels should not skip",
        IssueSeverity::Minor,
        count_heading_skips(&doc),
    );

    let total_penalty: u32 = violations
        .iter()
        .map(|v| penalty(v.severity) * u32::try_from(v.count).unwrap_or(u32::MAX))
        .sum();
    let score = u8::try_from(100_u32.saturating_sub(total_penalty)).unwrap_or(0);

    Ok(AccessibilityReport { score, violations })
}

fn push_rule(
    violations: &mut Vec<Violation>,
    rule: &str,
    description: &str,
    severity: IssueSeverity,
    count: usize,
) {
    if count > 0 {
        violations.push(Violation {
            rule: rule.to_string(),
            description: description.to_string(),
            severity,
            count,
        });
    }
}

fn count_selected(doc: &Html, selector: &str) -> usize {
    Selector::parse(selector)
        .map(|s| doc.select(&s).count())
        .unwrap_or(0)
}

/// Inputs that carry no label of any kind: no aria-label, no aria-labelledby,
/// no title, and no id a `<label for>` could point at.
fn count_unlabelled_inputs(doc: &Html) -> usize {
    let Ok(selector) = Selector::parse(
        "input:not([type=hidden]):not([type=submit]):not([type=button]), textarea, select",
    ) else {
        return 0;
    };

    let labelled_ids: Vec<String> = Selector::parse("label[for]")
        .map(|label_sel| {
            doc.select(&label_sel)
                .filter_map(|el| el.value().attr("for"))
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default();

    doc.select(&selector)
        .filter(|el| {
            let v = el.value();
            if v.attr("aria-label").is_some()
                || v.attr("aria-labelledby").is_some()
                || v.attr("title").is_some()
            {
                return false;
            }
            match v.attr("id") {
                Some(id) => !labelled_ids.iter().any(|l| l == id),
                None => true,
            }
        })
        .count()
}

/// Elements matching `selector` with neither text content nor an aria-label.
fn count_nameless(doc: &Html, selector: &str) -> usize {
    let Ok(sel) = Selector::parse(selector) else {
        return 0;
    };
    doc.select(&sel)
        .filter(|el| el.value().attr("aria-label").is_none() && !has_visible_name(el))
        .count()
}

fn has_visible_name(el: &ElementRef) -> bool {
    if el.text().any(|t| !t.trim().is_empty()) {
        return true;
    }
    // An image with alt text names its link
    Selector::parse("img[alt]")
        .map(|img_sel| {
            el.select(&img_sel)
                .any(|img| img.value().attr("alt").is_some_and(|alt| !alt.trim().is_empty()))
        })
        .unwrap_or(false)
}

fn count_heading_skips(doc: &Html) -> usize {
    let Ok(sel) = Selector::parse("h1, h2, h3, h4, h5, h6") else {
        return 0;
    };
    let levels: Vec<u8> = doc
        .select(&sel)
        .filter_map(|el| el.value().name().strip_prefix('h')?.parse().ok())
        .collect();

    levels
        .windows(2)
        .filter(|pair| pair[1] > pair[0] && pair[1] - pair[0] > 1)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitescope_core::PageMetadata;

    fn page_with(html: &str) -> PageRecord {
        PageRecord {
            url: "https://example.com/".to_string(),
            title: String::new(),
            html: html.to_string(),
            text_content: String::new(),
            metadata: PageMetadata::default(),
            status_code: 200,
            depth: 0,
            load_time_ms: 0,
            screenshot_path: None,
            archive_path: None,
        }
    }

    fn violation<'a>(report: &'a AccessibilityReport, rule: &str) -> Option<&'a Violation> {
        report.violations.iter().find(|v| v.rule == rule)
    }

    #[test]
    fn test_clean_page_scores_high() {
        let report = scan(&page_with(
            r#"<html lang="en"><body>
                <h1>Title</h1><h2>Sub</h2>
                <img src="a.png" alt="A diagram">
                <a href="/about">About us</a>
            </body></html>"#,
        ))
        .expect("scan");
        assert!(report.violations.is_empty());
        assert_eq!(report.score, 100);
    }

    #[test]
    fn test_missing_alt_detected() {
        let report = scan(&page_with(
            r#"<html lang="en"><body><img src="a.png"><img src="b.png"></body></html>"#,
        ))
        .expect("scan");
        let v = violation(&report, "img-alt").expect("img-alt violation");
        assert_eq!(v.count, 2);
        assert_eq!(v.severity, IssueSeverity::Serious);
        assert_eq!(report.score, 80);
    }

    #[test]
    fn test_missing_lang_detected() {
        let report = scan(&page_with("<html><body></body></html>")).expect("scan");
        assert!(violation(&report, "html-lang").is_some());
    }

    #[test]
    fn test_unlabelled_inputs() {
        let report = scan(&page_with(
            r#"<html lang="en"><body>
                <label for="email">Email</label><input id="email" type="text">
                <input type="text" aria-label="Search">
                <input type="text">
                <input type="hidden" name="csrf">
            </body></html>"#,
        ))
        .expect("scan");
        let v = violation(&report, "input-label").expect("input-label violation");
        assert_eq!(v.count, 1, "only the bare text input is unlabelled");
    }

    #[test]
    fn test_empty_link_and_named_image_link() {
        let report = scan(&page_with(
            r#"<html lang="en"><body>
                <a href="/a"></a>
                <a href="/b"><img src="logo.png" alt="Home"></a>
            </body></html>"#,
        ))
        .expect("scan");
        let v = violation(&report, "link-name").expect("link-name violation");
        assert_eq!(v.count, 1, "image alt names the second link");
    }

    #[test]
    fn test_heading_skip() {
        let report = scan(&page_with(
            r#"<html lang="en"><body><h1>A</h1><h3>B</h3></body></html>"#,
        ))
        .expect("scan");
        let v = violation(&report, "heading-order").expect("heading-order violation");
        assert_eq!(v.count, 1);
        assert_eq!(v.severity, IssueSeverity::Minor);
    }

    #[test]
    fn test_score_floor_is_zero() {
        let imgs: String = (0..30).map(|i| format!(r#"<img src="{i}.png">"#)).collect();
        let report = scan(&page_with(&format!("<html><body>{imgs}</body></html>"))).expect("scan");
        assert_eq!(report.score, 0);
    }
}
