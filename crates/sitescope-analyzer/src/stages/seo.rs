//! SEO checklist stage: presence and length heuristics over the page record.

use crate::error::Result;
use scraper::{Html, Selector};
use sitescope_core::{PageRecord, SeoCheck, SeoReport};

const TITLE_MIN: usize = 10;
const TITLE_MAX: usize = 60;
const DESCRIPTION_MIN: usize = 50;
const DESCRIPTION_MAX: usize = 160;
const MIN_WORD_COUNT: usize = 250;

/// Run the checklist for one page.
#[allow(clippy::cast_possible_truncation)]
pub fn scan(page: &PageRecord) -> Result<SeoReport> {
    let doc = Html::parse_document(&page.html);
    let mut checks = Vec::new();

    let title_len = page.title.chars().count();
    checks.push(SeoCheck {
        name: "title".to_string(),
        passed: (TITLE_MIN..=TITLE_MAX).contains(&title_len),
        details: if page.title.is_empty() {
            "document has no title".to_string()
        } else {
            format!("title is {title_len} characters (want {TITLE_MIN}-{TITLE_MAX})")
        },
    });

    let description = page.metadata.meta_tags.get("description");
    let description_len = description.map_or(0, |d| d.chars().count());
    checks.push(SeoCheck {
        name: "meta-description".to_string(),
        passed: (DESCRIPTION_MIN..=DESCRIPTION_MAX).contains(&description_len),
        details: match description {
            Some(_) => format!(
                "description is {description_len} characters (want {DESCRIPTION_MIN}-{DESCRIPTION_MAX})"
            ),
            None => "no meta description".to_string(),
        },
    });

    let canonical = count_selected(&doc, r#"link[rel="canonical"]"#);
    checks.push(SeoCheck {
        name: "canonical".to_string(),
        passed: canonical == 1,
        details: format!("{canonical} canonical link(s) (want exactly 1)"),
    });

    let h1_count = count_selected(&doc, "h1");
    checks.push(SeoCheck {
        name: "single-h1".to_string(),
        passed: h1_count == 1,
        details: format!("{h1_count} h1 element(s) (want exactly 1)"),
    });

    let has_og = page.metadata.meta_tags.contains_key("og:title")
        && page.metadata.meta_tags.contains_key("og:description");
    checks.push(SeoCheck {
        name: "open-graph".to_string(),
        passed: has_og,
        details: if has_og {
            "og:title and og:description present".to_string()
        } else {
            "missing og:title and/or og:description".to_string()
        },
    });

    let noindex = page
        .metadata
        .meta_tags
        .get("robots")
        .is_some_and(|v| v.to_lowercase().contains("noindex"));
    checks.push(SeoCheck {
        name: "indexable".to_string(),
        passed: !noindex,
        details: if noindex {
            "page is marked noindex".to_string()
        } else {
            "page is indexable".to_string()
        },
    });

    let word_count = page.text_content.split_whitespace().count();
    checks.push(SeoCheck {
        name: "word-count".to_string(),
        passed: word_count >= MIN_WORD_COUNT,
        details: format!("{word_count} words (want at least {MIN_WORD_COUNT})"),
    });

    checks.push(SeoCheck {
        name: "structured-data".to_string(),
        passed: !page.metadata.structured_data.is_empty(),
        details: format!(
            "{} JSON-LD block(s) present",
            page.metadata.structured_data.len()
        ),
    });

    let passed = checks.iter().filter(|c| c.passed).count();
    let score = ((passed * 100) / checks.len()) as u8;

    Ok(SeoReport { score, checks })
}

fn count_selected(doc: &Html, selector: &str) -> usize {
    Selector::parse(selector)
        .map(|s| doc.select(&s).count())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitescope_core::PageMetadata;

    fn check<'a>(report: &'a SeoReport, name: &str) -> &'a SeoCheck {
        report
            .checks
            .iter()
            .find(|c| c.name == name)
            .unwrap_or_else(|| panic!("check {name} missing"))
    }

    fn well_formed_page() -> PageRecord {
        let mut metadata = PageMetadata::default();
        metadata.meta_tags.insert(
            "description".to_string(),
            "A long enough meta description that says something useful about the page contents."
                .to_string(),
        );
        metadata
            .meta_tags
            .insert("og:title".to_string(), "Acme".to_string());
        metadata
            .meta_tags
            .insert("og:description".to_string(), "Widgets".to_string());
        metadata
            .structured_data
            .push(serde_json::json!({"@type": "Organization"}));

        PageRecord {
            url: "https://example.com/".to_string(),
            title: "Acme Widgets - quality widgets".to_string(),
            html: r#"<html><head><link rel="canonical" href="https://example.com/"></head>
                <body><h1>Widgets</h1></body></html>"#
                .to_string(),
            text_content: "word ".repeat(300).trim().to_string(),
            metadata,
            status_code: 200,
            depth: 0,
            load_time_ms: 0,
            screenshot_path: None,
            archive_path: None,
        }
    }

    #[test]
    fn test_well_formed_page_passes_all_checks() {
        let report = scan(&well_formed_page()).expect("scan");
        assert_eq!(report.score, 100);
        assert!(report.checks.iter().all(|c| c.passed));
    }

    #[test]
    fn test_missing_title_fails_title_check() {
        let mut page = well_formed_page();
        page.title = String::new();
        let report = scan(&page).expect("scan");
        assert!(!check(&report, "title").passed);
        assert!(report.score < 100);
    }

    #[test]
    fn test_noindex_fails_indexable_check() {
        let mut page = well_formed_page();
        page.metadata
            .meta_tags
            .insert("robots".to_string(), "noindex, nofollow".to_string());
        let report = scan(&page).expect("scan");
        assert!(!check(&report, "indexable").passed);
    }

    #[test]
    fn test_multiple_h1_fails() {
        let mut page = well_formed_page();
        page.html = "<html><body><h1>A</h1><h1>B</h1></body></html>".to_string();
        let report = scan(&page).expect("scan");
        assert!(!check(&report, "single-h1").passed);
        assert!(!check(&report, "canonical").passed);
    }

    #[test]
    fn test_thin_content_fails_word_count() {
        let mut page = well_formed_page();
        page.text_content = "just a few words".to_string();
        let report = scan(&page).expect("scan");
        assert!(!check(&report, "word-count").passed);
    }

    #[test]
    fn test_every_check_always_present() {
        let report = scan(&well_formed_page()).expect("scan");
        let names: Vec<_> = report.checks.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "title",
                "meta-description",
                "canonical",
                "single-h1",
                "open-graph",
                "indexable",
                "word-count",
                "structured-data"
            ]
        );
    }
}
