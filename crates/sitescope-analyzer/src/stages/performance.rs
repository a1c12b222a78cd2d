//! Performance stage: derived from the fetcher's navigation timing and the
//! weight of the served HTML. No second navigation is made.

use crate::error::Result;
use scraper::{Html, Selector};
use sitescope_core::{PageRecord, PerformanceReport};

const SLOW_MS: u64 = 3000;
const SLUGGISH_MS: u64 = 1000;
const HEAVY_HTML_BYTES: usize = 500 * 1024;
const CHUNKY_HTML_BYTES: usize = 100 * 1024;

/// Derive the performance report for one page.
pub fn probe(page: &PageRecord) -> Result<PerformanceReport> {
    let doc = Html::parse_document(&page.html);

    let script_count = count_selected(&doc, "script[src]");
    let stylesheet_count = count_selected(&doc, r#"link[rel="stylesheet"]"#);
    let image_count = count_selected(&doc, "img");
    let html_bytes = page.html.len();

    let mut score: i32 = 100;
    if page.load_time_ms > SLOW_MS {
        score -= 30;
    } else if page.load_time_ms > SLUGGISH_MS {
        score -= 10;
    }
    if html_bytes > HEAVY_HTML_BYTES {
        score -= 20;
    } else if html_bytes > CHUNKY_HTML_BYTES {
        score -= 10;
    }
    if script_count > 20 {
        score -= 15;
    } else if script_count > 10 {
        score -= 5;
    }
    if image_count > 50 {
        score -= 10;
    }

    Ok(PerformanceReport {
        load_time_ms: page.load_time_ms,
        html_bytes,
        script_count,
        stylesheet_count,
        image_count,
        score: u8::try_from(score.max(0)).unwrap_or(0),
    })
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

    fn page_with(html: &str, load_time_ms: u64) -> PageRecord {
        PageRecord {
            url: "https://example.com/".to_string(),
            title: String::new(),
            html: html.to_string(),
            text_content: String::new(),
            metadata: PageMetadata::default(),
            status_code: 200,
            depth: 0,
            load_time_ms,
            screenshot_path: None,
            archive_path: None,
        }
    }

    #[test]
    fn test_light_fast_page_scores_100() {
        let report = probe(&page_with("<html><body>hi</body></html>", 200)).expect("probe");
        assert_eq!(report.score, 100);
        assert_eq!(report.load_time_ms, 200);
    }

    #[test]
    fn test_slow_page_penalized() {
        let report = probe(&page_with("<html></html>", 5000)).expect("probe");
        assert_eq!(report.score, 70);
    }

    #[test]
    fn test_tag_counts() {
        let html = r#"<html><head>
            <script src="a.js"></script>
            <script>inline();</script>
            <link rel="stylesheet" href="a.css">
        </head><body><img src="1.png"><img src="2.png"></body></html>"#;
        let report = probe(&page_with(html, 100)).expect("probe");
        assert_eq!(report.script_count, 1, "inline scripts are not requests");
        assert_eq!(report.stylesheet_count, 1);
        assert_eq!(report.image_count, 2);
    }

    #[test]
    fn test_heavy_html_penalized() {
        let html = format!("<html><body>{}</body></html>", "x".repeat(600 * 1024));
        let report = probe(&page_with(&html, 100)).expect("probe");
        assert_eq!(report.score, 80);
    }
}
