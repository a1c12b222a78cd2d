//! HTML extraction helpers: title, visible text, meta tags and JSON-LD.
//!
//! All functions here are synchronous and operate on the served HTML string,
//! so no scraper type is ever held across an await point.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use sitescope_core::PageMetadata;

/// Script, style and noscript blocks, dropped before computing visible text
/// so keyword extraction and AI prompts never see non-visible code.
static NON_VISIBLE_BLOCKS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>|<noscript\b[^>]*>.*?</noscript\s*>",
    )
    .expect("valid regex")
});

/// The document title, or an empty string when there is none.
#[must_use]
pub fn extract_title(html: &str) -> String {
    let doc = Html::parse_document(html);
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };
    doc.select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Visible body text with script/style/noscript content stripped and
/// whitespace collapsed.
#[must_use]
pub fn extract_text(html: &str) -> String {
    let stripped = NON_VISIBLE_BLOCKS.replace_all(html, " ");
    let doc = Html::parse_document(&stripped);
    let Ok(selector) = Selector::parse("body") else {
        return String::new();
    };
    doc.select(&selector)
        .flat_map(|n| n.text())
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Meta tags (name/property -> content) and JSON-LD structured data.
///
/// Each JSON-LD block is parsed independently; a malformed block is dropped
/// without affecting the others.
#[must_use]
pub fn extract_metadata(html: &str) -> PageMetadata {
    let doc = Html::parse_document(html);
    let mut metadata = PageMetadata::default();

    if let Ok(selector) = Selector::parse("meta") {
        for el in doc.select(&selector) {
            let value = el.value();
            let key = value.attr("name").or_else(|| value.attr("property"));
            if let (Some(key), Some(content)) = (key, value.attr("content")) {
                metadata
                    .meta_tags
                    .insert(key.to_string(), content.to_string());
            }
        }
    }

    if let Ok(selector) = Selector::parse(r#"script[type="application/ld+json"]"#) {
        for el in doc.select(&selector) {
            let raw = el.text().collect::<String>();
            match serde_json::from_str::<serde_json::Value>(&raw) {
                Ok(value) => metadata.structured_data.push(value),
                Err(e) => {
                    tracing::debug!("Dropping malformed JSON-LD block: {}", e);
                }
            }
        }
    }

    metadata
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html>
          <head>
            <title> Acme Widgets </title>
            <meta name="description" content="Widgets for everyone">
            <meta property="og:title" content="Acme">
            <meta charset="utf-8">
            <script type="application/ld+json">{"@type": "Organization", "name": "Acme"}</script>
            <script type="application/ld+json">{not json</script>
            <style>body { color: red; }</style>
          </head>
          <body>
            <h1>Welcome</h1>
            <script>console.log("tracking");</script>
            <p>We sell widgets.</p>
            <noscript>Please enable JavaScript.</noscript>
          </body>
        </html>
    "#;

    #[test]
    fn test_extract_title() {
        assert_eq!(extract_title(PAGE), "Acme Widgets");
        assert_eq!(extract_title("<html><body>no title</body></html>"), "");
    }

    #[test]
    fn test_extract_text_strips_non_visible() {
        let text = extract_text(PAGE);
        assert!(text.contains("Welcome"));
        assert!(text.contains("We sell widgets."));
        assert!(!text.contains("tracking"));
        assert!(!text.contains("color: red"));
        assert!(!text.contains("enable JavaScript"));
    }

    #[test]
    fn test_extract_text_collapses_whitespace() {
        let text = extract_text("<body><p>a</p>\n\n\t<p>b</p></body>");
        assert_eq!(text, "a b");
    }

    #[test]
    fn test_extract_metadata_meta_tags() {
        let metadata = extract_metadata(PAGE);
        assert_eq!(
            metadata.meta_tags.get("description").map(String::as_str),
            Some("Widgets for everyone")
        );
        assert_eq!(
            metadata.meta_tags.get("og:title").map(String::as_str),
            Some("Acme")
        );
        // charset meta has no name/property, so it is not recorded
        assert!(!metadata.meta_tags.contains_key("charset"));
    }

    #[test]
    fn test_malformed_json_ld_dropped_not_fatal() {
        let metadata = extract_metadata(PAGE);
        assert_eq!(metadata.structured_data.len(), 1);
        assert_eq!(metadata.structured_data[0]["name"], "Acme");
    }
}
