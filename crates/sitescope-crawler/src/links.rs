//! Link extraction: the set of same-site, non-excluded, document-typed URLs
//! discovered on a page, in discovery order.

use crate::filter::UrlFilter;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extract the frontier-eligible links from a page.
///
/// Relative hrefs are resolved against the page URL; two different-looking
/// hrefs that resolve to the same URL are returned once. Order is discovery
/// order, which the frontier preserves within a depth batch.
#[must_use]
pub fn extract_links(html: &str, page_url: &Url, filter: &UrlFilter) -> Vec<Url> {
    let doc = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for el in doc.select(&selector) {
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        let Some(resolved) = filter.resolve(href, page_url) else {
            continue;
        };
        if !filter.should_enqueue(&resolved) {
            continue;
        }
        if seen.insert(resolved.to_string()) {
            links.push(resolved);
        }
    }

    links
}
