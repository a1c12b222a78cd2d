//! URL normalization and enqueue filtering.
//!
//! A link survives filtering iff it resolves against its page, stays on the
//! audited scheme+host, matches no operator exclude pattern, carries no
//! fragment, and does not point at a known non-document resource.

use crate::error::CrawlError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use url::Url;

/// File extensions that never resolve to crawlable HTML documents.
static SKIP_EXTENSIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // documents
        "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt", "rtf", "txt", "csv",
        // archives
        "zip", "tar", "gz", "bz2", "rar", "7z",
        // images
        "png", "jpg", "jpeg", "gif", "svg", "webp", "ico", "bmp", "avif",
        // media
        "mp3", "mp4", "avi", "mov", "webm", "ogg", "wav",
        // code and styles
        "css", "js", "mjs", "json", "xml", "rss", "atom",
        // fonts and binaries
        "woff", "woff2", "ttf", "eot", "otf", "exe", "dmg", "iso", "bin",
    ]
    .into_iter()
    .collect()
});

/// Decides which discovered URLs are eligible for the frontier.
#[derive(Debug)]
pub struct UrlFilter {
    scheme: String,
    host: String,
    excludes: Vec<Regex>,
}

impl UrlFilter {
    /// Build a filter scoped to the start URL's scheme and host.
    ///
    /// Exclude patterns are glob-style: `*` matches any run of characters,
    /// everything else is literal. Patterns are matched anywhere in the
    /// resolved URL string.
    pub fn new(start: &Url, exclude_patterns: &[String]) -> Result<Self, CrawlError> {
        let host = start
            .host_str()
            .ok_or_else(|| CrawlError::InvalidUrl {
                url: start.to_string(),
                reason: "URL has no host".to_string(),
            })?;

        let excludes = exclude_patterns
            .iter()
            .map(|pattern| {
                let escaped = regex::escape(pattern).replace(r"\*", ".*");
                Regex::new(&escaped).map_err(|e| CrawlError::InvalidUrl {
                    url: pattern.clone(),
                    reason: format!("invalid exclude pattern: {e}"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            scheme: start.scheme().to_string(),
            host: host_key(host),
            excludes,
        })
    }

    /// Resolve an href against its page URL.
    ///
    /// Returns `None` for hrefs that do not resolve to an absolute URL
    /// (`javascript:`, `mailto:` and malformed values fall out here via the
    /// scheme check in [`should_enqueue`](Self::should_enqueue) or the parse
    /// failure).
    #[must_use]
    pub fn resolve(&self, href: &str, base: &Url) -> Option<Url> {
        base.join(href.trim()).ok()
    }

    /// True if the resolved URL is eligible for the frontier.
    #[must_use]
    pub fn should_enqueue(&self, url: &Url) -> bool {
        // Same-page anchors are not new documents
        if url.fragment().is_some() {
            return false;
        }

        if url.scheme() != self.scheme {
            return false;
        }

        match url.host_str() {
            Some(host) if host_key(host) == self.host => {}
            _ => return false,
        }

        if has_skipped_extension(url) {
            return false;
        }

        let as_str = url.as_str();
        !self.excludes.iter().any(|re| re.is_match(as_str))
    }
}

/// Case-insensitive host with any `www.` prefix stripped.
fn host_key(host: &str) -> String {
    let lower = host.to_lowercase();
    lower
        .strip_prefix("www.")
        .map_or(lower.clone(), ToString::to_string)
}

fn has_skipped_extension(url: &Url) -> bool {
    let path = url.path();
    let Some(last_segment) = path.rsplit('/').next() else {
        return false;
    };
    match last_segment.rsplit_once('.') {
        Some((_, ext)) => SKIP_EXTENSIONS.contains(ext.to_lowercase().as_str()),
        None => false,
    }
}
