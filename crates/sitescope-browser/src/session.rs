//! Browser capability traits.
//!
//! Every component that needs the browser receives an injected
//! `Arc<dyn BrowserSession>`; nothing holds a module-level singleton. Tests
//! substitute fake sessions, so nothing above this crate needs a running
//! Chromium to be exercised.

use crate::error::Result;
use std::path::Path;
use std::time::Duration;

/// Outcome of a navigation: the final HTTP response, when one was observed.
#[derive(Debug, Clone, Copy)]
pub struct NavigationResponse {
    /// Final HTTP status code; `None` when the protocol reported no response
    pub status: Option<u16>,
    /// True for a 2xx status or a followed 3xx (or when no status was observed)
    pub ok: bool,
}

impl NavigationResponse {
    /// Build a response from a raw status code.
    #[must_use]
    pub fn from_status(status: Option<u16>) -> Self {
        let ok = status.map_or(true, |s| (200..400).contains(&s));
        Self { status, ok }
    }
}

/// A shared browser session able to open pages.
///
/// Created once per audit run by the run controller and passed by reference
/// to every component that needs it. Only the controller closes it.
#[async_trait::async_trait]
pub trait BrowserSession: Send + Sync {
    /// Open a new blank page (tab).
    ///
    /// Pages are short-lived: opened, used and closed within one call site,
    /// never shared across analyzer stages.
    async fn open_page(&self) -> Result<Box<dyn PageHandle>>;
}

/// One open browser page.
#[async_trait::async_trait]
pub trait PageHandle: Send {
    /// Navigate to a URL, bounded by `timeout`.
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<NavigationResponse>;

    /// The serialized HTML of the current document.
    async fn content(&self) -> Result<String>;

    /// The page's current URL (post-redirect).
    async fn current_url(&self) -> Result<String>;

    /// Write a full-page screenshot to `path`.
    async fn screenshot(&self, path: &Path) -> Result<()>;

    /// Replace the document content. Fallback path for rendering raw HTML.
    async fn set_content(&self, html: &str) -> Result<()>;

    /// Close the page.
    async fn close(self: Box<Self>) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_response_ok_range() {
        assert!(NavigationResponse::from_status(Some(200)).ok);
        assert!(NavigationResponse::from_status(Some(301)).ok);
        assert!(!NavigationResponse::from_status(Some(404)).ok);
        assert!(!NavigationResponse::from_status(Some(500)).ok);
        // No observed response is treated as navigable (e.g. about:blank)
        assert!(NavigationResponse::from_status(None).ok);
    }
}
