//! In-memory fake browser session for crawler tests.
//!
//! Serves a canned site graph: URL -> status/HTML, with optional simulated
//! navigation failures to exercise retry paths. No Chromium involved.

use sitescope_browser::{
    BrowserError, BrowserSession, NavigationResponse, PageHandle, Result as BrowserResult,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One fake page: served status and HTML, plus how many initial navigation
/// attempts should fail before one succeeds.
pub struct FakePageSpec {
    status: u16,
    html: String,
    failures: u32,
}

impl FakePageSpec {
    pub fn ok(html: &str) -> Self {
        Self::with_status(200, html)
    }

    pub fn with_status(status: u16, html: &str) -> Self {
        Self {
            status,
            html: html.to_string(),
            failures: 0,
        }
    }

    #[must_use]
    pub fn with_failures(mut self, failures: u32) -> Self {
        self.failures = failures;
        self
    }
}

struct Inner {
    pages: HashMap<String, FakePageSpec>,
    attempts: Mutex<HashMap<String, u32>>,
    screenshots_fail: AtomicBool,
}

/// Fake [`BrowserSession`] over a canned site graph.
pub struct FakeSession {
    inner: Arc<Inner>,
}

impl FakeSession {
    pub fn new(pages: Vec<(&str, FakePageSpec)>) -> Self {
        let pages = pages
            .into_iter()
            .map(|(url, spec)| (url.to_string(), spec))
            .collect();
        Self {
            inner: Arc::new(Inner {
                pages,
                attempts: Mutex::new(HashMap::new()),
                screenshots_fail: AtomicBool::new(false),
            }),
        }
    }

    /// Make every screenshot call fail; exercises the best-effort path.
    #[must_use]
    pub fn with_failing_screenshots(self) -> Self {
        self.inner.screenshots_fail.store(true, Ordering::Relaxed);
        self
    }

    /// How many navigation attempts were made against `url`.
    pub fn navigation_attempts(&self, url: &str) -> u32 {
        self.inner
            .attempts
            .lock()
            .expect("attempts lock")
            .get(url)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl BrowserSession for FakeSession {
    async fn open_page(&self) -> BrowserResult<Box<dyn PageHandle>> {
        Ok(Box::new(FakePage {
            inner: self.inner.clone(),
            current: Mutex::new(None),
        }))
    }
}

struct FakePage {
    inner: Arc<Inner>,
    current: Mutex<Option<String>>,
}

#[async_trait::async_trait]
impl PageHandle for FakePage {
    async fn navigate(&self, url: &str, _timeout: Duration) -> BrowserResult<NavigationResponse> {
        let attempt = {
            let mut attempts = self.inner.attempts.lock().expect("attempts lock");
            let counter = attempts.entry(url.to_string()).or_insert(0);
            *counter += 1;
            *counter
        };

        match self.inner.pages.get(url) {
            Some(spec) => {
                if attempt <= spec.failures {
                    return Err(BrowserError::NavigationError(format!(
                        "simulated failure {attempt} for {url}"
                    )));
                }
                *self.current.lock().expect("current lock") = Some(url.to_string());
                Ok(NavigationResponse::from_status(Some(spec.status)))
            }
            None => {
                *self.current.lock().expect("current lock") = Some(url.to_string());
                Ok(NavigationResponse::from_status(Some(404)))
            }
        }
    }

    async fn content(&self) -> BrowserResult<String> {
        let current = self.current.lock().expect("current lock").clone();
        let html = current
            .and_then(|url| self.inner.pages.get(&url).map(|spec| spec.html.clone()))
            .unwrap_or_else(|| "<html></html>".to_string());
        Ok(html)
    }

    async fn current_url(&self) -> BrowserResult<String> {
        self.current
            .lock()
            .expect("current lock")
            .clone()
            .ok_or_else(|| BrowserError::NavigationError("no page loaded".to_string()))
    }

    async fn screenshot(&self, path: &Path) -> BrowserResult<()> {
        if self.inner.screenshots_fail.load(Ordering::Relaxed) {
            return Err(BrowserError::Screenshot("simulated failure".to_string()));
        }
        std::fs::write(path, b"\x89PNG")
            .map_err(|e| BrowserError::Screenshot(e.to_string()))?;
        Ok(())
    }

    async fn set_content(&self, _html: &str) -> BrowserResult<()> {
        Ok(())
    }

    async fn close(self: Box<Self>) -> BrowserResult<()> {
        Ok(())
    }
}
