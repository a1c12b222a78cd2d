//! Page fetcher: turns a URL into a [`PageRecord`], tolerating transient
//! load failures.
//!
//! Navigation is retried with backoff; screenshot capture and HTML archival
//! are best-effort side effects that never fail the fetch.

use crate::error::{CrawlError, Result};
use crate::extract;
use sitescope_browser::{BrowserError, BrowserSession, PageHandle};
use sitescope_core::{BrowserConfig, CrawlConfig, PageRecord};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Fetches pages through an injected browser session.
pub struct PageFetcher {
    session: Arc<dyn BrowserSession>,
    crawl: CrawlConfig,
    browser: BrowserConfig,
    output_dir: PathBuf,
}

impl PageFetcher {
    /// Create a fetcher.
    ///
    /// `output_dir` is where screenshots and archived HTML land when those
    /// side effects are enabled.
    #[must_use]
    pub fn new(
        session: Arc<dyn BrowserSession>,
        crawl: CrawlConfig,
        browser: BrowserConfig,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            session,
            crawl,
            browser,
            output_dir,
        }
    }

    /// Fetch one URL with retry and backoff.
    ///
    /// Retries up to `fetch_attempts` times with `retry_delay_ms × attempt`
    /// backoff on navigation error, timeout or non-ok status; the last error
    /// is surfaced if all attempts fail.
    pub async fn fetch(&self, url: &Url, depth: usize) -> Result<PageRecord> {
        let url = self.with_basic_auth(url.clone());
        let attempts = self.crawl.fetch_attempts.max(1);
        let page_timeout = Duration::from_secs(self.browser.page_timeout_secs);
        let mut last_error = None;

        for attempt in 1..=attempts {
            let outcome = tokio::time::timeout(page_timeout, self.attempt_fetch(&url, depth)).await;
            let error = match outcome {
                Ok(Ok(record)) => return Ok(record),
                Ok(Err(e)) => e,
                Err(_) => CrawlError::PageTimeout {
                    url: url.to_string(),
                    timeout_secs: self.browser.page_timeout_secs,
                },
            };

            if attempt < attempts {
                let delay = Duration::from_millis(self.crawl.retry_delay_ms * u64::from(attempt));
                tracing::warn!(
                    "Fetch failed for {} (attempt {}/{}): {}, retrying in {:?}...",
                    url,
                    attempt,
                    attempts,
                    error,
                    delay
                );
                tokio::time::sleep(delay).await;
            }
            last_error = Some(error);
        }

        match last_error {
            Some(CrawlError::Browser(source)) => Err(CrawlError::FetchFailed {
                url: url.to_string(),
                attempts,
                source,
            }),
            Some(other) => Err(other),
            None => Err(CrawlError::PageTimeout {
                url: url.to_string(),
                timeout_secs: self.browser.page_timeout_secs,
            }),
        }
    }

    /// One navigation attempt: open a page, load, extract, close.
    async fn attempt_fetch(&self, url: &Url, depth: usize) -> Result<PageRecord> {
        let page = self.session.open_page().await?;
        let outcome = self.load_and_extract(&*page, url, depth).await;
        if let Err(e) = page.close().await {
            tracing::debug!("Closing page after fetch: {}", e);
        }
        outcome
    }

    async fn load_and_extract(
        &self,
        page: &dyn PageHandle,
        url: &Url,
        depth: usize,
    ) -> Result<PageRecord> {
        let navigation_timeout = Duration::from_secs(self.browser.navigation_timeout_secs);
        let started = Instant::now();

        let response = page.navigate(url.as_str(), navigation_timeout).await?;
        if !response.ok {
            return Err(CrawlError::Browser(BrowserError::HttpStatus {
                url: url.to_string(),
                status: response.status.unwrap_or(0),
            }));
        }

        let load_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        // Redirects may have moved us; record where we actually landed
        let final_url = match page.current_url().await {
            Ok(current) => current,
            Err(e) => {
                tracing::debug!("Could not read final URL for {}: {}", url, e);
                url.to_string()
            }
        };

        let html = page.content().await?;
        let title = extract::extract_title(&html);
        let text_content = extract::extract_text(&html);
        let metadata = extract::extract_metadata(&html);

        let slug = page_slug(url);
        let screenshot_path = if self.crawl.capture_screenshots {
            self.capture_screenshot(page, &slug).await
        } else {
            None
        };
        let archive_path = if self.crawl.archive_html {
            self.archive_html(&html, &slug)
        } else {
            None
        };

        Ok(PageRecord {
            url: final_url,
            title,
            html,
            text_content,
            metadata,
            status_code: response.status.unwrap_or(200),
            depth,
            load_time_ms,
            screenshot_path,
            archive_path,
        })
    }

    /// Best-effort full-page screenshot; a failure logs and yields `None`.
    async fn capture_screenshot(&self, page: &dyn PageHandle, slug: &str) -> Option<PathBuf> {
        let dir = self.output_dir.join("screenshots");
        if let Err(e) = std::fs::create_dir_all(&dir) {
            tracing::warn!("Could not create screenshot directory: {}", e);
            return None;
        }
        let path = dir.join(format!("{slug}.png"));
        match page.screenshot(&path).await {
            Ok(()) => Some(path),
            Err(e) => {
                tracing::warn!("Screenshot failed for {}: {}", slug, e);
                None
            }
        }
    }

    /// Best-effort raw-HTML archive; a failure logs and yields `None`.
    fn archive_html(&self, html: &str, slug: &str) -> Option<PathBuf> {
        let dir = self.output_dir.join("archive");
        if let Err(e) = std::fs::create_dir_all(&dir) {
            tracing::warn!("Could not create archive directory: {}", e);
            return None;
        }
        let path = dir.join(format!("{slug}.html"));
        match std::fs::write(&path, html) {
            Ok(()) => Some(path),
            Err(e) => {
                tracing::warn!("Archive write failed for {}: {}", slug, e);
                None
            }
        }
    }

    fn with_basic_auth(&self, mut url: Url) -> Url {
        if let Some(auth) = &self.crawl.basic_auth {
            if url.set_username(&auth.username).is_err()
                || url.set_password(Some(&auth.password)).is_err()
            {
                tracing::warn!("Could not apply basic auth to {}", url);
            }
        }
        url
    }
}

/// Filesystem-safe name for a page's artifacts, derived from its path.
fn page_slug(url: &Url) -> String {
    let mut raw = url.path().trim_matches('/').to_string();
    if let Some(query) = url.query() {
        raw.push('-');
        raw.push_str(query);
    }
    if raw.is_empty() {
        return "index".to_string();
    }
    let slug: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    slug.trim_matches('-').to_string()
}
