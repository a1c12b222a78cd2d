//! Crawl frontier: depth-batched breadth-first crawling with three
//! independent caps (depth, page count, domain scope).
//!
//! All URLs discovered at depth *d* are fetched before any URL at depth
//! *d+1* is attempted. Breadth-first order maximizes the number of distinct
//! navigational branches covered before the page budget runs out, which is
//! the signal the downstream information-architecture pass cares about.

use crate::error::{CrawlError, Result};
use crate::fetcher::PageFetcher;
use crate::filter::UrlFilter;
use crate::links::extract_links;
use sitescope_core::{CrawlConfig, PageRecord};
use std::collections::{HashSet, VecDeque};
use std::time::Duration;
use url::Url;

/// Frontier bookkeeping: the visited set, the current depth batch, and the
/// URLs discovered for the next batch.
///
/// Invariant: `visited` and the queued sets are disjoint at all times. A URL
/// moves into `visited` at the moment it is dequeued for fetching, before
/// the fetch completes, so a sibling page linking to it later in the same
/// batch cannot re-enqueue it.
pub struct Frontier {
    visited: HashSet<String>,
    queued: HashSet<String>,
    current: VecDeque<Url>,
    next: Vec<Url>,
    depth: usize,
    fetched: usize,
    max_depth: usize,
    max_pages: usize,
    started: bool,
}

impl Frontier {
    /// Seed the frontier with the start URL at depth 0.
    #[must_use]
    pub fn new(start: Url, max_depth: usize, max_pages: usize) -> Self {
        let mut queued = HashSet::new();
        queued.insert(start.to_string());
        let mut current = VecDeque::new();
        current.push_back(start);

        Self {
            visited: HashSet::new(),
            queued,
            current,
            next: Vec::new(),
            depth: 0,
            fetched: 0,
            max_depth,
            max_pages,
            started: false,
        }
    }

    /// Begin the next depth batch.
    ///
    /// Termination is decided here, between batches: stop when there is
    /// nothing queued, the page budget is spent, or the next batch would
    /// exceed the depth cap.
    pub fn start_batch(&mut self) -> bool {
        if self.started {
            self.current = self.next.drain(..).collect();
            self.depth += 1;
        } else {
            self.started = true;
        }

        !self.current.is_empty() && self.fetched < self.max_pages && self.depth <= self.max_depth
    }

    /// Dequeue the next URL of the current batch.
    ///
    /// Each fetch is individually gated by the page-count cap, so a batch
    /// never carries the run past `max_pages`. Dequeuing marks the URL
    /// visited (fetched *or attempted*).
    pub fn dequeue(&mut self) -> Option<Url> {
        if self.fetched >= self.max_pages {
            return None;
        }
        let url = self.current.pop_front()?;
        let key = url.to_string();
        self.queued.remove(&key);
        self.visited.insert(key);
        Some(url)
    }

    /// Count one successfully fetched page against the budget.
    pub fn record_fetched(&mut self) {
        self.fetched += 1;
    }

    /// Offer a discovered URL for the next depth batch.
    ///
    /// Already-visited and already-queued URLs are dropped.
    pub fn discover(&mut self, url: Url) {
        let key = url.to_string();
        if self.visited.contains(&key) || self.queued.contains(&key) {
            return;
        }
        self.queued.insert(key);
        self.next.push(url);
    }

    /// Current batch depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of URLs waiting in the current batch.
    #[must_use]
    pub fn batch_len(&self) -> usize {
        self.current.len()
    }

    /// True while discovered links could still be fetched.
    ///
    /// Links found at the depth cap would never be fetched, so there is no
    /// point extracting them.
    #[must_use]
    pub fn should_extract_links(&self) -> bool {
        self.depth < self.max_depth
    }
}

/// Drives the frontier against the page fetcher to produce the ordered
/// sequence of crawled pages.
pub struct Crawler {
    fetcher: PageFetcher,
    config: CrawlConfig,
}

impl Crawler {
    /// Create a crawler over an already-constructed fetcher.
    #[must_use]
    pub fn new(fetcher: PageFetcher, config: CrawlConfig) -> Self {
        Self { fetcher, config }
    }

    /// Crawl the site starting at `start_url`.
    ///
    /// Returns the pages actually fetched, in fetch order; fewer than the
    /// budget if the site is smaller or a cap is hit. A page whose fetch
    /// fails after retries is logged and skipped; it never aborts the crawl.
    pub async fn crawl(&self, start_url: &str) -> Result<Vec<PageRecord>> {
        let start = Url::parse(start_url).map_err(|e| CrawlError::InvalidUrl {
            url: start_url.to_string(),
            reason: e.to_string(),
        })?;
        let filter = UrlFilter::new(&start, &self.config.exclude_patterns)?;

        let mut frontier = Frontier::new(start, self.config.max_depth, self.config.max_pages);
        let delay = Duration::from_millis(self.config.request_delay_ms);
        let mut pages: Vec<PageRecord> = Vec::new();
        let mut first_fetch = true;

        while frontier.start_batch() {
            tracing::info!(
                "Crawling depth {} ({} queued, {} fetched)",
                frontier.depth(),
                frontier.batch_len(),
                pages.len()
            );

            while let Some(url) = frontier.dequeue() {
                // One in-flight load at a time, spaced for browser pressure
                // and target-site courtesy
                if !first_fetch && !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                first_fetch = false;

                match self.fetcher.fetch(&url, frontier.depth()).await {
                    Ok(page) => {
                        if frontier.should_extract_links() {
                            let base = Url::parse(&page.url).unwrap_or_else(|_| url.clone());
                            for link in extract_links(&page.html, &base, &filter) {
                                frontier.discover(link);
                            }
                        }
                        frontier.record_fetched();
                        pages.push(page);
                    }
                    Err(e) => {
                        tracing::warn!("Skipping {}: {}", url, e);
                    }
                }
            }
        }

        tracing::info!("Crawl finished: {} pages", pages.len());
        Ok(pages)
    }
}
