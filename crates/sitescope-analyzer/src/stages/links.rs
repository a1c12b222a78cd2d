//! Link validation stage: classify the page's anchors and probe a bounded
//! sample of them over HTTP.

use crate::error::{AnalysisError, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use scraper::{Html, Selector};
use sitescope_core::{AnalysisConfig, BrokenLink, LinkReport, PageRecord};
use std::time::Duration;
use url::Url;

/// Probes page links with a bounded number of in-flight requests.
pub struct LinkAuditor {
    client: reqwest::Client,
    max_checked: usize,
    max_inflight: usize,
}

impl LinkAuditor {
    /// Create an auditor from the analysis settings.
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.link_probe_timeout_secs))
            .build()
            .map_err(|e| AnalysisError::Internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_checked: config.max_checked_links,
            max_inflight: config.max_inflight_probes.max(1),
        })
    }

    /// Audit one page's links.
    pub async fn audit(&self, page: &PageRecord) -> Result<LinkReport> {
        let (mut report, to_check) = collect_anchors(&page.html, &page.url, self.max_checked);

        let mut futures = FuturesUnordered::new();
        for link in to_check {
            futures.push(self.probe(link));

            // Respect the in-flight cap
            while futures.len() >= self.max_inflight {
                if let Some(outcome) = futures.next().await {
                    report.checked += 1;
                    if let Some(broken) = outcome {
                        report.broken.push(broken);
                    }
                }
            }
        }

        while let Some(outcome) = futures.next().await {
            report.checked += 1;
            if let Some(broken) = outcome {
                report.broken.push(broken);
            }
        }

        Ok(report)
    }

    /// Probe one link; `Some` when it is broken.
    async fn probe(&self, url: Url) -> Option<BrokenLink> {
        let head = self.client.head(url.clone()).send().await;

        let response = match head {
            // Some servers reject HEAD outright; retry those with GET
            Ok(r) if r.status().as_u16() == 405 => self.client.get(url.clone()).send().await,
            other => other,
        };

        match response {
            Ok(r) if r.status().is_client_error() || r.status().is_server_error() => {
                Some(BrokenLink {
                    url: url.to_string(),
                    status: Some(r.status().as_u16()),
                    reason: format!("HTTP {}", r.status().as_u16()),
                })
            }
            Ok(_) => None,
            Err(e) => Some(BrokenLink {
                url: url.to_string(),
                status: None,
                reason: format!("request failed: {e}"),
            }),
        }
    }
}

/// Classify the page's anchors and pick the probe sample.
///
/// Synchronous on purpose: the parsed document never crosses an await point.
fn collect_anchors(html: &str, page_url: &str, max_checked: usize) -> (LinkReport, Vec<Url>) {
    let mut report = LinkReport::default();
    let mut to_check = Vec::new();

    let Ok(base) = Url::parse(page_url) else {
        return (report, to_check);
    };
    let page_host = base.host_str().map(host_key);

    let doc = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return (report, to_check);
    };

    for el in doc.select(&selector) {
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        let Ok(resolved) = base.join(href.trim()) else {
            continue;
        };
        if resolved.scheme() != "http" && resolved.scheme() != "https" {
            continue;
        }

        report.total += 1;
        let link_host = resolved.host_str().map(host_key);
        if link_host == page_host {
            report.internal += 1;
        } else {
            report.external += 1;
        }

        if to_check.len() < max_checked {
            to_check.push(resolved);
        }
    }

    (report, to_check)
}

fn host_key(host: &str) -> String {
    let lower = host.to_lowercase();
    lower
        .strip_prefix("www.")
        .map_or(lower.clone(), ToString::to_string)
}
