//! The audit run controller.
//!
//! Owns the whole run: configuration, the fatal provider check, the single
//! shared browser session, the crawl, sequential per-page analysis with
//! checkpoints, the information-architecture pass, and report rendering.
//! The browser is torn down on every exit path before an error is rethrown.

use crate::cli::Cli;
use anyhow::Context;
use sitescope_analyzer::{information_architecture, AiAnalyzer, PageAnalyzer};
use sitescope_browser::{BrowserSession, ChromiumEngine};
use sitescope_core::{AggregateResult, AppConfig, BasicAuth, PageResult, SiteCategory};
use sitescope_crawler::{Crawler, PageFetcher};
use sitescope_llm::{build_provider, LlmProvider};
use sitescope_report::{write_json_report, write_markdown_report, Checkpointer};
use std::sync::Arc;
use tracing::{info, warn};

/// Run one audit end to end.
pub async fn execute(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::load_with_env().context("loading configuration")?;
    apply_cli_overrides(&mut config, &cli)?;

    // Initialization failures are fatal by design: a missing or unreachable
    // provider would otherwise fail every page's AI stage identically.
    let provider = build_provider(&config.llm).context("configuring AI provider")?;
    provider
        .healthcheck()
        .await
        .context("AI provider healthcheck failed")?;
    info!(
        "AI provider ready: {} ({})",
        provider.provider_id(),
        config.llm.model
    );

    let engine = Arc::new(
        ChromiumEngine::launch(&config.browser)
            .await
            .context("launching browser")?,
    );

    let session: Arc<dyn BrowserSession> = engine.clone();
    let category = cli.category.into();
    let result = run_audit(session, provider, &config, &cli.url, category, cli.context.clone()).await;

    // Guaranteed teardown, success or not; only then rethrow
    if let Err(e) = engine.shutdown().await {
        warn!("Browser teardown reported: {}", e);
    }
    let aggregate = result?;

    let output_dir = &config.report.output_dir;
    if config.report.json {
        let path = write_json_report(output_dir, &aggregate).context("writing JSON report")?;
        println!("JSON report: {}", path.display());
    }
    if config.report.markdown {
        let path =
            write_markdown_report(output_dir, &aggregate).context("writing Markdown report")?;
        println!("Markdown report: {}", path.display());
    }

    if let Some(summary) = &aggregate.summary {
        println!(
            "Audited {} page(s): {} issue(s), {} recommendation(s)",
            summary.pages_crawled,
            summary.issues.len(),
            summary.recommendations.len()
        );
    }

    Ok(())
}

/// Crawl fully, then analyze each page in fetch order.
pub async fn run_audit(
    session: Arc<dyn BrowserSession>,
    provider: Arc<dyn LlmProvider>,
    config: &AppConfig,
    start_url: &str,
    category: SiteCategory,
    context: Option<String>,
) -> anyhow::Result<AggregateResult> {
    let fetcher = PageFetcher::new(
        session,
        config.crawl.clone(),
        config.browser.clone(),
        config.report.output_dir.clone(),
    );
    let crawler = Crawler::new(fetcher, config.crawl.clone());

    info!("Starting crawl of {}", start_url);
    let pages = crawler.crawl(start_url).await.context("crawl failed")?;
    info!("Crawl complete: {} page(s); starting analysis", pages.len());

    let ai = AiAnalyzer::new(
        provider,
        category,
        context,
        config.llm.max_tokens,
        config.llm.temperature,
    );
    let analyzer = PageAnalyzer::new(&config.analysis, ai).context("building analyzer")?;

    let mut checkpointer = Checkpointer::new(
        config.report.output_dir.join("intermediate_results.json"),
    );
    let mut aggregate = AggregateResult::new();
    let total = pages.len();

    for (index, page) in pages.into_iter().enumerate() {
        info!("Analyzing page {}/{}: {}", index + 1, total, page.url);
        match analyzer.analyze_page(&page).await {
            Ok(analysis) => {
                aggregate.pages.push(PageResult {
                    page,
                    analysis: Some(analysis),
                    error: None,
                });
                // Checkpoints are best-effort observability, never fatal
                match checkpointer.record_analyzed(&aggregate) {
                    Ok(true) => info!("Checkpoint written"),
                    Ok(false) => {}
                    Err(e) => warn!("Checkpoint write failed: {}", e),
                }
            }
            Err(e) => {
                warn!("Analysis failed for {}: {}", page.url, e);
                aggregate.pages.push(PageResult {
                    page,
                    analysis: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    aggregate.summary = Some(information_architecture(&aggregate.pages));
    Ok(aggregate)
}

/// Apply CLI flags over the loaded configuration.
pub fn apply_cli_overrides(config: &mut AppConfig, cli: &Cli) -> anyhow::Result<()> {
    if let Some(depth) = cli.depth {
        config.crawl.max_depth = depth;
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawl.max_pages = max_pages;
    }
    if !cli.exclude.is_empty() {
        config.crawl.exclude_patterns = cli.exclude.clone();
    }
    if cli.screenshots {
        config.crawl.capture_screenshots = true;
    }
    if cli.archive {
        config.crawl.archive_html = true;
    }
    if let Some(auth) = &cli.auth {
        let (username, password) = auth
            .split_once(':')
            .context("--auth must be user:password")?;
        config.crawl.basic_auth = Some(BasicAuth {
            username: username.to_string(),
            password: password.to_string(),
        });
    }
    if let Some(output) = &cli.output {
        config.report.output_dir.clone_from(output);
    }
    if let Some(provider) = &cli.provider {
        config.llm.provider.clone_from(provider);
    }
    if let Some(model) = &cli.model {
        config.llm.model.clone_from(model);
    }
    if let Some(ollama_url) = &cli.ollama_url {
        config.llm.ollama_url.clone_from(ollama_url);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use sitescope_browser::{
        BrowserError, NavigationResponse, PageHandle, Result as BrowserResult,
    };
    use sitescope_llm::{CompletionRequest, CompletionResponse, Result as LlmResult};
    use std::path::Path;
    use std::time::Duration;

    struct OnePageSession;

    struct OnePage;

    #[async_trait::async_trait]
    impl BrowserSession for OnePageSession {
        async fn open_page(&self) -> BrowserResult<Box<dyn PageHandle>> {
            Ok(Box::new(OnePage))
        }
    }

    #[async_trait::async_trait]
    impl PageHandle for OnePage {
        async fn navigate(
            &self,
            url: &str,
            _timeout: Duration,
        ) -> BrowserResult<NavigationResponse> {
            if url == "https://example.com/" {
                Ok(NavigationResponse::from_status(Some(200)))
            } else {
                Ok(NavigationResponse::from_status(Some(404)))
            }
        }

        async fn content(&self) -> BrowserResult<String> {
            Ok(r#"<html lang="en"><head><title>Single page site</title></head>
                <body><h1>Hello</h1></body></html>"#
                .to_string())
        }

        async fn current_url(&self) -> BrowserResult<String> {
            Ok("https://example.com/".to_string())
        }

        async fn screenshot(&self, _path: &Path) -> BrowserResult<()> {
            Err(BrowserError::Screenshot("not supported".to_string()))
        }

        async fn set_content(&self, _html: &str) -> BrowserResult<()> {
            Ok(())
        }

        async fn close(self: Box<Self>) -> BrowserResult<()> {
            Ok(())
        }
    }

    struct QuietProvider;

    #[async_trait::async_trait]
    impl LlmProvider for QuietProvider {
        async fn complete(&self, _request: CompletionRequest) -> LlmResult<CompletionResponse> {
            Ok(CompletionResponse {
                content: "Looks fine.".to_string(),
                model: "quiet".to_string(),
                stop_reason: Some("stop".to_string()),
            })
        }

        async fn healthcheck(&self) -> LlmResult<()> {
            Ok(())
        }

        fn provider_id(&self) -> &'static str {
            "quiet"
        }
    }

    #[tokio::test]
    async fn test_one_page_end_to_end() {
        let tmp = tempfile::TempDir::new().expect("tempdir");
        let mut config = AppConfig::default();
        config.crawl.max_depth = 5;
        config.crawl.max_pages = 50;
        config.crawl.request_delay_ms = 0;
        config.crawl.retry_delay_ms = 1;
        config.report.output_dir = tmp.path().to_path_buf();

        let aggregate = run_audit(
            Arc::new(OnePageSession),
            Arc::new(QuietProvider),
            &config,
            "https://example.com/",
            SiteCategory::Other,
            None,
        )
        .await
        .expect("audit");

        assert_eq!(aggregate.pages.len(), 1);
        let record = aggregate.pages[0].analysis.as_ref().expect("analysis");
        assert!(record.links.is_ok());
        assert!(record.accessibility.is_ok());
        assert!(record.seo.is_ok());
        assert!(record.performance.is_ok());
        assert!(record.ai.is_ok());
        assert_eq!(aggregate.pages[0].page.depth, 0);

        let summary = aggregate.summary.expect("summary");
        assert_eq!(summary.pages_crawled, 1);
    }

    #[test]
    fn test_cli_overrides_applied() {
        let cli = Cli::parse_from([
            "sitescope",
            "https://example.com",
            "--depth",
            "4",
            "--max-pages",
            "10",
            "--exclude",
            "/admin/*",
            "--auth",
            "user:pass",
            "--provider",
            "openai",
        ]);
        let mut config = AppConfig::default();
        apply_cli_overrides(&mut config, &cli).expect("overrides");

        assert_eq!(config.crawl.max_depth, 4);
        assert_eq!(config.crawl.max_pages, 10);
        assert_eq!(config.crawl.exclude_patterns, vec!["/admin/*".to_string()]);
        let auth = config.crawl.basic_auth.expect("auth parsed");
        assert_eq!(auth.username, "user");
        assert_eq!(auth.password, "pass");
        assert_eq!(config.llm.provider, "openai");
    }

    #[test]
    fn test_malformed_auth_rejected() {
        let cli = Cli::parse_from(["sitescope", "https://example.com", "--auth", "nopass"]);
        let mut config = AppConfig::default();
        let err = apply_cli_overrides(&mut config, &cli).expect_err("should fail");
        assert!(err.to_string().contains("user:password"));
    }
}
