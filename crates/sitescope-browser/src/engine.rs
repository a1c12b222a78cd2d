use crate::error::{BrowserError, Result};
use crate::session::{BrowserSession, NavigationResponse, PageHandle};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::{Page, ScreenshotParams};
use futures_util::stream::StreamExt;
use std::path::Path;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Browser automation engine backed by a single Chromium process.
///
/// One engine is shared (behind `Arc`) across the crawler and every analyzer
/// for the whole audit run; launching a browser per page is too unstable and
/// too expensive for untrusted target sites. Only the run controller calls
/// [`shutdown`](ChromiumEngine::shutdown), and it must do so on every exit
/// path.
pub struct ChromiumEngine {
    browser: Mutex<Browser>,
    handler_task: JoinHandle<()>,
}

impl ChromiumEngine {
    /// Launch a Chromium process with the given settings.
    pub async fn launch(settings: &sitescope_core::BrowserConfig) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(settings.window_width, settings.window_height);

        if !settings.headless {
            builder = builder.with_head();
        }

        let config = builder
            .build()
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;

        // Drive the CDP event loop for the lifetime of the engine
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        tracing::debug!("Chromium launched (headless: {})", settings.headless);

        Ok(Self {
            browser: Mutex::new(browser),
            handler_task,
        })
    }

    /// Close the browser process and stop the event loop.
    pub async fn shutdown(&self) -> Result<()> {
        let mut browser = self.browser.lock().await;
        if let Err(e) = browser.close().await {
            tracing::warn!("Browser close reported: {}", e);
        }
        self.handler_task.abort();
        tracing::debug!("Chromium shut down");
        Ok(())
    }
}

#[async_trait::async_trait]
impl BrowserSession for ChromiumEngine {
    async fn open_page(&self) -> Result<Box<dyn PageHandle>> {
        let browser = self.browser.lock().await;
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        Ok(Box::new(ChromiumPage { page }))
    }
}

/// One open Chromium tab.
struct ChromiumPage {
    page: Page,
}

#[async_trait::async_trait]
impl PageHandle for ChromiumPage {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<NavigationResponse> {
        let nav = async {
            self.page
                .goto(url)
                .await
                .map_err(|e| BrowserError::NavigationError(e.to_string()))?;
            self.page
                .wait_for_navigation_response()
                .await
                .map_err(|e| BrowserError::NavigationError(e.to_string()))
        };

        match tokio::time::timeout(timeout, nav).await {
            Ok(Ok(response)) => {
                let status = response
                    .as_ref()
                    .and_then(|r| r.response.as_ref())
                    .and_then(|r| u16::try_from(r.status).ok());
                Ok(NavigationResponse::from_status(status))
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(BrowserError::Timeout(format!(
                "navigation to {url} exceeded {timeout:?}"
            ))),
        }
    }

    async fn content(&self) -> Result<String> {
        self.page
            .content()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))
    }

    async fn current_url(&self) -> Result<String> {
        let url = self
            .page
            .url()
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        url.ok_or_else(|| BrowserError::NavigationError("page has no URL".to_string()))
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build();

        self.page
            .save_screenshot(params, path)
            .await
            .map_err(|e| BrowserError::Screenshot(e.to_string()))?;
        Ok(())
    }

    async fn set_content(&self, html: &str) -> Result<()> {
        self.page
            .set_content(html)
            .await
            .map_err(|e| BrowserError::ChromiumError(e.to_string()))?;
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.page
            .close()
            .await
            .map_err(|e| BrowserError::PageClosed(e.to_string()))
    }
}
