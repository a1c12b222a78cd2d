use sitescope_browser::BrowserError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("fetch failed for {url} after {attempts} attempts: {source}")]
    FetchFailed {
        url: String,
        attempts: u32,
        source: BrowserError,
    },

    #[error("page operation for {url} exceeded {timeout_secs}s")]
    PageTimeout { url: String, timeout_secs: u64 },

    #[error("browser error: {0}")]
    Browser(#[from] BrowserError),
}

pub type Result<T> = std::result::Result<T, CrawlError>;
