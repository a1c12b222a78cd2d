use thiserror::Error;

pub type Result<T> = std::result::Result<T, BrowserError>;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("chromium error: {0}")]
    ChromiumError(String),

    #[error("navigation failed: {0}")]
    NavigationError(String),

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("screenshot failed: {0}")]
    Screenshot(String),

    #[error("page closed: {0}")]
    PageClosed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BrowserError::NavigationError("page not found".to_string());
        assert_eq!(err.to_string(), "navigation failed: page not found");
    }

    #[test]
    fn test_http_status_error() {
        let err = BrowserError::HttpStatus {
            url: "https://example.com/missing".to_string(),
            status: 404,
        };
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("example.com"));
    }
}
