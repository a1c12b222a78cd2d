//! Configuration management for Sitescope.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides. CLI flags are applied on top by the
//! binary crate.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main application configuration.
///
/// This is loaded from `~/.config/sitescope/config.toml` (or platform
/// equivalent). If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Crawl frontier and fetch settings
    pub crawl: CrawlConfig,
    /// Browser automation settings
    pub browser: BrowserConfig,
    /// Analyzer stage settings
    pub analysis: AnalysisConfig,
    /// LLM provider settings
    pub llm: LlmConfig,
    /// Report output settings
    pub report: ReportConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(&config_path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `SITESCOPE_HEADLESS`: Override browser headless mode (true/false)
    /// - `SITESCOPE_MAX_PAGES`: Override the crawl page budget
    /// - `SITESCOPE_API_KEY`: API key for the hosted LLM provider
    /// - `SITESCOPE_OLLAMA_URL`: Override the local model server URL
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;

        if let Ok(val) = std::env::var("SITESCOPE_HEADLESS") {
            if let Ok(headless) = val.parse() {
                config.browser.headless = headless;
                tracing::debug!("Override browser.headless from env: {}", headless);
            }
        }

        if let Ok(val) = std::env::var("SITESCOPE_MAX_PAGES") {
            if let Ok(max_pages) = val.parse() {
                config.crawl.max_pages = max_pages;
                tracing::debug!("Override crawl.max_pages from env: {}", max_pages);
            }
        }

        if let Ok(val) = std::env::var("SITESCOPE_API_KEY") {
            if !val.is_empty() {
                config.llm.api_key = Some(val);
                tracing::debug!("Override llm.api_key from env");
            }
        }

        if let Ok(val) = std::env::var("SITESCOPE_OLLAMA_URL") {
            if !val.is_empty() {
                config.llm.ollama_url = val;
            }
        }

        Ok(config)
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/sitescope/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "sitescope", "sitescope").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Get the data directory path.
    ///
    /// Uses XDG base directories: `~/.local/share/sitescope`
    pub fn data_dir() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "sitescope", "sitescope").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.data_dir().to_path_buf())
    }
}

/// Crawl frontier and fetch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Maximum crawl depth (start URL is depth 0)
    pub max_depth: usize,
    /// Maximum number of pages to fetch
    pub max_pages: usize,
    /// Fixed delay between page fetches in milliseconds
    pub request_delay_ms: u64,
    /// Retry attempts per URL before the fetch counts as failed
    pub fetch_attempts: u32,
    /// Base retry delay in milliseconds (multiplied by the attempt number)
    pub retry_delay_ms: u64,
    /// Glob-style URL exclude patterns (`*` matches any run of characters)
    pub exclude_patterns: Vec<String>,
    /// Capture a full-page screenshot per page
    pub capture_screenshots: bool,
    /// Archive the raw HTML of each page to disk
    pub archive_html: bool,
    /// Basic-auth credentials applied to every navigated URL
    #[serde(skip)]
    pub basic_auth: Option<BasicAuth>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            max_pages: 30,
            request_delay_ms: 1000,
            fetch_attempts: 3,
            retry_delay_ms: 2000,
            exclude_patterns: Vec::new(),
            capture_screenshots: false,
            archive_html: false,
            basic_auth: None,
        }
    }
}

/// Basic-auth credentials for the audited site.
#[derive(Debug, Clone)]
pub struct BasicAuth {
    /// Username
    pub username: String,
    /// Password
    pub password: String,
}

/// Browser automation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// Per-navigation timeout in seconds
    pub navigation_timeout_secs: u64,
    /// Whole-page-operation timeout in seconds (navigation plus extraction)
    pub page_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            navigation_timeout_secs: 30,
            page_timeout_secs: 60,
        }
    }
}

/// Analyzer stage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Deadline per analyzer stage in seconds
    pub stage_deadline_secs: u64,
    /// Maximum links probed over HTTP per page
    pub max_checked_links: usize,
    /// Timeout per link probe in seconds
    pub link_probe_timeout_secs: u64,
    /// Maximum concurrent link probes
    pub max_inflight_probes: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            stage_deadline_secs: 300,
            max_checked_links: 20,
            link_probe_timeout_secs: 10,
            max_inflight_probes: 5,
        }
    }
}

/// LLM provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider backend: `ollama` or `openai`
    pub provider: String,
    /// Model identifier passed to the provider
    pub model: String,
    /// Local model server URL (ollama)
    pub ollama_url: String,
    /// Hosted API base URL (openai-compatible)
    pub api_base_url: String,
    /// Bearer token for the hosted provider (never persisted to disk)
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Maximum tokens per completion
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: "llama3.1:8b".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            api_base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            max_tokens: 1024,
            temperature: 0.7,
        }
    }
}

/// Report output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Output directory for reports, checkpoints, screenshots and archives
    pub output_dir: PathBuf,
    /// Render the Markdown report
    pub markdown: bool,
    /// Render the JSON report
    pub json: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("sitescope-out"),
            markdown: true,
            json: true,
        }
    }
}
