//! Command-line surface.

use clap::{Parser, ValueEnum};
use sitescope_core::SiteCategory;
use std::path::PathBuf;

/// Audit a website: crawl it, run the analyzer battery, write reports.
#[derive(Debug, Parser)]
#[command(name = "sitescope", version, about)]
pub struct Cli {
    /// Target URL to audit
    pub url: String,

    /// Free-text context handed to the AI reviewer (audience, goals, ...)
    #[arg(long)]
    pub context: Option<String>,

    /// Site category shaping the AI prompts
    #[arg(long, value_enum, default_value_t = CategoryArg::Other)]
    pub category: CategoryArg,

    /// Maximum crawl depth (start URL is depth 0)
    #[arg(long)]
    pub depth: Option<usize>,

    /// Maximum number of pages to fetch
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Glob-style URL exclude pattern; repeatable
    #[arg(long = "exclude")]
    pub exclude: Vec<String>,

    /// Output directory for reports, checkpoints, screenshots and archives
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Capture a full-page screenshot of every page
    #[arg(long)]
    pub screenshots: bool,

    /// Archive the raw HTML of every page
    #[arg(long)]
    pub archive: bool,

    /// Basic-auth credentials as user:password
    #[arg(long)]
    pub auth: Option<String>,

    /// LLM provider backend: ollama or openai
    #[arg(long)]
    pub provider: Option<String>,

    /// Model identifier passed to the provider
    #[arg(long)]
    pub model: Option<String>,

    /// Local model server URL
    #[arg(long)]
    pub ollama_url: Option<String>,
}

/// CLI-facing mirror of [`SiteCategory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    Ecommerce,
    Blog,
    Corporate,
    Documentation,
    Portfolio,
    Other,
}

impl From<CategoryArg> for SiteCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Ecommerce => Self::Ecommerce,
            CategoryArg::Blog => Self::Blog,
            CategoryArg::Corporate => Self::Corporate,
            CategoryArg::Documentation => Self::Documentation,
            CategoryArg::Portfolio => Self::Portfolio,
            CategoryArg::Other => Self::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_invocation() {
        let cli = Cli::parse_from(["sitescope", "https://example.com"]);
        assert_eq!(cli.url, "https://example.com");
        assert_eq!(cli.category, CategoryArg::Other);
        assert!(cli.exclude.is_empty());
        assert!(!cli.screenshots);
    }

    #[test]
    fn test_full_invocation() {
        let cli = Cli::parse_from([
            "sitescope",
            "https://example.com",
            "--depth",
            "3",
            "--max-pages",
            "40",
            "--exclude",
            "/admin/*",
            "--exclude",
            "/cart/*",
            "--category",
            "ecommerce",
            "--context",
            "B2C shop",
            "--screenshots",
            "--archive",
            "--auth",
            "user:secret",
            "--provider",
            "openai",
            "--model",
            "gpt-4o",
            "-o",
            "/tmp/audit",
        ]);
        assert_eq!(cli.depth, Some(3));
        assert_eq!(cli.max_pages, Some(40));
        assert_eq!(cli.exclude.len(), 2);
        assert_eq!(cli.category, CategoryArg::Ecommerce);
        assert!(cli.screenshots);
        assert_eq!(cli.auth.as_deref(), Some("user:secret"));
        assert_eq!(cli.provider.as_deref(), Some("openai"));
    }

    #[test]
    fn test_category_conversion() {
        assert_eq!(SiteCategory::from(CategoryArg::Blog), SiteCategory::Blog);
        assert_eq!(SiteCategory::from(CategoryArg::Other), SiteCategory::Other);
    }
}
