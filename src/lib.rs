//! Sitegrove: a browser-driven site mapper
//!
//! This crate drives a real browser page across a single website, discovers
//! every in-scope page through anchor extraction and click-based discovery,
//! and folds the visited URLs into a nested sitemap tree.

pub mod browser;
pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for crawl operations
///
/// Every variant except [`CrawlError::BrowserFatal`] is contained by the
/// crawl loop: it forfeits one page or one link and the crawl continues.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Malformed URL: {0}")]
    MalformedUrl(#[from] UrlError),

    #[error("Element never became interactable: {0}")]
    ElementNotInteractable(String),

    #[error("Timed out during {0}")]
    NavigationTimeout(String),

    #[error("Gave up after {attempts} attempts: {last}")]
    OperationExhausted {
        attempts: u32,
        last: Box<CrawlError>,
    },

    #[error("Metadata request for {url} failed: {reason}")]
    FetchFailure { url: String, reason: String },

    #[error("Browser is unreachable: {0}")]
    BrowserFatal(String),

    #[error("Browser operation failed: {0}")]
    Browser(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CrawlError {
    /// Returns true if no further browser work is possible
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::BrowserFatal(_) => true,
            Self::OperationExhausted { last, .. } => last.is_fatal(),
            _ => false,
        }
    }

    /// Returns true if another attempt at the same operation may succeed
    ///
    /// Fatal browser loss and elements that never became interactable are
    /// not retried: the first ends the crawl, the second abandons the
    /// candidate element.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            Self::BrowserFatal(_) | Self::ElementNotInteractable(_)
        )
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse '{url}': {reason}")]
    Parse { url: String, reason: String },

    #[error("Unsupported URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL: {0}")]
    MissingDomain(String),
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlReport, CrawlStatus, Crawler};
pub use output::{build_sitemap, SitemapTree};
pub use state::CrawlPhase;
pub use url::{canonicalize, is_same_site, is_within_scope, CrawlTarget};
