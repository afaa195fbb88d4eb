//! Browser capability consumed by the crawler
//!
//! The crawl engine never talks to a browser directly. It drives a single
//! page through [`BrowserPage`], which a backend (Chromium via
//! `chromiumoxide` with the `chrome` feature, or an in-memory fake in tests)
//! implements.
//!
//! All methods take `&self`: the page is one shared, mutable resource and
//! backends use interior mutability, the same way CDP page handles do. The
//! crawl loop is the only caller, so at most one operation is in flight.

#[cfg(feature = "chrome")]
mod chrome;
mod position;

#[cfg(feature = "chrome")]
pub use chrome::ChromePage;
pub use position::PagePosition;

use crate::CrawlError;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors reported by a browser backend
#[derive(Debug, Error)]
pub enum BrowserError {
    /// A bounded wait expired
    #[error("timed out waiting for {0}")]
    Timeout(String),

    /// The element never became visible
    #[error("element is not visible: {0}")]
    NotVisible(String),

    /// The browser process or its connection is gone
    #[error("browser disconnected: {0}")]
    Disconnected(String),

    /// Navigation was refused or failed
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// Any other protocol-level failure (stale node, evaluation error, ...)
    #[error("{0}")]
    Protocol(String),
}

impl From<BrowserError> for CrawlError {
    fn from(err: BrowserError) -> Self {
        match err {
            BrowserError::Timeout(what) => CrawlError::NavigationTimeout(what),
            BrowserError::NotVisible(what) => CrawlError::ElementNotInteractable(what),
            BrowserError::Disconnected(reason) => CrawlError::BrowserFatal(reason),
            other => CrawlError::Browser(other.to_string()),
        }
    }
}

/// A single live browser page
///
/// Element handles are only valid until the page navigates; callers must
/// re-query after any navigation.
#[async_trait]
pub trait BrowserPage: Send + Sync {
    /// Opaque handle to a DOM element on the current document
    type Element: Send + Sync;

    /// Navigates to `url` and waits for the load to commit
    async fn open(&self, url: &str) -> Result<(), BrowserError>;

    /// The page's current location
    async fn current_url(&self) -> Result<String, BrowserError>;

    /// All elements matching a CSS selector, in document order
    async fn query_all(&self, selector: &str) -> Result<Vec<Self::Element>, BrowserError>;

    /// Reads an attribute of an element
    async fn attribute(
        &self,
        element: &Self::Element,
        name: &str,
    ) -> Result<Option<String>, BrowserError>;

    /// Clicks an element
    async fn click(&self, element: &Self::Element) -> Result<(), BrowserError>;

    /// Waits until the element can receive a click
    async fn wait_for_visible(
        &self,
        element: &Self::Element,
        timeout: Duration,
    ) -> Result<(), BrowserError>;

    /// Waits until the page has had no network activity for a short window
    async fn wait_for_network_idle(&self, timeout: Duration) -> Result<(), BrowserError>;

    /// Serialized HTML of the current document
    async fn content(&self) -> Result<String, BrowserError>;
}
