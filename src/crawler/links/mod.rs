//! Link discovery strategies
//!
//! The scheduler treats every strategy the same way: hand it the loaded page
//! and collect the URLs it reports. Two strategies exist:
//!
//! - [`AnchorLinkExtractor`]: reads `href` attributes of anchors
//! - [`InteractiveLinkExtractor`]: clicks link-like elements without an
//!   `href` and watches where the page goes

mod anchors;
mod interactive;

pub use anchors::AnchorLinkExtractor;
pub use interactive::InteractiveLinkExtractor;

use crate::browser::BrowserPage;
use crate::url::CrawlTarget;
use crate::CrawlError;
use async_trait::async_trait;
use url::Url;

/// A way of finding outbound links on a loaded page
///
/// Implementations report same-site URLs in discovery order and do not
/// deduplicate; the frontier does that. Only fatal errors should escape:
/// per-element failures are contained by the strategy itself.
#[async_trait]
pub trait LinkDiscovery<P: BrowserPage>: Send + Sync {
    /// Short name used in logs and events
    fn name(&self) -> &'static str;

    /// Discovers links on the page currently loaded at `page_url`
    ///
    /// # Arguments
    ///
    /// * `page` - The shared browser page, positioned at `page_url`
    /// * `page_url` - The canonical location of the loaded document
    /// * `target` - The site being crawled
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Url>)` - Same-site URLs, possibly empty, duplicates kept
    /// * `Err(CrawlError)` - The pass could not run at all
    async fn discover_links(
        &self,
        page: &P,
        page_url: &Url,
        target: &CrawlTarget,
    ) -> Result<Vec<Url>, CrawlError>;
}
