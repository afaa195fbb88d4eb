//! Crawler module: the crawl engine
//!
//! This module contains the core crawling logic, including:
//! - The frontier scheduler driving the shared browser page
//! - Retry with exponential backoff around browser operations
//! - The content-type gate for non-HTML resources
//! - Static and interactive link discovery
//! - The structured event stream consumed by presentation layers

mod coordinator;
mod events;
mod frontier;
mod gate;
mod links;
mod parser;
mod retry;

pub use coordinator::{CrawlReport, CrawlStatus, Crawler};
pub use events::{CrawlEvent, EventSink, SourceName};
pub use frontier::{Frontier, FrontierEntry};
pub use gate::{
    build_http_client, head_request, is_html_content_type, ContentTypeGate, GateVerdict,
    HeadResponse,
};
pub use links::{AnchorLinkExtractor, InteractiveLinkExtractor, LinkDiscovery};
pub use parser::{parse_html, resolve_link, ANCHOR_SELECTOR};
pub use retry::{with_retry, RetryPolicy};

use crate::browser::BrowserPage;
use crate::config::Config;
use crate::url::CrawlTarget;
use crate::CrawlError;

/// Crawls `target` with the default strategies until the frontier empties
///
/// # Arguments
///
/// * `page` - The browser page to drive
/// * `target` - The site to crawl
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The crawl ran; check `status` for how it ended
/// * `Err(CrawlError)` - The crawler could not be constructed
pub async fn crawl<P: BrowserPage>(
    page: &P,
    target: CrawlTarget,
    config: &Config,
) -> Result<CrawlReport, CrawlError> {
    Ok(Crawler::new(page, target, config)?.run().await)
}
