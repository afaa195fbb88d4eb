//! Click-based discovery for script-driven pseudo-links
//!
//! Site builders often render navigation as elements with `role="link"` and
//! a click handler instead of an `href`. The only way to learn their target
//! is to click them. Each candidate runs inside a [`PagePosition`] scope, so
//! the shared page is back at its origin before the next candidate starts.

use super::LinkDiscovery;
use crate::browser::{BrowserPage, PagePosition};
use crate::config::Config;
use crate::crawler::retry::{with_retry, RetryPolicy};
use crate::url::{canonicalize_absolute, is_same_site, CrawlTarget};
use crate::CrawlError;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// Interactive link extraction by clicking candidate elements
#[derive(Debug, Clone)]
pub struct InteractiveLinkExtractor {
    selector: String,
    trigger: Option<String>,
    visibility_timeout: Duration,
    settle_delay: Duration,
    network_idle_timeout: Duration,
    retry: RetryPolicy,
}

impl InteractiveLinkExtractor {
    pub fn from_config(config: &Config) -> Self {
        Self {
            selector: config.crawler.interactive_selector.clone(),
            trigger: config.crawler.interactive_trigger.clone(),
            visibility_timeout: config.browser.visibility_timeout(),
            settle_delay: config.browser.settle_delay(),
            network_idle_timeout: config.browser.network_idle_timeout(),
            retry: RetryPolicy::new(
                config.crawler.interactive_attempts,
                config.crawler.backoff_unit(),
            ),
        }
    }

    /// Returns true if the interactive pass should run on the current page
    async fn is_triggered<P: BrowserPage>(&self, page: &P) -> Result<bool, CrawlError> {
        match &self.trigger {
            Some(trigger) => Ok(!page.query_all(trigger).await?.is_empty()),
            None => Ok(true),
        }
    }

    /// One attempt at candidate `index`: wait, settle, click, observe
    ///
    /// The candidate list is re-queried on every attempt because a stale
    /// handle from an earlier attempt cannot be clicked.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(url))` - The click navigated to `url`
    /// * `Ok(None)` - The click did not change the location
    async fn attempt_candidate<P: BrowserPage>(
        &self,
        page: &P,
        origin: &str,
        index: usize,
    ) -> Result<Option<Url>, CrawlError> {
        PagePosition::hold(page, origin, self.network_idle_timeout)
            .scope(|page| async move {
                let element = page
                    .query_all(&self.selector)
                    .await?
                    .into_iter()
                    .nth(index)
                    .ok_or_else(|| {
                        CrawlError::ElementNotInteractable(format!(
                            "{} #{} no longer present",
                            self.selector, index
                        ))
                    })?;

                page.wait_for_visible(&element, self.visibility_timeout).await?;
                tokio::time::sleep(self.settle_delay).await;
                page.click(&element).await?;
                page.wait_for_network_idle(self.network_idle_timeout).await?;

                let landed = canonicalize_absolute(&page.current_url().await?)?;
                let navigated = landed != canonicalize_absolute(origin)?;
                Ok::<_, CrawlError>(navigated.then_some(landed))
            })
            .await
    }
}

#[async_trait]
impl<P: BrowserPage> LinkDiscovery<P> for InteractiveLinkExtractor {
    fn name(&self) -> &'static str {
        "interactive"
    }

    async fn discover_links(
        &self,
        page: &P,
        page_url: &Url,
        target: &CrawlTarget,
    ) -> Result<Vec<Url>, CrawlError> {
        if !self.is_triggered(page).await? {
            return Ok(Vec::new());
        }

        let origin = page.current_url().await?;
        let candidates = page.query_all(&self.selector).await?.len();
        if candidates == 0 {
            return Ok(Vec::new());
        }

        tracing::debug!("{} interactive candidates on {}", candidates, page_url);

        let mut links = Vec::new();
        for index in 0..candidates {
            let label = format!("click {} #{}", self.selector, index);
            let outcome = with_retry(&self.retry, &label, || {
                self.attempt_candidate(page, &origin, index)
            })
            .await;

            match outcome {
                Ok(Some(url)) if is_same_site(&url, target.domain()) => {
                    tracing::debug!("{} on {} led to {}", label, page_url, url);
                    links.push(url);
                }
                Ok(Some(url)) => {
                    tracing::debug!("{} on {} left the site for {}", label, page_url, url);
                }
                Ok(None) => {
                    tracing::debug!("{} on {}: no navigation occurred", label, page_url);
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::warn!("{} on {} abandoned: {}", label, page_url, e);
                }
            }
        }

        Ok(links)
    }
}
