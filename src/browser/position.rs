//! Scoped page position with guaranteed restoration
//!
//! Interactive discovery clicks elements that navigate the one shared page
//! away from the document being crawled. [`PagePosition`] captures where the
//! page must return to and [`PagePosition::scope`] runs a body from that
//! position, then restores it on every exit path, error or not.

use super::{BrowserError, BrowserPage};
use crate::CrawlError;
use std::future::Future;
use std::time::Duration;

/// A held position of the shared page
///
/// Dropping a position without calling [`PagePosition::restore`] (for
/// example when the crawl future is cancelled mid-click) logs a warning: the
/// next operation may start from a drifted location.
pub struct PagePosition<'a, P: BrowserPage> {
    page: &'a P,
    origin: String,
    idle_timeout: Duration,
    restored: bool,
}

impl<'a, P: BrowserPage> PagePosition<'a, P> {
    /// Holds `origin` as the location to come back to
    ///
    /// Every return to the origin waits up to `idle_timeout` for the network
    /// to settle, so script-built content is rendered before the next query.
    pub fn hold(page: &'a P, origin: impl Into<String>, idle_timeout: Duration) -> Self {
        Self {
            page,
            origin: origin.into(),
            idle_timeout,
            restored: false,
        }
    }

    async fn return_to_origin(&self) -> Result<(), BrowserError> {
        self.page.open(&self.origin).await?;
        self.page.wait_for_network_idle(self.idle_timeout).await
    }

    /// Brings the page back to the origin if an earlier operation left it
    /// somewhere else
    pub async fn ensure_at_origin(&self) -> Result<(), BrowserError> {
        let here = self.page.current_url().await?;
        if here == self.origin {
            return Ok(());
        }

        tracing::debug!("Page drifted to {}; returning to {}", here, self.origin);
        self.return_to_origin().await
    }

    /// Returns the page to the held origin
    ///
    /// When `force` is false and the page is already at the origin, no
    /// navigation is issued. A failed body passes `force = true` because the
    /// document state is unknown even if the location did not change.
    pub async fn restore(mut self, force: bool) -> Result<(), BrowserError> {
        self.restored = true;

        if !force {
            match self.page.current_url().await {
                Ok(here) if here == self.origin => return Ok(()),
                Ok(here) => {
                    tracing::debug!("Restoring page from {} to {}", here, self.origin);
                }
                Err(e @ BrowserError::Disconnected(_)) => return Err(e),
                Err(e) => {
                    tracing::debug!("Could not read location before restore: {}", e);
                }
            }
        }

        self.return_to_origin().await
    }

    /// Runs `body` from the held origin, then restores the origin
    ///
    /// The body never runs unless the page is at the origin: if returning
    /// there fails, the body is skipped and that failure is returned.
    ///
    /// A body that succeeded keeps its value when restoring fails, unless
    /// restoring found the browser gone. A failed body's error wins over a
    /// restore error, with the same exception.
    pub async fn scope<T, F, Fut>(self, body: F) -> Result<T, CrawlError>
    where
        F: FnOnce(&'a P) -> Fut,
        Fut: Future<Output = Result<T, CrawlError>>,
    {
        // dropping `self` here warns that the origin was never reached
        self.ensure_at_origin().await?;

        let outcome = body(self.page).await;
        let origin = self.origin.clone();
        let restored = self.restore(outcome.is_err()).await.map_err(CrawlError::from);

        match (outcome, restored) {
            (outcome, Ok(())) => outcome,
            (_, Err(restore_err)) if restore_err.is_fatal() => Err(restore_err),
            (outcome, Err(restore_err)) => {
                tracing::warn!("Failed to restore {}: {}", origin, restore_err);
                outcome
            }
        }
    }
}

impl<P: BrowserPage> Drop for PagePosition<'_, P> {
    fn drop(&mut self) {
        if !self.restored {
            tracing::warn!(
                "Page position at {} released without restoring it",
                self.origin
            );
        }
    }
}
