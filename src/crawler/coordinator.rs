//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that drives the single shared browser
//! page across a site:
//! - Popping frontier entries breadth-first
//! - Gating non-HTML resources before loading them
//! - Loading pages with bounded retries
//! - Running every link discovery strategy and enqueueing new in-scope URLs
//! - Applying the depth and page-count ceilings
//!
//! Only [`CrawlError::BrowserFatal`] ends a crawl early; every other failure
//! forfeits one page or one discovery pass and the loop moves on.

use crate::browser::BrowserPage;
use crate::config::Config;
use crate::crawler::events::{CrawlEvent, EventSink};
use crate::crawler::frontier::{Frontier, FrontierEntry};
use crate::crawler::gate::{ContentTypeGate, GateVerdict};
use crate::crawler::links::{AnchorLinkExtractor, InteractiveLinkExtractor, LinkDiscovery};
use crate::crawler::retry::{with_retry, RetryPolicy};
use crate::state::CrawlPhase;
use crate::url::{canonicalize_absolute, CrawlTarget};
use crate::CrawlError;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// How a crawl ended
#[derive(Debug)]
pub enum CrawlStatus {
    /// The pending queue emptied or a ceiling was reached
    Finished,

    /// The shutdown signal fired before the crawl finished
    Interrupted,

    /// The browser became unreachable
    Aborted(CrawlError),
}

impl CrawlStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Finished => "finished",
            Self::Interrupted => "interrupted",
            Self::Aborted(_) => "aborted",
        }
    }
}

/// Everything a crawl accumulated, however it ended
#[derive(Debug)]
pub struct CrawlReport {
    pub target: CrawlTarget,

    /// Visited URLs in visit order, skipped non-HTML resources included
    pub visited: Vec<Url>,

    /// URLs marked visited without loading (non-HTML content type)
    pub skipped: usize,

    /// URLs whose load exhausted its retries
    pub failed: usize,

    /// Entries still queued when the crawl stopped
    pub pending: usize,

    pub status: CrawlStatus,
}

/// The frontier scheduler
///
/// Owns the pending queue and the visited set for the duration of a crawl
/// and has exclusive use of the browser page.
pub struct Crawler<'a, P: BrowserPage> {
    page: &'a P,
    target: CrawlTarget,
    frontier: Frontier,
    extractors: Vec<Box<dyn LinkDiscovery<P>>>,
    gate: Option<ContentTypeGate>,
    load_policy: RetryPolicy,
    network_idle_timeout: Duration,
    max_depth: Option<u32>,
    max_pages: Option<usize>,
    events: EventSink,
    phase: CrawlPhase,
    skipped: usize,
}

impl<'a, P: BrowserPage> Crawler<'a, P> {
    /// Creates a crawler for `target` driving `page`
    ///
    /// The default strategies run in order: anchors first, then interactive
    /// click discovery.
    ///
    /// # Arguments
    ///
    /// * `page` - The browser page every operation goes through
    /// * `target` - The site to crawl; its root seeds the frontier
    /// * `config` - Crawler, browser and gate settings
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to run
    /// * `Err(CrawlError)` - The HEAD client could not be built
    pub fn new(page: &'a P, target: CrawlTarget, config: &Config) -> Result<Self, CrawlError> {
        let gate = if config.gate.enabled {
            Some(ContentTypeGate::new(&config.gate)?)
        } else {
            None
        };

        let extractors: Vec<Box<dyn LinkDiscovery<P>>> = vec![
            Box::new(AnchorLinkExtractor::new(config.crawler.anchor_source)),
            Box::new(InteractiveLinkExtractor::from_config(config)),
        ];

        Ok(Self {
            page,
            frontier: Frontier::seeded(target.root().clone()),
            target,
            extractors,
            gate,
            load_policy: RetryPolicy::new(
                config.crawler.page_load_attempts,
                config.crawler.backoff_unit(),
            ),
            network_idle_timeout: config.browser.network_idle_timeout(),
            max_depth: config.crawler.max_depth,
            max_pages: config.crawler.max_pages,
            events: EventSink::disabled(),
            phase: CrawlPhase::Idle,
            skipped: 0,
        })
    }

    /// Replaces the content-type gate (`None` disables it)
    pub fn with_gate(mut self, gate: Option<ContentTypeGate>) -> Self {
        self.gate = gate;
        self
    }

    /// Sends crawl events to `events`
    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    /// Replaces the link discovery strategies
    pub fn with_extractors(mut self, extractors: Vec<Box<dyn LinkDiscovery<P>>>) -> Self {
        self.extractors = extractors;
        self
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn target(&self) -> &CrawlTarget {
        &self.target
    }

    /// Crawls until the frontier is exhausted or the browser is lost
    pub async fn run(self) -> CrawlReport {
        self.run_until(std::future::pending()).await
    }

    /// Crawls until done or until `shutdown` resolves
    ///
    /// On shutdown the in-flight operation is dropped at its next suspension
    /// point and the report holds everything visited up to then.
    pub async fn run_until<F>(mut self, shutdown: F) -> CrawlReport
    where
        F: Future<Output = ()>,
    {
        self.enter(CrawlPhase::Running);
        tracing::info!("Starting crawl of {}", self.target.root());
        self.events.emit(CrawlEvent::CrawlStarted {
            root: self.target.root().clone(),
        });

        let status = {
            let work = self.crawl_loop();
            tokio::select! {
                result = work => match result {
                    Ok(()) => CrawlStatus::Finished,
                    Err(e) => CrawlStatus::Aborted(e),
                },
                _ = shutdown => CrawlStatus::Interrupted,
            }
        };

        self.enter(CrawlPhase::Done);

        match &status {
            CrawlStatus::Finished => tracing::info!(
                "Crawl finished: {} visited, {} skipped, {} failed",
                self.frontier.visited_len(),
                self.skipped,
                self.frontier.failed_len()
            ),
            CrawlStatus::Interrupted => tracing::warn!(
                "Crawl interrupted with {} pages visited and {} pending",
                self.frontier.visited_len(),
                self.frontier.pending_len()
            ),
            CrawlStatus::Aborted(e) => tracing::error!("Crawl aborted: {}", e),
        }

        self.events.emit(CrawlEvent::CrawlFinished {
            visited: self.frontier.visited_len(),
            status: status.label().to_string(),
        });

        CrawlReport {
            target: self.target.clone(),
            visited: self.frontier.visited().to_vec(),
            skipped: self.skipped,
            failed: self.frontier.failed_len(),
            pending: self.frontier.pending_len(),
            status,
        }
    }

    async fn crawl_loop(&mut self) -> Result<(), CrawlError> {
        let mut processed = 0usize;

        while let Some(entry) = self.frontier.pop() {
            if self.phase.accepts_new_work() && self.at_depth_ceiling(entry.depth) {
                tracing::info!("Depth ceiling {} reached; draining", entry.depth);
                self.enter(CrawlPhase::Draining);
            }

            // a redirect may have marked it visited while it was pending
            if self.frontier.is_visited(&entry.url) {
                continue;
            }

            self.process(&entry).await?;
            processed += 1;

            if processed % 10 == 0 {
                tracing::info!(
                    "Progress: {} processed, {} visited, {} pending",
                    processed,
                    self.frontier.visited_len(),
                    self.frontier.pending_len()
                );
            }

            if self.at_page_ceiling() {
                let dropped = self.frontier.clear_pending();
                tracing::info!(
                    "Page ceiling reached at {} visited; dropping {} pending",
                    self.frontier.visited_len(),
                    dropped
                );
                self.enter(CrawlPhase::Draining);
            }
        }

        Ok(())
    }

    /// Processes one entry: gate, load, mark visited, discover
    async fn process(&mut self, entry: &FrontierEntry) -> Result<(), CrawlError> {
        let url = &entry.url;

        if let Some(gate) = &self.gate {
            match gate.check(url).await {
                GateVerdict::Html => {}
                GateVerdict::NotHtml { content_type } => {
                    tracing::info!("Skipping {} ({})", url, content_type);
                    self.frontier.mark_visited(url);
                    self.skipped += 1;
                    self.events.emit(CrawlEvent::PageSkipped {
                        url: url.clone(),
                        content_type,
                    });
                    return Ok(());
                }
                GateVerdict::Inconclusive { reason } => {
                    tracing::debug!("Content type of {} unknown ({}); loading", url, reason);
                }
            }
        }

        let page = self.page;
        let idle_timeout = self.network_idle_timeout;
        let loaded = with_retry(&self.load_policy, &format!("load {}", url), || async move {
            page.open(url.as_str()).await?;
            page.wait_for_network_idle(idle_timeout).await?;
            Ok::<_, CrawlError>(page.current_url().await?)
        })
        .await;

        let location = match loaded {
            Ok(location) => location,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", url, e);
                self.frontier.mark_failed(url);
                self.events.emit(CrawlEvent::OperationFailed {
                    url: url.clone(),
                    error: e.to_string(),
                });
                return Ok(());
            }
        };

        self.frontier.mark_visited(url);
        tracing::info!("Visited {} (depth {})", url, entry.depth);
        self.events.emit(CrawlEvent::PageVisited {
            url: url.clone(),
            depth: entry.depth,
        });

        let base = match canonicalize_absolute(&location) {
            Ok(landed) if landed == *url => landed,
            Ok(landed) if self.target.admits(&landed) => {
                tracing::debug!("{} redirected to {}", url, landed);
                if self.at_page_ceiling() {
                    tracing::debug!("Page ceiling reached; not recording {}", landed);
                } else if self.frontier.mark_visited(&landed) {
                    self.events.emit(CrawlEvent::PageVisited {
                        url: landed.clone(),
                        depth: entry.depth,
                    });
                }
                landed
            }
            Ok(landed) => {
                tracing::info!("{} redirected out of scope to {}", url, landed);
                return Ok(());
            }
            Err(e) => {
                tracing::debug!("Unreadable location after loading {}: {}", url, e);
                url.clone()
            }
        };

        if !self.phase.accepts_new_work() {
            return Ok(());
        }

        self.discover(&base, entry.depth + 1).await
    }

    /// Runs every strategy on the loaded page and enqueues new URLs
    async fn discover(&mut self, base: &Url, next_depth: u32) -> Result<(), CrawlError> {
        for extractor in &self.extractors {
            let links = match extractor.discover_links(self.page, base, &self.target).await {
                Ok(links) => links,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::warn!("{} discovery failed on {}: {}", extractor.name(), base, e);
                    self.events.emit(CrawlEvent::OperationFailed {
                        url: base.clone(),
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            for link in links {
                if !self.target.admits(&link) {
                    tracing::trace!("Out of scope: {}", link);
                    continue;
                }

                if self.frontier.offer(link.clone(), next_depth) {
                    tracing::debug!("Queued {} from {} ({})", link, base, extractor.name());
                    self.events.emit(CrawlEvent::LinkFound {
                        url: link,
                        source: extractor.name(),
                        depth: next_depth,
                    });
                }
            }
        }

        Ok(())
    }

    fn at_depth_ceiling(&self, depth: u32) -> bool {
        self.max_depth.is_some_and(|max| depth >= max)
    }

    fn at_page_ceiling(&self) -> bool {
        self.max_pages
            .is_some_and(|max| self.frontier.visited_len() >= max)
    }

    fn enter(&mut self, next: CrawlPhase) {
        if self.phase == next {
            return;
        }
        if let Err(e) = self.phase.advance(next) {
            tracing::debug!("{}", e);
        }
    }
}
