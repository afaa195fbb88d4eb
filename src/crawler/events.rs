//! Structured crawl events
//!
//! The crawl core reports progress as [`CrawlEvent`]s instead of printing.
//! A presentation layer (see `output::console`) drains the receiving end.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use url::Url;

/// Which link discovery strategy produced a link
pub type SourceName = &'static str;

/// Something observable that happened during a crawl
#[derive(Debug, Clone, PartialEq)]
pub enum CrawlEvent {
    CrawlStarted {
        root: Url,
    },
    /// A page was loaded and added to the visited set
    PageVisited {
        url: Url,
        depth: u32,
    },
    /// A URL was marked visited without loading it
    PageSkipped {
        url: Url,
        content_type: String,
    },
    /// A new URL entered the pending queue
    LinkFound {
        url: Url,
        source: SourceName,
        depth: u32,
    },
    /// A contained failure forfeited one page or one discovery pass
    OperationFailed {
        url: Url,
        error: String,
    },
    CrawlFinished {
        visited: usize,
        status: String,
    },
}

/// Sending half of the event stream
///
/// A disabled sink drops every event. Sending never fails the crawl: if the
/// receiver is gone, events are discarded.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    sender: Option<UnboundedSender<CrawlEvent>>,
}

impl EventSink {
    /// Creates a connected sink and its receiver
    pub fn channel() -> (Self, UnboundedReceiver<CrawlEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                sender: Some(sender),
            },
            receiver,
        )
    }

    /// A sink that drops everything
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    pub fn emit(&self, event: CrawlEvent) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(event);
        }
    }
}
