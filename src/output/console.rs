//! Terminal presentation of crawl progress and results
//!
//! The crawl core never prints. [`ConsoleRenderer`] drains the event stream
//! and [`format_report`] renders the final report.

use crate::crawler::{CrawlEvent, CrawlReport, CrawlStatus};
use std::fmt::Write;
use std::path::Path;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

/// Renders crawl events as one line each
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleRenderer {
    /// Also print every newly queued link
    pub show_links: bool,
}

impl ConsoleRenderer {
    pub fn new(show_links: bool) -> Self {
        Self { show_links }
    }

    /// Formats one event, or `None` for events this renderer hides
    pub fn render(&self, event: &CrawlEvent) -> Option<String> {
        match event {
            CrawlEvent::CrawlStarted { root } => Some(format!("Crawling {}", root)),
            CrawlEvent::PageVisited { url, depth } => Some(format!("  [{}] {}", depth, url)),
            CrawlEvent::PageSkipped { url, content_type } => {
                Some(format!("  [skip] {} ({})", url, content_type))
            }
            CrawlEvent::LinkFound { url, source, depth } if self.show_links => {
                Some(format!("    + {} via {} (depth {})", url, source, depth))
            }
            CrawlEvent::LinkFound { .. } => None,
            CrawlEvent::OperationFailed { url, error } => {
                Some(format!("  [fail] {}: {}", url, error))
            }
            CrawlEvent::CrawlFinished { .. } => None,
        }
    }

    /// Prints events until every sender is dropped
    pub fn spawn(self, mut events: UnboundedReceiver<CrawlEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if let Some(line) = self.render(&event) {
                    println!("{}", line);
                }
            }
        })
    }
}

/// Formats the visited list and a one-line summary
///
/// # Arguments
///
/// * `report` - The finished (or interrupted) crawl
/// * `sitemap_path` - Where the sitemap was written, if it was
pub fn format_report(report: &CrawlReport, sitemap_path: Option<&Path>) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Visited pages ({}):", report.visited.len());
    for url in &report.visited {
        let _ = writeln!(out, "  {}", url);
    }
    let _ = writeln!(out);

    let _ = write!(
        out,
        "{}: {} visited, {} skipped, {} failed",
        report.status.label(),
        report.visited.len(),
        report.skipped,
        report.failed
    );
    if report.pending > 0 {
        let _ = write!(out, ", {} never processed", report.pending);
    }
    let _ = writeln!(out);

    if let CrawlStatus::Aborted(e) = &report.status {
        let _ = writeln!(out, "Aborted: {}", e);
    }

    if let Some(path) = sitemap_path {
        let _ = writeln!(out, "Sitemap written to {}", path.display());
    }

    out
}

/// Prints [`format_report`] to stdout
pub fn print_report(report: &CrawlReport, sitemap_path: Option<&Path>) {
    print!("{}", format_report(report, sitemap_path));
}
