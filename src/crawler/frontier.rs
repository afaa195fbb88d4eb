//! Pending queue and visited set
//!
//! The frontier owns all crawl bookkeeping:
//! - a FIFO queue of entries awaiting processing (breadth-first order)
//! - the visited set, in visit order
//! - URLs whose load failed for good, which are never re-enqueued
//!
//! A URL that is pending, visited, or failed is never offered again, so a
//! cyclic link graph cannot make the crawl loop forever.

use std::collections::{HashSet, VecDeque};
use url::Url;

/// A URL waiting to be processed, with its discovery depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: Url,

    /// Number of link hops from the root (root is 0)
    pub depth: u32,
}

/// Crawl bookkeeping owned by the scheduler
#[derive(Debug, Default)]
pub struct Frontier {
    pending: VecDeque<FrontierEntry>,
    pending_keys: HashSet<String>,
    visited: Vec<Url>,
    visited_keys: HashSet<String>,
    failed: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier seeded with the root at depth 0
    pub fn seeded(root: Url) -> Self {
        let mut frontier = Self::default();
        frontier.offer(root, 0);
        frontier
    }

    /// Enqueues `url` unless it is already known
    ///
    /// # Returns
    ///
    /// `true` if the URL was new and is now pending
    pub fn offer(&mut self, url: Url, depth: u32) -> bool {
        if self.is_known(&url) {
            return false;
        }

        self.pending_keys.insert(url.as_str().to_string());
        self.pending.push_back(FrontierEntry { url, depth });
        true
    }

    /// Removes and returns the oldest pending entry
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        let entry = self.pending.pop_front()?;
        self.pending_keys.remove(entry.url.as_str());
        Some(entry)
    }

    /// Adds `url` to the visited set
    ///
    /// # Returns
    ///
    /// `true` if the URL was not visited before
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        if !self.visited_keys.insert(url.as_str().to_string()) {
            return false;
        }
        self.visited.push(url.clone());
        true
    }

    /// Records a URL whose processing failed for good
    pub fn mark_failed(&mut self, url: &Url) {
        self.failed.insert(url.as_str().to_string());
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited_keys.contains(url.as_str())
    }

    /// Pending, visited, or failed
    pub fn is_known(&self, url: &Url) -> bool {
        let key = url.as_str();
        self.pending_keys.contains(key)
            || self.visited_keys.contains(key)
            || self.failed.contains(key)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    pub fn failed_len(&self) -> usize {
        self.failed.len()
    }

    /// Visited URLs in the order they were visited
    pub fn visited(&self) -> &[Url] {
        &self.visited
    }

    /// Stops all further work by dropping pending entries
    pub fn clear_pending(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        self.pending_keys.clear();
        dropped
    }
}
