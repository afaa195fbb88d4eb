//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: lifecycle of the frontier scheduler (idle, running, draining, done)

mod phase;

pub use phase::{CrawlPhase, PhaseError};
