//! Lifecycle states of the frontier scheduler
//!
//! A crawl moves strictly forward:
//!
//! ```text
//! Idle -> Running -> Draining -> Done
//!            \__________________/^
//! ```
//!
//! `Running` may skip `Draining` when the pending queue empties on its own.

use std::fmt;
use thiserror::Error;

/// Current phase of a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CrawlPhase {
    /// Created, nothing processed yet
    #[default]
    Idle,

    /// Steady-state loop: popping entries and enqueueing discoveries
    Running,

    /// A ceiling was reached; the current entry finishes, nothing new is enqueued
    Draining,

    /// The loop has ended
    Done,
}

/// Rejected phase transition
#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot move crawl from {from} to {to}")]
pub struct PhaseError {
    pub from: CrawlPhase,
    pub to: CrawlPhase,
}

impl CrawlPhase {
    /// Returns true if `next` is a legal successor of this phase
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Draining)
                | (Self::Running, Self::Done)
                | (Self::Draining, Self::Done)
        )
    }

    /// Moves to `next`, rejecting backwards or skipping moves
    pub fn advance(&mut self, next: CrawlPhase) -> Result<(), PhaseError> {
        if !self.can_transition_to(next) {
            return Err(PhaseError { from: *self, to: next });
        }
        *self = next;
        Ok(())
    }

    /// Returns true if newly discovered links may still be enqueued
    pub fn accepts_new_work(&self) -> bool {
        matches!(self, Self::Running)
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
