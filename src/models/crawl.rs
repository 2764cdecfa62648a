// src/models/crawl.rs

//! Crawl outcome types.

use std::fmt;

use chrono::{DateTime, Utc};

/// One review card's full rendered text, newline-delimited.
pub type RawBlock = String;

/// Why a crawl stopped producing pages.
///
/// Draining is a normal terminal state, not an error; the reason is kept
/// for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainReason {
    /// The review container never appeared within the wait bound
    WaitTimeout,
    /// A page rendered without any review cards
    EmptyPage,
    /// No next-page control was found, or clicking it failed
    NoMorePages,
    /// The configured page cap was hit with pages still remaining
    PageCapReached,
}

impl fmt::Display for DrainReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            DrainReason::WaitTimeout => "wait-timeout",
            DrainReason::EmptyPage => "empty-page",
            DrainReason::NoMorePages => "no-more-pages",
            DrainReason::PageCapReached => "page-cap-reached",
        };
        f.write_str(reason)
    }
}

/// Result of one crawl run.
#[derive(Debug)]
pub struct CrawlOutcome {
    /// Accumulated card texts, in page order
    pub blocks: Vec<RawBlock>,
    /// Pages that produced at least one card
    pub pages_visited: usize,
    pub drained: DrainReason,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}
