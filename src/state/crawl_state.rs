//! Per-run crawl state
//!
//! Tracks the articles already handed to the processor, the index page cursor,
//! the newest-first ordering check and the reason pagination ended. A fresh
//! state is created for every run and never persisted.

use crate::state::StopReason;
use chrono::{DateTime, FixedOffset};
use std::collections::HashSet;

/// State owned by the crawl controller for one run
#[derive(Debug, Clone)]
pub struct CrawlState {
    /// Article URLs already processed (or attempted)
    seen: HashSet<String>,

    /// Index page currently being visited (1-based)
    page: u32,

    /// Most recently accepted article and its timestamp
    last_accepted: Option<(String, DateTime<FixedOffset>)>,

    stop_reason: Option<StopReason>,
}

impl Default for CrawlState {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlState {
    /// Creates the state for a new run, positioned at page 1
    pub fn new() -> Self {
        Self {
            seen: HashSet::new(),
            page: 1,
            last_accepted: None,
            stop_reason: None,
        }
    }

    /// Marks an article URL as seen
    ///
    /// Returns false if it had already been seen in this run.
    pub fn mark_seen(&mut self, url: &str) -> bool {
        self.seen.insert(url.to_string())
    }

    /// Number of distinct articles seen so far
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// Current index page
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Moves the cursor to the next index page
    pub fn advance_page(&mut self) {
        self.page += 1;
    }

    /// Records an accepted article's timestamp
    ///
    /// The index is expected newest-first. If this article is newer than the
    /// previously accepted one, the URL of that previous article is returned so
    /// the caller can report the violation.
    pub fn record_accepted(&mut self, url: &str, published: DateTime<FixedOffset>) -> Option<String> {
        let violation = match &self.last_accepted {
            Some((previous_url, previous)) if published > *previous => Some(previous_url.clone()),
            _ => None,
        };
        self.last_accepted = Some((url.to_string(), published));
        violation
    }

    /// Ends pagination; the first reason wins
    pub fn stop(&mut self, reason: StopReason) {
        if self.stop_reason.is_none() {
            self.stop_reason = Some(reason);
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stop_reason.is_some()
    }

    pub fn stop_reason(&self) -> Option<&StopReason> {
        self.stop_reason.as_ref()
    }
}
