//! Run statistics
//!
//! Counters accumulated by the crawl controller and printed at the end of a
//! run.

use crate::model::ArticleRecord;
use crate::state::StopReason;

/// Summary of one crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Index pages fetched successfully
    pub pages_visited: u32,

    /// Index pages skipped after a fetch failure
    pub pages_failed: u32,

    /// Articles that produced a record
    pub articles_recorded: usize,

    /// Articles skipped after a fetch or layout failure
    pub articles_skipped: usize,

    pub identifiers: usize,

    /// Identifiers that came back with a severity score
    pub identifiers_enriched: usize,

    pub comments: usize,

    pub stop_reason: Option<StopReason>,
}

impl RunSummary {
    /// Creates an empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a finished article
    pub fn record(&mut self, record: &ArticleRecord) {
        self.articles_recorded += 1;
        self.identifiers += record.identifiers.len();
        self.identifiers_enriched += record.enriched_count();
        self.comments += record.comments.len();
    }

    /// Share of identifiers that were enriched, as a percentage
    pub fn enrichment_rate(&self) -> f64 {
        if self.identifiers == 0 {
            return 0.0;
        }
        (self.identifiers_enriched as f64 / self.identifiers as f64) * 100.0
    }
}

/// Prints the summary to stdout
pub fn print_summary(summary: &RunSummary) {
    println!("=== Harvest Summary ===\n");

    println!("Index:");
    println!("  Pages visited: {}", summary.pages_visited);
    if summary.pages_failed > 0 {
        println!("  Pages skipped: {}", summary.pages_failed);
    }
    match &summary.stop_reason {
        Some(reason) => println!("  Stopped by: {}", reason),
        None => println!("  Stopped by: -"),
    }
    println!();

    println!("Articles:");
    println!("  Recorded: {}", summary.articles_recorded);
    println!("  Skipped: {}", summary.articles_skipped);
    println!();

    println!("Identifiers:");
    println!("  Total: {}", summary.identifiers);
    println!(
        "  Enriched: {} ({:.1}%)",
        summary.identifiers_enriched,
        summary.enrichment_rate()
    );
    println!();

    println!("Comments: {}", summary.comments);
}
