/// State management for crawl runs
///
/// This module tracks per-run crawl state and the outcomes reported while
/// processing articles.
mod crawl_state;
mod outcome;

pub use crawl_state::CrawlState;
pub use outcome::{ArticleOutcome, StopReason};
