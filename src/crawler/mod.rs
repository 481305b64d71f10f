//! Crawler module for advisory harvesting
//!
//! This module contains the crawl-and-enrich pipeline:
//! - HTTP fetching behind the `PageFetcher` trait
//! - HTML extraction for index, article and forum pages
//! - CVE identifier extraction and database enrichment
//! - Discussion thread collection
//! - Overall crawl coordination and the stopping rule

mod article;
mod comments;
mod coordinator;
mod enrichment;
mod fetcher;
mod identifiers;
mod parser;

pub use article::{is_within_window, parse_timestamp, ArticleProcessor};
pub use comments::{posting_id, CommentCollector};
pub use coordinator::{run_crawl, Coordinator, CrawlOutcome};
pub use enrichment::{parse_vuln_detail, EnrichmentClient, VulnDetail};
pub use fetcher::{build_http_client, FetchedPage, HttpFetcher, PageFetcher};
pub use identifiers::extract_identifiers;
pub use parser::{
    clean_text, extract_comment_body, extract_links, find_permalinks, parse_article,
    strip_footer, ParsedArticle,
};
