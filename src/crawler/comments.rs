//! Discussion thread collection
//!
//! From the article's discussion link the collector loads the thread landing
//! page, discovers the permalink of every posting and fetches each posting's
//! cleaned text. A posting that cannot be fetched or does not have the
//! expected layout is dropped on its own; the article keeps the rest.

use crate::crawler::fetcher::PageFetcher;
use crate::crawler::parser::{clean_text, extract_comment_body, find_permalinks, strip_footer};
use crate::url::{thread_slug, SiteLinks};
use crate::HarvestError;
use futures::stream::{self, StreamExt};
use regex::Regex;
use std::sync::LazyLock;

static POSTING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)posting-(\d+)").expect("posting pattern is valid"));

/// Extracts the numeric posting id from a permalink
pub fn posting_id(permalink: &str) -> Option<&str> {
    POSTING_PATTERN
        .captures(permalink)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Fetches the comments of one article
pub struct CommentCollector<'a> {
    fetcher: &'a dyn PageFetcher,
    links: &'a SiteLinks,
    footer_marker: &'a str,
    concurrency: usize,
}

impl<'a> CommentCollector<'a> {
    pub fn new(
        fetcher: &'a dyn PageFetcher,
        links: &'a SiteLinks,
        footer_marker: &'a str,
        concurrency: usize,
    ) -> Self {
        Self {
            fetcher,
            links,
            footer_marker,
            concurrency: concurrency.max(1),
        }
    }

    /// Collects the cleaned comments of an article's discussion thread
    ///
    /// # Arguments
    ///
    /// * `entry_href` - The discussion link found on the article page
    /// * `title` - The article title derived from its slug
    ///
    /// # Returns
    ///
    /// Comments in thread order; empty if the thread could not be loaded or
    /// has no postings.
    pub async fn collect(&self, entry_href: &str, title: &str) -> Vec<String> {
        let thread_url = self.links.thread_url(entry_href);

        let landing = match self.fetcher.fetch(&thread_url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Discussion thread unavailable: {}", e);
                return Vec::new();
            }
        };

        let fragment = self.links.comment_fragment(&thread_slug(title));
        let permalinks: Vec<String> = find_permalinks(&landing.body, &fragment)
            .iter()
            .filter_map(|href| self.links.resolve(href))
            .collect();

        tracing::debug!(
            "Found {} comment permalinks at {}",
            permalinks.len(),
            thread_url
        );

        let results: Vec<crate::Result<String>> = stream::iter(&permalinks)
            .map(|permalink| self.fetch_comment(permalink))
            .buffered(self.concurrency)
            .collect()
            .await;

        results
            .into_iter()
            .filter_map(|result| match result {
                Ok(comment) => Some(comment),
                Err(e) => {
                    tracing::warn!("Skipping comment: {}", e);
                    None
                }
            })
            .collect()
    }

    /// Fetches and cleans a single posting
    pub async fn fetch_comment(&self, permalink: &str) -> crate::Result<String> {
        let id = posting_id(permalink)
            .ok_or_else(|| HarvestError::shape(permalink, "no posting id in permalink"))?;

        let page = self.fetcher.fetch(permalink).await?;

        let body = extract_comment_body(&page.body, id).ok_or_else(|| {
            HarvestError::shape(permalink, format!("posting_{} element missing", id))
        })?;

        strip_footer(&clean_text(&body), self.footer_marker).ok_or_else(|| {
            HarvestError::shape(
                permalink,
                format!("footer marker '{}' missing", self.footer_marker),
            )
        })
    }
}
