//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that:
//! - Walks the index page by page, starting at page 1
//! - Filters navigation links and already-seen articles
//! - Hands each candidate to the article processor
//! - Applies the recency stopping rule
//!
//! # Ordering precondition
//!
//! The index must list articles newest-first, within and across pages. The
//! first out-of-window article ends the crawl, so an index that violates this
//! ordering is silently under-collected. The coordinator logs a warning
//! whenever it accepts an article newer than the previous one.

use crate::config::{Config, IndexFailurePolicy};
use crate::crawler::article::ArticleProcessor;
use crate::crawler::fetcher::{HttpFetcher, PageFetcher};
use crate::crawler::parser::extract_links;
use crate::model::ArticleRecord;
use crate::output::RunSummary;
use crate::state::{ArticleOutcome, CrawlState, StopReason};
use crate::url::SiteLinks;
use crate::HarvestError;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Records and statistics of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Articles in index order
    pub records: Vec<ArticleRecord>,
    pub summary: RunSummary,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    links: SiteLinks,
    fetcher: Arc<dyn PageFetcher>,
    now: DateTime<Utc>,
    interrupted: Arc<AtomicBool>,
}

impl Coordinator {
    /// Creates a coordinator that fetches over HTTP
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let fetcher = HttpFetcher::from_config(
            &config.user_agent,
            config.crawler.request_timeout_secs,
        )?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    /// Creates a coordinator around an existing fetcher
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn PageFetcher>) -> Self {
        let links = SiteLinks::new(&config.site, &config.vuln_db);
        Self {
            config,
            links,
            fetcher,
            now: Utc::now(),
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Fixes the reference time of the recency window
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Flag that stops the crawl at the next article or page boundary
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupted)
    }

    fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::Relaxed)
    }

    /// Article links on an index page, navigation links removed
    fn candidates(&self, body: &str) -> Vec<String> {
        let mut candidates: Vec<String> = Vec::new();
        for href in extract_links(body) {
            if self.links.is_article_link(&href) && !candidates.contains(&href) {
                candidates.push(href);
            }
        }
        candidates
    }

    /// Runs the crawl loop
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlOutcome)` - Records accumulated before pagination stopped
    /// * `Err(HarvestError::IndexUnavailable)` - An index page failed under the
    ///   `abort` policy
    pub async fn run(&self) -> Result<CrawlOutcome, HarvestError> {
        let crawler = &self.config.crawler;
        tracing::info!(
            "Collecting articles of the last {} days from {}",
            crawler.recency_days,
            self.links.base_url()
        );

        let processor =
            ArticleProcessor::new(self.fetcher.as_ref(), &self.links, &self.config, self.now);
        let mut state = CrawlState::new();
        let mut records = Vec::new();
        let mut summary = RunSummary::new();

        while !state.is_stopped() {
            if self.is_interrupted() {
                state.stop(StopReason::Interrupted);
                break;
            }

            let page = state.page();
            if page > crawler.max_pages {
                state.stop(StopReason::PageLimit {
                    pages: crawler.max_pages,
                });
                break;
            }

            let index_url = self.links.index_page(page);
            let candidates = match self.fetcher.fetch(&index_url).await {
                Ok(fetched) => {
                    tracing::debug!(
                        "Index page {} served from {} (HTTP {})",
                        page,
                        fetched.final_url,
                        fetched.status_code
                    );
                    self.candidates(&fetched.body)
                }
                Err(e) => match crawler.index_failure {
                    IndexFailurePolicy::Abort => {
                        tracing::error!("Index page {} unavailable: {}", page, e);
                        return Err(HarvestError::IndexUnavailable { page, source: e });
                    }
                    IndexFailurePolicy::Skip => {
                        tracing::warn!("Skipping index page {}: {}", page, e);
                        summary.pages_failed += 1;
                        state.advance_page();
                        continue;
                    }
                },
            };

            summary.pages_visited += 1;
            tracing::info!("{} articles found on page {}", candidates.len(), page);

            if candidates.is_empty() {
                state.stop(StopReason::EndOfIndex { page });
                break;
            }

            for href in &candidates {
                if self.is_interrupted() {
                    state.stop(StopReason::Interrupted);
                    break;
                }

                let url = self.links.article_url(href);
                if !state.mark_seen(&url) {
                    tracing::debug!("Article {} already processed", url);
                    continue;
                }

                match processor.process(href).await {
                    Ok(ArticleOutcome::Recorded(record)) => {
                        if let Some(previous) =
                            state.record_accepted(&record.url, record.published_at)
                        {
                            tracing::warn!(
                                "Index not newest-first: {} is newer than {}",
                                record.url,
                                previous
                            );
                        }
                        tracing::info!(
                            "Recorded '{}' by {} ({} CVEs, {} comments, updated: {})",
                            record.title,
                            record.author,
                            record.identifiers.len(),
                            record.comments.len(),
                            record.has_update_marker
                        );
                        summary.record(&record);
                        records.push(*record);
                    }
                    Ok(ArticleOutcome::OutOfWindow { url, published }) => {
                        match published {
                            Some(ts) => tracing::info!("{} published {} is not recent", url, ts),
                            None => tracing::info!("{} has no usable timestamp", url),
                        }
                        state.stop(StopReason::OutOfWindow { url });
                        break;
                    }
                    Err(e) => {
                        tracing::warn!("Skipping article {}: {}", url, e);
                        summary.articles_skipped += 1;
                    }
                }
            }

            state.advance_page();
        }

        summary.stop_reason = state.stop_reason().cloned();
        tracing::info!(
            "Crawl finished after {} pages: {} of {} distinct articles recorded ({})",
            summary.pages_visited,
            summary.articles_recorded,
            state.seen_count(),
            summary
                .stop_reason
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default()
        );

        Ok(CrawlOutcome { records, summary })
    }
}

/// Runs a crawl over HTTP with the given configuration
///
/// # Example
///
/// ```no_run
/// use advisory_harvest::config::Config;
/// use advisory_harvest::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let outcome = run_crawl(Config::default()).await?;
/// println!("{} articles", outcome.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlOutcome, HarvestError> {
    Coordinator::new(config)?.run().await
}
