//! Article processing
//!
//! Turns one candidate link into either a complete `ArticleRecord` or the
//! out-of-window signal that ends the crawl.

use crate::config::Config;
use crate::crawler::comments::CommentCollector;
use crate::crawler::enrichment::EnrichmentClient;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::identifiers::extract_identifiers;
use crate::crawler::parser::parse_article;
use crate::model::ArticleRecord;
use crate::state::ArticleOutcome;
use crate::url::{title_from_slug, SiteLinks};
use crate::HarvestError;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, Utc};

/// Parses an article timestamp
///
/// Accepts RFC 3339 and offset-less ISO-8601 date-times (seconds optional) or
/// dates; values without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts);
    }

    [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Returns true if `published` lies no more than `days` before `now`
///
/// Timestamps in the future count as recent.
pub fn is_within_window(published: DateTime<FixedOffset>, now: DateTime<Utc>, days: u32) -> bool {
    now.signed_duration_since(published) <= Duration::days(i64::from(days))
}

/// Extracts one article and everything attached to it
pub struct ArticleProcessor<'a> {
    fetcher: &'a dyn PageFetcher,
    links: &'a SiteLinks,
    config: &'a Config,
    now: DateTime<Utc>,
}

impl<'a> ArticleProcessor<'a> {
    pub fn new(
        fetcher: &'a dyn PageFetcher,
        links: &'a SiteLinks,
        config: &'a Config,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            fetcher,
            links,
            config,
            now,
        }
    }

    /// Processes the article behind an index link
    ///
    /// # Returns
    ///
    /// * `Ok(ArticleOutcome::Recorded)` - The article is recent and fully extracted
    /// * `Ok(ArticleOutcome::OutOfWindow)` - The article is too old or undated
    /// * `Err(HarvestError)` - The article could not be fetched or lacks an author
    pub async fn process(&self, href: &str) -> crate::Result<ArticleOutcome> {
        let url = self.links.article_url(href);
        let title = title_from_slug(href, self.links.article_marker());

        let page = self.fetcher.fetch(&url).await?;
        let parsed = parse_article(&page.body, &self.config.site.comment_marker);

        let published = parsed.published_raw.as_deref().and_then(parse_timestamp);
        let published = match published {
            Some(ts) if is_within_window(ts, self.now, self.config.crawler.recency_days) => ts,
            other => {
                return Ok(ArticleOutcome::OutOfWindow {
                    url,
                    published: other,
                })
            }
        };

        let author = parsed
            .author
            .clone()
            .ok_or_else(|| HarvestError::shape(&url, "author element missing"))?;

        let identifiers = extract_identifiers(&parsed.text);
        tracing::debug!("{} identifiers in {}", identifiers.len(), url);

        let concurrency = self.config.crawler.max_concurrent_lookups;
        let enrichment = EnrichmentClient::new(self.fetcher, self.links, concurrency);
        let collector = CommentCollector::new(
            self.fetcher,
            self.links,
            &self.config.site.comment_footer,
            concurrency,
        );

        let comments = async {
            match parsed.comment_entry.as_deref() {
                Some(entry) => collector.collect(entry, &title).await,
                None => Vec::new(),
            }
        };

        let (identifiers, comments) =
            futures::join!(enrichment.enrich_all(&identifiers), comments);

        Ok(ArticleOutcome::Recorded(Box::new(ArticleRecord {
            url,
            author,
            title,
            published_at: published,
            identifiers,
            comments,
            has_update_marker: parsed.has_update_marker,
        })))
    }
}
