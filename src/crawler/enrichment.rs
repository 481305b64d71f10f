//! Vulnerability database enrichment
//!
//! Each identifier is looked up at `{vuln-db}/vuln/detail/{id}`. The detail
//! page exposes a CVSS score anchor and a "published on" date. A lookup that
//! fails for any reason yields an identifier with both fields absent; it never
//! fails the article.

use crate::crawler::fetcher::PageFetcher;
use crate::model::IdentifierRecord;
use crate::url::SiteLinks;
use chrono::{NaiveDate, NaiveDateTime};
use futures::stream::{self, StreamExt};
use scraper::{Html, Selector};
use std::sync::LazyLock;

/// Score anchors in order of preference (CNA score, then NVD's own)
static SEVERITY_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    ["a#Cvss3CnaCalculatorAnchor", "a#Cvss3NistCalculatorAnchor"]
        .iter()
        .map(|s| Selector::parse(s).expect("severity selector is valid"))
        .collect()
});

static PUBLISHED_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("span[data-testid='vuln-published-on']").expect("date selector is valid")
});

const PUBLISHED_FORMAT: &str = "%m/%d/%Y";

/// Data extracted from a vulnerability detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VulnDetail {
    pub severity_score: String,
    pub published_at: NaiveDateTime,
}

/// Extracts the severity score and publication date from a detail page
///
/// Returns None if either element is missing or the date does not parse.
pub fn parse_vuln_detail(html: &str) -> Option<VulnDetail> {
    let document = Html::parse_document(html);

    let severity_score = SEVERITY_SELECTORS.iter().find_map(|selector| {
        document
            .select(selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
    })?;

    let published_text = document
        .select(&PUBLISHED_SELECTOR)
        .next()
        .map(|el| el.text().collect::<String>())?;

    let published_at = NaiveDate::parse_from_str(published_text.trim(), PUBLISHED_FORMAT)
        .ok()?
        .and_hms_opt(0, 0, 0)?;

    Some(VulnDetail {
        severity_score,
        published_at,
    })
}

/// Looks up identifiers in the vulnerability database
pub struct EnrichmentClient<'a> {
    fetcher: &'a dyn PageFetcher,
    links: &'a SiteLinks,
    concurrency: usize,
}

impl<'a> EnrichmentClient<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher, links: &'a SiteLinks, concurrency: usize) -> Self {
        Self {
            fetcher,
            links,
            concurrency: concurrency.max(1),
        }
    }

    /// Enriches a single identifier
    pub async fn lookup(&self, identifier: &str) -> IdentifierRecord {
        let url = self.links.lookup_url(identifier);

        let page = match self.fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Lookup for {} failed: {}", identifier, e);
                return IdentifierRecord::unenriched(identifier);
            }
        };

        match parse_vuln_detail(&page.body) {
            Some(detail) => IdentifierRecord {
                id: identifier.to_string(),
                severity_score: Some(detail.severity_score),
                published_at: Some(detail.published_at),
            },
            None => {
                tracing::debug!("No database record for {}", identifier);
                IdentifierRecord::unenriched(identifier)
            }
        }
    }

    /// Enriches identifiers concurrently, preserving their order
    pub async fn enrich_all(&self, identifiers: &[String]) -> Vec<IdentifierRecord> {
        stream::iter(identifiers)
            .map(|id| self.lookup(id))
            .buffered(self.concurrency)
            .collect()
            .await
    }
}
