//! Records produced by a crawl run
//!
//! The serialized field names are the public output format: `url`, `author`,
//! `title`, `time`, `cves[{cve, cvss, published}]`, `comments`, `updated`.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::Serialize;

/// One harvested advisory article
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleRecord {
    /// Absolute article URL; unique within a run
    pub url: String,

    pub author: String,

    /// Title derived from the URL slug
    pub title: String,

    /// Publication time, RFC 3339 with the page's offset (`+00:00` when the
    /// page gave none)
    #[serde(rename = "time")]
    pub published_at: DateTime<FixedOffset>,

    /// CVE identifiers in first-seen order
    #[serde(rename = "cves")]
    pub identifiers: Vec<IdentifierRecord>,

    /// Cleaned comment bodies in thread order
    pub comments: Vec<String>,

    #[serde(rename = "updated")]
    pub has_update_marker: bool,
}

impl ArticleRecord {
    /// Number of identifiers that came back with a severity score
    pub fn enriched_count(&self) -> usize {
        self.identifiers
            .iter()
            .filter(|id| id.severity_score.is_some())
            .count()
    }
}

/// A CVE identifier mentioned by an article, with its enrichment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentifierRecord {
    /// Upper-case identifier, e.g. `CVE-2024-12345`
    #[serde(rename = "cve")]
    pub id: String,

    /// CVSS base score text, absent when the lookup found nothing
    #[serde(rename = "cvss")]
    pub severity_score: Option<String>,

    #[serde(rename = "published")]
    pub published_at: Option<NaiveDateTime>,
}

impl IdentifierRecord {
    /// An identifier whose lookup produced no data
    pub fn unenriched(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            severity_score: None,
            published_at: None,
        }
    }
}
