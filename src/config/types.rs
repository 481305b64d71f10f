use serde::Deserialize;

/// Main configuration structure for Advisory-Harvest
///
/// Every section falls back to its defaults, so an empty file (or no file at
/// all) yields a working configuration for heise Security Alerts.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub site: SiteConfig,
    #[serde(rename = "vuln-db")]
    pub vuln_db: VulnDbConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// What to do when an index page cannot be fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexFailurePolicy {
    /// End the run with an error; nothing is written
    #[default]
    Abort,
    /// Log a warning and continue with the next page
    Skip,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Articles older than this many days end the crawl
    #[serde(rename = "recency-days")]
    pub recency_days: u32,

    /// Upper bound on index pages visited in one run
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Concurrent enrichment lookups / comment fetches within one article
    #[serde(rename = "max-concurrent-lookups")]
    pub max_concurrent_lookups: usize,

    #[serde(rename = "index-failure")]
    pub index_failure: IndexFailurePolicy,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            recency_days: 91,
            max_pages: 50,
            request_timeout_secs: 30,
            max_concurrent_lookups: 4,
            index_failure: IndexFailurePolicy::Abort,
        }
    }
}

/// Layout of the advisory site
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Scheme and host of the advisory site
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Index path; pages live at `{index-path}/seite-{n}`
    #[serde(rename = "index-path")]
    pub index_path: String,

    /// Prefix joined in front of an article link's path
    #[serde(rename = "article-prefix")]
    pub article_prefix: String,

    /// Substring identifying article links on an index page
    #[serde(rename = "article-marker")]
    pub article_marker: String,

    /// Substring identifying the discussion link on an article page
    #[serde(rename = "comment-marker")]
    pub comment_marker: String,

    /// Prefix of the discussion thread landing page
    #[serde(rename = "forum-path")]
    pub forum_path: String,

    /// Footer text ending every comment body
    #[serde(rename = "comment-footer")]
    pub comment_footer: String,

    /// Navigation links matching the article marker that are not articles
    #[serde(rename = "excluded-links")]
    pub excluded_links: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.heise.de".to_string(),
            index_path: "/security/alerts".to_string(),
            article_prefix: "/security/alerts".to_string(),
            article_marker: "/news/".to_string(),
            comment_marker: "/comment/".to_string(),
            forum_path: "/forum/heise-online/Kommentare".to_string(),
            comment_footer: "Melden".to_string(),
            excluded_links: vec![
                "/security/news/archiv/".to_string(),
                "/security/news/7_tage_news/".to_string(),
                "/security/news/".to_string(),
            ],
        }
    }
}

/// Vulnerability database used for enrichment
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VulnDbConfig {
    /// Lookups go to `{base-url}/vuln/detail/{id}`
    #[serde(rename = "base-url")]
    pub base_url: String,
}

impl Default for VulnDbConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nvd.nist.gov".to_string(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "advisory-harvest".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/advisory-harvest/advisory-harvest".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the JSON results file (overwritten on every run)
    #[serde(rename = "results-path")]
    pub results_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_path: "heise_analysis.json".to_string(),
        }
    }
}
