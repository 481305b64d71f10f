//! URL construction for the advisory site and the vulnerability database

use crate::config::{SiteConfig, VulnDbConfig};
use crate::url::slug::path_of;
use url::Url;

/// Builds every URL the crawler requests
#[derive(Debug, Clone)]
pub struct SiteLinks {
    base_url: String,
    index_path: String,
    article_prefix: String,
    article_marker: String,
    forum_path: String,
    excluded_links: Vec<String>,
    vuln_db_base: String,
}

impl SiteLinks {
    pub fn new(site: &SiteConfig, vuln_db: &VulnDbConfig) -> Self {
        Self {
            base_url: site.base_url.trim_end_matches('/').to_string(),
            index_path: site.index_path.trim_end_matches('/').to_string(),
            article_prefix: site.article_prefix.trim_end_matches('/').to_string(),
            article_marker: site.article_marker.clone(),
            forum_path: site.forum_path.trim_end_matches('/').to_string(),
            excluded_links: site.excluded_links.clone(),
            vuln_db_base: vuln_db.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn article_marker(&self) -> &str {
        &self.article_marker
    }

    /// URL of the n-th index page (1-based)
    pub fn index_page(&self, page: u32) -> String {
        format!("{}{}/seite-{}", self.base_url, self.index_path, page)
    }

    /// Returns true if an index link points at an article
    ///
    /// Links must contain the article marker and must not be one of the known
    /// navigation paths (archive, weekly digest, section landing page).
    pub fn is_article_link(&self, href: &str) -> bool {
        href.contains(&self.article_marker) && !self.excluded_links.iter().any(|l| l == href)
    }

    /// Absolute URL of an article linked from the index
    pub fn article_url(&self, href: &str) -> String {
        format!("{}{}{}", self.base_url, self.article_prefix, path_of(href))
    }

    /// Landing page of an article's discussion thread
    pub fn thread_url(&self, entry_href: &str) -> String {
        format!("{}{}{}", self.base_url, self.forum_path, path_of(entry_href))
    }

    /// Path fragment shared by all comment permalinks of an article,
    /// e.g. `/Kommentare/Patchday-Adobe`
    pub fn comment_fragment(&self, thread_slug: &str) -> String {
        let forum_dir = self.forum_path.rsplit('/').next().unwrap_or_default();
        format!("/{}/{}", forum_dir, thread_slug)
    }

    /// Resolves a forum link against the site root
    pub fn resolve(&self, href: &str) -> Option<String> {
        let base = Url::parse(&self.base_url).ok()?;
        let resolved = base.join(href.trim()).ok()?;
        match resolved.scheme() {
            "http" | "https" => Some(resolved.to_string()),
            _ => None,
        }
    }

    /// Vulnerability database entry for an identifier
    pub fn lookup_url(&self, identifier: &str) -> String {
        format!("{}/vuln/detail/{}", self.vuln_db_base, identifier)
    }
}
