use crate::config::types::{
    Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig, VulnDbConfig,
};
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crawler_config(&config.crawler)?;
    validate_site_config(&config.site)?;
    validate_vuln_db_config(&config.vuln_db)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    if config.recency_days < 1 {
        return Err(ConfigError::Validation(format!(
            "recency_days must be >= 1, got {}",
            config.recency_days
        )));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.request_timeout_secs < 1 || config.request_timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be between 1 and 300, got {}",
            config.request_timeout_secs
        )));
    }

    if config.max_concurrent_lookups < 1 || config.max_concurrent_lookups > 32 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_lookups must be between 1 and 32, got {}",
            config.max_concurrent_lookups
        )));
    }

    Ok(())
}

/// Validates the advisory site layout
fn validate_site_config(config: &SiteConfig) -> ConfigResult<()> {
    validate_base_url("site.base_url", &config.base_url)?;

    for (name, value) in [
        ("index_path", &config.index_path),
        ("article_prefix", &config.article_prefix),
        ("forum_path", &config.forum_path),
    ] {
        validate_path(name, value)?;
    }

    for (name, value) in [
        ("article_marker", &config.article_marker),
        ("comment_marker", &config.comment_marker),
        ("comment_footer", &config.comment_footer),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    for link in &config.excluded_links {
        validate_path("excluded_links entry", link)?;
    }

    Ok(())
}

fn validate_vuln_db_config(config: &VulnDbConfig) -> ConfigResult<()> {
    validate_base_url("vuln_db.base_url", &config.base_url)
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> ConfigResult<()> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    if config.results_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "results_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// A base URL must be absolute http(s) without a trailing path
fn validate_base_url(name: &str, value: &str) -> ConfigResult<()> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", name, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            name, value
        )));
    }

    if url.path() != "/" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must not contain a path",
            name, value
        )));
    }

    Ok(())
}

fn validate_path(name: &str, value: &str) -> ConfigResult<()> {
    if !value.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "{} must start with '/', got '{}'",
            name, value
        )));
    }
    Ok(())
}
