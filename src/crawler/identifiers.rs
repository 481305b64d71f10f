//! CVE identifier extraction

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static CVE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bcve-\d{4}-\d{4,7}\b").expect("CVE pattern is valid")
});

/// Extracts CVE identifiers from article text
///
/// Matching is case-insensitive. Identifiers are normalized to upper case and
/// returned once each, in the order they first appear.
///
/// # Examples
///
/// ```
/// use advisory_harvest::crawler::extract_identifiers;
///
/// let ids = extract_identifiers("CVE-2023-12345 ... cve-2023-12345 and CVE-2024-0001");
/// assert_eq!(ids, vec!["CVE-2023-12345", "CVE-2024-0001"]);
/// ```
pub fn extract_identifiers(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    CVE_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_ascii_uppercase())
        .filter(|id| seen.insert(id.clone()))
        .collect()
}
