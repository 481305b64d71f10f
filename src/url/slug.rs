//! Title derivation from article slugs
//!
//! Article links look like `/news/Patchday-Microsoft-schliesst-Luecken-9712345.html`.
//! The title is the slug without its trailing id segment, words separated by
//! spaces. The same words joined by hyphens locate the article's comments in
//! the forum.

use url::Url;

/// Returns the path component of an href, absolute or relative
///
/// Query strings and fragments are dropped.
pub fn path_of(href: &str) -> &str {
    let href = href.trim();
    let without_origin = match Url::parse(href) {
        Ok(url) if url.has_host() => {
            // Slice the original string so the result borrows from `href`
            let after_scheme = href.find("://").map(|i| i + 3).unwrap_or(0);
            match href[after_scheme..].find('/') {
                Some(i) => &href[after_scheme + i..],
                None => "/",
            }
        }
        _ => href,
    };

    let end = without_origin
        .find(|c| c == '?' || c == '#')
        .unwrap_or(without_origin.len());
    &without_origin[..end]
}

/// Derives an article title from its link
///
/// Everything up to and including the last occurrence of `marker` is removed,
/// the rest is split on `-`, the final segment (the article id) is discarded
/// and the remaining segments are joined with spaces.
///
/// # Examples
///
/// ```
/// use advisory_harvest::url::title_from_slug;
///
/// let title = title_from_slug("/news/Sicherheitsupdate-fuer-Firefox-9712345.html", "/news/");
/// assert_eq!(title, "Sicherheitsupdate fuer Firefox");
/// ```
pub fn title_from_slug(href: &str, marker: &str) -> String {
    let path = path_of(href);
    let slug = match path.rfind(marker) {
        Some(i) => &path[i + marker.len()..],
        None => path.trim_start_matches('/'),
    };

    let mut segments: Vec<&str> = slug.split('-').collect();
    segments.pop();
    segments.join(" ")
}

/// The hyphenated form of a title, as it appears in forum URLs
pub fn thread_slug(title: &str) -> String {
    title.replace(' ', "-")
}
