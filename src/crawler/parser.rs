//! HTML extraction for index, article and forum pages
//!
//! Every function here takes the raw body and returns owned data, so a parsed
//! document never has to be held across an `.await`.

use scraper::{Html, Selector};
use std::sync::LazyLock;

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("link selector is valid"));

static TIME_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("time").expect("time selector is valid"));

static AUTHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.creator").expect("author selector is valid"));

static UPDATE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("span.a-publish-info__update").expect("update selector is valid")
});

/// Extracted information from an article page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArticle {
    /// `datetime` attribute of the first `<time>` element
    pub published_raw: Option<String>,

    /// Last line of the author block
    pub author: Option<String>,

    /// Full document text, used for identifier extraction
    pub text: String,

    /// Whether the page carries an "updated" marker
    pub has_update_marker: bool,

    /// First link into the discussion thread
    pub comment_entry: Option<String>,
}

/// Returns every `href` on the page, in document order
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document_links(&document)
}

fn document_links(document: &Html) -> Vec<String> {
    document
        .select(&LINK_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
        .collect()
}

/// Parses an article page
///
/// # Arguments
///
/// * `html` - The article body
/// * `comment_marker` - Substring identifying the discussion link
pub fn parse_article(html: &str, comment_marker: &str) -> ParsedArticle {
    let document = Html::parse_document(html);

    let published_raw = document
        .select(&TIME_SELECTOR)
        .next()
        .and_then(|el| el.value().attr("datetime"))
        .map(|s| s.trim().to_string());

    let author = document.select(&AUTHOR_SELECTOR).next().and_then(|el| {
        el.text()
            .collect::<String>()
            .trim()
            .lines()
            .last()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
    });

    let has_update_marker = document.select(&UPDATE_SELECTOR).next().is_some();

    let comment_entry = document_links(&document)
        .into_iter()
        .find(|href| href.contains(comment_marker));

    let text = document.root_element().text().collect::<String>();

    ParsedArticle {
        published_raw,
        author,
        text,
        has_update_marker,
        comment_entry,
    }
}

/// Finds the comment permalinks on a thread landing page
///
/// Links must contain `fragment` (the forum directory plus the article's
/// hyphenated title). The chronological view links to the same postings in a
/// different order and is skipped. Duplicates keep their first position.
pub fn find_permalinks(html: &str, fragment: &str) -> Vec<String> {
    let mut permalinks: Vec<String> = Vec::new();
    for href in extract_links(html) {
        if href.contains(fragment)
            && !href.contains("/chronological/")
            && !permalinks.contains(&href)
        {
            permalinks.push(href);
        }
    }
    permalinks
}

/// Extracts the raw text of posting `posting_id` from a comment page
pub fn extract_comment_body(html: &str, posting_id: &str) -> Option<String> {
    let selector = Selector::parse(&format!("div#posting_{}", posting_id)).ok()?;
    let document = Html::parse_document(html);
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>())
}

/// Trims every line and drops blank ones
pub fn clean_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Keeps the text preceding the first occurrence of `marker`
///
/// Returns None if the marker is absent.
pub fn strip_footer(text: &str, marker: &str) -> Option<String> {
    text.find(marker).map(|i| text[..i].trim().to_string())
}
