//! HTML parsing of rendered page markup
//!
//! Used by the markup anchor source, which serializes the live page and reads
//! anchors locally instead of querying each element through the browser.
//! This module also holds the link hygiene rules shared by both anchor
//! sources.

use crate::url::canonicalize;
use scraper::{Html, Selector};
use url::Url;

/// Anchors that may lead to another page
pub const ANCHOR_SELECTOR: &str = "a[href]:not([download])";

/// Schemes that never lead to a crawlable document
const IGNORED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Parses HTML markup and extracts anchor targets
///
/// Targets are returned in document order with duplicates kept.
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links and data URIs
/// - fragment-only links (same page anchors)
/// - hrefs that cannot be resolved against `base_url`
///
/// Links are not filtered by site here; callers apply their own scope.
///
/// # Arguments
///
/// * `html` - The serialized document
/// * `base_url` - The URL the document was loaded from
///
/// # Example
///
/// ```
/// use sitegrove::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/page#top">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let links = parse_html(html, &base_url);
/// assert_eq!(links[0].as_str(), "https://example.com/page");
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    extract_links(&document, base_url)
}

fn extract_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let Ok(selector) = Selector::parse(ANCHOR_SELECTOR) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves an href to an absolute, fragment-free URL
///
/// Returns `None` if the link should be excluded:
/// - empty hrefs
/// - javascript:, mailto:, tel: schemes and data: URIs
/// - fragment-only links
/// - unresolvable hrefs
/// - non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if IGNORED_SCHEMES.iter().any(|scheme| lowered.starts_with(scheme)) {
        return None;
    }

    match canonicalize(base_url, href) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Some(url),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("Dropping link {:?}: {}", href, e);
            None
        }
    }
}
