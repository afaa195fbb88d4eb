use crate::UrlError;
use url::Url;

/// Resolves `raw` against `base` and strips the fragment
///
/// Resolution follows the WHATWG URL rules implemented by [`Url::join`]:
/// absolute inputs replace the base, `/path` keeps the base origin, and
/// relative paths are resolved against the base's directory. Surrounding
/// whitespace, common in hand-written `href` attributes, is ignored.
///
/// Fragments are removed because `/page#a` and `/page#b` are the same
/// document for crawl purposes.
///
/// # Arguments
///
/// * `base` - The URL of the page the link was found on
/// * `raw` - The link target as written in the page
///
/// # Returns
///
/// * `Ok(Url)` - The absolute, fragment-free URL
/// * `Err(UrlError)` - `raw` could not be resolved
///
/// # Examples
///
/// ```
/// use sitegrove::url::canonicalize;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/docs/intro").unwrap();
/// let url = canonicalize(&base, "setup#install").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs/setup");
/// ```
pub fn canonicalize(base: &Url, raw: &str) -> Result<Url, UrlError> {
    let mut url = base.join(raw.trim()).map_err(|e| UrlError::Parse {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    url.set_fragment(None);
    Ok(url)
}

/// Parses an absolute URL and strips the fragment
///
/// Used for locations reported by the browser, which are always absolute.
pub fn canonicalize_absolute(raw: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    url.set_fragment(None);
    Ok(url)
}
