use url::Url;

/// Extracts the host used for same-site comparisons
///
/// The `url` crate already lowercases hosts of special schemes, so the
/// returned value can be compared with `==` against another extracted host.
/// Ports are not part of the result.
///
/// # Arguments
///
/// * `url` - The URL to extract the domain from
///
/// # Returns
///
/// * `Some(String)` - The host
/// * `None` - If the URL has no host (`mailto:`, `data:`, ...)
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitegrove::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM:8080/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("mailto:someone@example.com").unwrap();
/// assert_eq!(extract_domain(&url), None);
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}
