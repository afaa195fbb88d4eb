//! URL handling module for Sitegrove
//!
//! This module provides the URL classifier used by every other component:
//! canonicalization, same-site membership, and subtree scoping. All
//! functions here are pure.

mod canonical;
mod domain;

use crate::UrlError;
use url::Url;

// Re-export main functions
pub use canonical::{canonicalize, canonicalize_absolute};
pub use domain::extract_domain;

/// The site being crawled
///
/// Holds the root URL and the host derived from it. Immutable once created;
/// every scope decision during a crawl is made against this value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    root: Url,
    domain: String,
}

impl CrawlTarget {
    /// Parses a root URL into a crawl target
    ///
    /// The root must be an absolute `http` or `https` URL with a host. Its
    /// fragment is stripped.
    ///
    /// # Examples
    ///
    /// ```
    /// use sitegrove::url::CrawlTarget;
    ///
    /// let target = CrawlTarget::parse("https://example.com/fr#top").unwrap();
    /// assert_eq!(target.root().as_str(), "https://example.com/fr");
    /// assert_eq!(target.domain(), "example.com");
    /// ```
    pub fn parse(raw: &str) -> Result<Self, UrlError> {
        let root = canonicalize_absolute(raw)?;

        if root.scheme() != "http" && root.scheme() != "https" {
            return Err(UrlError::InvalidScheme(root.scheme().to_string()));
        }

        let domain =
            extract_domain(&root).ok_or_else(|| UrlError::MissingDomain(raw.to_string()))?;

        Ok(Self { root, domain })
    }

    /// The root URL the crawl starts from and is scoped to
    pub fn root(&self) -> &Url {
        &self.root
    }

    /// The host every crawled URL must share
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Returns true if `url` is same-site and inside the root's subtree
    pub fn admits(&self, url: &Url) -> bool {
        is_same_site(url, &self.domain) && is_within_scope(url, &self.root)
    }
}

/// Returns true iff the URL's host equals `site_domain` exactly
///
/// There is no subdomain wildcarding: `blog.example.com` is not same-site
/// with `example.com`.
///
/// # Examples
///
/// ```
/// use sitegrove::url::is_same_site;
/// use url::Url;
///
/// let url = Url::parse("https://example.com/a").unwrap();
/// assert!(is_same_site(&url, "example.com"));
///
/// let url = Url::parse("https://blog.example.com/a").unwrap();
/// assert!(!is_same_site(&url, "example.com"));
/// ```
pub fn is_same_site(url: &Url, site_domain: &str) -> bool {
    extract_domain(url).is_some_and(|domain| domain == site_domain)
}

/// Returns true iff `url` starts with `root` as a string prefix
///
/// Restricts a crawl started at `https://example.com/fr` to pages under
/// `/fr`. For a root at `/` this is equivalent to an origin check.
pub fn is_within_scope(url: &Url, root: &Url) -> bool {
    url.as_str().starts_with(root.as_str())
}
