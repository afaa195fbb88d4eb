use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

/// Nested path-segment tree of a crawled site
///
/// Each node maps a path segment to its children; leaves have no children.
/// Serializes as nested JSON objects, e.g. `{"a": {"b": {}, "c": {}}}`.
///
/// Children are kept in a sorted map, so two trees built from the same set
/// of URLs compare and serialize identically regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SitemapTree(BTreeMap<String, SitemapTree>);

impl SitemapTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walks `segments` from this node, creating missing nodes
    pub fn insert_path<I, S>(&mut self, segments: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut node = self;
        for segment in segments {
            node = node.0.entry(segment.into()).or_default();
        }
    }

    /// Adds the non-empty `/`-separated segments of `url`'s path
    pub fn insert_url(&mut self, url: &Url) {
        self.insert_path(path_segments(url));
    }

    pub fn get(&self, segment: &str) -> Option<&SitemapTree> {
        self.0.get(segment)
    }

    /// Child segments in sorted order
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &SitemapTree)> {
        self.0.iter().map(|(segment, child)| (segment.as_str(), child))
    }

    pub fn is_leaf(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of nodes below this one
    pub fn node_count(&self) -> usize {
        self.0.values().map(|child| 1 + child.node_count()).sum()
    }
}

fn path_segments(url: &Url) -> impl Iterator<Item = &str> {
    url.path().split('/').filter(|segment| !segment.is_empty())
}

/// Folds a set of URLs into a [`SitemapTree`]
///
/// Shared path prefixes are merged. Query strings and hosts are ignored:
/// only the path contributes segments, so the root URL adds nothing.
///
/// # Examples
///
/// ```
/// use sitegrove::build_sitemap;
/// use url::Url;
///
/// let urls = vec![
///     Url::parse("https://x.com/a/b").unwrap(),
///     Url::parse("https://x.com/a/c").unwrap(),
/// ];
/// let tree = build_sitemap(&urls);
/// assert_eq!(
///     serde_json::to_string(&tree).unwrap(),
///     r#"{"a":{"b":{},"c":{}}}"#
/// );
/// ```
pub fn build_sitemap<'a, I>(urls: I) -> SitemapTree
where
    I: IntoIterator<Item = &'a Url>,
{
    let mut tree = SitemapTree::new();
    for url in urls {
        tree.insert_url(url);
    }
    tree
}
