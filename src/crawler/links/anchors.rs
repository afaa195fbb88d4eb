use super::LinkDiscovery;
use crate::browser::BrowserPage;
use crate::config::AnchorSource;
use crate::crawler::parser::{parse_html, resolve_link, ANCHOR_SELECTOR};
use crate::url::{is_same_site, CrawlTarget};
use crate::CrawlError;
use async_trait::async_trait;
use url::Url;

/// Static link extraction from `<a href>` elements
///
/// Read-only: the page is never navigated.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnchorLinkExtractor {
    source: AnchorSource,
}

impl AnchorLinkExtractor {
    pub fn new(source: AnchorSource) -> Self {
        Self { source }
    }

    async fn hrefs_from_dom<P: BrowserPage>(
        &self,
        page: &P,
        page_url: &Url,
    ) -> Result<Vec<Url>, CrawlError> {
        let anchors = page.query_all(ANCHOR_SELECTOR).await?;
        let mut links = Vec::with_capacity(anchors.len());

        for anchor in &anchors {
            match page.attribute(anchor, "href").await {
                Ok(Some(href)) => links.extend(resolve_link(&href, page_url)),
                Ok(None) => {}
                Err(e) => {
                    let e = CrawlError::from(e);
                    if e.is_fatal() {
                        return Err(e);
                    }
                    tracing::debug!("Skipping unreadable anchor on {}: {}", page_url, e);
                }
            }
        }

        Ok(links)
    }

    async fn hrefs_from_markup<P: BrowserPage>(
        &self,
        page: &P,
        page_url: &Url,
    ) -> Result<Vec<Url>, CrawlError> {
        let html = page.content().await?;
        Ok(parse_html(&html, page_url))
    }
}

#[async_trait]
impl<P: BrowserPage> LinkDiscovery<P> for AnchorLinkExtractor {
    fn name(&self) -> &'static str {
        "anchor"
    }

    async fn discover_links(
        &self,
        page: &P,
        page_url: &Url,
        target: &CrawlTarget,
    ) -> Result<Vec<Url>, CrawlError> {
        let links = match self.source {
            AnchorSource::Dom => self.hrefs_from_dom(page, page_url).await?,
            AnchorSource::Markup => self.hrefs_from_markup(page, page_url).await?,
        };

        let total = links.len();
        let links: Vec<Url> = links
            .into_iter()
            .filter(|url| is_same_site(url, target.domain()))
            .collect();

        tracing::debug!("{} anchors on {}, {} same-site", total, page_url, links.len());

        Ok(links)
    }
}
