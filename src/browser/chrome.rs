//! Chromium backend built on `chromiumoxide`

use super::{BrowserError, BrowserPage};
use crate::config::BrowserConfig;
use async_trait::async_trait;
use chromiumoxide::error::CdpError;
use chromiumoxide::{Browser, Element, Page};
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Resolves once no new resource entries have appeared for 500ms
const NETWORK_IDLE_SCRIPT: &str = r#"async () => {
    const quietWindow = 500;
    let seen = performance.getEntriesByType('resource').length;
    let quietFor = 0;
    while (quietFor < quietWindow || document.readyState !== 'complete') {
        await new Promise(resolve => setTimeout(resolve, 100));
        const now = performance.getEntriesByType('resource').length;
        if (now === seen) {
            quietFor += 100;
        } else {
            seen = now;
            quietFor = 0;
        }
    }
    return true;
}"#;

const VISIBILITY_POLL: Duration = Duration::from_millis(50);

/// One Chromium tab driven over the DevTools protocol
pub struct ChromePage {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    navigation_timeout: Duration,
}

impl ChromePage {
    /// Launches a browser and opens a blank tab
    pub async fn launch(config: &BrowserConfig) -> Result<Self, BrowserError> {
        let mut builder = chromiumoxide::BrowserConfig::builder()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .request_timeout(config.navigation_timeout());

        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(executable) = &config.executable {
            builder = builder.chrome_executable(executable);
        }

        let launch_config = builder
            .build()
            .map_err(|e| BrowserError::Disconnected(format!("invalid launch options: {}", e)))?;

        let (browser, mut handler) = Browser::launch(launch_config)
            .await
            .map_err(|e| BrowserError::Disconnected(format!("launch failed: {}", e)))?;

        let handler = tokio::spawn(async move { while handler.next().await.is_some() {} });

        let page = browser.new_page("about:blank").await.map_err(map_cdp)?;

        tracing::info!("Browser launched (headless: {})", config.headless);

        Ok(Self {
            browser,
            page,
            handler,
            navigation_timeout: config.navigation_timeout(),
        })
    }

    /// Closes the browser process
    pub async fn close(self) {
        let mut browser = self.browser;
        if let Err(e) = browser.close().await {
            tracing::warn!("Browser close error: {}", e);
        }
        self.handler.abort();
    }

    async fn settle(&self) -> Result<(), BrowserError> {
        loop {
            self.page.wait_for_navigation().await.map_err(map_cdp)?;

            match self.page.evaluate_function(NETWORK_IDLE_SCRIPT).await {
                Ok(_) => return Ok(()),
                Err(e) if is_disconnect(&e) => return Err(map_cdp(e)),
                Err(e) => {
                    // A navigation destroyed the script's context; check the new document
                    tracing::trace!("Network idle check interrupted: {}", e);
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
            }
        }
    }
}

#[async_trait]
impl BrowserPage for ChromePage {
    type Element = Element;

    async fn open(&self, url: &str) -> Result<(), BrowserError> {
        tokio::time::timeout(self.navigation_timeout, self.page.goto(url))
            .await
            .map_err(|_| BrowserError::Timeout(format!("navigation to {}", url)))?
            .map_err(|e| match e {
                e if is_disconnect(&e) => map_cdp(e),
                e => BrowserError::Navigation {
                    url: url.to_string(),
                    reason: e.to_string(),
                },
            })?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String, BrowserError> {
        self.page
            .url()
            .await
            .map_err(map_cdp)?
            .ok_or_else(|| BrowserError::Protocol("page has no location".to_string()))
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<Element>, BrowserError> {
        self.page.find_elements(selector).await.map_err(map_cdp)
    }

    async fn attribute(
        &self,
        element: &Element,
        name: &str,
    ) -> Result<Option<String>, BrowserError> {
        element.attribute(name).await.map_err(map_cdp)
    }

    async fn click(&self, element: &Element) -> Result<(), BrowserError> {
        element.click().await.map_err(map_cdp)?;
        Ok(())
    }

    async fn wait_for_visible(
        &self,
        element: &Element,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            match element.clickable_point().await {
                Ok(_) => return Ok(()),
                Err(e) if is_disconnect(&e) => return Err(map_cdp(e)),
                Err(_) => {}
            }

            if tokio::time::Instant::now() >= deadline {
                return Err(BrowserError::NotVisible(format!(
                    "no clickable point within {:?}",
                    timeout
                )));
            }

            tokio::time::sleep(VISIBILITY_POLL).await;
        }
    }

    async fn wait_for_network_idle(&self, timeout: Duration) -> Result<(), BrowserError> {
        tokio::time::timeout(timeout, self.settle())
            .await
            .map_err(|_| BrowserError::Timeout("network idle".to_string()))?
    }

    async fn content(&self) -> Result<String, BrowserError> {
        self.page.content().await.map_err(map_cdp)
    }
}

fn is_disconnect(err: &CdpError) -> bool {
    matches!(
        err,
        CdpError::Ws(_) | CdpError::ChannelSendError(_) | CdpError::NoResponse
    )
}

fn map_cdp(err: CdpError) -> BrowserError {
    match err {
        CdpError::Timeout => BrowserError::Timeout("browser response".to_string()),
        e if is_disconnect(&e) => BrowserError::Disconnected(e.to_string()),
        e => BrowserError::Protocol(e.to_string()),
    }
}
