//! Content-type pre-check
//!
//! Before committing the browser to a full render, the gate issues a HEAD
//! request and skips resources that declare a non-HTML content type (PDFs,
//! images, archives linked from pages). The gate is an optimization: any
//! failure to learn the content type lets the page load proceed.
//!
//! HEAD requests never touch the shared browser page, so they go through
//! their own HTTP client and a rate limiter that bounds the aggregate request
//! rate against the target server.

use crate::config::GateConfig;
use crate::CrawlError;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::{redirect::Policy, Client, StatusCode};
use std::num::NonZeroU32;
use url::Url;

/// Media types treated as HTML documents
const HTML_TYPES: &[&str] = &["text/html", "application/xhtml+xml"];

/// Status and content type returned by a HEAD request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
}

/// Outcome of the pre-check
#[derive(Debug)]
pub enum GateVerdict {
    /// The server declared an HTML document
    Html,

    /// The server declared something else; skip the page load
    NotHtml {
        /// The declared Content-Type header value
        content_type: String,
    },

    /// The content type could not be established; load the page anyway
    Inconclusive {
        /// Why the check was inconclusive
        reason: CrawlError,
    },
}

impl GateVerdict {
    /// Returns true if the page should be loaded in the browser
    pub fn should_load(&self) -> bool {
        !matches!(self, Self::NotHtml { .. })
    }
}

/// Builds the HTTP client used for HEAD requests
///
/// # Arguments
///
/// * `config` - The pre-check configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &GateConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout())
        .connect_timeout(config.timeout())
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Returns true if a Content-Type header value names an HTML media type
///
/// Parameters such as `charset` are ignored and the comparison is
/// case-insensitive.
///
/// # Examples
///
/// ```
/// use sitegrove::crawler::is_html_content_type;
///
/// assert!(is_html_content_type("text/html; charset=utf-8"));
/// assert!(is_html_content_type("Application/XHTML+XML"));
/// assert!(!is_html_content_type("application/pdf"));
/// ```
pub fn is_html_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    HTML_TYPES.contains(&essence.as_str())
}

/// Issues a HEAD request, following redirects
///
/// # Returns
///
/// * `Ok(HeadResponse)` - The server answered, with any status
/// * `Err(CrawlError::FetchFailure)` - The request itself failed
pub async fn head_request(client: &Client, url: &Url) -> Result<HeadResponse, CrawlError> {
    let response = client
        .head(url.as_str())
        .send()
        .await
        .map_err(|e| CrawlError::FetchFailure {
            url: url.to_string(),
            reason: classify_request_error(&e),
        })?;

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    Ok(HeadResponse {
        status: response.status(),
        content_type,
    })
}

fn classify_request_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "request timeout".to_string()
    } else if err.is_connect() {
        "connection refused".to_string()
    } else if err.is_redirect() {
        "too many redirects".to_string()
    } else {
        err.to_string()
    }
}

/// Rate-limited HEAD pre-check
pub struct ContentTypeGate {
    client: Client,
    limiter: DefaultDirectRateLimiter,
}

impl ContentTypeGate {
    /// Creates a gate from configuration
    pub fn new(config: &GateConfig) -> Result<Self, CrawlError> {
        let client = build_http_client(config).map_err(|e| CrawlError::FetchFailure {
            url: String::new(),
            reason: format!("cannot build HTTP client: {}", e),
        })?;

        Ok(Self::with_client(client, config.requests_per_second))
    }

    /// Creates a gate around an existing client
    pub fn with_client(client: Client, requests_per_second: u32) -> Self {
        let rate = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);

        Self {
            client,
            limiter: RateLimiter::direct(Quota::per_second(rate)),
        }
    }

    /// Decides whether `url` is worth a full page load
    pub async fn check(&self, url: &Url) -> GateVerdict {
        self.limiter.until_ready().await;

        let response = match head_request(&self.client, url).await {
            Ok(response) => response,
            Err(reason) => return GateVerdict::Inconclusive { reason },
        };

        if !response.status.is_success() {
            return GateVerdict::Inconclusive {
                reason: CrawlError::FetchFailure {
                    url: url.to_string(),
                    reason: format!("HTTP {}", response.status.as_u16()),
                },
            };
        }

        match response.content_type {
            Some(content_type) if is_html_content_type(&content_type) => GateVerdict::Html,
            Some(content_type) => GateVerdict::NotHtml { content_type },
            None => GateVerdict::Inconclusive {
                reason: CrawlError::FetchFailure {
                    url: url.to_string(),
                    reason: "no Content-Type header".to_string(),
                },
            },
        }
    }
}
