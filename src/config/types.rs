use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Sitegrove
///
/// Every section and field has a default, so an empty file (or no file at
/// all) yields a usable configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub browser: BrowserConfig,
    pub gate: GateConfig,
    pub output: OutputConfig,
}

/// Where the static extractor reads anchors from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorSource {
    /// Query `a[href]` through the browser and read each attribute
    #[default]
    Dom,
    /// Serialize the rendered page and parse it locally
    Markup,
}

/// Crawl loop behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct CrawlerConfig {
    /// Deepest discovery depth that is still enqueued (root is depth 0)
    pub max_depth: Option<u32>,

    /// Stop enqueueing once this many URLs have been visited
    pub max_pages: Option<usize>,

    /// Attempts for each page load (navigation + network idle)
    pub page_load_attempts: u32,

    /// Attempts for each interactive candidate element
    pub interactive_attempts: u32,

    /// Backoff unit in milliseconds; attempt `n` waits `2^n` units
    pub backoff_unit_ms: u64,

    pub anchor_source: AnchorSource,

    /// Elements that navigate on click without an inspectable href
    pub interactive_selector: String,

    /// Only run the interactive pass on pages containing this selector
    pub interactive_trigger: Option<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            max_pages: None,
            page_load_attempts: 3,
            interactive_attempts: 1,
            backoff_unit_ms: 1000,
            anchor_source: AnchorSource::Dom,
            interactive_selector: r#"[role="link"]:not([href])"#.to_string(),
            interactive_trigger: None,
        }
    }
}

impl CrawlerConfig {
    pub fn backoff_unit(&self) -> Duration {
        Duration::from_millis(self.backoff_unit_ms)
    }
}

/// Browser session configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct BrowserConfig {
    /// Run without a visible window
    pub headless: bool,

    /// Path to a Chromium/Chrome binary; auto-detected when unset
    pub executable: Option<PathBuf>,

    /// How long a candidate element may take to become visible (ms)
    pub visibility_timeout_ms: u64,

    /// Pause before clicking so layout and animations settle (ms)
    pub settle_delay_ms: u64,

    /// Upper bound on waiting for network quiescence (ms)
    pub network_idle_timeout_ms: u64,

    /// Upper bound on a single navigation (ms)
    pub navigation_timeout_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
            visibility_timeout_ms: 500,
            settle_delay_ms: 1000,
            network_idle_timeout_ms: 15_000,
            navigation_timeout_ms: 30_000,
        }
    }
}

impl BrowserConfig {
    pub fn visibility_timeout(&self) -> Duration {
        Duration::from_millis(self.visibility_timeout_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn network_idle_timeout(&self) -> Duration {
        Duration::from_millis(self.network_idle_timeout_ms)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }
}

/// Content-type pre-check configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct GateConfig {
    /// Issue HEAD requests before loading pages
    pub enabled: bool,

    /// Aggregate HEAD request rate
    pub requests_per_second: u32,

    /// Per-request timeout (ms)
    pub timeout_ms: u64,

    pub user_agent: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_second: 10,
            timeout_ms: 10_000,
            user_agent: format!("sitegrove/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl GateConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory receiving `<domain>-sitemap.json`
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("crawled"),
        }
    }
}
