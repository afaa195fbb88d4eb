//! Sitegrove main entry point
//!
//! This is the command-line interface for the Sitegrove site mapper.

use anyhow::{bail, Context};
use clap::Parser;
use sitegrove::browser::ChromePage;
use sitegrove::config::{load_config, validate, Config};
use sitegrove::crawler::{CrawlStatus, Crawler, EventSink};
use sitegrove::output::{build_sitemap, print_report, write_sitemap, ConsoleRenderer};
use sitegrove::url::CrawlTarget;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sitegrove: a browser-driven site mapper
///
/// Sitegrove drives a real browser across one website, following anchors and
/// clicking script-driven links, and writes the pages it found as a nested
/// path tree to `<output-dir>/<domain>-sitemap.json`.
#[derive(Parser, Debug)]
#[command(name = "sitegrove")]
#[command(version)]
#[command(about = "A browser-driven site mapper", long_about = None)]
struct Cli {
    /// Root URL to crawl; only pages under it are visited
    #[arg(value_name = "URL")]
    url: String,

    /// Deepest link depth to enqueue (root is 0)
    #[arg(long)]
    max_depth: Option<u32>,

    /// Stop after this many pages have been visited
    #[arg(long)]
    max_pages: Option<usize>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory receiving the sitemap file
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    headful: bool,

    /// Load every URL without a HEAD content-type check
    #[arg(long)]
    no_gate: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Loads the config file (if any) and applies command-line overrides
    fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
            None => Config::default(),
        };

        if self.max_depth.is_some() {
            config.crawler.max_depth = self.max_depth;
        }
        if self.max_pages.is_some() {
            config.crawler.max_pages = self.max_pages;
        }
        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.clone();
        }
        if self.headful {
            config.browser.headless = false;
        }
        if self.no_gate {
            config.gate.enabled = false;
        }

        validate(&config).context("Invalid configuration")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = cli.resolve_config()?;
    let target = CrawlTarget::parse(&cli.url)
        .with_context(|| format!("Invalid root URL: {}", cli.url))?;

    tracing::info!(
        "Crawling {} (max depth: {:?}, max pages: {:?})",
        target.root(),
        config.crawler.max_depth,
        config.crawler.max_pages
    );

    let page = ChromePage::launch(&config.browser)
        .await
        .context("Failed to launch browser")?;

    let (events, receiver) = if cli.quiet {
        (EventSink::disabled(), None)
    } else {
        let (sink, receiver) = EventSink::channel();
        (sink, Some(receiver))
    };
    let renderer = receiver.map(|r| ConsoleRenderer::new(cli.verbose > 0).spawn(r));

    let crawler = match Crawler::new(&page, target, &config) {
        Ok(crawler) => crawler.with_events(events),
        Err(e) => {
            page.close().await;
            return Err(e).context("Failed to set up crawler");
        }
    };

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let report = crawler.run_until(shutdown).await;
    page.close().await;

    if let Some(renderer) = renderer {
        let _ = renderer.await;
    }

    // Written in every outcome, including interrupted and aborted crawls
    let tree = build_sitemap(&report.visited);
    let written = write_sitemap(&tree, &config.output.directory, report.target.domain());

    let sitemap_path = match &written {
        Ok(path) => Some(path.as_path()),
        Err(e) => {
            tracing::error!("Failed to write sitemap: {}", e);
            None
        }
    };

    if !cli.quiet {
        print_report(&report, sitemap_path);
    }

    written.context("Failed to write sitemap")?;

    if let CrawlStatus::Aborted(e) = report.status {
        bail!("Crawl aborted: {}", e);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Progress lines come from the event renderer on stdout, so default logging
/// on stderr is limited to warnings.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitegrove=warn,error"),
            1 => EnvFilter::new("sitegrove=info,warn"),
            2 => EnvFilter::new("sitegrove=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
