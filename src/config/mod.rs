//! Configuration module for Sitegrove
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! The file is optional: `Config::default()` is a complete configuration, and
//! the command line overrides individual fields.
//!
//! # Example
//!
//! ```no_run
//! use sitegrove::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sitegrove.toml")).unwrap();
//! println!("Crawler will stop at depth: {:?}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{AnchorSource, BrowserConfig, Config, CrawlerConfig, GateConfig, OutputConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
