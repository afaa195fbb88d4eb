//! Output module for crawl results
//!
//! This module handles:
//! - Folding visited URLs into a nested sitemap tree
//! - Persisting the tree as JSON named after the crawled domain
//! - Rendering crawl events and the final report for the terminal

pub mod console;
mod json;
mod sitemap;

pub use console::{format_report, print_report, ConsoleRenderer};
pub use json::{read_sitemap, sitemap_file_name, write_sitemap};
pub use sitemap::{build_sitemap, SitemapTree};
