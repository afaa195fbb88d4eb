use super::SitemapTree;
use crate::CrawlError;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name of the sitemap written for `domain`
pub fn sitemap_file_name(domain: &str) -> String {
    format!("{}-sitemap.json", domain)
}

/// Writes the sitemap as pretty-printed JSON
///
/// The directory is created if needed and an existing file is replaced.
///
/// # Arguments
///
/// * `tree` - The sitemap to persist
/// * `directory` - Destination directory
/// * `domain` - The crawled host, used to name the file
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written file
/// * `Err(CrawlError)` - Failed to create or write the file
pub fn write_sitemap(
    tree: &SitemapTree,
    directory: &Path,
    domain: &str,
) -> Result<PathBuf, CrawlError> {
    fs::create_dir_all(directory)?;

    let path = directory.join(sitemap_file_name(domain));
    let json = serde_json::to_string_pretty(tree)?;

    let mut file = File::create(&path)?;
    file.write_all(json.as_bytes())?;
    file.write_all(b"\n")?;

    tracing::info!("Sitemap written to {}", path.display());

    Ok(path)
}

/// Reads a sitemap previously written by [`write_sitemap`]
pub fn read_sitemap(path: &Path) -> Result<SitemapTree, CrawlError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
