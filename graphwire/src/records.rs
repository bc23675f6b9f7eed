//! JSON snapshot files
//!
//! The scrape and publish phases hand off through two pretty-printed
//! JSON files: the articles snapshot written by the scraper, and the
//! published-records snapshot mapping each press release to its cid.
//! Paths are relative to the working directory; parent directories are
//! created on write. A missing or unparseable input file is fatal.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::feed::Article;

/// Default articles snapshot, written by `scrape`
pub const ARTICLES_FILE: &str = "data/press_releases.json";

/// Default published-records snapshot, written by `ingest`
pub const PUBLISHED_FILE: &str = "data/published.json";

/// One published press release: the ids minted for it and where its edit
/// lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedRecord {
    pub title: String,
    pub entity_id: String,
    pub block_id: String,
    /// Absent when the record predates a successful publish
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipfs_hash: Option<String>,
}

pub fn read_articles(path: &Path) -> Result<Vec<Article>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading articles snapshot {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("parsing articles snapshot {}", path.display()))
}

pub fn write_articles(path: &Path, articles: &[Article]) -> Result<()> {
    write_pretty(path, articles)
}

pub fn read_published(path: &Path) -> Result<Vec<PublishedRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading published snapshot {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("parsing published snapshot {}", path.display()))
}

pub fn write_published(path: &Path, records: &[PublishedRecord]) -> Result<()> {
    write_pretty(path, records)
}

fn write_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}
