//! Chainwire RSS feed scraping
//!
//! Fetches the press release feed and flattens each item into an
//! [`Article`]. Items are lenient by contract: a missing title, link, or
//! date falls back to a usable default instead of dropping the item, so
//! one malformed entry never hides the rest of the feed.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rss::Channel;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Chainwire press release feed
pub const DEFAULT_FEED_URL: &str = "https://chainwire.org/feed/";

/// One scraped feed item, as persisted to the articles snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub link: String,
    /// None when the feed carried no parseable date
    #[serde(default)]
    pub pub_date: Option<DateTime<Utc>>,
    /// Full item content, falling back to the summary when the feed has
    /// no `content:encoded`
    #[serde(default)]
    pub content: Option<String>,
}

/// Fetch and parse the feed. Fails on transport errors or a body that is
/// not an RSS channel.
pub async fn fetch_feed(url: &str) -> Result<Vec<Article>> {
    info!(url, "fetching feed");
    let bytes = reqwest::get(url)
        .await
        .with_context(|| format!("fetching feed {url}"))?
        .error_for_status()?
        .bytes()
        .await?;

    let articles = parse_feed(&bytes, url)?;
    info!(count = articles.len(), "feed parsed");
    Ok(articles)
}

/// Parse raw feed bytes. `fallback_link` stands in for items without a
/// link when the channel declares no homepage either.
pub fn parse_feed(bytes: &[u8], fallback_link: &str) -> Result<Vec<Article>> {
    let channel = Channel::read_from(bytes).context("invalid RSS feed")?;
    let homepage = if channel.link().is_empty() {
        fallback_link
    } else {
        channel.link()
    };

    Ok(channel
        .items()
        .iter()
        .map(|item| Article {
            title: item.title().unwrap_or("Untitled").to_string(),
            link: item.link().unwrap_or(homepage).to_string(),
            pub_date: item.pub_date().and_then(parse_pub_date),
            content: item
                .content()
                .or_else(|| item.description())
                .map(str::to_string),
        })
        .collect())
}

/// Feed dates are RFC 2822 per the RSS spec, but some feeds emit RFC 3339
fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
