//! Tag feed fetcher.
//!
//! Fetches the RSS/Atom feed for a topic tag over HTTP and reduces it to an
//! ordered list of [`FeedItem`]s, newest first as the source orders them.

use std::time::Duration;

use async_trait::async_trait;
use feed_rs::parser;
use reqwest::Client;
use tracing::{debug, trace};
use url::Url;

use crate::error::{FeedError, Result};
use crate::types::{FeedItem, MAX_FEED_SIZE, UNTITLED};

/// Default base URL; the tag is appended as the last path segment.
pub const DEFAULT_FEED_BASE_URL: &str = "https://medium.com/feed/tag/";

/// Connect timeout in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Read timeout in seconds.
const READ_TIMEOUT_SECS: u64 = 20;

/// Total timeout in seconds.
const TOTAL_TIMEOUT_SECS: u64 = 30;

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 5;

/// User agent string for feed fetching.
const USER_AGENT: &str = concat!("feedbot/", env!("CARGO_PKG_VERSION"));

/// A source of candidate items for a topic tag.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch at most `limit` items for `tag`, in feed order.
    async fn fetch(&self, tag: &str, limit: usize) -> Result<Vec<FeedItem>>;
}

/// HTTP client for feeds addressed as `<base>/<tag>`.
pub struct TagFeedClient {
    client: Client,
    base_url: Url,
}

impl TagFeedClient {
    /// Create a client for the default feed host.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_FEED_BASE_URL)
    }

    /// Create a client for a custom base URL.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| FeedError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(FeedError::InvalidUrl(format!(
                "{} cannot be used as a base URL",
                base_url
            )));
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .read_timeout(Duration::from_secs(READ_TIMEOUT_SECS))
            .timeout(Duration::from_secs(TOTAL_TIMEOUT_SECS))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// The URL fetched for `tag`.
    pub fn feed_url(&self, tag: &str) -> Result<Url> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(FeedError::InvalidUrl("empty tag".to_string()));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FeedError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(tag);
        Ok(url)
    }
}

#[async_trait]
impl FeedSource for TagFeedClient {
    async fn fetch(&self, tag: &str, limit: usize) -> Result<Vec<FeedItem>> {
        let url = self.feed_url(tag)?;
        debug!(url = %url, limit, "fetching feed");

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(FeedError::Status(response.status().as_u16()));
        }

        if let Some(content_length) = response.content_length() {
            if content_length > MAX_FEED_SIZE {
                return Err(FeedError::TooLarge {
                    size: content_length,
                    max: MAX_FEED_SIZE,
                });
            }
        }

        let bytes = response.bytes().await?;
        if bytes.len() as u64 > MAX_FEED_SIZE {
            return Err(FeedError::TooLarge {
                size: bytes.len() as u64,
                max: MAX_FEED_SIZE,
            });
        }

        parse_items(&bytes, limit)
    }
}

/// Parse an RSS or Atom document into at most `limit` items.
///
/// Entries without a link are dropped since they cannot be deduplicated.
pub fn parse_items(bytes: &[u8], limit: usize) -> Result<Vec<FeedItem>> {
    let feed = parser::parse(bytes).map_err(|e| FeedError::Parse(e.to_string()))?;

    let items: Vec<FeedItem> = feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let Some(link) = entry.links.into_iter().map(|l| l.href).find(|h| !h.trim().is_empty())
            else {
                trace!(id = %entry.id, "skipping entry without link");
                return None;
            };
            let title = entry
                .title
                .map(|t| t.content.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| UNTITLED.to_string());
            Some(FeedItem::new(title, link.trim()))
        })
        .take(limit)
        .collect();

    Ok(items)
}
