//! Topic-tag feed fetching for the feed bot.
//!
//! [`FeedSource`] is the seam the poll loop depends on; [`TagFeedClient`] is
//! the HTTP implementation, fetching `<base>/<tag>` and parsing RSS or Atom
//! with `feed-rs`.
//!
//! # Example
//!
//! ```no_run
//! use feedbot_feed::{FeedSource, TagFeedClient};
//!
//! # async fn example() -> feedbot_feed::Result<()> {
//! let client = TagFeedClient::new()?;
//! for item in client.fetch("rust", 5).await? {
//!     println!("{} -> {}", item.title, item.link);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod fetcher;
pub mod types;

pub use error::{FeedError, Result};
pub use fetcher::{parse_items, FeedSource, TagFeedClient, DEFAULT_FEED_BASE_URL};
pub use types::{FeedItem, MAX_FEED_SIZE};
