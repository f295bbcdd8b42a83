//! Feed item types.

/// Maximum feed body size in bytes (5MB).
pub const MAX_FEED_SIZE: u64 = 5 * 1024 * 1024;

/// Title used for entries that have none.
pub const UNTITLED: &str = "Untitled";

/// One candidate item from a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    /// Item URL; also its identity for deduplication.
    pub link: String,
}

impl FeedItem {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
        }
    }
}
