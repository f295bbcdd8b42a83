//! Error types for feed fetching.

use thiserror::Error;

/// Errors that can occur while fetching or parsing a feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The feed URL could not be built.
    #[error("invalid feed URL: {0}")]
    InvalidUrl(String),

    /// The HTTP request failed.
    #[error("feed request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("feed server returned HTTP {0}")]
    Status(u16),

    /// The body exceeds the size cap.
    #[error("feed too large: {size} bytes (max {max} bytes)")]
    TooLarge { size: u64, max: u64 },

    /// The body is not a valid RSS or Atom document.
    #[error("failed to parse feed: {0}")]
    Parse(String),
}

/// Result type for feed operations.
pub type Result<T> = std::result::Result<T, FeedError>;
