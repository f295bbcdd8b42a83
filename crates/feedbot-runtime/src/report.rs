//! Poll cycle summaries.

use chrono::{DateTime, Utc};

/// Outcome of one finished poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// When the cycle began.
    pub started_at: DateTime<Utc>,
    /// Tag the cycle fetched.
    pub tag: String,
    /// Destination the cycle posted to.
    pub destination: String,
    /// Items returned by the feed.
    pub fetched: usize,
    /// Items skipped because they were already posted.
    pub skipped: usize,
    /// Items delivered and recorded.
    pub sent: usize,
    /// Items whose delivery failed.
    pub failed: usize,
}

impl CycleReport {
    pub(crate) fn new(started_at: DateTime<Utc>, tag: &str, destination: &str) -> Self {
        Self {
            started_at,
            tag: tag.to_string(),
            destination: destination.to_string(),
            fetched: 0,
            skipped: 0,
            sent: 0,
            failed: 0,
        }
    }

    /// One-line summary for status replies.
    pub fn summary(&self) -> String {
        format!(
            "{} UTC: {} fetched, {} new sent, {} already posted, {} failed",
            self.started_at.format("%Y-%m-%d %H:%M"),
            self.fetched,
            self.sent,
            self.skipped,
            self.failed
        )
    }
}
