//! Poll loop configuration.

use std::time::Duration;

/// Default time between poll cycles (one hour).
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(3600);

/// Default number of feed entries considered per cycle.
pub const DEFAULT_MAX_ITEMS: usize = 5;

/// Hashtags appended to every post after the topic tag.
pub const DEFAULT_EXTRA_HASHTAGS: &[&str] = &["infosec", "cybersecurity"];

/// Configuration for the poll loop.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Time between the start of one cycle's sleep and the next cycle.
    pub interval: Duration,
    /// Maximum feed entries fetched per cycle.
    pub max_items: usize,
    /// Hashtags appended after the topic tag.
    pub extra_hashtags: Vec<String>,
    /// Chat that receives error reports, if any.
    pub operator_log: Option<String>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            max_items: DEFAULT_MAX_ITEMS,
            extra_hashtags: DEFAULT_EXTRA_HASHTAGS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            operator_log: None,
        }
    }
}

impl PollConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the poll interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the per-cycle item cap. At least one item is always considered.
    pub fn with_max_items(mut self, max: usize) -> Self {
        self.max_items = max.max(1);
        self
    }

    /// Sets the trailing hashtags.
    pub fn with_extra_hashtags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_hashtags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the operator log destination.
    pub fn with_operator_log(mut self, destination: impl Into<String>) -> Self {
        self.operator_log = Some(destination.into());
        self
    }
}
