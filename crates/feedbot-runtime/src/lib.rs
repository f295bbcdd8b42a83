//! Poll loop for the feed bot.
//!
//! This crate holds the scheduling core:
//! - `FeedCycle` - one fetch, filter, send, record pass
//! - `PollScheduler` - starts and stops the task that runs cycles on an interval
//! - `Notifier` - the outgoing message seam, implemented by the bot crate
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use feedbot_feed::TagFeedClient;
//! use feedbot_persistence::{PostedLinkLog, SettingsStore};
//! use feedbot_runtime::{FeedCycle, PollConfig, PollScheduler};
//!
//! let cycle = FeedCycle::new(
//!     Arc::new(SettingsStore::new("state/settings.json")),
//!     Arc::new(PostedLinkLog::new("state/posted_links.txt")),
//!     Arc::new(TagFeedClient::new()?),
//!     notifier, // any `Arc<dyn Notifier>`
//!     PollConfig::default(),
//! );
//! let scheduler = PollScheduler::new(Arc::new(cycle));
//!
//! scheduler.start().await;
//! // ...
//! scheduler.shutdown().await?;
//! ```
//!
//! # Cycle guarantees
//!
//! - Links already in the posted log are never sent again
//! - A delivered link is recorded before the next item is attempted
//! - A failed delivery is not recorded, so the next cycle retries it
//! - Stopping never interrupts a cycle in progress

pub mod config;
pub mod cycle;
pub mod error;
pub mod message;
pub mod notifier;
pub mod report;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::PollConfig;
pub use cycle::FeedCycle;
pub use error::{Result, RuntimeError};
pub use message::{format_post, hashtag_for, html_escape};
pub use notifier::{NotifyError, Notifier, TextMode};
pub use report::CycleReport;
pub use scheduler::{PollScheduler, StartOutcome};
