//! Persistence layer for the feed bot.
//!
//! Two files make up all durable state:
//!
//! - `settings.json`: the topic tag and destination ([`SettingsStore`]),
//!   replaced atomically (write to temp file, then rename)
//! - `posted_links.txt`: one delivered link per line ([`PostedLinkLog`]),
//!   appended and synced per item
//!
//! # Example
//!
//! ```no_run
//! use feedbot_persistence::{PostedLinkLog, SettingsStore};
//!
//! let settings = SettingsStore::new("/var/lib/feedbot/settings.json");
//! let current = settings.load().unwrap();
//!
//! let posted = PostedLinkLog::new("/var/lib/feedbot/posted_links.txt");
//! if !posted.load_all().unwrap().contains("https://example.com/post") {
//!     posted.append("https://example.com/post").unwrap();
//! }
//! # let _ = current;
//! ```

pub mod atomic;
pub mod error;
pub mod posted_log;
pub mod settings_store;

pub use error::{PersistenceError, Result};
pub use posted_log::PostedLinkLog;
pub use settings_store::{Settings, SettingsStore, DEFAULT_DESTINATION, DEFAULT_TOPIC_TAG};
