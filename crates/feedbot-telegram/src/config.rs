//! Bot configuration and state file locations.
//!
//! # Storage Structure
//!
//! ```text
//! ~/.feedbot/
//! ├── config/
//! │   └── .env.local        # Secrets (bot token, channel ids)
//! └── state/
//!     ├── settings.json     # Topic tag and destination
//!     └── posted_links.txt  # Links already posted
//! ```
//!
//! # Environment Variables
//!
//! - `FEEDBOT_HOME`: Override the base directory
//! - `FEEDBOT_STATE_DIR`: Override the state directory

use std::path::{Path, PathBuf};

use feedbot_feed::DEFAULT_FEED_BASE_URL;
use feedbot_runtime::PollConfig;

use crate::error::Result;

/// Environment variable for a custom base directory.
pub const HOME_DIR_ENV: &str = "FEEDBOT_HOME";

/// Environment variable for a custom state directory.
pub const STATE_DIR_ENV: &str = "FEEDBOT_STATE_DIR";

/// Default base directory name under home.
const DEFAULT_HOME_DIR: &str = ".feedbot";

const CONFIG_SUBDIR: &str = "config";
const STATE_SUBDIR: &str = "state";

/// Settings record file name.
pub const SETTINGS_FILE: &str = "settings.json";

/// Posted-link log file name.
pub const POSTED_LINKS_FILE: &str = "posted_links.txt";

/// Get the base directory.
///
/// Determined by `FEEDBOT_HOME`, then `~/.feedbot`, then `.feedbot` in the
/// current directory.
pub fn home_dir() -> PathBuf {
    std::env::var(HOME_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(DEFAULT_HOME_DIR))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_HOME_DIR))
        })
}

/// Get the config directory.
pub fn config_dir() -> PathBuf {
    home_dir().join(CONFIG_SUBDIR)
}

/// Get the `.env.local` file path.
pub fn env_file() -> PathBuf {
    config_dir().join(".env.local")
}

/// Get the default state directory.
///
/// Defaults to `~/.feedbot/state/` or `FEEDBOT_STATE_DIR`.
pub fn default_state_dir() -> PathBuf {
    std::env::var(STATE_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(STATE_SUBDIR))
}

/// Everything needed to wire the bot.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Chat whose administrators may run privileged commands.
    pub control_chat: i64,
    /// Directory holding the settings record and posted-link log.
    pub state_dir: PathBuf,
    /// Base URL the topic tag is appended to.
    pub feed_base_url: String,
    /// Poll loop settings, including the operator log destination.
    pub poll: PollConfig,
}

impl BotConfig {
    /// Creates a config with default feed and poll settings.
    pub fn new(control_chat: i64, state_dir: impl Into<PathBuf>) -> Self {
        Self {
            control_chat,
            state_dir: state_dir.into(),
            feed_base_url: DEFAULT_FEED_BASE_URL.to_string(),
            poll: PollConfig::default(),
        }
    }

    /// Sets the feed base URL.
    pub fn with_feed_base_url(mut self, url: impl Into<String>) -> Self {
        self.feed_base_url = url.into();
        self
    }

    /// Sets the poll settings.
    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// Path of the settings record.
    pub fn settings_file(&self) -> PathBuf {
        self.state_dir.join(SETTINGS_FILE)
    }

    /// Path of the posted-link log.
    pub fn posted_links_file(&self) -> PathBuf {
        self.state_dir.join(POSTED_LINKS_FILE)
    }

    /// Ensure the state directory exists.
    ///
    /// # Errors
    /// Returns [`TelegramError::IoError`](crate::TelegramError::IoError) if
    /// the directory cannot be created.
    pub fn ensure_state_dir(&self) -> Result<()> {
        if !self.state_dir.exists() {
            std::fs::create_dir_all(&self.state_dir)?;
        }
        Ok(())
    }
}

/// Split a comma-separated hashtag list, dropping blanks and leading `#`.
pub fn parse_hashtag_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_start_matches('#').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
