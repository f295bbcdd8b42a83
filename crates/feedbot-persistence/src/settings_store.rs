//! The persisted topic tag and destination.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::atomic::{atomic_write_json, read_json_optional};
use crate::error::{PersistenceError, Result};

/// Tag used when no settings record exists.
pub const DEFAULT_TOPIC_TAG: &str = "hacking";

/// Destination used when no settings record exists.
pub const DEFAULT_DESTINATION: &str = "@your_default_channel";

/// Runtime-configurable bot settings.
///
/// Serialized as `{"hashtag": ..., "chat_id": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Tag the feed is filtered by.
    #[serde(rename = "hashtag")]
    pub topic_tag: String,
    /// Chat that new items are posted to.
    #[serde(rename = "chat_id")]
    pub destination: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            topic_tag: DEFAULT_TOPIC_TAG.to_string(),
            destination: DEFAULT_DESTINATION.to_string(),
        }
    }
}

impl Settings {
    fn validate(&self) -> Result<()> {
        if self.topic_tag.trim().is_empty() {
            return Err(PersistenceError::InvalidSettings(
                "hashtag is empty".to_string(),
            ));
        }
        if self.destination.trim().is_empty() {
            return Err(PersistenceError::InvalidSettings(
                "chat_id is empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// File-backed store for [`Settings`].
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl SettingsStore {
    /// Creates a store backed by the given file. Nothing is read or written yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the settings record.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the current settings.
    ///
    /// A missing record yields the defaults and is not created. A record that
    /// exists but cannot be parsed, or has an empty field, is an error.
    pub fn load(&self) -> Result<Settings> {
        match read_json_optional::<Settings>(&self.path)? {
            Some(settings) => {
                settings.validate()?;
                Ok(settings)
            }
            None => {
                debug!(path = %self.path.display(), "no settings record, using defaults");
                Ok(Settings::default())
            }
        }
    }

    /// Replaces the persisted settings.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        settings.validate()?;
        atomic_write_json(&self.path, settings)?;
        debug!(
            path = %self.path.display(),
            hashtag = %settings.topic_tag,
            chat_id = %settings.destination,
            "saved settings"
        );
        Ok(())
    }

    /// Loads, mutates and saves the settings as one step.
    ///
    /// Returns the settings as saved.
    pub fn update<F>(&self, mutate: F) -> Result<Settings>
    where
        F: FnOnce(&mut Settings),
    {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut settings = self.load()?;
        mutate(&mut settings);
        self.save(&settings)?;
        Ok(settings)
    }
}
