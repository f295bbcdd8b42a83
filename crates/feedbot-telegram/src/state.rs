//! Shared state for the Telegram bot.

use std::sync::Arc;

use feedbot_feed::FeedSource;
use feedbot_persistence::{PostedLinkLog, SettingsStore};
use feedbot_runtime::{FeedCycle, Notifier, PollScheduler};

use crate::admin::{AdminGate, RosterLookup};
use crate::config::BotConfig;

/// State shared by every command handler.
pub struct BotState {
    settings: Arc<SettingsStore>,
    gate: AdminGate,
    scheduler: PollScheduler,
}

impl BotState {
    /// Wire stores, gate and scheduler from config and collaborators.
    pub fn new(
        config: &BotConfig,
        roster: Arc<dyn RosterLookup>,
        source: Arc<dyn FeedSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let settings = Arc::new(SettingsStore::new(config.settings_file()));
        let posted = Arc::new(PostedLinkLog::new(config.posted_links_file()));
        let cycle = FeedCycle::new(
            Arc::clone(&settings),
            posted,
            source,
            notifier,
            config.poll.clone(),
        );

        Self {
            settings,
            gate: AdminGate::new(roster, config.control_chat),
            scheduler: PollScheduler::new(Arc::new(cycle)),
        }
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn gate(&self) -> &AdminGate {
        &self.gate
    }

    pub fn scheduler(&self) -> &PollScheduler {
        &self.scheduler
    }
}

/// Create shared state for use in handlers.
pub fn create_shared_state(
    config: &BotConfig,
    roster: Arc<dyn RosterLookup>,
    source: Arc<dyn FeedSource>,
    notifier: Arc<dyn Notifier>,
) -> Arc<BotState> {
    Arc::new(BotState::new(config, roster, source, notifier))
}
