//! Delivers poll output through the Bot API.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ParseMode, Recipient};
use tracing::debug;

use feedbot_runtime::{Notifier, NotifyError, TextMode};

/// Resolve a destination string into a Bot API recipient.
///
/// Numeric strings are chat ids; anything else is a public channel
/// username, with `@` added if missing.
pub fn recipient_for(destination: &str) -> Recipient {
    let destination = destination.trim();
    match destination.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) if destination.starts_with('@') => {
            Recipient::ChannelUsername(destination.to_string())
        }
        Err(_) => Recipient::ChannelUsername(format!("@{}", destination)),
    }
}

/// [`Notifier`] backed by a teloxide [`Bot`].
#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(
        &self,
        destination: &str,
        text: &str,
        mode: TextMode,
    ) -> Result<(), NotifyError> {
        let mut req = self.bot.send_message(recipient_for(destination), text);
        if mode == TextMode::Html {
            req = req.parse_mode(ParseMode::Html);
        }

        req.await.map_err(|e| NotifyError::Transport {
            destination: destination.to_string(),
            reason: e.to_string(),
        })?;

        debug!(destination = %destination, "message delivered");
        Ok(())
    }
}
