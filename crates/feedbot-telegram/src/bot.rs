//! Main Telegram bot implementation.

use std::sync::Arc;

use teloxide::dispatching::UpdateFilterExt;
use teloxide::prelude::*;
use teloxide::types::Me;
use tracing::{debug, info, warn};

use feedbot_feed::TagFeedClient;

use crate::admin::TelegramRoster;
use crate::config::BotConfig;
use crate::error::{Result, TelegramError};
use crate::handlers::{handle_command, is_addressed_to, Command};
use crate::notifier::TelegramNotifier;
use crate::state::{create_shared_state, BotState};

/// Message sent to the operator log once the bot is up.
pub const STARTUP_MESSAGE: &str = "✅ Bot has started successfully.";

/// The feed relay bot.
pub struct FeedBot {
    /// The teloxide bot instance.
    bot: Bot,
    /// Shared state across handlers.
    state: Arc<BotState>,
}

impl FeedBot {
    /// Create a new FeedBot wired to the Bot API and the tag feed.
    pub fn new(token: impl Into<String>, config: &BotConfig) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(TelegramError::NoToken);
        }

        let bot = Bot::new(token);
        let source = TagFeedClient::with_base_url(&config.feed_base_url)?;
        let state = create_shared_state(
            config,
            Arc::new(TelegramRoster::new(bot.clone())),
            Arc::new(source),
            Arc::new(TelegramNotifier::new(bot.clone())),
        );

        Ok(Self { bot, state })
    }

    pub fn state(&self) -> Arc<BotState> {
        Arc::clone(&self.state)
    }

    /// Get the bot's username.
    pub async fn get_me(&self) -> Result<String> {
        let me = self
            .bot
            .get_me()
            .await
            .map_err(|e| TelegramError::BotStartFailed(e.to_string()))?;
        Ok(me.username().to_string())
    }

    /// Tell the operator log the bot is up. Failure is only logged.
    pub async fn announce_startup(&self) {
        self.state
            .scheduler()
            .cycle()
            .report_to_operator(STARTUP_MESSAGE)
            .await;
    }

    /// Start posting without waiting for `/startfeed`.
    pub async fn autostart(&self) {
        self.state.scheduler().start().await;
    }

    /// Run the bot in polling mode until Ctrl+C, then stop the poll loop.
    pub async fn start_polling(&self) -> Result<()> {
        info!("Starting Telegram bot in polling mode...");

        let bot = self.bot.clone();
        let state_for_commands = Arc::clone(&self.state);

        let handler = dptree::entry()
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
                        let state = Arc::clone(&state_for_commands);
                        info!(chat_id = %msg.chat.id, "Command matched: {:?}", cmd);
                        async move { handle_command(bot, msg, cmd, state).await }
                    }),
            )
            .branch(
                Update::filter_message()
                    .filter(|msg: Message, me: Me| {
                        // Commands addressed to other bots in the chat are not ours to answer
                        msg.text()
                            .map(|t| t.starts_with('/') && is_addressed_to(t, me.username()))
                            .unwrap_or(false)
                    })
                    .endpoint(|bot: Bot, msg: Message| async move {
                        if let Some(text) = msg.text() {
                            let name = text.split_whitespace().next().unwrap_or(text);
                            debug!(cmd = %name, "Unrecognized command");
                            bot.send_message(
                                msg.chat.id,
                                format!(
                                    "Unknown command: {}\n\nUse /help to see available commands.",
                                    name
                                ),
                            )
                            .await?;
                        }
                        Ok(())
                    }),
            );

        info!("Bot is running! Send /start to begin.");

        Dispatcher::builder(bot, handler)
            .default_handler(|upd| async move {
                debug!("Unhandled update: {:?}", upd.kind);
            })
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        info!("Dispatcher stopped, shutting down poll loop");
        if let Err(e) = self.state.scheduler().shutdown().await {
            warn!(error = %e, "poll loop did not shut down cleanly");
            return Err(e.into());
        }
        Ok(())
    }
}
