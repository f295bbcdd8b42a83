//! Telegram bot interface for the feed relay.
//!
//! This crate wires the poll loop to Telegram: it delivers posts through the
//! Bot API, checks control channel administrators before privileged
//! commands, and exposes the command surface.
//!
//! # Environment Variables
//!
//! Required:
//! - `TELEGRAM_BOT_TOKEN`: Bot token from @BotFather
//! - `ADMIN_CHANNEL`: Chat id whose administrators may control the bot
//!
//! Optional:
//! - `LOGS_CHANNEL`: Chat that receives startup notes and error reports
//! - `FEEDBOT_STATE_DIR`: State directory (default: ~/.feedbot/state)
//! - `FEEDBOT_INTERVAL_SECS`: Seconds between poll cycles (default: 3600)
//!
//! # Example
//!
//! ```no_run
//! use feedbot_telegram::{BotConfig, FeedBot};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BotConfig::new(-1001234567890, "/path/to/state");
//!     let bot = FeedBot::new("123:token", &config)?;
//!
//!     bot.announce_startup().await;
//!     bot.start_polling().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Commands
//!
//! - `/start` - Liveness check
//! - `/help` - Show available commands
//! - `/settag <hashtag>` - Set the feed tag (admin)
//! - `/setchat <@channel or id>` - Set the destination (admin)
//! - `/startfeed` - Start posting (admin)
//! - `/stopfeed` - Stop posting (admin)
//! - `/status` - Show settings and poll status (admin)

pub mod admin;
pub mod bot;
pub mod config;
pub mod error;
pub mod handlers;
pub mod notifier;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use admin::{AdminGate, LookupError, MemberRole, RosterLookup, TelegramRoster};
pub use bot::FeedBot;
pub use config::BotConfig;
pub use error::{Result, TelegramError};
pub use handlers::{reply_for, Command};
pub use notifier::{recipient_for, TelegramNotifier};
pub use state::{create_shared_state, BotState};
