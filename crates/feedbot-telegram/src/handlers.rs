//! Command handlers for the Telegram bot.

use std::sync::Arc;
use std::time::Duration;

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};

use feedbot_runtime::StartOutcome;

use crate::state::BotState;

/// Reply sent when a privileged command is refused.
pub const NOT_AUTHORIZED: &str = "❌ You are not authorized to use this command.";

/// Bot commands that can be invoked with /.
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Check that the bot is alive")]
    Start,

    #[command(description = "Show help message")]
    Help,

    #[command(description = "Set the feed hashtag: /settag <hashtag>")]
    SetTag(String),

    #[command(description = "Set the destination: /setchat <@channelname or chat_id>")]
    SetChat(String),

    #[command(description = "Start posting feed items")]
    StartFeed,

    #[command(description = "Stop posting feed items")]
    StopFeed,

    #[command(description = "Show current settings and poll status")]
    Status,
}

impl Command {
    /// Whether the command needs a control channel administrator.
    pub fn is_privileged(&self) -> bool {
        !matches!(self, Command::Start | Command::Help)
    }
}

/// Human wording for the poll interval, e.g. "hour" or "15 minutes".
pub fn describe_interval(interval: Duration) -> String {
    match interval.as_secs() {
        1 => "second".to_string(),
        60 => "minute".to_string(),
        3600 => "hour".to_string(),
        s if s > 0 && s % 3600 == 0 => format!("{} hours", s / 3600),
        s if s > 0 && s % 60 == 0 => format!("{} minutes", s / 60),
        s => format!("{} seconds", s),
    }
}

/// Whether a `/command` text is meant for this bot.
///
/// `/cmd@name` is addressed to `name` only; a bare `/cmd` is for every bot
/// in the chat. Usernames compare case-insensitively.
pub fn is_addressed_to(text: &str, bot_username: &str) -> bool {
    let head = text.split_whitespace().next().unwrap_or(text);
    match head.split_once('@') {
        Some((_, target)) => target.eq_ignore_ascii_case(bot_username),
        None => true,
    }
}

/// First whitespace-separated token of a command argument.
fn first_arg(arg: &str) -> Option<&str> {
    arg.split_whitespace().next()
}

async fn set_tag_reply(state: &BotState, arg: &str) -> String {
    let Some(tag) = first_arg(arg)
        .map(|t| t.trim_start_matches('#'))
        .filter(|t| !t.is_empty())
    else {
        return "⚠️ Usage: /settag <hashtag>".to_string();
    };

    match state.settings().update(|s| s.topic_tag = tag.to_string()) {
        Ok(settings) => {
            info!(tag = %settings.topic_tag, "hashtag updated");
            format!("✅ Hashtag updated to: #{}", settings.topic_tag)
        }
        Err(e) => {
            warn!(error = %e, "failed to update hashtag");
            format!("⚠️ Could not update settings: {}", e)
        }
    }
}

async fn set_chat_reply(state: &BotState, arg: &str) -> String {
    let Some(destination) = first_arg(arg) else {
        return "⚠️ Usage: /setchat <@channelname or chat_id>".to_string();
    };

    match state
        .settings()
        .update(|s| s.destination = destination.to_string())
    {
        Ok(settings) => {
            info!(destination = %settings.destination, "destination updated");
            format!("✅ Chat ID updated to: {}", settings.destination)
        }
        Err(e) => {
            warn!(error = %e, "failed to update destination");
            format!("⚠️ Could not update settings: {}", e)
        }
    }
}

async fn start_feed_reply(state: &BotState) -> String {
    match state.scheduler().start().await {
        StartOutcome::Started => format!(
            "🚀 Started posting feed items every {}.",
            describe_interval(state.scheduler().interval())
        ),
        StartOutcome::AlreadyRunning => "ℹ️ Already running.".to_string(),
    }
}

async fn stop_feed_reply(state: &BotState) -> String {
    // The handle is dropped; the task exits on its own after any in-flight cycle
    match state.scheduler().stop().await {
        Some(_) => "🛑 Stopped feed posting.".to_string(),
        None => "ℹ️ Feed posting is not running.".to_string(),
    }
}

async fn status_reply(state: &BotState) -> String {
    let settings = match state.settings().load() {
        Ok(settings) => settings,
        Err(e) => return format!("⚠️ Could not read settings: {}", e),
    };

    let posting = if state.scheduler().is_active().await {
        format!("running every {}", describe_interval(state.scheduler().interval()))
    } else {
        "stopped".to_string()
    };
    let last_cycle = state
        .scheduler()
        .last_report()
        .map(|r| r.summary())
        .unwrap_or_else(|| "none yet".to_string());

    format!(
        "📊 Feed status\n\n\
        Hashtag: #{}\n\
        Chat ID: {}\n\
        Posting: {}\n\
        Last cycle: {}",
        settings.topic_tag, settings.destination, posting, last_cycle
    )
}

/// Build the reply to a command from `user_id`.
///
/// Privileged commands are checked against the control channel first; a
/// refused command changes nothing.
pub async fn reply_for(state: &BotState, user_id: Option<u64>, cmd: Command) -> String {
    if cmd.is_privileged() {
        let allowed = match user_id {
            Some(id) => state.gate().is_admin(id).await,
            None => false,
        };
        if !allowed {
            info!(user_id = ?user_id, command = ?cmd, "privileged command refused");
            return NOT_AUTHORIZED.to_string();
        }
    }

    match cmd {
        Command::Start => "🤖 Bot is live! Use /settag or /setchat to configure, then /startfeed.".to_string(),
        Command::Help => Command::descriptions().to_string(),
        Command::SetTag(arg) => set_tag_reply(state, &arg).await,
        Command::SetChat(arg) => set_chat_reply(state, &arg).await,
        Command::StartFeed => start_feed_reply(state).await,
        Command::StopFeed => stop_feed_reply(state).await,
        Command::Status => status_reply(state).await,
    }
}

/// Dispatch commands and send the reply to the originating chat.
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: Arc<BotState>,
) -> ResponseResult<()> {
    let user_id = msg.from.as_ref().map(|u| u.id.0);
    let reply = reply_for(&state, user_id, cmd).await;
    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}
