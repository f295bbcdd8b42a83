//! Feed relay bot binary.
//!
//! Start the bot with:
//! ```bash
//! TELEGRAM_BOT_TOKEN=xxx ADMIN_CHANNEL=-100123 cargo run -p feedbot-telegram
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use feedbot_feed::DEFAULT_FEED_BASE_URL;
use feedbot_runtime::PollConfig;
use feedbot_telegram::config::{self, parse_hashtag_list, BotConfig};
use feedbot_telegram::{FeedBot, TelegramError};
use tracing_subscriber::EnvFilter;

/// Feed relay bot - posts new tag feed stories to a Telegram channel
#[derive(Parser, Debug)]
#[command(name = "feedbot-telegram")]
#[command(about = "Telegram bot that relays new tag feed stories to a channel")]
struct Args {
    /// Bot token from @BotFather
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Chat whose administrators may control the bot
    #[arg(long, env = "ADMIN_CHANNEL", allow_hyphen_values = true)]
    admin_channel: i64,

    /// Chat that receives startup notes and error reports
    #[arg(long, env = "LOGS_CHANNEL", allow_hyphen_values = true)]
    logs_channel: Option<String>,

    /// Directory for settings.json and posted_links.txt
    #[arg(long, env = "FEEDBOT_STATE_DIR")]
    state_dir: Option<PathBuf>,

    /// Seconds between poll cycles
    #[arg(long, env = "FEEDBOT_INTERVAL_SECS", default_value_t = 3600)]
    interval_secs: u64,

    /// Feed entries considered per cycle
    #[arg(long, env = "FEEDBOT_MAX_ITEMS", default_value_t = 5)]
    max_items: usize,

    /// Base URL the hashtag is appended to
    #[arg(long, env = "FEEDBOT_FEED_BASE_URL", default_value = DEFAULT_FEED_BASE_URL)]
    feed_base_url: String,

    /// Comma-separated hashtags appended to every post
    #[arg(long, env = "FEEDBOT_EXTRA_HASHTAGS", default_value = "infosec,cybersecurity")]
    extra_hashtags: String,

    /// Start posting immediately instead of waiting for /startfeed
    #[arg(long)]
    autostart: bool,

    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables before parsing, args read from env
    let env_path = config::env_file();
    if env_path.exists() {
        let _ = dotenvy::from_path(&env_path);
    }
    let _ = dotenvy::from_filename(".env.local").or_else(|_| dotenvy::dotenv());

    let args = Args::parse();

    // Initialize logging based on verbosity
    let filter = match args.verbose {
        0 => "feedbot_telegram=info,feedbot_runtime=info,teloxide=warn",
        1 => "feedbot_telegram=debug,feedbot_runtime=debug,feedbot_feed=debug,teloxide=info",
        2 => "feedbot_telegram=trace,feedbot_runtime=trace,feedbot_feed=trace,teloxide=debug",
        _ => "trace",
    };

    // RUST_LOG wins over the verbosity flag when set
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // Older deployments name the token variable in lowercase
    let token = args
        .token
        .clone()
        .or_else(|| std::env::var("bot_token").ok())
        .ok_or(TelegramError::NoToken)?;

    let mut poll = PollConfig::new()
        .with_interval(Duration::from_secs(args.interval_secs.max(1)))
        .with_max_items(args.max_items.max(1))
        .with_extra_hashtags(parse_hashtag_list(&args.extra_hashtags));
    if let Some(logs) = args.logs_channel.as_deref() {
        poll = poll.with_operator_log(logs);
    }

    let bot_config = BotConfig::new(
        args.admin_channel,
        args.state_dir.clone().unwrap_or_else(config::default_state_dir),
    )
    .with_feed_base_url(&args.feed_base_url)
    .with_poll(poll);

    if let Err(e) = bot_config.ensure_state_dir() {
        tracing::error!(error = %e, "Failed to create state directory");
        return Err(e.into());
    }

    let bot = FeedBot::new(token, &bot_config)?;

    match bot.get_me().await {
        Ok(username) => {
            tracing::info!(username = %username, "Bot initialized successfully");
            println!("\n[robot] Feed relay bot");
            println!("   Bot: @{}", username);
            println!("   Admin channel: {}", args.admin_channel);
            println!("   State: {}", bot_config.state_dir().display());
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to get bot info");
            return Err(e.into());
        }
    }

    bot.announce_startup().await;

    if args.autostart {
        tracing::info!("Autostart enabled, starting poll loop");
        bot.autostart().await;
    }

    println!("\n   Send /startfeed from an admin account to begin posting");
    println!("   Press Ctrl+C to stop\n");

    bot.start_polling().await?;

    Ok(())
}
