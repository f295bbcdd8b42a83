//! Outgoing message transport.

use async_trait::async_trait;
use thiserror::Error;

/// How the transport should interpret message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    /// Telegram-flavoured HTML.
    Html,
    /// Sent verbatim.
    Plain,
}

/// A failed delivery.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to send to {destination}: {reason}")]
    Transport { destination: String, reason: String },
}

/// Sends text messages to chat destinations.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `text` to `destination` (a numeric chat id or `@channel`).
    async fn send(&self, destination: &str, text: &str, mode: TextMode)
        -> Result<(), NotifyError>;
}
