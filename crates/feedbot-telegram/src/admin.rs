//! Authorization against the control channel's roster.

use std::sync::Arc;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatMemberKind, UserId};
use thiserror::Error;
use tracing::{debug, warn};

/// A user's standing in the control channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRole {
    Creator,
    Administrator,
    /// Any other status, including left or banned.
    Member,
}

impl MemberRole {
    /// Whether this role may run privileged commands.
    pub fn is_privileged(self) -> bool {
        matches!(self, MemberRole::Creator | MemberRole::Administrator)
    }
}

impl From<&ChatMemberKind> for MemberRole {
    fn from(kind: &ChatMemberKind) -> Self {
        if kind.is_owner() {
            MemberRole::Creator
        } else if kind.is_administrator() {
            MemberRole::Administrator
        } else {
            MemberRole::Member
        }
    }
}

/// A failed roster lookup.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("roster lookup failed: {0}")]
    Transport(String),
}

/// Looks up a user's role in a chat.
#[async_trait]
pub trait RosterLookup: Send + Sync {
    async fn member_role(&self, chat_id: i64, user_id: u64) -> Result<MemberRole, LookupError>;
}

/// Roster lookup through the Bot API's `getChatMember`.
pub struct TelegramRoster {
    bot: Bot,
}

impl TelegramRoster {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl RosterLookup for TelegramRoster {
    async fn member_role(&self, chat_id: i64, user_id: u64) -> Result<MemberRole, LookupError> {
        let member = self
            .bot
            .get_chat_member(ChatId(chat_id), UserId(user_id))
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;
        Ok(MemberRole::from(&member.kind))
    }
}

/// Decides whether a user may run privileged commands.
///
/// Every call asks the roster again; roles can change at any time. Any
/// lookup failure denies access.
pub struct AdminGate {
    roster: Arc<dyn RosterLookup>,
    control_chat: i64,
}

impl AdminGate {
    pub fn new(roster: Arc<dyn RosterLookup>, control_chat: i64) -> Self {
        Self {
            roster,
            control_chat,
        }
    }

    pub fn control_chat(&self) -> i64 {
        self.control_chat
    }

    /// True only if the user is the control channel's creator or an administrator.
    pub async fn is_admin(&self, user_id: u64) -> bool {
        match self.roster.member_role(self.control_chat, user_id).await {
            Ok(role) => {
                debug!(user_id, ?role, "checked control channel role");
                role.is_privileged()
            }
            Err(e) => {
                warn!(user_id, control_chat = self.control_chat, error = %e, "admin check failed");
                false
            }
        }
    }
}
