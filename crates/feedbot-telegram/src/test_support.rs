//! Mock collaborators for handler and gate tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use feedbot_feed::{FeedItem, FeedSource};
use feedbot_runtime::{Notifier, NotifyError, TextMode};
use tempfile::TempDir;

use crate::admin::{LookupError, MemberRole, RosterLookup};
use crate::config::BotConfig;
use crate::state::{create_shared_state, BotState};

pub(crate) const CONTROL_CHAT: i64 = -100123;
pub(crate) const ADMIN: u64 = 1;
pub(crate) const MEMBER: u64 = 2;

/// Roster with fixed roles; unknown users make the lookup fail.
#[derive(Default)]
pub(crate) struct MockRoster {
    roles: Mutex<HashMap<u64, MemberRole>>,
    chats: Mutex<Vec<i64>>,
    lookups: AtomicUsize,
}

impl MockRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_role(self, user_id: u64, role: MemberRole) -> Self {
        self.set_role(user_id, role);
        self
    }

    pub fn set_role(&self, user_id: u64, role: MemberRole) {
        self.roles.lock().unwrap().insert(user_id, role);
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn chats(&self) -> Vec<i64> {
        self.chats.lock().unwrap().clone()
    }
}

#[async_trait]
impl RosterLookup for MockRoster {
    async fn member_role(&self, chat_id: i64, user_id: u64) -> Result<MemberRole, LookupError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.chats.lock().unwrap().push(chat_id);
        self.roles
            .lock()
            .unwrap()
            .get(&user_id)
            .copied()
            .ok_or_else(|| LookupError::Transport("Bad Request: user not found".to_string()))
    }
}

/// Feed returning a fixed list.
pub(crate) struct MockSource {
    items: Vec<FeedItem>,
    calls: AtomicUsize,
}

impl MockSource {
    pub fn new(items: Vec<FeedItem>) -> Self {
        Self {
            items,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedSource for MockSource {
    async fn fetch(&self, _tag: &str, limit: usize) -> feedbot_feed::Result<Vec<FeedItem>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.items.iter().take(limit).cloned().collect())
    }
}

/// Notifier that records every message.
#[derive(Default)]
pub(crate) struct MockNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl MockNotifier {
    pub fn sent_to(&self, destination: &str) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(d, _)| d == destination)
            .map(|(_, text)| text.clone())
            .collect()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(
        &self,
        destination: &str,
        text: &str,
        _mode: TextMode,
    ) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .unwrap()
            .push((destination.to_string(), text.to_string()));
        Ok(())
    }
}

/// Bot state wired to mocks and a temporary state directory.
pub(crate) struct Harness {
    pub dir: TempDir,
    pub state: Arc<BotState>,
    pub source: Arc<MockSource>,
    pub notifier: Arc<MockNotifier>,
}

impl Harness {
    /// One admin and one plain member in the control chat.
    pub fn new() -> Self {
        let roster = MockRoster::new()
            .with_role(ADMIN, MemberRole::Administrator)
            .with_role(MEMBER, MemberRole::Member);
        Self::with_roster(roster)
    }

    pub fn with_roster(roster: MockRoster) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = BotConfig::new(CONTROL_CHAT, dir.path());
        let source = Arc::new(MockSource::new(vec![FeedItem::new("A", "https://a.example/1")]));
        let notifier = Arc::new(MockNotifier::default());
        let state = create_shared_state(
            &config,
            Arc::new(roster),
            source.clone(),
            notifier.clone(),
        );

        Self {
            dir,
            state,
            source,
            notifier,
        }
    }
}
