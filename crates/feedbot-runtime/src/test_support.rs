//! Mock collaborators shared by the runtime tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use feedbot_feed::{FeedError, FeedItem, FeedSource};
use feedbot_persistence::{PostedLinkLog, SettingsStore};
use tempfile::TempDir;

use crate::config::PollConfig;
use crate::cycle::FeedCycle;
use crate::notifier::{NotifyError, Notifier, TextMode};

/// Feed that returns a fixed list, or fails.
pub(crate) struct MockSource {
    items: Mutex<Vec<FeedItem>>,
    fail: bool,
    calls: AtomicUsize,
    tags: Mutex<Vec<String>>,
}

impl MockSource {
    pub fn new(items: Vec<FeedItem>) -> Self {
        Self {
            items: Mutex::new(items),
            fail: false,
            calls: AtomicUsize::new(0),
            tags: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn tags(&self) -> Vec<String> {
        self.tags.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedSource for MockSource {
    async fn fetch(&self, tag: &str, limit: usize) -> feedbot_feed::Result<Vec<FeedItem>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tags.lock().unwrap().push(tag.to_string());
        if self.fail {
            return Err(FeedError::Status(503));
        }
        Ok(self.items.lock().unwrap().iter().take(limit).cloned().collect())
    }
}

/// Notifier that records messages and fails for chosen links or destinations.
#[derive(Default)]
pub(crate) struct MockNotifier {
    sent: Mutex<Vec<(String, String, TextMode)>>,
    failing_links: Mutex<HashSet<String>>,
    failing_destinations: Mutex<HashSet<String>>,
    delay: Mutex<Option<Duration>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_link(&self, link: &str) {
        self.failing_links.lock().unwrap().insert(link.to_string());
    }

    pub fn heal_link(&self, link: &str) {
        self.failing_links.lock().unwrap().remove(link);
    }

    pub fn fail_destination(&self, destination: &str) {
        self.failing_destinations
            .lock()
            .unwrap()
            .insert(destination.to_string());
    }

    /// Make every send take `delay` before completing.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn sent(&self) -> Vec<(String, String, TextMode)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, destination: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|(d, _, _)| d == destination)
            .map(|(_, text, _)| text)
            .collect()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(
        &self,
        destination: &str,
        text: &str,
        mode: TextMode,
    ) -> Result<(), NotifyError> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let link_fails = self
            .failing_links
            .lock()
            .unwrap()
            .iter()
            .any(|link| text.contains(link.as_str()));
        let dest_fails = self.failing_destinations.lock().unwrap().contains(destination);
        if link_fails || dest_fails {
            return Err(NotifyError::Transport {
                destination: destination.to_string(),
                reason: "chat not found".to_string(),
            });
        }
        self.sent
            .lock()
            .unwrap()
            .push((destination.to_string(), text.to_string(), mode));
        Ok(())
    }
}

/// A cycle wired to mocks and a temporary state directory.
pub(crate) struct Fixture {
    pub dir: TempDir,
    pub settings: Arc<SettingsStore>,
    pub posted: Arc<PostedLinkLog>,
    pub source: Arc<MockSource>,
    pub notifier: Arc<MockNotifier>,
}

impl Fixture {
    pub fn new(source: MockSource) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let settings = Arc::new(SettingsStore::new(dir.path().join("settings.json")));
        let posted = Arc::new(PostedLinkLog::new(dir.path().join("posted_links.txt")));
        Self {
            dir,
            settings,
            posted,
            source: Arc::new(source),
            notifier: Arc::new(MockNotifier::new()),
        }
    }

    pub fn cycle(&self, config: PollConfig) -> FeedCycle {
        FeedCycle::new(
            Arc::clone(&self.settings),
            Arc::clone(&self.posted),
            self.source.clone(),
            self.notifier.clone(),
            config,
        )
    }
}
