//! One fetch-filter-send-record pass.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, trace, warn};

use feedbot_feed::FeedSource;
use feedbot_persistence::{PostedLinkLog, SettingsStore};

use crate::config::PollConfig;
use crate::error::Result;
use crate::message::format_post;
use crate::notifier::{Notifier, TextMode};
use crate::report::CycleReport;

/// Runs poll cycles against the configured feed and destination.
pub struct FeedCycle {
    settings: Arc<SettingsStore>,
    posted: Arc<PostedLinkLog>,
    source: Arc<dyn FeedSource>,
    notifier: Arc<dyn Notifier>,
    config: PollConfig,
    last_report: Mutex<Option<CycleReport>>,
    /// Held for the whole of [`run`](Self::run); cycles never overlap.
    running: AsyncMutex<()>,
}

impl FeedCycle {
    pub fn new(
        settings: Arc<SettingsStore>,
        posted: Arc<PostedLinkLog>,
        source: Arc<dyn FeedSource>,
        notifier: Arc<dyn Notifier>,
        config: PollConfig,
    ) -> Self {
        Self {
            settings,
            posted,
            source,
            notifier,
            config,
            last_report: Mutex::new(None),
            running: AsyncMutex::new(()),
        }
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Summary of the most recent cycle that ran to completion.
    pub fn last_report(&self) -> Option<CycleReport> {
        self.last_report
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Run one cycle.
    ///
    /// Settings are read once and used for every item in the cycle. Each
    /// delivered link is recorded before the next item is attempted; a failed
    /// delivery is reported to the operator log and left unrecorded so the
    /// next cycle retries it. Fetch failures count as an empty feed.
    ///
    /// A cycle started while another is in progress waits for it and then
    /// reads the posted log afresh.
    ///
    /// # Errors
    /// Fails if the settings record is malformed or the posted-link log
    /// cannot be read or appended to. Nothing further is sent in that case.
    pub async fn run(&self) -> Result<CycleReport> {
        let _running = self.running.lock().await;
        let started_at = Utc::now();
        let settings = self.settings.load()?;
        let mut posted = self.posted.load_all()?;
        let mut report = CycleReport::new(started_at, &settings.topic_tag, &settings.destination);

        debug!(
            tag = %settings.topic_tag,
            destination = %settings.destination,
            known_links = posted.len(),
            "starting poll cycle"
        );

        let items = match self
            .source
            .fetch(&settings.topic_tag, self.config.max_items)
            .await
        {
            Ok(items) => items,
            Err(e) => {
                warn!(tag = %settings.topic_tag, error = %e, "feed fetch failed");
                self.report_to_operator(&format!(
                    "❌ Failed to fetch feed for #{}: {}",
                    settings.topic_tag, e
                ))
                .await;
                Vec::new()
            }
        };
        report.fetched = items.len();

        for mut item in items {
            let link = item.link.trim();
            if link.is_empty() {
                trace!(title = %item.title, "skipping entry without link");
                continue;
            }
            if link.len() != item.link.len() {
                item.link = link.to_string();
            }

            if posted.contains(&item.link) {
                trace!(link = %item.link, "already posted");
                report.skipped += 1;
                continue;
            }

            let text = format_post(&item, &settings.topic_tag, &self.config.extra_hashtags);
            match self
                .notifier
                .send(&settings.destination, &text, TextMode::Html)
                .await
            {
                Ok(()) => {
                    self.posted.append(&item.link)?;
                    posted.insert(item.link.clone());
                    report.sent += 1;
                    info!(
                        destination = %settings.destination,
                        link = %item.link,
                        "posted feed item"
                    );
                }
                Err(e) => {
                    report.failed += 1;
                    warn!(
                        destination = %settings.destination,
                        link = %item.link,
                        error = %e,
                        "failed to post feed item"
                    );
                    self.report_to_operator(&format!(
                        "❌ Error posting to {}: {}",
                        settings.destination, e
                    ))
                    .await;
                }
            }
        }

        info!(
            tag = %report.tag,
            fetched = report.fetched,
            sent = report.sent,
            skipped = report.skipped,
            failed = report.failed,
            "poll cycle finished"
        );

        *self
            .last_report
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(report.clone());
        Ok(report)
    }

    /// Send a plain-text note to the operator log, if one is configured.
    ///
    /// Delivery failures here are only logged.
    pub async fn report_to_operator(&self, text: &str) {
        let Some(destination) = self.config.operator_log.as_deref() else {
            debug!(text = %text, "no operator log configured");
            return;
        };

        if let Err(e) = self.notifier.send(destination, text, TextMode::Plain).await {
            warn!(error = %e, "failed to report to operator log");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuntimeError;
    use crate::test_support::{Fixture, MockSource};
    use feedbot_feed::FeedItem;
    use feedbot_persistence::Settings;
    use std::collections::HashSet;
    use std::fs;
    use std::time::Duration;

    const OPS: &str = "-100999";

    fn two_items() -> Vec<FeedItem> {
        vec![FeedItem::new("A", "u1"), FeedItem::new("B", "u2")]
    }

    fn links(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn config() -> PollConfig {
        PollConfig::new().with_operator_log(OPS)
    }

    #[tokio::test]
    async fn test_posts_all_new_items() {
        let fx = Fixture::new(MockSource::new(two_items()));
        let cycle = fx.cycle(config());

        let report = cycle.run().await.unwrap();

        assert_eq!(report.sent, 2);
        assert_eq!(fx.notifier.sent_to("@your_default_channel").len(), 2);
        assert_eq!(fx.posted.load_all().unwrap(), links(&["u1", "u2"]));
        assert!(fx.dir.path().join("posted_links.txt").exists());
    }

    #[tokio::test]
    async fn test_skips_already_posted() {
        let fx = Fixture::new(MockSource::new(two_items()));
        fx.posted.append("u1").unwrap();
        let cycle = fx.cycle(config());

        let report = cycle.run().await.unwrap();

        let sent = fx.notifier.sent_to("@your_default_channel");
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("u2"));
        assert_eq!(report.skipped, 1);
        assert_eq!(fx.posted.load_all().unwrap(), links(&["u1", "u2"]));
    }

    #[tokio::test]
    async fn test_second_cycle_sends_nothing() {
        let fx = Fixture::new(MockSource::new(two_items()));
        let cycle = fx.cycle(config());

        cycle.run().await.unwrap();
        let report = cycle.run().await.unwrap();

        assert_eq!(report.sent, 0);
        assert_eq!(report.skipped, 2);
        assert_eq!(fx.notifier.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_send_is_retried_next_cycle() {
        let fx = Fixture::new(MockSource::new(two_items()));
        fx.notifier.fail_link("u1");
        let cycle = fx.cycle(config());

        let report = cycle.run().await.unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(report.sent, 1);
        assert_eq!(fx.posted.load_all().unwrap(), links(&["u2"]));
        let ops = fx.notifier.sent_to(OPS);
        assert_eq!(ops.len(), 1);
        assert!(ops[0].starts_with("❌ Error posting to @your_default_channel"));

        fx.notifier.heal_link("u1");
        let report = cycle.run().await.unwrap();

        assert_eq!(report.sent, 1);
        assert_eq!(fx.posted.load_all().unwrap(), links(&["u1", "u2"]));
    }

    #[tokio::test]
    async fn test_operator_log_failure_is_not_fatal() {
        let fx = Fixture::new(MockSource::new(two_items()));
        fx.notifier.fail_link("u1");
        fx.notifier.fail_destination(OPS);
        let cycle = fx.cycle(config());

        let report = cycle.run().await.unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(report.sent, 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_counts_as_empty() {
        let fx = Fixture::new(MockSource::failing());
        let cycle = fx.cycle(config());

        let report = cycle.run().await.unwrap();

        assert_eq!(report.fetched, 0);
        assert!(fx.notifier.sent_to("@your_default_channel").is_empty());
        assert_eq!(fx.notifier.sent_to(OPS).len(), 1);
    }

    #[tokio::test]
    async fn test_uses_persisted_settings() {
        let fx = Fixture::new(MockSource::new(two_items()));
        fx.settings
            .save(&Settings {
                topic_tag: "rust".to_string(),
                destination: "@rustnews".to_string(),
            })
            .unwrap();
        let cycle = fx.cycle(config());

        cycle.run().await.unwrap();

        assert_eq!(fx.source.tags(), vec!["rust"]);
        let sent = fx.notifier.sent_to("@rustnews");
        assert_eq!(sent.len(), 2);
        assert!(sent[0].contains("#rust #infosec #cybersecurity"));
    }

    #[tokio::test]
    async fn test_duplicate_links_in_one_fetch_post_once() {
        let items = vec![FeedItem::new("A", "u1"), FeedItem::new("A again", "u1")];
        let fx = Fixture::new(MockSource::new(items));
        let cycle = fx.cycle(config());

        let report = cycle.run().await.unwrap();

        assert_eq!(report.sent, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(fs::read_to_string(fx.posted.path()).unwrap(), "u1\n");
    }

    #[tokio::test]
    async fn test_respects_max_items() {
        let items = (0..10)
            .map(|i| FeedItem::new(format!("T{i}"), format!("u{i}")))
            .collect();
        let fx = Fixture::new(MockSource::new(items));
        let cycle = fx.cycle(config().with_max_items(3));

        let report = cycle.run().await.unwrap();

        assert_eq!(report.fetched, 3);
        assert_eq!(fx.posted.load_all().unwrap(), links(&["u0", "u1", "u2"]));
    }

    #[tokio::test]
    async fn test_malformed_settings_abort_cycle() {
        let fx = Fixture::new(MockSource::new(two_items()));
        fs::write(fx.settings.path(), "{oops").unwrap();
        let cycle = fx.cycle(config());

        let result = cycle.run().await;

        assert!(matches!(result, Err(RuntimeError::Persistence(_))));
        assert_eq!(fx.source.calls(), 0);
        assert!(fx.notifier.sent().is_empty());
        assert!(cycle.last_report().is_none());
    }

    #[tokio::test]
    async fn test_last_report_is_kept() {
        let fx = Fixture::new(MockSource::new(two_items()));
        let cycle = fx.cycle(config());

        let report = cycle.run().await.unwrap();

        assert_eq!(cycle.last_report(), Some(report));
    }

    #[tokio::test]
    async fn test_no_operator_log_configured() {
        let fx = Fixture::new(MockSource::failing());
        let cycle = fx.cycle(PollConfig::new());

        cycle.run().await.unwrap();

        assert!(fx.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn test_padded_links_match_logged_links() {
        let items = vec![FeedItem::new("A", " u1 "), FeedItem::new("B", "u2\t")];
        let fx = Fixture::new(MockSource::new(items));
        fx.posted.append("u1").unwrap();
        let cycle = fx.cycle(config());

        let report = cycle.run().await.unwrap();

        assert_eq!(report.skipped, 1);
        assert_eq!(report.sent, 1);
        assert_eq!(fs::read_to_string(fx.posted.path()).unwrap(), "u1\nu2\n");
    }

    #[tokio::test]
    async fn test_overlapping_runs_send_each_link_once() {
        let fx = Fixture::new(MockSource::new(two_items()));
        fx.notifier.set_delay(Duration::from_millis(50));
        let cycle = fx.cycle(config());

        let (first, second) = tokio::join!(cycle.run(), cycle.run());

        assert_eq!(first.unwrap().sent + second.unwrap().sent, 2);
        assert_eq!(fx.notifier.sent_to("@your_default_channel").len(), 2);
        assert_eq!(fs::read_to_string(fx.posted.path()).unwrap(), "u1\nu2\n");
    }
}
