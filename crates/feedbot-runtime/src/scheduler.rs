//! Poll scheduler: owns the background task that runs cycles on an interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::cycle::FeedCycle;
use crate::error::{Result, RuntimeError};
use crate::report::CycleReport;

/// Result of [`PollScheduler::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new poll task was spawned.
    Started,
    /// A poll task is already active; nothing changed.
    AlreadyRunning,
}

/// The currently active poll task.
struct ActiveRun {
    /// Flipped to `false` to ask this run to stop.
    active_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Starts and stops the recurring poll cycle.
///
/// The scheduler is either idle or has exactly one active task. Stopping is
/// cooperative: the task checks its signal before each cycle and while it
/// sleeps between cycles, so a cycle already in progress always finishes.
pub struct PollScheduler {
    cycle: Arc<FeedCycle>,
    run: Mutex<Option<ActiveRun>>,
}

impl PollScheduler {
    pub fn new(cycle: Arc<FeedCycle>) -> Self {
        Self {
            cycle,
            run: Mutex::new(None),
        }
    }

    /// The cycle this scheduler drives.
    pub fn cycle(&self) -> &Arc<FeedCycle> {
        &self.cycle
    }

    /// Interval between cycles.
    pub fn interval(&self) -> Duration {
        self.cycle.config().interval
    }

    /// Summary of the last completed cycle.
    pub fn last_report(&self) -> Option<CycleReport> {
        self.cycle.last_report()
    }

    /// Whether a poll task is active.
    pub async fn is_active(&self) -> bool {
        let run = self.run.lock().await;
        run.as_ref().is_some_and(|r| !r.handle.is_finished())
    }

    /// Start polling. The first cycle runs immediately.
    pub async fn start(&self) -> StartOutcome {
        let mut run = self.run.lock().await;

        if let Some(current) = run.as_ref() {
            if !current.handle.is_finished() {
                debug!("poll loop already running");
                return StartOutcome::AlreadyRunning;
            }
            warn!("previous poll task ended unexpectedly, starting a new one");
        }

        let (active_tx, active_rx) = watch::channel(true);
        let cycle = Arc::clone(&self.cycle);
        let interval = self.interval();

        let handle = tokio::spawn(async move {
            run_loop(cycle, interval, active_rx).await;
        });

        *run = Some(ActiveRun { active_tx, handle });
        info!(interval_secs = interval.as_secs(), "poll loop started");
        StartOutcome::Started
    }

    /// Ask the active task to stop.
    ///
    /// Returns the task's handle so the caller may wait for it, or `None` if
    /// nothing was running. Dropping the handle lets the task wind down on
    /// its own.
    pub async fn stop(&self) -> Option<JoinHandle<()>> {
        let current = self.run.lock().await.take()?;
        current.active_tx.send_replace(false);
        info!("poll loop stop requested");
        Some(current.handle)
    }

    /// Stop polling and wait for the task to exit.
    pub async fn shutdown(&self) -> Result<()> {
        if let Some(handle) = self.stop().await {
            handle
                .await
                .map_err(|e| RuntimeError::Shutdown(format!("poll task failed: {}", e)))?;
            debug!("poll task exited");
        }
        Ok(())
    }
}

/// Body of the poll task.
async fn run_loop(cycle: Arc<FeedCycle>, interval: Duration, mut active: watch::Receiver<bool>) {
    loop {
        if !*active.borrow() {
            break;
        }

        if let Err(e) = cycle.run().await {
            error!(error = %e, "poll cycle aborted");
            cycle
                .report_to_operator(&format!("❌ Feed cycle failed: {}", e))
                .await;
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            changed = active.changed() => {
                // Sender gone means the scheduler itself was dropped
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    debug!("poll loop exited");
}
