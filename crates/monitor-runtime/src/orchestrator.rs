//! Async polling driver.
//!
//! Runs [`SiteMonitor::run_round`] in a tokio task, one round at a time,
//! pausing a fixed interval between rounds and sending a [`RoundReport`]
//! through an `mpsc` channel after each one. Rounds execute on the blocking
//! pool because fetching is synchronous; the monitor is moved into the
//! blocking task and handed back when the round ends, so no two rounds ever
//! touch the content store at once.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::time;

use crate::monitor::{RoundSummary, SiteMonitor};

// ── Public types ──────────────────────────────────────────────────────────────

/// Result of one completed polling round.
#[derive(Debug, Clone)]
pub struct RoundReport {
    /// 1-based round number.
    pub round: u32,
    pub summary: RoundSummary,
    pub finished_at: DateTime<Utc>,
}

// ── MonitoringOrchestrator ────────────────────────────────────────────────────

/// Background polling coordinator.
///
/// Call [`MonitoringOrchestrator::start`] to spin up the polling loop in a
/// dedicated tokio task and receive a channel endpoint for [`RoundReport`]s.
pub struct MonitoringOrchestrator {
    monitor: SiteMonitor,
    /// Pause between the end of one round and the start of the next.
    interval: Duration,
    /// Rounds to run before stopping; `0` runs until aborted.
    rounds: u32,
}

impl MonitoringOrchestrator {
    pub fn new(monitor: SiteMonitor, interval: Duration, rounds: u32) -> Self {
        Self {
            monitor,
            interval,
            rounds,
        }
    }

    /// Start the polling loop.
    ///
    /// Returns the report receiver and a [`MonitoringHandle`] for the task.
    /// The channel closes once the configured number of rounds has run.
    pub fn start(self) -> (mpsc::Receiver<RoundReport>, MonitoringHandle) {
        let (tx, rx) = mpsc::channel(16);

        let handle = tokio::spawn(async move {
            self.monitoring_loop(tx).await;
        });

        (rx, MonitoringHandle { handle })
    }

    // ── Private implementation ────────────────────────────────────────────

    /// Poll, report, sleep; repeat until the round budget is spent or the
    /// receiver goes away.
    async fn monitoring_loop(self, tx: mpsc::Sender<RoundReport>) {
        let MonitoringOrchestrator {
            mut monitor,
            interval,
            rounds,
        } = self;
        let mut round: u32 = 0;

        loop {
            round += 1;
            tracing::info!(round, "starting polling round");

            let joined = tokio::task::spawn_blocking(move || {
                let summary = monitor.run_round();
                (monitor, summary)
            })
            .await;

            let summary = match joined {
                Ok((returned, summary)) => {
                    monitor = returned;
                    summary
                }
                Err(e) => {
                    tracing::error!(round, error = %e, "polling round aborted");
                    break;
                }
            };

            tracing::debug!(round, ?summary, "polling round finished");

            let report = RoundReport {
                round,
                summary,
                finished_at: Utc::now(),
            };
            if let Err(e) = tx.send(report).await {
                tracing::warn!(error = %e, "failed to send round report; receiver dropped");
                break;
            }

            if rounds != 0 && round >= rounds {
                tracing::info!(rounds, "all polling rounds complete");
                break;
            }

            time::sleep(interval).await;

            if tx.is_closed() {
                tracing::debug!("report channel closed; exiting loop");
                break;
            }
        }
    }
}

// ── MonitoringHandle ──────────────────────────────────────────────────────────

/// A handle to the background polling task.
pub struct MonitoringHandle {
    handle: tokio::task::JoinHandle<()>,
}

impl MonitoringHandle {
    /// Immediately abort the polling loop.
    ///
    /// A round already running on the blocking pool finishes in the
    /// background, but its report is never sent.
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// `true` once the loop has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
