//! One polling round over every user's subscriptions.

use monitor_core::models::User;

use crate::detector::{ChangeDetector, CheckOutcome};

/// Tally of what happened during a single [`SiteMonitor::run_round`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundSummary {
    /// Subscriptions visited (every outcome below sums to this).
    pub checked: usize,
    pub seeded: usize,
    pub unchanged: usize,
    pub changed: usize,
    pub fetch_failed: usize,
    /// Subscriptions skipped because their strategy key is unknown.
    pub strategy_errors: usize,
    /// Listener deliveries that failed across all changes this round.
    pub failed_deliveries: usize,
}

/// The users being watched together with the detector that watches for them.
pub struct SiteMonitor {
    detector: ChangeDetector,
    users: Vec<User>,
}

impl SiteMonitor {
    pub fn new(detector: ChangeDetector, users: Vec<User>) -> Self {
        Self { detector, users }
    }

    /// Check every subscription once, user by user, in insertion order.
    ///
    /// Individual failures are logged by the detector and counted here; they
    /// never end the round early.
    pub fn run_round(&mut self) -> RoundSummary {
        let mut summary = RoundSummary::default();

        for user in &self.users {
            for subscription in user.subscriptions() {
                summary.checked += 1;
                match self.detector.check(subscription, &user.username) {
                    Ok(CheckOutcome::Seeded) => summary.seeded += 1,
                    Ok(CheckOutcome::Unchanged) => summary.unchanged += 1,
                    Ok(CheckOutcome::Changed(report)) => {
                        summary.changed += 1;
                        summary.failed_deliveries += report.failed;
                    }
                    Ok(CheckOutcome::FetchFailed) => summary.fetch_failed += 1,
                    Err(_) => summary.strategy_errors += 1,
                }
            }
        }

        summary
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn detector(&self) -> &ChangeDetector {
        &self.detector
    }

    pub fn detector_mut(&mut self) -> &mut ChangeDetector {
        &mut self.detector
    }

    /// Total subscriptions across all users.
    pub fn subscription_count(&self) -> usize {
        self.users.iter().map(|u| u.subscriptions().len()).sum()
    }
}
