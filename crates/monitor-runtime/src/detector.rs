//! Per-subscription change detection.
//!
//! [`ChangeDetector::check`] runs one fetch → compare → store → notify cycle
//! for a single subscription:
//!
//! 1. Resolve the subscription's strategy key. Unknown keys abort the check.
//! 2. Fetch the resource. Failures are logged and the check is skipped.
//! 3. First sighting of a URL seeds the store and never notifies.
//! 4. An unchanged page leaves the store untouched.
//! 5. A changed page replaces the stored snapshot and notifies every listener
//!    exactly once.

use monitor_core::error::Result;
use monitor_core::models::{ChangeEvent, Snapshot, Subscription};
use monitor_core::notifications::{DeliveryReport, NotificationBus};
use monitor_core::store::ContentStore;
use monitor_core::strategy::ComparisonStrategy;
use monitor_data::fetcher::Fetcher;

/// What a single [`ChangeDetector::check`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// First successful fetch of the URL; stored without notifying.
    Seeded,
    /// The strategy judged the content unchanged.
    Unchanged,
    /// A change was stored and broadcast.
    Changed(DeliveryReport),
    /// The fetch failed; nothing was stored or broadcast.
    FetchFailed,
}

/// Fetches, compares and broadcasts changes.
pub struct ChangeDetector {
    store: ContentStore,
    bus: NotificationBus,
    fetcher: Box<dyn Fetcher>,
}

impl ChangeDetector {
    /// Create a detector with an empty store and no listeners.
    pub fn new(fetcher: Box<dyn Fetcher>) -> Self {
        Self::with_bus(fetcher, NotificationBus::new())
    }

    /// Create a detector that delivers through an existing `bus`.
    pub fn with_bus(fetcher: Box<dyn Fetcher>, bus: NotificationBus) -> Self {
        Self {
            store: ContentStore::new(),
            bus,
            fetcher,
        }
    }

    /// Check `subscription` on behalf of the user named `owner`.
    ///
    /// Returns `Err(MonitorError::UnknownStrategy)` when the subscription's
    /// strategy key is not registered; in that case nothing is fetched,
    /// stored or broadcast. Fetch failures are not errors: they yield
    /// [`CheckOutcome::FetchFailed`].
    pub fn check(&mut self, subscription: &Subscription, owner: &str) -> Result<CheckOutcome> {
        let url = subscription.url.as_str();
        let key = subscription.preferences.strategy.as_str();

        let strategy: ComparisonStrategy = match key.parse() {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(
                    subscription_id = %subscription.id,
                    url,
                    strategy = key,
                    "unknown comparison strategy; skipping check"
                );
                return Err(e);
            }
        };

        let current = match self.fetcher.fetch(url) {
            Ok(content) => Snapshot::new(content),
            Err(e) => {
                tracing::warn!(
                    subscription_id = %subscription.id,
                    fetcher = self.fetcher.name(),
                    error = %e,
                    "error checking url"
                );
                return Ok(CheckOutcome::FetchFailed);
            }
        };

        let Some(previous) = self.store.get(url) else {
            tracing::debug!(url, bytes = current.content.len(), "seeding content store");
            self.store.insert(url, current);
            return Ok(CheckOutcome::Seeded);
        };

        if strategy.is_unchanged(&previous.content, &current.content) {
            tracing::debug!(url, %strategy, "no change");
            return Ok(CheckOutcome::Unchanged);
        }

        self.store.insert(url, current);

        let event = ChangeEvent::detected(url, owner, strategy);
        tracing::info!(url, username = owner, %strategy, "change detected");
        let report = self.bus.notify_all(&event);

        Ok(CheckOutcome::Changed(report))
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    pub fn bus(&self) -> &NotificationBus {
        &self.bus
    }

    /// Mutable access for registering or removing listeners.
    pub fn bus_mut(&mut self) -> &mut NotificationBus {
        &mut self.bus
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
