//! Change-notification fan-out.
//!
//! [`NotificationBus`] keeps an ordered registry of [`Listener`]s and delivers
//! every [`ChangeEvent`] to each of them synchronously, in registration order.
//! A listener that fails (by returning `Err` or by panicking) is logged and
//! skipped; the remaining listeners still receive the event.

use std::panic::{self, AssertUnwindSafe};

use crate::models::ChangeEvent;

// ── Listener ──────────────────────────────────────────────────────────────────

/// A sink for change notifications.
pub trait Listener: Send {
    /// Short label used in log records.
    fn name(&self) -> &str;

    /// Handle one change event.
    fn on_event(&self, event: &ChangeEvent) -> anyhow::Result<()>;
}

/// Handle returned by [`NotificationBus::register`]. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Outcome of a single [`NotificationBus::notify_all`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Listeners that handled the event successfully.
    pub delivered: usize,
    /// Listeners that returned an error or panicked.
    pub failed: usize,
}

// ── NotificationBus ───────────────────────────────────────────────────────────

/// Ordered registry of listeners.
///
/// # Example
///
/// ```
/// use monitor_core::notifications::{ConsoleListener, NotificationBus};
///
/// let mut bus = NotificationBus::new();
/// let id = bus.register(Box::new(ConsoleListener));
/// assert!(bus.unregister(id));
/// assert!(bus.is_empty());
/// ```
#[derive(Default)]
pub struct NotificationBus {
    listeners: Vec<(ListenerId, Box<dyn Listener>)>,
    next_id: u64,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `listener` to the delivery order.
    pub fn register(&mut self, listener: Box<dyn Listener>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        tracing::debug!(listener = listener.name(), id = id.0, "listener registered");
        self.listeners.push((id, listener));
        id
    }

    /// Remove the listener registered under `id`.
    ///
    /// Returns `false` when no such listener is registered. The relative order
    /// of the remaining listeners is preserved.
    pub fn unregister(&mut self, id: ListenerId) -> bool {
        match self.listeners.iter().position(|(lid, _)| *lid == id) {
            Some(idx) => {
                let (_, listener) = self.listeners.remove(idx);
                tracing::debug!(listener = listener.name(), id = id.0, "listener unregistered");
                true
            }
            None => false,
        }
    }

    /// Deliver `event` to every registered listener in registration order.
    pub fn notify_all(&self, event: &ChangeEvent) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        for (id, listener) in &self.listeners {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| listener.on_event(event)));
            match outcome {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(e)) => {
                    tracing::warn!(
                        listener = listener.name(),
                        id = id.0,
                        url = %event.url,
                        error = %e,
                        "listener failed to handle change event"
                    );
                    report.failed += 1;
                }
                Err(_) => {
                    tracing::warn!(
                        listener = listener.name(),
                        id = id.0,
                        url = %event.url,
                        "listener panicked while handling change event"
                    );
                    report.failed += 1;
                }
            }
        }

        report
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

// ── Built-in listeners ────────────────────────────────────────────────────────

/// Prints each notification to stdout.
pub struct ConsoleListener;

impl Listener for ConsoleListener {
    fn name(&self) -> &str {
        "console"
    }

    fn on_event(&self, event: &ChangeEvent) -> anyhow::Result<()> {
        println!("Notification to {}: {}", event.username, event.message);
        Ok(())
    }
}

/// Emits each notification as a structured `tracing` record.
pub struct TracingListener;

impl Listener for TracingListener {
    fn name(&self) -> &str {
        "tracing"
    }

    fn on_event(&self, event: &ChangeEvent) -> anyhow::Result<()> {
        tracing::info!(
            url = %event.url,
            username = %event.username,
            strategy = %event.strategy,
            detected_at = %event.detected_at,
            "{}",
            event.message
        );
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::ComparisonStrategy;
    use std::sync::{Arc, Mutex};

    // ── helpers ───────────────────────────────────────────────────────────────

    type Log = Arc<Mutex<Vec<String>>>;

    /// Records `"<label>:<url>"` for every event it sees.
    struct Recorder {
        label: &'static str,
        log: Log,
    }

    impl Listener for Recorder {
        fn name(&self) -> &str {
            self.label
        }

        fn on_event(&self, event: &ChangeEvent) -> anyhow::Result<()> {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.label, event.url));
            Ok(())
        }
    }

    struct Failing;

    impl Listener for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn on_event(&self, _event: &ChangeEvent) -> anyhow::Result<()> {
            anyhow::bail!("smtp unreachable")
        }
    }

    struct Panicking;

    impl Listener for Panicking {
        fn name(&self) -> &str {
            "panicking"
        }

        fn on_event(&self, _event: &ChangeEvent) -> anyhow::Result<()> {
            panic!("listener bug")
        }
    }

    fn recorder(label: &'static str, log: &Log) -> Box<dyn Listener> {
        Box::new(Recorder {
            label,
            log: Arc::clone(log),
        })
    }

    fn event(url: &str) -> ChangeEvent {
        ChangeEvent::detected(url, "alice", ComparisonStrategy::ExactMatch)
    }

    // ── register / notify_all ─────────────────────────────────────────────────

    #[test]
    fn test_notify_all_in_registration_order() {
        let log = Log::default();
        let mut bus = NotificationBus::new();
        bus.register(recorder("first", &log));
        bus.register(recorder("second", &log));
        bus.register(recorder("third", &log));

        let report = bus.notify_all(&event("https://a.example"));

        assert_eq!(report, DeliveryReport { delivered: 3, failed: 0 });
        assert_eq!(
            *log.lock().unwrap(),
            [
                "first:https://a.example",
                "second:https://a.example",
                "third:https://a.example"
            ]
        );
    }

    #[test]
    fn test_notify_all_without_listeners() {
        let bus = NotificationBus::new();
        assert_eq!(bus.notify_all(&event("https://a.example")), DeliveryReport::default());
    }

    #[test]
    fn test_failing_listener_does_not_stop_delivery() {
        let log = Log::default();
        let mut bus = NotificationBus::new();
        bus.register(Box::new(Failing));
        bus.register(recorder("after", &log));

        let report = bus.notify_all(&event("https://a.example"));

        assert_eq!(report, DeliveryReport { delivered: 1, failed: 1 });
        assert_eq!(*log.lock().unwrap(), ["after:https://a.example"]);
    }

    #[test]
    fn test_panicking_listener_does_not_stop_delivery() {
        let log = Log::default();
        let mut bus = NotificationBus::new();
        bus.register(recorder("before", &log));
        bus.register(Box::new(Panicking));
        bus.register(recorder("after", &log));

        let report = bus.notify_all(&event("https://a.example"));

        assert_eq!(report, DeliveryReport { delivered: 2, failed: 1 });
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    // ── unregister ────────────────────────────────────────────────────────────

    #[test]
    fn test_unregistered_listener_receives_nothing() {
        let log = Log::default();
        let mut bus = NotificationBus::new();
        let gone = bus.register(recorder("gone", &log));
        bus.register(recorder("kept", &log));

        assert!(bus.unregister(gone));
        bus.notify_all(&event("https://a.example"));

        assert_eq!(*log.lock().unwrap(), ["kept:https://a.example"]);
    }

    #[test]
    fn test_unregister_preserves_order_of_remaining() {
        let log = Log::default();
        let mut bus = NotificationBus::new();
        bus.register(recorder("a", &log));
        let middle = bus.register(recorder("b", &log));
        bus.register(recorder("c", &log));

        bus.unregister(middle);
        bus.notify_all(&event("u"));

        assert_eq!(*log.lock().unwrap(), ["a:u", "c:u"]);
    }

    #[test]
    fn test_unregister_unknown_id_returns_false() {
        let mut bus = NotificationBus::new();
        let id = bus.register(Box::new(TracingListener));
        assert!(bus.unregister(id));
        assert!(!bus.unregister(id));
    }

    #[test]
    fn test_listener_ids_are_not_reused() {
        let mut bus = NotificationBus::new();
        let first = bus.register(Box::new(TracingListener));
        bus.unregister(first);
        let second = bus.register(Box::new(TracingListener));
        assert_ne!(first, second);
    }

    #[test]
    fn test_late_listener_misses_earlier_events() {
        let log = Log::default();
        let mut bus = NotificationBus::new();
        bus.register(recorder("early", &log));
        bus.notify_all(&event("one"));
        bus.register(recorder("late", &log));
        bus.notify_all(&event("two"));

        assert_eq!(*log.lock().unwrap(), ["early:one", "early:two", "late:two"]);
    }

    // ── built-ins ─────────────────────────────────────────────────────────────

    #[test]
    fn test_builtin_listeners_succeed() {
        let e = event("https://a.example");
        assert!(ConsoleListener.on_event(&e).is_ok());
        assert!(TracingListener.on_event(&e).is_ok());
        assert_eq!(ConsoleListener.name(), "console");
        assert_eq!(TracingListener.name(), "tracing");
    }
}
