//! Message-passing delivery of change events.

use monitor_core::models::ChangeEvent;
use monitor_core::notifications::Listener;
use tokio::sync::mpsc;

/// Forwards every change event into an unbounded channel.
///
/// Lets an async consumer handle notifications off the polling thread. A
/// closed receiver makes delivery fail, which the bus logs and counts.
pub struct ChannelListener {
    tx: mpsc::UnboundedSender<ChangeEvent>,
}

impl ChannelListener {
    /// Create a listener and the receiver its events arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ChangeEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Listener for ChannelListener {
    fn name(&self) -> &str {
        "channel"
    }

    fn on_event(&self, event: &ChangeEvent) -> anyhow::Result<()> {
        self.tx
            .send(event.clone())
            .map_err(|_| anyhow::anyhow!("change event receiver dropped"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monitor_core::strategy::ComparisonStrategy;

    fn event() -> ChangeEvent {
        ChangeEvent::detected("https://www.blog.com", "alice", ComparisonStrategy::TextOnlyMatch)
    }

    #[test]
    fn test_forwards_events_in_order() {
        let (listener, mut rx) = ChannelListener::new();
        listener.on_event(&event()).unwrap();
        let mut second = event();
        second.url = "https://www.news.com".to_string();
        listener.on_event(&second).unwrap();

        assert_eq!(rx.try_recv().unwrap().url, "https://www.blog.com");
        assert_eq!(rx.try_recv().unwrap().url, "https://www.news.com");
    }

    #[test]
    fn test_dropped_receiver_is_an_error() {
        let (listener, rx) = ChannelListener::new();
        drop(rx);
        assert!(listener.on_event(&event()).is_err());
    }
}
