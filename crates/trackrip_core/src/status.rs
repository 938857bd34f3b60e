//! Shared status sink for human-readable progress text.
//!
//! The sink is a broadcast channel: any number of observers (GUI log view,
//! stdout, tests) can subscribe, and publishing never blocks the job that
//! emits. Under the single-job-at-a-time contract only the active job and
//! the orchestrator write to it.

use tokio::sync::broadcast;

/// Default capacity per subscriber before old messages are dropped.
const DEFAULT_CAPACITY: usize = 64;

/// Fire-and-forget broadcast channel for status messages.
///
/// Cloning a sink yields another handle to the same channel.
#[derive(Debug, Clone)]
pub struct StatusSink {
    tx: broadcast::Sender<String>,
}

impl StatusSink {
    /// Create a sink with the default per-subscriber capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a sink with an explicit per-subscriber capacity.
    ///
    /// A slow subscriber that falls more than `capacity` messages behind
    /// loses the oldest messages; the publishing job is never blocked.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish a message to all current subscribers.
    ///
    /// Fire-and-forget: a sink with no subscribers swallows the message.
    pub fn publish(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("status: {}", message);
        let _ = self.tx.send(message);
    }

    /// Subscribe to messages published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }
}

impl Default for StatusSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_without_subscribers_is_silent() {
        let sink = StatusSink::new();
        sink.publish("nobody is listening");
    }

    #[tokio::test]
    async fn subscribers_receive_in_order() {
        let sink = StatusSink::new();
        let mut rx = sink.subscribe();

        sink.publish("first");
        sink.publish("second");

        assert_eq!(rx.recv().await.unwrap(), "first");
        assert_eq!(rx.recv().await.unwrap(), "second");
    }

    #[tokio::test]
    async fn clones_share_the_channel() {
        let sink = StatusSink::new();
        let mut rx = sink.subscribe();

        sink.clone().publish("via clone");
        assert_eq!(rx.recv().await.unwrap(), "via clone");
    }
}
