//! Tokio broadcast event bus for debug diagnostics.

use crate::current_timestamp;
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Default number of buffered diagnostic events per subscriber.
pub const DEFAULT_EVENT_BUS_CAPACITY: usize = 1024;

/// Metadata shared by every diagnostic event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventMeta {
    /// Unique identifier for this event.
    pub event_id: String,
    /// Emitting component.
    pub source: &'static str,
    /// Timestamp (Unix epoch seconds).
    pub timestamp: u64,
}

impl EventMeta {
    /// Creates new event metadata using the current timestamp.
    #[must_use]
    pub fn new(source: &'static str) -> Self {
        Self::with_timestamp(source, current_timestamp())
    }

    /// Creates new event metadata with a specified timestamp.
    #[must_use]
    pub fn with_timestamp(source: &'static str, timestamp: u64) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            source,
            timestamp,
        }
    }
}

/// A human-readable diagnostic line emitted while debug mode is on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticEvent {
    /// Event metadata.
    pub meta: EventMeta,
    /// Diagnostic message.
    pub message: String,
}

impl DiagnosticEvent {
    /// Creates a diagnostic event stamped now.
    #[must_use]
    pub fn new(source: &'static str, message: impl Into<String>) -> Self {
        Self {
            meta: EventMeta::new(source),
            message: message.into(),
        }
    }
}

/// Broadcast channel for diagnostic events.
///
/// Publishing never blocks and never fails the caller; events sent with no
/// subscribers are dropped.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DiagnosticEvent>,
}

impl EventBus {
    /// Creates a new event bus with the given buffer capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event to all subscribers (best effort).
    pub fn publish(&self, event: DiagnosticEvent) {
        metrics::counter!("feedfilter_diagnostics_published_total").increment(1);
        if self.sender.send(event).is_err() {
            metrics::counter!("feedfilter_diagnostics_dropped_total").increment(1);
        }
    }

    /// Subscribes to the event bus.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DiagnosticEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of live subscribers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUS_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(DiagnosticEvent::new("test", "hello"));

        let event = rx.recv().await.expect("receive event");
        assert_eq!(event.message, "hello");
        assert_eq!(event.meta.source, "test");
        assert!(!event.meta.event_id.is_empty());
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let bus = EventBus::default();
        assert_eq!(bus.receiver_count(), 0);
        bus.publish(DiagnosticEvent::new("test", "nobody listening"));
    }

    #[test]
    fn test_event_ids_are_unique() {
        let a = EventMeta::with_timestamp("test", 1);
        let b = EventMeta::with_timestamp("test", 1);
        assert_ne!(a.event_id, b.event_id);
    }
}
