//! Broadcast-channel event publisher.

use quizmaster_core::publisher::{EventEnvelope, EventPublisher};
use tokio::sync::broadcast;
use tracing::debug;

/// Fans events out to every subscriber through a bounded broadcast channel.
///
/// Slow subscribers lag and lose the oldest events; publishing never waits.
#[derive(Debug, Clone)]
pub struct BroadcastPublisher {
    sender: broadcast::Sender<EventEnvelope>,
}

impl BroadcastPublisher {
    /// Creates a publisher whose channel buffers `capacity` events.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Opens a new subscription that sees events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }
}

impl EventPublisher for BroadcastPublisher {
    fn publish(&self, event: EventEnvelope) {
        let event_type = event.event_type.clone();
        if self.sender.send(event).is_err() {
            debug!(event_type = %event_type, "no subscribers, event dropped");
        }
    }
}
