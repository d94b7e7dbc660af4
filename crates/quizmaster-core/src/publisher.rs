//! Outbound event delivery abstraction.
//!
//! The engine hands every event to an [`EventPublisher`] and moves on. How
//! events reach hosts and participants (broadcast channel, websocket, log)
//! is the publisher's concern.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Transport-neutral representation of a published domain event.
#[derive(Debug, Clone, Serialize)]
pub struct EventEnvelope {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Aggregate this event belongs to.
    pub aggregate_id: Uuid,
    /// Event type name for subscriber routing.
    pub event_type: String,
    /// Serialized event payload.
    pub payload: serde_json::Value,
    /// Sequence number within the aggregate stream.
    pub sequence_number: i64,
    /// Correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Causation ID linking to the causing event/command.
    pub causation_id: Uuid,
    /// Timestamp of event creation.
    pub occurred_at: DateTime<Utc>,
}

/// Fire-and-forget event sink.
///
/// Implementations must not block: `publish` is called while the per-quiz
/// session lock is held.
pub trait EventPublisher: Send + Sync {
    /// Hands an event to subscribers without waiting for delivery.
    fn publish(&self, event: EventEnvelope);
}

/// Publisher that drops every event. Useful when nobody listens.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPublisher;

impl EventPublisher for NoopPublisher {
    fn publish(&self, _event: EventEnvelope) {}
}
