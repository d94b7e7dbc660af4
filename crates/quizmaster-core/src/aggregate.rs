//! Aggregate root abstraction.

use uuid::Uuid;

use crate::event::DomainEvent;

/// Trait for aggregate roots that raise events while handling commands.
///
/// State changes are applied directly by the command methods; the raised
/// events are buffered until the owner drains and publishes them.
pub trait AggregateRoot: Send + Sync {
    /// The event type this aggregate raises.
    type Event: DomainEvent;

    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> Uuid;

    /// Returns the current version (number of events raised so far).
    fn version(&self) -> i64;

    /// Returns events raised since the last drain.
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Removes and returns the buffered events in the order they were raised.
    fn take_uncommitted_events(&mut self) -> Vec<Self::Event>;
}
