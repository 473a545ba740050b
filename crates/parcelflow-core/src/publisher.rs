//! Transport-agnostic event publishing.

use async_trait::async_trait;
use thiserror::Error;

use crate::events::DomainEvent;

/// Failure to hand an event to the underlying transport.
///
/// Reported back to the caller, never fatal; the caller decides whether a
/// failed publish blocks the originating operation.
#[derive(Debug, Error)]
#[error("publish to '{channel}' failed: {reason}")]
pub struct PublishError {
    /// The channel the publish was destined for.
    pub channel: String,
    /// Transport-specific failure description.
    pub reason: String,
}

/// Fan-out of domain events to named logical channels.
///
/// The underlying transport may be a local broker or a managed bus; domain
/// code never branches on which. The partition/ordering key is always the
/// parcel identifier carried in the event.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish `event` to `channel`, keyed by the event's parcel id.
    async fn publish(&self, channel: &str, event: &DomainEvent) -> Result<(), PublishError>;
}
