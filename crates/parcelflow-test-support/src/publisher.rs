//! Test publishers — mock `EventPublisher` implementations.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use parcelflow_core::events::DomainEvent;
use parcelflow_core::publisher::{EventPublisher, PublishError};

/// An event publisher that records every publish and always succeeds.
#[derive(Debug, Clone, Default)]
pub struct RecordingPublisher {
    published: Arc<Mutex<Vec<(String, DomainEvent)>>>,
}

impl RecordingPublisher {
    /// Creates an empty recording publisher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all `(channel, event)` pairs published so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn published(&self) -> Vec<(String, DomainEvent)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, channel: &str, event: &DomainEvent) -> Result<(), PublishError> {
        self.published
            .lock()
            .unwrap()
            .push((channel.to_owned(), event.clone()));
        Ok(())
    }
}

/// An event publisher that always fails. Useful for testing the
/// degraded-but-completed path after a successful persist.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingPublisher;

#[async_trait]
impl EventPublisher for FailingPublisher {
    async fn publish(&self, channel: &str, _event: &DomainEvent) -> Result<(), PublishError> {
        Err(PublishError {
            channel: channel.to_owned(),
            reason: "broker unavailable".to_owned(),
        })
    }
}
