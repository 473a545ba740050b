//! Shared test mocks and utilities for the Parcelflow backend.

mod clock;
mod ids;
mod publisher;
mod store;

pub use clock::FixedClock;
pub use ids::SequenceIds;
pub use publisher::{FailingPublisher, RecordingPublisher};
pub use store::{FailingParcelStore, InMemoryStore};
