//! Shared application state.

use std::sync::Arc;

use parcelflow_core::clock::Clock;
use parcelflow_core::events::CorrelationIds;
use parcelflow_core::ids::IdGenerator;
use parcelflow_core::publisher::EventPublisher;
use parcelflow_core::store::{ParcelStore, PartyStore, TrackingLedger};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Durable parcel record.
    pub parcels: Arc<dyn ParcelStore>,
    /// Durable party record.
    pub parties: Arc<dyn PartyStore>,
    /// Append-only tracking ledger.
    pub ledger: Arc<dyn TrackingLedger>,
    /// Outbound event fan-out.
    pub publisher: Arc<dyn EventPublisher>,
    /// Identifier source.
    pub ids: Arc<dyn IdGenerator>,
    /// Time source.
    pub clock: Arc<dyn Clock>,
    /// Correlation id sequence.
    pub correlations: Arc<CorrelationIds>,
}
