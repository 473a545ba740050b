//! Tracking queries — read-only views over parcels and their ledgers.

use parcelflow_core::error::DomainError;
use parcelflow_core::model::{Parcel, TrackingEvent};
use parcelflow_core::store::{ParcelStore, TrackingLedger};
use uuid::Uuid;

/// A parcel together with its tracking history, newest first.
#[derive(Debug)]
pub struct TrackingView {
    /// The parcel.
    pub parcel: Parcel,
    /// Ledger entries in descending timestamp order.
    pub events: Vec<TrackingEvent>,
}

/// Loads a parcel by identifier.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the parcel does not exist.
pub async fn get_parcel(
    parcel_id: Uuid,
    parcels: &dyn ParcelStore,
) -> Result<Parcel, DomainError> {
    parcels
        .find_by_id(parcel_id)
        .await?
        .ok_or(DomainError::NotFound(parcel_id))
}

/// Loads a parcel and its full tracking history for display.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the parcel does not exist.
pub async fn tracking_history(
    parcel_id: Uuid,
    parcels: &dyn ParcelStore,
    ledger: &dyn TrackingLedger,
) -> Result<TrackingView, DomainError> {
    let parcel = get_parcel(parcel_id, parcels).await?;
    let events = ledger.history(parcel_id).await?;
    Ok(TrackingView { parcel, events })
}
