//! Transition requests and their ledger descriptions.

use chrono::{DateTime, Utc};
use parcelflow_core::model::ParcelStatus;

/// A requested status transition, as mapped from a carrier message or a
/// customer action.
#[derive(Debug, Clone)]
pub struct TransitionRequest {
    /// The status the parcel should enter.
    pub new_status: ParcelStatus,
    /// Location reported with the transition.
    pub location: Option<String>,
    /// Free-form note; used as the ledger description when present.
    pub note: Option<String>,
    /// Carrier vehicle, when reported.
    pub vehicle_id: Option<String>,
    /// Carrier driver, when reported.
    pub driver_name: Option<String>,
    /// Carrier-supplied time of occurrence; the engine's clock when absent.
    pub event_timestamp: Option<DateTime<Utc>>,
}

impl TransitionRequest {
    /// A bare transition to `new_status` with no carrier metadata.
    #[must_use]
    pub const fn to_status(new_status: ParcelStatus) -> Self {
        Self {
            new_status,
            location: None,
            note: None,
            vehicle_id: None,
            driver_name: None,
            event_timestamp: None,
        }
    }

    /// The ledger description for this transition.
    #[must_use]
    pub fn description(&self) -> String {
        self.note
            .clone()
            .unwrap_or_else(|| default_description(self.new_status).to_owned())
    }
}

/// Default ledger description for a status.
#[must_use]
pub const fn default_description(status: ParcelStatus) -> &'static str {
    match status {
        ParcelStatus::Registered => "Parcel registered",
        ParcelStatus::PickedUp => "Parcel picked up by carrier",
        ParcelStatus::InTransit => "Parcel in transit",
        ParcelStatus::LoadedInTruck => "Parcel loaded in delivery truck",
        ParcelStatus::OutForDelivery => "Parcel out for delivery",
        ParcelStatus::Delivered => "Parcel delivered",
        ParcelStatus::FailedDelivery => "Delivery attempt failed",
        ParcelStatus::Returned => "Parcel returned to sender",
        ParcelStatus::Cancelled => "Parcel cancelled by customer",
    }
}
