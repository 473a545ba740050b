//! Parcel domain model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::Clock;

/// Lifecycle status of a parcel.
///
/// The main chain runs `Registered → PickedUp → InTransit → LoadedInTruck →
/// OutForDelivery → Delivered`. `FailedDelivery` and `Returned` can be
/// reported from any point; `Cancelled` is reachable only from `Registered`
/// or `PickedUp`. `Delivered`, `Cancelled` and `Returned` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParcelStatus {
    /// Order accepted, waiting for carrier pickup.
    Registered,
    /// Carrier has collected the parcel.
    PickedUp,
    /// Moving between facilities.
    InTransit,
    /// Loaded onto a delivery vehicle.
    LoadedInTruck,
    /// On the final delivery leg.
    OutForDelivery,
    /// Handed over to the recipient.
    Delivered,
    /// A delivery attempt failed.
    FailedDelivery,
    /// Sent back to the sender.
    Returned,
    /// Cancelled by the customer before transit.
    Cancelled,
}

impl ParcelStatus {
    /// Wire name of this status, e.g. `PICKED_UP`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "REGISTERED",
            Self::PickedUp => "PICKED_UP",
            Self::InTransit => "IN_TRANSIT",
            Self::LoadedInTruck => "LOADED_IN_TRUCK",
            Self::OutForDelivery => "OUT_FOR_DELIVERY",
            Self::Delivered => "DELIVERED",
            Self::FailedDelivery => "FAILED_DELIVERY",
            Self::Returned => "RETURNED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// The tracking event type recorded when a parcel enters this status.
    #[must_use]
    pub const fn tracking_event_type(self) -> TrackingEventType {
        match self {
            Self::Registered => TrackingEventType::Registered,
            Self::PickedUp => TrackingEventType::PickedUp,
            Self::InTransit => TrackingEventType::InTransit,
            Self::LoadedInTruck => TrackingEventType::LoadedInTruck,
            Self::OutForDelivery => TrackingEventType::OutForDelivery,
            Self::Delivered => TrackingEventType::Delivered,
            Self::FailedDelivery => TrackingEventType::DeliveryFailed,
            Self::Returned => TrackingEventType::Returned,
            Self::Cancelled => TrackingEventType::Cancelled,
        }
    }

    /// Customer cancellation is only permitted before the parcel is in
    /// transit.
    #[must_use]
    pub const fn is_cancellable(self) -> bool {
        matches!(self, Self::Registered | Self::PickedUp)
    }

    /// Whether no further carrier event is expected for this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled | Self::Returned)
    }
}

impl std::fmt::Display for ParcelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ParcelStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REGISTERED" => Ok(Self::Registered),
            "PICKED_UP" => Ok(Self::PickedUp),
            "IN_TRANSIT" => Ok(Self::InTransit),
            "LOADED_IN_TRUCK" => Ok(Self::LoadedInTruck),
            "OUT_FOR_DELIVERY" => Ok(Self::OutForDelivery),
            "DELIVERED" => Ok(Self::Delivered),
            "FAILED_DELIVERY" => Ok(Self::FailedDelivery),
            "RETURNED" => Ok(Self::Returned),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(format!("unknown parcel status: {other}")),
        }
    }
}

/// Service priority for a parcel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    /// Default service level.
    Standard,
    /// Expedited service.
    Express,
    /// Same-day / critical service.
    Urgent,
}

impl Priority {
    /// Wire name of this priority.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "STANDARD",
            Self::Express => "EXPRESS",
            Self::Urgent => "URGENT",
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STANDARD" => Ok(Self::Standard),
            "EXPRESS" => Ok(Self::Express),
            "URGENT" => Ok(Self::Urgent),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

/// Type of an entry in the tracking ledger.
///
/// Mirrors the status transitions plus intermediate notifications such as
/// `PickupScheduled` that do not themselves change parcel status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackingEventType {
    /// Parcel registered in the system.
    Registered,
    /// Carrier announced an upcoming pickup (no status change).
    PickupScheduled,
    /// Parcel collected by the carrier.
    PickedUp,
    /// Parcel moving between facilities.
    InTransit,
    /// Parcel loaded onto a delivery vehicle.
    LoadedInTruck,
    /// Parcel on the final delivery leg.
    OutForDelivery,
    /// Parcel delivered.
    Delivered,
    /// A delivery attempt failed.
    DeliveryFailed,
    /// Parcel returned to sender.
    Returned,
    /// Parcel cancelled by the customer.
    Cancelled,
}

impl TrackingEventType {
    /// Wire name of this event type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "REGISTERED",
            Self::PickupScheduled => "PICKUP_SCHEDULED",
            Self::PickedUp => "PICKED_UP",
            Self::InTransit => "IN_TRANSIT",
            Self::LoadedInTruck => "LOADED_IN_TRUCK",
            Self::OutForDelivery => "OUT_FOR_DELIVERY",
            Self::Delivered => "DELIVERED",
            Self::DeliveryFailed => "DELIVERY_FAILED",
            Self::Returned => "RETURNED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for TrackingEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TrackingEventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REGISTERED" => Ok(Self::Registered),
            "PICKUP_SCHEDULED" => Ok(Self::PickupScheduled),
            "PICKED_UP" => Ok(Self::PickedUp),
            "IN_TRANSIT" => Ok(Self::InTransit),
            "LOADED_IN_TRUCK" => Ok(Self::LoadedInTruck),
            "OUT_FOR_DELIVERY" => Ok(Self::OutForDelivery),
            "DELIVERED" => Ok(Self::Delivered),
            "DELIVERY_FAILED" => Ok(Self::DeliveryFailed),
            "RETURNED" => Ok(Self::Returned),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(format!("unknown tracking event type: {other}")),
        }
    }
}

/// A postal address owned by exactly one parcel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Street and number.
    pub street: String,
    /// City.
    pub city: String,
    /// Postal code.
    pub postal_code: String,
    /// ISO country name or code as supplied.
    pub country: String,
}

/// A sender or recipient contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    /// Party identifier.
    pub id: Uuid,
    /// Customer reference code; part of the natural key when present.
    pub reference_code: Option<String>,
    /// Display name.
    pub name: String,
    /// Email address; natural key fallback when no reference code exists.
    pub email: String,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Informational parcel attributes; not validated for physical consistency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelDetails {
    /// Free-form contents description.
    pub description: Option<String>,
    /// Weight in kilograms.
    pub weight_kg: Option<f64>,
    /// Dimensions, free-form (e.g. `30x20x10 cm`).
    pub dimensions: Option<String>,
}

/// A single shipment tracked through the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parcel {
    /// Globally-unique identifier, assigned at creation, immutable.
    pub id: Uuid,
    /// External EDI reference, used for idempotent lookup.
    pub edi_reference: Option<String>,
    /// Sender party.
    pub sender_id: Uuid,
    /// Recipient party.
    pub recipient_id: Uuid,
    /// Pickup address, owned by this parcel.
    pub pickup_address: Address,
    /// Delivery address, owned by this parcel.
    pub delivery_address: Address,
    /// Descriptive attributes.
    pub details: ParcelDetails,
    /// Service priority.
    pub priority: Priority,
    /// Current lifecycle status.
    pub status: ParcelStatus,
    /// Estimated delivery date, if known at registration.
    pub estimated_delivery_date: Option<NaiveDate>,
    /// Set on the transition into `Delivered`, never otherwise.
    pub actual_delivery_date: Option<DateTime<Utc>>,
    /// Creation timestamp, immutable.
    pub created_at: DateTime<Utc>,
    /// Bumped on every mutation.
    pub updated_at: DateTime<Utc>,
}

impl Parcel {
    /// Applies a status change, maintaining the invariant that
    /// `actual_delivery_date` is set if and only if the parcel is delivered.
    ///
    /// This is the only mutation path for `status`; the ledger append that
    /// accompanies it is the caller's responsibility.
    pub fn transition_to(&mut self, new_status: ParcelStatus, clock: &dyn Clock) {
        let now = clock.now();
        self.status = new_status;
        self.actual_delivery_date = if new_status == ParcelStatus::Delivered {
            Some(now)
        } else {
            None
        };
        self.updated_at = now;
    }
}

/// One immutable entry in a parcel's tracking ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEvent {
    /// Entry identifier.
    pub id: Uuid,
    /// The parcel this entry belongs to.
    pub parcel_id: Uuid,
    /// Entry type.
    pub event_type: TrackingEventType,
    /// Human-readable description.
    pub description: String,
    /// Location reported by the carrier or the system.
    pub location: Option<String>,
    /// Carrier vehicle, when reported.
    pub vehicle_id: Option<String>,
    /// Carrier driver, when reported.
    pub driver_name: Option<String>,
    /// Carrier- or system-supplied time of occurrence.
    pub event_timestamp: DateTime<Utc>,
    /// Row creation time, distinct from `event_timestamp`.
    pub recorded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use chrono::TimeZone;

    fn parcel(status: ParcelStatus) -> Parcel {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        Parcel {
            id: Uuid::new_v4(),
            edi_reference: Some("EDI-2024-001".to_owned()),
            sender_id: Uuid::new_v4(),
            recipient_id: Uuid::new_v4(),
            pickup_address: Address {
                street: "1 Warehouse Way".to_owned(),
                city: "Newark".to_owned(),
                postal_code: "07101".to_owned(),
                country: "US".to_owned(),
            },
            delivery_address: Address {
                street: "200 Main St".to_owned(),
                city: "Brooklyn".to_owned(),
                postal_code: "11201".to_owned(),
                country: "US".to_owned(),
            },
            details: ParcelDetails::default(),
            priority: Priority::Standard,
            status,
            estimated_delivery_date: None,
            actual_delivery_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_transition_to_delivered_sets_actual_delivery_date() {
        let mut p = parcel(ParcelStatus::OutForDelivery);
        p.transition_to(ParcelStatus::Delivered, &SystemClock);
        assert_eq!(p.status, ParcelStatus::Delivered);
        assert!(p.actual_delivery_date.is_some());
        assert_eq!(p.actual_delivery_date, Some(p.updated_at));
    }

    #[test]
    fn test_transition_to_non_delivered_leaves_delivery_date_unset() {
        let mut p = parcel(ParcelStatus::Registered);
        p.transition_to(ParcelStatus::InTransit, &SystemClock);
        assert_eq!(p.status, ParcelStatus::InTransit);
        assert!(p.actual_delivery_date.is_none());
    }

    #[test]
    fn test_cancellable_only_before_transit() {
        assert!(ParcelStatus::Registered.is_cancellable());
        assert!(ParcelStatus::PickedUp.is_cancellable());
        assert!(!ParcelStatus::InTransit.is_cancellable());
        assert!(!ParcelStatus::OutForDelivery.is_cancellable());
        assert!(!ParcelStatus::Delivered.is_cancellable());
        assert!(!ParcelStatus::Cancelled.is_cancellable());
    }

    #[test]
    fn test_status_round_trips_through_wire_name() {
        for status in [
            ParcelStatus::Registered,
            ParcelStatus::PickedUp,
            ParcelStatus::InTransit,
            ParcelStatus::LoadedInTruck,
            ParcelStatus::OutForDelivery,
            ParcelStatus::Delivered,
            ParcelStatus::FailedDelivery,
            ParcelStatus::Returned,
            ParcelStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<ParcelStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_tracking_event_type_mapping_agrees_with_status() {
        assert_eq!(
            ParcelStatus::PickedUp.tracking_event_type(),
            TrackingEventType::PickedUp
        );
        assert_eq!(
            ParcelStatus::FailedDelivery.tracking_event_type(),
            TrackingEventType::DeliveryFailed
        );
        assert_eq!(
            ParcelStatus::Cancelled.tracking_event_type(),
            TrackingEventType::Cancelled
        );
    }
}
