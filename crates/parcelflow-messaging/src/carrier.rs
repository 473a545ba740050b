//! Carrier status messages from the `abc-transport-responses` channel.
//!
//! The message type tag is matched exhaustively at deserialization; an
//! unknown `messageType` is a deserialization error handled by the router,
//! not a silent fallthrough.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A status message reported by the ABC transport carrier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "messageType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CarrierMessage {
    /// Heads-up that a pickup has been scheduled; no status change.
    #[serde(rename_all = "camelCase")]
    PickupScheduled {
        /// The parcel concerned.
        parcel_id: Uuid,
        /// Pickup location.
        #[serde(default)]
        location: Option<String>,
        /// When the pickup is planned.
        #[serde(default)]
        scheduled_time: Option<DateTime<Utc>>,
    },

    /// The carrier has collected the parcel.
    #[serde(rename_all = "camelCase")]
    ParcelPickedUp {
        /// The parcel concerned.
        parcel_id: Uuid,
        /// Where the pickup happened.
        #[serde(default)]
        location: Option<String>,
        /// Collecting vehicle.
        #[serde(default)]
        vehicle_id: Option<String>,
        /// Collecting driver.
        #[serde(default)]
        driver_name: Option<String>,
        /// Carrier-reported time of occurrence.
        #[serde(default)]
        timestamp: Option<DateTime<Utc>>,
    },

    /// The parcel is moving between facilities.
    #[serde(rename_all = "camelCase")]
    ParcelInTransit {
        /// The parcel concerned.
        parcel_id: Uuid,
        /// Current facility or waypoint.
        #[serde(default)]
        location: Option<String>,
        /// Carrier-reported time of occurrence.
        #[serde(default)]
        timestamp: Option<DateTime<Utc>>,
    },

    /// The parcel has been loaded onto a delivery vehicle.
    #[serde(rename_all = "camelCase")]
    ParcelLoadedInTruck {
        /// The parcel concerned.
        parcel_id: Uuid,
        /// Loading location.
        #[serde(default)]
        location: Option<String>,
        /// Delivery vehicle.
        #[serde(default)]
        vehicle_id: Option<String>,
        /// Delivery driver.
        #[serde(default)]
        driver_name: Option<String>,
        /// Carrier-reported time of occurrence.
        #[serde(default)]
        timestamp: Option<DateTime<Utc>>,
    },

    /// The parcel is on its final delivery leg.
    #[serde(rename_all = "camelCase")]
    ParcelOutForDelivery {
        /// The parcel concerned.
        parcel_id: Uuid,
        /// Delivery area.
        #[serde(default)]
        location: Option<String>,
        /// Delivery vehicle.
        #[serde(default)]
        vehicle_id: Option<String>,
        /// Delivery driver.
        #[serde(default)]
        driver_name: Option<String>,
        /// Carrier-reported time of occurrence.
        #[serde(default)]
        timestamp: Option<DateTime<Utc>>,
    },

    /// The parcel has been delivered.
    #[serde(rename_all = "camelCase")]
    ParcelDelivered {
        /// The parcel concerned.
        parcel_id: Uuid,
        /// Where the handover happened.
        #[serde(default)]
        delivery_location: Option<String>,
        /// Who received the parcel.
        #[serde(default)]
        recipient_name: Option<String>,
        /// Carrier-reported delivery time.
        #[serde(default)]
        delivery_time: Option<DateTime<Utc>>,
    },

    /// A delivery attempt failed.
    #[serde(rename_all = "camelCase")]
    DeliveryFailed {
        /// The parcel concerned.
        parcel_id: Uuid,
        /// Attempted location.
        #[serde(default)]
        location: Option<String>,
        /// Why the attempt failed.
        #[serde(default)]
        failure_reason: Option<String>,
        /// Carrier-reported time of occurrence.
        #[serde(default)]
        timestamp: Option<DateTime<Utc>>,
    },

    /// The parcel has been returned to the sender.
    #[serde(rename_all = "camelCase")]
    ParcelReturned {
        /// The parcel concerned.
        parcel_id: Uuid,
        /// Return location.
        #[serde(default)]
        location: Option<String>,
        /// Why the parcel was returned.
        #[serde(default)]
        return_reason: Option<String>,
        /// Carrier-reported time of occurrence.
        #[serde(default)]
        timestamp: Option<DateTime<Utc>>,
    },
}

impl CarrierMessage {
    /// The parcel this message concerns.
    #[must_use]
    pub const fn parcel_id(&self) -> Uuid {
        match self {
            Self::PickupScheduled { parcel_id, .. }
            | Self::ParcelPickedUp { parcel_id, .. }
            | Self::ParcelInTransit { parcel_id, .. }
            | Self::ParcelLoadedInTruck { parcel_id, .. }
            | Self::ParcelOutForDelivery { parcel_id, .. }
            | Self::ParcelDelivered { parcel_id, .. }
            | Self::DeliveryFailed { parcel_id, .. }
            | Self::ParcelReturned { parcel_id, .. } => *parcel_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_carrier_message_parses_wire_tag() {
        let parcel_id = Uuid::new_v4();
        let raw = serde_json::json!({
            "messageType": "PARCEL_PICKED_UP",
            "parcelId": parcel_id,
            "location": "NYC",
            "vehicleId": "TRUCK-7",
        });
        let message: CarrierMessage = serde_json::from_value(raw).unwrap();
        match message {
            CarrierMessage::ParcelPickedUp {
                parcel_id: id,
                location,
                vehicle_id,
                ..
            } => {
                assert_eq!(id, parcel_id);
                assert_eq!(location.as_deref(), Some("NYC"));
                assert_eq!(vehicle_id.as_deref(), Some("TRUCK-7"));
            }
            other => panic!("expected ParcelPickedUp, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_message_type_is_a_parse_error() {
        let raw = serde_json::json!({
            "messageType": "PARCEL_TELEPORTED",
            "parcelId": Uuid::new_v4(),
        });
        assert!(serde_json::from_value::<CarrierMessage>(raw).is_err());
    }
}
