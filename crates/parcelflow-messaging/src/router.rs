//! Inbound Event Router — maps channel messages to domain operations.
//!
//! Each message is handled to completion before its disposition is returned;
//! the transport commits only on `Ack`. Messages that can never succeed
//! (malformed payloads, unknown parcels, precondition rejections) are
//! acknowledged so they are not redelivered; infrastructure failures request
//! redelivery.

use std::sync::Arc;

use parcelflow_core::clock::Clock;
use parcelflow_core::error::DomainError;
use parcelflow_core::events::CorrelationIds;
use parcelflow_core::ids::IdGenerator;
use parcelflow_core::model::{ParcelStatus, TrackingEventType};
use parcelflow_core::publisher::EventPublisher;
use parcelflow_core::store::{ParcelStore, PartyStore, TrackingLedger};
use parcelflow_lifecycle::application::transition::{
    LifecycleDeps, apply_transition, record_heads_up,
};
use parcelflow_lifecycle::domain::transitions::TransitionRequest;
use parcelflow_orders::application::register::{RegistrationDeps, register_parcel};
use parcelflow_orders::domain::order::OrderPayload;
use uuid::Uuid;

use crate::carrier::CarrierMessage;

/// What the transport should do with a consumed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Commit the message; it was handled or can never succeed.
    Ack,
    /// Leave the message uncommitted so the transport redelivers it.
    Retry,
}

/// Shared collaborators behind the router.
#[derive(Clone)]
pub struct RouterContext {
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

/// Routes messages from both inbound channels to domain operations.
#[derive(Clone)]
pub struct InboundRouter {
    context: RouterContext,
}

impl InboundRouter {
    /// Creates a router over the given collaborators.
    #[must_use]
    pub fn new(context: RouterContext) -> Self {
        Self { context }
    }

    /// Handles a raw order-submission message from `incoming-parcel-orders`.
    pub async fn handle_order_submission(&self, payload: &[u8]) -> Disposition {
        let order: OrderPayload = match serde_json::from_slice(payload) {
            Ok(order) => order,
            Err(err) => {
                tracing::warn!(error = %err, "malformed order submission dropped");
                return Disposition::Ack;
            }
        };

        let deps = RegistrationDeps {
            parcels: self.context.parcels.as_ref(),
            parties: self.context.parties.as_ref(),
            publisher: self.context.publisher.as_ref(),
            ids: self.context.ids.as_ref(),
            clock: self.context.clock.as_ref(),
            correlations: self.context.correlations.as_ref(),
        };
        match register_parcel(&order, &deps).await {
            Ok(outcome) => {
                tracing::info!(parcel_id = %outcome.parcel.id, "order submission processed");
                Disposition::Ack
            }
            Err(err) => disposition_for(&err, "order submission"),
        }
    }

    /// Handles a carrier status message from `abc-transport-responses`.
    pub async fn handle_carrier_message(&self, payload: &[u8]) -> Disposition {
        let message: CarrierMessage = match serde_json::from_slice(payload) {
            Ok(message) => message,
            Err(err) => {
                tracing::warn!(error = %err, "malformed carrier message dropped");
                return Disposition::Ack;
            }
        };

        let parcel_id = message.parcel_id();
        let deps = LifecycleDeps {
            parcels: self.context.parcels.as_ref(),
            ledger: self.context.ledger.as_ref(),
            publisher: self.context.publisher.as_ref(),
            clock: self.context.clock.as_ref(),
            correlations: self.context.correlations.as_ref(),
        };

        let result = match message {
            CarrierMessage::PickupScheduled {
                location,
                scheduled_time,
                ..
            } => {
                // Heads-up only; parcel status is untouched.
                record_heads_up(
                    parcel_id,
                    TrackingEventType::PickupScheduled,
                    "Pickup scheduled".to_owned(),
                    location,
                    scheduled_time,
                    &deps,
                )
                .await
            }
            CarrierMessage::ParcelPickedUp {
                location,
                vehicle_id,
                driver_name,
                timestamp,
                ..
            } => {
                apply_transition(
                    parcel_id,
                    &TransitionRequest {
                        new_status: ParcelStatus::PickedUp,
                        location,
                        note: None,
                        vehicle_id,
                        driver_name,
                        event_timestamp: timestamp,
                    },
                    &deps,
                )
                .await
            }
            CarrierMessage::ParcelInTransit {
                location, timestamp, ..
            } => {
                apply_transition(
                    parcel_id,
                    &TransitionRequest {
                        new_status: ParcelStatus::InTransit,
                        location,
                        note: None,
                        vehicle_id: None,
                        driver_name: None,
                        event_timestamp: timestamp,
                    },
                    &deps,
                )
                .await
            }
            CarrierMessage::ParcelLoadedInTruck {
                location,
                vehicle_id,
                driver_name,
                timestamp,
                ..
            } => {
                apply_transition(
                    parcel_id,
                    &TransitionRequest {
                        new_status: ParcelStatus::LoadedInTruck,
                        location,
                        note: None,
                        vehicle_id,
                        driver_name,
                        event_timestamp: timestamp,
                    },
                    &deps,
                )
                .await
            }
            CarrierMessage::ParcelOutForDelivery {
                location,
                vehicle_id,
                driver_name,
                timestamp,
                ..
            } => {
                apply_transition(
                    parcel_id,
                    &TransitionRequest {
                        new_status: ParcelStatus::OutForDelivery,
                        location,
                        note: None,
                        vehicle_id,
                        driver_name,
                        event_timestamp: timestamp,
                    },
                    &deps,
                )
                .await
            }
            CarrierMessage::ParcelDelivered {
                delivery_location,
                recipient_name,
                delivery_time,
                ..
            } => {
                apply_transition(
                    parcel_id,
                    &TransitionRequest {
                        new_status: ParcelStatus::Delivered,
                        location: delivery_location,
                        note: recipient_name.map(|name| format!("Delivered to {name}")),
                        vehicle_id: None,
                        driver_name: None,
                        event_timestamp: delivery_time,
                    },
                    &deps,
                )
                .await
            }
            CarrierMessage::DeliveryFailed {
                location,
                failure_reason,
                timestamp,
                ..
            } => {
                apply_transition(
                    parcel_id,
                    &TransitionRequest {
                        new_status: ParcelStatus::FailedDelivery,
                        location,
                        note: failure_reason,
                        vehicle_id: None,
                        driver_name: None,
                        event_timestamp: timestamp,
                    },
                    &deps,
                )
                .await
            }
            CarrierMessage::ParcelReturned {
                location,
                return_reason,
                timestamp,
                ..
            } => {
                apply_transition(
                    parcel_id,
                    &TransitionRequest {
                        new_status: ParcelStatus::Returned,
                        location,
                        note: return_reason,
                        vehicle_id: None,
                        driver_name: None,
                        event_timestamp: timestamp,
                    },
                    &deps,
                )
                .await
            }
        };

        match result {
            Ok(_) => Disposition::Ack,
            Err(DomainError::NotFound(id)) => {
                // The carrier does not resend for unknown parcels; drop.
                tracing::warn!(parcel_id = %id, "carrier message for unknown parcel dropped");
                Disposition::Ack
            }
            Err(err) => disposition_for(&err, "carrier message"),
        }
    }
}

fn disposition_for(err: &DomainError, kind: &str) -> Disposition {
    if err.is_retryable() {
        tracing::error!(error = %err, "{kind} failed; requesting redelivery");
        Disposition::Retry
    } else {
        tracing::warn!(error = %err, error_kind = err.kind(), "{kind} dropped");
        Disposition::Ack
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use parcelflow_core::channels;
    use parcelflow_core::ids::SystemIdGenerator;
    use parcelflow_core::model::{Parcel, TrackingEvent};
    use parcelflow_test_support::{FailingParcelStore, FixedClock, InMemoryStore, RecordingPublisher};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
    }

    fn context_with(store: InMemoryStore, publisher: RecordingPublisher) -> RouterContext {
        let store = Arc::new(store);
        RouterContext {
            parcels: store.clone(),
            parties: store.clone(),
            ledger: store,
            publisher: Arc::new(publisher),
            ids: Arc::new(SystemIdGenerator),
            clock: Arc::new(FixedClock(fixed_now())),
            correlations: Arc::new(CorrelationIds::new()),
        }
    }

    async fn seed_registered_parcel(store: &InMemoryStore) -> Uuid {
        let now = fixed_now();
        let parcel_id = Uuid::new_v4();
        let parcel = Parcel {
            id: parcel_id,
            edi_reference: Some("EDI-2024-001".to_owned()),
            sender_id: Uuid::new_v4(),
            recipient_id: Uuid::new_v4(),
            pickup_address: parcelflow_core::model::Address {
                street: "1 Warehouse Way".to_owned(),
                city: "Newark".to_owned(),
                postal_code: "07101".to_owned(),
                country: "US".to_owned(),
            },
            delivery_address: parcelflow_core::model::Address {
                street: "200 Main St".to_owned(),
                city: "Brooklyn".to_owned(),
                postal_code: "11201".to_owned(),
                country: "US".to_owned(),
            },
            details: parcelflow_core::model::ParcelDetails::default(),
            priority: parcelflow_core::model::Priority::Standard,
            status: ParcelStatus::Registered,
            estimated_delivery_date: None,
            actual_delivery_date: None,
            created_at: now,
            updated_at: now,
        };
        let first = TrackingEvent {
            id: Uuid::new_v4(),
            parcel_id,
            event_type: TrackingEventType::Registered,
            description: "Parcel registered".to_owned(),
            location: None,
            vehicle_id: None,
            driver_name: None,
            event_timestamp: now,
            recorded_at: now,
        };
        ParcelStore::insert(store, &parcel, &first).await.unwrap();
        parcel_id
    }

    #[tokio::test]
    async fn test_order_submission_registers_parcel_and_acks() {
        // Arrange
        let store = InMemoryStore::new();
        let publisher = RecordingPublisher::new();
        let router = InboundRouter::new(context_with(store.clone(), publisher.clone()));
        let payload = serde_json::json!({
            "ediReference": "EDI-2024-001",
            "sender": { "name": "John Doe", "email": "john@example.com" },
            "recipient": { "name": "Jane Smith", "email": "jane@example.com" },
            "pickupAddress": {
                "street": "1 Warehouse Way", "city": "Newark",
                "postalCode": "07101", "country": "US"
            },
            "deliveryAddress": {
                "street": "200 Main St", "city": "Brooklyn",
                "postalCode": "11201", "country": "US"
            },
        });

        // Act
        let disposition = router
            .handle_order_submission(&serde_json::to_vec(&payload).unwrap())
            .await;

        // Assert
        assert_eq!(disposition, Disposition::Ack);
        assert_eq!(store.parcel_count(), 1);
        let published = publisher.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, channels::ABC_TRANSPORT_EVENTS);
        assert_eq!(published[0].1.payload["ediReference"], "EDI-2024-001");
    }

    #[tokio::test]
    async fn test_invalid_order_submission_is_acked_not_retried() {
        // Arrange
        let store = InMemoryStore::new();
        let publisher = RecordingPublisher::new();
        let router = InboundRouter::new(context_with(store.clone(), publisher));
        let payload = serde_json::json!({ "ediReference": "EDI-2024-002" });

        // Act
        let disposition = router
            .handle_order_submission(&serde_json::to_vec(&payload).unwrap())
            .await;

        // Assert: a message that can never succeed must not be redelivered.
        assert_eq!(disposition, Disposition::Ack);
        assert_eq!(store.parcel_count(), 0);
    }

    #[tokio::test]
    async fn test_pickup_message_advances_status() {
        // Arrange
        let store = InMemoryStore::new();
        let publisher = RecordingPublisher::new();
        let parcel_id = seed_registered_parcel(&store).await;
        let router = InboundRouter::new(context_with(store.clone(), publisher.clone()));
        let payload = serde_json::json!({
            "messageType": "PARCEL_PICKED_UP",
            "parcelId": parcel_id,
            "location": "NYC",
        });

        // Act
        let disposition = router
            .handle_carrier_message(&serde_json::to_vec(&payload).unwrap())
            .await;

        // Assert
        assert_eq!(disposition, Disposition::Ack);
        let parcel = ParcelStore::find_by_id(&store, parcel_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(parcel.status, ParcelStatus::PickedUp);
        let published = publisher.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, channels::PARCEL_TRACKING_EVENTS);
        assert_eq!(published[0].1.payload["currentStatus"], "PICKED_UP");
        assert_eq!(published[0].1.payload["location"], "NYC");
    }

    #[tokio::test]
    async fn test_delivered_message_sets_delivery_date() {
        // Arrange
        let store = InMemoryStore::new();
        let publisher = RecordingPublisher::new();
        let parcel_id = seed_registered_parcel(&store).await;
        let router = InboundRouter::new(context_with(store.clone(), publisher));
        let payload = serde_json::json!({
            "messageType": "PARCEL_DELIVERED",
            "parcelId": parcel_id,
            "deliveryLocation": "Brooklyn",
            "recipientName": "Jane Smith",
        });

        // Act
        let disposition = router
            .handle_carrier_message(&serde_json::to_vec(&payload).unwrap())
            .await;

        // Assert
        assert_eq!(disposition, Disposition::Ack);
        let parcel = ParcelStore::find_by_id(&store, parcel_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(parcel.status, ParcelStatus::Delivered);
        assert!(parcel.actual_delivery_date.is_some());
        let history = TrackingLedger::history(&store, parcel_id).await.unwrap();
        assert_eq!(history[0].description, "Delivered to Jane Smith");
    }

    #[tokio::test]
    async fn test_pickup_scheduled_is_heads_up_only() {
        // Arrange
        let store = InMemoryStore::new();
        let publisher = RecordingPublisher::new();
        let parcel_id = seed_registered_parcel(&store).await;
        let router = InboundRouter::new(context_with(store.clone(), publisher));
        let payload = serde_json::json!({
            "messageType": "PICKUP_SCHEDULED",
            "parcelId": parcel_id,
            "location": "Newark",
        });

        // Act
        let disposition = router
            .handle_carrier_message(&serde_json::to_vec(&payload).unwrap())
            .await;

        // Assert: ledger grew, status did not move.
        assert_eq!(disposition, Disposition::Ack);
        let parcel = ParcelStore::find_by_id(&store, parcel_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(parcel.status, ParcelStatus::Registered);
        let history = TrackingLedger::history(&store, parcel_id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].event_type, TrackingEventType::PickupScheduled);
    }

    #[tokio::test]
    async fn test_unknown_parcel_message_is_dropped_without_mutation() {
        // Arrange
        let store = InMemoryStore::new();
        let publisher = RecordingPublisher::new();
        let router = InboundRouter::new(context_with(store.clone(), publisher.clone()));
        let payload = serde_json::json!({
            "messageType": "PARCEL_IN_TRANSIT",
            "parcelId": Uuid::new_v4(),
        });

        // Act
        let disposition = router
            .handle_carrier_message(&serde_json::to_vec(&payload).unwrap())
            .await;

        // Assert
        assert_eq!(disposition, Disposition::Ack);
        assert_eq!(store.parcel_count(), 0);
        assert!(store.all_events().is_empty());
        assert!(publisher.published().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_carrier_payload_is_acked() {
        // Arrange
        let store = InMemoryStore::new();
        let publisher = RecordingPublisher::new();
        let router = InboundRouter::new(context_with(store, publisher));

        // Act
        let disposition = router.handle_carrier_message(b"not json").await;

        // Assert
        assert_eq!(disposition, Disposition::Ack);
    }

    #[tokio::test]
    async fn test_store_outage_requests_redelivery() {
        // Arrange
        let store = InMemoryStore::new();
        let publisher = RecordingPublisher::new();
        let mut context = context_with(store, publisher);
        context.parcels = Arc::new(FailingParcelStore);
        let router = InboundRouter::new(context);
        let payload = serde_json::json!({
            "messageType": "PARCEL_IN_TRANSIT",
            "parcelId": Uuid::new_v4(),
        });

        // Act
        let disposition = router
            .handle_carrier_message(&serde_json::to_vec(&payload).unwrap())
            .await;

        // Assert: transient failure, the transport should redeliver.
        assert_eq!(disposition, Disposition::Retry);
    }
}
