//! Registration handler — the ingestion path from validated order to
//! persisted parcel and published registration event.

use chrono::{DateTime, Utc};
use parcelflow_core::channels;
use parcelflow_core::clock::Clock;
use parcelflow_core::error::DomainError;
use parcelflow_core::events::{ABC_TRANSPORT_EVENT_TYPE, CorrelationIds, DomainEvent};
use parcelflow_core::ids::IdGenerator;
use parcelflow_core::model::{Parcel, ParcelStatus, Party, TrackingEvent, TrackingEventType};
use parcelflow_core::publisher::EventPublisher;
use parcelflow_core::store::{ParcelStore, PartyStore};
use serde::Serialize;
use uuid::Uuid;

use crate::application::resolve::resolve_party;
use crate::application::validate::{ValidatedOrder, validate_order};
use crate::domain::order::OrderPayload;

/// Collaborators needed by the registration handler.
pub struct RegistrationDeps<'a> {
    /// Durable parcel record.
    pub parcels: &'a dyn ParcelStore,
    /// Durable party record.
    pub parties: &'a dyn PartyStore,
    /// Outbound event fan-out.
    pub publisher: &'a dyn EventPublisher,
    /// Identifier source.
    pub ids: &'a dyn IdGenerator,
    /// Time source.
    pub clock: &'a dyn Clock,
    /// Correlation id sequence.
    pub correlations: &'a CorrelationIds,
}

/// Result of a registration.
#[derive(Debug)]
pub struct RegistrationOutcome {
    /// The persisted (or pre-existing) parcel.
    pub parcel: Parcel,
    /// False when the registration event could not be published; the domain
    /// state is still correct and the event may be re-emitted out-of-band.
    pub published: bool,
    /// True when an existing parcel with the same EDI reference was returned
    /// instead of creating a duplicate.
    pub deduplicated: bool,
}

/// Carrier-facing body of a registration event.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegistrationEventBody<'a> {
    message_type: &'static str,
    edi_reference: &'a str,
    status: ParcelStatus,
    priority: parcelflow_core::model::Priority,
    sender: PartyRef<'a>,
    recipient: PartyRef<'a>,
    pickup_address: &'a parcelflow_core::model::Address,
    delivery_address: &'a parcelflow_core::model::Address,
    parcel_details: &'a parcelflow_core::model::ParcelDetails,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PartyRef<'a> {
    reference_code: Option<&'a str>,
    name: &'a str,
    email: &'a str,
}

impl<'a> From<&'a Party> for PartyRef<'a> {
    fn from(party: &'a Party) -> Self {
        Self {
            reference_code: party.reference_code.as_deref(),
            name: &party.name,
            email: &party.email,
        }
    }
}

/// Registers a parcel from a raw order payload.
///
/// Validates the payload, resolves sender and recipient, persists the parcel
/// together with its first tracking event in one unit of work, then publishes
/// a `PARCEL_REGISTRATION` event to the carrier-facing channel. A publish
/// failure after a successful persist is logged and surfaced as a
/// degraded-but-completed outcome, never as an error.
///
/// Submitting the same EDI reference twice is idempotent: the existing parcel
/// is returned, nothing new is persisted and nothing is published.
///
/// # Errors
///
/// Returns `DomainError::Validation` for incomplete payloads and
/// `DomainError::Infrastructure` for store failures.
pub async fn register_parcel(
    payload: &OrderPayload,
    deps: &RegistrationDeps<'_>,
) -> Result<RegistrationOutcome, DomainError> {
    let order = validate_order(payload)?;

    if let Some(existing) = deps
        .parcels
        .find_by_edi_reference(&order.edi_reference)
        .await?
    {
        tracing::info!(
            parcel_id = %existing.id,
            edi_reference = %order.edi_reference,
            "duplicate EDI reference; returning existing parcel"
        );
        return Ok(RegistrationOutcome {
            parcel: existing,
            published: false,
            deduplicated: true,
        });
    }

    let sender = resolve_party(&order.sender, deps.parties, deps.ids, deps.clock).await?;
    let recipient = resolve_party(&order.recipient, deps.parties, deps.ids, deps.clock).await?;

    let now = deps.clock.now();
    let parcel = build_parcel(&order, sender.id, recipient.id, deps.ids.parcel_id(), now);
    let first_event = TrackingEvent {
        id: Uuid::new_v4(),
        parcel_id: parcel.id,
        event_type: TrackingEventType::Registered,
        description: "Parcel registered".to_owned(),
        location: Some(parcel.pickup_address.city.clone()),
        vehicle_id: None,
        driver_name: None,
        event_timestamp: now,
        recorded_at: now,
    };

    // Parcel row and first ledger row land in one unit of work.
    deps.parcels.insert(&parcel, &first_event).await?;
    tracing::info!(parcel_id = %parcel.id, edi_reference = %order.edi_reference, "parcel registered");

    let event = registration_event(&parcel, &sender, &recipient, deps.correlations, now);
    let published = match deps
        .publisher
        .publish(channels::ABC_TRANSPORT_EVENTS, &event)
        .await
    {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(parcel_id = %parcel.id, error = %err, "registration event not published");
            false
        }
    };

    Ok(RegistrationOutcome {
        parcel,
        published,
        deduplicated: false,
    })
}

fn build_parcel(
    order: &ValidatedOrder,
    sender_id: Uuid,
    recipient_id: Uuid,
    parcel_id: Uuid,
    now: DateTime<Utc>,
) -> Parcel {
    Parcel {
        id: parcel_id,
        edi_reference: Some(order.edi_reference.clone()),
        sender_id,
        recipient_id,
        pickup_address: order.pickup_address.clone(),
        delivery_address: order.delivery_address.clone(),
        details: order.details.clone(),
        priority: order.priority,
        status: ParcelStatus::Registered,
        estimated_delivery_date: order.estimated_delivery_date,
        actual_delivery_date: None,
        created_at: now,
        updated_at: now,
    }
}

fn registration_event(
    parcel: &Parcel,
    sender: &Party,
    recipient: &Party,
    correlations: &CorrelationIds,
    now: DateTime<Utc>,
) -> DomainEvent {
    let body = RegistrationEventBody {
        message_type: "PARCEL_REGISTRATION",
        edi_reference: parcel.edi_reference.as_deref().unwrap_or_default(),
        status: parcel.status,
        priority: parcel.priority,
        sender: sender.into(),
        recipient: recipient.into(),
        pickup_address: &parcel.pickup_address,
        delivery_address: &parcel.delivery_address,
        parcel_details: &parcel.details,
    };
    DomainEvent {
        event_id: Uuid::new_v4(),
        event_type: ABC_TRANSPORT_EVENT_TYPE.to_owned(),
        parcel_id: parcel.id,
        timestamp: now,
        correlation_id: correlations.next(parcel.id),
        // RegistrationEventBody serialization cannot fail.
        payload: serde_json::to_value(&body).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use parcelflow_test_support::{
        FailingParcelStore, FailingPublisher, FixedClock, InMemoryStore, RecordingPublisher,
        SequenceIds,
    };

    use crate::domain::order::{AddressPayload, ContactPayload};

    fn order_payload() -> OrderPayload {
        OrderPayload {
            edi_reference: Some("EDI-2024-001".to_owned()),
            sender: Some(ContactPayload {
                reference_code: None,
                name: Some("John Doe".to_owned()),
                email: Some("john@example.com".to_owned()),
                phone: None,
            }),
            recipient: Some(ContactPayload {
                reference_code: None,
                name: Some("Jane Smith".to_owned()),
                email: Some("jane@example.com".to_owned()),
                phone: None,
            }),
            pickup_address: Some(AddressPayload {
                street: Some("1 Warehouse Way".to_owned()),
                city: Some("Newark".to_owned()),
                postal_code: Some("07101".to_owned()),
                country: Some("US".to_owned()),
            }),
            delivery_address: Some(AddressPayload {
                street: Some("200 Main St".to_owned()),
                city: Some("Brooklyn".to_owned()),
                postal_code: Some("11201".to_owned()),
                country: Some("US".to_owned()),
            }),
            parcel_details: Default::default(),
            service_options: Default::default(),
        }
    }

    fn fixed_clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn test_registration_persists_parcel_with_first_tracking_event() {
        // Arrange
        let store = InMemoryStore::new();
        let publisher = RecordingPublisher::new();
        let ids = SequenceIds::new(vec![]);
        let clock = fixed_clock();
        let correlations = CorrelationIds::new();
        let deps = RegistrationDeps {
            parcels: &store,
            parties: &store,
            publisher: &publisher,
            ids: &ids,
            clock: &clock,
            correlations: &correlations,
        };

        // Act
        let outcome = register_parcel(&order_payload(), &deps).await.unwrap();

        // Assert
        assert_eq!(outcome.parcel.status, ParcelStatus::Registered);
        assert_eq!(outcome.parcel.edi_reference.as_deref(), Some("EDI-2024-001"));
        assert!(outcome.published);
        assert!(!outcome.deduplicated);

        let events = store.all_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, TrackingEventType::Registered);
        assert_eq!(events[0].parcel_id, outcome.parcel.id);

        let published = publisher.published();
        assert_eq!(published.len(), 1);
        let (channel, event) = &published[0];
        assert_eq!(channel, channels::ABC_TRANSPORT_EVENTS);
        assert_eq!(event.parcel_id, outcome.parcel.id);
        assert_eq!(event.event_type, ABC_TRANSPORT_EVENT_TYPE);
        assert_eq!(event.payload["messageType"], "PARCEL_REGISTRATION");
        assert_eq!(event.payload["ediReference"], "EDI-2024-001");
    }

    #[tokio::test]
    async fn test_duplicate_edi_reference_returns_existing_parcel() {
        // Arrange
        let store = InMemoryStore::new();
        let publisher = RecordingPublisher::new();
        let ids = SequenceIds::new(vec![]);
        let clock = fixed_clock();
        let correlations = CorrelationIds::new();
        let deps = RegistrationDeps {
            parcels: &store,
            parties: &store,
            publisher: &publisher,
            ids: &ids,
            clock: &clock,
            correlations: &correlations,
        };
        let first = register_parcel(&order_payload(), &deps).await.unwrap();

        // Act
        let second = register_parcel(&order_payload(), &deps).await.unwrap();

        // Assert
        assert!(second.deduplicated);
        assert_eq!(second.parcel.id, first.parcel.id);
        assert_eq!(store.parcel_count(), 1);
        // No second registration event.
        assert_eq!(publisher.published().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_payload_persists_nothing() {
        // Arrange
        let store = InMemoryStore::new();
        let publisher = RecordingPublisher::new();
        let ids = SequenceIds::new(vec![]);
        let clock = fixed_clock();
        let correlations = CorrelationIds::new();
        let deps = RegistrationDeps {
            parcels: &store,
            parties: &store,
            publisher: &publisher,
            ids: &ids,
            clock: &clock,
            correlations: &correlations,
        };
        let mut payload = order_payload();
        payload.sender = None;

        // Act
        let result = register_parcel(&payload, &deps).await;

        // Assert
        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(store.parcel_count(), 0);
        assert!(store.parties().is_empty());
        assert!(publisher.published().is_empty());
    }

    #[tokio::test]
    async fn test_publish_failure_is_degraded_not_error() {
        // Arrange
        let store = InMemoryStore::new();
        let ids = SequenceIds::new(vec![]);
        let clock = fixed_clock();
        let correlations = CorrelationIds::new();
        let deps = RegistrationDeps {
            parcels: &store,
            parties: &store,
            publisher: &FailingPublisher,
            ids: &ids,
            clock: &clock,
            correlations: &correlations,
        };

        // Act
        let outcome = register_parcel(&order_payload(), &deps).await.unwrap();

        // Assert: persisted, but flagged unpublished.
        assert!(!outcome.published);
        assert_eq!(store.parcel_count(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_aborts_whole_operation() {
        // Arrange
        let parties = InMemoryStore::new();
        let publisher = RecordingPublisher::new();
        let ids = SequenceIds::new(vec![]);
        let clock = fixed_clock();
        let correlations = CorrelationIds::new();
        let deps = RegistrationDeps {
            parcels: &FailingParcelStore,
            parties: &parties,
            publisher: &publisher,
            ids: &ids,
            clock: &clock,
            correlations: &correlations,
        };

        // Act
        let result = register_parcel(&order_payload(), &deps).await;

        // Assert: nothing published after a failed persist.
        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
        assert!(publisher.published().is_empty());
    }
}
