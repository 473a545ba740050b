//! The lifecycle engine — applies transitions, heads-up notifications and
//! customer cancellation.
//!
//! Every successful operation persists the parcel and its tracking event in
//! one unit of work, then publishes a tracking event. The engine trusts the
//! carrier's reported status and does not enforce forward-only ordering of
//! the main chain; cancellation is the one precondition-gated transition.

use chrono::{DateTime, Utc};
use parcelflow_core::channels;
use parcelflow_core::clock::Clock;
use parcelflow_core::error::DomainError;
use parcelflow_core::events::{CorrelationIds, DomainEvent, TRACKING_EVENT_TYPE};
use parcelflow_core::model::{Parcel, ParcelStatus, TrackingEvent, TrackingEventType};
use parcelflow_core::publisher::EventPublisher;
use parcelflow_core::store::{ParcelStore, TrackingLedger};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::transitions::TransitionRequest;

/// Collaborators needed by the lifecycle engine.
pub struct LifecycleDeps<'a> {
    /// Durable parcel record.
    pub parcels: &'a dyn ParcelStore,
    /// Append-only tracking ledger (heads-up appends and history reads).
    pub ledger: &'a dyn TrackingLedger,
    /// Outbound event fan-out.
    pub publisher: &'a dyn EventPublisher,
    /// Time source.
    pub clock: &'a dyn Clock,
    /// Correlation id sequence.
    pub correlations: &'a CorrelationIds,
}

/// Result of a successfully applied transition or heads-up.
#[derive(Debug)]
pub struct TransitionOutcome {
    /// The parcel after the operation.
    pub parcel: Parcel,
    /// False when the tracking event could not be published; the domain
    /// state is still correct.
    pub published: bool,
}

/// Result of a cancellation attempt.
#[derive(Debug)]
pub enum CancelOutcome {
    /// The parcel was cancelled.
    Cancelled(TransitionOutcome),
    /// Cancellation is not permitted in the parcel's current status. A
    /// reported rejection, not a fault.
    Rejected {
        /// The status that blocked cancellation.
        current_status: ParcelStatus,
    },
}

/// Body of a published tracking event, per the `parcel-tracking-events`
/// channel contract.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TrackingEventBody<'a> {
    tracking_event_type: TrackingEventType,
    description: &'a str,
    event_timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vehicle_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    driver_name: Option<&'a str>,
    current_status: ParcelStatus,
}

/// Applies a carrier- or customer-requested status transition.
///
/// Loads the parcel, applies the new status (setting `actual_delivery_date`
/// on the transition into `Delivered`), persists parcel and tracking event
/// atomically, then publishes a tracking event. Publish failure after a
/// successful persist is logged and reported via `published: false`.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown parcel and
/// `DomainError::Infrastructure` for store failures.
pub async fn apply_transition(
    parcel_id: Uuid,
    request: &TransitionRequest,
    deps: &LifecycleDeps<'_>,
) -> Result<TransitionOutcome, DomainError> {
    let mut parcel = deps
        .parcels
        .find_by_id(parcel_id)
        .await?
        .ok_or(DomainError::NotFound(parcel_id))?;

    parcel.transition_to(request.new_status, deps.clock);

    let now = deps.clock.now();
    let event = TrackingEvent {
        id: Uuid::new_v4(),
        parcel_id,
        event_type: request.new_status.tracking_event_type(),
        description: request.description(),
        location: request.location.clone(),
        vehicle_id: request.vehicle_id.clone(),
        driver_name: request.driver_name.clone(),
        event_timestamp: request.event_timestamp.unwrap_or(now),
        recorded_at: now,
    };

    // Status write and ledger append commit together.
    deps.parcels.update(&parcel, &event).await?;
    tracing::info!(
        parcel_id = %parcel_id,
        status = %parcel.status,
        "parcel transition applied"
    );

    let published = publish_tracking_event(&parcel, &event, deps).await;
    if parcel.status.is_terminal() {
        // No further events for this parcel; drop its correlation counter.
        deps.correlations.release(parcel.id);
    }
    Ok(TransitionOutcome { parcel, published })
}

/// Records a heads-up notification (e.g. `PICKUP_SCHEDULED`) that does not
/// change parcel status: ledger append plus publish only.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown parcel and
/// `DomainError::Infrastructure` for store failures.
pub async fn record_heads_up(
    parcel_id: Uuid,
    event_type: TrackingEventType,
    description: String,
    location: Option<String>,
    event_timestamp: Option<DateTime<Utc>>,
    deps: &LifecycleDeps<'_>,
) -> Result<TransitionOutcome, DomainError> {
    let parcel = deps
        .parcels
        .find_by_id(parcel_id)
        .await?
        .ok_or(DomainError::NotFound(parcel_id))?;

    let now = deps.clock.now();
    let event = TrackingEvent {
        id: Uuid::new_v4(),
        parcel_id,
        event_type,
        description,
        location,
        vehicle_id: None,
        driver_name: None,
        event_timestamp: event_timestamp.unwrap_or(now),
        recorded_at: now,
    };
    deps.ledger.append(&event).await?;
    tracing::info!(parcel_id = %parcel_id, event_type = %event_type, "heads-up recorded");

    let published = publish_tracking_event(&parcel, &event, deps).await;
    Ok(TransitionOutcome { parcel, published })
}

/// Attempts a customer cancellation.
///
/// Permitted only while the parcel is `Registered` or `PickedUp`; any other
/// current status yields `CancelOutcome::Rejected` with the status included,
/// leaving the parcel untouched.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown parcel and
/// `DomainError::Infrastructure` for store failures.
pub async fn cancel_parcel(
    parcel_id: Uuid,
    reason: Option<String>,
    deps: &LifecycleDeps<'_>,
) -> Result<CancelOutcome, DomainError> {
    let parcel = deps
        .parcels
        .find_by_id(parcel_id)
        .await?
        .ok_or(DomainError::NotFound(parcel_id))?;

    if !parcel.status.is_cancellable() {
        tracing::info!(
            parcel_id = %parcel_id,
            status = %parcel.status,
            "cancellation rejected"
        );
        return Ok(CancelOutcome::Rejected {
            current_status: parcel.status,
        });
    }

    let request = TransitionRequest {
        new_status: ParcelStatus::Cancelled,
        location: None,
        note: reason,
        vehicle_id: None,
        driver_name: None,
        event_timestamp: None,
    };
    let outcome = apply_transition(parcel_id, &request, deps).await?;
    Ok(CancelOutcome::Cancelled(outcome))
}

async fn publish_tracking_event(
    parcel: &Parcel,
    event: &TrackingEvent,
    deps: &LifecycleDeps<'_>,
) -> bool {
    let body = TrackingEventBody {
        tracking_event_type: event.event_type,
        description: &event.description,
        event_timestamp: event.event_timestamp,
        location: event.location.as_deref(),
        vehicle_id: event.vehicle_id.as_deref(),
        driver_name: event.driver_name.as_deref(),
        current_status: parcel.status,
    };
    let domain_event = DomainEvent {
        event_id: Uuid::new_v4(),
        event_type: TRACKING_EVENT_TYPE.to_owned(),
        parcel_id: parcel.id,
        timestamp: deps.clock.now(),
        correlation_id: deps.correlations.next(parcel.id),
        // TrackingEventBody serialization cannot fail.
        payload: serde_json::to_value(&body).unwrap_or_default(),
    };
    match deps
        .publisher
        .publish(channels::PARCEL_TRACKING_EVENTS, &domain_event)
        .await
    {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(parcel_id = %parcel.id, error = %err, "tracking event not published");
            false
        }
    }
}
