//! Parcel endpoints — synchronous ingestion, queries and cancellation.
//!
//! The POST ingestion path runs the same registration handler as the
//! `incoming-parcel-orders` channel consumer, so both entry points share
//! validation, deduplication and publish semantics.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use parcelflow_core::error::DomainError;
use parcelflow_core::model::{Parcel, TrackingEvent};
use parcelflow_lifecycle::application::tracking::{get_parcel as load_parcel, tracking_history};
use parcelflow_lifecycle::application::transition::{CancelOutcome, LifecycleDeps, cancel_parcel};
use parcelflow_orders::application::register::{RegistrationDeps, register_parcel};
use parcelflow_orders::domain::order::OrderPayload;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Response for a successful order submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    /// Always true.
    pub success: bool,
    /// The persisted (or pre-existing) parcel.
    pub parcel: Parcel,
    /// False when the registration event could not be published.
    pub published: bool,
    /// True when an existing parcel with the same EDI reference was returned.
    pub deduplicated: bool,
}

/// Response for a tracking history query.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingResponse {
    /// The parcel.
    pub parcel: Parcel,
    /// Ledger entries, newest first.
    pub events: Vec<TrackingEvent>,
}

/// Request body for a cancellation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    /// Optional customer-supplied reason, recorded in the ledger entry.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Response for a successful cancellation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelResponse {
    /// Always true.
    pub success: bool,
    /// The cancelled parcel.
    pub parcel: Parcel,
    /// False when the tracking event could not be published.
    pub published: bool,
}

/// `POST /api/v1/parcels`
///
/// Synchronous ingestion path; accepts the same order payload as the
/// `incoming-parcel-orders` channel. Returns 201 for a new parcel and 200
/// when the EDI reference matched an existing one.
pub async fn submit_order(
    State(state): State<AppState>,
    Json(payload): Json<OrderPayload>,
) -> Result<Response, ApiError> {
    let deps = RegistrationDeps {
        parcels: state.parcels.as_ref(),
        parties: state.parties.as_ref(),
        publisher: state.publisher.as_ref(),
        ids: state.ids.as_ref(),
        clock: state.clock.as_ref(),
        correlations: state.correlations.as_ref(),
    };
    let outcome = register_parcel(&payload, &deps).await?;

    let status = if outcome.deduplicated {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    let body = SubmissionResponse {
        success: true,
        parcel: outcome.parcel,
        published: outcome.published,
        deduplicated: outcome.deduplicated,
    };
    Ok((status, Json(body)).into_response())
}

/// `GET /api/v1/parcels/{id}`
pub async fn get_parcel(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Parcel>, ApiError> {
    let parcel = load_parcel(id, state.parcels.as_ref()).await?;
    Ok(Json(parcel))
}

/// `GET /api/v1/parcels/{id}/tracking`
pub async fn get_tracking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TrackingResponse>, ApiError> {
    let view = tracking_history(id, state.parcels.as_ref(), state.ledger.as_ref()).await?;
    Ok(Json(TrackingResponse {
        parcel: view.parcel,
        events: view.events,
    }))
}

/// `POST /api/v1/parcels/{id}/cancel`
///
/// Permitted only while the parcel is still at the sender (`REGISTERED` or
/// `PICKED_UP`); otherwise responds 409 with the current status.
pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CancelRequest>,
) -> Result<Json<CancelResponse>, ApiError> {
    let deps = LifecycleDeps {
        parcels: state.parcels.as_ref(),
        ledger: state.ledger.as_ref(),
        publisher: state.publisher.as_ref(),
        clock: state.clock.as_ref(),
        correlations: state.correlations.as_ref(),
    };
    match cancel_parcel(id, request.reason, &deps).await? {
        CancelOutcome::Cancelled(outcome) => Ok(Json(CancelResponse {
            success: true,
            parcel: outcome.parcel,
            published: outcome.published,
        })),
        CancelOutcome::Rejected { current_status } => {
            Err(ApiError(DomainError::Precondition { current_status }))
        }
    }
}
