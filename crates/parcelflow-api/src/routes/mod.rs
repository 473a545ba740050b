//! HTTP route definitions.

pub mod health;
pub mod parcels;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the application router.
#[must_use]
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/parcels", post(parcels::submit_order))
        .route("/api/v1/parcels/{id}", get(parcels::get_parcel))
        .route("/api/v1/parcels/{id}/tracking", get(parcels::get_tracking))
        .route("/api/v1/parcels/{id}/cancel", post(parcels::cancel))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
