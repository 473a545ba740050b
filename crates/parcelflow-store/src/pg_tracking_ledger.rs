//! PostgreSQL implementation of the `TrackingLedger` trait.
//!
//! Inserts only; the table carries no UPDATE or DELETE path.

use async_trait::async_trait;
use parcelflow_core::error::DomainError;
use parcelflow_core::model::TrackingEvent;
use parcelflow_core::store::TrackingLedger;
use sqlx::PgPool;
use uuid::Uuid;

use crate::rows::{infra, tracking_event_from_row};

/// PostgreSQL-backed tracking ledger.
#[derive(Debug, Clone)]
pub struct PgTrackingLedger {
    pool: PgPool,
}

impl PgTrackingLedger {
    /// Creates a new `PgTrackingLedger` over a shared pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrackingLedger for PgTrackingLedger {
    async fn append(&self, event: &TrackingEvent) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO tracking_events (
                id, parcel_id, event_type, description, location,
                vehicle_id, driver_name, event_timestamp, recorded_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(event.id)
        .bind(event.parcel_id)
        .bind(event.event_type.as_str())
        .bind(&event.description)
        .bind(&event.location)
        .bind(&event.vehicle_id)
        .bind(&event.driver_name)
        .bind(event.event_timestamp)
        .bind(event.recorded_at)
        .execute(&self.pool)
        .await
        .map_err(infra)?;
        Ok(())
    }

    async fn history(&self, parcel_id: Uuid) -> Result<Vec<TrackingEvent>, DomainError> {
        let rows = sqlx::query(
            "SELECT id, parcel_id, event_type, description, location,
                    vehicle_id, driver_name, event_timestamp, recorded_at
             FROM tracking_events
             WHERE parcel_id = $1
             ORDER BY event_timestamp DESC",
        )
        .bind(parcel_id)
        .fetch_all(&self.pool)
        .await
        .map_err(infra)?;
        rows.iter().map(tracking_event_from_row).collect()
    }
}
