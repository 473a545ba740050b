//! PostgreSQL implementation of the `ParcelStore` trait.

use async_trait::async_trait;
use parcelflow_core::error::DomainError;
use parcelflow_core::model::{Parcel, TrackingEvent};
use parcelflow_core::store::ParcelStore;
use sqlx::PgPool;
use uuid::Uuid;

use crate::rows::{infra, parcel_from_row};

const SELECT_PARCEL: &str = "
SELECT id, edi_reference, sender_id, recipient_id,
       pickup_street, pickup_city, pickup_postal_code, pickup_country,
       delivery_street, delivery_city, delivery_postal_code, delivery_country,
       description, weight_kg, dimensions, priority, status,
       estimated_delivery_date, actual_delivery_date, created_at, updated_at
FROM parcels
";

const INSERT_PARCEL: &str = "
INSERT INTO parcels (
    id, edi_reference, sender_id, recipient_id,
    pickup_street, pickup_city, pickup_postal_code, pickup_country,
    delivery_street, delivery_city, delivery_postal_code, delivery_country,
    description, weight_kg, dimensions, priority, status,
    estimated_delivery_date, actual_delivery_date, created_at, updated_at
) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
          $13, $14, $15, $16, $17, $18, $19, $20, $21)
";

const UPDATE_PARCEL: &str = "
UPDATE parcels
SET status = $2, actual_delivery_date = $3, updated_at = $4
WHERE id = $1
";

const INSERT_TRACKING_EVENT: &str = "
INSERT INTO tracking_events (
    id, parcel_id, event_type, description, location,
    vehicle_id, driver_name, event_timestamp, recorded_at
) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
";

/// PostgreSQL-backed parcel store.
#[derive(Debug, Clone)]
pub struct PgParcelStore {
    pool: PgPool,
}

impl PgParcelStore {
    /// Creates a new `PgParcelStore` over a shared pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn bind_tracking_event<'q>(
    query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    event: &'q TrackingEvent,
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    query
        .bind(event.id)
        .bind(event.parcel_id)
        .bind(event.event_type.as_str())
        .bind(&event.description)
        .bind(&event.location)
        .bind(&event.vehicle_id)
        .bind(&event.driver_name)
        .bind(event.event_timestamp)
        .bind(event.recorded_at)
}

#[async_trait]
impl ParcelStore for PgParcelStore {
    async fn find_by_id(&self, parcel_id: Uuid) -> Result<Option<Parcel>, DomainError> {
        let row = sqlx::query(&format!("{SELECT_PARCEL} WHERE id = $1"))
            .bind(parcel_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(infra)?;
        row.as_ref().map(parcel_from_row).transpose()
    }

    async fn find_by_edi_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Parcel>, DomainError> {
        let row = sqlx::query(&format!("{SELECT_PARCEL} WHERE edi_reference = $1"))
            .bind(reference)
            .fetch_optional(&self.pool)
            .await
            .map_err(infra)?;
        row.as_ref().map(parcel_from_row).transpose()
    }

    async fn insert(
        &self,
        parcel: &Parcel,
        first_event: &TrackingEvent,
    ) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(infra)?;

        sqlx::query(INSERT_PARCEL)
            .bind(parcel.id)
            .bind(&parcel.edi_reference)
            .bind(parcel.sender_id)
            .bind(parcel.recipient_id)
            .bind(&parcel.pickup_address.street)
            .bind(&parcel.pickup_address.city)
            .bind(&parcel.pickup_address.postal_code)
            .bind(&parcel.pickup_address.country)
            .bind(&parcel.delivery_address.street)
            .bind(&parcel.delivery_address.city)
            .bind(&parcel.delivery_address.postal_code)
            .bind(&parcel.delivery_address.country)
            .bind(&parcel.details.description)
            .bind(parcel.details.weight_kg)
            .bind(&parcel.details.dimensions)
            .bind(parcel.priority.as_str())
            .bind(parcel.status.as_str())
            .bind(parcel.estimated_delivery_date)
            .bind(parcel.actual_delivery_date)
            .bind(parcel.created_at)
            .bind(parcel.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(infra)?;

        bind_tracking_event(sqlx::query(INSERT_TRACKING_EVENT), first_event)
            .execute(&mut *tx)
            .await
            .map_err(infra)?;

        tx.commit().await.map_err(infra)
    }

    async fn update(&self, parcel: &Parcel, event: &TrackingEvent) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(infra)?;

        sqlx::query(UPDATE_PARCEL)
            .bind(parcel.id)
            .bind(parcel.status.as_str())
            .bind(parcel.actual_delivery_date)
            .bind(parcel.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(infra)?;

        bind_tracking_event(sqlx::query(INSERT_TRACKING_EVENT), event)
            .execute(&mut *tx)
            .await
            .map_err(infra)?;

        tx.commit().await.map_err(infra)
    }
}
