//! Row-to-domain mapping helpers shared by the Postgres stores.

use chrono::{DateTime, NaiveDate, Utc};
use parcelflow_core::error::DomainError;
use parcelflow_core::model::{
    Address, Parcel, ParcelDetails, ParcelStatus, Party, Priority, TrackingEvent,
    TrackingEventType,
};
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

pub(crate) fn infra(e: sqlx::Error) -> DomainError {
    DomainError::Infrastructure(e.to_string())
}

fn parse_column<T: std::str::FromStr<Err = String>>(
    row: &PgRow,
    column: &str,
) -> Result<T, DomainError> {
    let raw: String = row.try_get(column).map_err(infra)?;
    raw.parse().map_err(DomainError::Infrastructure)
}

pub(crate) fn parcel_from_row(row: &PgRow) -> Result<Parcel, DomainError> {
    Ok(Parcel {
        id: row.try_get::<Uuid, _>("id").map_err(infra)?,
        edi_reference: row.try_get("edi_reference").map_err(infra)?,
        sender_id: row.try_get("sender_id").map_err(infra)?,
        recipient_id: row.try_get("recipient_id").map_err(infra)?,
        pickup_address: Address {
            street: row.try_get("pickup_street").map_err(infra)?,
            city: row.try_get("pickup_city").map_err(infra)?,
            postal_code: row.try_get("pickup_postal_code").map_err(infra)?,
            country: row.try_get("pickup_country").map_err(infra)?,
        },
        delivery_address: Address {
            street: row.try_get("delivery_street").map_err(infra)?,
            city: row.try_get("delivery_city").map_err(infra)?,
            postal_code: row.try_get("delivery_postal_code").map_err(infra)?,
            country: row.try_get("delivery_country").map_err(infra)?,
        },
        details: ParcelDetails {
            description: row.try_get("description").map_err(infra)?,
            weight_kg: row.try_get("weight_kg").map_err(infra)?,
            dimensions: row.try_get("dimensions").map_err(infra)?,
        },
        priority: parse_column::<Priority>(row, "priority")?,
        status: parse_column::<ParcelStatus>(row, "status")?,
        estimated_delivery_date: row
            .try_get::<Option<NaiveDate>, _>("estimated_delivery_date")
            .map_err(infra)?,
        actual_delivery_date: row
            .try_get::<Option<DateTime<Utc>>, _>("actual_delivery_date")
            .map_err(infra)?,
        created_at: row.try_get("created_at").map_err(infra)?,
        updated_at: row.try_get("updated_at").map_err(infra)?,
    })
}

pub(crate) fn party_from_row(row: &PgRow) -> Result<Party, DomainError> {
    Ok(Party {
        id: row.try_get("id").map_err(infra)?,
        reference_code: row.try_get("reference_code").map_err(infra)?,
        name: row.try_get("name").map_err(infra)?,
        email: row.try_get("email").map_err(infra)?,
        phone: row.try_get("phone").map_err(infra)?,
        created_at: row.try_get("created_at").map_err(infra)?,
    })
}

pub(crate) fn tracking_event_from_row(row: &PgRow) -> Result<TrackingEvent, DomainError> {
    Ok(TrackingEvent {
        id: row.try_get("id").map_err(infra)?,
        parcel_id: row.try_get("parcel_id").map_err(infra)?,
        event_type: parse_column::<TrackingEventType>(row, "event_type")?,
        description: row.try_get("description").map_err(infra)?,
        location: row.try_get("location").map_err(infra)?,
        vehicle_id: row.try_get("vehicle_id").map_err(infra)?,
        driver_name: row.try_get("driver_name").map_err(infra)?,
        event_timestamp: row.try_get("event_timestamp").map_err(infra)?,
        recorded_at: row.try_get("recorded_at").map_err(infra)?,
    })
}
