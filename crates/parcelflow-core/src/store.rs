//! Store abstractions — the durable record of parcels, parties and the
//! tracking ledger.
//!
//! `ParcelStore::insert` and `ParcelStore::update` take the accompanying
//! tracking event so implementations can write the parcel row and the ledger
//! row in one unit of work. A reader must never observe a status change
//! without its ledger entry, or vice versa.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DomainError;
use crate::model::{Parcel, Party, TrackingEvent};

/// Repository for parcels; single source of truth for current parcel state.
#[async_trait]
pub trait ParcelStore: Send + Sync {
    /// Load a parcel by identifier.
    async fn find_by_id(&self, parcel_id: Uuid) -> Result<Option<Parcel>, DomainError>;

    /// Load a parcel by its external EDI reference, for idempotent lookup.
    async fn find_by_edi_reference(&self, reference: &str)
    -> Result<Option<Parcel>, DomainError>;

    /// Persist a new parcel together with its first tracking event, in one
    /// unit of work.
    async fn insert(&self, parcel: &Parcel, first_event: &TrackingEvent)
    -> Result<(), DomainError>;

    /// Persist a status change together with its tracking event, in one unit
    /// of work.
    async fn update(&self, parcel: &Parcel, event: &TrackingEvent) -> Result<(), DomainError>;
}

/// Repository for sender/recipient contact records.
#[async_trait]
pub trait PartyStore: Send + Sync {
    /// Look up a party by its customer reference code.
    async fn find_by_reference_code(&self, code: &str) -> Result<Option<Party>, DomainError>;

    /// Look up a party by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Party>, DomainError>;

    /// Persist a new party.
    async fn insert(&self, party: &Party) -> Result<(), DomainError>;
}

/// Append-only, per-parcel ordered log of tracking events.
#[async_trait]
pub trait TrackingLedger: Send + Sync {
    /// Append one entry. Pure insert; fails only on infrastructure errors.
    async fn append(&self, event: &TrackingEvent) -> Result<(), DomainError>;

    /// All entries for a parcel, newest first. Re-queryable, not a live
    /// subscription.
    async fn history(&self, parcel_id: Uuid) -> Result<Vec<TrackingEvent>, DomainError>;
}
