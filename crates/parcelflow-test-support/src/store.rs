//! Test stores — an in-memory implementation of all three store traits and
//! an always-failing parcel store.
//!
//! `InMemoryStore` backs `ParcelStore`, `PartyStore` and `TrackingLedger`
//! with the same shared state, so the atomic parcel-plus-ledger writes and
//! `history` reads agree the way the Postgres implementation's shared pool
//! does.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use parcelflow_core::error::DomainError;
use parcelflow_core::model::{Parcel, Party, TrackingEvent};
use parcelflow_core::store::{ParcelStore, PartyStore, TrackingLedger};
use uuid::Uuid;

/// In-memory store for parcels, parties and tracking events.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    parcels: Arc<Mutex<HashMap<Uuid, Parcel>>>,
    parties: Arc<Mutex<Vec<Party>>>,
    events: Arc<Mutex<Vec<TrackingEvent>>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of parcels currently stored.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn parcel_count(&self) -> usize {
        self.parcels.lock().unwrap().len()
    }

    /// Snapshot of all parties created so far, in insertion order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn parties(&self) -> Vec<Party> {
        self.parties.lock().unwrap().clone()
    }

    /// Snapshot of all tracking events appended so far, in append order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn all_events(&self) -> Vec<TrackingEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl ParcelStore for InMemoryStore {
    async fn find_by_id(&self, parcel_id: Uuid) -> Result<Option<Parcel>, DomainError> {
        Ok(self.parcels.lock().unwrap().get(&parcel_id).cloned())
    }

    async fn find_by_edi_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Parcel>, DomainError> {
        Ok(self
            .parcels
            .lock()
            .unwrap()
            .values()
            .find(|p| p.edi_reference.as_deref() == Some(reference))
            .cloned())
    }

    async fn insert(
        &self,
        parcel: &Parcel,
        first_event: &TrackingEvent,
    ) -> Result<(), DomainError> {
        self.parcels
            .lock()
            .unwrap()
            .insert(parcel.id, parcel.clone());
        self.events.lock().unwrap().push(first_event.clone());
        Ok(())
    }

    async fn update(&self, parcel: &Parcel, event: &TrackingEvent) -> Result<(), DomainError> {
        self.parcels
            .lock()
            .unwrap()
            .insert(parcel.id, parcel.clone());
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

#[async_trait]
impl PartyStore for InMemoryStore {
    async fn find_by_reference_code(&self, code: &str) -> Result<Option<Party>, DomainError> {
        Ok(self
            .parties
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.reference_code.as_deref() == Some(code))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Party>, DomainError> {
        Ok(self
            .parties
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.email == email)
            .cloned())
    }

    async fn insert(&self, party: &Party) -> Result<(), DomainError> {
        self.parties.lock().unwrap().push(party.clone());
        Ok(())
    }
}

#[async_trait]
impl TrackingLedger for InMemoryStore {
    async fn append(&self, event: &TrackingEvent) -> Result<(), DomainError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn history(&self, parcel_id: Uuid) -> Result<Vec<TrackingEvent>, DomainError> {
        let mut events: Vec<TrackingEvent> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.parcel_id == parcel_id)
            .cloned()
            .collect();
        // Stable ascending sort then reverse, so events sharing a timestamp
        // come back newest-appended first per the trait's "newest first".
        events.sort_by(|a, b| a.event_timestamp.cmp(&b.event_timestamp));
        events.reverse();
        Ok(events)
    }
}

/// A parcel store that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingParcelStore;

#[async_trait]
impl ParcelStore for FailingParcelStore {
    async fn find_by_id(&self, _parcel_id: Uuid) -> Result<Option<Parcel>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn find_by_edi_reference(
        &self,
        _reference: &str,
    ) -> Result<Option<Parcel>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn insert(
        &self,
        _parcel: &Parcel,
        _first_event: &TrackingEvent,
    ) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn update(&self, _parcel: &Parcel, _event: &TrackingEvent) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
