//! Test identifier generator with predictable output.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use parcelflow_core::ids::IdGenerator;
use uuid::Uuid;

/// An `IdGenerator` that hands out a configured sequence of parcel ids
/// (falling back to fresh v4 ids when exhausted) and numbered reference
/// codes `CUST-TEST-1`, `CUST-TEST-2`, …
#[derive(Debug, Default)]
pub struct SequenceIds {
    parcel_ids: Mutex<Vec<Uuid>>,
    reference_counter: AtomicU64,
}

impl SequenceIds {
    /// Creates a generator that yields `parcel_ids` in order.
    #[must_use]
    pub fn new(parcel_ids: Vec<Uuid>) -> Self {
        let mut ids = parcel_ids;
        ids.reverse();
        Self {
            parcel_ids: Mutex::new(ids),
            reference_counter: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequenceIds {
    fn parcel_id(&self) -> Uuid {
        self.parcel_ids
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(Uuid::new_v4)
    }

    fn party_reference(&self) -> String {
        let n = self.reference_counter.fetch_add(1, Ordering::SeqCst) + 1;
        format!("CUST-TEST-{n}")
    }
}
