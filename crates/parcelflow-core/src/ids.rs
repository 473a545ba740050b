//! Identifier generation.
//!
//! Parcel identifiers are UUID v7 (millisecond timestamp plus random
//! entropy), so identifiers assigned by one process sort in creation order.
//! Party reference codes combine the same clock with a short random suffix.
//! In tests a sequenced implementation is injected.

use chrono::Utc;
use rand::Rng;
use rand::distr::Alphanumeric;
use uuid::{NoContext, Timestamp, Uuid};

/// Abstraction over identifier generation.
pub trait IdGenerator: Send + Sync {
    /// Returns a fresh globally-unique parcel identifier.
    fn parcel_id(&self) -> Uuid;

    /// Returns a fresh customer reference code, e.g. `CUST-1718000000000-A7K2`.
    fn party_reference(&self) -> String;
}

/// Production generator backed by the system clock and thread-local RNG.
#[derive(Debug, Clone, Copy)]
pub struct SystemIdGenerator;

impl IdGenerator for SystemIdGenerator {
    fn parcel_id(&self) -> Uuid {
        let now = Utc::now();
        #[allow(clippy::cast_sign_loss)]
        let ts = Timestamp::from_unix(
            NoContext,
            now.timestamp() as u64,
            now.timestamp_subsec_nanos(),
        );
        Uuid::new_v7(ts)
    }

    fn party_reference(&self) -> String {
        let suffix: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(4)
            .map(|b| char::from(b).to_ascii_uppercase())
            .collect();
        format!("CUST-{}-{suffix}", Utc::now().timestamp_millis())
    }
}
