//! Parcelflow — PostgreSQL store implementations.
//!
//! Implements the store traits from `parcelflow-core` over a shared
//! connection pool. Parcel status writes and their ledger appends commit in
//! one transaction.

pub mod pg_parcel_store;
pub mod pg_party_store;
pub mod pg_tracking_ledger;
pub mod schema;

mod rows;
