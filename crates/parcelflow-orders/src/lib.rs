//! Parcelflow — order ingestion bounded context.
//!
//! Responsible for validating inbound order payloads, resolving sender and
//! recipient parties, and registering new parcels.

pub mod application;
pub mod domain;
