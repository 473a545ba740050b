//! Parcelflow — messaging infrastructure.
//!
//! The inbound event router maps order-submission and carrier-status
//! messages to domain operations; the Kafka transport provides at-least-once
//! consumption with per-parcel ordering (partition key = parcel id) and the
//! production `EventPublisher`.

pub mod carrier;
pub mod kafka;
pub mod router;
