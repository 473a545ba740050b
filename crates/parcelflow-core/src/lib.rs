//! Parcelflow Core — shared domain model and abstractions.
//!
//! This crate defines the parcel domain model, the store traits that all
//! other crates depend on, and the outbound event envelope. It contains no
//! infrastructure code.

pub mod channels;
pub mod clock;
pub mod error;
pub mod events;
pub mod ids;
pub mod model;
pub mod publisher;
pub mod store;
