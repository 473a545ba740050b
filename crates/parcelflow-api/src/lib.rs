//! Parcelflow HTTP API — routes, state and error mapping.

pub mod error;
pub mod routes;
pub mod state;
