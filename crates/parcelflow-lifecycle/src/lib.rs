//! Parcelflow — parcel lifecycle bounded context.
//!
//! Responsible for applying carrier-reported status transitions, customer
//! cancellation, and the tracking history query.

pub mod application;
pub mod domain;
