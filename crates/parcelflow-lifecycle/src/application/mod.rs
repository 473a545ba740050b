//! Application services for the lifecycle context.

pub mod tracking;
pub mod transition;
