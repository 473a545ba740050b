//! Domain types for the lifecycle context.

pub mod transitions;
