//! Domain types for the order ingestion context.

pub mod order;
