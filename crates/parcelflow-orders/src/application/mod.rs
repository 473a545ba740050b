//! Application services for the order ingestion context.

pub mod register;
pub mod resolve;
pub mod validate;
