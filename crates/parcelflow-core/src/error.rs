//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

use crate::model::ParcelStatus;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A parcel was not found.
    #[error("parcel not found: {0}")]
    NotFound(Uuid),

    /// A validation error in an inbound order payload.
    #[error("validation error: {0}")]
    Validation(String),

    /// An operation was rejected because the parcel is in the wrong state.
    #[error("operation not permitted while parcel is {current_status}")]
    Precondition {
        /// The parcel's current status at the time of the rejection.
        current_status: ParcelStatus,
    },

    /// An infrastructure/persistence/transport error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Machine-readable error kind, used in API bodies and consumer logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation_error",
            Self::Precondition { .. } => "precondition_failed",
            Self::Infrastructure(_) => "infrastructure_error",
        }
    }

    /// Whether a message consumer should request redelivery for this error.
    ///
    /// Only infrastructure errors are transient; the other kinds can never
    /// succeed on retry and must be acknowledged.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Infrastructure(_))
    }
}
