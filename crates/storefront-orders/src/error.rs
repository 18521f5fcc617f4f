//! # Service Error Type
//!
//! Unified error type for every storefront operation.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Storefront Orders                      │
//! │                                                                         │
//! │  HTTP layer (out of tree)          Services                             │
//! │  ────────────────────────          ────────                             │
//! │                                                                         │
//! │  POST /orders                                                           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Checkout::place_order → ServiceResult<Order>                   │  │
//! │  │         │                                                        │  │
//! │  │  Business rule? ── CoreError::InsufficientStock ──┐             │  │
//! │  │         │                                         ▼             │  │
//! │  │  Storage?  ─────── DbError::QueryFailed ─── ServiceError        │  │
//! │  └──────────────────────────────────────────────────┬──────────────┘  │
//! │                                                     │                  │
//! │         kind() → Conflict → 409                     │                  │
//! │         to_response() → { "code": "CONFLICT", "message": "…" }         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Domain errors are surfaced verbatim. Storage errors are logged with
//! their detail and surfaced with a generic message.

use serde::Serialize;
use storefront_core::{CoreError, ValidationError};
use storefront_db::DbError;
use thiserror::Error;

/// Error returned by every service operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A business rule rejected the request.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// The store failed. Any open transaction has been rolled back.
    #[error(transparent)]
    Storage(#[from] DbError),
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Domain(CoreError::Validation(err))
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Stable classification the HTTP layer maps to a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Malformed input (400)
    Validation,

    /// Referenced product or order does not exist (404)
    NotFound,

    /// Requester may not touch this resource (403)
    Authorization,

    /// Request is well-formed but conflicts with current state (409)
    Conflict,

    /// Storage failure (500)
    Dependency,
}

impl ErrorKind {
    /// Suggested HTTP status code.
    pub const fn http_status(&self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Authorization => 403,
            ErrorKind::Conflict => 409,
            ErrorKind::Dependency => 500,
        }
    }
}

/// Serializable error body.
///
/// ```json
/// { "code": "CONFLICT", "message": "Insufficient stock for product 7: available 5, requested 6" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub code: ErrorKind,
    pub message: String,
}

impl ServiceError {
    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Domain(err) => match err {
                CoreError::Validation(_)
                | CoreError::InvalidStatus(_)
                | CoreError::AmountOverflow { .. } => ErrorKind::Validation,

                CoreError::ProductNotFound(_)
                | CoreError::OrderNotFound(_)
                | CoreError::CartItemNotFound { .. } => ErrorKind::NotFound,

                CoreError::Unauthorized { .. } => ErrorKind::Authorization,

                CoreError::ProductUnavailable { .. }
                | CoreError::InsufficientStock { .. }
                | CoreError::InvalidTransition { .. }
                | CoreError::OrderNotPayable { .. }
                | CoreError::ConcurrentModification { .. } => ErrorKind::Conflict,
            },
            ServiceError::Storage(err) => match err {
                DbError::NotFound { .. } => ErrorKind::NotFound,
                DbError::UniqueViolation { .. } => ErrorKind::Conflict,
                _ => ErrorKind::Dependency,
            },
        }
    }

    /// Builds the client-facing body, logging storage detail instead of
    /// exposing it.
    pub fn to_response(&self) -> ErrorResponse {
        let kind = self.kind();

        let message = match self {
            ServiceError::Domain(err) => err.to_string(),
            ServiceError::Storage(err) => {
                tracing::error!(error = %err, "Storage failure");
                match kind {
                    ErrorKind::NotFound => "Resource not found".to_string(),
                    ErrorKind::Conflict => "Resource already exists".to_string(),
                    _ => "Internal storage error".to_string(),
                }
            }
        };

        ErrorResponse { code: kind, message }
    }
}
