//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ServiceError (storefront-orders) ← Classified, logged                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ErrorResponse { code, message } ← generic text for storage failures   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Business outcomes (insufficient stock, an order that is no longer
//! pending) are not errors at this layer: repositories report them as
//! values and the service layer turns them into `CoreError`s.

use sqlx::error::ErrorKind;
use thiserror::Error;

/// Database operation errors.
///
/// Constraint failures are told apart so the service layer can classify
/// them; everything else carries the driver message for the logs.
#[derive(Debug, Error)]
pub enum DbError {
    /// A row the caller expected is not there.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// UNIQUE constraint, e.g. a second product with the same SKU.
    #[error("Duplicate value for {column}")]
    UniqueViolation { column: String },

    /// FOREIGN KEY constraint, e.g. a payment for an order id that does
    /// not exist.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// The database file could not be opened or the pool is closed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Any other statement failure: CHECK constraints, SQL errors,
    /// `SQLITE_BUSY` past the busy timeout.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Begin, commit, or rollback failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// No connection became free within the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// RowNotFound                       → NotFound
/// Database, kind UniqueViolation    → UniqueViolation { column }
/// Database, kind ForeignKeyViolation→ ForeignKeyViolation
/// Database, any other kind          → QueryFailed
/// PoolTimedOut                      → PoolExhausted
/// PoolClosed                        → ConnectionFailed
/// Other                             → Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Row", "?"),

            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation => {
                    // SQLite reports "UNIQUE constraint failed: products.sku"
                    let column = db_err
                        .message()
                        .rsplit(": ")
                        .next()
                        .unwrap_or_default()
                        .to_string();
                    DbError::UniqueViolation { column }
                }
                ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation {
                    message: db_err.message().to_string(),
                },
                _ => DbError::QueryFailed(db_err.message().to_string()),
            },

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[test]
    fn test_pool_errors() {
        assert!(matches!(
            DbError::from(sqlx::Error::PoolTimedOut),
            DbError::PoolExhausted
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::PoolClosed),
            DbError::ConnectionFailed(_)
        ));
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(DbError::not_found("Order", 42).to_string(), "Order not found: 42");
    }
}
