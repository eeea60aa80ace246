//! Error types shared by the services
//!
//! `DatabaseError` covers bootstrap failures (configuration, connection,
//! migrations). `StoreError` is what repositories hand back to the service
//! layer once the pool is up.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Errors raised while configuring or connecting to the database
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Errors returned by repository operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// The addressed record does not exist
    #[error("Record not found")]
    NotFound,

    /// A unique constraint rejected the write
    #[error("Conflicting record: {0}")]
    Conflict(String),

    /// Any other failure reported by the driver
    #[error("Store query error: {0}")]
    Query(#[source] SqlxError),
}

impl From<SqlxError> for StoreError {
    fn from(err: SqlxError) -> Self {
        match err {
            SqlxError::RowNotFound => StoreError::NotFound,
            SqlxError::Database(ref db) if db.is_unique_violation() => {
                StoreError::Conflict(db.constraint().unwrap_or("unique").to_string())
            }
            other => StoreError::Query(other),
        }
    }
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;
