//! # Storage Error Types
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
//! │  CartStore: logged, recorded, shown as an error toast                  │
//! │  (the in-memory cart keeps the change)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// The store refused the write because it is out of space.
    ///
    /// ## When This Occurs
    /// - Disk full (`SQLITE_FULL`)
    /// - A bounded backend hit its size limit
    #[error("Storage quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Storage can't be used at all right now.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database (full / no space) → DbError::QuotaExceeded
/// sqlx::Error::Database (disk I/O fault)  → DbError::Unavailable
/// sqlx::Error::Database (other)           → DbError::QueryFailed
/// sqlx::Error::PoolTimedOut               → DbError::PoolExhausted
/// sqlx::Error::PoolClosed                 → DbError::Unavailable
/// Other                                   → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => from_database_message(db_err.message()),

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::Unavailable("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

/// Classifies a SQLite error message.
fn from_database_message(msg: &str) -> DbError {
    if msg.contains("database or disk is full") {
        DbError::QuotaExceeded(msg.to_string())
    } else if msg.contains("disk I/O error") {
        DbError::Unavailable(msg.to_string())
    } else {
        DbError::QueryFailed(msg.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for storage operations.
pub type DbResult<T> = Result<T, DbError>;
