//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)        Stored row fails validation          │
//! │       │                                     │                           │
//! │       ▼                                     ▼                           │
//! │  DbError (this module) ◄──────── DbError::InvalidRow                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in storefront) ← code + message + retryable                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Failures from the storefront's data layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// No row with this id, or it belongs to another user.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A UNIQUE index rejected the write (duplicate food or order id).
    #[error("{field} '{value}' is already taken")]
    UniqueViolation { field: String, value: String },

    /// A cart line pointed at a food that isn't in `foods`.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    #[error("Could not open database: {0}")]
    ConnectionFailed(String),

    #[error("Schema migration failed: {0}")]
    MigrationFailed(String),

    /// SQLite rejected the statement (CHECK constraint, syntax, locked file).
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// BEGIN or COMMIT failed; the transaction was rolled back.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// No connection became free within the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// A stored row doesn't satisfy the domain invariants.
    ///
    /// ## When This Occurs
    /// - A money column holds text that isn't a decimal
    /// - `discount_percent` outside 0-100, negative price or fee
    /// - An order's item JSON doesn't parse
    #[error("Invalid {entity} row {id}: {reason}")]
    InvalidRow {
        entity: String,
        id: String,
        reason: String,
    },

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// A row that parsed but failed validation; `reason` is usually a
    /// `ValidationError` or a decimal parse error.
    pub fn invalid_row(
        entity: impl Into<String>,
        id: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        DbError::InvalidRow {
            entity: entity.into(),
            id: id.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns true for failures worth retrying (pool pressure, lost connection).
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DbError::PoolExhausted | DbError::ConnectionFailed(_) | DbError::TransactionFailed(_)
        )
    }
}

/// ```text
/// RowNotFound                      → NotFound
/// Database("UNIQUE constraint…")   → UniqueViolation { field: table.column }
/// Database("FOREIGN KEY …")        → ForeignKeyViolation
/// Database(other)                  → QueryFailed
/// ColumnDecode                     → InvalidRow
/// PoolTimedOut / PoolClosed        → PoolExhausted / ConnectionFailed
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Row", "unknown"),

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                if let Some(field) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    DbError::UniqueViolation {
                        field: field.to_string(),
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::ColumnDecode { index, source } => DbError::InvalidRow {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
                reason: format!("column {index}: {source}"),
            },

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;
