//! # API Error Type
//!
//! Unified error type for storefront services.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront                         │
//! │                                                                         │
//! │  CartService::add_to_cart                                               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  No session? ───────────── ApiError::unauthenticated ("Please login")   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Database Error? ─── DbError::PoolExhausted ──┐                         │
//! │         │                                     │                         │
//! │         ▼                                     ▼                         │
//! │  Policy Error? ─── CoreError::FoodUnavailable ── ApiError ──► caller    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Success ─────────────────────────────────────────────────► caller      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Serialization
//! ```json
//! {
//!   "code": "UNAVAILABLE",
//!   "message": "Masala Dosa is not available right now",
//!   "retryable": false
//! }
//! ```

use serde::Serialize;
use thali_core::{CoreError, ValidationError};
use thali_db::DbError;

/// Error returned from storefront services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Whether the same call may succeed if simply retried
    pub retryable: bool,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No signed-in user
    Unauthenticated,

    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Food is off the menu
    Unavailable,

    /// Checkout with nothing in the cart
    EmptyCart,

    /// Cart limit reached
    CartError,

    /// Database operation failed
    DatabaseError,

    /// Stored data failed validation
    InvalidData,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new, non-retryable API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            retryable: false,
        }
    }

    /// Marks the error as retryable.
    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }

    /// The user must sign in first.
    pub fn unauthenticated() -> Self {
        ApiError::new(ErrorCode::Unauthenticated, "Please login")
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        let retryable = err.is_transient();
        let api = match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => {
                ApiError::validation(format!("{} '{}' already exists", field, value))
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::InvalidRow { entity, id, reason } => {
                tracing::error!(entity = %entity, id = %id, reason = %reason, "Rejected stored row");
                ApiError::new(ErrorCode::InvalidData, format!("{} {} has invalid data", entity, id))
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        };

        ApiError { retryable, ..api }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidInput(e) => ApiError::from(e),
            CoreError::FoodUnavailable { .. } => {
                ApiError::new(ErrorCode::Unavailable, err.to_string())
            }
            CoreError::EmptyCart => ApiError::new(ErrorCode::EmptyCart, err.to_string()),
            CoreError::CartTooLarge { .. } => ApiError::new(ErrorCode::CartError, err.to_string()),
            CoreError::QuantityTooLarge { .. } => ApiError::validation(err.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for storefront services.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthenticated() {
        let err = ApiError::unauthenticated();
        assert_eq!(err.code, ErrorCode::Unauthenticated);
        assert_eq!(err.message, "Please login");
        assert!(!err.retryable);
    }

    #[test]
    fn test_db_errors_carry_retryable() {
        let err = ApiError::from(DbError::PoolExhausted);
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.retryable);

        let err = ApiError::from(DbError::not_found("Food", "f-1"));
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Food not found: f-1");
        assert!(!err.retryable);

        let err = ApiError::from(DbError::invalid_row("Food", "f-1", "bad"));
        assert_eq!(err.code, ErrorCode::InvalidData);
    }

    #[test]
    fn test_core_errors() {
        assert_eq!(ApiError::from(CoreError::EmptyCart).code, ErrorCode::EmptyCart);
        assert_eq!(
            ApiError::from(CoreError::FoodUnavailable {
                name: "Masala Dosa".to_string()
            })
            .message,
            "Masala Dosa is not available right now"
        );

        let err = ApiError::from(CoreError::InvalidInput(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }));
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "quantity must be positive");
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ApiError::unauthenticated()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "code": "UNAUTHENTICATED",
                "message": "Please login",
                "retryable": false
            })
        );
    }
}
