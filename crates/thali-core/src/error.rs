//! # Error Types
//!
//! Domain-specific error types for thali-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  thali-core errors (this file)                                         │
//! │  ├── CoreError        - Pricing / cart / checkout rule violations      │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  thali-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  storefront errors (in app)                                            │
//! │  └── ApiError         - What the customer sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → notification           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Pricing or record input failed validation.
    ///
    /// ## When This Occurs
    /// - Quantity below 1 handed to the pricing engine
    /// - Discount outside 0-100, negative price, fee or tax rate
    /// - A catalog row with out-of-range fields
    /// - Amounts so large that pricing them overflows
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// Food exists but is not currently offered.
    #[error("{name} is not available right now")]
    FoodUnavailable { name: String },

    /// Checkout was attempted with nothing in the cart.
    #[error("No items in cart")]
    EmptyCart,

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when input doesn't meet requirements.
/// Raised at the record boundary before any pricing runs.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Integer value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Decimal amount or rate below zero.
    #[error("{field} cannot be negative (got {value})")]
    Negative { field: String, value: Decimal },

    /// Percentage outside 0-100.
    #[error("{field} must be between 0 and 100 (got {value})")]
    PercentOutOfRange { field: String, value: Decimal },

    /// Invalid format (e.g., a phone number with letters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Arithmetic on the value left the representable decimal range.
    #[error("{field} is too large to compute")]
    Overflow { field: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_messages() {
        let err = CoreError::QuantityTooLarge {
            requested: 1000,
            max: 999,
        };
        assert_eq!(err.to_string(), "Quantity 1000 exceeds maximum allowed (999)");

        let err = CoreError::FoodUnavailable {
            name: "Masala Dosa".to_string(),
        };
        assert_eq!(err.to_string(), "Masala Dosa is not available right now");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::PercentOutOfRange {
            field: "discount_percent".to_string(),
            value: dec!(120),
        };
        assert_eq!(
            err.to_string(),
            "discount_percent must be between 0 and 100 (got 120)"
        );

        let err = ValidationError::Negative {
            field: "base_price".to_string(),
            value: dec!(-1.50),
        };
        assert_eq!(err.to_string(), "base_price cannot be negative (got -1.50)");
    }

    #[test]
    fn test_validation_converts_to_invalid_input() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::InvalidInput(_)));
        assert_eq!(core_err.to_string(), "Invalid input: quantity must be positive");
    }
}
