//! # Validation Module
//!
//! Input validation utilities for the storefront.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Row boundary (thali-db)                                      │
//! │  ├── Decimal text parses                                               │
//! │  └── FoodItem::validate / CartLine::validate (THIS MODULE)             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Pricing engine                                               │
//! │  └── quantity ≥ 1, rates and amounts in range (THIS MODULE)            │
//! │      arithmetic overflow → ValidationError::Overflow                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK (quantity >= 1)                                  │
//! │  └── UNIQUE (user_id, food_id)                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use thali_core::validation::{validate_discount_percent, validate_quantity};
//! use thali_core::Percentage;
//!
//! assert!(validate_quantity(2).is_ok());
//! assert!(validate_discount_percent(Percentage::from_whole(101)).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::{Money, Percentage};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_PHONE_LEN: usize = 20;
const MAX_ADDRESS_LEN: usize = 500;
const MAX_QUERY_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

/// Rejects empty or whitespace-only values.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn validate_bounded(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();
    validate_required(field, value)?;
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(value.to_string())
}

/// Validates a food name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_food_name(name: &str) -> ValidationResult<()> {
    validate_bounded("name", name, MAX_NAME_LEN).map(|_| ())
}

/// Validates the customer's full name; returns it trimmed.
pub fn validate_full_name(name: &str) -> ValidationResult<String> {
    validate_bounded("full_name", name, MAX_NAME_LEN)
}

/// Validates a phone number; returns it trimmed.
///
/// ## Rules
/// - Must not be empty, at most 20 characters
/// - Digits, spaces, `+` and `-` only
///
/// ## Example
/// ```rust
/// use thali_core::validation::validate_phone;
///
/// assert_eq!(validate_phone(" +91 98765-43210 ").unwrap(), "+91 98765-43210");
/// assert!(validate_phone("call me").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<String> {
    let phone = validate_bounded("phone", phone, MAX_PHONE_LEN)?;

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c == ' ')
    {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, spaces, '+' and '-'".to_string(),
        });
    }

    Ok(phone)
}

/// Validates a delivery address; returns it trimmed.
pub fn validate_address(address: &str) -> ValidationResult<String> {
    validate_bounded("delivery_address", address, MAX_ADDRESS_LEN)
}

/// Validates a menu search query.
///
/// ## Rules
/// - Can be empty (returns the full menu)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## Flow
/// ```text
/// add to cart (qty: 0) ──► validate_quantity ──► "quantity must be positive"
/// add to cart (qty: 2) ──► validate_quantity ──► OK → upsert cart row
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    validate_min_quantity(qty)?;

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Quantity floor only, for lines being priced or read back from storage.
///
/// The 999 cap belongs to cart entry ([`validate_quantity`]); a stored line
/// above it still prices.
pub fn validate_min_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a rupee amount (price or fee).
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free delivery, complimentary items)
///
/// ## Example
/// ```rust
/// use thali_core::validation::validate_amount;
/// use thali_core::Money;
///
/// assert!(validate_amount("base_price", Money::from_rupees(0)).is_ok());
/// assert!(validate_amount("base_price", Money::from_paise(-100)).is_err());
/// ```
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
            value: amount.amount(),
        });
    }

    Ok(())
}

/// Validates a discount rate.
///
/// ## Rules
/// - Must be between 0 and 100 inclusive
pub fn validate_discount_percent(pct: Percentage) -> ValidationResult<()> {
    if pct.value() < Decimal::ZERO || pct.value() > Decimal::ONE_HUNDRED {
        return Err(ValidationError::PercentOutOfRange {
            field: "discount_percent".to_string(),
            value: pct.value(),
        });
    }

    Ok(())
}

/// Validates a GST rate.
///
/// ## Rules
/// - Must be non-negative; there is no upper bound on tax
pub fn validate_gst_percent(pct: Percentage) -> ValidationResult<()> {
    if pct.value() < Decimal::ZERO {
        return Err(ValidationError::Negative {
            field: "gst_percent".to_string(),
            value: pct.value(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates cart size before adding a new line.
///
/// ## Rules
/// - Must not exceed MAX_CART_ITEMS (100)
pub fn validate_cart_size(current_lines: usize) -> ValidationResult<()> {
    if current_lines >= MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: MAX_CART_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
