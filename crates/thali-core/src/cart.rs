//! # Cart Policy
//!
//! Quantity rules applied before a cart row is written.
//!
//! ```text
//!  [-]  1  [+]      decrement at 1 → stays 1 (no-op, never 0)
//!  [-]  5  [+]      increment at 999 → QuantityTooLarge
//! ```
//!
//! Removing a line is an explicit action, never a side effect of
//! decrementing.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::FoodItem;
use crate::validation;
use crate::MAX_ITEM_QUANTITY;

/// A single +/- press on a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityAdjustment {
    Increment,
    Decrement,
}

/// Returns the quantity after one adjustment.
///
/// Decrement floors at 1. Increment past [`MAX_ITEM_QUANTITY`] fails.
///
/// ## Example
/// ```rust
/// use thali_core::cart::{adjust_quantity, QuantityAdjustment};
///
/// assert_eq!(adjust_quantity(1, QuantityAdjustment::Decrement).unwrap(), 1);
/// assert_eq!(adjust_quantity(3, QuantityAdjustment::Decrement).unwrap(), 2);
/// assert_eq!(adjust_quantity(3, QuantityAdjustment::Increment).unwrap(), 4);
/// ```
pub fn adjust_quantity(current: i64, adjustment: QuantityAdjustment) -> CoreResult<i64> {
    validation::validate_min_quantity(current)?;

    match adjustment {
        QuantityAdjustment::Decrement => Ok((current - 1).max(1)),
        QuantityAdjustment::Increment => {
            let next = current + 1;
            if next > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: next,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            Ok(next)
        }
    }
}

/// Checks that a food can go into the cart with this quantity.
///
/// ## Rules
/// - the food row is valid and currently available
/// - `1 ≤ quantity ≤ 999`
/// - a new line must fit in the cart (`existing_lines` < 100); replacing the
///   quantity of a line already in the cart is always allowed
pub fn check_add_to_cart(
    food: &FoodItem,
    quantity: i64,
    existing_lines: usize,
    already_in_cart: bool,
) -> CoreResult<()> {
    food.validate()?;

    if !food.is_available {
        return Err(CoreError::FoodUnavailable {
            name: food.name.clone(),
        });
    }

    if quantity > MAX_ITEM_QUANTITY {
        return Err(CoreError::QuantityTooLarge {
            requested: quantity,
            max: MAX_ITEM_QUANTITY,
        });
    }
    validation::validate_quantity(quantity)?;

    if !already_in_cart && validation::validate_cart_size(existing_lines).is_err() {
        return Err(CoreError::CartTooLarge {
            max: crate::MAX_CART_ITEMS,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{Money, Percentage};

    fn dosa(available: bool) -> FoodItem {
        FoodItem {
            id: "f-dosa".to_string(),
            name: "Masala Dosa".to_string(),
            description: String::new(),
            category: "South Indian".to_string(),
            image_url: None,
            base_price: Money::from_rupees(120),
            discount_percent: Percentage::zero(),
            gst_percent: Percentage::from_whole(5),
            delivery_charge: Money::from_rupees(25),
            is_available: available,
        }
    }

    #[test]
    fn test_decrement_floors_at_one() {
        assert_eq!(adjust_quantity(1, QuantityAdjustment::Decrement).unwrap(), 1);
        assert_eq!(adjust_quantity(2, QuantityAdjustment::Decrement).unwrap(), 1);
    }

    #[test]
    fn test_increment_caps() {
        assert_eq!(adjust_quantity(998, QuantityAdjustment::Increment).unwrap(), 999);
        assert!(matches!(
            adjust_quantity(999, QuantityAdjustment::Increment),
            Err(CoreError::QuantityTooLarge { requested: 1000, .. })
        ));

        // A stored line above the cap can still come down
        assert_eq!(adjust_quantity(1200, QuantityAdjustment::Decrement).unwrap(), 1199);
        assert!(adjust_quantity(1200, QuantityAdjustment::Increment).is_err());
    }

    #[test]
    fn test_adjust_rejects_corrupt_quantity() {
        assert!(adjust_quantity(0, QuantityAdjustment::Decrement).is_err());
        assert!(adjust_quantity(-4, QuantityAdjustment::Increment).is_err());
    }

    #[test]
    fn test_check_add_to_cart() {
        assert!(check_add_to_cart(&dosa(true), 2, 0, false).is_ok());

        assert!(matches!(
            check_add_to_cart(&dosa(false), 1, 0, false),
            Err(CoreError::FoodUnavailable { .. })
        ));
        assert!(matches!(
            check_add_to_cart(&dosa(true), 0, 0, false),
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            check_add_to_cart(&dosa(true), 1000, 0, false),
            Err(CoreError::QuantityTooLarge { .. })
        ));
    }

    #[test]
    fn test_full_cart_only_blocks_new_lines() {
        assert!(matches!(
            check_add_to_cart(&dosa(true), 1, 100, false),
            Err(CoreError::CartTooLarge { max: 100 })
        ));
        assert!(check_add_to_cart(&dosa(true), 3, 100, true).is_ok());
    }
}
