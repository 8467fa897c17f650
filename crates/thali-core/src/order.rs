//! # Order Snapshot
//!
//! Builds the immutable order written at checkout.
//!
//! ## Snapshot Pattern
//! ```text
//! cart lines (live catalog join)          order (frozen)
//! ┌──────────────────────────────┐        ┌──────────────────────────────┐
//! │ Veg Biryani  ₹250  20%  ×2   │ ─────► │ items: [{name, qty, price,   │
//! │ Lassi        ₹80    0%  ×1   │        │          discount_percent}]  │
//! └──────────────────────────────┘        │ subtotal discount gst        │
//!                                         │ delivery_charge total        │
//!                                         └──────────────────────────────┘
//! A later price change on the menu never touches a placed order.
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::pricing::price_cart;
use crate::types::{CartLine, Order, OrderItem, OrderStatus, PaymentMode, Profile};
use crate::validation;

/// What the customer fills in on the checkout form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CheckoutDetails {
    pub full_name: String,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub payment_mode: PaymentMode,
}

impl CheckoutDetails {
    /// Returns a trimmed copy, or the first field that fails.
    pub fn validated(&self) -> Result<CheckoutDetails, ValidationError> {
        Ok(CheckoutDetails {
            full_name: validation::validate_full_name(&self.full_name)?,
            phone: validation::validate_phone(&self.phone)?,
            address: validation::validate_address(&self.address)?,
            payment_mode: self.payment_mode,
        })
    }

    /// The profile remembered for next checkout.
    pub fn profile_for(&self, user_id: &str) -> Profile {
        Profile {
            id: user_id.to_string(),
            full_name: Some(self.full_name.clone()),
            phone: Some(self.phone.clone()),
            address: Some(self.address.clone()),
        }
    }

    /// Prefills the form from a stored profile; missing fields stay empty.
    pub fn from_profile(profile: &Profile) -> CheckoutDetails {
        CheckoutDetails {
            full_name: profile.full_name.clone().unwrap_or_default(),
            phone: profile.phone.clone().unwrap_or_default(),
            address: profile.address.clone().unwrap_or_default(),
            payment_mode: PaymentMode::default(),
        }
    }
}

/// Freezes each cart line as an order item.
pub fn snapshot_items(lines: &[CartLine]) -> Vec<OrderItem> {
    lines
        .iter()
        .map(|line| OrderItem {
            food_id: line.food_id.clone(),
            name: line.food.name.clone(),
            quantity: line.quantity,
            price: line.food.base_price,
            discount_percent: line.food.discount_percent,
        })
        .collect()
}

/// Builds a pending order from the user's cart.
///
/// Totals come from [`price_cart`], so the stored order matches what the
/// checkout page showed.
///
/// ## Errors
/// - [`CoreError::EmptyCart`] when `lines` is empty
/// - [`CoreError::InvalidInput`] when a line is malformed, belongs to another
///   user, or a checkout field fails validation
pub fn build_order(
    order_id: String,
    user_id: &str,
    lines: &[CartLine],
    details: &CheckoutDetails,
    placed_at: DateTime<Utc>,
) -> CoreResult<Order> {
    if lines.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    for line in lines {
        line.validate()?;
        if line.user_id != user_id {
            return Err(ValidationError::InvalidFormat {
                field: "user_id".to_string(),
                reason: format!("cart line {} belongs to another user", line.id),
            }
            .into());
        }
    }

    let details = details.validated()?;
    let totals = price_cart(lines)?;

    Ok(Order {
        id: order_id,
        user_id: user_id.to_string(),
        items: snapshot_items(lines),
        subtotal: totals.subtotal,
        discount: totals.discount,
        gst: totals.gst,
        delivery_charge: totals.delivery_charge,
        total: totals.total,
        delivery_address: details.address,
        payment_mode: details.payment_mode,
        status: OrderStatus::Pending,
        created_at: placed_at,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::{Money, Percentage};
    use crate::types::FoodItem;

    fn biryani() -> FoodItem {
        FoodItem {
            id: "f-biryani".to_string(),
            name: "Veg Biryani".to_string(),
            description: String::new(),
            category: "Biryani".to_string(),
            image_url: None,
            base_price: Money::from_rupees(250),
            discount_percent: Percentage::from_whole(20),
            gst_percent: Percentage::from_whole(12),
            delivery_charge: Money::from_rupees(30),
            is_available: true,
        }
    }

    fn cart() -> Vec<CartLine> {
        vec![CartLine {
            id: "c-1".to_string(),
            user_id: "u-1".to_string(),
            food_id: "f-biryani".to_string(),
            quantity: 2,
            food: biryani(),
        }]
    }

    fn details() -> CheckoutDetails {
        CheckoutDetails {
            full_name: " Asha Rao ".to_string(),
            phone: "98765 43210".to_string(),
            address: "12 MG Road, Bengaluru".to_string(),
            payment_mode: PaymentMode::Upi,
        }
    }

    #[test]
    fn test_build_order_snapshots_and_prices() {
        let now = Utc::now();
        let order = build_order("o-1".to_string(), "u-1", &cart(), &details(), now).unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_mode, PaymentMode::Upi);
        assert_eq!(order.delivery_address, "12 MG Road, Bengaluru");
        assert_eq!(order.created_at, now);

        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].name, "Veg Biryani");
        assert_eq!(order.items[0].price, Money::from_rupees(250));
        assert_eq!(order.items[0].discount_percent, Percentage::from_whole(20));

        // 500 - 100 = 400, GST at 5% (not the item's 12%) = 20, + 30
        assert_eq!(order.subtotal, Money::from_rupees(500));
        assert_eq!(order.discount, Money::from_rupees(100));
        assert_eq!(order.gst, Money::from_rupees(20));
        assert_eq!(order.total, Money::from_rupees(450));
    }

    #[test]
    fn test_snapshot_is_independent_of_catalog() {
        let mut lines = cart();
        let order = build_order("o-1".to_string(), "u-1", &lines, &details(), Utc::now()).unwrap();

        lines[0].food.base_price = Money::from_rupees(999);
        lines[0].food.name = "Renamed".to_string();

        assert_eq!(order.items[0].price, Money::from_rupees(250));
        assert_eq!(order.items[0].name, "Veg Biryani");
    }

    #[test]
    fn test_empty_cart_is_rejected() {
        assert!(matches!(
            build_order("o".to_string(), "u-1", &[], &details(), Utc::now()),
            Err(CoreError::EmptyCart)
        ));
    }

    #[test]
    fn test_foreign_line_is_rejected() {
        assert!(matches!(
            build_order("o".to_string(), "u-2", &cart(), &details(), Utc::now()),
            Err(CoreError::InvalidInput(ValidationError::InvalidFormat { .. }))
        ));
    }

    #[test]
    fn test_missing_address_is_rejected() {
        let mut form = details();
        form.address = "   ".to_string();
        assert!(matches!(
            build_order("o".to_string(), "u-1", &cart(), &form, Utc::now()),
            Err(CoreError::InvalidInput(ValidationError::Required { .. }))
        ));
    }

    #[test]
    fn test_profile_round_trip() {
        let form = details().validated().unwrap();
        let profile = form.profile_for("u-1");
        assert_eq!(profile.full_name.as_deref(), Some("Asha Rao"));

        let prefill = CheckoutDetails::from_profile(&profile);
        assert_eq!(prefill.address, form.address);
        assert_eq!(prefill.payment_mode, PaymentMode::Cod);

        let blank = CheckoutDetails::from_profile(&Profile::default());
        assert!(blank.full_name.is_empty());
    }
}
