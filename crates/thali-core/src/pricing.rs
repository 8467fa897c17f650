//! # Pricing Engine
//!
//! Turns catalog rows and quantities into itemized totals.
//!
//! ## Call Sites
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  item detail view ──► price_item_detail(item, qty)                     │
//! │                       GST at the item's own gst_percent                │
//! │                                                                         │
//! │  cart view ─────────► price_line(item, qty)   per line                 │
//! │                  └──► price_cart(lines)       aggregate                │
//! │                                                                         │
//! │  checkout ──────────► price_cart(lines)       totals stored on order   │
//! │                       GST fixed at 5%, delivery from the FIRST line    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The two GST rules are intentionally separate operations: the detail view
//! quotes the item's stored rate while the cart and checkout charge the flat
//! aggregate rate. For an item whose `gst_percent` is not 5, the two quotes
//! differ.
//!
//! Every function is pure and total: arithmetic that would leave the decimal
//! range comes back as `InvalidInput(Overflow)` instead of panicking.
//! Amounts are never rounded here; use
//! [`Money::round_breakdown`] / [`Money::round_card`] when displaying.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{Money, Percentage};
use crate::types::{CartLine, FoodItem};
use crate::validation;

/// GST rate charged on the cart and at checkout, whatever the items' own rates.
pub const AGGREGATE_GST_PERCENT: i64 = 5;

/// The aggregate GST rate as a [`Percentage`].
pub fn aggregate_gst_rate() -> Percentage {
    Percentage::from_whole(AGGREGATE_GST_PERCENT)
}

// =============================================================================
// Outputs
// =============================================================================

/// Price of one cart line before tax and delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineBreakdown {
    /// `base_price × quantity`
    pub line_subtotal: Money,
    /// `line_subtotal × discount_percent / 100`
    pub line_discount: Money,
    /// `line_subtotal − line_discount`
    pub discounted_line_subtotal: Money,
}

/// Aggregate totals for a cart or an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartTotals {
    pub subtotal: Money,
    pub discount: Money,
    pub gst: Money,
    pub delivery_charge: Money,
    pub total: Money,
}

impl CartTotals {
    /// Subtotal after discount, before GST and delivery.
    pub fn discounted_subtotal(&self) -> Money {
        self.subtotal - self.discount
    }

    /// Copy rounded to breakdown precision, for display.
    pub fn rounded(&self) -> CartTotals {
        CartTotals {
            subtotal: self.subtotal.round_breakdown(),
            discount: self.discount.round_breakdown(),
            gst: self.gst.round_breakdown(),
            delivery_charge: self.delivery_charge.round_breakdown(),
            total: self.total.round_breakdown(),
        }
    }
}

/// Breakdown shown on the item detail view before adding to cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetailBreakdown {
    pub quantity: i64,
    /// `base_price × discount_percent / 100`, per unit.
    pub unit_discount: Money,
    /// `quantity × unit_discount`
    pub card_discount: Money,
    /// `quantity × base_price − card_discount`
    pub subtotal: Money,
    /// `subtotal × gst_percent / 100` at the item's own rate.
    pub gst: Money,
    pub delivery_charge: Money,
    /// `subtotal + gst + delivery_charge`
    pub total: Money,
}

// =============================================================================
// Operations
// =============================================================================

fn check_item(item: &FoodItem) -> CoreResult<()> {
    validation::validate_amount("base_price", item.base_price)?;
    validation::validate_discount_percent(item.discount_percent)?;
    validation::validate_gst_percent(item.gst_percent)?;
    validation::validate_amount("delivery_charge", item.delivery_charge)?;
    Ok(())
}

/// Pricing only needs a positive quantity; the 999 cap is a cart-entry rule.
fn check_quantity(quantity: i64) -> CoreResult<()> {
    validation::validate_min_quantity(quantity)?;
    Ok(())
}

fn overflow(field: &str) -> CoreError {
    ValidationError::Overflow {
        field: field.to_string(),
    }
    .into()
}

/// Prices a single line: subtotal, discount, discounted subtotal.
///
/// No GST and no delivery fee are applied at line level.
///
/// ## Example
/// ```rust
/// use thali_core::pricing::price_line;
/// # use thali_core::{FoodItem, Money, Percentage};
/// # let item = FoodItem {
/// #     id: "f".into(), name: "Veg Biryani".into(), description: String::new(),
/// #     category: "Biryani".into(), image_url: None,
/// #     base_price: Money::from_rupees(250), discount_percent: Percentage::from_whole(20),
/// #     gst_percent: Percentage::from_whole(5), delivery_charge: Money::from_rupees(30),
/// #     is_available: true,
/// # };
/// let line = price_line(&item, 2).unwrap();
/// assert_eq!(line.line_subtotal, Money::from_rupees(500));
/// assert_eq!(line.line_discount, Money::from_rupees(100));
/// assert_eq!(line.discounted_line_subtotal, Money::from_rupees(400));
/// ```
pub fn price_line(item: &FoodItem, quantity: i64) -> CoreResult<LineBreakdown> {
    check_quantity(quantity)?;
    check_item(item)?;

    let line_subtotal = item
        .base_price
        .checked_multiply_quantity(quantity)
        .ok_or_else(|| overflow("line_subtotal"))?;
    let line_discount = item
        .discount_percent
        .checked_of(line_subtotal)
        .ok_or_else(|| overflow("line_discount"))?;
    let discounted_line_subtotal = line_subtotal
        .checked_sub(line_discount)
        .ok_or_else(|| overflow("discounted_line_subtotal"))?;

    Ok(LineBreakdown {
        line_subtotal,
        line_discount,
        discounted_line_subtotal,
    })
}

/// Prices a whole cart.
///
/// ## Rules
/// 1. `subtotal = Σ base_price × quantity`
/// 2. `discount = Σ base_price × quantity × discount_percent / 100`
/// 3. `gst = (subtotal − discount) × 5 / 100`, ignoring per-item rates
/// 4. `delivery_charge` is the first line's item fee, not a sum
/// 5. `total = subtotal − discount + gst + delivery_charge`
///
/// An empty cart prices to all zeros.
pub fn price_cart(lines: &[CartLine]) -> CoreResult<CartTotals> {
    let Some(first) = lines.first() else {
        return Ok(CartTotals::default());
    };

    let mut subtotal = Money::zero();
    let mut discount = Money::zero();

    for line in lines {
        let priced = price_line(&line.food, line.quantity)?;
        subtotal = subtotal
            .checked_add(priced.line_subtotal)
            .ok_or_else(|| overflow("subtotal"))?;
        discount = discount
            .checked_add(priced.line_discount)
            .ok_or_else(|| overflow("discount"))?;
    }

    let delivery_charge = first.food.delivery_charge;
    let discounted_subtotal = subtotal
        .checked_sub(discount)
        .ok_or_else(|| overflow("discounted_subtotal"))?;
    let gst = aggregate_gst_rate()
        .checked_of(discounted_subtotal)
        .ok_or_else(|| overflow("gst"))?;
    let total = discounted_subtotal
        .checked_add(gst)
        .and_then(|sum| sum.checked_add(delivery_charge))
        .ok_or_else(|| overflow("total"))?;

    Ok(CartTotals {
        subtotal,
        discount,
        gst,
        delivery_charge,
        total,
    })
}

/// Prices one item for the detail view, at the item's own GST rate.
///
/// ## Example
/// ```text
/// base 200, 10% off, GST 5%, delivery 40, qty 2
///   unit discount 20 → card discount 40 → subtotal 360
///   gst 18 → total 418
/// ```
pub fn price_item_detail(item: &FoodItem, quantity: i64) -> CoreResult<ItemDetailBreakdown> {
    check_quantity(quantity)?;
    check_item(item)?;

    let unit_discount = item
        .discount_percent
        .checked_of(item.base_price)
        .ok_or_else(|| overflow("unit_discount"))?;
    let card_discount = unit_discount
        .checked_multiply_quantity(quantity)
        .ok_or_else(|| overflow("card_discount"))?;
    let subtotal = item
        .base_price
        .checked_multiply_quantity(quantity)
        .and_then(|gross| gross.checked_sub(card_discount))
        .ok_or_else(|| overflow("subtotal"))?;
    let gst = item
        .gst_percent
        .checked_of(subtotal)
        .ok_or_else(|| overflow("gst"))?;
    let total = subtotal
        .checked_add(gst)
        .and_then(|sum| sum.checked_add(item.delivery_charge))
        .ok_or_else(|| overflow("total"))?;

    Ok(ItemDetailBreakdown {
        quantity,
        unit_discount,
        card_discount,
        subtotal,
        gst,
        delivery_charge: item.delivery_charge,
        total,
    })
}

/// Discounted unit price shown on a menu card: `base − base × discount / 100`.
///
/// Display it with [`Money::card_label`] (whole rupees).
pub fn card_price(item: &FoodItem) -> CoreResult<Money> {
    check_item(item)?;
    item
        .discount_percent
        .checked_of(item.base_price)
        .and_then(|discount| item.base_price.checked_sub(discount))
        .ok_or_else(|| overflow("card_price"))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn food(id: &str, base: Money, discount: Percentage, gst: Percentage, delivery: Money) -> FoodItem {
        FoodItem {
            id: id.to_string(),
            name: format!("Food {}", id),
            description: String::new(),
            category: "Mains".to_string(),
            image_url: None,
            base_price: base,
            discount_percent: discount,
            gst_percent: gst,
            delivery_charge: delivery,
            is_available: true,
        }
    }

    fn line(food: FoodItem, quantity: i64) -> CartLine {
        CartLine {
            id: format!("line-{}", food.id),
            user_id: "user-1".to_string(),
            food_id: food.id.clone(),
            quantity,
            food,
        }
    }

    fn item_a() -> FoodItem {
        food("a", Money::from_rupees(100), Percentage::zero(), Percentage::from_whole(5), Money::zero())
    }

    fn item_b() -> FoodItem {
        food(
            "b",
            Money::from_rupees(250),
            Percentage::from_whole(20),
            Percentage::from_whole(5),
            Money::from_rupees(30),
        )
    }

    #[test]
    fn test_item_detail_scenario() {
        let item = food(
            "x",
            Money::from_rupees(200),
            Percentage::from_whole(10),
            Percentage::from_whole(5),
            Money::from_rupees(40),
        );

        let detail = price_item_detail(&item, 2).unwrap();

        assert_eq!(detail.unit_discount, Money::from_rupees(20));
        assert_eq!(detail.card_discount, Money::from_rupees(40));
        assert_eq!(detail.subtotal, Money::from_rupees(360));
        assert_eq!(detail.gst, Money::from_rupees(18));
        assert_eq!(detail.delivery_charge, Money::from_rupees(40));
        assert_eq!(detail.total, Money::from_rupees(418));
    }

    #[test]
    fn test_cart_scenario_first_line_delivery() {
        // A first: A carries no delivery fee, so B's 30 is ignored
        let totals = price_cart(&[line(item_a(), 1), line(item_b(), 2)]).unwrap();

        assert_eq!(totals.subtotal, Money::from_rupees(600));
        assert_eq!(totals.discount, Money::from_rupees(100));
        assert_eq!(totals.discounted_subtotal(), Money::from_rupees(500));
        assert_eq!(totals.gst, Money::from_rupees(25));
        assert_eq!(totals.delivery_charge, Money::zero());
        assert_eq!(totals.total, Money::from_rupees(525));

        // B first: B's fee applies
        let totals = price_cart(&[line(item_b(), 2), line(item_a(), 1)]).unwrap();
        assert_eq!(totals.delivery_charge, Money::from_rupees(30));
        assert_eq!(totals.total, Money::from_rupees(555));
    }

    #[test]
    fn test_empty_cart_is_all_zero() {
        let totals = price_cart(&[]).unwrap();
        assert_eq!(totals, CartTotals::default());
        assert!(totals.delivery_charge.is_zero());
        assert!(totals.total.is_zero());
    }

    #[test]
    fn test_cart_gst_ignores_item_rate() {
        let mut item = item_b();
        item.gst_percent = Percentage::from_whole(18);

        let totals = price_cart(&[line(item.clone(), 2)]).unwrap();
        let detail = price_item_detail(&item, 2).unwrap();

        // Same discounted subtotal, different tax rules
        assert_eq!(totals.discounted_subtotal(), detail.subtotal);
        assert_eq!(totals.gst, Money::from_rupees(20));
        assert_eq!(detail.gst, Money::from_rupees(72));
        assert_ne!(totals.gst, detail.gst);
    }

    #[test]
    fn test_cart_total_has_every_term() {
        let lines = vec![line(item_b(), 3), line(item_a(), 4)];
        let totals = price_cart(&lines).unwrap();

        assert_eq!(
            totals.total,
            totals.discounted_subtotal() + totals.gst + totals.delivery_charge
        );
        assert_eq!(totals.gst, aggregate_gst_rate().of(totals.discounted_subtotal()));
    }

    #[test]
    fn test_line_properties_hold_over_a_grid() {
        let prices = [dec!(0), dec!(0.01), dec!(99.99), dec!(149.50), dec!(1200)];
        let discounts = [dec!(0), dec!(12.5), dec!(33.33), dec!(100)];

        for base in prices {
            for pct in discounts {
                for qty in [1, 2, 7, 999] {
                    let item = food(
                        "g",
                        Money::new(base),
                        Percentage::new(pct),
                        Percentage::from_whole(5),
                        Money::zero(),
                    );
                    let priced = price_line(&item, qty).unwrap();
                    let expected_discount = base * rust_decimal::Decimal::from(qty) * pct / dec!(100);

                    assert_eq!(priced.line_discount.amount(), expected_discount);
                    assert!(!priced.discounted_line_subtotal.is_negative());
                    assert_eq!(
                        priced.discounted_line_subtotal,
                        priced.line_subtotal - priced.line_discount
                    );
                }
            }
        }
    }

    #[test]
    fn test_full_discount_prices_to_zero() {
        let mut item = item_b();
        item.discount_percent = Percentage::from_whole(100);

        let priced = price_line(&item, 3).unwrap();
        assert!(priced.discounted_line_subtotal.is_zero());
    }

    #[test]
    fn test_price_cart_is_idempotent() {
        let lines = vec![line(item_a(), 2), line(item_b(), 1)];
        let first = price_cart(&lines).unwrap();
        let second = price_cart(&lines).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert!(matches!(
            price_line(&item_a(), 0),
            Err(CoreError::InvalidInput(ValidationError::MustBePositive { .. }))
        ));
        assert!(price_item_detail(&item_a(), -2).is_err());

        let mut bad = item_b();
        bad.discount_percent = Percentage::from_whole(150);
        assert!(matches!(
            price_line(&bad, 1),
            Err(CoreError::InvalidInput(ValidationError::PercentOutOfRange { .. }))
        ));

        let mut bad = item_b();
        bad.base_price = Money::from_rupees(-10);
        assert!(price_cart(&[line(item_a(), 1), line(bad, 1)]).is_err());

        let mut bad = item_b();
        bad.delivery_charge = Money::from_paise(-1);
        assert!(price_item_detail(&bad, 1).is_err());

        let mut bad = item_b();
        bad.gst_percent = Percentage::from_whole(-5);
        assert!(price_item_detail(&bad, 1).is_err());
    }

    #[test]
    fn test_quantity_above_cart_cap_still_prices() {
        let item = food(
            "q",
            Money::from_rupees(10),
            Percentage::zero(),
            Percentage::from_whole(5),
            Money::zero(),
        );

        let priced = price_line(&item, 1000).unwrap();
        assert_eq!(priced.line_subtotal, Money::from_rupees(10_000));

        let totals = price_cart(&[line(item.clone(), 1000)]).unwrap();
        assert_eq!(totals.total, Money::from_rupees(10_500));
        assert!(price_item_detail(&item, 1000).is_ok());
    }

    #[test]
    fn test_overflow_is_invalid_input() {
        let overflowed = |result: CoreResult<()>| {
            matches!(
                result,
                Err(CoreError::InvalidInput(ValidationError::Overflow { .. }))
            )
        };

        let mut huge = item_a();
        huge.base_price = Money::new(Decimal::MAX);
        assert!(overflowed(price_line(&huge, 2).map(|_| ())));
        assert!(overflowed(price_item_detail(&huge, 2).map(|_| ())));
        // A single unit fits, but a second line pushes the sum over
        assert!(overflowed(
            price_cart(&[line(huge.clone(), 1), line(item_b(), 1)]).map(|_| ())
        ));

        let mut taxed = item_a();
        taxed.base_price = Money::from_rupees(1000);
        taxed.gst_percent = "1000000000000000000000000000".parse().unwrap();
        assert!(overflowed(price_item_detail(&taxed, 1).map(|_| ())));

        let mut discounted = huge.clone();
        discounted.discount_percent = Percentage::from_whole(10);
        assert!(overflowed(card_price(&discounted).map(|_| ())));
    }

    #[test]
    fn test_fractional_prices_round_only_for_display() {
        // 3 × ₹33.33 at 12.5% off: exact 87.49125 before rounding
        let item = food(
            "f",
            Money::new(dec!(33.33)),
            Percentage::new(dec!(12.5)),
            Percentage::from_whole(5),
            Money::zero(),
        );
        let totals = price_cart(&[line(item, 3)]).unwrap();

        assert_eq!(totals.discounted_subtotal().amount(), dec!(87.49125));
        assert_eq!(totals.gst.amount(), dec!(4.3745625));
        assert_eq!(totals.rounded().gst.amount(), dec!(4.37));
        assert_eq!(totals.total.to_string(), "₹91.87");
    }

    #[test]
    fn test_card_price() {
        let item = item_b();
        assert_eq!(card_price(&item).unwrap(), Money::from_rupees(200));

        let mut odd = item_b();
        odd.base_price = Money::new(dec!(199));
        odd.discount_percent = Percentage::from_whole(15);
        let price = card_price(&odd).unwrap();
        assert_eq!(price.amount(), dec!(169.15));
        assert_eq!(price.card_label(), "₹169");
    }
}
