//! # Money Module
//!
//! Provides the `Money` and `Percentage` types for handling rupee amounts
//! and rates safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  f64 rupees:  99.9 × 3 = 299.70000000000005                             │
//! │                                                                         │
//! │  A cart of 40 lines at ₹99.90 with 12.5% off accumulates that error    │
//! │  on every line before GST is even applied.                             │
//! │                                                                         │
//! │  OUR SOLUTION: Exact Decimals                                           │
//! │    Every intermediate value is an exact base-10 decimal.               │
//! │    Rounding happens ONCE, when the value is displayed:                  │
//! │      breakdown lines → 2 places   (₹418.00)                            │
//! │      menu card price → 0 places   (₹180)                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use thali_core::money::{Money, Percentage};
//!
//! let price = Money::from_rupees(250);
//! let line = price.multiply_quantity(2);              // ₹500
//! let discount = Percentage::from_whole(20).of(line); // ₹100
//!
//! assert_eq!((line - discount).to_string(), "₹400.00");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;

/// Places used for price breakdown lines (subtotal, GST, total...).
pub const BREAKDOWN_DECIMAL_PLACES: u32 = 2;

/// Places used for the summary price on a menu card.
pub const CARD_DECIMAL_PLACES: u32 = 0;

/// Currency symbol. The storefront is single-currency.
pub const CURRENCY_SYMBOL: &str = "₹";

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in rupees as an exact decimal.
///
/// ## Design Decisions
/// - **Decimal (signed)**: negative values appear transiently as discounts
/// - **Single field tuple struct**: zero-cost wrapper over `Decimal`
/// - **No rounding in arithmetic**: only the `round_*` methods and `Display` round
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  FoodItem.base_price ──┬──► price_line ──► discounted line subtotal     │
/// │                        │                                                │
/// │                        ├──► price_cart ──► subtotal/discount/gst/total  │
/// │                        │                                                │
/// │                        └──► card price "₹180" on the menu               │
/// │                                                                         │
/// │  Order.total ──► stored with the order, displayed as "₹525.00"          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Wraps an exact decimal rupee amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from whole rupees.
    ///
    /// ## Example
    /// ```rust
    /// use thali_core::money::Money;
    ///
    /// assert_eq!(Money::from_rupees(40).to_string(), "₹40.00");
    /// ```
    #[inline]
    pub fn from_rupees(rupees: i64) -> Self {
        Money(Decimal::from(rupees))
    }

    /// Creates a Money value from paise (1/100 rupee).
    ///
    /// ## Example
    /// ```rust
    /// use thali_core::money::Money;
    ///
    /// assert_eq!(Money::from_paise(9950).to_string(), "₹99.50");
    /// ```
    #[inline]
    pub fn from_paise(paise: i64) -> Self {
        Money(Decimal::new(paise, 2))
    }

    /// Returns the exact, unrounded amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use thali_core::money::Money;
    ///
    /// let unit_price = Money::from_paise(14950); // ₹149.50
    /// assert_eq!(unit_price.multiply_quantity(3), Money::from_paise(44850));
    /// ```
    ///
    /// Panics on overflow like `Decimal`'s operators; pricing goes through
    /// [`checked_multiply_quantity`](Self::checked_multiply_quantity).
    #[inline]
    pub fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * Decimal::from(qty))
    }

    /// `self × qty`, or `None` when the product leaves the decimal range.
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: i64) -> Option<Money> {
        self.0.checked_mul(Decimal::from(qty)).map(Money)
    }

    /// `self + other`, or `None` on overflow.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// `self − other`, or `None` on overflow.
    #[inline]
    pub fn checked_sub(&self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Rounds to the precision of a breakdown line (2 places, half away from zero).
    pub fn round_breakdown(&self) -> Money {
        self.round_to(BREAKDOWN_DECIMAL_PLACES)
    }

    /// Rounds to the precision of a menu card price (whole rupees).
    ///
    /// ## Example
    /// ```rust
    /// use thali_core::money::Money;
    ///
    /// assert_eq!(Money::from_paise(17950).round_card(), Money::from_rupees(180));
    /// assert_eq!(Money::from_paise(17949).round_card(), Money::from_rupees(179));
    /// ```
    pub fn round_card(&self) -> Money {
        self.round_to(CARD_DECIMAL_PLACES)
    }

    /// Formats as a menu card price, e.g. `₹180`.
    pub fn card_label(&self) -> String {
        self.format_places(CARD_DECIMAL_PLACES)
    }

    fn round_to(&self, places: u32) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    fn format_places(&self, places: u32) -> String {
        let mut rounded = self.round_to(places).0;
        // Pads trailing zeros: 418 -> 418.00
        rounded.rescale(places);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        format!("{}{}{}", sign, CURRENCY_SYMBOL, rounded.abs())
    }
}

// =============================================================================
// Percentage Type
// =============================================================================

/// A rate expressed on the 0-100 scale, as stored on catalog rows.
///
/// ## Why not a fraction?
/// The data service stores `discount_percent = 10` and `gst_percent = 5`.
/// Keeping the same scale means a row round-trips without conversion.
/// Range checks (discount ≤ 100, gst ≥ 0) live in [`crate::validation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(Decimal);

impl Percentage {
    /// Creates a percentage from an exact decimal on the 0-100 scale.
    #[inline]
    pub const fn new(value: Decimal) -> Self {
        Percentage(value)
    }

    /// Creates a percentage from a whole number, e.g. `5` for 5%.
    #[inline]
    pub fn from_whole(pct: i64) -> Self {
        Percentage(Decimal::from(pct))
    }

    /// Returns the value on the 0-100 scale.
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percentage(Decimal::ZERO)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Applies the rate to an amount: `amount × pct / 100`, unrounded.
    ///
    /// ## Example
    /// ```rust
    /// use thali_core::money::{Money, Percentage};
    ///
    /// let gst = Percentage::from_whole(5).of(Money::from_rupees(360));
    /// assert_eq!(gst, Money::from_rupees(18));
    /// ```
    #[inline]
    pub fn of(&self, amount: Money) -> Money {
        Money(amount.0 * self.0 / Decimal::ONE_HUNDRED)
    }

    /// [`of`](Self::of), or `None` when `amount × pct` overflows.
    #[inline]
    pub fn checked_of(&self, amount: Money) -> Option<Money> {
        amount
            .0
            .checked_mul(self.0)?
            .checked_div(Decimal::ONE_HUNDRED)
            .map(Money)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows a breakdown-line amount, e.g. `₹418.00`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_places(BREAKDOWN_DECIMAL_PLACES))
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Percentage::zero()
    }
}

/// Parses a plain decimal string such as `"149.50"` (no currency symbol).
impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Money)
    }
}

impl FromStr for Percentage {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Percentage)
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
