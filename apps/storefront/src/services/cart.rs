//! # Cart Service
//!
//! Cart manipulation for the signed-in user.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌──────────┐  add_to_cart  ┌──────────┐  place_order  ┌──────────┐    │
//! │  │  Empty   │──────────────►│ In Cart  │──────────────►│  Empty   │    │
//! │  │  Cart    │               │          │ (checkout.rs) │  Cart    │    │
//! │  └──────────┘               └──────────┘               └──────────┘    │
//! │                              │   ▲    │                                 │
//! │            increment ────────┘   │    └──── remove                      │
//! │            decrement (floor 1) ──┘                                      │
//! │            add_to_cart again → replaces quantity                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every operation returns the re-read cart, priced.

use serde::Serialize;
use tracing::{debug, info, warn};

use thali_core::cart::{adjust_quantity, check_add_to_cart, QuantityAdjustment};
use thali_core::pricing::{CartTotals, LineBreakdown};
use thali_core::{price_cart, price_line, CartLine};
use thali_db::Database;

use crate::error::{ApiError, ApiResult};
use crate::session::{self, Session};

/// One cart line with its price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLineView {
    #[serde(flatten)]
    pub line: CartLine,
    pub breakdown: LineBreakdown,
}

/// The cart page: lines, exact totals and totals as displayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub totals: CartTotals,
    /// `totals` rounded to two decimal places.
    pub display_totals: CartTotals,
    pub count: usize,
}

impl CartView {
    /// Prices a set of cart lines.
    pub fn from_lines(lines: Vec<CartLine>) -> ApiResult<Self> {
        let totals = price_cart(&lines)?;

        let lines = lines
            .into_iter()
            .map(|line| {
                let breakdown = price_line(&line.food, line.quantity)?;
                Ok(CartLineView { line, breakdown })
            })
            .collect::<ApiResult<Vec<_>>>()?;

        Ok(CartView {
            count: lines.len(),
            display_totals: totals.rounded(),
            totals,
            lines,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Cart operations; every call needs a session.
#[derive(Debug, Clone)]
pub struct CartService {
    db: Database,
}

impl CartService {
    pub fn new(db: Database) -> Self {
        CartService { db }
    }

    /// Puts `quantity` of a food in the cart.
    ///
    /// If the food is already there its quantity is replaced, not added to.
    ///
    /// ## Errors
    /// * `UNAUTHENTICATED` - no session
    /// * `NOT_FOUND` - no such food
    /// * `UNAVAILABLE` - food is off the menu
    /// * `VALIDATION_ERROR` - quantity outside 1..=999
    /// * `CART_ERROR` - cart already holds the maximum number of lines
    pub async fn add_to_cart(
        &self,
        session: Option<&Session>,
        food_id: &str,
        quantity: i64,
    ) -> ApiResult<CartView> {
        let user_id = session::require(session)?.user_id();
        debug!(user_id = %user_id, food_id = %food_id, quantity, "add_to_cart");

        let food = self
            .db
            .foods()
            .get_by_id(food_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Food", food_id))?;

        let cart = self.db.cart();
        let existing = cart.count_for_user(user_id).await?;
        let already_in_cart = cart.contains_food(user_id, food_id).await?;

        if let Err(e) = check_add_to_cart(&food, quantity, existing as usize, already_in_cart) {
            warn!(user_id = %user_id, food_id = %food_id, error = %e, "Rejected add to cart");
            return Err(e.into());
        }

        cart.upsert(user_id, food_id, quantity).await?;
        info!(user_id = %user_id, food = %food.name, quantity, "Added to cart");

        self.load(user_id).await
    }

    /// The user's cart, priced.
    pub async fn view(&self, session: Option<&Session>) -> ApiResult<CartView> {
        let user_id = session::require(session)?.user_id();
        self.load(user_id).await
    }

    /// Adds one to a line's quantity.
    pub async fn increment(&self, session: Option<&Session>, line_id: &str) -> ApiResult<CartView> {
        self.adjust(session, line_id, QuantityAdjustment::Increment).await
    }

    /// Takes one off a line's quantity; a line at 1 stays at 1.
    pub async fn decrement(&self, session: Option<&Session>, line_id: &str) -> ApiResult<CartView> {
        self.adjust(session, line_id, QuantityAdjustment::Decrement).await
    }

    /// Removes a line from the cart.
    pub async fn remove(&self, session: Option<&Session>, line_id: &str) -> ApiResult<CartView> {
        let user_id = session::require(session)?.user_id();

        self.db.cart().remove(user_id, line_id).await?;
        info!(user_id = %user_id, line_id = %line_id, "Removed from cart");

        self.load(user_id).await
    }

    /// Number of lines in the cart (header badge).
    pub async fn count(&self, session: Option<&Session>) -> ApiResult<i64> {
        let user_id = session::require(session)?.user_id();
        Ok(self.db.cart().count_for_user(user_id).await?)
    }

    async fn adjust(
        &self,
        session: Option<&Session>,
        line_id: &str,
        adjustment: QuantityAdjustment,
    ) -> ApiResult<CartView> {
        let user_id = session::require(session)?.user_id();
        let cart = self.db.cart();

        let line = cart
            .get(user_id, line_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Cart line", line_id))?;

        let quantity = adjust_quantity(line.quantity, adjustment)?;
        if quantity != line.quantity {
            cart.update_quantity(user_id, line_id, quantity).await?;
            debug!(line_id = %line_id, from = line.quantity, to = quantity, "Adjusted quantity");
        }

        self.load(user_id).await
    }

    async fn load(&self, user_id: &str) -> ApiResult<CartView> {
        let lines = self.db.cart().list_for_user(user_id).await?;
        CartView::from_lines(lines)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
