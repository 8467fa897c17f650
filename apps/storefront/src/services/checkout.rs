//! # Checkout Service
//!
//! Turns the user's cart into a placed order.
//!
//! ## Order Placement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         place_order(details)                            │
//! │                                                                         │
//! │  1. Validate form ──► full_name, phone, address (trimmed)               │
//! │  2. Read cart lines (catalog join)                                      │
//! │  3. build_order ──► item snapshot + price_cart totals, status pending   │
//! │  4. One transaction:                                                    │
//! │       INSERT order ─► UPSERT profile ─► DELETE cart lines               │
//! │     any failure rolls all three back                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use thali_core::order::{build_order, CheckoutDetails};
use thali_core::{CoreError, Order, PaymentMode};
use thali_db::{generate_order_id, Database};

use crate::error::{ApiError, ApiResult};
use crate::services::cart::CartView;
use crate::session::{self, Session};

/// What the checkout page shows before the order is placed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutSummary {
    pub cart: CartView,
    /// Form prefilled from the saved profile.
    pub details: CheckoutDetails,
    pub payment_modes: Vec<PaymentMode>,
}

/// Checkout and order history.
#[derive(Debug, Clone)]
pub struct CheckoutService {
    db: Database,
    default_payment_mode: PaymentMode,
}

impl CheckoutService {
    pub fn new(db: Database, default_payment_mode: PaymentMode) -> Self {
        CheckoutService {
            db,
            default_payment_mode,
        }
    }

    /// Cart, totals and the prefilled delivery form.
    ///
    /// ## Errors
    /// * `UNAUTHENTICATED` - no session
    /// * `EMPTY_CART` - nothing to check out
    pub async fn prepare(&self, session: Option<&Session>) -> ApiResult<CheckoutSummary> {
        let user_id = session::require(session)?.user_id();

        let lines = self.db.cart().list_for_user(user_id).await?;
        if lines.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }
        let cart = CartView::from_lines(lines)?;

        let mut details = match self.db.profiles().get(user_id).await? {
            Some(profile) => CheckoutDetails::from_profile(&profile),
            None => CheckoutDetails::default(),
        };
        details.payment_mode = self.default_payment_mode;

        Ok(CheckoutSummary {
            cart,
            details,
            payment_modes: PaymentMode::ALL.to_vec(),
        })
    }

    /// Places the order and empties the cart.
    ///
    /// The delivery details are remembered on the user's profile.
    ///
    /// ## Errors
    /// * `UNAUTHENTICATED` - no session
    /// * `VALIDATION_ERROR` - a form field is blank or malformed
    /// * `EMPTY_CART` - nothing to check out
    /// * `DATABASE_ERROR` - the transaction failed; nothing was written
    pub async fn place_order(
        &self,
        session: Option<&Session>,
        details: &CheckoutDetails,
    ) -> ApiResult<Order> {
        let user_id = session::require(session)?.user_id();

        let details = match details.validated() {
            Ok(details) => details,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Rejected checkout form");
                return Err(e.into());
            }
        };

        let lines = self.db.cart().list_for_user(user_id).await?;
        let order = build_order(generate_order_id(), user_id, &lines, &details, Utc::now())?;

        self.db
            .orders()
            .place(&order, &details.profile_for(user_id))
            .await?;

        info!(
            user_id = %user_id,
            order_id = %order.id,
            total = %order.total,
            payment_mode = %order.payment_mode,
            "Checkout complete"
        );
        Ok(order)
    }

    /// The user's orders, newest first.
    pub async fn orders(&self, session: Option<&Session>) -> ApiResult<Vec<Order>> {
        let user_id = session::require(session)?.user_id();
        Ok(self.db.orders().list_for_user(user_id).await?)
    }

    /// One of the user's orders.
    pub async fn order(&self, session: Option<&Session>, order_id: &str) -> ApiResult<Order> {
        let user_id = session::require(session)?.user_id();
        self.db
            .orders()
            .get(user_id, order_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Order", order_id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::services::cart::CartService;
    use crate::services::tests::{food, seeded_db};
    use thali_core::{Money, OrderStatus, Percentage};

    fn details() -> CheckoutDetails {
        CheckoutDetails {
            full_name: " Asha Rao ".to_string(),
            phone: "+91 98765-43210".to_string(),
            address: "12 MG Road, Bengaluru".to_string(),
            payment_mode: PaymentMode::Upi,
        }
    }

    #[tokio::test]
    async fn test_two_line_checkout() {
        let db = seeded_db().await;
        let mut lassi = food("f-lassi", "Sweet Lassi", "Drinks", 100);
        lassi.discount_percent = Percentage::zero();
        lassi.delivery_charge = Money::from_rupees(20);
        db.foods().insert(&lassi).await.unwrap();

        let carts = CartService::new(db.clone());
        let checkout = CheckoutService::new(db.clone(), PaymentMode::Cod);
        let session = Session::new("user-1").unwrap();

        carts.add_to_cart(Some(&session), "f-biryani", 2).await.unwrap();
        carts.add_to_cart(Some(&session), "f-lassi", 1).await.unwrap();

        let summary = checkout.prepare(Some(&session)).await.unwrap();
        assert_eq!(summary.details.payment_mode, PaymentMode::Cod);
        assert!(summary.details.full_name.is_empty());

        let order = checkout.place_order(Some(&session), &details()).await.unwrap();

        // 500 + 100, 20% off the biryani, 5% GST, delivery of the first line only
        assert_eq!(order.subtotal, Money::from_rupees(600));
        assert_eq!(order.discount, Money::from_rupees(100));
        assert_eq!(order.gst, Money::from_rupees(25));
        assert_eq!(order.delivery_charge, Money::from_rupees(30));
        assert_eq!(order.total, Money::from_rupees(555));
        assert_eq!(order.total, summary.cart.totals.total);

        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].name, "Veg Biryani");
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_mode, PaymentMode::Upi);

        assert!(carts.view(Some(&session)).await.unwrap().is_empty());
        let stored = checkout.order(Some(&session), &order.id).await.unwrap();
        assert_eq!(stored.items, order.items);
        assert_eq!(stored.total, order.total);
    }

    #[tokio::test]
    async fn test_profile_prefills_next_checkout() {
        let db = seeded_db().await;
        let carts = CartService::new(db.clone());
        let checkout = CheckoutService::new(db, PaymentMode::Card);
        let session = Session::new("user-1").unwrap();

        carts.add_to_cart(Some(&session), "f-paneer", 1).await.unwrap();
        checkout.place_order(Some(&session), &details()).await.unwrap();

        carts.add_to_cart(Some(&session), "f-dosa", 1).await.unwrap();
        let summary = checkout.prepare(Some(&session)).await.unwrap();

        assert_eq!(summary.details.full_name, "Asha Rao");
        assert_eq!(summary.details.address, "12 MG Road, Bengaluru");
        assert_eq!(summary.details.payment_mode, PaymentMode::Card);
        assert_eq!(summary.payment_modes.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_cart() {
        let checkout = CheckoutService::new(seeded_db().await, PaymentMode::Cod);
        let session = Session::new("user-1").unwrap();

        assert_eq!(
            checkout.prepare(Some(&session)).await.unwrap_err().code,
            ErrorCode::EmptyCart
        );
        let err = checkout.place_order(Some(&session), &details()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyCart);
        assert_eq!(err.message, "No items in cart");
        assert!(checkout.orders(Some(&session)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_details_write_nothing() {
        let db = seeded_db().await;
        let carts = CartService::new(db.clone());
        let checkout = CheckoutService::new(db.clone(), PaymentMode::Cod);
        let session = Session::new("user-1").unwrap();

        carts.add_to_cart(Some(&session), "f-paneer", 1).await.unwrap();

        let mut bad = details();
        bad.address = "   ".to_string();
        let err = checkout.place_order(Some(&session), &bad).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert_eq!(carts.count(Some(&session)).await.unwrap(), 1);
        assert!(db.profiles().get("user-1").await.unwrap().is_none());
        assert!(checkout.orders(Some(&session)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_requires_session() {
        let checkout = CheckoutService::new(seeded_db().await, PaymentMode::Cod);

        assert_eq!(
            checkout.place_order(None, &details()).await.unwrap_err().code,
            ErrorCode::Unauthenticated
        );
        assert_eq!(
            checkout.orders(None).await.unwrap_err().code,
            ErrorCode::Unauthenticated
        );
    }

    #[tokio::test]
    async fn test_orders_are_per_user() {
        let db = seeded_db().await;
        let carts = CartService::new(db.clone());
        let checkout = CheckoutService::new(db, PaymentMode::Cod);
        let asha = Session::new("user-1").unwrap();
        let ravi = Session::new("user-2").unwrap();

        carts.add_to_cart(Some(&asha), "f-paneer", 1).await.unwrap();
        let order = checkout.place_order(Some(&asha), &details()).await.unwrap();

        assert_eq!(checkout.orders(Some(&asha)).await.unwrap().len(), 1);
        assert!(checkout.orders(Some(&ravi)).await.unwrap().is_empty());
        assert_eq!(
            checkout.order(Some(&ravi), &order.id).await.unwrap_err().code,
            ErrorCode::NotFound
        );
    }
}
