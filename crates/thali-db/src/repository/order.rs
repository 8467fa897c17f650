//! # Order Repository
//!
//! Order placement and history.
//!
//! ## Placement Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │   ├── INSERT INTO orders (... items JSON snapshot, totals ...)          │
//! │   ├── UPSERT profiles     (delivery details for next time)              │
//! │   └── DELETE FROM cart_items WHERE user_id = ?                          │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any step fails → ROLLBACK: no order, cart untouched                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use super::cart::clear_with;
use super::profile::upsert_with;
use super::{decimal_text, parse_money};
use crate::error::{DbError, DbResult};
use thali_core::{Order, OrderItem, OrderStatus, PaymentMode, Profile};

#[derive(Debug, FromRow)]
struct OrderRow {
    id: String,
    user_id: String,
    items: String,
    subtotal: String,
    discount: String,
    gst: String,
    delivery_charge: String,
    total: String,
    delivery_address: String,
    payment_mode: PaymentMode,
    status: OrderStatus,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = DbError;

    fn try_from(row: OrderRow) -> DbResult<Order> {
        let id = row.id.as_str();
        let items: Vec<OrderItem> = serde_json::from_str(&row.items)
            .map_err(|e| DbError::invalid_row("Order", id, format!("items: {e}")))?;

        Ok(Order {
            subtotal: parse_money("Order", id, "subtotal", &row.subtotal)?,
            discount: parse_money("Order", id, "discount", &row.discount)?,
            gst: parse_money("Order", id, "gst", &row.gst)?,
            delivery_charge: parse_money("Order", id, "delivery_charge", &row.delivery_charge)?,
            total: parse_money("Order", id, "total", &row.total)?,
            id: row.id.clone(),
            user_id: row.user_id,
            items,
            delivery_address: row.delivery_address,
            payment_mode: row.payment_mode,
            status: row.status,
            created_at: row.created_at,
        })
    }
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Places an order: stores it, saves the profile and empties the cart,
    /// all in one transaction.
    pub async fn place(&self, order: &Order, profile: &Profile) -> DbResult<()> {
        debug!(id = %order.id, user_id = %order.user_id, "Placing order");

        let items = serde_json::to_string(&order.items)
            .map_err(|e| DbError::Internal(format!("serialize order items: {e}")))?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, user_id, items,
                subtotal, discount, gst, delivery_charge, total,
                delivery_address, payment_mode, status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&order.id)
        .bind(&order.user_id)
        .bind(items)
        .bind(decimal_text(order.subtotal))
        .bind(decimal_text(order.discount))
        .bind(decimal_text(order.gst))
        .bind(decimal_text(order.delivery_charge))
        .bind(decimal_text(order.total))
        .bind(&order.delivery_address)
        .bind(order.payment_mode)
        .bind(order.status)
        .bind(order.created_at.to_rfc3339_opts(SecondsFormat::Micros, true))
        .execute(&mut *tx)
        .await?;

        upsert_with(&mut *tx, profile).await?;

        let cleared = clear_with(&mut *tx, &order.user_id).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            id = %order.id,
            user_id = %order.user_id,
            total = %order.total,
            cleared_lines = cleared,
            "Order placed"
        );
        Ok(())
    }

    /// Gets one of the user's orders.
    pub async fn get(&self, user_id: &str, id: &str) -> DbResult<Option<Order>> {
        let row: Option<OrderRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, items, subtotal, discount, gst, delivery_charge, total,
                   delivery_address, payment_mode, status, created_at
            FROM orders
            WHERE user_id = ?1 AND id = ?2
            "#,
        )
        .bind(user_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Order::try_from).transpose()
    }

    /// The user's order history, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<Order>> {
        let rows: Vec<OrderRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, items, subtotal, discount, gst, delivery_charge, total,
                   delivery_address, payment_mode, status, created_at
            FROM orders
            WHERE user_id = ?1
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Order::try_from).collect()
    }
}

/// Generates a new order ID.
pub fn generate_order_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::food::tests::food;
    use thali_core::order::{build_order, CheckoutDetails};

    fn details() -> CheckoutDetails {
        CheckoutDetails {
            full_name: "Asha Rao".to_string(),
            phone: "98765 43210".to_string(),
            address: "12 MG Road".to_string(),
            payment_mode: PaymentMode::Card,
        }
    }

    async fn db_with_cart() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.foods().insert(&food("f-1", "Paneer Tikka", "Starters", 200)).await.unwrap();
        db.foods().insert(&food("f-2", "Masala Dosa", "South Indian", 120)).await.unwrap();
        db.cart().upsert("u-1", "f-1", 2).await.unwrap();
        db.cart().upsert("u-1", "f-2", 1).await.unwrap();
        db.cart().upsert("u-2", "f-2", 1).await.unwrap();
        db
    }

    async fn draft(db: &Database) -> Order {
        let lines = db.cart().list_for_user("u-1").await.unwrap();
        build_order(generate_order_id(), "u-1", &lines, &details(), Utc::now()).unwrap()
    }

    #[tokio::test]
    async fn test_place_order_persists_and_clears_cart() {
        let db = db_with_cart().await;
        let order = draft(&db).await;

        db.orders()
            .place(&order, &details().profile_for("u-1"))
            .await
            .unwrap();

        let stored = db.orders().get("u-1", &order.id).await.unwrap().unwrap();
        assert_eq!(stored.id, order.id);
        assert_eq!(stored.items, order.items);
        assert_eq!(stored.total, order.total);
        assert_eq!(stored.payment_mode, PaymentMode::Card);
        assert_eq!(stored.status, OrderStatus::Pending);

        assert_eq!(db.cart().count_for_user("u-1").await.unwrap(), 0);
        assert_eq!(db.cart().count_for_user("u-2").await.unwrap(), 1);

        let profile = db.profiles().get("u-1").await.unwrap().unwrap();
        assert_eq!(profile.address.as_deref(), Some("12 MG Road"));
    }

    #[tokio::test]
    async fn test_failed_placement_rolls_back() {
        let db = db_with_cart().await;
        let order = draft(&db).await;
        let profile = details().profile_for("u-1");

        db.orders().place(&order, &profile).await.unwrap();
        db.cart().upsert("u-1", "f-1", 1).await.unwrap();

        // same id again: the insert fails, nothing else may change
        assert!(matches!(
            db.orders().place(&order, &profile).await,
            Err(DbError::UniqueViolation { .. })
        ));
        assert_eq!(db.cart().count_for_user("u-1").await.unwrap(), 1);
        assert_eq!(db.orders().list_for_user("u-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_history_is_per_user() {
        let db = db_with_cart().await;
        let order = draft(&db).await;
        db.orders()
            .place(&order, &details().profile_for("u-1"))
            .await
            .unwrap();

        assert_eq!(db.orders().list_for_user("u-1").await.unwrap().len(), 1);
        assert!(db.orders().list_for_user("u-2").await.unwrap().is_empty());
        assert!(db.orders().get("u-2", &order.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_items_json_is_invalid_row() {
        let db = db_with_cart().await;
        let order = draft(&db).await;
        db.orders()
            .place(&order, &details().profile_for("u-1"))
            .await
            .unwrap();

        sqlx::query("UPDATE orders SET items = 'not json'")
            .execute(db.pool())
            .await
            .unwrap();

        assert!(matches!(
            db.orders().list_for_user("u-1").await,
            Err(DbError::InvalidRow { .. })
        ));
    }
}
