//! # Cart Repository
//!
//! Database operations for per-user cart lines.
//!
//! ## Upsert-Replace
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add (user-1, dosa, qty 2)   → INSERT            → [dosa ×2]            │
//! │  add (user-1, dosa, qty 5)   → ON CONFLICT       → [dosa ×5]  (not ×7)  │
//! │                                 DO UPDATE                               │
//! │  add (user-2, dosa, qty 1)   → INSERT            → separate cart        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every statement is scoped by `user_id`; a line id from another user's
//! cart behaves as if it didn't exist.

use chrono::Utc;
use sqlx::{FromRow, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use super::food::FoodRow;
use crate::error::{DbError, DbResult};
use thali_core::{CartLine, FoodItem};

/// Cart columns plus the joined food. The food's own columns keep their
/// names so [`FoodRow`] can be flattened in.
const CART_SELECT: &str = r#"
    SELECT
        c.id AS line_id,
        c.user_id,
        c.food_id,
        c.quantity,
        f.id,
        f.name,
        f.description,
        f.category,
        f.image_url,
        f.base_price,
        f.discount_percent,
        f.gst_percent,
        f.delivery_charge,
        f.is_available
    FROM cart_items c
    INNER JOIN foods f ON f.id = c.food_id
"#;

#[derive(Debug, FromRow)]
struct CartRow {
    line_id: String,
    user_id: String,
    food_id: String,
    quantity: i64,
    #[sqlx(flatten)]
    food: FoodRow,
}

impl TryFrom<CartRow> for CartLine {
    type Error = DbError;

    fn try_from(row: CartRow) -> DbResult<CartLine> {
        let line = CartLine {
            id: row.line_id,
            user_id: row.user_id,
            food_id: row.food_id,
            quantity: row.quantity,
            food: FoodItem::try_from(row.food)?,
        };

        line.validate()
            .map_err(|e| DbError::invalid_row("Cart line", &line.id, e))?;

        Ok(line)
    }
}

/// Repository for cart database operations.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Lists a user's cart lines with their foods, oldest first.
    ///
    /// Rowids follow insertion and survive the quantity upsert, so the first
    /// line here is the one whose delivery charge the cart totals use.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<CartLine>> {
        let rows: Vec<CartRow> = sqlx::query_as(&format!(
            "{CART_SELECT} WHERE c.user_id = ?1 ORDER BY c.rowid"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(user_id = %user_id, count = rows.len(), "Loaded cart");
        rows.into_iter().map(CartLine::try_from).collect()
    }

    /// Gets one of the user's cart lines.
    pub async fn get(&self, user_id: &str, line_id: &str) -> DbResult<Option<CartLine>> {
        let row: Option<CartRow> = sqlx::query_as(&format!(
            "{CART_SELECT} WHERE c.user_id = ?1 AND c.id = ?2"
        ))
        .bind(user_id)
        .bind(line_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CartLine::try_from).transpose()
    }

    /// Returns true if the user already has a line for this food.
    pub async fn contains_food(&self, user_id: &str, food_id: &str) -> DbResult<bool> {
        let found: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM cart_items WHERE user_id = ?1 AND food_id = ?2")
                .bind(user_id)
                .bind(food_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(found.is_some())
    }

    /// Adds a food to the cart, or replaces the quantity of its existing line.
    ///
    /// ## Returns
    /// The id of the (new or existing) line.
    ///
    /// ## Errors
    /// * `DbError::ForeignKeyViolation` - no such food
    pub async fn upsert(&self, user_id: &str, food_id: &str, quantity: i64) -> DbResult<String> {
        debug!(user_id = %user_id, food_id = %food_id, quantity, "Upserting cart line");

        let line_id: String = sqlx::query_scalar(
            r#"
            INSERT INTO cart_items (id, user_id, food_id, quantity, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (user_id, food_id) DO UPDATE SET quantity = excluded.quantity
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(food_id)
        .bind(quantity)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(line_id)
    }

    /// Sets the quantity of one of the user's lines.
    pub async fn update_quantity(&self, user_id: &str, line_id: &str, quantity: i64) -> DbResult<()> {
        debug!(user_id = %user_id, line_id = %line_id, quantity, "Updating cart quantity");

        let result = sqlx::query("UPDATE cart_items SET quantity = ?3 WHERE user_id = ?1 AND id = ?2")
            .bind(user_id)
            .bind(line_id)
            .bind(quantity)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Cart line", line_id));
        }

        Ok(())
    }

    /// Removes one of the user's lines.
    pub async fn remove(&self, user_id: &str, line_id: &str) -> DbResult<()> {
        debug!(user_id = %user_id, line_id = %line_id, "Removing cart line");

        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = ?1 AND id = ?2")
            .bind(user_id)
            .bind(line_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Cart line", line_id));
        }

        Ok(())
    }

    /// Number of lines in the user's cart (the header badge).
    pub async fn count_for_user(&self, user_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cart_items WHERE user_id = ?1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Empties the user's cart on any executor; order placement runs it inside
/// its transaction. Returns the number of lines removed.
pub(crate) async fn clear_with<'e, E>(executor: E, user_id: &str) -> DbResult<u64>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    debug!(user_id, "Clearing cart");

    let result = sqlx::query("DELETE FROM cart_items WHERE user_id = ?1")
        .bind(user_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

// =============================================================================
// Unit Tests
// =============================================================================
