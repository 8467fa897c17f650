//! # Food Repository
//!
//! Database operations for the menu.
//!
//! ## Key Operations
//! - List available foods, by category, or matching a search
//! - Lookup by id for the detail view and add-to-cart
//! - Insert and availability toggle (seeding, admin)
//!
//! ## Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  User types: "PANEER"                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  pattern = '%paneer%'   (%, _ and \ in the query are escaped)           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lower(name) / lower(category) / lower(description) LIKE pattern        │
//! │  AND is_available = 1                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Paneer Tikka, Paneer Butter Masala, ...  (ordered by name)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{decimal_text, parse_money, parse_percent, percent_text};
use crate::error::{DbError, DbResult};
use thali_core::FoodItem;

const FOOD_COLUMNS: &str = "id, name, description, category, image_url, base_price, \
     discount_percent, gst_percent, delivery_charge, is_available";

/// A `foods` row as stored.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct FoodRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub image_url: Option<String>,
    pub base_price: String,
    pub discount_percent: String,
    pub gst_percent: String,
    pub delivery_charge: String,
    pub is_available: bool,
}

impl TryFrom<FoodRow> for FoodItem {
    type Error = DbError;

    fn try_from(row: FoodRow) -> DbResult<FoodItem> {
        let id = row.id.as_str();
        let food = FoodItem {
            base_price: parse_money("Food", id, "base_price", &row.base_price)?,
            discount_percent: parse_percent("Food", id, "discount_percent", &row.discount_percent)?,
            gst_percent: parse_percent("Food", id, "gst_percent", &row.gst_percent)?,
            delivery_charge: parse_money("Food", id, "delivery_charge", &row.delivery_charge)?,
            id: row.id.clone(),
            name: row.name,
            description: row.description,
            category: row.category,
            image_url: row.image_url,
            is_available: row.is_available,
        };

        food.validate()
            .map_err(|e| DbError::invalid_row("Food", &food.id, e))?;

        Ok(food)
    }
}

fn into_foods(rows: Vec<FoodRow>) -> DbResult<Vec<FoodItem>> {
    rows.into_iter().map(FoodItem::try_from).collect()
}

/// Builds a case-insensitive `LIKE` pattern matching `query` anywhere.
fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Repository for menu database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = FoodRepository::new(pool);
///
/// let menu = repo.list_available().await?;
/// let hits = repo.search("dosa").await?;
/// let food = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct FoodRepository {
    pool: SqlitePool,
}

impl FoodRepository {
    /// Creates a new FoodRepository.
    pub fn new(pool: SqlitePool) -> Self {
        FoodRepository { pool }
    }

    /// Lists every available food, ordered by name.
    pub async fn list_available(&self) -> DbResult<Vec<FoodItem>> {
        let rows: Vec<FoodRow> = sqlx::query_as(&format!(
            "SELECT {FOOD_COLUMNS} FROM foods WHERE is_available = 1 ORDER BY name, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed available foods");
        into_foods(rows)
    }

    /// Searches available foods by name, category or description.
    ///
    /// A blank query returns the whole available menu.
    pub async fn search(&self, query: &str) -> DbResult<Vec<FoodItem>> {
        let query = query.trim();

        debug!(query = %query, "Searching foods");

        if query.is_empty() {
            return self.list_available().await;
        }

        let rows: Vec<FoodRow> = sqlx::query_as(&format!(
            r#"
            SELECT {FOOD_COLUMNS}
            FROM foods
            WHERE is_available = 1
              AND (lower(name) LIKE ?1 ESCAPE '\'
                OR lower(category) LIKE ?1 ESCAPE '\'
                OR lower(description) LIKE ?1 ESCAPE '\')
            ORDER BY name, id
            "#
        ))
        .bind(contains_pattern(query))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Search returned foods");
        into_foods(rows)
    }

    /// Lists available foods in one category (exact, case-insensitive).
    pub async fn list_by_category(&self, category: &str) -> DbResult<Vec<FoodItem>> {
        let rows: Vec<FoodRow> = sqlx::query_as(&format!(
            r#"
            SELECT {FOOD_COLUMNS}
            FROM foods
            WHERE is_available = 1 AND lower(category) = lower(?1)
            ORDER BY name, id
            "#
        ))
        .bind(category.trim())
        .fetch_all(&self.pool)
        .await?;

        into_foods(rows)
    }

    /// Distinct categories of available foods, in menu order.
    pub async fn categories(&self) -> DbResult<Vec<String>> {
        let categories: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT category
            FROM foods
            WHERE is_available = 1
            GROUP BY category
            ORDER BY MIN(name), category
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Gets a food by its ID, available or not.
    ///
    /// ## Returns
    /// * `Ok(Some(FoodItem))` - Found and valid
    /// * `Ok(None)` - No such food
    /// * `Err(DbError::InvalidRow)` - Stored row is malformed
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<FoodItem>> {
        let row: Option<FoodRow> =
            sqlx::query_as(&format!("SELECT {FOOD_COLUMNS} FROM foods WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(FoodItem::try_from).transpose()
    }

    /// Inserts a new food.
    ///
    /// ## Returns
    /// * `Err(DbError::InvalidRow)` - Food breaks a pricing invariant
    /// * `Err(DbError::UniqueViolation)` - ID already exists
    pub async fn insert(&self, food: &FoodItem) -> DbResult<()> {
        debug!(id = %food.id, name = %food.name, "Inserting food");

        if let Err(e) = food.validate() {
            warn!(id = %food.id, error = %e, "Rejected food insert");
            return Err(DbError::invalid_row("Food", &food.id, e));
        }

        sqlx::query(
            r#"
            INSERT INTO foods (
                id, name, description, category, image_url,
                base_price, discount_percent, gst_percent, delivery_charge,
                is_available, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&food.id)
        .bind(&food.name)
        .bind(&food.description)
        .bind(&food.category)
        .bind(&food.image_url)
        .bind(decimal_text(food.base_price))
        .bind(percent_text(food.discount_percent))
        .bind(percent_text(food.gst_percent))
        .bind(decimal_text(food.delivery_charge))
        .bind(food.is_available)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Takes a food off the menu or puts it back.
    pub async fn set_available(&self, id: &str, available: bool) -> DbResult<()> {
        debug!(id = %id, available, "Setting food availability");

        let result = sqlx::query("UPDATE foods SET is_available = ?2 WHERE id = ?1")
            .bind(id)
            .bind(available)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Food", id));
        }

        Ok(())
    }

    /// Counts all foods (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM foods")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Generates a new food ID.
pub fn generate_food_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
