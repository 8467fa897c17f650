//! # Catalog Service
//!
//! Menu browsing and the item detail price breakdown.
//!
//! ## Menu Card vs Detail View
//! ```text
//! ┌──────────────────────────┐      ┌──────────────────────────────────────┐
//! │  Paneer Tikka            │      │  Paneer Tikka              qty [2]   │
//! │  ₹200  →  ₹180           │ ───► │  Subtotal (after 10%)     ₹360.00    │
//! │  (card price, 0 dp)      │      │  GST (5%)                  ₹18.00    │
//! └──────────────────────────┘      │  Delivery                  ₹40.00    │
//!                                   │  Total                    ₹418.00    │
//!                                   └──────────────────────────────────────┘
//! ```
//!
//! The detail view taxes at the item's own GST rate.

use serde::Serialize;
use tracing::debug;

use thali_core::pricing::{card_price, ItemDetailBreakdown};
use thali_core::{price_item_detail, validation, FoodItem, Money};
use thali_db::Database;

use crate::error::{ApiError, ApiResult};

/// A food as shown on the menu grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuCard {
    #[serde(flatten)]
    pub food: FoodItem,
    /// Discounted unit price, exact.
    pub card_price: Money,
    /// Discounted unit price as displayed, e.g. `₹180`.
    pub card_label: String,
}

impl MenuCard {
    fn from_food(food: FoodItem) -> ApiResult<Self> {
        let price = card_price(&food)?;
        Ok(MenuCard {
            card_label: price.card_label(),
            card_price: price,
            food,
        })
    }
}

/// The item detail view for a chosen quantity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemDetail {
    pub food: FoodItem,
    pub breakdown: ItemDetailBreakdown,
    /// `breakdown.total` as displayed, e.g. `₹418.00`.
    pub total_label: String,
}

/// Menu browsing; no session required.
#[derive(Debug, Clone)]
pub struct CatalogService {
    db: Database,
}

impl CatalogService {
    pub fn new(db: Database) -> Self {
        CatalogService { db }
    }

    /// Every available food, ordered by name.
    pub async fn menu(&self) -> ApiResult<Vec<MenuCard>> {
        let foods = self.db.foods().list_available().await?;
        cards(foods)
    }

    /// Categories of available foods.
    pub async fn categories(&self) -> ApiResult<Vec<String>> {
        Ok(self.db.foods().categories().await?)
    }

    /// Available foods in one category.
    pub async fn by_category(&self, category: &str) -> ApiResult<Vec<MenuCard>> {
        validation::validate_required("category", category)?;
        let foods = self.db.foods().list_by_category(category).await?;
        cards(foods)
    }

    /// Searches name, category and description; blank returns the menu.
    pub async fn search(&self, query: &str) -> ApiResult<Vec<MenuCard>> {
        let query = validation::validate_search_query(query)?;
        debug!(query = %query, "Catalog search");

        let foods = self.db.foods().search(&query).await?;
        cards(foods)
    }

    /// Price breakdown for `quantity` units of one food.
    ///
    /// ## Errors
    /// * `NOT_FOUND` - no such food
    /// * `VALIDATION_ERROR` - quantity < 1 or above the per-item maximum
    pub async fn item_detail(&self, food_id: &str, quantity: i64) -> ApiResult<ItemDetail> {
        let food = self
            .db
            .foods()
            .get_by_id(food_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Food", food_id))?;

        let breakdown = price_item_detail(&food, quantity)?;

        Ok(ItemDetail {
            total_label: breakdown.total.to_string(),
            food,
            breakdown,
        })
    }
}

fn cards(foods: Vec<FoodItem>) -> ApiResult<Vec<MenuCard>> {
    foods.into_iter().map(MenuCard::from_food).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::services::tests::{food, seeded_db};
    use thali_core::Percentage;

    #[tokio::test]
    async fn test_menu_cards() {
        let catalog = CatalogService::new(seeded_db().await);

        let menu = catalog.menu().await.unwrap();
        assert_eq!(menu.len(), 3);

        let paneer = menu.iter().find(|c| c.food.id == "f-paneer").unwrap();
        assert_eq!(paneer.card_price, Money::from_rupees(180));
        assert_eq!(paneer.card_label, "₹180");
    }

    #[tokio::test]
    async fn test_item_detail_uses_item_gst() {
        let catalog = CatalogService::new(seeded_db().await);

        let detail = catalog.item_detail("f-paneer", 2).await.unwrap();
        assert_eq!(detail.breakdown.card_discount, Money::from_rupees(40));
        assert_eq!(detail.breakdown.subtotal, Money::from_rupees(360));
        assert_eq!(detail.breakdown.gst, Money::from_rupees(18));
        assert_eq!(detail.breakdown.total, Money::from_rupees(418));
        assert_eq!(detail.total_label, "₹418.00");

        let biryani = catalog.item_detail("f-biryani", 1).await.unwrap();
        // 250 - 20% = 200, taxed at the item's 12%
        assert_eq!(biryani.breakdown.gst, Money::from_rupees(24));
    }

    #[tokio::test]
    async fn test_item_detail_errors() {
        let catalog = CatalogService::new(seeded_db().await);

        assert_eq!(
            catalog.item_detail("nope", 1).await.unwrap_err().code,
            ErrorCode::NotFound
        );
        assert_eq!(
            catalog.item_detail("f-paneer", 0).await.unwrap_err().code,
            ErrorCode::ValidationError
        );
    }

    #[tokio::test]
    async fn test_search_and_categories() {
        let db = seeded_db().await;
        let mut hidden = food("f-hidden", "Paneer Pakora", "Starters", 90);
        hidden.is_available = false;
        hidden.discount_percent = Percentage::zero();
        db.foods().insert(&hidden).await.unwrap();

        let catalog = CatalogService::new(db);

        let hits = catalog.search("paneer").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(catalog.search("").await.unwrap().len(), 3);
        assert!(catalog.search(&"x".repeat(101)).await.is_err());

        assert_eq!(
            catalog.categories().await.unwrap(),
            vec!["South Indian", "Starters", "Biryani"]
        );
        assert_eq!(catalog.by_category("biryani").await.unwrap().len(), 1);
        assert_eq!(
            catalog.by_category(" ").await.unwrap_err().code,
            ErrorCode::ValidationError
        );
    }
}
