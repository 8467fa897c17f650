//! # Domain Types
//!
//! Records exchanged with the storefront's data service.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    FoodItem     │   │    CartLine     │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  base_price     │◄──│  food (joined)  │   │  items snapshot │       │
//! │  │  discount_%     │   │  quantity ≥ 1   │──►│  totals         │       │
//! │  │  gst_%          │   │  user_id        │   │  payment_mode   │       │
//! │  │  delivery_charge│   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Profile      │   │  PaymentMode    │   │  OrderStatus    │       │
//! │  │  full_name      │   │  Cod/Card/Upi   │   │  Pending        │       │
//! │  │  phone, address │   │  (label only)   │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names follow the data service's columns (`base_price`,
//! `gst_percent`, ...), so rows deserialize without renaming. The joined food
//! on a cart row arrives under the key `foods`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::{Money, Percentage};
use crate::validation;

// =============================================================================
// Food Item
// =============================================================================

/// A dish on the menu.
///
/// Only `base_price`, `discount_percent`, `gst_percent` and
/// `delivery_charge` take part in pricing. The rest is display data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Short description shown on the detail view; also searched.
    #[serde(default)]
    pub description: String,

    /// Menu category, e.g. "Biryani".
    pub category: String,

    /// Image reference, resolved by the client.
    #[serde(default)]
    pub image_url: Option<String>,

    /// Price per unit in rupees.
    pub base_price: Money,

    /// Discount on the 0-100 scale.
    pub discount_percent: Percentage,

    /// GST rate applied by the item detail view.
    pub gst_percent: Percentage,

    /// Flat delivery fee carried by this item.
    pub delivery_charge: Money,

    /// Whether the item is currently offered.
    pub is_available: bool,
}

impl FoodItem {
    /// Checks the pricing invariants of this row.
    ///
    /// ## Rules
    /// - `base_price ≥ 0`
    /// - `0 ≤ discount_percent ≤ 100`
    /// - `gst_percent ≥ 0`
    /// - `delivery_charge ≥ 0`
    /// - non-empty `id` and `name`
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_required("id", &self.id)?;
        validation::validate_food_name(&self.name)?;
        validation::validate_amount("base_price", self.base_price)?;
        validation::validate_discount_percent(self.discount_percent)?;
        validation::validate_gst_percent(self.gst_percent)?;
        validation::validate_amount("delivery_charge", self.delivery_charge)?;
        Ok(())
    }

    /// Returns true if the item has any discount.
    #[inline]
    pub fn has_discount(&self) -> bool {
        !self.discount_percent.is_zero()
    }

    /// Case-insensitive match on name, category or description.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&needle)
            || self.category.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// A row of `cart_items` joined with its food.
///
/// One line per (user, food). Adding the same food again replaces the
/// quantity instead of creating a second line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: String,
    pub user_id: String,
    pub food_id: String,
    /// Always ≥ 1.
    pub quantity: i64,
    /// The joined catalog row.
    #[serde(rename = "foods")]
    pub food: FoodItem,
}

impl CartLine {
    /// Checks the quantity floor, the join and the joined food.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_min_quantity(self.quantity)?;
        if self.food_id != self.food.id {
            return Err(ValidationError::InvalidFormat {
                field: "food_id".to_string(),
                reason: format!("joined food is {}", self.food.id),
            });
        }
        self.food.validate()
    }
}

// =============================================================================
// Payment Mode
// =============================================================================

/// How the customer intends to pay. Recorded as a label only.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMode {
    /// Cash on delivery.
    #[default]
    Cod,
    /// Card on delivery.
    Card,
    /// UPI transfer.
    Upi,
}

impl PaymentMode {
    /// Every accepted label, in display order.
    pub const ALL: [PaymentMode; 3] = [PaymentMode::Cod, PaymentMode::Card, PaymentMode::Upi];

    /// The stored label.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Cod => "cod",
            PaymentMode::Card => "card",
            PaymentMode::Upi => "upi",
        }
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_lowercase();
        PaymentMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == label)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "payment_mode".to_string(),
                allowed: PaymentMode::ALL.iter().map(|m| m.to_string()).collect(),
            })
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle status of a placed order.
///
/// The storefront only ever creates orders; later transitions belong to the
/// kitchen side of the data service.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed, awaiting the kitchen.
    #[default]
    Pending,
}

// =============================================================================
// Order
// =============================================================================

/// One line of an order, frozen at placement time.
///
/// Changing the catalog afterwards never alters this snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub food_id: String,
    pub name: String,
    pub quantity: i64,
    /// Unit base price at placement.
    pub price: Money,
    pub discount_percent: Percentage,
}

/// A placed order with its own item snapshot and totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub subtotal: Money,
    pub discount: Money,
    pub gst: Money,
    pub delivery_charge: Money,
    pub total: Money,
    pub delivery_address: String,
    pub payment_mode: PaymentMode,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Profile
// =============================================================================

/// Delivery details remembered for a user; prefilled at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Profile {
    /// Same id as the authenticated user.
    pub id: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
