//! # Repository Module
//!
//! Database repository implementations for the storefront.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CartService                                                            │
//! │       │                                                                 │
//! │       │  db.cart().list_for_user("user-1")                              │
//! │       ▼                                                                 │
//! │  CartRepository                                                         │
//! │  ├── SQL query → CartRow (plain columns, decimals as TEXT)              │
//! │  └── CartRow → CartLine (parsed + validated, or DbError::InvalidRow)    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  thali-core pricing only ever sees validated records                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`FoodRepository`](food::FoodRepository) - Menu listing, search, lookup
//! - [`CartRepository`](cart::CartRepository) - Per-user cart lines
//! - [`ProfileRepository`](profile::ProfileRepository) - Saved delivery details
//! - [`OrderRepository`](order::OrderRepository) - Order placement and history

pub mod cart;
pub mod food;
pub mod order;
pub mod profile;

use std::str::FromStr;

use thali_core::{Money, Percentage};

use crate::error::{DbError, DbResult};

/// Parses a decimal TEXT column into [`Money`].
pub(crate) fn parse_money(entity: &str, id: &str, field: &str, text: &str) -> DbResult<Money> {
    Money::from_str(text)
        .map_err(|e| DbError::invalid_row(entity, id, format!("{field} '{text}': {e}")))
}

/// Parses a decimal TEXT column into a [`Percentage`].
pub(crate) fn parse_percent(
    entity: &str,
    id: &str,
    field: &str,
    text: &str,
) -> DbResult<Percentage> {
    Percentage::from_str(text)
        .map_err(|e| DbError::invalid_row(entity, id, format!("{field} '{text}': {e}")))
}

/// Text stored for a decimal column; keeps the value's scale.
pub(crate) fn decimal_text(amount: Money) -> String {
    amount.amount().to_string()
}

pub(crate) fn percent_text(pct: Percentage) -> String {
    pct.value().to_string()
}
