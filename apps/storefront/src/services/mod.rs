//! # Storefront Services
//!
//! Orchestration between the pricing engine and the repositories.
//!
//! ```text
//! services/
//! ├── catalog.rs   ◄─── menu, categories, search, item detail
//! ├── cart.rs      ◄─── add / view / +1 / -1 / remove / count
//! └── checkout.rs  ◄─── prepare, place_order, order history
//! ```
//!
//! Services hold a cloned [`thali_db::Database`] handle; the signed-in user
//! is an explicit `Option<&Session>` argument on every cart and checkout call.

pub mod cart;
pub mod catalog;
pub mod checkout;

pub use cart::{CartLineView, CartService, CartView};
pub use catalog::{CatalogService, ItemDetail, MenuCard};
pub use checkout::{CheckoutService, CheckoutSummary};
