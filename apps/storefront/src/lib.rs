//! # Thali Storefront
//!
//! Catalog, cart and checkout services over the pricing engine and the
//! SQLite repositories.
//!
//! ## Module Organization
//! ```text
//! storefront/
//! ├── lib.rs          ◄─── You are here (Storefront facade, tracing setup)
//! ├── config.rs       ◄─── Environment configuration
//! ├── session.rs      ◄─── Signed-in user
//! ├── error.rs        ◄─── ApiError returned by every service
//! └── services/
//!     ├── catalog.rs  ◄─── Menu, search, item detail
//!     ├── cart.rs     ◄─── Cart manipulation
//!     └── checkout.rs ◄─── Order placement and history
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing()        RUST_LOG, default debug for thali crates      │
//! │  2. StorefrontConfig::load()                                            │
//! │  3. Database::new(DbConfig::new(path))                                  │
//! │       • SQLite with WAL mode, run pending migrations                    │
//! │  4. Storefront::new(db, &config)                                        │
//! │  5. storefront.catalog() / cart() / checkout()                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod services;
pub mod session;

use tracing_subscriber::EnvFilter;

use thali_db::Database;

pub use config::{ConfigError, StorefrontConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use services::{CartService, CatalogService, CheckoutService};
pub use session::Session;

/// All storefront services over one database.
#[derive(Debug, Clone)]
pub struct Storefront {
    catalog: CatalogService,
    cart: CartService,
    checkout: CheckoutService,
}

impl Storefront {
    /// Wires the services to an open database.
    pub fn new(db: Database, config: &StorefrontConfig) -> Self {
        Storefront {
            catalog: CatalogService::new(db.clone()),
            cart: CartService::new(db.clone()),
            checkout: CheckoutService::new(db, config.default_payment_mode),
        }
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    pub fn cart(&self) -> &CartService {
        &self.cart
    }

    pub fn checkout(&self) -> &CheckoutService {
        &self.checkout
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=thali_db=trace` - Show trace for the data layer only
/// - Default: INFO, debug for thali crates
///
/// Logs go to stderr so command output stays clean.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,thali=debug,storefront=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use thali_core::PaymentMode;

    #[tokio::test]
    async fn test_facade_shares_one_database() {
        let db = services::tests::seeded_db().await;
        let config = StorefrontConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            default_payment_mode: PaymentMode::Upi,
            user_id: Some("user-1".to_string()),
        };
        let storefront = Storefront::new(db, &config);
        let session = Session::new("user-1").unwrap();

        assert_eq!(storefront.catalog().menu().await.unwrap().len(), 3);
        storefront.cart().add_to_cart(Some(&session), "f-dosa", 2).await.unwrap();

        let summary = storefront.checkout().prepare(Some(&session)).await.unwrap();
        assert_eq!(summary.cart.count, 1);
        assert_eq!(summary.details.payment_mode, PaymentMode::Upi);
    }
}
