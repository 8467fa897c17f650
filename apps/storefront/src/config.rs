//! Storefront configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                      | Default                               |
//! |-------------------------------|---------------------------------------|
//! | `THALI_DB_PATH`               | `<platform data dir>/thali.db`        |
//! | `THALI_DB_MAX_CONNECTIONS`    | `5`                                   |
//! | `THALI_DEFAULT_PAYMENT_MODE`  | `cod`                                 |
//! | `THALI_USER_ID`               | unset (no session)                    |

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use thali_core::PaymentMode;

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size
    pub max_connections: u32,

    /// Payment mode preselected on the checkout form
    pub default_payment_mode: PaymentMode,

    /// Signed-in user, if any
    pub user_id: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = match lookup("THALI_DB_PATH") {
            Some(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_database_path()?,
        };

        let max_connections = match lookup("THALI_DB_MAX_CONNECTIONS") {
            Some(value) => value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ConfigError::InvalidValue("THALI_DB_MAX_CONNECTIONS".to_string()))?,
            None => 5,
        };

        let default_payment_mode = match lookup("THALI_DEFAULT_PAYMENT_MODE") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidValue("THALI_DEFAULT_PAYMENT_MODE".to_string()))?,
            None => PaymentMode::default(),
        };

        let user_id = lookup("THALI_USER_ID")
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());

        Ok(StorefrontConfig {
            database_path,
            max_connections,
            default_payment_mode,
            user_id,
        })
    }
}

/// Platform data directory path for the database.
///
/// - **macOS**: `~/Library/Application Support/com.thali.storefront/thali.db`
/// - **Linux**: `~/.local/share/storefront/thali.db`
/// - **Windows**: `%APPDATA%\thali\storefront\data\thali.db`
fn default_database_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("com", "thali", "storefront").ok_or(ConfigError::NoDataDir)?;
    Ok(dirs.data_dir().join("thali.db"))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Could not determine app data directory; set THALI_DB_PATH")]
    NoDataDir,
}
