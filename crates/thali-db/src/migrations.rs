//! # Schema Migrations
//!
//! The storefront schema, embedded at compile time from the workspace
//! `migrations/sqlite/` directory.
//!
//! ```text
//! 001_initial_schema.sql
//! ├── foods        menu rows; money and percentages as decimal TEXT
//! ├── cart_items   one line per (user_id, food_id), quantity ≥ 1,
//! │                ON DELETE CASCADE from foods
//! ├── profiles     delivery details keyed by user id
//! └── orders       frozen item JSON + totals, newest-first index per user
//! ```
//!
//! Applied versions are recorded in `_sqlx_migrations`; opening an already
//! migrated file is a no-op. Schema changes go in a new numbered file, never
//! an edit to an applied one.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies every migration not yet recorded.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    debug!(embedded = MIGRATOR.migrations.len(), "Checking schema version");
    MIGRATOR.run(pool).await?;
    info!("Schema up to date");
    Ok(())
}

/// `(embedded, applied)` migration counts.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await?;

    Ok((MIGRATOR.migrations.len(), applied as usize))
}
