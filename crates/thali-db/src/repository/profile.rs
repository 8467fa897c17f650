//! # Profile Repository
//!
//! Delivery details remembered per user, used to prefill checkout.

use chrono::Utc;
use sqlx::{FromRow, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use thali_core::Profile;

#[derive(Debug, FromRow)]
struct ProfileRow {
    id: String,
    full_name: Option<String>,
    phone: Option<String>,
    address: Option<String>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: row.id,
            full_name: row.full_name,
            phone: row.phone,
            address: row.address,
        }
    }
}

/// Repository for profile database operations.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    pool: SqlitePool,
}

impl ProfileRepository {
    /// Creates a new ProfileRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProfileRepository { pool }
    }

    /// Gets the profile for a user, if one was ever saved.
    pub async fn get(&self, user_id: &str) -> DbResult<Option<Profile>> {
        let row: Option<ProfileRow> =
            sqlx::query_as("SELECT id, full_name, phone, address FROM profiles WHERE id = ?1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(Profile::from))
    }

    /// Creates or overwrites a profile.
    pub async fn upsert(&self, profile: &Profile) -> DbResult<()> {
        upsert_with(&self.pool, profile).await
    }
}

/// Profile upsert on any executor, so order placement can run it inside its
/// transaction.
pub(crate) async fn upsert_with<'e, E>(executor: E, profile: &Profile) -> DbResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    debug!(user_id = %profile.id, "Upserting profile");

    sqlx::query(
        r#"
        INSERT INTO profiles (id, full_name, phone, address, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT (id) DO UPDATE SET
            full_name = excluded.full_name,
            phone = excluded.phone,
            address = excluded.address,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(&profile.id)
    .bind(&profile.full_name)
    .bind(&profile.phone)
    .bind(&profile.address)
    .bind(Utc::now())
    .execute(executor)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_upsert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let profiles = db.profiles();

        assert!(profiles.get("u-1").await.unwrap().is_none());

        let mut profile = Profile {
            id: "u-1".to_string(),
            full_name: Some("Asha Rao".to_string()),
            phone: Some("98765 43210".to_string()),
            address: Some("12 MG Road".to_string()),
        };
        profiles.upsert(&profile).await.unwrap();
        assert_eq!(profiles.get("u-1").await.unwrap(), Some(profile.clone()));

        profile.address = Some("4 Park Street".to_string());
        profiles.upsert(&profile).await.unwrap();
        assert_eq!(
            profiles.get("u-1").await.unwrap().unwrap().address.as_deref(),
            Some("4 Park Street")
        );
    }
}
