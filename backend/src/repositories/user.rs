//! User repository for database operations
//!
//! Users are created upstream; this table only carries the settings the
//! training calendar and weight dashboard need. Rows are created lazily the
//! first time a user writes anything.

use anyhow::Result;
use chrono::{DateTime, Utc};
use metabolic_shared::UserProfile;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub timezone: String,
    pub start_weight: Option<Decimal>,
    pub training_days: Vec<i32>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn into_profile(self) -> UserProfile {
        UserProfile {
            id: self.id,
            timezone: self.timezone,
            start_weight: self.start_weight.and_then(|w| w.to_f64()),
            training_days: self
                .training_days
                .into_iter()
                .filter_map(|d| u32::try_from(d).ok())
                .collect(),
        }
    }
}

/// Sunday=0 day indexes as stored in the `INTEGER[]` column
fn days_column(days: &[u32]) -> Vec<i32> {
    days.iter().filter_map(|&d| i32::try_from(d).ok()).collect()
}

/// User repository for database operations
///
/// Every insert takes the caller's resolved defaults so a new row starts with
/// the configured timezone and training days, never the column defaults.
pub struct UserRepository;

impl UserRepository {
    /// Make sure a settings row exists, seeded from `defaults`
    pub async fn ensure_exists(pool: &PgPool, defaults: &UserProfile) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, timezone, training_days)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(defaults.id)
        .bind(&defaults.timezone)
        .bind(days_column(&defaults.training_days))
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Get the user's settings, if a row exists
    pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<UserRecord>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, timezone, start_weight, training_days, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Set the user's IANA timezone
    pub async fn update_timezone(
        pool: &PgPool,
        defaults: &UserProfile,
        timezone: &str,
    ) -> Result<UserRecord> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (id, timezone, training_days)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET timezone = EXCLUDED.timezone, updated_at = NOW()
            RETURNING id, timezone, start_weight, training_days, updated_at
            "#,
        )
        .bind(defaults.id)
        .bind(timezone)
        .bind(days_column(&defaults.training_days))
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Set or clear the user's start weight
    pub async fn update_start_weight(
        pool: &PgPool,
        defaults: &UserProfile,
        start_weight: Option<f64>,
    ) -> Result<UserRecord> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (id, timezone, training_days, start_weight)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET start_weight = EXCLUDED.start_weight, updated_at = NOW()
            RETURNING id, timezone, start_weight, training_days, updated_at
            "#,
        )
        .bind(defaults.id)
        .bind(&defaults.timezone)
        .bind(days_column(&defaults.training_days))
        .bind(start_weight)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }
}
