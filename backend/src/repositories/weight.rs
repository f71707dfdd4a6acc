//! Weight entry repository for database operations

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use metabolic_shared::{NewWeightObservation, WeighInStatus, WeightObservation};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::warn;
use uuid::Uuid;

/// Weight entry record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WeightEntryRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub entry_date: NaiveDate,
    pub weight: Decimal,
    pub body_fat_percent: Option<Decimal>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl WeightEntryRecord {
    /// Convert into the domain observation
    pub fn into_observation(self) -> WeightObservation {
        let status = self.status.parse::<WeighInStatus>().unwrap_or_else(|_| {
            warn!(id = %self.id, status = %self.status, "Unrecognised stored status, using NORMAL");
            WeighInStatus::default()
        });

        WeightObservation {
            id: self.id,
            date: self.entry_date,
            weight: decimal_to_f64(&self.weight),
            body_fat_percent: self.body_fat_percent.as_ref().map(decimal_to_f64),
            status,
            notes: self.notes,
            created_at: self.created_at,
        }
    }
}

fn decimal_to_f64(d: &Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

const SELECT_COLUMNS: &str =
    "id, user_id, entry_date, weight, body_fat_percent, status, notes, created_at";

/// Weight entry repository for database operations
pub struct WeightEntryRepository;

impl WeightEntryRepository {
    /// All entries for a user, newest first
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<WeightEntryRecord>> {
        let records = sqlx::query_as::<_, WeightEntryRecord>(&format!(
            r#"
            SELECT {SELECT_COLUMNS}
            FROM weight_entries
            WHERE user_id = $1
            ORDER BY entry_date DESC, created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Get an entry by ID, scoped to its owner
    pub async fn get_by_id(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<WeightEntryRecord>> {
        let record = sqlx::query_as::<_, WeightEntryRecord>(&format!(
            r#"
            SELECT {SELECT_COLUMNS}
            FROM weight_entries
            WHERE id = $1 AND user_id = $2
            "#
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Insert a single entry
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        entry: &NewWeightObservation,
    ) -> Result<WeightEntryRecord> {
        let record = sqlx::query_as::<_, WeightEntryRecord>(&format!(
            r#"
            INSERT INTO weight_entries (user_id, entry_date, weight, body_fat_percent, status, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(entry.date)
        .bind(entry.weight)
        .bind(entry.body_fat_percent)
        .bind(entry.status.as_str())
        .bind(&entry.notes)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Insert a batch inside the caller's transaction
    pub async fn create_many(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        entries: &[NewWeightObservation],
    ) -> Result<u64> {
        let mut inserted = 0;
        for entry in entries {
            let result = sqlx::query(
                r#"
                INSERT INTO weight_entries (user_id, entry_date, weight, body_fat_percent, status, notes)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(user_id)
            .bind(entry.date)
            .bind(entry.weight)
            .bind(entry.body_fat_percent)
            .bind(entry.status.as_str())
            .bind(&entry.notes)
            .execute(&mut **tx)
            .await?;
            inserted += result.rows_affected();
        }

        Ok(inserted)
    }

    /// Replace an entry's fields; `None` when the entry is not the user's
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        entry: &NewWeightObservation,
    ) -> Result<Option<WeightEntryRecord>> {
        let record = sqlx::query_as::<_, WeightEntryRecord>(&format!(
            r#"
            UPDATE weight_entries
            SET entry_date = $3, weight = $4, body_fat_percent = $5, status = $6, notes = $7
            WHERE id = $1 AND user_id = $2
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(entry.date)
        .bind(entry.weight)
        .bind(entry.body_fat_percent)
        .bind(entry.status.as_str())
        .bind(&entry.notes)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Delete an entry
    pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM weight_entries
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
