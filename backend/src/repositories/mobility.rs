//! Mobility routine log repository for database operations

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use metabolic_shared::{MobilityType, MobilityVersion};
use sqlx::PgPool;
use uuid::Uuid;

/// Mobility log record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MobilityLogRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mobility_type: String,
    pub version: Option<String>,
    pub training_date: NaiveDate,
    pub completed_at: DateTime<Utc>,
    pub notes: Option<String>,
}

impl MobilityLogRecord {
    pub fn mobility_type(&self) -> Result<MobilityType> {
        self.mobility_type
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
    }

    pub fn version(&self) -> Option<MobilityVersion> {
        self.version.as_deref().and_then(|v| v.parse().ok())
    }
}

/// Input for logging a mobility routine
#[derive(Debug, Clone)]
pub struct CreateMobilityLog {
    pub user_id: Uuid,
    pub mobility_type: MobilityType,
    pub version: Option<MobilityVersion>,
    pub training_date: NaiveDate,
    pub completed_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Mobility log repository for database operations
pub struct MobilityLogRepository;

impl MobilityLogRepository {
    pub async fn create(pool: &PgPool, input: CreateMobilityLog) -> Result<MobilityLogRecord> {
        let record = sqlx::query_as::<_, MobilityLogRecord>(
            r#"
            INSERT INTO mobility_logs (user_id, mobility_type, version, training_date, completed_at, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, mobility_type, version, training_date, completed_at, notes
            "#,
        )
        .bind(input.user_id)
        .bind(input.mobility_type.as_str())
        .bind(input.version.map(|v| v.as_str()))
        .bind(input.training_date)
        .bind(input.completed_at)
        .bind(input.notes)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Logs recorded against one training date, newest first
    pub async fn list_for_date(
        pool: &PgPool,
        user_id: Uuid,
        training_date: NaiveDate,
    ) -> Result<Vec<MobilityLogRecord>> {
        let records = sqlx::query_as::<_, MobilityLogRecord>(
            r#"
            SELECT id, user_id, mobility_type, version, training_date, completed_at, notes
            FROM mobility_logs
            WHERE user_id = $1 AND training_date = $2
            ORDER BY completed_at DESC
            "#,
        )
        .bind(user_id)
        .bind(training_date)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Most recent training dates first
    pub async fn list_recent(
        pool: &PgPool,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<MobilityLogRecord>> {
        let records = sqlx::query_as::<_, MobilityLogRecord>(
            r#"
            SELECT id, user_id, mobility_type, version, training_date, completed_at, notes
            FROM mobility_logs
            WHERE user_id = $1
            ORDER BY training_date DESC, completed_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }
}
