//! Mobility routine logging service

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::repositories::{CreateMobilityLog, MobilityLogRecord, MobilityLogRepository};
use crate::services::ProfileService;
use chrono::{DateTime, Utc};
use metabolic_shared::calendar::training_date;
use metabolic_shared::types::{LogMobilityRequest, MobilityLogResponse};
use metabolic_shared::validation::FieldError;
use metabolic_shared::MobilityVersion;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

/// Default and maximum page size for mobility history
const DEFAULT_HISTORY_LIMIT: i64 = 30;
const MAX_HISTORY_LIMIT: i64 = 365;

const MAX_NOTES_CHARS: usize = 1000;

fn to_response(record: MobilityLogRecord) -> Result<MobilityLogResponse, ApiError> {
    Ok(MobilityLogResponse {
        id: record.id.to_string(),
        mobility_type: record.mobility_type().map_err(ApiError::Internal)?,
        version: record.version(),
        training_date: record.training_date,
        completed_at: record.completed_at,
        notes: record.notes,
    })
}

/// Mobility service for business logic
pub struct MobilityService;

impl MobilityService {
    /// Record a completed routine against the training date it was done on
    pub async fn log(
        pool: &PgPool,
        config: &AppConfig,
        user_id: Uuid,
        request: LogMobilityRequest,
        now: DateTime<Utc>,
    ) -> Result<MobilityLogResponse, ApiError> {
        if request.notes.as_ref().is_some_and(|n| n.chars().count() > MAX_NOTES_CHARS) {
            return Err(FieldError::new("notes", "Notes cannot exceed 1000 characters").into());
        }

        let profile = ProfileService::load(pool, config, user_id).await?;
        let completed_at = request.completed_at.unwrap_or(now);
        let date = training_date(completed_at, &profile.timezone)?;

        ProfileService::ensure_settings(pool, config, user_id).await?;

        let record = MobilityLogRepository::create(
            pool,
            CreateMobilityLog {
                user_id,
                mobility_type: request.mobility_type,
                version: Some(request.version.unwrap_or(MobilityVersion::A)),
                training_date: date,
                completed_at,
                notes: request.notes.filter(|n| !n.trim().is_empty()),
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        debug!(
            user_id = %user_id,
            mobility_type = request.mobility_type.as_str(),
            training_date = %date,
            "Mobility routine logged"
        );

        to_response(record)
    }

    /// Routines logged on the training date at `now`
    pub async fn today(
        pool: &PgPool,
        config: &AppConfig,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<MobilityLogResponse>, ApiError> {
        let profile = ProfileService::load(pool, config, user_id).await?;
        let date = training_date(now, &profile.timezone)?;

        MobilityLogRepository::list_for_date(pool, user_id, date)
            .await
            .map_err(ApiError::Internal)?
            .into_iter()
            .map(to_response)
            .collect()
    }

    /// Logged routines, newest training date first
    pub async fn history(
        pool: &PgPool,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<MobilityLogResponse>, ApiError> {
        MobilityLogRepository::list_recent(pool, user_id, Self::clamp_limit(limit))
            .await
            .map_err(ApiError::Internal)?
            .into_iter()
            .map(to_response)
            .collect()
    }

    fn clamp_limit(limit: Option<i64>) -> i64 {
        limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, MAX_HISTORY_LIMIT)
    }
}
