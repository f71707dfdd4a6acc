//! Weight tracking service
//!
//! CRUD over weigh-ins plus the dashboard read models. Statistics and chart
//! series are recomputed from the full history on every request; "today" is
//! the user's local calendar date, not the training date.

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::repositories::WeightEntryRepository;
use crate::services::ProfileService;
use chrono::{DateTime, Days, NaiveDate, Utc};
use metabolic_shared::calendar::local_today;
use metabolic_shared::validation::{FieldError, WeightEntryForm};
use metabolic_shared::weight::{
    build_chart_series_with, compute_statistics_with, filter_chart_range, filter_chart_since,
    DASHBOARD_CHART_DAYS,
};
use metabolic_shared::{
    CalendarError, ChartPoint, ChartRange, UserProfile, WeightAnalysisConfig, WeightObservation,
    WeightStatistics,
};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

/// Statistics together with the date their windows end on
#[derive(Debug, Clone)]
pub struct StatisticsView {
    pub stats: WeightStatistics,
    pub today: NaiveDate,
}

/// Statistics plus the trailing dashboard chart
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub stats: WeightStatistics,
    pub chart: Vec<ChartPoint>,
    pub today: NaiveDate,
}

/// Weight service for business logic
pub struct WeightService;

impl WeightService {
    /// All of a user's weigh-ins, newest first
    pub async fn list(pool: &PgPool, user_id: Uuid) -> Result<Vec<WeightObservation>, ApiError> {
        let records = WeightEntryRepository::list_for_user(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(records.into_iter().map(|r| r.into_observation()).collect())
    }

    /// Validate and store a manual weigh-in
    pub async fn create(
        pool: &PgPool,
        config: &AppConfig,
        user_id: Uuid,
        form: WeightEntryForm,
    ) -> Result<WeightObservation, ApiError> {
        let entry = form.into_observation()?;

        ProfileService::ensure_settings(pool, config, user_id).await?;

        let record = WeightEntryRepository::create(pool, user_id, &entry)
            .await
            .map_err(ApiError::Internal)?;

        metrics::counter!("weight_entries_created_total").increment(1);
        info!(user_id = %user_id, date = %entry.date, "Weight entry created");

        Ok(record.into_observation())
    }

    /// Validate and replace an existing weigh-in
    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
        form: WeightEntryForm,
    ) -> Result<WeightObservation, ApiError> {
        let entry = form.into_observation()?;

        let record = WeightEntryRepository::update(pool, id, user_id, &entry)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Weight entry not found".to_string()))?;

        Ok(record.into_observation())
    }

    /// Delete a weigh-in the user owns
    pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        let deleted = WeightEntryRepository::delete(pool, id, user_id)
            .await
            .map_err(ApiError::Internal)?;

        if !deleted {
            return Err(ApiError::NotFound("Weight entry not found".to_string()));
        }

        debug!(user_id = %user_id, id = %id, "Weight entry deleted");
        Ok(())
    }

    /// Dashboard statistics as of `now`
    pub async fn statistics(
        pool: &PgPool,
        config: &AppConfig,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<StatisticsView, ApiError> {
        let profile = ProfileService::load(pool, config, user_id).await?;
        let observations = Self::list(pool, user_id).await?;

        Ok(Self::statistics_for(&profile, &observations, now, &config.analysis)?)
    }

    /// Chart series for a zoom range as of `now`
    pub async fn chart(
        pool: &PgPool,
        config: &AppConfig,
        user_id: Uuid,
        range: ChartRange,
        now: DateTime<Utc>,
    ) -> Result<Vec<ChartPoint>, ApiError> {
        let profile = ProfileService::load(pool, config, user_id).await?;
        let observations = Self::list(pool, user_id).await?;

        Ok(Self::chart_for(&profile, &observations, range, now, &config.analysis)?)
    }

    /// Statistics and the last-30-days chart in one read
    pub async fn dashboard(
        pool: &PgPool,
        config: &AppConfig,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<DashboardView, ApiError> {
        let profile = ProfileService::load(pool, config, user_id).await?;
        let observations = Self::list(pool, user_id).await?;

        Ok(Self::dashboard_for(&profile, &observations, now, &config.analysis)?)
    }

    /// Parse the `range` query parameter, defaulting to one month
    pub fn parse_range(raw: Option<&str>) -> Result<ChartRange, ApiError> {
        match raw.map(str::trim).filter(|r| !r.is_empty()) {
            None => Ok(ChartRange::default()),
            Some(r) => r
                .parse()
                .map_err(|msg: String| FieldError::new("range", &msg).into()),
        }
    }

    pub fn statistics_for(
        profile: &UserProfile,
        observations: &[WeightObservation],
        now: DateTime<Utc>,
        analysis: &WeightAnalysisConfig,
    ) -> Result<StatisticsView, CalendarError> {
        let today = local_today(now, &profile.timezone)?;
        let stats = compute_statistics_with(observations, profile.start_weight, today, analysis);
        Ok(StatisticsView { stats, today })
    }

    pub fn chart_for(
        profile: &UserProfile,
        observations: &[WeightObservation],
        range: ChartRange,
        now: DateTime<Utc>,
        analysis: &WeightAnalysisConfig,
    ) -> Result<Vec<ChartPoint>, CalendarError> {
        let today = local_today(now, &profile.timezone)?;
        // Moving averages need the full history, so filter after building
        let series = build_chart_series_with(observations, analysis);
        Ok(filter_chart_range(series, range, today))
    }

    pub fn dashboard_for(
        profile: &UserProfile,
        observations: &[WeightObservation],
        now: DateTime<Utc>,
        analysis: &WeightAnalysisConfig,
    ) -> Result<DashboardView, CalendarError> {
        let StatisticsView { stats, today } = Self::statistics_for(profile, observations, now, analysis)?;
        let cutoff = today
            .checked_sub_days(Days::new(DASHBOARD_CHART_DAYS))
            .unwrap_or(NaiveDate::MIN);
        let chart = filter_chart_since(build_chart_series_with(observations, analysis), cutoff);

        Ok(DashboardView { stats, chart, today })
    }
}
