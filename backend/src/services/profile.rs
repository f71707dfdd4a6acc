//! User profile service
//!
//! Resolves the settings the calendar and weight features read, falling back
//! to the configured defaults for users who never saved any.

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::repositories::UserRepository;
use metabolic_shared::validation::{is_valid_observed_weight, validate_timezone, FieldError};
use metabolic_shared::weight::round_to_tenth;
use metabolic_shared::UserProfile;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

/// Profile service for business logic
pub struct ProfileService;

impl ProfileService {
    /// Profile used when the user has no settings row yet
    pub fn default_profile(config: &AppConfig, user_id: Uuid) -> UserProfile {
        UserProfile {
            id: user_id,
            timezone: config.training.default_timezone.clone(),
            start_weight: None,
            training_days: config.training.training_days.clone(),
        }
    }

    /// Load the user's profile
    pub async fn load(pool: &PgPool, config: &AppConfig, user_id: Uuid) -> Result<UserProfile, ApiError> {
        let record = UserRepository::get_profile(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(record
            .map(|r| r.into_profile())
            .unwrap_or_else(|| Self::default_profile(config, user_id)))
    }

    /// Create the settings row on first write, seeded with the configured defaults
    pub async fn ensure_settings(pool: &PgPool, config: &AppConfig, user_id: Uuid) -> Result<(), ApiError> {
        UserRepository::ensure_exists(pool, &Self::default_profile(config, user_id))
            .await
            .map_err(ApiError::Internal)
    }

    /// Change the timezone the training calendar uses for this user
    pub async fn update_timezone(
        pool: &PgPool,
        config: &AppConfig,
        user_id: Uuid,
        timezone: &str,
    ) -> Result<UserProfile, ApiError> {
        let timezone = timezone.trim();
        validate_timezone(timezone).map_err(|msg| FieldError::new("timezone", &msg))?;

        let defaults = Self::default_profile(config, user_id);
        let record = UserRepository::update_timezone(pool, &defaults, timezone)
            .await
            .map_err(ApiError::Internal)?;

        info!(user_id = %user_id, timezone = %timezone, "Timezone updated");
        Ok(record.into_profile())
    }

    /// Set or clear the baseline the total change is measured from
    pub async fn update_start_weight(
        pool: &PgPool,
        config: &AppConfig,
        user_id: Uuid,
        start_weight: Option<f64>,
    ) -> Result<UserProfile, ApiError> {
        let start_weight = Self::normalize_start_weight(start_weight)?;

        let defaults = Self::default_profile(config, user_id);
        let record = UserRepository::update_start_weight(pool, &defaults, start_weight)
            .await
            .map_err(ApiError::Internal)?;

        Ok(record.into_profile())
    }

    fn normalize_start_weight(start_weight: Option<f64>) -> Result<Option<f64>, ApiError> {
        match start_weight {
            None => Ok(None),
            Some(w) if is_valid_observed_weight(w) => Ok(Some(round_to_tenth(w))),
            Some(_) => Err(FieldError::new("start_weight", "Start weight must be between 0 and 1000 lbs").into()),
        }
    }
}
