//! User profile API routes

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::services::ProfileService;
use crate::state::AppState;
use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use metabolic_shared::types::{UpdateStartWeightRequest, UpdateTimezoneRequest};
use metabolic_shared::UserProfile;

/// Create profile routes
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile))
        .route("/timezone", put(update_timezone))
        .route("/start-weight", put(update_start_weight))
}

/// GET /api/v1/profile - Timezone, start weight and training days
async fn get_profile(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = ProfileService::load(state.db(), state.config(), user.user_id).await?;
    Ok(Json(profile))
}

/// PUT /api/v1/profile/timezone - Change the calendar timezone
async fn update_timezone(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<UpdateTimezoneRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = ProfileService::update_timezone(state.db(), state.config(), user.user_id, &req.timezone).await?;
    Ok(Json(profile))
}

/// PUT /api/v1/profile/start-weight - Set or clear the start weight
async fn update_start_weight(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<UpdateStartWeightRequest>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile = ProfileService::update_start_weight(state.db(), state.config(), user.user_id, req.start_weight).await?;
    Ok(Json(profile))
}
