//! Mobility routine API routes

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::services::MobilityService;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use metabolic_shared::types::{LogMobilityRequest, MobilityHistoryQuery, MobilityLogResponse};

/// Create mobility routes
pub fn mobility_routes() -> Router<AppState> {
    Router::new()
        .route("/logs", post(log_mobility).get(get_history))
        .route("/logs/today", get(get_today_logs))
}

/// POST /api/v1/mobility/logs - Log a completed routine
async fn log_mobility(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<LogMobilityRequest>,
) -> Result<(StatusCode, Json<MobilityLogResponse>), ApiError> {
    let log = MobilityService::log(state.db(), state.config(), user.user_id, req, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(log)))
}

/// GET /api/v1/mobility/logs/today - Routines logged on the current training date
async fn get_today_logs(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<MobilityLogResponse>>, ApiError> {
    let logs = MobilityService::today(state.db(), state.config(), user.user_id, Utc::now()).await?;
    Ok(Json(logs))
}

/// GET /api/v1/mobility/logs - Mobility history, newest training date first
async fn get_history(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<MobilityHistoryQuery>,
) -> Result<Json<Vec<MobilityLogResponse>>, ApiError> {
    let logs = MobilityService::history(state.db(), user.user_id, query.limit).await?;
    Ok(Json(logs))
}
