//! Training day and workout session API routes

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::services::TrainingService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use metabolic_shared::types::{
    ExerciseHistoryEntry, PreviousSetResponse, SessionDetailResponse, SessionListQuery,
    SessionSetResponse, StartSessionRequest, TrainingTodayResponse, WorkoutPlanResponse,
    WorkoutSessionResponse,
};
use metabolic_shared::validation::SetLogForm;
use uuid::Uuid;

/// Create training routes
pub fn training_routes() -> Router<AppState> {
    Router::new()
        .route("/today", get(get_today))
        .route("/plans", get(list_plans))
        .route("/plans/:id/previous-sets", get(get_previous_sets))
        .route("/sessions", post(start_session).get(list_sessions))
        .route("/sessions/:id", get(get_session))
        .route("/sessions/:id/sets", post(log_set))
        .route("/sessions/:id/complete", post(complete_session))
        .route("/exercises/:name/history", get(get_exercise_history))
}

/// GET /api/v1/training/today - Current training day and its plan
async fn get_today(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<TrainingTodayResponse>, ApiError> {
    let today = TrainingService::today(state.db(), state.config(), user.user_id, Utc::now()).await?;
    Ok(Json(today))
}

/// POST /api/v1/training/sessions - Start or resume today's session
///
/// 201 when a session was created, 200 when the existing one is returned.
async fn start_session(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<WorkoutSessionResponse>), ApiError> {
    let at = req.started_at.unwrap_or_else(Utc::now);
    let started =
        TrainingService::start_session(state.db(), state.config(), user.user_id, req.plan_id, at).await?;

    let status = if started.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(started.session)))
}

/// GET /api/v1/training/sessions - Session history
async fn list_sessions(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<SessionListQuery>,
) -> Result<Json<Vec<WorkoutSessionResponse>>, ApiError> {
    let sessions = TrainingService::list_sessions(state.db(), user.user_id, query.limit).await?;
    Ok(Json(sessions))
}

/// GET /api/v1/training/plans - Active weekly plans with their exercises
async fn list_plans(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<WorkoutPlanResponse>>, ApiError> {
    let plans = TrainingService::list_plans(state.db(), user.user_id).await?;
    Ok(Json(plans))
}

/// GET /api/v1/training/plans/:id/previous-sets - Sets from the last completed session
async fn get_previous_sets(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(plan_id): Path<Uuid>,
) -> Result<Json<Vec<PreviousSetResponse>>, ApiError> {
    let sets = TrainingService::previous_sets(state.db(), user.user_id, plan_id).await?;
    Ok(Json(sets))
}

/// GET /api/v1/training/sessions/:id - Session with its plan and logged sets
async fn get_session(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionDetailResponse>, ApiError> {
    let detail = TrainingService::session_detail(state.db(), user.user_id, session_id).await?;
    Ok(Json(detail))
}

/// POST /api/v1/training/sessions/:id/sets - Log or overwrite one set
///
/// 201 when the set is new, 200 when an earlier log was replaced.
async fn log_set(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(session_id): Path<Uuid>,
    Json(form): Json<SetLogForm>,
) -> Result<(StatusCode, Json<SessionSetResponse>), ApiError> {
    let logged = TrainingService::log_set(state.db(), user.user_id, session_id, form).await?;

    let status = if logged.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(logged.set)))
}

/// POST /api/v1/training/sessions/:id/complete - Finish a session
async fn complete_session(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(session_id): Path<Uuid>,
) -> Result<Json<WorkoutSessionResponse>, ApiError> {
    let session =
        TrainingService::complete_session(state.db(), user.user_id, session_id, Utc::now()).await?;
    Ok(Json(session))
}

/// GET /api/v1/training/exercises/:name/history - Every logged set of an exercise
async fn get_exercise_history(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(name): Path<String>,
) -> Result<Json<Vec<ExerciseHistoryEntry>>, ApiError> {
    let history = TrainingService::exercise_history(state.db(), user.user_id, &name).await?;
    Ok(Json(history))
}
