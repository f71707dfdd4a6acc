//! Weight tracking API routes

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::services::{ExportService, ImportService, WeightService};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use metabolic_shared::types::{
    ChartQuery, ChartResponse, ImportWeightRequest, ImportWeightResponse, WeightDashboardResponse,
    WeightEntryResponse, WeightListResponse,
};
use metabolic_shared::validation::WeightEntryForm;
use metabolic_shared::WeightStatistics;
use uuid::Uuid;

/// Create weight routes
pub fn weight_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_entries).post(create_entry))
        .route("/:id", put(update_entry).delete(delete_entry))
        .route("/stats", get(get_stats))
        .route("/chart", get(get_chart))
        .route("/dashboard", get(get_dashboard))
        .route("/import", post(import_csv))
        .route("/export", get(export_csv))
}

/// GET /api/v1/weight - All weigh-ins, newest first
async fn list_entries(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<WeightListResponse>, ApiError> {
    let entries: Vec<WeightEntryResponse> = WeightService::list(state.db(), user.user_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(WeightListResponse {
        total: entries.len(),
        entries,
    }))
}

/// POST /api/v1/weight - Add a manual weigh-in
async fn create_entry(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(form): Json<WeightEntryForm>,
) -> Result<(StatusCode, Json<WeightEntryResponse>), ApiError> {
    let entry = WeightService::create(state.db(), state.config(), user.user_id, form).await?;
    Ok((StatusCode::CREATED, Json(entry.into())))
}

/// PUT /api/v1/weight/:id - Replace a weigh-in
async fn update_entry(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(form): Json<WeightEntryForm>,
) -> Result<Json<WeightEntryResponse>, ApiError> {
    let entry = WeightService::update(state.db(), user.user_id, id, form).await?;
    Ok(Json(entry.into()))
}

/// DELETE /api/v1/weight/:id - Delete a weigh-in
async fn delete_entry(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    WeightService::delete(state.db(), user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/weight/stats - Dashboard statistics
async fn get_stats(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<WeightStatistics>, ApiError> {
    let view = WeightService::statistics(state.db(), state.config(), user.user_id, Utc::now()).await?;
    Ok(Json(view.stats))
}

/// GET /api/v1/weight/chart?range=1W|1M|3M|ALL - Chart series
async fn get_chart(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ChartResponse>, ApiError> {
    let range = WeightService::parse_range(query.range.as_deref())?;
    let points = WeightService::chart(state.db(), state.config(), user.user_id, range, Utc::now()).await?;
    Ok(Json(ChartResponse { range, points }))
}

/// GET /api/v1/weight/dashboard - Statistics and the last 30 days of chart
async fn get_dashboard(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<WeightDashboardResponse>, ApiError> {
    let view = WeightService::dashboard(state.db(), state.config(), user.user_id, Utc::now()).await?;
    Ok(Json(WeightDashboardResponse {
        stats: view.stats,
        chart: view.chart,
        today: view.today,
    }))
}

/// POST /api/v1/weight/import - Bulk import spreadsheet CSV
async fn import_csv(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<ImportWeightRequest>,
) -> Result<Json<ImportWeightResponse>, ApiError> {
    let response = ImportService::import_csv(state.db(), state.config(), user.user_id, &req.csv).await?;
    Ok(Json(response))
}

/// GET /api/v1/weight/export - Download all weigh-ins as CSV
async fn export_csv(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<(HeaderMap, String), ApiError> {
    let csv = ExportService::export_weight_csv(state.db(), user.user_id).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"weight-export.csv\""),
    );

    Ok((headers, csv))
}
