//! API request and response types

use crate::calendar::TrainingDay;
use crate::models::{ExerciseType, MobilityType, MobilityVersion, WeighInStatus, WeightObservation};
use crate::weight::{ChartPoint, ChartRange, WeightStatistics};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

// ============================================================================
// Weight Types
// ============================================================================

/// A stored weigh-in as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightEntryResponse {
    pub id: String,
    pub date: NaiveDate,
    pub weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_fat_percent: Option<f64>,
    pub status: WeighInStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<WeightObservation> for WeightEntryResponse {
    fn from(obs: WeightObservation) -> Self {
        Self {
            id: obs.id.to_string(),
            date: obs.date,
            weight: obs.weight,
            body_fat_percent: obs.body_fat_percent,
            status: obs.status,
            notes: obs.notes,
            created_at: obs.created_at,
        }
    }
}

/// Weight history, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightListResponse {
    pub entries: Vec<WeightEntryResponse>,
    pub total: usize,
}

/// Chart query parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartQuery {
    /// 1W, 1M, 3M or ALL; defaults to 1M
    #[serde(default)]
    pub range: Option<String>,
}

/// Chart series response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartResponse {
    pub range: ChartRange,
    pub points: Vec<ChartPoint>,
}

/// Everything the dashboard weight card shows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightDashboardResponse {
    pub stats: WeightStatistics,
    pub chart: Vec<ChartPoint>,
    /// Local calendar date the statistics windows end on
    pub today: NaiveDate,
}

/// Bulk import request: raw CSV text including the header line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportWeightRequest {
    pub csv: String,
}

/// Bulk import outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportWeightResponse {
    pub imported: usize,
    pub skipped: usize,
    /// `Row N: reason` lines for every skipped row
    pub errors: Vec<String>,
}

/// Start-weight update request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStartWeightRequest {
    pub start_weight: Option<f64>,
}

// ============================================================================
// Training Types
// ============================================================================

/// Today's training day with the planned workout, if any
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingTodayResponse {
    pub timezone: String,
    #[serde(flatten)]
    pub day: TrainingDay,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<WorkoutPlanSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<WorkoutSessionResponse>,
}

/// The weekly plan row for one day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutPlanSummary {
    pub id: String,
    pub name: String,
    /// Monday=1 ... Sunday=7
    pub day_of_week: u32,
}

/// Start-session request; the training date is derived server-side
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartSessionRequest {
    /// Defaults to the active plan for the current training day
    #[serde(default)]
    pub plan_id: Option<Uuid>,
    /// Override for the current instant, mostly for back-filling
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
}

/// A workout session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSessionResponse {
    pub id: String,
    pub plan_id: String,
    pub training_date: NaiveDate,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Session history query parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionListQuery {
    #[serde(default)]
    pub limit: Option<i64>,
}

/// One prescribed exercise of a plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanExerciseResponse {
    pub id: String,
    pub exercise_name: String,
    pub sets: u32,
    /// Free text, e.g. "8-10" or "AMRAP"
    pub reps: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tempo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_rpe: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cues: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superset_group: Option<String>,
    pub exercise_type: ExerciseType,
    pub sort_order: i32,
}

/// An active weekly plan with its exercises in display order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutPlanResponse {
    pub id: String,
    pub name: String,
    /// Monday=1 ... Sunday=7
    pub day_of_week: u32,
    pub exercises: Vec<PlanExerciseResponse>,
}

/// A logged set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSetResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_exercise_id: Option<String>,
    pub exercise_name: String,
    pub set_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_used: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reps_completed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_rpe: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
    pub is_amrap: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A session with its plan and every logged set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDetailResponse {
    pub session: WorkoutSessionResponse,
    pub plan: WorkoutPlanResponse,
    /// Ordered by exercise name, then set number
    pub sets: Vec<SessionSetResponse>,
}

/// What was lifted for a set the last time the plan was completed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviousSetResponse {
    pub exercise_name: String,
    pub set_number: u32,
    pub weight_used: Option<f64>,
    pub reps_completed: Option<u32>,
}

/// One set of an exercise across all sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseHistoryEntry {
    pub training_date: NaiveDate,
    #[serde(flatten)]
    pub set: SessionSetResponse,
}

/// Timezone update request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTimezoneRequest {
    pub timezone: String,
}

// ============================================================================
// Mobility Types
// ============================================================================

/// Mobility routine log request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogMobilityRequest {
    #[serde(rename = "type")]
    pub mobility_type: MobilityType,
    #[serde(default)]
    pub version: Option<MobilityVersion>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Mobility history query parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MobilityHistoryQuery {
    #[serde(default)]
    pub limit: Option<i64>,
}

/// A logged mobility routine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MobilityLogResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub mobility_type: MobilityType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<MobilityVersion>,
    pub training_date: NaiveDate,
    pub completed_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
