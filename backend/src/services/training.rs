//! Training day and workout session service
//!
//! Every lookup goes through the training date, never the raw calendar date,
//! so a session logged at 1 AM still lands on the previous day's plan.

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::repositories::{
    ExerciseHistoryRecord, PlanExerciseRecord, SessionSetRecord, WorkoutPlanRecord,
    WorkoutRepository, WorkoutSessionRecord,
};
use crate::services::ProfileService;
use chrono::{DateTime, Utc};
use metabolic_shared::calendar::training_day;
use metabolic_shared::types::{
    ExerciseHistoryEntry, PlanExerciseResponse, PreviousSetResponse, SessionDetailResponse,
    SessionSetResponse, TrainingTodayResponse, WorkoutPlanResponse, WorkoutPlanSummary,
    WorkoutSessionResponse,
};
use metabolic_shared::validation::SetLogForm;
use metabolic_shared::ExerciseType;
use rust_decimal::prelude::ToPrimitive;
use sqlx::PgPool;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Default and maximum page size for session history
const DEFAULT_SESSION_LIMIT: i64 = 20;
const MAX_SESSION_LIMIT: i64 = 100;

/// Sets returned by an exercise history lookup
const EXERCISE_HISTORY_LIMIT: i64 = 100;

fn to_u32(value: i32) -> u32 {
    u32::try_from(value).unwrap_or_default()
}

impl From<WorkoutPlanRecord> for WorkoutPlanSummary {
    fn from(r: WorkoutPlanRecord) -> Self {
        Self {
            id: r.id.to_string(),
            name: r.name,
            day_of_week: to_u32(r.day_of_week),
        }
    }
}

impl From<PlanExerciseRecord> for PlanExerciseResponse {
    fn from(r: PlanExerciseRecord) -> Self {
        let exercise_type = r.exercise_type.parse::<ExerciseType>().unwrap_or_else(|_| {
            warn!(id = %r.id, exercise_type = %r.exercise_type, "Unrecognised exercise type, using WORKING");
            ExerciseType::default()
        });

        Self {
            id: r.id.to_string(),
            exercise_name: r.exercise_name,
            sets: to_u32(r.sets),
            reps: r.reps,
            tempo: r.tempo,
            rest_seconds: r.rest_seconds.map(to_u32),
            target_rpe: r.target_rpe,
            cues: r.cues,
            superset_group: r.superset_group,
            exercise_type,
            sort_order: r.sort_order,
        }
    }
}

impl From<SessionSetRecord> for SessionSetResponse {
    fn from(r: SessionSetRecord) -> Self {
        Self {
            id: r.id.to_string(),
            plan_exercise_id: r.plan_exercise_id.map(|id| id.to_string()),
            exercise_name: r.exercise_name,
            set_number: to_u32(r.set_number),
            weight_used: r.weight_used.and_then(|w| w.to_f64()),
            reps_completed: r.reps_completed.map(to_u32),
            actual_rpe: r.actual_rpe.map(to_u32),
            duration_seconds: r.duration_seconds.map(to_u32),
            is_amrap: r.is_amrap,
            notes: r.notes,
        }
    }
}

impl From<SessionSetRecord> for PreviousSetResponse {
    fn from(r: SessionSetRecord) -> Self {
        Self {
            exercise_name: r.exercise_name,
            set_number: to_u32(r.set_number),
            weight_used: r.weight_used.and_then(|w| w.to_f64()),
            reps_completed: r.reps_completed.map(to_u32),
        }
    }
}

impl From<ExerciseHistoryRecord> for ExerciseHistoryEntry {
    fn from(r: ExerciseHistoryRecord) -> Self {
        Self {
            training_date: r.training_date,
            set: r.set.into(),
        }
    }
}

/// Attach each plan's exercises, keeping the plans' order
fn assemble_plans(
    plans: Vec<WorkoutPlanRecord>,
    exercises: Vec<PlanExerciseRecord>,
) -> Vec<WorkoutPlanResponse> {
    let mut exercises = exercises;
    exercises.sort_by_key(|e| e.sort_order);

    plans
        .into_iter()
        .map(|plan| WorkoutPlanResponse {
            id: plan.id.to_string(),
            name: plan.name,
            day_of_week: to_u32(plan.day_of_week),
            exercises: exercises
                .iter()
                .filter(|e| e.plan_id == plan.id)
                .cloned()
                .map(Into::into)
                .collect(),
        })
        .collect()
}

impl From<WorkoutSessionRecord> for WorkoutSessionResponse {
    fn from(r: WorkoutSessionRecord) -> Self {
        Self {
            id: r.id.to_string(),
            plan_id: r.plan_id.to_string(),
            training_date: r.training_date,
            started_at: r.started_at,
            completed_at: r.completed_at,
        }
    }
}

/// Outcome of a start-session request
#[derive(Debug, Clone)]
pub struct StartedSession {
    pub session: WorkoutSessionResponse,
    /// False when an existing session for the training date was returned
    pub created: bool,
}

/// Outcome of a log-set request
#[derive(Debug, Clone)]
pub struct LoggedSet {
    pub set: SessionSetResponse,
    /// False when an earlier log of the same set was overwritten
    pub created: bool,
}

/// Training service for business logic
pub struct TrainingService;

impl TrainingService {
    /// The training day at `now`, with its planned workout and any started session
    pub async fn today(
        pool: &PgPool,
        config: &AppConfig,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<TrainingTodayResponse, ApiError> {
        let profile = ProfileService::load(pool, config, user_id).await?;
        let day = training_day(now, &profile.timezone, &profile.training_days)?;

        let plan = WorkoutRepository::find_active_plan_for_day(pool, user_id, day.schema_day_of_week)
            .await
            .map_err(ApiError::Internal)?;

        let session = match &plan {
            Some(plan) => WorkoutRepository::find_session(pool, user_id, plan.id, day.training_date)
                .await
                .map_err(ApiError::Internal)?,
            None => None,
        };

        Ok(TrainingTodayResponse {
            timezone: profile.timezone,
            day,
            plan: plan.map(Into::into),
            session: session.map(Into::into),
        })
    }

    /// Start the session for the training date at `at`, or resume it
    ///
    /// Without an explicit plan, the active plan for that day's weekly-plan
    /// index is used.
    pub async fn start_session(
        pool: &PgPool,
        config: &AppConfig,
        user_id: Uuid,
        plan_id: Option<Uuid>,
        at: DateTime<Utc>,
    ) -> Result<StartedSession, ApiError> {
        let profile = ProfileService::load(pool, config, user_id).await?;
        let day = training_day(at, &profile.timezone, &profile.training_days)?;

        let plan = match plan_id {
            Some(id) => WorkoutRepository::get_plan(pool, user_id, id)
                .await
                .map_err(ApiError::Internal)?
                .ok_or_else(|| ApiError::NotFound("Plan not found".to_string()))?,
            None => WorkoutRepository::find_active_plan_for_day(pool, user_id, day.schema_day_of_week)
                .await
                .map_err(ApiError::Internal)?
                .ok_or_else(|| {
                    ApiError::NotFound(format!("No workout planned for {}", day.training_date))
                })?,
        };

        ProfileService::ensure_settings(pool, config, user_id).await?;

        let (record, created) =
            WorkoutRepository::create_session(pool, user_id, plan.id, day.training_date, at)
                .await
                .map_err(ApiError::Internal)?;

        if created {
            metrics::counter!("workout_sessions_started_total").increment(1);
            info!(
                user_id = %user_id,
                plan_id = %plan.id,
                training_date = %day.training_date,
                "Workout session started"
            );
        }

        Ok(StartedSession {
            session: record.into(),
            created,
        })
    }

    /// Recent sessions, newest training date first
    pub async fn list_sessions(
        pool: &PgPool,
        user_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<WorkoutSessionResponse>, ApiError> {
        let records = WorkoutRepository::list_sessions(pool, user_id, Self::clamp_limit(limit))
            .await
            .map_err(ApiError::Internal)?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    /// Active plans with their exercises, Monday first
    pub async fn list_plans(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<WorkoutPlanResponse>, ApiError> {
        let plans = WorkoutRepository::list_active_plans(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;
        let plan_ids: Vec<Uuid> = plans.iter().map(|p| p.id).collect();
        let exercises = WorkoutRepository::list_plan_exercises(pool, &plan_ids)
            .await
            .map_err(ApiError::Internal)?;

        Ok(assemble_plans(plans, exercises))
    }

    /// A session with its plan and logged sets
    pub async fn session_detail(
        pool: &PgPool,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<SessionDetailResponse, ApiError> {
        let session = Self::owned_session(pool, user_id, session_id).await?;

        let plan = WorkoutRepository::get_plan(pool, user_id, session.plan_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Plan not found".to_string()))?;
        let exercises = WorkoutRepository::list_plan_exercises(pool, &[plan.id])
            .await
            .map_err(ApiError::Internal)?;
        let sets = WorkoutRepository::list_sets(pool, session.id)
            .await
            .map_err(ApiError::Internal)?;

        let plan = assemble_plans(vec![plan], exercises)
            .pop()
            .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("Plan lost while assembling")))?;

        Ok(SessionDetailResponse {
            session: session.into(),
            plan,
            sets: sets.into_iter().map(Into::into).collect(),
        })
    }

    /// Record one set of a session, replacing an earlier log of the same set
    pub async fn log_set(
        pool: &PgPool,
        user_id: Uuid,
        session_id: Uuid,
        form: SetLogForm,
    ) -> Result<LoggedSet, ApiError> {
        let set = form.into_new_set()?;
        let session = Self::owned_session(pool, user_id, session_id).await?;

        let (record, created) = WorkoutRepository::upsert_set(pool, session.id, &set)
            .await
            .map_err(ApiError::Internal)?;

        metrics::counter!("session_sets_logged_total").increment(1);
        debug!(
            user_id = %user_id,
            session_id = %session.id,
            exercise = %set.exercise_name,
            set_number = set.set_number,
            created,
            "Set logged"
        );

        Ok(LoggedSet {
            set: record.into(),
            created,
        })
    }

    /// Mark a session finished; the first completion time is kept
    pub async fn complete_session(
        pool: &PgPool,
        user_id: Uuid,
        session_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<WorkoutSessionResponse, ApiError> {
        let (record, completed) = WorkoutRepository::complete_session(pool, user_id, session_id, now)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;

        if completed {
            metrics::counter!("workout_sessions_completed_total").increment(1);
            info!(
                user_id = %user_id,
                session_id = %record.id,
                training_date = %record.training_date,
                "Workout session completed"
            );
        }

        Ok(record.into())
    }

    /// Sets from the last completed session of a plan, to prefill the next one
    pub async fn previous_sets(
        pool: &PgPool,
        user_id: Uuid,
        plan_id: Uuid,
    ) -> Result<Vec<PreviousSetResponse>, ApiError> {
        WorkoutRepository::get_plan(pool, user_id, plan_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Plan not found".to_string()))?;

        let records = WorkoutRepository::previous_session_sets(pool, user_id, plan_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    /// Every logged set of an exercise, most recent first
    pub async fn exercise_history(
        pool: &PgPool,
        user_id: Uuid,
        exercise_name: &str,
    ) -> Result<Vec<ExerciseHistoryEntry>, ApiError> {
        let name = exercise_name.trim();
        if name.is_empty() {
            return Err(ApiError::validation("Exercise name is required"));
        }

        let records =
            WorkoutRepository::exercise_history(pool, user_id, name, EXERCISE_HISTORY_LIMIT)
                .await
                .map_err(ApiError::Internal)?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    async fn owned_session(
        pool: &PgPool,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<WorkoutSessionRecord, ApiError> {
        WorkoutRepository::get_session(pool, user_id, session_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))
    }

    fn clamp_limit(limit: Option<i64>) -> i64 {
        limit.unwrap_or(DEFAULT_SESSION_LIMIT).clamp(1, MAX_SESSION_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn plan(id: u128, day_of_week: i32) -> WorkoutPlanRecord {
        WorkoutPlanRecord {
            id: Uuid::from_u128(id),
            user_id: Uuid::nil(),
            name: format!("Day {}", day_of_week),
            day_of_week,
            is_active: true,
        }
    }

    fn exercise(plan_id: u128, name: &str, sort_order: i32, exercise_type: &str) -> PlanExerciseRecord {
        PlanExerciseRecord {
            id: Uuid::new_v4(),
            plan_id: Uuid::from_u128(plan_id),
            exercise_name: name.to_string(),
            sets: 3,
            reps: "8-10".to_string(),
            tempo: None,
            rest_seconds: Some(90),
            target_rpe: Some("7-8".to_string()),
            cues: None,
            superset_group: None,
            exercise_type: exercise_type.to_string(),
            sort_order,
        }
    }

    fn set_record(weight_used: Option<Decimal>) -> SessionSetRecord {
        SessionSetRecord {
            id: Uuid::nil(),
            session_id: Uuid::nil(),
            plan_exercise_id: None,
            exercise_name: "Back Squat".to_string(),
            set_number: 2,
            weight_used,
            reps_completed: Some(5),
            actual_rpe: Some(8),
            duration_seconds: None,
            is_amrap: false,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[rstest]
    #[case(None, 20)]
    #[case(Some(0), 1)]
    #[case(Some(-5), 1)]
    #[case(Some(42), 42)]
    #[case(Some(500), 100)]
    fn test_clamp_limit(#[case] limit: Option<i64>, #[case] expected: i64) {
        assert_eq!(TrainingService::clamp_limit(limit), expected);
    }

    #[test]
    fn test_assemble_plans_groups_exercises_in_sort_order() {
        let plans = vec![plan(1, 1), plan(2, 3)];
        let exercises = vec![
            exercise(2, "Bench Press", 0, "WORKING"),
            exercise(1, "Romanian Deadlift", 1, "WORKING"),
            exercise(1, "Hip Airplane", 0, "WARMUP"),
        ];

        let assembled = assemble_plans(plans, exercises);
        assert_eq!(assembled.len(), 2);
        assert_eq!(assembled[0].day_of_week, 1);

        let names: Vec<&str> = assembled[0].exercises.iter().map(|e| e.exercise_name.as_str()).collect();
        assert_eq!(names, vec!["Hip Airplane", "Romanian Deadlift"]);
        assert_eq!(assembled[0].exercises[0].exercise_type, ExerciseType::Warmup);
        assert_eq!(assembled[1].exercises.len(), 1);
    }

    #[test]
    fn test_assemble_plans_keeps_plans_without_exercises() {
        let assembled = assemble_plans(vec![plan(7, 7)], vec![]);
        assert_eq!(assembled.len(), 1);
        assert!(assembled[0].exercises.is_empty());
    }

    #[test]
    fn test_unknown_exercise_type_falls_back_to_working() {
        let response = PlanExerciseResponse::from(exercise(1, "Sled Push", 0, "CARDIO"));
        assert_eq!(response.exercise_type, ExerciseType::Working);
        assert_eq!(response.rest_seconds, Some(90));
    }

    #[test]
    fn test_set_response_converts_decimal_weight() {
        let response = SessionSetResponse::from(set_record(Some(Decimal::new(1855, 1))));
        assert_eq!(response.weight_used, Some(185.5));
        assert_eq!(response.set_number, 2);

        let previous = PreviousSetResponse::from(set_record(None));
        assert_eq!(previous.weight_used, None);
        assert_eq!(previous.reps_completed, Some(5));
    }

    #[test]
    fn test_plan_summary_from_record() {
        let record = WorkoutPlanRecord {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            name: "Lower A".to_string(),
            day_of_week: 7,
            is_active: true,
        };
        let summary = WorkoutPlanSummary::from(record);
        assert_eq!(summary.day_of_week, 7);
        assert_eq!(summary.name, "Lower A");
    }

    #[test]
    fn test_session_response_from_record() {
        let record = WorkoutSessionRecord {
            id: Uuid::nil(),
            user_id: Uuid::nil(),
            plan_id: Uuid::nil(),
            training_date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            started_at: "2024-03-05T06:30:00Z".parse().unwrap(),
            completed_at: None,
        };
        let response = WorkoutSessionResponse::from(record);
        // Started early Tuesday UTC, still Monday's training date
        assert_eq!(response.training_date.to_string(), "2024-03-04");
    }
}
