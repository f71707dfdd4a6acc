//! Workout plan and session repository for database operations

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use metabolic_shared::NewSessionSet;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// Workout plan record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WorkoutPlanRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    /// Monday=1 ... Sunday=7
    pub day_of_week: i32,
    pub is_active: bool,
}

/// Workout session record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WorkoutSessionRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub training_date: NaiveDate,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Prescribed exercise record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlanExerciseRecord {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub exercise_name: String,
    pub sets: i32,
    pub reps: String,
    pub tempo: Option<String>,
    pub rest_seconds: Option<i32>,
    pub target_rpe: Option<String>,
    pub cues: Option<String>,
    pub superset_group: Option<String>,
    pub exercise_type: String,
    pub sort_order: i32,
}

/// Logged set record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionSetRecord {
    pub id: Uuid,
    pub session_id: Uuid,
    pub plan_exercise_id: Option<Uuid>,
    pub exercise_name: String,
    pub set_number: i32,
    pub weight_used: Option<Decimal>,
    pub reps_completed: Option<i32>,
    pub actual_rpe: Option<i32>,
    pub duration_seconds: Option<i32>,
    pub is_amrap: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A logged set with the training date of its session
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExerciseHistoryRecord {
    pub training_date: NaiveDate,
    #[sqlx(flatten)]
    pub set: SessionSetRecord,
}

#[derive(sqlx::FromRow)]
struct UpsertedSet {
    #[sqlx(flatten)]
    set: SessionSetRecord,
    inserted: bool,
}

const SESSION_COLUMNS: &str = "id, user_id, plan_id, training_date, started_at, completed_at";

const SET_COLUMNS: &str = "id, session_id, plan_exercise_id, exercise_name, set_number, \
     weight_used, reps_completed, actual_rpe, duration_seconds, is_amrap, notes, created_at, updated_at";

fn to_db_int(value: Option<u32>) -> Result<Option<i32>> {
    Ok(value.map(i32::try_from).transpose()?)
}

/// Workout repository for database operations
pub struct WorkoutRepository;

impl WorkoutRepository {
    /// The active plan for a weekly-plan day index
    pub async fn find_active_plan_for_day(
        pool: &PgPool,
        user_id: Uuid,
        schema_day_of_week: u32,
    ) -> Result<Option<WorkoutPlanRecord>> {
        let day = i32::try_from(schema_day_of_week)?;
        let record = sqlx::query_as::<_, WorkoutPlanRecord>(
            r#"
            SELECT id, user_id, name, day_of_week, is_active
            FROM workout_plans
            WHERE user_id = $1 AND day_of_week = $2 AND is_active
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(day)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// A plan by ID, scoped to its owner
    pub async fn get_plan(
        pool: &PgPool,
        user_id: Uuid,
        plan_id: Uuid,
    ) -> Result<Option<WorkoutPlanRecord>> {
        let record = sqlx::query_as::<_, WorkoutPlanRecord>(
            r#"
            SELECT id, user_id, name, day_of_week, is_active
            FROM workout_plans
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(plan_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// The session for a plan on a training date, if one was started
    pub async fn find_session(
        pool: &PgPool,
        user_id: Uuid,
        plan_id: Uuid,
        training_date: NaiveDate,
    ) -> Result<Option<WorkoutSessionRecord>> {
        let record = sqlx::query_as::<_, WorkoutSessionRecord>(
            r#"
            SELECT id, user_id, plan_id, training_date, started_at, completed_at
            FROM workout_sessions
            WHERE user_id = $1 AND plan_id = $2 AND training_date = $3
            "#,
        )
        .bind(user_id)
        .bind(plan_id)
        .bind(training_date)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Create the session for a training date, or return the existing one
    ///
    /// Returns the session and whether this call created it. The unique
    /// (user, plan, training date) constraint makes concurrent starts collapse
    /// onto one row.
    pub async fn create_session(
        pool: &PgPool,
        user_id: Uuid,
        plan_id: Uuid,
        training_date: NaiveDate,
        started_at: DateTime<Utc>,
    ) -> Result<(WorkoutSessionRecord, bool)> {
        let inserted = sqlx::query_as::<_, WorkoutSessionRecord>(
            r#"
            INSERT INTO workout_sessions (user_id, plan_id, training_date, started_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, plan_id, training_date) DO NOTHING
            RETURNING id, user_id, plan_id, training_date, started_at, completed_at
            "#,
        )
        .bind(user_id)
        .bind(plan_id)
        .bind(training_date)
        .bind(started_at)
        .fetch_optional(pool)
        .await?;

        if let Some(record) = inserted {
            return Ok((record, true));
        }

        let existing = Self::find_session(pool, user_id, plan_id, training_date)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Session vanished after insert conflict"))?;

        Ok((existing, false))
    }

    /// Most recent sessions first
    pub async fn list_sessions(
        pool: &PgPool,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<WorkoutSessionRecord>> {
        let records = sqlx::query_as::<_, WorkoutSessionRecord>(
            r#"
            SELECT id, user_id, plan_id, training_date, started_at, completed_at
            FROM workout_sessions
            WHERE user_id = $1
            ORDER BY training_date DESC, started_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Active plans, Monday first
    pub async fn list_active_plans(pool: &PgPool, user_id: Uuid) -> Result<Vec<WorkoutPlanRecord>> {
        let records = sqlx::query_as::<_, WorkoutPlanRecord>(
            r#"
            SELECT id, user_id, name, day_of_week, is_active
            FROM workout_plans
            WHERE user_id = $1 AND is_active
            ORDER BY day_of_week, created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Exercises of the given plans, in display order within each plan
    pub async fn list_plan_exercises(
        pool: &PgPool,
        plan_ids: &[Uuid],
    ) -> Result<Vec<PlanExerciseRecord>> {
        let records = sqlx::query_as::<_, PlanExerciseRecord>(
            r#"
            SELECT id, plan_id, exercise_name, sets, reps, tempo, rest_seconds, target_rpe,
                   cues, superset_group, exercise_type, sort_order
            FROM plan_exercises
            WHERE plan_id = ANY($1)
            ORDER BY plan_id, sort_order, exercise_name
            "#,
        )
        .bind(plan_ids)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// A session by ID, scoped to its owner
    pub async fn get_session(
        pool: &PgPool,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<Option<WorkoutSessionRecord>> {
        let record = sqlx::query_as::<_, WorkoutSessionRecord>(&format!(
            "SELECT {SESSION_COLUMNS} FROM workout_sessions WHERE id = $1 AND user_id = $2"
        ))
        .bind(session_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Record a set, overwriting an earlier log of the same set
    ///
    /// A set is identified by (session, exercise name, set number). Returns
    /// the stored set and whether this call inserted it.
    pub async fn upsert_set(
        pool: &PgPool,
        session_id: Uuid,
        set: &NewSessionSet,
    ) -> Result<(SessionSetRecord, bool)> {
        let row = sqlx::query_as::<_, UpsertedSet>(&format!(
            r#"
            INSERT INTO session_sets (
                session_id, plan_exercise_id, exercise_name, set_number, weight_used,
                reps_completed, actual_rpe, duration_seconds, is_amrap, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (session_id, exercise_name, set_number) DO UPDATE SET
                plan_exercise_id = EXCLUDED.plan_exercise_id,
                weight_used = EXCLUDED.weight_used,
                reps_completed = EXCLUDED.reps_completed,
                actual_rpe = EXCLUDED.actual_rpe,
                duration_seconds = EXCLUDED.duration_seconds,
                is_amrap = EXCLUDED.is_amrap,
                notes = EXCLUDED.notes,
                updated_at = NOW()
            RETURNING {SET_COLUMNS}, (xmax = 0) AS inserted
            "#
        ))
        .bind(session_id)
        .bind(set.plan_exercise_id)
        .bind(&set.exercise_name)
        .bind(i32::try_from(set.set_number)?)
        .bind(set.weight_used)
        .bind(to_db_int(set.reps_completed)?)
        .bind(to_db_int(set.actual_rpe)?)
        .bind(to_db_int(set.duration_seconds)?)
        .bind(set.is_amrap)
        .bind(&set.notes)
        .fetch_one(pool)
        .await?;

        Ok((row.set, row.inserted))
    }

    /// Mark a session completed
    ///
    /// The first completion time sticks. Returns the session and whether this
    /// call completed it, or `None` when the user has no such session.
    pub async fn complete_session(
        pool: &PgPool,
        user_id: Uuid,
        session_id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> Result<Option<(WorkoutSessionRecord, bool)>> {
        let updated = sqlx::query_as::<_, WorkoutSessionRecord>(&format!(
            r#"
            UPDATE workout_sessions
            SET completed_at = $3
            WHERE id = $1 AND user_id = $2 AND completed_at IS NULL
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(session_id)
        .bind(user_id)
        .bind(completed_at)
        .fetch_optional(pool)
        .await?;

        if let Some(record) = updated {
            return Ok(Some((record, true)));
        }

        let existing = Self::get_session(pool, user_id, session_id).await?;
        Ok(existing.map(|record| (record, false)))
    }

    /// Sets of one session, by exercise name then set number
    pub async fn list_sets(pool: &PgPool, session_id: Uuid) -> Result<Vec<SessionSetRecord>> {
        let records = sqlx::query_as::<_, SessionSetRecord>(&format!(
            r#"
            SELECT {SET_COLUMNS}
            FROM session_sets
            WHERE session_id = $1
            ORDER BY exercise_name, set_number
            "#
        ))
        .bind(session_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Sets of the latest completed session of a plan
    pub async fn previous_session_sets(
        pool: &PgPool,
        user_id: Uuid,
        plan_id: Uuid,
    ) -> Result<Vec<SessionSetRecord>> {
        let records = sqlx::query_as::<_, SessionSetRecord>(&format!(
            r#"
            SELECT {SET_COLUMNS}
            FROM session_sets
            WHERE session_id = (
                SELECT id FROM workout_sessions
                WHERE user_id = $1 AND plan_id = $2 AND completed_at IS NOT NULL
                ORDER BY training_date DESC, completed_at DESC
                LIMIT 1
            )
            ORDER BY exercise_name, set_number
            "#
        ))
        .bind(user_id)
        .bind(plan_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Every logged set of an exercise, most recently logged first
    pub async fn exercise_history(
        pool: &PgPool,
        user_id: Uuid,
        exercise_name: &str,
        limit: i64,
    ) -> Result<Vec<ExerciseHistoryRecord>> {
        let records = sqlx::query_as::<_, ExerciseHistoryRecord>(
            r#"
            SELECT ws.training_date,
                   ss.id, ss.session_id, ss.plan_exercise_id, ss.exercise_name, ss.set_number,
                   ss.weight_used, ss.reps_completed, ss.actual_rpe, ss.duration_seconds,
                   ss.is_amrap, ss.notes, ss.created_at, ss.updated_at
            FROM session_sets ss
            JOIN workout_sessions ws ON ws.id = ss.session_id
            WHERE ws.user_id = $1 AND ss.exercise_name = $2
            ORDER BY ss.created_at DESC
            LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(exercise_name)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }
}
