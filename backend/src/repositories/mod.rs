//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod mobility;
pub mod user;
pub mod weight;
pub mod workout;

pub use mobility::{CreateMobilityLog, MobilityLogRecord, MobilityLogRepository};
pub use user::{UserRecord, UserRepository};
pub use weight::{WeightEntryRecord, WeightEntryRepository};
pub use workout::{
    ExerciseHistoryRecord, PlanExerciseRecord, SessionSetRecord, WorkoutPlanRecord,
    WorkoutRepository, WorkoutSessionRecord,
};
