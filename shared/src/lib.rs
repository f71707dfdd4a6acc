//! Metabolic RW Shared Library
//!
//! Pure domain logic shared by the backend and WASM modules: the training
//! calendar, weight series analysis, the bulk import row contract, and the
//! API types built on top of them.

pub mod calendar;
pub mod errors;
pub mod import;
pub mod models;
pub mod types;
pub mod validation;
pub mod weight;

// Re-export commonly used items
pub use errors::*;
pub use types::*;

pub use calendar::{training_date, training_day, TrainingDay, DEFAULT_TIMEZONE};
pub use import::{parse_import_rows, parse_loose_date, ImportReport, RowError};
pub use models::{
    ExerciseType, MobilityType, MobilityVersion, NewSessionSet, NewWeightObservation,
    UserProfile, WeighInStatus, WeightObservation,
};
pub use weight::{
    build_chart_series, compute_statistics, ChartPoint, ChartRange, Trend, WeightAnalysisConfig,
    WeightStatistics,
};
