//! Data models for the Metabolic RW application

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Context of a weigh-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeighInStatus {
    Baseline,
    Fasting,
    #[default]
    Normal,
}

impl WeighInStatus {
    /// Storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            WeighInStatus::Baseline => "BASELINE",
            WeighInStatus::Fasting => "FASTING",
            WeighInStatus::Normal => "NORMAL",
        }
    }

    /// Spreadsheet label used in CSV exports
    pub fn label(&self) -> &'static str {
        match self {
            WeighInStatus::Baseline => "Baseline",
            WeighInStatus::Fasting => "Fasting",
            WeighInStatus::Normal => "Normal",
        }
    }
}

impl fmt::Display for WeighInStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for WeighInStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BASELINE" => Ok(WeighInStatus::Baseline),
            "FASTING" => Ok(WeighInStatus::Fasting),
            "NORMAL" => Ok(WeighInStatus::Normal),
            _ => Err(format!("Unknown weigh-in status: {}", s)),
        }
    }
}

/// One stored weigh-in
///
/// `created_at` only breaks ties between observations sharing a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightObservation {
    pub id: Uuid,
    pub date: NaiveDate,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_fat_percent: Option<f64>,
    #[serde(default)]
    pub status: WeighInStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A weigh-in that passed validation and is ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewWeightObservation {
    pub date: NaiveDate,
    pub weight: f64,
    pub body_fat_percent: Option<f64>,
    pub status: WeighInStatus,
    pub notes: Option<String>,
}

/// The slice of a user's profile the training and weight features need
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub timezone: String,
    pub start_weight: Option<f64>,
    /// Sunday=0 convention
    pub training_days: Vec<u32>,
}

/// Pre- or post-workout mobility routine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MobilityType {
    PreWorkout,
    PostWorkout,
    UndoSitting,
}

impl MobilityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MobilityType::PreWorkout => "PRE_WORKOUT",
            MobilityType::PostWorkout => "POST_WORKOUT",
            MobilityType::UndoSitting => "UNDO_SITTING",
        }
    }
}

impl std::str::FromStr for MobilityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PRE_WORKOUT" => Ok(MobilityType::PreWorkout),
            "POST_WORKOUT" => Ok(MobilityType::PostWorkout),
            "UNDO_SITTING" => Ok(MobilityType::UndoSitting),
            _ => Err(format!("Unknown mobility type: {}", s)),
        }
    }
}

/// Pre-workout routine variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MobilityVersion {
    #[default]
    A,
    B,
}

impl MobilityVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            MobilityVersion::A => "A",
            MobilityVersion::B => "B",
        }
    }
}

impl std::str::FromStr for MobilityVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(MobilityVersion::A),
            "B" | "b" => Ok(MobilityVersion::B),
            _ => Err(format!("Unknown mobility version: {}", s)),
        }
    }
}

/// Role of an exercise within a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExerciseType {
    #[default]
    Working,
    Warmup,
    Finisher,
}

impl ExerciseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseType::Working => "WORKING",
            ExerciseType::Warmup => "WARMUP",
            ExerciseType::Finisher => "FINISHER",
        }
    }
}

impl std::str::FromStr for ExerciseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "WORKING" => Ok(ExerciseType::Working),
            "WARMUP" => Ok(ExerciseType::Warmup),
            "FINISHER" => Ok(ExerciseType::Finisher),
            _ => Err(format!("Unknown exercise type: {}", s)),
        }
    }
}

/// A performed set that passed validation
///
/// Identified within its session by exercise name and set number.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSessionSet {
    pub plan_exercise_id: Option<Uuid>,
    pub exercise_name: String,
    pub set_number: u32,
    pub weight_used: Option<f64>,
    pub reps_completed: Option<u32>,
    pub actual_rpe: Option<u32>,
    pub duration_seconds: Option<u32>,
    pub is_amrap: bool,
    pub notes: Option<String>,
}
