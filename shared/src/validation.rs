//! Input validation
//!
//! Manual weigh-ins go through `WeightEntryForm` and logged sets through
//! `SetLogForm` (derive-based, via the `validator` crate). Stored and imported
//! observations only need the looser data-model bounds checked by
//! `is_valid_observed_*`.

use crate::calendar::resolve_timezone;
use crate::models::{NewSessionSet, NewWeightObservation, WeighInStatus};
use crate::weight::round_to_tenth;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

/// Upper bound of any stored weight
pub const MAX_OBSERVED_WEIGHT: f64 = 1000.0;

/// Manual entry bounds, in pounds
pub const MIN_ENTRY_WEIGHT: f64 = 50.0;
pub const MAX_ENTRY_WEIGHT: f64 = 999.0;
pub const MIN_ENTRY_BODY_FAT: f64 = 1.0;
pub const MAX_ENTRY_BODY_FAT: f64 = 70.0;

/// Data-model bound for weights: (0, 1000]
pub fn is_valid_observed_weight(weight: f64) -> bool {
    weight.is_finite() && weight > 0.0 && weight <= MAX_OBSERVED_WEIGHT
}

/// Data-model bound for body fat: (0, 100)
pub fn is_valid_observed_body_fat(percent: f64) -> bool {
    percent.is_finite() && percent > 0.0 && percent < 100.0
}

/// A validation failure tied to one input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Manual weigh-in as submitted by the entry form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WeightEntryForm {
    #[validate(required(message = "Date is required"))]
    pub date: Option<NaiveDate>,

    #[validate(range(min = 50.0, max = 999.0, message = "Weight must be between 50 and 999 lbs"))]
    pub weight: f64,

    /// Defaults to NORMAL when absent or blank
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    #[validate(range(min = 1.0, max = 70.0, message = "Body fat must be between 1% and 70%"))]
    pub body_fat_percent: Option<f64>,

    #[serde(default)]
    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
}

/// Order in which weigh-in field errors are reported when several fail at once
const WEIGHT_FIELD_ORDER: [&str; 5] = ["date", "weight", "status", "body_fat_percent", "notes"];

const SET_FIELD_ORDER: [&str; 7] = [
    "exercise_name",
    "set_number",
    "weight_used",
    "reps_completed",
    "actual_rpe",
    "duration_seconds",
    "notes",
];

/// Pick one error deterministically from a `validator` error set
///
/// Fields missing from `order` sort last.
pub fn first_field_error(errors: &ValidationErrors, order: &[&str]) -> FieldError {
    let mut found: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            errs.first().map(|err| FieldError {
                field: field.to_string(),
                message: err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {}", field)),
            })
        })
        .collect();

    found.sort_by_key(|e| {
        order
            .iter()
            .position(|f| *f == e.field)
            .unwrap_or(order.len())
    });

    found
        .into_iter()
        .next()
        .unwrap_or_else(|| FieldError::new("form", "Invalid input"))
}

impl WeightEntryForm {
    /// Validate and normalize into a storable observation
    ///
    /// The weight is rounded to one decimal, blank notes become `None`.
    pub fn into_observation(self) -> Result<NewWeightObservation, FieldError> {
        self.validate()
            .map_err(|e| first_field_error(&e, &WEIGHT_FIELD_ORDER))?;

        if !self.weight.is_finite() {
            return Err(FieldError::new("weight", "Weight must be between 50 and 999 lbs"));
        }

        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => WeighInStatus::default(),
            Some(raw) => raw
                .parse::<WeighInStatus>()
                .map_err(|_| FieldError::new("status", "Invalid status"))?,
        };

        let date = self
            .date
            .ok_or_else(|| FieldError::new("date", "Date is required"))?;

        Ok(NewWeightObservation {
            date,
            weight: round_to_tenth(self.weight),
            body_fat_percent: self.body_fat_percent,
            status,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
        })
    }
}

/// One performed set as submitted from the session screen
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SetLogForm {
    #[serde(default)]
    pub plan_exercise_id: Option<Uuid>,

    #[validate(length(min = 1, max = 200, message = "Exercise name is required"))]
    pub exercise_name: String,

    #[validate(range(min = 1, max = 50, message = "Set number must be between 1 and 50"))]
    pub set_number: u32,

    #[serde(default)]
    #[validate(range(min = 0.0, max = 2000.0, message = "Weight must be between 0 and 2000 lbs"))]
    pub weight_used: Option<f64>,

    #[serde(default)]
    #[validate(range(max = 1000, message = "Reps cannot exceed 1000"))]
    pub reps_completed: Option<u32>,

    #[serde(default)]
    #[validate(range(min = 1, max = 10, message = "RPE must be between 1 and 10"))]
    pub actual_rpe: Option<u32>,

    #[serde(default)]
    #[validate(range(max = 86400, message = "Duration cannot exceed 24 hours"))]
    pub duration_seconds: Option<u32>,

    #[serde(default)]
    pub is_amrap: bool,

    #[serde(default)]
    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
}

impl SetLogForm {
    /// Validate and normalize into a storable set
    ///
    /// The exercise name is trimmed, the weight rounded to one decimal and
    /// blank notes become `None`.
    pub fn into_new_set(self) -> Result<NewSessionSet, FieldError> {
        self.validate()
            .map_err(|e| first_field_error(&e, &SET_FIELD_ORDER))?;

        let exercise_name = self.exercise_name.trim();
        if exercise_name.is_empty() {
            return Err(FieldError::new("exercise_name", "Exercise name is required"));
        }

        if self.weight_used.is_some_and(|w| !w.is_finite()) {
            return Err(FieldError::new("weight_used", "Weight must be between 0 and 2000 lbs"));
        }

        Ok(NewSessionSet {
            plan_exercise_id: self.plan_exercise_id,
            exercise_name: exercise_name.to_string(),
            set_number: self.set_number,
            weight_used: self.weight_used.map(round_to_tenth),
            reps_completed: self.reps_completed,
            actual_rpe: self.actual_rpe,
            duration_seconds: self.duration_seconds,
            is_amrap: self.is_amrap,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
        })
    }
}

/// Validate an IANA timezone identifier
pub fn validate_timezone(name: &str) -> Result<(), String> {
    resolve_timezone(name)
        .map(|_| ())
        .map_err(|_| format!("Unknown timezone: {}", name))
}

/// Validate a Sunday=0 training-day set
pub fn validate_training_days(days: &[u32]) -> Result<(), String> {
    if let Some(bad) = days.iter().find(|d| **d > 6) {
        return Err(format!("Training day index {} is outside 0-6", bad));
    }
    Ok(())
}
