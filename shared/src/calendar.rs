//! Training calendar
//!
//! Maps an absolute instant to the logical training date a session belongs to,
//! and answers day-of-week questions against a fixed weekly training plan.
//!
//! Sessions are logged late at night or in the small hours, so the training day
//! does not turn over at midnight:
//! - before 12:00 local time, the training date is the local calendar date
//! - from 12:00 local time onwards, the training date is the next calendar date
//!
//! A 2:30 AM Tuesday session therefore still counts towards Monday's plan.

use crate::errors::CalendarError;
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Local hour at which the training day rolls over (inclusive)
pub const TRAINING_DAY_BOUNDARY_HOUR: u32 = 12;

/// Application-level fallback when a caller has no user timezone yet
pub const DEFAULT_TIMEZONE: &str = "America/New_York";

/// Default training days, Sunday=0 convention (Monday through Friday)
pub const DEFAULT_TRAINING_DAYS: [u32; 5] = [1, 2, 3, 4, 5];

/// Resolve an IANA timezone identifier
pub fn resolve_timezone(name: &str) -> Result<Tz, CalendarError> {
    name.parse::<Tz>()
        .map_err(|_| CalendarError::UnknownTimezone(name.to_string()))
}

/// Interpret an instant as local wall-clock time in `timezone`
pub fn localize(timestamp: DateTime<Utc>, timezone: &str) -> Result<NaiveDateTime, CalendarError> {
    let tz = resolve_timezone(timezone)?;
    Ok(timestamp.with_timezone(&tz).naive_local())
}

/// The user's local calendar date for an instant, without the noon rule
pub fn local_today(timestamp: DateTime<Utc>, timezone: &str) -> Result<NaiveDate, CalendarError> {
    localize(timestamp, timezone).map(|local| local.date())
}

/// Training date for an already-localized wall-clock time
///
/// Exactly 12:00:00 belongs to the next day.
pub fn training_date_from_local(local: NaiveDateTime) -> Result<NaiveDate, CalendarError> {
    if local.hour() < TRAINING_DAY_BOUNDARY_HOUR {
        Ok(local.date())
    } else {
        local
            .date()
            .checked_add_days(Days::new(1))
            .ok_or(CalendarError::DateOutOfRange)
    }
}

/// Training date for an instant in the user's timezone
pub fn training_date(timestamp: DateTime<Utc>, timezone: &str) -> Result<NaiveDate, CalendarError> {
    training_date_from_local(localize(timestamp, timezone)?)
}

/// Training date for the current instant
pub fn current_training_date(timezone: &str) -> Result<NaiveDate, CalendarError> {
    training_date(Utc::now(), timezone)
}

/// Day of week with Sunday=0 ... Saturday=6 (calendar display convention)
pub fn day_of_week_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

/// Convert a Sunday=0 index to the weekly-plan convention
///
/// The plan indexes Monday=1 ... Saturday=6 and Sunday=7, so only Sunday moves.
/// Every call site that needs a plan index goes through here.
pub const fn to_schema_day_index(calendar_index: u32) -> u32 {
    match calendar_index {
        0 => 7,
        n => n,
    }
}

/// Day of week in the weekly-plan convention (Monday=1 ... Sunday=7)
pub fn schema_day_of_week_index(date: NaiveDate) -> u32 {
    to_schema_day_index(day_of_week_index(date))
}

/// Whether `date` falls on one of the Sunday=0 indexed `training_days`
pub fn is_training_day(date: NaiveDate, training_days: &[u32]) -> bool {
    training_days.contains(&day_of_week_index(date))
}

/// Everything a caller needs to pick the right day's plan or session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingDay {
    pub training_date: NaiveDate,
    /// Sunday=0 ... Saturday=6
    pub day_of_week: u32,
    /// Monday=1 ... Sunday=7
    pub schema_day_of_week: u32,
    pub is_training_day: bool,
}

/// Resolve the training day for an instant
pub fn training_day(
    timestamp: DateTime<Utc>,
    timezone: &str,
    training_days: &[u32],
) -> Result<TrainingDay, CalendarError> {
    let date = training_date(timestamp, timezone)?;
    Ok(TrainingDay {
        training_date: date,
        day_of_week: day_of_week_index(date),
        schema_day_of_week: schema_day_of_week_index(date),
        is_training_day: is_training_day(date, training_days),
    })
}
