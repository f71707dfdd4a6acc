//! Error types for the Metabolic RW domain library

use thiserror::Error;

/// Training calendar errors
///
/// `UnknownTimezone` means the stored user configuration is corrupt; callers
/// surface it as an internal error rather than recovering with a default zone.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("Date out of supported range")]
    DateOutOfRange,
}

/// Loose `M/D/YYYY` date parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateParseError {
    #[error("Expected month/day/year, got {0:?}")]
    WrongShape(String),

    #[error("Non-numeric date part in {0:?}")]
    NotNumeric(String),

    #[error("Month or day out of range in {0:?}")]
    OutOfRange(String),

    #[error("Date {0:?} cannot be represented")]
    Unrepresentable(String),
}

/// Batch-level import errors
///
/// Row-level problems never surface here; they are collected into the
/// import report instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("CSV must have Date and Weight columns")]
    MissingColumns,
}
