//! Error types for ojt-schedule operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Period not found: {0}")]
    PeriodNotFound(i64),

    #[error("Date out of range after applying period durations")]
    DateOutOfRange,

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid schedule JSON: {0}")]
    InvalidJson(String),

    #[error("Invalid locale: {0}")]
    InvalidLocale(String),

    #[error("Schedule row {0} does not exist")]
    RowOutOfRange(usize),

    /// A row reached submission without a start or end date.
    #[error("Schedule row {0} is missing a start or end date")]
    IncompleteRow(usize),

    /// Raised by [`crate::draft::ScheduleDraft::submit`] only; the validator
    /// itself reports overlaps as data.
    #[error("{message}")]
    ScheduleOverlap { message: String },
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
