//! Detect overlapping department assignments in a trainee's schedule.
//!
//! Entries are stable-sorted by start date, then adjacent pairs are compared at
//! calendar-date granularity. An entry ending on the same day the next one
//! starts IS an overlap: both assignments would claim that day.

use std::fmt;

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dates::{self, DateLocale};
use crate::error::{Result, ScheduleError};

/// Department identifier as sent by the backend (numeric or string key).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DepartmentId {
    Number(i64),
    Text(String),
}

impl fmt::Display for DepartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepartmentId::Number(n) => write!(f, "{}", n),
            DepartmentId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for DepartmentId {
    fn from(n: i64) -> Self {
        DepartmentId::Number(n)
    }
}

impl From<&str> for DepartmentId {
    fn from(s: &str) -> Self {
        DepartmentId::Text(s.to_string())
    }
}

/// One contiguous assignment of a trainee to a department.
///
/// Dates are calendar days. Timestamp inputs are reduced to a day when read
/// (see [`parse_schedules`]) and always serialize back as `YYYY-MM-DD`; the
/// original timestamp text is not kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub department_id: DepartmentId,
    #[serde(deserialize_with = "dates::deserialize_calendar_date")]
    pub start_date: NaiveDate,
    #[serde(deserialize_with = "dates::deserialize_calendar_date")]
    pub end_date: NaiveDate,
    /// Backend fields this crate does not interpret (`id`, `traineeId`, ...),
    /// carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScheduleEntry {
    pub fn new(
        department_id: impl Into<DepartmentId>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            department_id: department_id.into(),
            start_date,
            end_date,
            extra: Map::new(),
        }
    }
}

/// Wire shape of an entry before its dates are reduced to calendar days.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawScheduleEntry {
    department_id: DepartmentId,
    start_date: String,
    end_date: String,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Parse a JSON array of schedule entries.
///
/// With `tz`, RFC 3339 timestamps are converted to the calendar day they fall
/// on in that zone (`2024-01-14T18:30:00Z` is Jan 15 in Asia/Colombo). Without
/// it, dates are taken as written.
///
/// # Errors
/// Returns `ScheduleError::InvalidJson` for malformed JSON and
/// `ScheduleError::InvalidDate` for an unparseable date.
pub fn parse_schedules(json: &str, tz: Option<Tz>) -> Result<Vec<ScheduleEntry>> {
    let raw: Vec<RawScheduleEntry> =
        serde_json::from_str(json).map_err(|e| ScheduleError::InvalidJson(e.to_string()))?;

    let parse = |s: &str| match tz {
        Some(tz) => dates::parse_calendar_date(s, tz),
        None => dates::parse_date_as_written(s),
    };

    raw.into_iter()
        .map(|entry| {
            Ok(ScheduleEntry {
                start_date: parse(&entry.start_date)?,
                end_date: parse(&entry.end_date)?,
                department_id: entry.department_id,
                extra: entry.extra,
            })
        })
        .collect()
}

/// Two adjacent entries (in start-date order) whose date ranges collide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConflict {
    /// Position of `earlier` in the sorted schedule.
    pub index: usize,
    pub earlier: ScheduleEntry,
    pub later: ScheduleEntry,
}

impl ScheduleConflict {
    /// User-facing description naming the two conflicting dates.
    pub fn message(&self, locale: DateLocale) -> String {
        format!(
            "Schedule overlap detected: a schedule ending on {} overlaps with the next schedule starting on {}.",
            locale.format(self.earlier.end_date),
            locale.format(self.later.start_date),
        )
    }
}

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    /// Sorted by start date when valid; the caller's original order when not.
    pub sorted_schedules: Vec<ScheduleEntry>,
    /// Empty when valid.
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict: Option<ScheduleConflict>,
}

/// Copy of `schedules` stable-sorted by start date.
pub fn sort_schedules(schedules: &[ScheduleEntry]) -> Vec<ScheduleEntry> {
    let mut sorted = schedules.to_vec();
    sorted.sort_by_key(|e| e.start_date);
    sorted
}

/// Validate that no two department assignments overlap.
///
/// Only the first colliding adjacent pair (in sorted order) is reported. On
/// failure `sorted_schedules` holds the input in its original order, so the
/// form can keep showing rows where the user placed them.
pub fn validate(schedules: &[ScheduleEntry], locale: DateLocale) -> ValidationResult {
    let sorted = sort_schedules(schedules);

    match first_overlap(&sorted) {
        Some(index) => {
            let conflict = ScheduleConflict {
                index,
                earlier: sorted[index].clone(),
                later: sorted[index + 1].clone(),
            };
            let message = conflict.message(locale);
            tracing::debug!(
                index,
                earlier_end = %conflict.earlier.end_date,
                later_start = %conflict.later.start_date,
                "schedule overlap"
            );
            ValidationResult {
                is_valid: false,
                sorted_schedules: schedules.to_vec(),
                message,
                conflict: Some(conflict),
            }
        }
        None => ValidationResult {
            is_valid: true,
            sorted_schedules: sorted,
            message: String::new(),
            conflict: None,
        },
    }
}

/// Find every colliding adjacent pair in start-date order.
///
/// Unlike [`validate`], this does not stop at the first collision.
pub fn find_overlaps(schedules: &[ScheduleEntry]) -> Vec<ScheduleConflict> {
    let sorted = sort_schedules(schedules);

    sorted
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| collides(&pair[0], &pair[1]))
        .map(|(index, pair)| ScheduleConflict {
            index,
            earlier: pair[0].clone(),
            later: pair[1].clone(),
        })
        .collect()
}

fn first_overlap(sorted: &[ScheduleEntry]) -> Option<usize> {
    sorted.windows(2).position(|pair| collides(&pair[0], &pair[1]))
}

fn collides(earlier: &ScheduleEntry, later: &ScheduleEntry) -> bool {
    earlier.end_date >= later.start_date
}
