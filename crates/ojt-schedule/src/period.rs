//! Training periods and inclusive end-date calculation.
//!
//! A period is a named duration template ("6 months", "1 year 2 weeks") used by
//! the schedule form to derive a default end date whenever the start date or
//! the selected period changes.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::rollover::{self, MonthRollover};

/// A named training period, in the shape returned by the period listing endpoint.
///
/// The duration fields are independent and additive; unset and zero fields
/// contribute nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub months: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weeks: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<i32>,
}

impl Period {
    /// True when no duration field contributes to the end date.
    pub fn is_empty(&self) -> bool {
        [self.years, self.months, self.weeks, self.days]
            .iter()
            .all(|f| nonzero(*f).is_none())
    }

    /// Human-readable duration, e.g. `"1 year, 2 months"`.
    pub fn describe(&self) -> String {
        let parts: Vec<String> = [
            (self.years, "year"),
            (self.months, "month"),
            (self.weeks, "week"),
            (self.days, "day"),
        ]
        .into_iter()
        .filter_map(|(value, unit)| {
            nonzero(value).map(|n| {
                if n.abs() == 1 {
                    format!("{} {}", n, unit)
                } else {
                    format!("{} {}s", n, unit)
                }
            })
        })
        .collect();

        if parts.is_empty() {
            "no duration".to_string()
        } else {
            parts.join(", ")
        }
    }

    /// The inclusive end date of this period starting on `start_date`.
    ///
    /// Durations are applied in the fixed order years, months, weeks, days,
    /// then one day is subtracted. Order matters: month arithmetic does not
    /// commute across month-end rollovers.
    ///
    /// # Errors
    /// Returns `ScheduleError::DateOutOfRange` if an intermediate date is not
    /// representable.
    pub fn end_date(&self, start_date: NaiveDate, rollover: MonthRollover) -> Result<NaiveDate> {
        let mut date = start_date;

        if let Some(years) = nonzero(self.years) {
            date = rollover::add_months(date, i64::from(years) * 12, rollover)?;
        }
        if let Some(months) = nonzero(self.months) {
            date = rollover::add_months(date, i64::from(months), rollover)?;
        }
        if let Some(weeks) = nonzero(self.weeks) {
            date = add_days(date, i64::from(weeks) * 7)?;
        }
        if let Some(days) = nonzero(self.days) {
            date = add_days(date, i64::from(days))?;
        }

        date.pred_opt().ok_or(ScheduleError::DateOutOfRange)
    }
}

/// Look up a period by id.
///
/// # Errors
/// Returns `ScheduleError::PeriodNotFound` if no period has that id.
pub fn find_period(periods: &[Period], period_id: i64) -> Result<&Period> {
    periods.iter().find(|p| p.id == period_id).ok_or_else(|| {
        tracing::debug!(period_id, available = periods.len(), "period lookup failed");
        ScheduleError::PeriodNotFound(period_id)
    })
}

/// Compute the inclusive end date for the selected period, using browser-style
/// month overflow.
///
/// See [`compute_end_date_with`] for the rollover-explicit variant.
pub fn compute_end_date(
    periods: &[Period],
    selected_period_id: i64,
    start_date: NaiveDate,
) -> Result<NaiveDate> {
    compute_end_date_with(
        periods,
        selected_period_id,
        start_date,
        MonthRollover::default(),
    )
}

/// Compute the inclusive end date for the selected period.
///
/// # Arguments
/// - `periods` -- The period list fetched from the backend
/// - `selected_period_id` -- Id of the period chosen in the form
/// - `start_date` -- First day of the assignment
/// - `rollover` -- How year/month additions treat short months
///
/// # Errors
/// Returns `ScheduleError::PeriodNotFound` if `selected_period_id` matches no period.
/// Returns `ScheduleError::DateOutOfRange` if the arithmetic leaves chrono's range.
pub fn compute_end_date_with(
    periods: &[Period],
    selected_period_id: i64,
    start_date: NaiveDate,
    rollover: MonthRollover,
) -> Result<NaiveDate> {
    let period = find_period(periods, selected_period_id)?;
    if period.is_empty() {
        tracing::debug!(period_id = period.id, "period has no duration fields");
    }
    period.end_date(start_date, rollover)
}

fn nonzero(field: Option<i32>) -> Option<i32> {
    field.filter(|&n| n != 0)
}

fn add_days(date: NaiveDate, days: i64) -> Result<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
        .ok_or(ScheduleError::DateOutOfRange)
}
