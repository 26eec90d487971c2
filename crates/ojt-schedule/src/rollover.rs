//! Month rollover policies for year/month arithmetic on calendar dates.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// How adding months treats a day-of-month the target month does not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthRollover {
    /// Keep the day-of-month and let the excess days spill into the next month
    /// (Jan 31 + 1 month = Mar 3, Feb 29 + 1 year = Mar 1). This is what the
    /// browser `Date` setters do.
    #[default]
    Overflow,
    /// Clamp to the last day of the target month (Jan 31 + 1 month = Feb 28).
    Clamp,
}

impl MonthRollover {
    /// Parse `"overflow"` or `"clamp"` (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "overflow" => Some(Self::Overflow),
            "clamp" => Some(Self::Clamp),
            _ => None,
        }
    }
}

/// Add `months` (may be negative) to `date` under the given policy.
///
/// # Errors
/// Returns `ScheduleError::DateOutOfRange` if the result is not representable.
pub fn add_months(date: NaiveDate, months: i64, rollover: MonthRollover) -> Result<NaiveDate> {
    match rollover {
        MonthRollover::Overflow => {
            let total = i64::from(date.year()) * 12 + i64::from(date.month0()) + months;
            let year =
                i32::try_from(total.div_euclid(12)).map_err(|_| ScheduleError::DateOutOfRange)?;
            let month = total.rem_euclid(12) as u32 + 1;
            NaiveDate::from_ymd_opt(year, month, 1)
                .and_then(|first| first.checked_add_days(Days::new(u64::from(date.day() - 1))))
                .ok_or(ScheduleError::DateOutOfRange)
        }
        MonthRollover::Clamp => {
            let magnitude =
                u32::try_from(months.unsigned_abs()).map_err(|_| ScheduleError::DateOutOfRange)?;
            let shifted = if months >= 0 {
                date.checked_add_months(Months::new(magnitude))
            } else {
                date.checked_sub_months(Months::new(magnitude))
            };
            shifted.ok_or(ScheduleError::DateOutOfRange)
        }
    }
}
