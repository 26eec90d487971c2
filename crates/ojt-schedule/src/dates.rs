//! Calendar-date parsing, locale-aware short date formatting, and an injectable clock.
//!
//! Every date in this crate is a `NaiveDate`: schedules are compared at day
//! granularity, never by time of day. Timestamps coming from a browser are
//! reduced to the calendar date they fall on in the user's timezone.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, ScheduleError};

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an IANA timezone name (e.g. "Asia/Manila").
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| ScheduleError::InvalidTimezone(name.to_string()))
}

/// Parse a calendar date, normalizing timestamps to the date they fall on in `tz`.
///
/// Accepts:
/// - `YYYY-MM-DD`
/// - naive datetimes (`YYYY-MM-DDTHH:MM:SS[.fff]`), whose date part is taken as-is
/// - RFC 3339 timestamps (`2024-01-14T16:00:00Z`), converted to `tz` first
///
/// # Errors
/// Returns `ScheduleError::InvalidDate` if the input matches none of the formats.
pub fn parse_calendar_date(input: &str, tz: Tz) -> Result<NaiveDate> {
    let s = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&tz).date_naive());
    }
    parse_naive(s).ok_or_else(|| ScheduleError::InvalidDate(input.to_string()))
}

/// Parse a calendar date exactly as written, ignoring any UTC offset.
///
/// This is what the JSON layer uses: `2024-01-15T00:00:00+08:00` is the 15th.
pub fn parse_date_as_written(input: &str) -> Result<NaiveDate> {
    let s = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    parse_naive(s).ok_or_else(|| ScheduleError::InvalidDate(input.to_string()))
}

fn parse_naive(s: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|ndt| ndt.date())
}

/// Serde adapter accepting anything [`parse_date_as_written`] accepts.
pub fn deserialize_calendar_date<'de, D>(
    deserializer: D,
) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date_as_written(&raw).map_err(serde::de::Error::custom)
}

/// Short date formats used in user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateLocale {
    /// `1/20/2024`
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    /// `20/01/2024`
    #[serde(rename = "en-GB")]
    EnGb,
    /// `2024-01-20`
    #[serde(rename = "iso")]
    Iso,
}

impl DateLocale {
    pub fn format(self, date: NaiveDate) -> String {
        match self {
            DateLocale::EnUs => date.format("%-m/%-d/%Y").to_string(),
            DateLocale::EnGb => date.format("%d/%m/%Y").to_string(),
            DateLocale::Iso => date.format("%Y-%m-%d").to_string(),
        }
    }

    fn tag(self) -> &'static str {
        match self {
            DateLocale::EnUs => "en-US",
            DateLocale::EnGb => "en-GB",
            DateLocale::Iso => "iso",
        }
    }
}

impl fmt::Display for DateLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for DateLocale {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "en-us" | "en" => Ok(DateLocale::EnUs),
            "en-gb" => Ok(DateLocale::EnGb),
            "iso" | "iso-8601" => Ok(DateLocale::Iso),
            _ => Err(ScheduleError::InvalidLocale(s.to_string())),
        }
    }
}

/// Source of "today" for callers that default a start date.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Wall clock, reporting the current date in a fixed IANA timezone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    pub tz: Tz,
}

impl SystemClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.tz).date_naive()
    }
}

/// A clock frozen on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
