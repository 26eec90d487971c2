//! WASM bindings for ojt-schedule.
//!
//! Exposes end-date calculation and schedule overlap validation to the
//! dashboard's schedule form via `wasm-bindgen`. Periods and schedules cross
//! the boundary as JSON strings in the backend's shape (`departmentId`,
//! `startDate`, `endDate`), so the form can pass API responses straight through.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p ojt-schedule-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/src/wasm/ \
//!   target/wasm32-unknown-unknown/release/ojt_schedule_wasm.wasm
//! ```

use chrono::NaiveDate;
use ojt_schedule::dates::{parse_date_as_written, parse_timezone};
use ojt_schedule::{DateLocale, MonthRollover, Period, ScheduleConflict, ScheduleEntry};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConflictDto<'a> {
    #[serde(flatten)]
    conflict: &'a ScheduleConflict,
    message: String,
}

// ---------------------------------------------------------------------------
// Helpers: parse JS-side inputs
// ---------------------------------------------------------------------------

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_periods_json(json: &str) -> Result<Vec<Period>, JsValue> {
    serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid periods JSON: {}", e)))
}

/// Schedule rows with timestamp dates reduced to the calendar day in
/// `timezone`; without one, dates are taken as written.
fn parse_schedules_json(
    json: &str,
    timezone: Option<String>,
) -> Result<Vec<ScheduleEntry>, JsValue> {
    let tz = timezone
        .as_deref()
        .map(parse_timezone)
        .transpose()
        .map_err(js_err)?;
    ojt_schedule::parse_schedules(json, tz).map_err(js_err)
}

fn parse_locale(locale: Option<String>) -> Result<DateLocale, JsValue> {
    locale
        .map(|tag| tag.parse::<DateLocale>().map_err(js_err))
        .transpose()
        .map(Option::unwrap_or_default)
}

fn parse_rollover(rollover: Option<String>) -> Result<MonthRollover, JsValue> {
    match rollover {
        None => Ok(MonthRollover::default()),
        Some(name) => MonthRollover::from_name(&name)
            .ok_or_else(|| JsValue::from_str(&format!("Invalid rollover: {}", name))),
    }
}

/// A date picker value (`YYYY-MM-DD`) or an ISO timestamp; timestamps are
/// reduced to the calendar day in `timezone` when one is given.
fn parse_start_date(start_date: &str, timezone: Option<String>) -> Result<NaiveDate, JsValue> {
    match timezone {
        Some(name) => {
            let tz = parse_timezone(&name).map_err(js_err)?;
            ojt_schedule::parse_calendar_date(start_date, tz).map_err(js_err)
        }
        None => parse_date_as_written(start_date).map_err(js_err),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Compute the inclusive end date of the selected period.
///
/// Returns the end date as `YYYY-MM-DD`. Throws if the period id is not in
/// the list; the form shows "Invalid period or start date" in that case.
///
/// # Arguments
/// - `periods_json` -- JSON array of periods from the period listing endpoint
/// - `period_id` -- Id of the selected period
/// - `start_date` -- Start date (`YYYY-MM-DD` or ISO timestamp)
/// - `rollover` -- Optional `"overflow"` (default) or `"clamp"`
/// - `timezone` -- Optional IANA timezone for timestamp start dates
#[wasm_bindgen(js_name = "computeEndDate")]
pub fn compute_end_date(
    periods_json: &str,
    period_id: i32,
    start_date: &str,
    rollover: Option<String>,
    timezone: Option<String>,
) -> Result<String, JsValue> {
    let periods = parse_periods_json(periods_json)?;
    let start = parse_start_date(start_date, timezone)?;
    let rollover = parse_rollover(rollover)?;

    let end =
        ojt_schedule::compute_end_date_with(&periods, i64::from(period_id), start, rollover)
            .map_err(js_err)?;

    Ok(end.format("%Y-%m-%d").to_string())
}

/// Validate that a trainee's department schedules do not overlap.
///
/// Returns a JSON string `{isValid, sortedSchedules, message, conflict?}`.
/// `sortedSchedules` is sorted by start date only when `isValid` is true.
///
/// Pass the browser's IANA `timezone` when rows carry ISO timestamps so that
/// each one is compared on the local calendar day the user picked.
#[wasm_bindgen(js_name = "validateSchedules")]
pub fn validate_schedules(
    schedules_json: &str,
    locale: Option<String>,
    timezone: Option<String>,
) -> Result<String, JsValue> {
    let schedules = parse_schedules_json(schedules_json, timezone)?;
    let locale = parse_locale(locale)?;

    to_json(&ojt_schedule::validate(&schedules, locale))
}

/// Find every overlapping adjacent pair of schedules.
///
/// Returns a JSON array of `{index, earlier, later, message}` objects.
#[wasm_bindgen(js_name = "findOverlaps")]
pub fn find_overlaps(
    schedules_json: &str,
    locale: Option<String>,
    timezone: Option<String>,
) -> Result<String, JsValue> {
    let schedules = parse_schedules_json(schedules_json, timezone)?;
    let locale = parse_locale(locale)?;

    let conflicts = ojt_schedule::find_overlaps(&schedules);
    let dtos: Vec<ConflictDto<'_>> = conflicts
        .iter()
        .map(|conflict| ConflictDto {
            conflict,
            message: conflict.message(locale),
        })
        .collect();

    to_json(&dtos)
}
