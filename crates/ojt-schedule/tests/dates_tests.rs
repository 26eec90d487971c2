//! Tests for calendar-date parsing, locale formatting, and clocks.

use chrono::NaiveDate;
use chrono_tz::Tz;
use ojt_schedule::dates::{parse_date_as_written, parse_timezone};
use ojt_schedule::{
    parse_calendar_date, Clock, DateLocale, FixedClock, ScheduleError, SystemClock,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn plain_date_parses_in_any_timezone() {
    let d = parse_calendar_date("2024-01-15", Tz::Asia__Manila).unwrap();
    assert_eq!(d, date(2024, 1, 15));
}

#[test]
fn utc_timestamp_normalizes_to_local_calendar_day() {
    // Midnight Jan 15 in Manila (UTC+8) is 16:00 UTC on Jan 14.
    let d = parse_calendar_date("2024-01-14T16:00:00.000Z", Tz::Asia__Manila).unwrap();
    assert_eq!(d, date(2024, 1, 15));

    let utc = parse_calendar_date("2024-01-14T16:00:00.000Z", Tz::UTC).unwrap();
    assert_eq!(utc, date(2024, 1, 14));
}

#[test]
fn naive_datetime_keeps_its_date_part() {
    let d = parse_calendar_date("2024-03-05T23:59:59", Tz::America__New_York).unwrap();
    assert_eq!(d, date(2024, 3, 5));
}

#[test]
fn as_written_ignores_offset() {
    let d = parse_date_as_written("2024-01-15T00:00:00+08:00").unwrap();
    assert_eq!(d, date(2024, 1, 15));
}

#[test]
fn garbage_date_is_invalid() {
    let err = parse_calendar_date("next tuesday", Tz::UTC).unwrap_err();
    assert_eq!(err, ScheduleError::InvalidDate("next tuesday".to_string()));
}

#[test]
fn timezone_names_are_validated() {
    assert_eq!(parse_timezone("Asia/Manila").unwrap(), Tz::Asia__Manila);
    assert!(matches!(
        parse_timezone("Mars/Olympus"),
        Err(ScheduleError::InvalidTimezone(_))
    ));
}

#[test]
fn locales_format_short_dates() {
    let d = date(2024, 1, 5);
    assert_eq!(DateLocale::EnUs.format(d), "1/5/2024");
    assert_eq!(DateLocale::EnGb.format(d), "05/01/2024");
    assert_eq!(DateLocale::Iso.format(d), "2024-01-05");
}

#[test]
fn locale_tags_parse_and_display() {
    assert_eq!("en-US".parse::<DateLocale>().unwrap(), DateLocale::EnUs);
    assert_eq!("en_gb".parse::<DateLocale>().unwrap(), DateLocale::EnGb);
    assert_eq!("ISO".parse::<DateLocale>().unwrap(), DateLocale::Iso);
    assert!(matches!(
        "fr-FR".parse::<DateLocale>(),
        Err(ScheduleError::InvalidLocale(_))
    ));
    assert_eq!(DateLocale::EnGb.to_string(), "en-GB");
    assert_eq!(DateLocale::default(), DateLocale::EnUs);
}

#[test]
fn fixed_clock_reports_its_date() {
    let clock = FixedClock(date(2024, 6, 1));
    assert_eq!(clock.today(), date(2024, 6, 1));
}

#[test]
fn system_clocks_agree_within_a_day_across_zones() {
    let east = SystemClock::new(Tz::Asia__Tokyo).today();
    let west = SystemClock::new(Tz::America__New_York).today();
    let gap = (east - west).num_days();
    assert!((0..=1).contains(&gap), "gap was {} days", gap);
}
