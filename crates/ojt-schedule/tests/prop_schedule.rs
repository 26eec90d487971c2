//! Property-based tests for end-date calculation and overlap validation.

use chrono::{Duration, NaiveDate};
use ojt_schedule::{
    compute_end_date, compute_end_date_with, find_overlaps, validate, DateLocale, MonthRollover,
    Period, ScheduleEntry,
};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Any date in 2020-2030.
fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..4018)
        .prop_map(|offset| NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + Duration::days(offset))
}

fn arb_field() -> impl Strategy<Value = Option<i32>> {
    prop_oneof![Just(None), (0i32..=24).prop_map(Some)]
}

fn arb_period() -> impl Strategy<Value = Period> {
    (arb_field(), arb_field(), arb_field(), arb_field()).prop_map(|(years, months, weeks, days)| {
        Period {
            id: 1,
            name: "generated".to_string(),
            years,
            months,
            weeks,
            days,
        }
    })
}

fn arb_entry() -> impl Strategy<Value = ScheduleEntry> {
    (0i64..20, arb_date(), 0i64..90).prop_map(|(dept, start, len)| {
        ScheduleEntry::new(dept, start, start + Duration::days(len))
    })
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// End-date properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config())]

    #[test]
    fn weeks_and_days_are_plain_day_arithmetic(
        start in arb_date(),
        weeks in 0i32..=52,
        days in 0i32..=365,
    ) {
        let periods = vec![Period {
            id: 9,
            name: "days".to_string(),
            years: None,
            months: None,
            weeks: Some(weeks),
            days: Some(days),
        }];
        let end = compute_end_date(&periods, 9, start).unwrap();
        let expected = start + Duration::days(i64::from(weeks) * 7 + i64::from(days) - 1);
        prop_assert_eq!(end, expected);
    }

    #[test]
    fn clamp_never_ends_after_overflow(start in arb_date(), period in arb_period()) {
        let periods = vec![period];
        let overflow = compute_end_date_with(&periods, 1, start, MonthRollover::Overflow).unwrap();
        let clamp = compute_end_date_with(&periods, 1, start, MonthRollover::Clamp).unwrap();
        prop_assert!(clamp <= overflow, "clamp {} after overflow {}", clamp, overflow);
    }

    #[test]
    fn nonnegative_periods_never_end_before_day_before_start(
        start in arb_date(),
        period in arb_period(),
    ) {
        let periods = vec![period];
        let end = compute_end_date(&periods, 1, start).unwrap();
        prop_assert!(end >= start - Duration::days(1));
    }
}

// ---------------------------------------------------------------------------
// Validator properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config())]

    #[test]
    fn valid_output_is_sorted_and_idempotent(entries in prop::collection::vec(arb_entry(), 0..8)) {
        let result = validate(&entries, DateLocale::Iso);
        if result.is_valid {
            prop_assert!(result
                .sorted_schedules
                .windows(2)
                .all(|w| w[0].start_date <= w[1].start_date));
            let again = validate(&result.sorted_schedules, DateLocale::Iso);
            prop_assert!(again.is_valid);
            prop_assert_eq!(again.sorted_schedules, result.sorted_schedules);
        } else {
            prop_assert_eq!(result.sorted_schedules, entries);
            prop_assert!(!result.message.is_empty());
        }
    }

    #[test]
    fn validate_agrees_with_find_overlaps(entries in prop::collection::vec(arb_entry(), 0..8)) {
        let result = validate(&entries, DateLocale::Iso);
        let all = find_overlaps(&entries);

        prop_assert_eq!(result.is_valid, all.is_empty());
        if let Some(conflict) = result.conflict {
            prop_assert_eq!(&conflict, &all[0]);
        }
    }

    #[test]
    fn validation_preserves_multiset(entries in prop::collection::vec(arb_entry(), 0..8)) {
        let result = validate(&entries, DateLocale::Iso);
        prop_assert_eq!(result.sorted_schedules.len(), entries.len());
        for e in &entries {
            prop_assert!(result.sorted_schedules.contains(e));
        }
    }
}
