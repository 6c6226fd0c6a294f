//! Property-based tests for free-window computation using proptest.
//!
//! These tests verify invariants that should hold for *any* rule set and
//! booking list, not just the worked scenarios in `calculator_tests.rs`.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use chairside::calculator::{compute_free_windows, SlotOptions};
use chairside::conflict::check_booking;
use chairside::model::{AvailabilityRule, BookedInterval};
use chairside::working::working_intervals;
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// A Monday rule starting on a quarter hour, possibly malformed (empty range).
fn arb_rule() -> impl Strategy<Value = AvailabilityRule> {
    (0u32..96, 0u32..=480).prop_map(|(quarter, len)| {
        let start = quarter * 15;
        let end = (start + len).min(24 * 60);
        AvailabilityRule::weekly(1, start, end)
    })
}

fn arb_rules() -> impl Strategy<Value = Vec<AvailabilityRule>> {
    prop::collection::vec(arb_rule(), 0..6)
}

/// A booking somewhere on the Monday, in whole minutes.
fn arb_booking() -> impl Strategy<Value = BookedInterval> {
    (0i64..1440, 5i64..=180).prop_map(|(offset, len)| {
        let start = midnight() + Duration::minutes(offset);
        BookedInterval::confirmed(start, start + Duration::minutes(len))
    })
}

fn arb_bookings() -> impl Strategy<Value = Vec<BookedInterval>> {
    prop::collection::vec(arb_booking(), 0..8)
}

fn arb_duration() -> impl Strategy<Value = i64> {
    5i64..=120
}

fn arb_granularity() -> impl Strategy<Value = i64> {
    5i64..=60
}

/// Any positive minute count, up to `i64::MAX`.
fn arb_positive_minutes() -> impl Strategy<Value = i64> {
    prop_oneof![1i64..=1440, 1i64..=i64::MAX]
}

/// Any representable calendar date.
fn arb_any_date() -> impl Strategy<Value = NaiveDate> {
    (NaiveDate::MIN.num_days_from_ce()..=NaiveDate::MAX.num_days_from_ce())
        .prop_filter_map("unrepresentable date", NaiveDate::from_num_days_from_ce_opt)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
}

fn midnight() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 16, 0, 0, 0).unwrap()
}

fn early() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
}

const UNCAPPED: usize = 10_000;

/// Every weekday from 09:00 to the end of the day.
fn every_day_rules() -> Vec<AvailabilityRule> {
    (0u8..7).map(|w| AvailabilityRule::weekly(w, 9 * 60, 24 * 60)).collect()
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: Without bookings the count follows the slot formula
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn count_matches_slot_formula(
        rules in arb_rules(),
        dur in arb_duration(),
        gran in arb_granularity(),
    ) {
        let windows = compute_free_windows(monday(), &rules, &[], dur, gran, UNCAPPED, early()).unwrap();

        let expected: i64 = working_intervals(&rules, monday())
            .iter()
            .map(|r| {
                let len = i64::from(r.len());
                if len < dur { 0 } else { (len - dur) / gran + 1 }
            })
            .sum();

        prop_assert_eq!(windows.len() as i64, expected);
    }
}

// ---------------------------------------------------------------------------
// Property 2: No returned window overlaps a booking
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn no_window_overlaps_a_booking(
        rules in arb_rules(),
        booked in arb_bookings(),
        dur in arb_duration(),
        gran in arb_granularity(),
    ) {
        let windows = compute_free_windows(monday(), &rules, &booked, dur, gran, UNCAPPED, early()).unwrap();

        for w in &windows {
            for b in &booked {
                prop_assert!(
                    !(w.start < b.end && w.end > b.start),
                    "window {:?}-{:?} overlaps booking {:?}-{:?}",
                    w.start, w.end, b.start, b.end
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: Output is strictly increasing by start
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn output_is_strictly_increasing(
        rules in arb_rules(),
        booked in arb_bookings(),
        dur in arb_duration(),
        gran in arb_granularity(),
    ) {
        let windows = compute_free_windows(monday(), &rules, &booked, dur, gran, UNCAPPED, early()).unwrap();

        for pair in windows.windows(2) {
            prop_assert!(pair[0].start < pair[1].start);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 4: Every window fits inside one working interval
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn windows_fit_working_intervals(
        rules in arb_rules(),
        booked in arb_bookings(),
        dur in arb_duration(),
        gran in arb_granularity(),
    ) {
        let windows = compute_free_windows(monday(), &rules, &booked, dur, gran, UNCAPPED, early()).unwrap();
        let intervals = working_intervals(&rules, monday());

        for w in &windows {
            prop_assert_eq!(w.end - w.start, Duration::minutes(dur));
            let fits = intervals.iter().any(|r| {
                midnight() + Duration::minutes(i64::from(r.start)) <= w.start
                    && w.end <= midnight() + Duration::minutes(i64::from(r.end))
            });
            prop_assert!(fits, "window {:?} is outside working hours", w.start);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 5: The cap truncates the uncapped result
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn cap_is_a_prefix_of_uncapped(
        rules in arb_rules(),
        booked in arb_bookings(),
        dur in arb_duration(),
        gran in arb_granularity(),
        cap in 1usize..=20,
    ) {
        let all = compute_free_windows(monday(), &rules, &booked, dur, gran, UNCAPPED, early()).unwrap();
        let capped = compute_free_windows(monday(), &rules, &booked, dur, gran, cap, early()).unwrap();

        prop_assert_eq!(capped.len(), all.len().min(cap));
        prop_assert_eq!(&capped[..], &all[..capped.len()]);
    }
}

// ---------------------------------------------------------------------------
// Property 6: Identical inputs give identical output
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn computation_is_deterministic(
        rules in arb_rules(),
        booked in arb_bookings(),
        dur in arb_duration(),
        gran in arb_granularity(),
        now_offset in 0i64..1440,
    ) {
        let now = midnight() + Duration::minutes(now_offset);
        let first = compute_free_windows(monday(), &rules, &booked, dur, gran, 10, now).unwrap();
        let second = compute_free_windows(monday(), &rules, &booked, dur, gran, 10, now).unwrap();

        prop_assert_eq!(first, second);
    }
}

// ---------------------------------------------------------------------------
// Property 7: Any positive duration and granularity is accepted
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn any_positive_arguments_succeed(
        rules in arb_rules(),
        booked in arb_bookings(),
        dur in arb_positive_minutes(),
        gran in arb_positive_minutes(),
    ) {
        let result = compute_free_windows(monday(), &rules, &booked, dur, gran, UNCAPPED, early());
        prop_assert!(result.is_ok(), "{:?}", result);

        let windows = result.unwrap();
        for pair in windows.windows(2) {
            prop_assert!(pair[0].start < pair[1].start);
        }
        for w in &windows {
            prop_assert_eq!(w.end - w.start, Duration::minutes(dur));
        }
    }
}

// ---------------------------------------------------------------------------
// Property 8: Calendar edges never fail
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn any_date_and_length_succeeds(
        date in arb_any_date(),
        dur in arb_positive_minutes(),
        gran in arb_positive_minutes(),
    ) {
        let rules = every_day_rules();
        let windows = compute_free_windows(date, &rules, &[], dur, gran, 50, early());
        prop_assert!(windows.is_ok(), "{:?}", windows);
        for w in windows.unwrap() {
            prop_assert_eq!(w.start.date_naive(), date);
        }

        let start = date.and_hms_opt(9, 0, 0).unwrap().and_utc();
        let check = check_booking(start, &rules, &[], &SlotOptions::new(dur));
        prop_assert!(check.is_ok(), "{:?}", check);
    }
}
