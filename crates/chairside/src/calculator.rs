//! Compute bookable appointment start times for one provider on one day.
//!
//! Applicable rules are merged into working intervals, each interval is walked
//! in fixed slot steps, and candidates that collide with a booking or start in
//! the past are dropped. The computation is pure: the evaluation instant is an
//! argument, so identical inputs always give identical output.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::calendar::{local_date, resolve_local, DstPolicy};
use crate::error::{Result, SlotError};
use crate::model::{AvailabilityRule, BookedInterval, FreeWindow};
use crate::working::working_intervals;

pub const DEFAULT_SLOT_GRANULARITY_MINUTES: i64 = 30;
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Knobs for a free-window computation.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotOptions {
    /// Length of the requested appointment.
    pub duration_minutes: i64,
    /// Step between candidate start times.
    pub slot_granularity_minutes: i64,
    /// Cap on the number of windows returned.
    pub max_results: usize,
    /// The provider's timezone; rule times and `date` are local to it.
    pub timezone: Tz,
    pub dst_policy: DstPolicy,
}

impl SlotOptions {
    /// Options for an appointment of `duration_minutes` with every other knob at its default.
    pub fn new(duration_minutes: i64) -> Self {
        Self {
            duration_minutes,
            slot_granularity_minutes: DEFAULT_SLOT_GRANULARITY_MINUTES,
            max_results: DEFAULT_MAX_RESULTS,
            timezone: Tz::UTC,
            dst_policy: DstPolicy::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_duration(self.duration_minutes)?;
        if self.slot_granularity_minutes <= 0 {
            return Err(SlotError::InvalidArgument(format!(
                "slot granularity must be positive, got {} minutes",
                self.slot_granularity_minutes
            )));
        }
        if self.max_results == 0 {
            return Err(SlotError::InvalidArgument(
                "max results must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Reject a non-positive appointment length.
pub(crate) fn validate_duration(duration_minutes: i64) -> Result<()> {
    if duration_minutes <= 0 {
        return Err(SlotError::InvalidArgument(format!(
            "duration must be positive, got {} minutes",
            duration_minutes
        )));
    }
    Ok(())
}

/// `instant + minutes`, or `None` when the result is not representable.
pub(crate) fn add_minutes(instant: DateTime<Utc>, minutes: i64) -> Option<DateTime<Utc>> {
    instant.checked_add_signed(TimeDelta::try_minutes(minutes)?)
}

/// Compute free windows for a provider working in UTC.
///
/// # Arguments
/// - `date` -- the calendar day to search
/// - `rules` -- the provider's availability rules (may be empty)
/// - `booked` -- appointments already on the provider's calendar (may be empty)
/// - `duration_minutes` -- length of the requested appointment
/// - `slot_granularity_minutes` -- step between candidate start times
/// - `max_results` -- cap on the number of windows returned
/// - `now` -- the evaluation instant; on the current day, earlier starts are dropped
///
/// # Errors
/// Returns `SlotError::InvalidArgument` if `duration_minutes`,
/// `slot_granularity_minutes`, or `max_results` is not positive.
pub fn compute_free_windows(
    date: NaiveDate,
    rules: &[AvailabilityRule],
    booked: &[BookedInterval],
    duration_minutes: i64,
    slot_granularity_minutes: i64,
    max_results: usize,
    now: DateTime<Utc>,
) -> Result<Vec<FreeWindow>> {
    let options = SlotOptions {
        slot_granularity_minutes,
        max_results,
        ..SlotOptions::new(duration_minutes)
    };
    compute_free_windows_with_options(date, rules, booked, &options, now)
}

/// Compute free windows with an explicit timezone and DST policy.
///
/// Identical to [`compute_free_windows`] but takes all knobs from `options`.
/// The result is strictly ordered by start, no window overlaps a blocking
/// booking, and every window lies inside one merged working interval.
pub fn compute_free_windows_with_options(
    date: NaiveDate,
    rules: &[AvailabilityRule],
    booked: &[BookedInterval],
    options: &SlotOptions,
    now: DateTime<Utc>,
) -> Result<Vec<FreeWindow>> {
    options.validate()?;

    let not_before = (local_date(now, options.timezone) == date).then_some(now);
    let blocking: Vec<&BookedInterval> = booked.iter().filter(|b| b.blocks_time()).collect();

    let mut windows = Vec::new();
    'intervals: for (interval_start, interval_end) in resolve_working_intervals(rules, date, options)
    {
        let mut candidate = interval_start;
        // An end past the representable range can never fit the interval.
        while let Some(end) = add_minutes(candidate, options.duration_minutes)
            .filter(|&end| end <= interval_end)
        {
            let window = FreeWindow {
                start: candidate,
                end,
            };
            let in_past = not_before.is_some_and(|now| window.start < now);
            let collides = blocking.iter().any(|b| b.overlaps(window.start, window.end));

            if !in_past && !collides {
                windows.push(window);
                if windows.len() == options.max_results {
                    break 'intervals;
                }
            }
            match add_minutes(candidate, options.slot_granularity_minutes) {
                Some(next) => candidate = next,
                None => break,
            }
        }
    }

    debug!(%date, windows = windows.len(), "computed free windows");
    Ok(windows)
}

/// Working intervals for `date` as absolute instants, in chronological order.
///
/// Intervals whose bounds the DST policy drops, that run past the end of the
/// calendar, or that collapse to nothing after resolution, are left out.
pub(crate) fn resolve_working_intervals(
    rules: &[AvailabilityRule],
    date: NaiveDate,
    options: &SlotOptions,
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    working_intervals(rules, date)
        .into_iter()
        .filter_map(|range| {
            let start = resolve_local(options.timezone, date, range.start, options.dst_policy);
            let end = resolve_local(options.timezone, date, range.end, options.dst_policy);
            match (start, end) {
                (Some(start), Some(end)) if start < end => Some((start, end)),
                _ => {
                    debug!(%date, start = range.start, end = range.end, "working interval bound did not resolve, dropping interval");
                    None
                }
            }
        })
        .collect()
}
