//! Search several consecutive days for the next available windows.

use chrono::{DateTime, Days, NaiveDate, Utc};

use crate::calculator::{compute_free_windows_with_options, SlotOptions};
use crate::calendar::local_date;
use crate::error::{Result, SlotError};
use crate::model::{AvailabilityRule, BookedInterval, FreeWindow};

/// Collect free windows over `days` calendar days starting at `from`.
///
/// Days are searched in order and the search stops as soon as
/// `options.max_results` windows have been collected, so the cap applies to
/// the whole range rather than to each day. Days before the provider-local
/// date of `now` are skipped; on that date, starts before `now` are dropped.
///
/// # Errors
/// Returns `SlotError::InvalidArgument` if `days` is zero, the range runs past
/// the end of the calendar, or `options` is invalid.
pub fn find_free_windows_across(
    from: NaiveDate,
    days: u32,
    rules: &[AvailabilityRule],
    booked: &[BookedInterval],
    options: &SlotOptions,
    now: DateTime<Utc>,
) -> Result<Vec<FreeWindow>> {
    options.validate()?;
    if days == 0 {
        return Err(SlotError::InvalidArgument(
            "search range must cover at least one day".to_string(),
        ));
    }
    if from.checked_add_days(Days::new(u64::from(days) - 1)).is_none() {
        return Err(SlotError::InvalidArgument(format!(
            "search range of {} days from {} is out of range",
            days, from
        )));
    }

    let today = local_date(now, options.timezone);
    let mut windows = Vec::new();
    for date in from
        .iter_days()
        .take(days as usize)
        .filter(|&date| date >= today)
    {
        let remaining = options.max_results - windows.len();
        let day_options = SlotOptions {
            max_results: remaining,
            ..options.clone()
        };
        windows.extend(compute_free_windows_with_options(
            date,
            rules,
            booked,
            &day_options,
            now,
        )?);
        if windows.len() >= options.max_results {
            return Ok(windows);
        }
    }

    Ok(windows)
}

/// The earliest free window within `days` days starting at `from`.
pub fn find_first_free_window(
    from: NaiveDate,
    days: u32,
    rules: &[AvailabilityRule],
    booked: &[BookedInterval],
    options: &SlotOptions,
    now: DateTime<Utc>,
) -> Result<Option<FreeWindow>> {
    let first_only = SlotOptions {
        max_results: 1,
        ..options.clone()
    };
    let windows = find_free_windows_across(from, days, rules, booked, &first_only, now)?;
    Ok(windows.into_iter().next())
}
