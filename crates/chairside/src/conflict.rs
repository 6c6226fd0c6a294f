//! Validate a directly requested appointment against the provider's calendar.
//!
//! Overlap is half-open: an appointment that ends exactly when a booking starts
//! (or starts exactly when one ends) is NOT a conflict.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::calculator::{add_minutes, resolve_working_intervals, validate_duration, SlotOptions};
use crate::calendar::local_date;
use crate::error::Result;
use crate::model::{AvailabilityRule, BookedInterval};

/// A booking that collides with a requested appointment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conflict {
    pub booking: BookedInterval,
    pub overlap_minutes: i64,
}

/// Outcome of [`check_booking`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum BookingCheck {
    Bookable,
    Conflicts { conflicts: Vec<Conflict> },
    OutsideWorkingHours,
}

/// Find every blocking booking that overlaps `[start, end)`.
///
/// Cancelled bookings are ignored. The overlap duration is
/// `min(end, b.end) - max(start, b.start)`.
pub fn find_conflicts(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    booked: &[BookedInterval],
) -> Vec<Conflict> {
    booked
        .iter()
        .filter(|b| b.overlaps(start, end))
        .map(|b| Conflict {
            booking: b.clone(),
            overlap_minutes: (end.min(b.end) - start.max(b.start)).num_minutes(),
        })
        .collect()
}

/// Decide whether an appointment of `options.duration_minutes` starting at
/// `start` can be booked.
///
/// The appointment must lie entirely inside one working interval of its local
/// day and must not overlap a blocking booking. It need not be aligned to the
/// slot granularity.
///
/// # Errors
/// Returns `SlotError::InvalidArgument` if the duration is not positive.
pub fn check_booking(
    start: DateTime<Utc>,
    rules: &[AvailabilityRule],
    booked: &[BookedInterval],
    options: &SlotOptions,
) -> Result<BookingCheck> {
    validate_duration(options.duration_minutes)?;
    let Some(end) = add_minutes(start, options.duration_minutes) else {
        return Ok(BookingCheck::OutsideWorkingHours);
    };

    let date = local_date(start, options.timezone);
    let fits = resolve_working_intervals(rules, date, options)
        .iter()
        .any(|&(open, close)| open <= start && end <= close);
    if !fits {
        return Ok(BookingCheck::OutsideWorkingHours);
    }

    let conflicts = find_conflicts(start, end, booked);
    if conflicts.is_empty() {
        Ok(BookingCheck::Bookable)
    } else {
        Ok(BookingCheck::Conflicts { conflicts })
    }
}
