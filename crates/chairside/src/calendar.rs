//! Provider-local calendar time and DST transition policies.
//!
//! Availability rules speak in local minutes of a calendar day; bookings and
//! windows are absolute instants. This module converts between the two using
//! the provider's IANA timezone.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::model::MINUTES_PER_DAY;

/// Policy for working-interval bounds that fall in a spring-forward gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DstPolicy {
    /// Move the bound to the first local minute after the gap.
    #[default]
    ShiftForward,
    /// Drop the working interval for that day.
    Skip,
}

/// Parse an IANA timezone name such as `"Europe/Berlin"`.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| SlotError::InvalidTimezone(name.to_string()))
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| SlotError::InvalidArgument(format!("invalid date '{}': {}", s, e)))
}

/// The provider-local calendar date of an instant.
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// `None` past the end of the representable calendar.
fn local_minute(date: NaiveDate, minute: u32) -> Option<NaiveDateTime> {
    date.and_time(NaiveTime::MIN)
        .checked_add_signed(Duration::minutes(i64::from(minute)))
}

/// Resolve `minute` past local midnight of `date` to an absolute instant.
///
/// Ambiguous local times (fall-back overlap) resolve to the earlier instant.
/// Nonexistent local times (spring-forward gap) follow `policy`. `None` means
/// the policy dropped the time or it lies past the end of the calendar.
pub fn resolve_local(
    tz: Tz,
    date: NaiveDate,
    minute: u32,
    policy: DstPolicy,
) -> Option<DateTime<Utc>> {
    let naive = local_minute(date, minute)?;
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => match policy {
            DstPolicy::Skip => None,
            DstPolicy::ShiftForward => (1..=i64::from(MINUTES_PER_DAY)).find_map(|step| {
                let shifted = naive.checked_add_signed(Duration::minutes(step))?;
                tz.from_local_datetime(&shifted)
                    .earliest()
                    .map(|dt| dt.with_timezone(&Utc))
            }),
        },
    }
}
