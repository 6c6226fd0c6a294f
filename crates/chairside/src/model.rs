//! Availability rules, booked intervals, and free windows.
//!
//! Times of day are minutes since local midnight (`0..=1440`), so a rule can
//! run up to the end of the day. Booked intervals and free windows are absolute
//! UTC instants.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minutes in a calendar day. The largest valid `end_minute`.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// A provider's declared working window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRule {
    /// Day of week, Sunday = 0. Absent for date-specific rules.
    #[serde(default)]
    pub weekday: Option<u8>,
    pub start_minute: u32,
    pub end_minute: u32,
    #[serde(default = "default_true")]
    pub is_recurring: bool,
    /// Lower bound of a recurring rule, or the date of a one-off rule.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Why a rule was rejected by [`AvailabilityRule::validate`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleDefect {
    #[error("start minute {start} is not before end minute {end}")]
    EmptyRange { start: u32, end: u32 },

    #[error("end minute {0} runs past the end of the day")]
    PastMidnight(u32),

    #[error("weekday {0} is outside 0..=6")]
    BadWeekday(u8),

    #[error("recurring rule has no weekday")]
    RecurringWithoutWeekday,

    #[error("one-off rule has no date")]
    OneOffWithoutDate,

    #[error("start date {start} is after end date {end}")]
    InvertedDates { start: NaiveDate, end: NaiveDate },
}

impl AvailabilityRule {
    /// A recurring, active rule for `weekday` (Sunday = 0) between two times of day.
    pub fn weekly(weekday: u8, start_minute: u32, end_minute: u32) -> Self {
        Self {
            weekday: Some(weekday),
            start_minute,
            end_minute,
            is_recurring: true,
            start_date: None,
            end_date: None,
            is_active: true,
        }
    }

    /// A one-off, active rule for a single calendar day.
    pub fn one_off(date: NaiveDate, start_minute: u32, end_minute: u32) -> Self {
        Self {
            weekday: None,
            start_minute,
            end_minute,
            is_recurring: false,
            start_date: Some(date),
            end_date: None,
            is_active: true,
        }
    }

    /// Check the rule's internal consistency.
    pub fn validate(&self) -> Result<(), RuleDefect> {
        if self.start_minute >= self.end_minute {
            return Err(RuleDefect::EmptyRange {
                start: self.start_minute,
                end: self.end_minute,
            });
        }
        if self.end_minute > MINUTES_PER_DAY {
            return Err(RuleDefect::PastMidnight(self.end_minute));
        }
        if let Some(weekday) = self.weekday {
            if weekday > 6 {
                return Err(RuleDefect::BadWeekday(weekday));
            }
        }
        if self.is_recurring && self.weekday.is_none() {
            return Err(RuleDefect::RecurringWithoutWeekday);
        }
        if !self.is_recurring && self.start_date.is_none() {
            return Err(RuleDefect::OneOffWithoutDate);
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(RuleDefect::InvertedDates { start, end });
            }
        }
        Ok(())
    }

    /// Whether this rule opens the provider's calendar on `date`.
    ///
    /// Recurring rules match on weekday within their optional date bounds.
    /// One-off rules match only their own `start_date`. Inactive rules never apply.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        if !self.is_active {
            return false;
        }
        let weekday_matches = self
            .weekday
            .map(|w| u32::from(w) == date.weekday().num_days_from_sunday());

        if self.is_recurring {
            weekday_matches == Some(true)
                && self.start_date.is_none_or(|start| start <= date)
                && self.end_date.is_none_or(|end| date <= end)
        } else {
            self.start_date == Some(date) && weekday_matches != Some(false)
        }
    }
}

/// Lifecycle state of an existing appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    #[default]
    Confirmed,
    Cancelled,
}

/// An existing appointment occupying the provider's time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub status: BookingStatus,
}

impl BookedInterval {
    pub fn confirmed(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            status: BookingStatus::Confirmed,
        }
    }

    /// Cancelled appointments stay on record but no longer hold the slot.
    pub fn blocks_time(&self) -> bool {
        self.status != BookingStatus::Cancelled
    }

    /// Half-open overlap test. Touching endpoints do not overlap.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.blocks_time() && start < self.end && end > self.start
    }
}

/// A bookable appointment window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}
