//! JSON request envelope shared by the CLI and WASM front ends.
//!
//! Mirrors what the API layer has at hand: the requested date as a string, the
//! appointment type's duration, and the provider's rules and bookings as
//! fetched from storage.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::calculator::{
    compute_free_windows_with_options, SlotOptions, DEFAULT_MAX_RESULTS,
    DEFAULT_SLOT_GRANULARITY_MINUTES,
};
use crate::calendar::{parse_date, parse_timezone, DstPolicy};
use crate::conflict::{check_booking, BookingCheck};
use crate::error::{Result, SlotError};
use crate::model::{AvailabilityRule, BookedInterval, FreeWindow};
use crate::search::find_free_windows_across;

/// A free-window query as received over JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeWindowRequest {
    /// Calendar day, `YYYY-MM-DD`, local to the provider.
    pub date: String,
    /// IANA timezone of the provider. UTC when absent.
    #[serde(default)]
    pub timezone: Option<String>,
    pub duration_minutes: i64,
    #[serde(default)]
    pub slot_granularity_minutes: Option<i64>,
    #[serde(default)]
    pub max_results: Option<usize>,
    #[serde(default)]
    pub dst_policy: DstPolicy,
    /// Pinned evaluation instant. Callers fall back to the wall clock.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
    /// Number of days to search starting at `date`. One when absent.
    #[serde(default)]
    pub days: Option<u32>,
    #[serde(default)]
    pub rules: Vec<AvailabilityRule>,
    #[serde(default)]
    pub booked: Vec<BookedInterval>,
}

impl FreeWindowRequest {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SlotError::InvalidRequest(e.to_string()))
    }

    /// Resolve the request's knobs, applying defaults.
    pub fn options(&self) -> Result<SlotOptions> {
        let timezone = match self.timezone.as_deref() {
            Some(name) => parse_timezone(name)?,
            None => chrono_tz::Tz::UTC,
        };
        let options = SlotOptions {
            duration_minutes: self.duration_minutes,
            slot_granularity_minutes: self
                .slot_granularity_minutes
                .unwrap_or(DEFAULT_SLOT_GRANULARITY_MINUTES),
            max_results: self.max_results.unwrap_or(DEFAULT_MAX_RESULTS),
            timezone,
            dst_policy: self.dst_policy,
        };
        options.validate()?;
        Ok(options)
    }

    /// Run the query. `fallback_now` is used when the request pins no instant.
    pub fn evaluate(&self, fallback_now: DateTime<Utc>) -> Result<Vec<FreeWindow>> {
        let date = parse_date(&self.date)?;
        let options = self.options()?;
        let now = self.now.unwrap_or(fallback_now);

        match self.days {
            Some(days) if days != 1 => {
                find_free_windows_across(date, days, &self.rules, &self.booked, &options, now)
            }
            _ => compute_free_windows_with_options(date, &self.rules, &self.booked, &options, now),
        }
    }

    /// Check a direct booking at `start` against the request's rules and bookings.
    pub fn check(&self, start: DateTime<Utc>) -> Result<BookingCheck> {
        let options = self.options()?;
        check_booking(start, &self.rules, &self.booked, &options)
    }
}
