//! Merge a provider's applicable rules into working intervals for one day.
//!
//! Selects the well-formed rules that apply on the date, sorts their ranges by
//! start, then merges overlapping or adjacent ranges.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::model::AvailabilityRule;

/// A half-open range of minutes since local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MinuteRange {
    pub start: u32,
    pub end: u32,
}

impl MinuteRange {
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Compute the merged, non-overlapping working intervals for `date`.
///
/// Malformed rules are skipped. Returns a sorted list, empty when no rule applies.
pub fn working_intervals(rules: &[AvailabilityRule], date: NaiveDate) -> Vec<MinuteRange> {
    let ranges: Vec<MinuteRange> = rules
        .iter()
        .filter(|rule| match rule.validate() {
            Ok(()) => true,
            Err(defect) => {
                warn!(%date, %defect, "skipping malformed availability rule");
                false
            }
        })
        .filter(|rule| rule.applies_on(date))
        .map(|rule| MinuteRange {
            start: rule.start_minute,
            end: rule.end_minute,
        })
        .collect();

    let merged = merge_ranges(ranges);
    debug!(%date, intervals = merged.len(), "merged working intervals");
    merged
}

/// Merge overlapping or adjacent ranges into a sorted, disjoint list.
pub fn merge_ranges(mut ranges: Vec<MinuteRange>) -> Vec<MinuteRange> {
    ranges.sort();

    let mut merged: Vec<MinuteRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        if let Some(last) = merged.last_mut() {
            if range.start <= last.end {
                last.end = last.end.max(range.end);
                continue;
            }
        }
        merged.push(range);
    }

    merged
}
