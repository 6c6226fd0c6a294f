//! # chairside
//!
//! Deterministic free appointment window computation for clinic scheduling.
//!
//! Given a provider's availability rules and the appointments already on their
//! calendar, chairside computes the ordered list of bookable start times for an
//! appointment of a given length on a calendar day. It receives plain data and
//! never reaches into storage, so every computation is a pure function of its
//! inputs and the evaluation instant.
//!
//! ## Modules
//!
//! - [`model`] — availability rules, booked intervals, free windows
//! - [`working`] — merge applicable rules into working intervals
//! - [`calendar`] — provider-local time resolution and DST policies
//! - [`calculator`] — free windows for one day
//! - [`search`] — free windows across several days
//! - [`conflict`] — validate a directly requested appointment
//! - [`request`] — JSON request envelope for the front ends
//! - [`error`] — Error types

pub mod calculator;
pub mod calendar;
pub mod conflict;
pub mod error;
pub mod model;
pub mod request;
pub mod search;
pub mod working;

pub use calculator::{compute_free_windows, compute_free_windows_with_options, SlotOptions};
pub use calendar::DstPolicy;
pub use conflict::{check_booking, find_conflicts, BookingCheck, Conflict};
pub use error::SlotError;
pub use model::{AvailabilityRule, BookedInterval, BookingStatus, FreeWindow};
pub use request::FreeWindowRequest;
pub use search::{find_first_free_window, find_free_windows_across};
