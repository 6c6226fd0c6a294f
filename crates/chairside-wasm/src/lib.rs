//! WASM bindings for chairside.
//!
//! Exposes free-window computation and booking conflict detection to the
//! Node.js API layer via `wasm-bindgen`. All complex types are passed as JSON
//! strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p chairside-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/chairside-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/chairside_wasm.wasm
//! ```

use chairside::{BookedInterval, FreeWindow, FreeWindowRequest};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FreeWindowDto {
    start: String,
    end: String,
}

impl From<&FreeWindow> for FreeWindowDto {
    fn from(w: &FreeWindow) -> Self {
        Self {
            start: w.start.to_rfc3339(),
            end: w.end.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConflictDto {
    start: String,
    end: String,
    overlap_minutes: i64,
}

/// A requested appointment passed from JavaScript.
#[derive(Deserialize)]
struct CandidateInput {
    start: String,
    end: String,
}

// ---------------------------------------------------------------------------
// Helper: parse an ISO 8601 string into a UTC DateTime
// ---------------------------------------------------------------------------

/// Parse an ISO 8601 datetime string into `DateTime<Utc>`.
///
/// Accepts both RFC 3339 (with offset, e.g., "2026-03-16T10:00:00+01:00")
/// and naive time (e.g., "2026-03-16T10:00:00"), which is interpreted as UTC.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| format!("Invalid datetime '{}': {}", s, e))
}

// ---------------------------------------------------------------------------
// JSON-in, JSON-out cores (plain Rust, testable off-wasm)
// ---------------------------------------------------------------------------

fn free_windows_json(request_json: &str, now: DateTime<Utc>) -> Result<String, String> {
    let request = FreeWindowRequest::from_json(request_json).map_err(|e| e.to_string())?;
    let windows = request.evaluate(now).map_err(|e| e.to_string())?;

    let dtos: Vec<FreeWindowDto> = windows.iter().map(FreeWindowDto::from).collect();
    serde_json::to_string(&dtos).map_err(|e| format!("Serialization error: {}", e))
}

fn conflicts_json(candidate_json: &str, booked_json: &str) -> Result<String, String> {
    let candidate: CandidateInput = serde_json::from_str(candidate_json)
        .map_err(|e| format!("Invalid candidate JSON: {}", e))?;
    let booked: Vec<BookedInterval> = serde_json::from_str(booked_json)
        .map_err(|e| format!("Invalid booked JSON: {}", e))?;
    let start = parse_datetime(&candidate.start)?;
    let end = parse_datetime(&candidate.end)?;

    let dtos: Vec<ConflictDto> = chairside::find_conflicts(start, end, &booked)
        .iter()
        .map(|c| ConflictDto {
            start: c.booking.start.to_rfc3339(),
            end: c.booking.end.to_rfc3339(),
            overlap_minutes: c.overlap_minutes,
        })
        .collect();
    serde_json::to_string(&dtos).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Compute free appointment windows for a JSON request.
///
/// `request_json` follows the `FreeWindowRequest` shape (`date`,
/// `durationMinutes`, `rules`, `booked`, and optional knobs). When the request
/// pins no `now`, `now_iso` is used. Returns a JSON array of `{start, end}`
/// objects with RFC 3339 datetime strings.
#[wasm_bindgen(js_name = "computeFreeWindows")]
pub fn compute_free_windows(request_json: &str, now_iso: &str) -> Result<String, JsValue> {
    let now = parse_datetime(now_iso).map_err(|e| JsValue::from_str(&e))?;
    free_windows_json(request_json, now).map_err(|e| JsValue::from_str(&e))
}

/// Find every booking that overlaps a requested appointment.
///
/// `candidate_json` is a `{start, end}` object; `booked_json` is an array of
/// `{start, end, status?}` bookings. Returns a JSON array of
/// `{start, end, overlapMinutes}` objects, one per conflicting booking.
#[wasm_bindgen(js_name = "findConflicts")]
pub fn find_conflicts(candidate_json: &str, booked_json: &str) -> Result<String, JsValue> {
    conflicts_json(candidate_json, booked_json).map_err(|e| JsValue::from_str(&e))
}
