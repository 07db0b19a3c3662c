//! WASM bindings for availability-engine.
//!
//! Exposes per-day availability and single-date checks to JavaScript via
//! `wasm-bindgen`. Events cross the boundary as the JSON a Google Calendar
//! `events.list` call returns (bare array or `{"items": [...]}`), and results are
//! returned as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p availability-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/availability-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/availability_engine_wasm.wasm
//! ```

use availability_engine::config::parse_timezone;
use availability_engine::event::parse_event_list;
use availability_engine::{
    compute_availability as compute, is_date_available as date_available, CalendarEvent,
    DayKey, EngineConfig,
};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Plain-Rust cores (testable off-wasm; JsValue only exists on wasm32)
// ---------------------------------------------------------------------------

fn parse_events(json: &str) -> Result<Vec<CalendarEvent>, String> {
    parse_event_list(json).map_err(|e| format!("Invalid events JSON: {}", e))
}

fn compute_json(
    events_json: &str,
    start_date: &str,
    end_date: &str,
    timezone: &str,
    locale: &str,
) -> Result<String, String> {
    let config = EngineConfig::new(timezone, locale).map_err(|e| e.to_string())?;
    let events = parse_events(events_json)?;
    let records =
        compute(&events, start_date, end_date, &config).map_err(|e| e.to_string())?;
    serde_json::to_string(&records).map_err(|e| format!("Serialization error: {}", e))
}

fn check_date(events_json: &str, date: &str, timezone: &str) -> Result<bool, String> {
    let zone = parse_timezone(timezone).map_err(|e| e.to_string())?;
    let day = date.parse::<DayKey>().map_err(|e| e.to_string())?;
    let events = parse_events(events_json)?;
    Ok(date_available(&events, day, &zone))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Compute availability for every day in `[startDate, endDate]`.
///
/// Returns a JSON string containing an array of `{date, available, dayOfWeek}`
/// objects in ascending date order.
///
/// # Arguments
/// - `events_json` -- JSON array of calendar events, or an `events.list` body
/// - `start_date` / `end_date` -- `YYYY-MM-DD`, end strictly after start
/// - `timezone` -- IANA reference zone (e.g., "Europe/Amsterdam")
/// - `locale` -- Locale for weekday names (e.g., "en_US", "nl_NL")
#[wasm_bindgen(js_name = "computeAvailability")]
pub fn compute_availability(
    events_json: &str,
    start_date: &str,
    end_date: &str,
    timezone: &str,
    locale: &str,
) -> Result<String, JsValue> {
    compute_json(events_json, start_date, end_date, timezone, locale)
        .map_err(|e| JsValue::from_str(&e))
}

/// Whether `date` is still free, for re-validating a booking request.
#[wasm_bindgen(js_name = "isDateAvailable")]
pub fn is_date_available(events_json: &str, date: &str, timezone: &str) -> Result<bool, JsValue> {
    check_date(events_json, date, timezone).map_err(|e| JsValue::from_str(&e))
}
