//! Calendar event wire model.
//!
//! Mirrors the Google Calendar v3 `Event` resource closely enough to deserialize an
//! `events.list` response directly. List items are decoded one at a time and date
//! and time fields stay as raw strings, so a single malformed event never fails the
//! whole list; interpretation happens in [`crate::normalize`].

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A calendar event as delivered by the upstream source. Read-only input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// Display label, informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<EventTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<EventTime>,
}

/// One boundary of an event: either a civil `date` (all-day) or a `dateTime`
/// instant with an optional `timeZone`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    /// `YYYY-MM-DD`, set for all-day events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// RFC 3339 timestamp, or a bare local `YYYY-MM-DDTHH:MM:SS` read in `time_zone`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    /// IANA zone the event was recorded in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventTime {
    pub fn date(date: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
            ..Self::default()
        }
    }

    pub fn date_time(date_time: impl Into<String>, time_zone: Option<&str>) -> Self {
        Self {
            date_time: Some(date_time.into()),
            time_zone: time_zone.map(str::to_string),
            ..Self::default()
        }
    }
}

impl CalendarEvent {
    /// An all-day event; `end` is exclusive, as calendar sources record it.
    pub fn all_day(summary: &str, start: &str, end_exclusive: &str) -> Self {
        Self {
            summary: Some(summary.to_string()),
            start: Some(EventTime::date(start)),
            end: Some(EventTime::date(end_exclusive)),
        }
    }

    /// A timed event with both boundaries recorded in `time_zone`.
    pub fn timed(summary: &str, start: &str, end: &str, time_zone: Option<&str>) -> Self {
        Self {
            summary: Some(summary.to_string()),
            start: Some(EventTime::date_time(start, time_zone)),
            end: Some(EventTime::date_time(end, time_zone)),
        }
    }

    /// Label for diagnostics.
    pub fn label(&self) -> &str {
        self.summary.as_deref().unwrap_or("(untitled)")
    }
}

/// Parse an event list from JSON, accepting either a bare array or a Google
/// Calendar `events.list` body with an `items` array.
///
/// Items are decoded one by one. An item that does not have the event shape (a
/// `null`, a number where a string belongs, a bare string for `start`) is logged
/// and skipped; only a payload that is not a list at all is an error.
pub fn parse_event_list(json: &str) -> serde_json::Result<Vec<CalendarEvent>> {
    let items = match serde_json::from_str::<Value>(json)? {
        Value::Array(items) => items,
        Value::Object(mut body) => match body.remove("items") {
            Some(Value::Array(items)) => items,
            None | Some(Value::Null) => Vec::new(),
            Some(_) => return Err(serde_json::Error::custom("`items` must be an array")),
        },
        _ => {
            return Err(serde_json::Error::custom(
                "expected an array of events or an object with `items`",
            ))
        }
    };

    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<CalendarEvent>(item) {
            Ok(event) => Some(event),
            Err(err) => {
                tracing::warn!(index, error = %err, "skipping malformed calendar event");
                None
            }
        })
        .collect())
}
