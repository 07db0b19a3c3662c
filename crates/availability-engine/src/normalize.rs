//! Event normalization: one calendar event → the set of days it occupies.
//!
//! All-day events carry an exclusive end date, so an event recorded as
//! `2025-07-09 .. 2025-07-12` occupies the 9th, 10th and 11th. Timed events occupy
//! only the civil date of their start instant in the reference zone; the end instant
//! is ignored.
//!
//! Malformed events never fail a computation. They normalize to
//! [`Normalized::Anomaly`], are logged, and contribute nothing.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use thiserror::Error;

use crate::day::{civil_date_in, resolve_local, DateWindow, DayKey};
use crate::event::{CalendarEvent, EventTime};

/// Why an event was excluded from the occupied set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventAnomaly {
    #[error("event has no start")]
    MissingStart,

    #[error("event has no end")]
    MissingEnd,

    #[error("start and end mix all-day and timed forms")]
    MixedKinds,

    #[error("invalid date '{0}'")]
    InvalidDate(String),

    #[error("invalid dateTime '{0}'")]
    InvalidDateTime(String),

    #[error("unknown time zone '{0}'")]
    UnknownTimeZone(String),

    #[error("local time '{0}' does not exist in {1}")]
    NonexistentLocalTime(String, String),
}

/// Outcome of normalizing a single event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    Occupied(BTreeSet<DayKey>),
    Anomaly(EventAnomaly),
}

/// Inclusive run of occupied days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DaySpan {
    first: DayKey,
    last: DayKey,
}

impl DaySpan {
    fn single(day: DayKey) -> Self {
        Self {
            first: day,
            last: day,
        }
    }

    fn of_window(window: &DateWindow) -> Self {
        Self {
            first: window.start(),
            last: window.end(),
        }
    }

    fn clip(self, bounds: DaySpan) -> Option<Self> {
        let first = self.first.max(bounds.first);
        let last = self.last.min(bounds.last);
        (first <= last).then_some(Self { first, last })
    }

    fn days(self) -> impl Iterator<Item = DayKey> {
        let last = self.last.date();
        self.first
            .date()
            .iter_days()
            .take_while(move |d| *d <= last)
            .map(DayKey::new)
    }
}

enum Boundary<'a> {
    AllDay(&'a str),
    Timed(&'a EventTime, &'a str),
}

impl<'a> Boundary<'a> {
    /// `dateTime` wins when both forms are present, as in the Google API.
    fn of(time: &'a EventTime) -> Option<Self> {
        match (time.date_time.as_deref(), time.date.as_deref()) {
            (Some(dt), _) => Some(Boundary::Timed(time, dt)),
            (None, Some(d)) => Some(Boundary::AllDay(d)),
            (None, None) => None,
        }
    }
}

/// Normalize one event into the days it occupies, interpreting timed events in `zone`.
pub fn normalize_event(event: &CalendarEvent, zone: &Tz) -> Normalized {
    match occupied_span(event, zone) {
        Ok(Some(span)) => Normalized::Occupied(span.days().collect()),
        Ok(None) => Normalized::Occupied(BTreeSet::new()),
        Err(anomaly) => Normalized::Anomaly(anomaly),
    }
}

fn occupied_span(event: &CalendarEvent, zone: &Tz) -> Result<Option<DaySpan>, EventAnomaly> {
    let start = event
        .start
        .as_ref()
        .and_then(Boundary::of)
        .ok_or(EventAnomaly::MissingStart)?;
    let end = event
        .end
        .as_ref()
        .and_then(Boundary::of)
        .ok_or(EventAnomaly::MissingEnd)?;

    match (start, end) {
        (Boundary::AllDay(start), Boundary::AllDay(end)) => all_day_span(start, end),
        (Boundary::Timed(time, raw), Boundary::Timed(..)) => {
            timed_start_day(time, raw, zone).map(|day| Some(DaySpan::single(day)))
        }
        _ => Err(EventAnomaly::MixedKinds),
    }
}

fn all_day_span(start: &str, end_exclusive: &str) -> Result<Option<DaySpan>, EventAnomaly> {
    let first: DayKey = start
        .parse()
        .map_err(|_| EventAnomaly::InvalidDate(start.to_string()))?;
    let end: DayKey = end_exclusive
        .parse()
        .map_err(|_| EventAnomaly::InvalidDate(end_exclusive.to_string()))?;

    // Zero-length and inverted spans occupy nothing.
    Ok(end
        .pred()
        .filter(|last| *last >= first)
        .map(|last| DaySpan { first, last }))
}

/// Civil date of a timed boundary in the reference zone.
///
/// An RFC 3339 value carries its own offset. A bare wall-clock value is read in
/// the event's `timeZone`, falling back to the reference zone.
fn timed_start_day(time: &EventTime, raw: &str, zone: &Tz) -> Result<DayKey, EventAnomaly> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(civil_date_in(instant.with_timezone(&Utc), zone));
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .map_err(|_| EventAnomaly::InvalidDateTime(raw.to_string()))?;

    let event_zone: Tz = match time.time_zone.as_deref() {
        Some(name) => name
            .parse()
            .map_err(|_| EventAnomaly::UnknownTimeZone(name.to_string()))?,
        None => *zone,
    };

    let instant = resolve_local(naive, &event_zone).ok_or_else(|| {
        EventAnomaly::NonexistentLocalTime(raw.to_string(), event_zone.name().to_string())
    })?;
    Ok(civil_date_in(instant, zone))
}

/// Union of the days occupied by a list of events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccupiedDays {
    days: BTreeSet<DayKey>,
    anomalies: usize,
}

impl OccupiedDays {
    pub fn contains(&self, day: DayKey) -> bool {
        self.days.contains(&day)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = DayKey> + '_ {
        self.days.iter().copied()
    }

    /// Number of events skipped as malformed.
    pub fn anomalies(&self) -> usize {
        self.anomalies
    }

    fn fold<'a>(
        events: impl IntoIterator<Item = &'a CalendarEvent>,
        zone: &Tz,
        bounds: Option<DaySpan>,
    ) -> Self {
        let mut occupied = Self::default();
        for event in events {
            match occupied_span(event, zone) {
                Ok(Some(span)) => {
                    let span = match bounds {
                        Some(bounds) => span.clip(bounds),
                        None => Some(span),
                    };
                    occupied.days.extend(span.into_iter().flat_map(DaySpan::days));
                }
                Ok(None) => {
                    tracing::debug!(event = event.label(), "all-day event spans zero days");
                }
                Err(anomaly) => {
                    tracing::warn!(
                        event = event.label(),
                        %anomaly,
                        "skipping malformed calendar event"
                    );
                    occupied.anomalies += 1;
                }
            }
        }
        occupied
    }
}

/// Normalize every event and union the results. Input order is irrelevant.
pub fn occupied_days(events: &[CalendarEvent], zone: &Tz) -> OccupiedDays {
    OccupiedDays::fold(events, zone, None)
}

/// Like [`occupied_days`], keeping only days inside `window`. Long all-day spans are
/// clipped before expansion so work stays proportional to the window.
pub fn occupied_days_within(
    events: &[CalendarEvent],
    window: &DateWindow,
    zone: &Tz,
) -> OccupiedDays {
    OccupiedDays::fold(events, zone, Some(DaySpan::of_window(window)))
}

/// Like [`occupied_days`], keeping only `day`. Malformed events are logged and
/// counted the same way as for a window.
pub fn occupied_days_on(events: &[CalendarEvent], day: DayKey, zone: &Tz) -> OccupiedDays {
    OccupiedDays::fold(events, zone, Some(DaySpan::single(day)))
}
