//! Upstream event sources.
//!
//! The engine never talks to a calendar service itself. Whatever supplies events
//! implements [`EventSource`] and is handed to the service by the process bootstrap.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::event::{parse_event_list, CalendarEvent};

/// Failure of the upstream collaborator. Propagated unchanged, never retried here.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Authorization error: {0}")]
    Auth(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed event payload: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Supplies the events overlapping `[time_min, time_max)`.
///
/// Implementations may return extra events outside the range and in any order;
/// the engine filters and deduplicates on its own.
pub trait EventSource {
    fn fetch_events(
        &self,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, SourceError>;
}

impl<S: EventSource + ?Sized> EventSource for &S {
    fn fetch_events(
        &self,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, SourceError> {
        (**self).fetch_events(time_min, time_max)
    }
}

impl<S: EventSource + ?Sized> EventSource for Box<S> {
    fn fetch_events(
        &self,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, SourceError> {
        (**self).fetch_events(time_min, time_max)
    }
}

/// A fixed, already materialized event list.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    events: Vec<CalendarEvent>,
}

impl StaticSource {
    pub fn new(events: Vec<CalendarEvent>) -> Self {
        Self { events }
    }
}

impl EventSource for StaticSource {
    fn fetch_events(
        &self,
        _time_min: DateTime<Utc>,
        _time_max: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, SourceError> {
        Ok(self.events.clone())
    }
}

/// Events read from a JSON export on disk: a bare array, or a Google Calendar
/// `events.list` body with an `items` array. The file is re-read on every fetch.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EventSource for JsonFileSource {
    fn fetch_events(
        &self,
        _time_min: DateTime<Utc>,
        _time_max: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, SourceError> {
        let json = std::fs::read_to_string(&self.path)?;
        Ok(parse_event_list(&json)?)
    }
}
