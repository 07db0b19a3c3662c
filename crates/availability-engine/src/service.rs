//! Request boundary: validates query parameters, fetches events from the injected
//! source for the window, and runs the engine.
//!
//! Input problems map to a client error (400) and upstream failures to a server
//! error (500). Transport details are logged, not shown to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::availability::{availability_for_window, is_date_available, AvailabilityRecord};
use crate::config::EngineConfig;
use crate::day::{local_midnight, DateWindow, DayKey};
use crate::error::AvailabilityError;
use crate::event::CalendarEvent;
use crate::source::{EventSource, SourceError};

/// Query parameters of an availability request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl AvailabilityQuery {
    pub fn new(start_date: &str, end_date: &str) -> Self {
        Self {
            start_date: Some(start_date.to_string()),
            end_date: Some(end_date.to_string()),
        }
    }
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("startDate and endDate are required")]
    MissingParameters,

    #[error(transparent)]
    InvalidInput(#[from] AvailabilityError),

    #[error("Failed to fetch availability")]
    Upstream(#[source] SourceError),
}

/// JSON error body, `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ServiceError {
    /// HTTP status the boundary should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::MissingParameters | ServiceError::InvalidInput(_) => 400,
            ServiceError::Upstream(_) => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.to_string(),
        }
    }
}

/// Availability endpoint with its event source injected at construction.
#[derive(Debug, Clone)]
pub struct AvailabilityService<S> {
    source: S,
    config: EngineConfig,
}

impl<S: EventSource> AvailabilityService<S> {
    pub fn new(source: S, config: EngineConfig) -> Self {
        Self { source, config }
    }

    /// Answer an availability query for `[startDate, endDate]`.
    ///
    /// # Errors
    /// - `MissingParameters` if either date is absent or blank
    /// - `InvalidInput` if the window does not parse, is inverted, or exceeds
    ///   `max_window_days`
    /// - `Upstream` if the event source fails
    pub fn availability(
        &self,
        query: &AvailabilityQuery,
    ) -> Result<Vec<AvailabilityRecord>, ServiceError> {
        let (start, end) = match (non_blank(&query.start_date), non_blank(&query.end_date)) {
            (Some(start), Some(end)) => (start, end),
            _ => return Err(ServiceError::MissingParameters),
        };

        let window = DateWindow::parse(start, end)?;
        self.check_window_len(&window)?;

        let (time_min, time_max) = window.fetch_bounds(&self.config.reference_zone);
        let events = self.fetch(time_min, time_max)?;

        Ok(availability_for_window(&events, &window, &self.config))
    }

    /// Re-validate that `date` is still unoccupied, as the booking flow does before
    /// committing a new event.
    pub fn check_date(&self, date: &str) -> Result<bool, ServiceError> {
        let day: DayKey = date.parse()?;
        let zone = self.config.reference_zone;

        let time_min = local_midnight(day.date(), &zone);
        let time_max = local_midnight(day.succ().unwrap_or(day).date(), &zone);
        let events = self.fetch(time_min, time_max)?;

        Ok(is_date_available(&events, day, &zone))
    }

    fn check_window_len(&self, window: &DateWindow) -> Result<(), AvailabilityError> {
        let limit = i64::from(self.config.max_window_days);
        if window.len_days() > limit {
            return Err(AvailabilityError::InvalidWindow(format!(
                "window spans {} days, at most {} allowed",
                window.len_days(),
                limit
            )));
        }
        Ok(())
    }

    fn fetch(
        &self,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, ServiceError> {
        self.source
            .fetch_events(time_min, time_max)
            .map_err(|err| {
                tracing::error!(error = %err, %time_min, %time_max, "event source failed");
                ServiceError::Upstream(err)
            })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
