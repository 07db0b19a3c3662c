//! Tests for the request boundary: parameter validation, fetch bounds handed to
//! the event source, and error classification.

use std::cell::RefCell;

use availability_engine::{
    AvailabilityQuery, AvailabilityService, CalendarEvent, EngineConfig, EventSource,
    ServiceError, SourceError, StaticSource,
};
use chrono::{DateTime, Utc};

/// Records every fetch and returns a canned result.
struct RecordingSource {
    events: Vec<CalendarEvent>,
    fail: bool,
    calls: RefCell<Vec<(DateTime<Utc>, DateTime<Utc>)>>,
}

impl RecordingSource {
    fn new(events: Vec<CalendarEvent>) -> Self {
        Self {
            events,
            fail: false,
            calls: RefCell::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }
}

impl EventSource for RecordingSource {
    fn fetch_events(
        &self,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, SourceError> {
        self.calls.borrow_mut().push((time_min, time_max));
        if self.fail {
            return Err(SourceError::Auth("refresh token revoked".to_string()));
        }
        Ok(self.events.clone())
    }
}

fn scenario_events() -> Vec<CalendarEvent> {
    vec![
        CalendarEvent::all_day("Guests", "2025-07-09", "2025-07-12"),
        CalendarEvent::timed(
            "Cleaning",
            "2025-07-15T10:00:00",
            "2025-07-15T11:00:00",
            Some("Europe/Amsterdam"),
        ),
    ]
}

#[test]
fn availability_answers_query() {
    let service = AvailabilityService::new(
        StaticSource::new(scenario_events()),
        EngineConfig::default(),
    );

    let records = service
        .availability(&AvailabilityQuery::new("2025-07-08", "2025-07-16"))
        .unwrap();

    assert_eq!(records.len(), 9);
    let blocked: Vec<String> = records
        .iter()
        .filter(|r| !r.available)
        .map(|r| r.date.to_string())
        .collect();
    assert_eq!(
        blocked,
        vec!["2025-07-09", "2025-07-10", "2025-07-11", "2025-07-15"]
    );
}

#[test]
fn availability_serializes_as_json_array() {
    let service = AvailabilityService::new(StaticSource::default(), EngineConfig::default());
    let records = service
        .availability(&AvailabilityQuery::new("2025-07-14", "2025-07-15"))
        .unwrap();

    let json = serde_json::to_value(&records).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {"date": "2025-07-14", "available": true, "dayOfWeek": "Monday"},
            {"date": "2025-07-15", "available": true, "dayOfWeek": "Tuesday"}
        ])
    );
}

#[test]
fn fetch_bounds_cover_window_in_reference_zone() {
    let source = RecordingSource::new(Vec::new());
    let service = AvailabilityService::new(&source, EngineConfig::default());

    service
        .availability(&AvailabilityQuery::new("2025-07-08", "2025-07-16"))
        .unwrap();

    let calls = source.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0.to_rfc3339(), "2025-07-07T22:00:00+00:00");
    assert_eq!(calls[0].1.to_rfc3339(), "2025-07-16T22:00:00+00:00");
}

#[test]
fn missing_parameters_are_client_errors() {
    let source = RecordingSource::new(Vec::new());
    let service = AvailabilityService::new(&source, EngineConfig::default());

    let queries = [
        AvailabilityQuery::default(),
        AvailabilityQuery {
            start_date: Some("2025-07-08".to_string()),
            end_date: None,
        },
        AvailabilityQuery::new("2025-07-08", "   "),
    ];
    for query in &queries {
        let err = service.availability(query).unwrap_err();
        assert!(matches!(err, ServiceError::MissingParameters));
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.body().error, "startDate and endDate are required");
    }
    assert!(source.calls.borrow().is_empty(), "no fetch on invalid input");
}

#[test]
fn invalid_window_is_a_client_error_without_fetching() {
    let source = RecordingSource::new(Vec::new());
    let service = AvailabilityService::new(&source, EngineConfig::default());

    let err = service
        .availability(&AvailabilityQuery::new("2025-07-15", "2025-07-10"))
        .unwrap_err();

    assert!(matches!(err, ServiceError::InvalidInput(_)));
    assert!(err.is_client_error());
    assert!(source.calls.borrow().is_empty());
}

#[test]
fn oversized_window_is_rejected() {
    let config = EngineConfig::default().with_max_window_days(31);
    let service = AvailabilityService::new(StaticSource::default(), config);

    assert!(service
        .availability(&AvailabilityQuery::new("2025-07-01", "2025-07-31"))
        .is_ok());
    let err = service
        .availability(&AvailabilityQuery::new("2025-07-01", "2025-08-01"))
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
}

#[test]
fn upstream_failure_is_a_server_error_with_generic_message() {
    let service = AvailabilityService::new(RecordingSource::failing(), EngineConfig::default());

    let err = service
        .availability(&AvailabilityQuery::new("2025-07-08", "2025-07-16"))
        .unwrap_err();

    assert!(matches!(err, ServiceError::Upstream(SourceError::Auth(_))));
    assert_eq!(err.status_code(), 500);
    assert_eq!(err.body().error, "Failed to fetch availability");
}

#[test]
fn check_date_revalidates_single_day() {
    let source = RecordingSource::new(scenario_events());
    let service = AvailabilityService::new(&source, EngineConfig::default());

    assert!(!service.check_date("2025-07-10").unwrap());
    assert!(service.check_date("2025-07-12").unwrap());
    assert!(!service.check_date("2025-07-15").unwrap());

    let calls = source.calls.borrow();
    assert_eq!(calls[0].0.to_rfc3339(), "2025-07-09T22:00:00+00:00");
    assert_eq!(calls[0].1.to_rfc3339(), "2025-07-10T22:00:00+00:00");
}

#[test]
fn check_date_rejects_bad_date() {
    let service = AvailabilityService::new(StaticSource::default(), EngineConfig::default());
    let err = service.check_date("10-07-2025").unwrap_err();
    assert_eq!(err.status_code(), 400);
}

#[test]
fn query_deserializes_from_camel_case() {
    let query: AvailabilityQuery =
        serde_json::from_str(r#"{"startDate": "2025-07-08", "endDate": "2025-07-16"}"#).unwrap();
    assert_eq!(query, AvailabilityQuery::new("2025-07-08", "2025-07-16"));
}
