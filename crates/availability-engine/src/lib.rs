//! # availability-engine
//!
//! Deterministic per-day booking availability computed from calendar busy periods.
//!
//! Calendar events (all-day or timed, recorded in any time zone) are folded into a
//! set of occupied civil dates in one fixed reference zone, then a requested date
//! window is walked day by day to produce an ordered availability verdict.
//!
//! ## Modules
//!
//! - [`day`] -- civil-date keys, inclusive windows, zone-aware date conversion
//! - [`event`] -- calendar event wire model (Google Calendar v3 shape)
//! - [`normalize`] -- event → set of occupied days, anomalies recovered locally
//! - [`availability`] -- occupied days + window → ordered per-day records
//! - [`config`] -- reference zone, display locale, window limits
//! - [`source`] -- upstream event source seam
//! - [`service`] -- request boundary wiring a source to the engine
//! - [`error`] -- Error types

pub mod availability;
pub mod config;
pub mod day;
pub mod error;
pub mod event;
pub mod normalize;
pub mod service;
pub mod source;

pub use availability::{
    availability_for_window, compute_availability, is_date_available, AvailabilityRecord,
};
pub use config::EngineConfig;
pub use day::{DateWindow, DayKey};
pub use error::AvailabilityError;
pub use event::{CalendarEvent, EventTime};
pub use normalize::{normalize_event, occupied_days, EventAnomaly, Normalized, OccupiedDays};
pub use service::{AvailabilityQuery, AvailabilityService, ErrorBody, ServiceError};
pub use source::{EventSource, JsonFileSource, SourceError, StaticSource};
