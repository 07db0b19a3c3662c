//! Per-day availability over an inclusive date window.
//!
//! Events are folded into one occupied-day set (see [`crate::normalize`]), then the
//! window is walked one civil date at a time. Each day yields one record; a day is
//! available iff no event occupies it. The result never depends on wall-clock time.

use chrono::{Locale, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::day::{DateWindow, DayKey};
use crate::error::Result;
use crate::event::CalendarEvent;
use crate::normalize::{occupied_days_on, occupied_days_within};

/// Availability verdict for one day, serialized as `{date, available, dayOfWeek}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRecord {
    pub date: DayKey,
    pub available: bool,
    /// Weekday name in the configured display locale.
    pub day_of_week: String,
}

/// Compute availability for `[start_date, end_date]` from `YYYY-MM-DD` strings.
///
/// # Errors
/// Returns `AvailabilityError::InvalidWindow` if either date does not parse or
/// `end_date` is not after `start_date`. Malformed events never cause an error.
pub fn compute_availability(
    events: &[CalendarEvent],
    start_date: &str,
    end_date: &str,
    config: &EngineConfig,
) -> Result<Vec<AvailabilityRecord>> {
    let window = DateWindow::parse(start_date, end_date)?;
    Ok(availability_for_window(events, &window, config))
}

/// Compute availability for an already validated window.
///
/// Returns exactly one record per day of `window`, ascending, with no gaps.
pub fn availability_for_window(
    events: &[CalendarEvent],
    window: &DateWindow,
    config: &EngineConfig,
) -> Vec<AvailabilityRecord> {
    let occupied = occupied_days_within(events, window, &config.reference_zone);

    let records: Vec<AvailabilityRecord> = window
        .days()
        .map(|date| AvailabilityRecord {
            date,
            available: !occupied.contains(date),
            day_of_week: weekday_name(date, config.locale),
        })
        .collect();

    tracing::debug!(
        start = %window.start(),
        end = %window.end(),
        events = events.len(),
        occupied = occupied.len(),
        skipped = occupied.anomalies(),
        "computed availability"
    );

    records
}

/// Whether `day` is still free, for re-validating a single date before booking it.
pub fn is_date_available(events: &[CalendarEvent], day: DayKey, zone: &Tz) -> bool {
    let occupied = occupied_days_on(events, day, zone);
    tracing::debug!(
        %day,
        events = events.len(),
        skipped = occupied.anomalies(),
        "checked single date"
    );
    !occupied.contains(day)
}

/// Full weekday name of `day` in `locale`, e.g. `Tuesday` or `dinsdag`.
pub fn weekday_name(day: DayKey, locale: Locale) -> String {
    Utc.from_utc_datetime(&NaiveDateTime::new(day.date(), NaiveTime::MIN))
        .format_localized("%A", locale)
        .to_string()
}
