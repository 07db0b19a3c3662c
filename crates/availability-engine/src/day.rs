//! Civil-date keys, inclusive date windows, and zone-aware date conversion.
//!
//! Every conversion from an instant to a calendar day goes through a `chrono-tz`
//! zone. Days are stepped as civil dates, never as instants plus 24 hours, so
//! DST transitions cannot skip or repeat a day.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{AvailabilityError, Result};

const DAY_FORMAT: &str = "%Y-%m-%d";

/// A calendar day with no time-of-day and no zone, rendered as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// The previous calendar day, or `None` at the start of the representable range.
    pub fn pred(&self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }

    /// The next calendar day, or `None` at the end of the representable range.
    pub fn succ(&self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_FORMAT))
    }
}

impl FromStr for DayKey {
    type Err = AvailabilityError;

    /// Accepts exactly `YYYY-MM-DD`. chrono alone would also take `2025-7-9` and
    /// signed years such as `-001-01-01`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if !is_day_shaped(s) {
            return Err(AvailabilityError::InvalidDate(s.to_string()));
        }
        NaiveDate::parse_from_str(s, DAY_FORMAT)
            .map(Self)
            .map_err(|_| AvailabilityError::InvalidDate(s.to_string()))
    }
}

/// Ten ASCII bytes: digits, with `-` at offsets 4 and 7.
fn is_day_shaped(s: &str) -> bool {
    s.len() == 10
        && s.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        })
}

impl TryFrom<String> for DayKey {
    type Error = AvailabilityError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DayKey> for String {
    fn from(day: DayKey) -> Self {
        day.to_string()
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

/// An inclusive `[start, end]` range of calendar days with `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: DayKey,
    end: DayKey,
}

impl DateWindow {
    /// Build a window from two days.
    ///
    /// # Errors
    /// Returns `AvailabilityError::InvalidWindow` unless `end` is strictly after `start`.
    pub fn new(start: DayKey, end: DayKey) -> Result<Self> {
        if end <= start {
            return Err(AvailabilityError::InvalidWindow(format!(
                "endDate {} must be after startDate {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse a window from two `YYYY-MM-DD` strings.
    ///
    /// Unparseable dates are reported as `InvalidWindow`, the same as an inverted range.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let start = start
            .parse::<DayKey>()
            .map_err(|e| AvailabilityError::InvalidWindow(format!("startDate: {}", e)))?;
        let end = end
            .parse::<DayKey>()
            .map_err(|e| AvailabilityError::InvalidWindow(format!("endDate: {}", e)))?;
        Self::new(start, end)
    }

    pub fn start(&self) -> DayKey {
        self.start
    }

    pub fn end(&self) -> DayKey {
        self.end
    }

    /// Number of days covered, both endpoints included.
    pub fn len_days(&self) -> i64 {
        self.end.0.signed_duration_since(self.start.0).num_days() + 1
    }

    /// Every day in the window in ascending order.
    pub fn days(&self) -> impl Iterator<Item = DayKey> {
        let end = self.end.0;
        self.start
            .0
            .iter_days()
            .take_while(move |d| *d <= end)
            .map(DayKey)
    }

    /// Instants bounding this window in `zone`: local midnight of the first day
    /// through local midnight after the last day (exclusive).
    pub fn fetch_bounds(&self, zone: &Tz) -> (DateTime<Utc>, DateTime<Utc>) {
        let after_end = self
            .end
            .0
            .checked_add_days(Days::new(1))
            .unwrap_or(self.end.0);
        (
            local_midnight(self.start.0, zone),
            local_midnight(after_end, zone),
        )
    }
}

/// The civil date `instant` falls on in `zone`.
pub fn civil_date_in(instant: DateTime<Utc>, zone: &Tz) -> DayKey {
    DayKey(instant.with_timezone(zone).date_naive())
}

/// Resolve a wall-clock time in `zone` to an instant.
///
/// Ambiguous times (DST fall-back) take the earlier offset. Times inside a DST gap
/// return `None`.
pub fn resolve_local(naive: NaiveDateTime, zone: &Tz) -> Option<DateTime<Utc>> {
    zone.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// First instant of `date` in `zone`.
///
/// A few zones have historically skipped midnight on DST change days; then the first
/// valid local time after midnight is used.
pub fn local_midnight(date: NaiveDate, zone: &Tz) -> DateTime<Utc> {
    let midnight = NaiveDateTime::new(date, NaiveTime::MIN);
    resolve_local(midnight, zone)
        .or_else(|| {
            (1..=96).find_map(|quarter| {
                resolve_local(midnight + Duration::minutes(15 * quarter), zone)
            })
        })
        .unwrap_or_else(|| zone.from_utc_datetime(&midnight).with_timezone(&Utc))
}
