//! Engine configuration: reference zone, display locale, and window limits.
//!
//! Values come from explicit arguments or from `AVAILABILITY_*` environment
//! variables. The process bootstrap owns the config and passes it in; nothing here
//! is global.

use std::str::FromStr;

use chrono::Locale;
use chrono_tz::Tz;

use crate::error::{AvailabilityError, Result};

pub const DEFAULT_TIMEZONE: &str = "Europe/Amsterdam";
pub const DEFAULT_LOCALE: &str = "en_US";
pub const DEFAULT_MAX_WINDOW_DAYS: u32 = 730;

pub const ENV_TIMEZONE: &str = "AVAILABILITY_TIMEZONE";
pub const ENV_LOCALE: &str = "AVAILABILITY_LOCALE";
pub const ENV_MAX_WINDOW_DAYS: &str = "AVAILABILITY_MAX_WINDOW_DAYS";

#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Zone timed events are converted into before taking their civil date.
    pub reference_zone: Tz,
    /// Locale for `dayOfWeek` names.
    pub locale: Locale,
    /// Longest window the request boundary accepts, in days.
    pub max_window_days: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reference_zone: chrono_tz::Europe::Amsterdam,
            locale: Locale::en_US,
            max_window_days: DEFAULT_MAX_WINDOW_DAYS,
        }
    }
}

impl EngineConfig {
    /// Build a config from an IANA zone name and a POSIX locale name (`nl_NL`).
    ///
    /// # Errors
    /// Returns `InvalidTimezone` or `InvalidLocale` for unknown names.
    pub fn new(timezone: &str, locale: &str) -> Result<Self> {
        Ok(Self {
            reference_zone: parse_timezone(timezone)?,
            locale: parse_locale(locale)?,
            ..Self::default()
        })
    }

    pub fn with_max_window_days(mut self, days: u32) -> Self {
        self.max_window_days = days;
        self
    }

    /// Read configuration from the process environment, defaulting unset keys.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, defaulting keys it does not return.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let timezone = lookup(ENV_TIMEZONE).unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        let locale = lookup(ENV_LOCALE).unwrap_or_else(|| DEFAULT_LOCALE.to_string());
        let max_window_days = match lookup(ENV_MAX_WINDOW_DAYS) {
            Some(raw) => parse_max_window_days(&raw)?,
            None => DEFAULT_MAX_WINDOW_DAYS,
        };

        Ok(Self::new(&timezone, &locale)?.with_max_window_days(max_window_days))
    }
}

/// Parse an IANA zone identifier such as `Europe/Amsterdam`.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse()
        .map_err(|_| AvailabilityError::InvalidTimezone(name.to_string()))
}

/// Parse a locale name. `nl-NL` is accepted as well as `nl_NL`.
pub fn parse_locale(name: &str) -> Result<Locale> {
    Locale::from_str(&name.trim().replace('-', "_"))
        .map_err(|_| AvailabilityError::InvalidLocale(name.to_string()))
}

fn parse_max_window_days(raw: &str) -> Result<u32> {
    match raw.trim().parse::<u32>() {
        Ok(days) if days > 0 => Ok(days),
        _ => Err(AvailabilityError::Config(format!(
            "{} must be a positive integer, got '{}'",
            ENV_MAX_WINDOW_DAYS, raw
        ))),
    }
}
