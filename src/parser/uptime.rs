//! Uptime value parsing and time-unit conversions.
//!
//! top prints uptime in one of several composites depending on how long the
//! host has been running: `H:MM` within the first day, `N min(s)` within the
//! first hour, and either of those prefixed by `N day(s),` afterwards. Each
//! encoding gets its own anchored pattern instead of one omnibus regex.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ParseError;

/// One of the textual uptime encodings top emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UptimeValue {
    /// `H:MM`
    HoursMinutes { hours: u64, minutes: u64 },
    /// `N day(s), H:MM`
    DaysHoursMinutes { days: u64, hours: u64, minutes: u64 },
    /// `N min(s)`
    Minutes { minutes: u64 },
    /// `N day(s), N min(s)`
    DaysMinutes { days: u64, minutes: u64 },
}

static DAYS_HOURS_MINUTES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\s+days?,\s+(\d+):(\d+)$").unwrap());
static HOURS_MINUTES: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+):(\d+)$").unwrap());
static DAYS_MINUTES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\s+days?,\s+(\d+)\s+mins?$").unwrap());
static MINUTES: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\s+mins?$").unwrap());

impl UptimeValue {
    /// Matches the trimmed uptime text against the known encodings.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let text = input.trim();
        let number = |m: &str| {
            m.parse::<u64>()
                .map_err(|_| ParseError::Uptime(input.to_string()))
        };

        if let Some(caps) = DAYS_HOURS_MINUTES.captures(text) {
            return Ok(UptimeValue::DaysHoursMinutes {
                days: number(&caps[1])?,
                hours: number(&caps[2])?,
                minutes: number(&caps[3])?,
            });
        }
        if let Some(caps) = HOURS_MINUTES.captures(text) {
            return Ok(UptimeValue::HoursMinutes {
                hours: number(&caps[1])?,
                minutes: number(&caps[2])?,
            });
        }
        if let Some(caps) = DAYS_MINUTES.captures(text) {
            return Ok(UptimeValue::DaysMinutes {
                days: number(&caps[1])?,
                minutes: number(&caps[2])?,
            });
        }
        if let Some(caps) = MINUTES.captures(text) {
            return Ok(UptimeValue::Minutes {
                minutes: number(&caps[1])?,
            });
        }

        Err(ParseError::Uptime(input.to_string()))
    }

    /// Normalizes the composite to total seconds.
    pub fn as_seconds(self) -> u64 {
        match self {
            UptimeValue::HoursMinutes { hours, minutes } => {
                seconds_from_hours(hours) + seconds_from_minutes(minutes)
            }
            UptimeValue::DaysHoursMinutes {
                days,
                hours,
                minutes,
            } => {
                seconds_from_days(days) + seconds_from_hours(hours) + seconds_from_minutes(minutes)
            }
            UptimeValue::Minutes { minutes } => seconds_from_minutes(minutes),
            UptimeValue::DaysMinutes { days, minutes } => {
                seconds_from_days(days) + seconds_from_minutes(minutes)
            }
        }
    }
}

/// Parses a textual uptime composite straight to seconds.
pub fn parse_uptime_seconds(input: &str) -> Result<u64, ParseError> {
    UptimeValue::parse(input).map(UptimeValue::as_seconds)
}

pub fn seconds_from_days(days: u64) -> u64 {
    seconds_from_hours(days * 24)
}

pub fn seconds_from_hours(hours: u64) -> u64 {
    seconds_from_minutes(hours * 60)
}

pub fn seconds_from_minutes(minutes: u64) -> u64 {
    minutes * 60
}
