//! Wall-clock helpers. Every date and time in a trip is a local, zone-less
//! string, so everything here works on `chrono::Naive*` types.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::{CoreError, CoreResult};

pub fn parse_date(value: &str) -> CoreResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| CoreError::InvalidDate(value.to_string()))
}

/// Parses `HH:MM`, also accepting a trailing `:SS`.
pub fn parse_time(value: &str) -> CoreResult<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| CoreError::InvalidTime(value.to_string()))
}

/// Blank or unparseable times count as "no time".
pub fn parse_optional_time(value: Option<&str>) -> Option<NaiveTime> {
    value
        .filter(|v| !v.trim().is_empty())
        .and_then(|v| parse_time(v).ok())
}

pub fn minutes_since_midnight(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

pub fn parse_minutes(value: &str) -> CoreResult<u32> {
    parse_time(value).map(minutes_since_midnight)
}

/// Source of "now" for the today-context logic.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// The machine's local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
