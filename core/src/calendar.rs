//! Calendar helpers: seeded timestamp draws and gap arithmetic.
//!
//! Days are drawn from 1..=28 so every (year, month) pair is valid.

use crate::{error::GenError, error::GenResult, rng::GenRng, types::Timestamp};
use chrono::{Duration, NaiveDate, Timelike};
use serde::{Deserialize, Serialize};

/// Inclusive span of calendar years.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub const fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }
}

/// Draw a timestamp uniformly by component: year, month, day 1-28,
/// hour, minute, second.
pub fn random_timestamp(rng: &mut GenRng, years: YearRange) -> GenResult<Timestamp> {
    let year = rng.range_inclusive(years.start as i64, years.end as i64) as i32;
    let month = rng.range_inclusive(1, 12) as u32;
    let day = rng.range_inclusive(1, 28) as u32;
    let hour = rng.range_inclusive(0, 23) as u32;
    let minute = rng.range_inclusive(0, 59) as u32;
    let second = rng.range_inclusive(0, 59) as u32;

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, second))
        .ok_or_else(|| GenError::invalid("years", format!("year {year} is not representable")))
}

/// Replace hour and minute, keeping date and second.
pub fn with_hour_minute(ts: Timestamp, hour: u32, minute: u32) -> Timestamp {
    ts.with_hour(hour)
        .and_then(|t| t.with_minute(minute))
        .unwrap_or(ts)
}

pub fn plus_days(ts: Timestamp, days: i64) -> Timestamp {
    ts + Duration::days(days)
}

pub fn minus_days(ts: Timestamp, days: i64) -> Timestamp {
    ts - Duration::days(days)
}

pub fn plus_hours(ts: Timestamp, hours: i64) -> Timestamp {
    ts + Duration::hours(hours)
}

/// Absolute distance between two timestamps in fractional hours.
pub fn hours_between(a: Timestamp, b: Timestamp) -> f64 {
    (b - a).num_seconds().abs() as f64 / 3600.0
}
