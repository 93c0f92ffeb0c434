//! Half-open time windows

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::error::{Result, SeatwiseError};

/// `start + minutes`, or `None` past the end of the calendar
pub fn checked_end(start: NaiveDateTime, minutes: u32) -> Option<NaiveDateTime> {
    start.checked_add_signed(Duration::minutes(i64::from(minutes)))
}

/// The interval `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Window of `minutes` from `start`, clamped at the last representable instant
    pub fn starting_at(start: NaiveDateTime, minutes: u32) -> Self {
        Self {
            start,
            end: checked_end(start, minutes).unwrap_or(NaiveDateTime::MAX),
        }
    }

    /// Like `starting_at`, but a window running off the calendar is a
    /// validation error on `field`
    pub fn try_starting_at(field: &str, start: NaiveDateTime, minutes: u32) -> Result<Self> {
        let end = checked_end(start, minutes).ok_or_else(|| {
            SeatwiseError::validation(
                field,
                format!("{} plus {} minutes is out of range", start, minutes),
            )
        })?;
        Ok(Self { start, end })
    }

    /// `s1 < e2 && e1 > s2`
    ///
    /// Back-to-back windows (one ends exactly when the other starts) do not
    /// overlap.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && self.end > other.start
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant < self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}
