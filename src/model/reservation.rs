use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;

use crate::availability::{checked_end, TimeWindow};
use crate::codec::{Record, Row};
use crate::config::DEFAULT_DURATION_MINUTES;
use crate::error::{Result, SeatwiseError};

/// Reservation lifecycle state
///
/// ```text
///              ┌──► CANCELLED
/// CONFIRMED ───┼──► COMPLETED
///              └──► NO_SHOW
/// ```
///
/// Only `Confirmed` occupies a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Confirmed,
    Completed,
    NoShow,
    Cancelled,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 4] = [
        ReservationStatus::Confirmed,
        ReservationStatus::Completed,
        ReservationStatus::NoShow,
        ReservationStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "CONFIRMED",
            Self::Completed => "COMPLETED",
            Self::NoShow => "NO_SHOW",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Whether a reservation in this state holds its table
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Confirmed)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    /// Whether `self → next` is a defined transition
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        matches!(self, Self::Confirmed) && next.is_terminal()
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = SeatwiseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CONFIRMED" => Ok(Self::Confirmed),
            "COMPLETED" => Ok(Self::Completed),
            "NO_SHOW" => Ok(Self::NoShow),
            "CANCELLED" => Ok(Self::Cancelled),
            other => Err(SeatwiseError::validation(
                "status",
                format!("unknown reservation status '{}'", other),
            )),
        }
    }
}

/// A booking of one table for one party over a time window
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reservation {
    pub id: Option<u64>,
    pub customer_id: u64,
    pub restaurant_id: u64,
    pub table_id: u64,
    pub party_size: u32,
    /// Start of the booking (local time)
    pub reservation_datetime: NaiveDateTime,
    /// Length of the occupancy window
    pub duration_minutes: u32,
    pub status: ReservationStatus,
    pub special_requests: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Reservation {
    /// A fresh CONFIRMED reservation with the default duration
    pub fn new(
        customer_id: u64,
        restaurant_id: u64,
        table_id: u64,
        party_size: u32,
        reservation_datetime: NaiveDateTime,
    ) -> Self {
        let now = super::now();
        Self {
            id: None,
            customer_id,
            restaurant_id,
            table_id,
            party_size,
            reservation_datetime,
            duration_minutes: DEFAULT_DURATION_MINUTES,
            status: ReservationStatus::Confirmed,
            special_requests: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = minutes;
        self
    }

    pub fn with_special_requests(mut self, requests: Option<String>) -> Self {
        self.special_requests = super::non_empty(requests);
        self
    }

    /// End of the occupancy window, clamped at the last representable instant
    pub fn ends_at(&self) -> NaiveDateTime {
        checked_end(self.reservation_datetime, self.duration_minutes)
            .unwrap_or(NaiveDateTime::MAX)
    }

    /// Occupied interval `[start, start + duration)`
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.reservation_datetime, self.ends_at())
    }

    pub fn date(&self) -> NaiveDate {
        self.reservation_datetime.date()
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

impl Record for Reservation {
    const ENTITY: &'static str = "Reservation";
    const COLUMNS: &'static [&'static str] = &[
        "reservation_id",
        "customer_id",
        "restaurant_id",
        "table_id",
        "party_size",
        "reservation_datetime",
        "status",
        "special_requests",
        "created_at",
        "updated_at",
        "duration_minutes",
    ];

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }

    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("customer_id", self.customer_id),
            ("restaurant_id", self.restaurant_id),
            ("table_id", self.table_id),
        ] {
            if value == 0 {
                return Err(SeatwiseError::validation(field, "is required"));
            }
        }
        if self.party_size == 0 {
            return Err(SeatwiseError::validation("party_size", "must be positive"));
        }
        if self.duration_minutes == 0 {
            return Err(SeatwiseError::validation("duration_minutes", "must be positive"));
        }
        // Stored at second precision
        if self.reservation_datetime.nanosecond() != 0 {
            return Err(SeatwiseError::validation(
                "reservation_datetime",
                "must be a whole second",
            ));
        }
        if checked_end(self.reservation_datetime, self.duration_minutes).is_none() {
            return Err(SeatwiseError::validation(
                "reservation_datetime",
                "window ends out of range",
            ));
        }
        if self.updated_at < self.created_at {
            return Err(SeatwiseError::validation(
                "updated_at",
                "must not precede created_at",
            ));
        }
        Ok(())
    }

    fn to_row(&self) -> Row {
        Row::new()
            .with_id("reservation_id", self.id)
            .with("customer_id", self.customer_id.to_string())
            .with("restaurant_id", self.restaurant_id.to_string())
            .with("table_id", self.table_id.to_string())
            .with("party_size", self.party_size.to_string())
            .with_timestamp("reservation_datetime", &self.reservation_datetime)
            .with("status", self.status.as_str())
            .with_optional("special_requests", self.special_requests.as_deref())
            .with_timestamp("created_at", &self.created_at)
            .with_timestamp("updated_at", &self.updated_at)
            .with("duration_minutes", self.duration_minutes.to_string())
    }

    fn from_row(row: &Row) -> Result<Self> {
        let reservation_datetime = row.timestamp("reservation_datetime")?;
        let created_at = row
            .optional_timestamp("created_at")?
            .unwrap_or(reservation_datetime);
        let updated_at = row.optional_timestamp("updated_at")?.unwrap_or(created_at);

        let reservation = Self {
            id: row.optional_id("reservation_id")?,
            customer_id: row.id("customer_id")?,
            restaurant_id: row.id("restaurant_id")?,
            table_id: row.id("table_id")?,
            party_size: row.parse("party_size")?,
            reservation_datetime,
            // Files written before durations were stored lack the column
            duration_minutes: row
                .optional_parse("duration_minutes")?
                .unwrap_or(DEFAULT_DURATION_MINUTES),
            status: row.required("status")?.parse()?,
            special_requests: row.optional("special_requests"),
            created_at,
            updated_at,
        };
        reservation.validate()?;
        Ok(reservation)
    }
}
