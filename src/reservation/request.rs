//! Inputs to the reservation service

use chrono::NaiveDateTime;

use crate::availability::TimeWindow;
use crate::error::{Result, SeatwiseError};
use crate::model::whole_seconds;

/// A booking request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationRequest {
    pub customer_id: u64,
    pub restaurant_id: u64,
    /// Required by `create`; ignored by `create_with_auto_assignment`
    pub table_id: Option<u64>,
    pub party_size: u32,
    pub starts_at: NaiveDateTime,
    /// Falls back to the configured default duration
    pub duration_minutes: Option<u32>,
    pub special_requests: Option<String>,
}

impl ReservationRequest {
    pub fn new(
        customer_id: u64,
        restaurant_id: u64,
        party_size: u32,
        starts_at: NaiveDateTime,
    ) -> Self {
        Self {
            customer_id,
            restaurant_id,
            table_id: None,
            party_size,
            starts_at,
            duration_minutes: None,
            special_requests: None,
        }
    }

    pub fn at_table(mut self, table_id: u64) -> Self {
        self.table_id = Some(table_id);
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    pub fn with_special_requests(mut self, requests: impl Into<String>) -> Self {
        self.special_requests = Some(requests.into());
        self
    }

    /// Shape checks that need no store access
    ///
    /// Returns the requested window (start cut to whole seconds) and its
    /// length in minutes.
    pub(crate) fn check(&self, default_duration: u32) -> Result<(TimeWindow, u32)> {
        if self.party_size == 0 {
            return Err(SeatwiseError::validation("party_size", "must be positive"));
        }
        let duration = self.duration_minutes.unwrap_or(default_duration);
        if duration == 0 {
            return Err(SeatwiseError::validation("duration_minutes", "must be positive"));
        }
        let window = TimeWindow::try_starting_at(
            "reservation_datetime",
            whole_seconds(self.starts_at),
            duration,
        )?;
        Ok((window, duration))
    }
}

/// Partial changes to a CONFIRMED reservation
///
/// `None` leaves a field as it is. `special_requests: Some(None)` clears
/// the text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationUpdate {
    pub table_id: Option<u64>,
    pub party_size: Option<u32>,
    pub starts_at: Option<NaiveDateTime>,
    pub duration_minutes: Option<u32>,
    pub special_requests: Option<Option<String>>,
}

impl ReservationUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, table_id: u64) -> Self {
        self.table_id = Some(table_id);
        self
    }

    pub fn party_size(mut self, party_size: u32) -> Self {
        self.party_size = Some(party_size);
        self
    }

    pub fn starts_at(mut self, starts_at: NaiveDateTime) -> Self {
        self.starts_at = Some(starts_at);
        self
    }

    pub fn duration_minutes(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    pub fn special_requests(mut self, requests: Option<String>) -> Self {
        self.special_requests = Some(requests);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
