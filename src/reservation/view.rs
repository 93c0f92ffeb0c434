//! Read models returned by the reservation service

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::model::{Reservation, ReservationStatus};

/// A reservation joined with the names a host needs to see
///
/// Referenced entities may have been deleted since booking, so every joined
/// field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationDetails {
    pub reservation: Reservation,
    pub ends_at: NaiveDateTime,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub table_number: Option<u32>,
    pub table_capacity: Option<u32>,
    pub section_name: Option<String>,
}

impl ReservationDetails {
    pub fn id(&self) -> Option<u64> {
        self.reservation.id
    }

    pub fn status(&self) -> ReservationStatus {
        self.reservation.status
    }
}

/// Per-day counts for one restaurant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySummary {
    pub restaurant_id: u64,
    pub date: NaiveDate,
    pub confirmed: usize,
    pub completed: usize,
    pub no_show: usize,
    pub cancelled: usize,
    /// Guests expected or seated (CONFIRMED + COMPLETED party sizes)
    pub covers: u32,
}

impl DailySummary {
    pub(crate) fn tally(restaurant_id: u64, date: NaiveDate, reservations: &[Reservation]) -> Self {
        let mut summary = Self {
            restaurant_id,
            date,
            confirmed: 0,
            completed: 0,
            no_show: 0,
            cancelled: 0,
            covers: 0,
        };

        for r in reservations {
            match r.status {
                ReservationStatus::Confirmed => summary.confirmed += 1,
                ReservationStatus::Completed => summary.completed += 1,
                ReservationStatus::NoShow => summary.no_show += 1,
                ReservationStatus::Cancelled => summary.cancelled += 1,
            }
            if matches!(
                r.status,
                ReservationStatus::Confirmed | ReservationStatus::Completed
            ) {
                summary.covers += r.party_size;
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.confirmed + self.completed + self.no_show + self.cancelled
    }
}
