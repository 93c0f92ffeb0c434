use std::ops::Deref;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};

use crate::config::SyncMode;
use crate::error::Result;
use crate::model::{Reservation, ReservationStatus};
use crate::storage::TabularStore;

/// Reservations, keyed by `reservation_id`
///
/// Lookups return records ascending by id. Conflict rules live in the
/// availability engine, not here: this store accepts any valid record.
pub struct ReservationStore {
    store: TabularStore<Reservation>,
}

impl ReservationStore {
    pub const FILE_NAME: &'static str = "reservations.csv";

    pub fn open(path: impl AsRef<Path>, sync_mode: SyncMode) -> Result<Self> {
        Ok(Self {
            store: TabularStore::open_with(path, sync_mode)?,
        })
    }

    pub fn find_by_customer(&self, customer_id: u64) -> Vec<Reservation> {
        self.store.find_where(|r| r.customer_id == customer_id)
    }

    pub fn find_by_restaurant(&self, restaurant_id: u64) -> Vec<Reservation> {
        self.store.find_where(|r| r.restaurant_id == restaurant_id)
    }

    pub fn find_by_table(&self, table_id: u64) -> Vec<Reservation> {
        self.store.find_where(|r| r.table_id == table_id)
    }

    /// Reservations on a table starting on the given day
    pub fn find_by_table_and_date(&self, table_id: u64, date: NaiveDate) -> Vec<Reservation> {
        self.store
            .find_where(|r| r.table_id == table_id && r.date() == date)
    }

    /// Reservations in a restaurant starting on the given day
    pub fn find_by_restaurant_and_date(
        &self,
        restaurant_id: u64,
        date: NaiveDate,
    ) -> Vec<Reservation> {
        self.store
            .find_where(|r| r.restaurant_id == restaurant_id && r.date() == date)
    }

    pub fn find_by_status(&self, status: ReservationStatus) -> Vec<Reservation> {
        self.store.find_where(|r| r.status == status)
    }

    /// Every CONFIRMED reservation
    pub fn find_active(&self) -> Vec<Reservation> {
        self.store.find_where(Reservation::is_active)
    }

    pub fn find_active_by_table(&self, table_id: u64) -> Vec<Reservation> {
        self.store
            .find_where(|r| r.table_id == table_id && r.is_active())
    }

    /// Reservations of a restaurant starting in `[from, to)`, ordered by start
    pub fn find_in_range(
        &self,
        restaurant_id: u64,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Vec<Reservation> {
        let mut found = self.store.find_where(|r| {
            r.restaurant_id == restaurant_id
                && r.reservation_datetime >= from
                && r.reservation_datetime < to
        });
        found.sort_by_key(|r| (r.reservation_datetime, r.id));
        found
    }
}

impl Deref for ReservationStore {
    type Target = TabularStore<Reservation>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}
