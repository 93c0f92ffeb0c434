use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;

use crate::config::SyncMode;
use crate::error::{Result, SeatwiseError};
use crate::model::{Reservation, Table};
use crate::storage::{StoreTxn, TabularStore};

use super::ReservationStore;

/// Tables, keyed by `table_id`
///
/// Table numbers are unique within a section. When opened with
/// `open_guarded`, writes also keep every CONFIRMED reservation seatable:
/// a table cannot shrink below its largest booked party, and a table with
/// CONFIRMED reservations cannot change section.
///
/// Guarded writes take the reservation store's write lock before this
/// store's, the same order the booking path uses.
pub struct TableStore {
    store: TabularStore<Table>,
    reservations: Option<Arc<ReservationStore>>,
}

impl TableStore {
    pub const FILE_NAME: &'static str = "tables.csv";

    pub fn open(path: impl AsRef<Path>, sync_mode: SyncMode) -> Result<Self> {
        Ok(Self {
            store: TabularStore::open_with(path, sync_mode)?,
            reservations: None,
        })
    }

    /// Open a store whose writes are checked against `reservations`
    pub fn open_guarded(
        path: impl AsRef<Path>,
        sync_mode: SyncMode,
        reservations: Arc<ReservationStore>,
    ) -> Result<Self> {
        Ok(Self {
            store: TabularStore::open_with(path, sync_mode)?,
            reservations: Some(reservations),
        })
    }

    // =========================================================================
    // Writes
    // =========================================================================

    pub fn save(&self, table: Table) -> Result<Table> {
        self.guarded_write(|txn, booked| {
            Self::check_number(txn, &table)?;
            Self::check_bookings(txn, &table, booked)?;
            txn.insert(table)
        })
    }

    pub fn save_all(&self, tables: Vec<Table>) -> Result<Vec<Table>> {
        self.guarded_write(|txn, booked| {
            tables
                .into_iter()
                .map(|table| {
                    Self::check_number(txn, &table)?;
                    Self::check_bookings(txn, &table, booked)?;
                    txn.insert(table)
                })
                .collect()
        })
    }

    pub fn update(&self, table: Table) -> Result<Table> {
        self.guarded_write(|txn, booked| {
            Self::check_number(txn, &table)?;
            Self::check_bookings(txn, &table, booked)?;
            txn.replace(table)
        })
    }

    /// Flip the active flag; history is left untouched
    pub fn set_active(&self, table_id: u64, active: bool) -> Result<Table> {
        self.store.write(|txn| {
            let mut table = txn
                .get(table_id)
                .cloned()
                .ok_or_else(|| SeatwiseError::not_found("Table", table_id))?;
            table.is_active = active;
            txn.replace(table)
        })
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn find_by_section(&self, section_id: u64) -> Vec<Table> {
        self.store.find_where(|t| t.section_id == section_id)
    }

    pub fn find_active_by_section(&self, section_id: u64) -> Vec<Table> {
        self.store
            .find_where(|t| t.section_id == section_id && t.is_active)
    }

    /// Tables belonging to any of the given sections
    pub fn find_by_sections(&self, section_ids: &[u64]) -> Vec<Table> {
        self.store
            .find_where(|t| section_ids.contains(&t.section_id))
    }

    pub fn find_by_number(&self, section_id: u64, table_number: u32) -> Option<Table> {
        self.store
            .find_one_where(|t| t.section_id == section_id && t.table_number == table_number)
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Run `f` with the CONFIRMED reservations held still
    fn guarded_write<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut StoreTxn<'_, Table>, &[Reservation]) -> Result<T>,
    {
        match &self.reservations {
            Some(reservations) => reservations.write(|held| {
                let booked: Vec<Reservation> =
                    held.records().filter(|r| r.is_active()).cloned().collect();
                self.store.write(|txn| f(txn, &booked))
            }),
            None => self.store.write(|txn| f(txn, &[])),
        }
    }

    fn check_bookings(
        txn: &StoreTxn<'_, Table>,
        table: &Table,
        booked: &[Reservation],
    ) -> Result<()> {
        let Some(table_id) = table.id else {
            return Ok(());
        };
        let on_table: Vec<&Reservation> =
            booked.iter().filter(|r| r.table_id == table_id).collect();
        if on_table.is_empty() {
            return Ok(());
        }

        if let Some(largest) = on_table.iter().map(|r| r.party_size).max() {
            if table.capacity < largest {
                return Err(SeatwiseError::Capacity {
                    table_id,
                    capacity: table.capacity,
                    party_size: largest,
                });
            }
        }

        let moved = txn
            .get(table_id)
            .map_or(false, |current| current.section_id != table.section_id);
        if moved {
            return Err(SeatwiseError::validation(
                "section_id",
                format!(
                    "table {} has {} confirmed reservation(s) and cannot change section",
                    table_id,
                    on_table.len()
                ),
            ));
        }
        Ok(())
    }

    fn check_number(txn: &StoreTxn<'_, Table>, table: &Table) -> Result<()> {
        let taken = txn.records().any(|other| {
            other.id != table.id
                && other.section_id == table.section_id
                && other.table_number == table.table_number
        });
        if taken {
            return Err(SeatwiseError::Duplicate {
                entity: "Table",
                field: "table_number",
                value: format!("{} in section {}", table.table_number, table.section_id),
            });
        }
        Ok(())
    }
}

impl Deref for TableStore {
    type Target = TabularStore<Table>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}
