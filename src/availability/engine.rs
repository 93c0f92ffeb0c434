//! Availability Engine
//!
//! Answers "which tables can seat this party at this time" for a restaurant.

use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::error::{Result, SeatwiseError};
use crate::model::{Reservation, Table};
use crate::stores::{ReservationStore, SectionStore, TableStore};

use super::occupancy::{check_assignment, order_alternatives, rank_candidates, Occupancy};
use super::TimeWindow;

/// Table eligibility and ranking over shared stores
///
/// Every query works on snapshots, so results can be stale by the time a
/// caller acts on them. Booking paths re-check inside the reservation
/// store's write lock (see `ReservationService`).
pub struct AvailabilityEngine {
    tables: Arc<TableStore>,
    sections: Arc<SectionStore>,
    reservations: Arc<ReservationStore>,

    /// Window length for requests that do not state one
    default_duration_minutes: u32,
}

impl AvailabilityEngine {
    pub fn new(
        tables: Arc<TableStore>,
        sections: Arc<SectionStore>,
        reservations: Arc<ReservationStore>,
        default_duration_minutes: u32,
    ) -> Self {
        Self {
            tables,
            sections,
            reservations,
            default_duration_minutes,
        }
    }

    pub fn default_duration_minutes(&self) -> u32 {
        self.default_duration_minutes
    }

    /// Request window starting at `at` with the default duration
    pub fn window_at(&self, at: NaiveDateTime) -> TimeWindow {
        TimeWindow::starting_at(at, self.default_duration_minutes)
    }

    // =========================================================================
    // Single Table
    // =========================================================================

    /// Table exists, is active, and is free for the default window at `at`
    pub fn is_available(&self, table_id: u64, at: NaiveDateTime) -> bool {
        self.is_available_for(table_id, &self.window_at(at))
    }

    pub fn is_available_for(&self, table_id: u64, window: &TimeWindow) -> bool {
        match self.tables.find_by_id(table_id) {
            Some(table) if table.is_active => self.occupancy(None).is_free(table_id, window),
            _ => false,
        }
    }

    /// Full check before committing a table: exists → active → capacity → conflict
    pub fn validate_assignment(
        &self,
        table_id: u64,
        at: NaiveDateTime,
        party_size: u32,
    ) -> Result<Table> {
        self.validate_assignment_for(table_id, &self.window_at(at), party_size, None)
    }

    /// `validate_assignment` for an explicit window, ignoring `exclude`
    pub fn validate_assignment_for(
        &self,
        table_id: u64,
        window: &TimeWindow,
        party_size: u32,
        exclude: Option<u64>,
    ) -> Result<Table> {
        let table = self
            .tables
            .find_by_id(table_id)
            .ok_or_else(|| SeatwiseError::not_found("Table", table_id))?;
        check_assignment(&table, window, party_size, &self.occupancy(exclude))?;
        Ok(table)
    }

    /// CONFIRMED reservations on a table overlapping `window`
    pub fn conflicts(
        &self,
        table_id: u64,
        window: &TimeWindow,
        exclude: Option<u64>,
    ) -> Vec<Reservation> {
        self.reservations.find_where(|r| {
            r.table_id == table_id
                && r.is_active()
                && !(exclude.is_some() && r.id == exclude)
                && r.window().overlaps(window)
        })
    }

    // =========================================================================
    // Restaurant-Wide
    // =========================================================================

    /// Every table of a restaurant, active or not, ascending by id
    pub fn restaurant_tables(&self, restaurant_id: u64) -> Vec<Table> {
        let section_ids = self.sections.section_ids(restaurant_id);
        self.tables.find_by_sections(&section_ids)
    }

    /// Eligible tables for the default window at `at`, best fit first
    pub fn list_available(
        &self,
        restaurant_id: u64,
        at: NaiveDateTime,
        party_size: u32,
    ) -> Vec<Table> {
        self.list_available_for(restaurant_id, &self.window_at(at), party_size)
    }

    pub fn list_available_for(
        &self,
        restaurant_id: u64,
        window: &TimeWindow,
        party_size: u32,
    ) -> Vec<Table> {
        rank_candidates(
            self.restaurant_tables(restaurant_id),
            window,
            party_size,
            &self.occupancy(None),
        )
    }

    /// Smallest eligible table, if any
    pub fn pick_optimal(
        &self,
        restaurant_id: u64,
        at: NaiveDateTime,
        party_size: u32,
    ) -> Option<Table> {
        self.list_available(restaurant_id, at, party_size)
            .into_iter()
            .next()
    }

    /// Other eligible tables, same section first, each group best fit first
    ///
    /// Fails only if the requested table does not exist.
    pub fn suggest_alternatives(
        &self,
        requested_table_id: u64,
        at: NaiveDateTime,
        party_size: u32,
    ) -> Result<Vec<Table>> {
        self.suggest_alternatives_for(requested_table_id, &self.window_at(at), party_size)
    }

    pub fn suggest_alternatives_for(
        &self,
        requested_table_id: u64,
        window: &TimeWindow,
        party_size: u32,
    ) -> Result<Vec<Table>> {
        let requested = self
            .tables
            .find_by_id(requested_table_id)
            .ok_or_else(|| SeatwiseError::not_found("Table", requested_table_id))?;

        // A table whose section is gone can only be compared with its siblings
        let pool = match self.sections.restaurant_of(requested.section_id) {
            Some(restaurant_id) => self.restaurant_tables(restaurant_id),
            None => self.tables.find_by_section(requested.section_id),
        };

        let ranked = rank_candidates(pool, window, party_size, &self.occupancy(None));
        Ok(order_alternatives(&requested, ranked))
    }

    /// Sum of capacities of tables free for the default window at `at`
    ///
    /// An upper bound on guests seatable at that instant.
    pub fn available_capacity(&self, restaurant_id: u64, at: NaiveDateTime) -> u32 {
        self.list_available(restaurant_id, at, 1)
            .iter()
            .map(|t| t.capacity)
            .sum()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn occupancy(&self, exclude: Option<u64>) -> Occupancy {
        let active = self.reservations.find_active();
        Occupancy::build(&active, exclude)
    }
}
