//! Reservation Service
//!
//! Validates, books, edits and closes reservations.
//!
//! ## Booking Pipeline
//! 1. Shape checks (party size, duration, window in range)
//! 2. Customer and restaurant must exist
//! 3. Under the reservation store's write lock:
//!    table exists → belongs to the restaurant → active → capacity → no conflict
//! 4. Persist, then return the enriched view
//!
//! ## Lock Order
//! Reservations (write) → sections/tables (read). Nothing takes the
//! reservation lock while holding a table or section lock.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use crate::availability::{
    check_assignment, rank_candidates, AvailabilityEngine, Occupancy, TimeWindow,
};
use crate::codec::Record;
use crate::error::{Result, SeatwiseError};
use crate::model::{self, Reservation, ReservationStatus, Table};
use crate::stores::{CustomerStore, ReservationStore, RestaurantStore, SectionStore, TableStore};

use super::{DailySummary, ReservationDetails, ReservationRequest, ReservationUpdate};

/// Reservation orchestrator over shared stores
pub struct ReservationService {
    customers: Arc<CustomerStore>,
    restaurants: Arc<RestaurantStore>,
    sections: Arc<SectionStore>,
    tables: Arc<TableStore>,
    reservations: Arc<ReservationStore>,
    availability: Arc<AvailabilityEngine>,
}

impl ReservationService {
    pub fn new(
        customers: Arc<CustomerStore>,
        restaurants: Arc<RestaurantStore>,
        sections: Arc<SectionStore>,
        tables: Arc<TableStore>,
        reservations: Arc<ReservationStore>,
        availability: Arc<AvailabilityEngine>,
    ) -> Self {
        Self {
            customers,
            restaurants,
            sections,
            tables,
            reservations,
            availability,
        }
    }

    pub fn availability(&self) -> &AvailabilityEngine {
        &self.availability
    }

    // =========================================================================
    // Booking
    // =========================================================================

    /// Book the requested table
    ///
    /// Errors:
    /// - `Validation`: no table given, bad party size/duration, table of another restaurant
    /// - `NotFound`: unknown customer, restaurant or table
    /// - `TableInactive`, `Capacity`, `Conflict`: the table cannot take the booking
    pub fn create(&self, request: ReservationRequest) -> Result<ReservationDetails> {
        let table_id = request
            .table_id
            .ok_or_else(|| SeatwiseError::validation("table_id", "is required"))?;
        let (window, duration) = self.prepare(&request)?;

        let result = self.reservations.write(|txn| {
            let table = self.table_in_restaurant(table_id, request.restaurant_id)?;
            let occupancy = Occupancy::build(txn.records(), None);
            check_assignment(&table, &window, request.party_size, &occupancy)?;
            txn.insert(Self::new_reservation(&request, table_id, &window, duration))
        });

        self.finish_booking(&request, result)
    }

    /// Book the best-fit table of the restaurant
    ///
    /// Any `table_id` on the request is ignored. Fails with `NoCapacity`
    /// when no table qualifies; nothing is written in that case.
    pub fn create_with_auto_assignment(
        &self,
        request: ReservationRequest,
    ) -> Result<ReservationDetails> {
        let (window, duration) = self.prepare(&request)?;

        let result = self.reservations.write(|txn| {
            let occupancy = Occupancy::build(txn.records(), None);
            let best = rank_candidates(
                self.availability.restaurant_tables(request.restaurant_id),
                &window,
                request.party_size,
                &occupancy,
            )
            .into_iter()
            .next()
            .ok_or(SeatwiseError::NoCapacity {
                restaurant_id: request.restaurant_id,
                requested: window.start,
                party_size: request.party_size,
            })?;

            let table_id = best.id.unwrap_or_default();
            txn.insert(Self::new_reservation(&request, table_id, &window, duration))
        });

        self.finish_booking(&request, result)
    }

    /// Eligible tables to offer when a request cannot be booked as asked
    ///
    /// With a table on the request: that table's section first, then the
    /// rest of the restaurant. Without: the restaurant's best-fit list.
    pub fn alternatives_for(&self, request: &ReservationRequest) -> Result<Vec<Table>> {
        let (window, _) = request.check(self.availability.default_duration_minutes())?;
        match request.table_id {
            Some(table_id) => {
                self.availability
                    .suggest_alternatives_for(table_id, &window, request.party_size)
            }
            None => Ok(self.availability.list_available_for(
                request.restaurant_id,
                &window,
                request.party_size,
            )),
        }
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Apply partial changes to a CONFIRMED reservation
    ///
    /// The effective table, time, duration and party size are re-validated
    /// with this reservation left out of the conflict check.
    pub fn update(&self, id: u64, changes: ReservationUpdate) -> Result<ReservationDetails> {
        let saved = self.reservations.write(|txn| {
            let current = txn
                .get(id)
                .cloned()
                .ok_or_else(|| SeatwiseError::not_found("Reservation", id))?;
            if current.status.is_terminal() {
                return Err(SeatwiseError::ReservationClosed {
                    id,
                    status: current.status,
                });
            }

            let mut updated = current;
            if let Some(table_id) = changes.table_id {
                updated.table_id = table_id;
            }
            if let Some(party_size) = changes.party_size {
                updated.party_size = party_size;
            }
            if let Some(starts_at) = changes.starts_at {
                updated.reservation_datetime = model::whole_seconds(starts_at);
            }
            if let Some(minutes) = changes.duration_minutes {
                updated.duration_minutes = minutes;
            }
            if let Some(requests) = changes.special_requests.clone() {
                updated = updated.with_special_requests(requests);
            }
            updated.validate()?;

            let table = self.table_in_restaurant(updated.table_id, updated.restaurant_id)?;
            let occupancy = Occupancy::build(txn.records(), Some(id));
            check_assignment(&table, &updated.window(), updated.party_size, &occupancy)?;

            updated.updated_at = model::now().max(updated.created_at);
            txn.replace(updated)
        });

        match saved {
            Ok(reservation) => {
                tracing::info!(
                    "Updated reservation {} (table {}, party {}, at {})",
                    id,
                    reservation.table_id,
                    reservation.party_size,
                    reservation.reservation_datetime
                );
                Ok(self.enrich(reservation))
            }
            Err(e) => {
                tracing::warn!("Rejected update of reservation {}: {}", id, e);
                Err(e)
            }
        }
    }

    pub fn cancel(&self, id: u64) -> Result<Reservation> {
        self.transition(id, ReservationStatus::Cancelled)
    }

    pub fn complete(&self, id: u64) -> Result<Reservation> {
        self.transition(id, ReservationStatus::Completed)
    }

    pub fn mark_no_show(&self, id: u64) -> Result<Reservation> {
        self.transition(id, ReservationStatus::NoShow)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn find(&self, id: u64) -> Option<Reservation> {
        self.reservations.find_by_id(id)
    }

    pub fn details(&self, id: u64) -> Result<ReservationDetails> {
        self.find(id)
            .map(|r| self.enrich(r))
            .ok_or_else(|| SeatwiseError::not_found("Reservation", id))
    }

    pub fn by_customer(&self, customer_id: u64) -> Vec<Reservation> {
        self.reservations.find_by_customer(customer_id)
    }

    /// A restaurant's reservations starting on `date`, ordered by start
    pub fn by_restaurant_on(&self, restaurant_id: u64, date: NaiveDate) -> Vec<Reservation> {
        let mut found = self
            .reservations
            .find_by_restaurant_and_date(restaurant_id, date);
        found.sort_by_key(|r| (r.reservation_datetime, r.id));
        found
    }

    /// A table's reservations starting on `date`, ordered by start
    pub fn by_table_on(&self, table_id: u64, date: NaiveDate) -> Vec<Reservation> {
        let mut found = self.reservations.find_by_table_and_date(table_id, date);
        found.sort_by_key(|r| (r.reservation_datetime, r.id));
        found
    }

    /// Every CONFIRMED reservation
    pub fn active(&self) -> Vec<Reservation> {
        self.reservations.find_active()
    }

    pub fn by_status(&self, status: ReservationStatus) -> Vec<Reservation> {
        self.reservations.find_by_status(status)
    }

    /// CONFIRMED reservations of a restaurant starting at or after `from`
    pub fn upcoming(&self, restaurant_id: u64, from: NaiveDateTime) -> Vec<Reservation> {
        let mut found = self.reservations.find_where(|r| {
            r.restaurant_id == restaurant_id && r.is_active() && r.reservation_datetime >= from
        });
        found.sort_by_key(|r| (r.reservation_datetime, r.id));
        found
    }

    pub fn daily_summary(&self, restaurant_id: u64, date: NaiveDate) -> DailySummary {
        let reservations = self
            .reservations
            .find_by_restaurant_and_date(restaurant_id, date);
        DailySummary::tally(restaurant_id, date, &reservations)
    }

    /// Join a reservation with its customer, table and section
    pub fn enrich(&self, reservation: Reservation) -> ReservationDetails {
        let customer = self.customers.find_by_id(reservation.customer_id);
        let table = self.tables.find_by_id(reservation.table_id);
        let section = table
            .as_ref()
            .and_then(|t| self.sections.find_by_id(t.section_id));

        ReservationDetails {
            ends_at: reservation.ends_at(),
            customer_name: customer.as_ref().map(|c| c.full_name()),
            customer_email: customer.map(|c| c.email),
            table_number: table.as_ref().map(|t| t.table_number),
            table_capacity: table.map(|t| t.capacity),
            section_name: section.map(|s| s.name),
            reservation,
        }
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Shape checks and referenced-entity checks shared by both booking paths
    fn prepare(&self, request: &ReservationRequest) -> Result<(TimeWindow, u32)> {
        let (window, duration) = request.check(self.availability.default_duration_minutes())?;

        if !self.customers.exists_by_id(request.customer_id) {
            return Err(SeatwiseError::not_found("Customer", request.customer_id));
        }
        if !self.restaurants.exists_by_id(request.restaurant_id) {
            return Err(SeatwiseError::not_found("Restaurant", request.restaurant_id));
        }

        Ok((window, duration))
    }

    /// Load a table and make sure its section belongs to `restaurant_id`
    fn table_in_restaurant(&self, table_id: u64, restaurant_id: u64) -> Result<Table> {
        let table = self
            .tables
            .find_by_id(table_id)
            .ok_or_else(|| SeatwiseError::not_found("Table", table_id))?;

        if self.sections.restaurant_of(table.section_id) != Some(restaurant_id) {
            return Err(SeatwiseError::validation(
                "table_id",
                format!("table {} is not in restaurant {}", table_id, restaurant_id),
            ));
        }
        Ok(table)
    }

    fn new_reservation(
        request: &ReservationRequest,
        table_id: u64,
        window: &TimeWindow,
        duration_minutes: u32,
    ) -> Reservation {
        Reservation::new(
            request.customer_id,
            request.restaurant_id,
            table_id,
            request.party_size,
            window.start,
        )
        .with_duration(duration_minutes)
        .with_special_requests(request.special_requests.clone())
    }

    fn finish_booking(
        &self,
        request: &ReservationRequest,
        result: Result<Reservation>,
    ) -> Result<ReservationDetails> {
        match result {
            Ok(reservation) => {
                tracing::info!(
                    "Booked reservation {} on table {} for {} at {}",
                    reservation.id.unwrap_or_default(),
                    reservation.table_id,
                    reservation.party_size,
                    reservation.reservation_datetime
                );
                Ok(self.enrich(reservation))
            }
            Err(e) => {
                tracing::warn!(
                    "Rejected booking for customer {} in restaurant {} at {}: {}",
                    request.customer_id,
                    request.restaurant_id,
                    request.starts_at,
                    e
                );
                Err(e)
            }
        }
    }

    fn transition(&self, id: u64, to: ReservationStatus) -> Result<Reservation> {
        let saved = self.reservations.write(|txn| {
            let mut reservation = txn
                .get(id)
                .cloned()
                .ok_or_else(|| SeatwiseError::not_found("Reservation", id))?;

            if !reservation.status.can_transition_to(to) {
                return Err(SeatwiseError::InvalidTransition {
                    id,
                    from: reservation.status,
                    to,
                });
            }

            reservation.status = to;
            reservation.updated_at = model::now().max(reservation.created_at);
            txn.replace(reservation)
        })?;

        tracing::info!("Reservation {} is now {}", id, to);
        Ok(saved)
    }
}
