//! Occupancy index and assignment rules
//!
//! Pure functions over a snapshot of reservations. The availability engine
//! feeds them a read snapshot; the reservation service feeds them the
//! working copy inside the reservation store's write lock, so the check and
//! the booking happen in one critical section.

use std::collections::HashMap;

use crate::error::{Result, SeatwiseError};
use crate::model::{Reservation, Table};

use super::TimeWindow;

/// CONFIRMED windows per table
#[derive(Debug, Default)]
pub struct Occupancy {
    by_table: HashMap<u64, Vec<(u64, TimeWindow)>>,
}

impl Occupancy {
    /// Index the CONFIRMED reservations, leaving out `exclude`
    ///
    /// `exclude` lets an update ignore the reservation being edited.
    pub fn build<'a, I>(reservations: I, exclude: Option<u64>) -> Self
    where
        I: IntoIterator<Item = &'a Reservation>,
    {
        let mut by_table: HashMap<u64, Vec<(u64, TimeWindow)>> = HashMap::new();
        for reservation in reservations {
            if !reservation.is_active() {
                continue;
            }
            if exclude.is_some() && reservation.id == exclude {
                continue;
            }
            let id = reservation.id.unwrap_or_default();
            by_table
                .entry(reservation.table_id)
                .or_default()
                .push((id, reservation.window()));
        }
        Self { by_table }
    }

    /// Id of an overlapping CONFIRMED reservation (earliest start first)
    pub fn conflict(&self, table_id: u64, window: &TimeWindow) -> Option<u64> {
        self.by_table
            .get(&table_id)?
            .iter()
            .filter(|(_, booked)| booked.overlaps(window))
            .min_by_key(|(id, booked)| (booked.start, *id))
            .map(|(id, _)| *id)
    }

    pub fn is_free(&self, table_id: u64, window: &TimeWindow) -> bool {
        self.conflict(table_id, window).is_none()
    }

    /// Number of CONFIRMED windows held by a table
    pub fn bookings(&self, table_id: u64) -> usize {
        self.by_table.get(&table_id).map_or(0, Vec::len)
    }
}

/// Check one table for one request: active → capacity → conflict
///
/// Capacity is checked before conflicts so an oversized party gets a
/// capacity error even when the table is also booked.
pub fn check_assignment(
    table: &Table,
    window: &TimeWindow,
    party_size: u32,
    occupancy: &Occupancy,
) -> Result<()> {
    let table_id = table.id.unwrap_or_default();

    if !table.is_active {
        return Err(SeatwiseError::TableInactive { table_id });
    }

    if !table.can_seat(party_size) {
        return Err(SeatwiseError::Capacity {
            table_id,
            capacity: table.capacity,
            party_size,
        });
    }

    if let Some(conflicting_id) = occupancy.conflict(table_id, window) {
        return Err(SeatwiseError::Conflict {
            table_id,
            requested: window.start,
            conflicting_id,
        });
    }

    Ok(())
}

/// Eligible tables, best fit first
///
/// Eligible = active, big enough, free for the window. Ordered by capacity
/// ascending so the least seats are wasted, ties broken by id.
pub fn rank_candidates<I>(
    tables: I,
    window: &TimeWindow,
    party_size: u32,
    occupancy: &Occupancy,
) -> Vec<Table>
where
    I: IntoIterator<Item = Table>,
{
    let mut eligible: Vec<Table> = tables
        .into_iter()
        .filter(|t| check_assignment(t, window, party_size, occupancy).is_ok())
        .collect();
    eligible.sort_by_key(|t| (t.capacity, t.id));
    eligible
}

/// Reorder ranked candidates: the requested table's section first
///
/// The requested table itself is dropped. Both groups keep their
/// best-fit order.
pub fn order_alternatives(requested: &Table, ranked: Vec<Table>) -> Vec<Table> {
    let (mut same, other): (Vec<Table>, Vec<Table>) = ranked
        .into_iter()
        .filter(|t| t.id != requested.id)
        .partition(|t| t.section_id == requested.section_id);
    same.extend(other);
    same
}
