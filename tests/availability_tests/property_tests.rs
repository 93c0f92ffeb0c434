//! Property tests for the overlap rule and table assignment
//!
//! Randomized request streams are fed through the same checks the booking
//! path uses, and through the reservation service itself; whatever gets
//! accepted must never double-book a table.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::collection::vec;
use proptest::prelude::*;
use seatwise::availability::{check_assignment, rank_candidates, Occupancy};
use seatwise::{
    Config, Customer, Engine, Reservation, ReservationRequest, Restaurant, SeatwiseError,
    Section, SyncMode, Table, TimeWindow,
};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn base() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn window(start_minute: u32, minutes: u32) -> TimeWindow {
    TimeWindow::starting_at(base() + Duration::minutes(i64::from(start_minute)), minutes)
}

fn table(id: u64, capacity: u32) -> Table {
    let mut t = Table::new(1, id as u32, capacity);
    t.id = Some(id);
    t
}

/// One restaurant with a single 4-top (table 1) and one customer
fn single_table_engine() -> (TempDir, Engine) {
    let temp = TempDir::new().unwrap();
    let engine = Engine::open(
        Config::builder()
            .data_dir(temp.path())
            .sync_mode(SyncMode::Never)
            .build(),
    )
    .unwrap();
    engine.restaurants().save(Restaurant::new("Bistro")).unwrap();
    engine.sections().save(Section::new(1, "Main")).unwrap();
    engine.tables().save(Table::new(1, 1, 4)).unwrap();
    engine
        .customers()
        .save(Customer::new(1, "Ana", "Lima", "ana@example.com", "555-123-4567"))
        .unwrap();
    (temp, engine)
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn overlap_matches_minute_sampling(
        s1 in 0u32..600,
        d1 in 1u32..240,
        s2 in 0u32..600,
        d2 in 1u32..240,
    ) {
        let a = window(s1, d1);
        let b = window(s2, d2);

        // Some minute of `a` falls inside `b`
        let brute = (s1..s1 + d1).any(|m| m >= s2 && m < s2 + d2);

        prop_assert_eq!(a.overlaps(&b), brute);
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    #[test]
    fn accepted_bookings_never_overlap(
        requests in vec((1u64..4, 0u32..48, 1u32..9), 1..40),
    ) {
        let tables: Vec<Table> = (1..=3).map(|id| table(id, 4)).collect();
        let mut booked: Vec<Reservation> = Vec::new();

        for (i, (table_id, slot, length)) in requests.into_iter().enumerate() {
            let requested = window(slot * 15, length * 15);
            let occupancy = Occupancy::build(&booked, None);
            let target = &tables[(table_id - 1) as usize];

            match check_assignment(target, &requested, 2, &occupancy) {
                Ok(()) => {
                    let mut r = Reservation::new(1, 1, table_id, 2, requested.start)
                        .with_duration(length * 15);
                    r.id = Some(i as u64 + 1);
                    booked.push(r);
                }
                Err(SeatwiseError::Conflict { conflicting_id, .. }) => {
                    // The reported reservation really is in the way
                    let blocker = booked
                        .iter()
                        .find(|r| r.id == Some(conflicting_id))
                        .unwrap();
                    prop_assert_eq!(blocker.table_id, table_id);
                    prop_assert!(blocker.window().overlaps(&requested));
                }
                Err(other) => prop_assert!(false, "unexpected error {:?}", other),
            }
        }

        for (i, a) in booked.iter().enumerate() {
            for b in &booked[i + 1..] {
                if a.table_id == b.table_id {
                    prop_assert!(!a.window().overlaps(&b.window()));
                }
            }
        }
    }

    #[test]
    fn best_fit_is_smallest_sufficient_table(
        capacities in vec(1u32..12, 1..10),
        party in 1u32..12,
    ) {
        let tables: Vec<Table> = capacities
            .iter()
            .enumerate()
            .map(|(i, &c)| table(i as u64 + 1, c))
            .collect();

        let ranked = rank_candidates(tables, &window(0, 120), party, &Occupancy::default());

        let smallest = capacities.iter().copied().filter(|&c| c >= party).min();
        prop_assert_eq!(ranked.first().map(|t| t.capacity), smallest);
        prop_assert!(ranked.iter().all(|t| t.capacity >= party));
        prop_assert!(ranked
            .windows(2)
            .all(|w| (w[0].capacity, w[0].id) < (w[1].capacity, w[1].id)));
    }
}

proptest! {
    // Each case opens a fresh engine on disk
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn service_rejects_exactly_the_overlapping_bookings(
        requests in vec((0u32..48, 1u32..9), 1..16),
    ) {
        let (_temp, engine) = single_table_engine();
        let service = engine.reservations();
        let mut accepted: Vec<TimeWindow> = Vec::new();

        for (slot, length) in requests {
            let requested = window(slot * 15, length * 15);
            let clashes = accepted.iter().any(|w| w.overlaps(&requested));

            let result = service.create(
                ReservationRequest::new(1, 1, 2, requested.start)
                    .at_table(1)
                    .with_duration(length * 15),
            );
            match result {
                Ok(details) => {
                    prop_assert!(!clashes, "booked over an existing window {:?}", requested);
                    prop_assert_eq!(details.reservation.window(), requested);
                    accepted.push(requested);
                }
                Err(e) => {
                    prop_assert!(clashes, "rejected a free window {:?}: {}", requested, e);
                    prop_assert!(e.is_conflict(), "expected a conflict, got {}", e);
                }
            }
        }

        prop_assert_eq!(engine.reservation_store().count(), accepted.len());
    }
}
