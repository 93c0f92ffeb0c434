//! Reservation Service Tests
//!
//! These tests verify:
//! - Booking a requested table (conflict, capacity, inactive, ownership)
//! - Best-fit auto assignment and the no-capacity case
//! - Edits of CONFIRMED reservations
//! - Lifecycle transitions and the terminal states
//! - Day views and summaries

use std::fs;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use seatwise::{
    Config, Customer, Engine, ReservationRequest, ReservationStatus, ReservationUpdate, Restaurant,
    SeatwiseError, Section, SyncMode, Table,
};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

/// Restaurant 1:
///
/// ```text
/// Main  (section 1): t1 cap 2, t2 cap 4, t3 cap 6
/// Patio (section 2): t4 cap 4
/// ```
///
/// Restaurant 2 (section 3): t5 cap 4. Customers 1 (Ana) and 2 (Bruno).
fn setup_engine() -> (TempDir, Engine) {
    let temp = TempDir::new().unwrap();
    let engine = Engine::open(
        Config::builder()
            .data_dir(temp.path())
            .sync_mode(SyncMode::Never)
            .build(),
    )
    .unwrap();

    engine.restaurants().save(Restaurant::new("Bistro")).unwrap();
    engine.restaurants().save(Restaurant::new("Other")).unwrap();
    engine
        .sections()
        .save_all(vec![
            Section::new(1, "Main"),
            Section::new(1, "Patio"),
            Section::new(2, "Only"),
        ])
        .unwrap();
    engine
        .tables()
        .save_all(vec![
            Table::new(1, 1, 2),
            Table::new(1, 2, 4),
            Table::new(1, 3, 6),
            Table::new(2, 1, 4),
            Table::new(3, 1, 4),
        ])
        .unwrap();
    engine
        .customers()
        .save_all(vec![
            Customer::new(1, "Ana", "Lima", "ana@example.com", "555-123-4567"),
            Customer::new(1, "Bruno", "Costa", "bruno@example.com", "555-765-4321"),
        ])
        .unwrap();

    (temp, engine)
}

fn at(h: u32, m: u32) -> NaiveDateTime {
    day().and_hms_opt(h, m, 0).unwrap()
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn request(party_size: u32, start: NaiveDateTime) -> ReservationRequest {
    ReservationRequest::new(1, 1, party_size, start)
}

fn book(engine: &Engine, table_id: u64, party_size: u32, start: NaiveDateTime) -> u64 {
    engine
        .reservations()
        .create(request(party_size, start).at_table(table_id))
        .unwrap()
        .id()
        .unwrap()
}

fn reservations_file(engine: &Engine) -> Vec<u8> {
    fs::read(engine.reservation_store().path()).unwrap()
}

// =============================================================================
// Booking a Requested Table
// =============================================================================

#[test]
fn test_book_conflict_then_back_to_back() {
    let (_temp, engine) = setup_engine();
    let service = engine.reservations();

    let first = book(&engine, 2, 4, at(19, 0));

    match service.create(request(2, at(19, 30)).at_table(2)) {
        Err(SeatwiseError::Conflict {
            table_id,
            conflicting_id,
            ..
        }) => {
            assert_eq!(table_id, 2);
            assert_eq!(conflicting_id, first);
        }
        other => panic!("Expected conflict, got {:?}", other),
    }

    // 21:00 starts exactly when the first booking ends
    let second = service.create(request(2, at(21, 0)).at_table(2)).unwrap();
    assert_eq!(second.reservation.table_id, 2);
    assert_eq!(engine.reservation_store().count(), 2);
}

#[test]
fn test_capacity_error_wins_over_conflict() {
    let (_temp, engine) = setup_engine();
    book(&engine, 2, 4, at(19, 0));

    let err = engine
        .reservations()
        .create(request(8, at(19, 0)).at_table(2))
        .unwrap_err();

    assert!(matches!(
        err,
        SeatwiseError::Capacity {
            table_id: 2,
            capacity: 4,
            party_size: 8
        }
    ));
}

#[test]
fn test_create_returns_enriched_details() {
    let (_temp, engine) = setup_engine();

    let details = engine
        .reservations()
        .create(
            request(3, at(19, 0))
                .at_table(2)
                .with_duration(90)
                .with_special_requests("High chair"),
        )
        .unwrap();

    assert_eq!(details.status(), ReservationStatus::Confirmed);
    assert_eq!(details.ends_at, at(20, 30));
    assert_eq!(details.customer_name.as_deref(), Some("Ana Lima"));
    assert_eq!(details.customer_email.as_deref(), Some("ana@example.com"));
    assert_eq!(details.table_number, Some(2));
    assert_eq!(details.table_capacity, Some(4));
    assert_eq!(details.section_name.as_deref(), Some("Main"));
    assert_eq!(
        details.reservation.special_requests.as_deref(),
        Some("High chair")
    );

    let stored = engine.reservations().find(details.id().unwrap()).unwrap();
    assert_eq!(stored.duration_minutes, 90);
    assert!(stored.updated_at >= stored.created_at);
}

#[test]
fn test_default_duration_comes_from_config() {
    let temp = TempDir::new().unwrap();
    let engine = Engine::open(
        Config::builder()
            .data_dir(temp.path())
            .sync_mode(SyncMode::Never)
            .default_duration_minutes(60)
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

    book(&engine, 1, 2, at(19, 0));
    // One hour later the table is free again
    book(&engine, 1, 2, at(20, 0));
}

#[test]
fn test_create_validation_failures() {
    let (_temp, engine) = setup_engine();
    let service = engine.reservations();

    // No table on the request
    assert!(service.create(request(2, at(19, 0))).unwrap_err().is_validation());
    // Empty party
    assert!(service
        .create(request(0, at(19, 0)).at_table(2))
        .unwrap_err()
        .is_validation());
    // Zero-length booking
    assert!(service
        .create(request(2, at(19, 0)).at_table(2).with_duration(0))
        .unwrap_err()
        .is_validation());
    // Table 5 belongs to restaurant 2
    assert!(service
        .create(request(2, at(19, 0)).at_table(5))
        .unwrap_err()
        .is_validation());

    assert_eq!(engine.reservation_store().count(), 0);
}

#[test]
fn test_create_unknown_references() {
    let (_temp, engine) = setup_engine();
    let service = engine.reservations();

    let unknown_customer = ReservationRequest::new(9, 1, 2, at(19, 0)).at_table(2);
    assert!(matches!(
        service.create(unknown_customer),
        Err(SeatwiseError::NotFound {
            entity: "Customer",
            id: 9
        })
    ));

    let unknown_restaurant = ReservationRequest::new(1, 9, 2, at(19, 0)).at_table(2);
    assert!(service.create(unknown_restaurant).unwrap_err().is_not_found());

    let unknown_table = request(2, at(19, 0)).at_table(99);
    assert!(service.create(unknown_table).unwrap_err().is_not_found());
}

#[test]
fn test_create_on_inactive_table() {
    let (_temp, engine) = setup_engine();
    engine.tables().set_active(2, false).unwrap();

    let err = engine
        .reservations()
        .create(request(2, at(19, 0)).at_table(2))
        .unwrap_err();

    assert!(matches!(err, SeatwiseError::TableInactive { table_id: 2 }));
}

#[test]
fn test_start_past_calendar_end_is_rejected() {
    let (_temp, engine) = setup_engine();
    let service = engine.reservations();

    let err = service
        .create(request(2, NaiveDateTime::MAX).at_table(2))
        .unwrap_err();
    assert!(matches!(err, SeatwiseError::Validation { ref field, .. } if field == "reservation_datetime"));
    assert!(service
        .create_with_auto_assignment(request(2, NaiveDateTime::MAX))
        .unwrap_err()
        .is_validation());

    let id = book(&engine, 2, 4, at(19, 0));
    assert!(service
        .update(id, ReservationUpdate::new().starts_at(NaiveDateTime::MAX))
        .unwrap_err()
        .is_validation());
    assert_eq!(service.find(id).unwrap().reservation_datetime, at(19, 0));

    // Same rule when writing the store directly
    let raw = seatwise::Reservation::new(1, 1, 3, 2, NaiveDateTime::MAX);
    assert!(engine.reservation_store().save(raw).unwrap_err().is_validation());
    assert_eq!(engine.reservation_store().count(), 1);
    assert!(engine.availability().is_available(3, at(19, 0)));
}

#[test]
fn test_sub_second_start_is_stored_as_whole_seconds() {
    let (temp, engine) = setup_engine();
    let service = engine.reservations();

    let booked = service
        .create(request(4, at(19, 0) + Duration::milliseconds(500)).at_table(2))
        .unwrap();
    let id = booked.id().unwrap();
    assert_eq!(booked.reservation.reservation_datetime, at(19, 0));
    assert_eq!(booked.ends_at, at(21, 0));

    // Back-to-back with the stored window, not the requested one
    assert!(service.create(request(2, at(21, 0)).at_table(2)).is_ok());

    let moved = service
        .update(
            id,
            ReservationUpdate::new().starts_at(at(16, 30) + Duration::milliseconds(750)),
        )
        .unwrap();
    assert_eq!(moved.reservation.reservation_datetime, at(16, 30));

    let cached = service.find(id).unwrap();
    drop(engine);
    let reopened = Engine::open_path(temp.path()).unwrap();
    assert_eq!(reopened.reservations().find(id).unwrap(), cached);
}

#[test]
fn test_table_cannot_shrink_below_booked_party() {
    let (_temp, engine) = setup_engine();
    let id = book(&engine, 3, 6, at(19, 0));

    let mut table = engine.tables().find_by_id(3).unwrap();
    table.capacity = 2;
    assert!(engine.tables().update(table.clone()).unwrap_err().is_capacity());
    assert_eq!(engine.tables().find_by_id(3).unwrap().capacity, 6);

    // A smaller party makes room for the smaller table
    engine
        .reservations()
        .update(id, ReservationUpdate::new().party_size(2))
        .unwrap();
    assert_eq!(engine.tables().update(table).unwrap().capacity, 2);
    assert!(engine
        .availability()
        .validate_assignment_for(3, &engine.reservations().find(id).unwrap().window(), 2, Some(id))
        .is_ok());
}

#[test]
fn test_alternatives_for_rejected_request() {
    let (_temp, engine) = setup_engine();
    book(&engine, 2, 4, at(19, 0));

    let rejected = request(3, at(19, 0)).at_table(2);
    assert!(engine.reservations().create(rejected.clone()).is_err());

    let alternatives = engine.reservations().alternatives_for(&rejected).unwrap();
    let ids: Vec<_> = alternatives.iter().map(|t| t.id.unwrap()).collect();
    // Main's 6-top first, then the patio 4-top
    assert_eq!(ids, vec![3, 4]);
}

// =============================================================================
// Auto Assignment
// =============================================================================

#[test]
fn test_auto_assignment_fills_best_fit_first() {
    let (_temp, engine) = setup_engine();
    let service = engine.reservations();

    let tables: Vec<u64> = (0..3)
        .map(|_| {
            service
                .create_with_auto_assignment(request(3, at(19, 0)))
                .unwrap()
                .reservation
                .table_id
        })
        .collect();

    assert_eq!(tables, vec![2, 4, 3]);
}

#[test]
fn test_auto_assignment_ignores_requested_table() {
    let (_temp, engine) = setup_engine();

    let booked = engine
        .reservations()
        .create_with_auto_assignment(request(2, at(19, 0)).at_table(3))
        .unwrap();

    assert_eq!(booked.reservation.table_id, 1);
}

#[test]
fn test_no_capacity_writes_nothing() {
    let (_temp, engine) = setup_engine();
    let service = engine.reservations();
    for _ in 0..3 {
        service
            .create_with_auto_assignment(request(3, at(19, 0)))
            .unwrap();
    }
    let before = reservations_file(&engine);

    let err = service
        .create_with_auto_assignment(request(3, at(19, 30)))
        .unwrap_err();

    assert!(matches!(
        err,
        SeatwiseError::NoCapacity {
            restaurant_id: 1,
            party_size: 3,
            ..
        }
    ));
    assert_eq!(engine.reservation_store().count(), 3);
    assert_eq!(reservations_file(&engine), before);
}

#[test]
fn test_no_capacity_for_oversized_party() {
    let (_temp, engine) = setup_engine();

    let err = engine
        .reservations()
        .create_with_auto_assignment(request(7, at(19, 0)))
        .unwrap_err();

    assert!(matches!(err, SeatwiseError::NoCapacity { .. }));
}

// =============================================================================
// Editing
// =============================================================================

#[test]
fn test_update_moves_within_own_window() {
    let (_temp, engine) = setup_engine();
    let id = book(&engine, 2, 4, at(19, 0));

    // Overlaps only the reservation being edited
    let moved = engine
        .reservations()
        .update(id, ReservationUpdate::new().starts_at(at(19, 30)))
        .unwrap();

    assert_eq!(moved.reservation.reservation_datetime, at(19, 30));
    assert_eq!(moved.ends_at, at(21, 30));
    assert!(moved.reservation.updated_at >= moved.reservation.created_at);
}

#[test]
fn test_update_rejects_conflict_and_keeps_original() {
    let (_temp, engine) = setup_engine();
    let first = book(&engine, 2, 4, at(19, 0));
    let second = book(&engine, 2, 4, at(21, 0));
    let before = reservations_file(&engine);

    let err = engine
        .reservations()
        .update(second, ReservationUpdate::new().starts_at(at(20, 0)))
        .unwrap_err();

    assert!(matches!(
        err,
        SeatwiseError::Conflict { conflicting_id, .. } if conflicting_id == first
    ));
    assert_eq!(
        engine.reservations().find(second).unwrap().reservation_datetime,
        at(21, 0)
    );
    assert_eq!(reservations_file(&engine), before);
}

#[test]
fn test_update_revalidates_table_and_party() {
    let (_temp, engine) = setup_engine();
    let service = engine.reservations();
    let id = book(&engine, 2, 4, at(19, 0));

    assert!(service
        .update(id, ReservationUpdate::new().party_size(5))
        .unwrap_err()
        .is_capacity());

    assert!(service
        .update(id, ReservationUpdate::new().table(5))
        .unwrap_err()
        .is_validation());

    let moved = service
        .update(id, ReservationUpdate::new().table(3).party_size(5))
        .unwrap();
    assert_eq!(moved.reservation.table_id, 3);
    assert_eq!(moved.section_name.as_deref(), Some("Main"));
}

#[test]
fn test_update_special_requests() {
    let (_temp, engine) = setup_engine();
    let service = engine.reservations();
    let id = book(&engine, 2, 2, at(19, 0));

    let updated = service
        .update(
            id,
            ReservationUpdate::new().special_requests(Some("Window seat".to_string())),
        )
        .unwrap();
    assert_eq!(
        updated.reservation.special_requests.as_deref(),
        Some("Window seat")
    );

    let cleared = service
        .update(id, ReservationUpdate::new().special_requests(None))
        .unwrap();
    assert_eq!(cleared.reservation.special_requests, None);
}

#[test]
fn test_update_unknown_reservation() {
    let (_temp, engine) = setup_engine();

    let err = engine
        .reservations()
        .update(42, ReservationUpdate::new().party_size(2))
        .unwrap_err();

    assert!(err.is_not_found());
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn test_cancel_frees_the_table() {
    let (_temp, engine) = setup_engine();
    let service = engine.reservations();
    let id = book(&engine, 2, 4, at(19, 0));

    let cancelled = service.cancel(id).unwrap();
    assert_eq!(cancelled.status, ReservationStatus::Cancelled);

    book(&engine, 2, 4, at(19, 0));
    assert_eq!(service.active().len(), 1);
}

#[test]
fn test_terminal_states_are_final() {
    let (_temp, engine) = setup_engine();
    let service = engine.reservations();

    let cancelled = book(&engine, 1, 2, at(12, 0));
    let completed = book(&engine, 2, 2, at(12, 0));
    let no_show = book(&engine, 3, 2, at(12, 0));
    service.cancel(cancelled).unwrap();
    service.complete(completed).unwrap();
    service.mark_no_show(no_show).unwrap();
    let before = reservations_file(&engine);

    for id in [cancelled, completed, no_show] {
        for result in [service.cancel(id), service.complete(id), service.mark_no_show(id)] {
            assert!(
                matches!(result, Err(SeatwiseError::InvalidTransition { .. })),
                "reservation {} moved: {:?}",
                id,
                result
            );
        }

        let err = service
            .update(id, ReservationUpdate::new().party_size(1))
            .unwrap_err();
        assert!(matches!(err, SeatwiseError::ReservationClosed { .. }));
    }

    assert_eq!(reservations_file(&engine), before);
}

#[test]
fn test_transition_unknown_reservation() {
    let (_temp, engine) = setup_engine();

    assert!(engine.reservations().cancel(7).unwrap_err().is_not_found());
}

#[test]
fn test_transition_survives_reopen() {
    let (temp, engine) = setup_engine();
    let id = book(&engine, 2, 4, at(19, 0));
    engine.reservations().mark_no_show(id).unwrap();
    drop(engine);

    let reopened = Engine::open_path(temp.path()).unwrap();
    let r = reopened.reservations().find(id).unwrap();
    assert_eq!(r.status, ReservationStatus::NoShow);
    assert!(reopened.availability().is_available(2, at(19, 0)));
}

// =============================================================================
// Queries
// =============================================================================

#[test]
fn test_day_views_and_summary() {
    let (_temp, engine) = setup_engine();
    let service = engine.reservations();

    let late = book(&engine, 2, 4, at(21, 0));
    let early = book(&engine, 1, 2, at(18, 0));
    let other_day = service
        .create(request(2, day().succ_opt().unwrap().and_hms_opt(19, 0, 0).unwrap()).at_table(2))
        .unwrap()
        .id()
        .unwrap();
    let bruno = service
        .create(ReservationRequest::new(2, 1, 5, at(19, 0)).at_table(3))
        .unwrap()
        .id()
        .unwrap();
    service.cancel(early).unwrap();
    service.complete(bruno).unwrap();

    let ids = |rs: Vec<seatwise::Reservation>| rs.iter().map(|r| r.id.unwrap()).collect::<Vec<_>>();

    assert_eq!(ids(service.by_restaurant_on(1, day())), vec![early, bruno, late]);
    assert_eq!(ids(service.by_table_on(2, day())), vec![late]);
    assert_eq!(ids(service.by_customer(2)), vec![bruno]);
    assert_eq!(ids(service.active()), vec![late, other_day]);
    assert_eq!(ids(service.by_status(ReservationStatus::Cancelled)), vec![early]);
    assert_eq!(ids(service.upcoming(1, at(20, 0))), vec![late, other_day]);

    let summary = service.daily_summary(1, day());
    assert_eq!(summary.confirmed, 1);
    assert_eq!(summary.completed, 1);
    assert_eq!(summary.cancelled, 1);
    assert_eq!(summary.no_show, 0);
    assert_eq!(summary.total(), 3);
    // 4 (confirmed) + 5 (completed)
    assert_eq!(summary.covers, 9);
}

#[test]
fn test_details_after_table_deleted() {
    let (_temp, engine) = setup_engine();
    let id = book(&engine, 2, 4, at(19, 0));
    let before = reservations_file(&engine);

    engine.tables().delete_by_id(2).unwrap();

    assert_eq!(reservations_file(&engine), before);
    let details = engine.reservations().details(id).unwrap();
    assert_eq!(details.reservation.table_id, 2);
    assert_eq!(details.table_number, None);
    assert_eq!(details.section_name, None);
    assert_eq!(details.customer_name.as_deref(), Some("Ana Lima"));

    assert!(engine.reservations().details(99).unwrap_err().is_not_found());
}
