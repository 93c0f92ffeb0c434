//! Record Codec Tests
//!
//! These tests verify:
//! - Each entity's row encoding and decoding
//! - Validation on decode (bad emails, zero ids, unknown statuses)
//! - Defaults for columns missing from older files
//! - Reservation status transitions

use chrono::{NaiveDate, NaiveDateTime};
use seatwise::codec::{Record, Row};
use seatwise::{Customer, Reservation, ReservationStatus, Restaurant, Section, Table};

// =============================================================================
// Helper Functions
// =============================================================================

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

/// Re-read a record from the columns it would be written with
fn reread<R: Record>(record: &R) -> R {
    let row = record.to_row();
    let fields = row.values_for(R::COLUMNS);
    R::from_row(&Row::from_fields(R::COLUMNS, fields)).unwrap()
}

fn reservation_row(status: &str) -> Row {
    Row::new()
        .with("reservation_id", "5")
        .with("customer_id", "1")
        .with("restaurant_id", "1")
        .with("table_id", "3")
        .with("party_size", "2")
        .with("reservation_datetime", "2024-06-01T19:00:00")
        .with("status", status)
        .with("special_requests", "")
        .with("created_at", "2024-05-20T10:00:00")
        .with("updated_at", "2024-05-20T10:00:00")
}

// =============================================================================
// Restaurant / Section / Table
// =============================================================================

#[test]
fn test_restaurant_columns() {
    assert_eq!(
        Restaurant::COLUMNS,
        &["restaurant_id", "name", "address", "phone", "email"]
    );
    assert_eq!(Restaurant::id_column(), "restaurant_id");
}

#[test]
fn test_restaurant_optional_fields() {
    let mut restaurant = Restaurant::new("Chez Nous").with_phone("+33 1 23 45 67 89");
    restaurant.set_id(1);

    let row = restaurant.to_row();
    assert_eq!(row.get("address"), Some(""));
    assert_eq!(row.get("email"), Some(""));

    let back = reread(&restaurant);
    assert_eq!(back, restaurant);
    assert_eq!(back.address, None);
}

#[test]
fn test_restaurant_requires_name() {
    assert!(Restaurant::new("   ").validate().unwrap_err().is_validation());
}

#[test]
fn test_restaurant_rejects_bad_contact_details() {
    assert!(Restaurant::new("Bistro").with_email("nope").validate().is_err());
    assert!(Restaurant::new("Bistro").with_phone("12").validate().is_err());
}

#[test]
fn test_section_round_trip() {
    let mut section = Section::new(2, "Terrace")
        .with_num_tables(6)
        .with_notes("Heated, closes in rain");
    section.set_id(4);

    assert_eq!(reread(&section), section);
}

#[test]
fn test_table_decodes_inactive_flag() {
    let row = Row::new()
        .with("table_id", "9")
        .with("section_id", "2")
        .with("table_number", "12")
        .with("capacity", "6")
        .with("is_active", "false");

    let table = Table::from_row(&row).unwrap();
    assert_eq!(table.id, Some(9));
    assert!(!table.is_active);
    assert!(table.can_seat(6));
    assert!(!table.can_seat(7));
}

#[test]
fn test_table_rejects_zero_capacity() {
    assert!(Table::new(1, 1, 0).validate().unwrap_err().is_validation());
    assert!(Table::new(0, 1, 2).validate().is_err());
}

// =============================================================================
// Customer
// =============================================================================

#[test]
fn test_customer_round_trip_with_awkward_text() {
    let mut customer = Customer::new(1, "Ana", "Lima", "ana@example.com", "555-123-4567")
        .with_allergies("peanuts, shellfish")
        .with_notes("Prefers \"quiet\" tables\nby the window");
    customer.set_id(3);

    assert_eq!(reread(&customer), customer);
    assert_eq!(customer.full_name(), "Ana Lima");
}

#[test]
fn test_customer_blank_optional_text_is_absent() {
    let customer = Customer::new(1, "Ana", "Lima", "ana@example.com", "555-123-4567")
        .with_allergies("  ");
    assert_eq!(customer.allergies, None);
}

#[test]
fn test_customer_decode_rejects_bad_email() {
    let row = Row::new()
        .with("customer_id", "1")
        .with("first_name", "Ana")
        .with("last_name", "Lima")
        .with("email", "not-an-email")
        .with("phone", "555-123-4567")
        .with("allergies", "")
        .with("notes", "")
        .with("restaurant_id", "1");

    let err = Customer::from_row(&row).unwrap_err();
    assert!(err.is_validation());
}

// =============================================================================
// Reservation
// =============================================================================

#[test]
fn test_reservation_new_is_confirmed() {
    let r = Reservation::new(1, 2, 3, 4, at(19, 0));
    assert_eq!(r.status, ReservationStatus::Confirmed);
    assert_eq!(r.duration_minutes, 120);
    assert_eq!(r.ends_at(), at(21, 0));
    assert!(r.updated_at >= r.created_at);
    assert!(r.validate().is_ok());
}

#[test]
fn test_reservation_round_trip() {
    let mut r = Reservation::new(1, 2, 3, 4, at(19, 0))
        .with_duration(90)
        .with_special_requests(Some("Birthday, bring candles".to_string()));
    r.set_id(11);

    let back = reread(&r);
    assert_eq!(back, r);
    assert_eq!(back.window().end, at(20, 30));
}

#[test]
fn test_reservation_missing_duration_defaults() {
    // Rows written without the duration column
    let r = Reservation::from_row(&reservation_row("CONFIRMED")).unwrap();
    assert_eq!(r.duration_minutes, 120);
    assert_eq!(r.special_requests, None);
}

#[test]
fn test_reservation_status_is_case_insensitive() {
    let r = Reservation::from_row(&reservation_row("no_show")).unwrap();
    assert_eq!(r.status, ReservationStatus::NoShow);
}

#[test]
fn test_reservation_unknown_status() {
    let err = Reservation::from_row(&reservation_row("SEATED")).unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_reservation_rejects_updated_before_created() {
    let mut r = Reservation::from_row(&reservation_row("CONFIRMED")).unwrap();
    r.updated_at = r.created_at - chrono::Duration::seconds(1);
    assert!(r.validate().is_err());
}

#[test]
fn test_reservation_rejects_zero_party() {
    let r = Reservation::new(1, 2, 3, 0, at(19, 0));
    assert!(r.validate().unwrap_err().is_validation());
}

// =============================================================================
// Status Tests
// =============================================================================

#[test]
fn test_status_transitions() {
    use ReservationStatus::*;

    for to in [Completed, NoShow, Cancelled] {
        assert!(Confirmed.can_transition_to(to));
    }
    assert!(!Confirmed.can_transition_to(Confirmed));

    for from in [Completed, NoShow, Cancelled] {
        for to in ReservationStatus::ALL {
            assert!(!from.can_transition_to(to), "{} -> {}", from, to);
        }
    }
}

#[test]
fn test_status_text_forms() {
    assert_eq!(ReservationStatus::NoShow.to_string(), "NO_SHOW");
    assert_eq!(
        "cancelled".parse::<ReservationStatus>().unwrap(),
        ReservationStatus::Cancelled
    );
    assert_eq!(
        serde_json::to_string(&ReservationStatus::NoShow).unwrap(),
        "\"NO_SHOW\""
    );
}
