//! Availability Module
//!
//! Table eligibility, conflict detection and best-fit ranking.
//!
//! ## Overlap Rule
//! Two half-open windows `[s1, e1)` and `[s2, e2)` overlap iff
//! `s1 < e2 && e1 > s2`. Only CONFIRMED reservations take part; every
//! other status frees the table regardless of time.
//!
//! ## Eligibility
//! A table is eligible for a request when it is active, its capacity is at
//! least the party size, and no CONFIRMED reservation on it overlaps the
//! requested window.

mod engine;
mod occupancy;
mod window;

pub use engine::AvailabilityEngine;
pub use occupancy::{check_assignment, order_alternatives, rank_candidates, Occupancy};
pub use window::{checked_end, TimeWindow};
