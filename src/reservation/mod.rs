//! Reservation Module
//!
//! The reservation lifecycle on top of the availability engine.
//!
//! ## Responsibilities
//! - Validate referenced customer/restaurant/table before booking
//! - Book a requested table or the best-fit table, atomically with the
//!   conflict check
//! - Re-validate edits of CONFIRMED reservations
//! - Move reservations into CANCELLED, COMPLETED or NO_SHOW
//! - Day views, per-customer history and summaries

mod request;
mod service;
mod view;

pub use request::{ReservationRequest, ReservationUpdate};
pub use service::ReservationService;
pub use view::{DailySummary, ReservationDetails};
