//! Model Module
//!
//! Entity types and their record codecs.
//!
//! ```text
//! Restaurant ──< Section ──< Table
//!     │                        │
//!     └──< Customer            │
//!             │                │
//!             └──< Reservation >┘
//! ```

mod customer;
mod reservation;
mod restaurant;
mod section;
mod table;

pub use customer::Customer;
pub use reservation::{Reservation, ReservationStatus};
pub use restaurant::Restaurant;
pub use section::Section;
pub use table::Table;

use chrono::{NaiveDateTime, Timelike};

/// Current local time, truncated to whole seconds
///
/// Timestamps are stored at second precision, so anything compared after a
/// reload must not carry sub-second parts.
pub fn now() -> NaiveDateTime {
    whole_seconds(chrono::Local::now().naive_local())
}

/// Drop any sub-second part of `value`
pub fn whole_seconds(value: NaiveDateTime) -> NaiveDateTime {
    value.with_nanosecond(0).unwrap_or(value)
}

/// Drop empty strings so "absent" has a single representation
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
