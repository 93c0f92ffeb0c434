//! # Seatwise
//!
//! Restaurant seating and reservations over flat-file record stores:
//! - Generic cached record store with whole-file atomic rewrites
//! - Per-store locking; check-then-book runs in one critical section
//! - Conflict-free table assignment with best-fit selection
//! - Reservation lifecycle (CONFIRMED → CANCELLED / COMPLETED / NO_SHOW)
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   ReservationService                         │
//! │        (validate → check + book under one lock)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  AvailabilityEngine                          │
//! │        (overlap rule, best-fit ranking, alternatives)        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!     ┌─────────┬───────┴─────┬────────────┬──────────────┐
//!     ▼         ▼             ▼            ▼              ▼
//! Restaurant  Section       Table      Customer     Reservation    Domain Stores
//!     └─────────┴───────┬─────┴────────────┴──────────────┘
//!                       ▼
//!               ┌───────────────┐
//!               │ TabularStore  │  RwLock + cache, one per entity
//!               └───────┬───────┘
//!                       ▼
//!               ┌───────────────┐
//!               │ Record Codec  │  typed record ⇄ delimited row
//!               └───────┬───────┘
//!                       ▼
//!               ┌───────────────┐
//!               │   FlatFile    │  temp file + rename
//!               └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod availability;
pub mod codec;
pub mod engine;
pub mod model;
pub mod reservation;
pub mod storage;
pub mod stores;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use availability::{AvailabilityEngine, TimeWindow};
pub use config::{Config, SyncMode};
pub use engine::Engine;
pub use error::{Result, SeatwiseError};
pub use model::{Customer, Reservation, ReservationStatus, Restaurant, Section, Table};
pub use reservation::{ReservationDetails, ReservationRequest, ReservationService, ReservationUpdate};
pub use storage::TabularStore;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of Seatwise
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
