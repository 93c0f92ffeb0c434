//! Error types for Seatwise
//!
//! Provides a unified error type for all operations. Scheduling failures
//! (`Conflict`, `Capacity`, `NoCapacity`, `TableInactive`) are distinct
//! variants so callers can pick a different remedy for each.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::model::ReservationStatus;

/// Result type alias using SeatwiseError
pub type Result<T> = std::result::Result<T, SeatwiseError>;

/// Unified error type for Seatwise operations
#[derive(Debug, Error)]
pub enum SeatwiseError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error at '{}': {message}", .path.display())]
    Storage { path: PathBuf, message: String },

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    // -------------------------------------------------------------------------
    // Validation Errors
    // -------------------------------------------------------------------------
    #[error("Validation error on '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Duplicate {entity} {field}: '{value}' is already in use")]
    Duplicate {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    // -------------------------------------------------------------------------
    // Scheduling Errors
    // -------------------------------------------------------------------------
    #[error("Table {table_id} is not active")]
    TableInactive { table_id: u64 },

    #[error("Party of {party_size} exceeds capacity {capacity} of table {table_id}")]
    Capacity {
        table_id: u64,
        capacity: u32,
        party_size: u32,
    },

    #[error("Table {table_id} is already booked at {requested} by reservation {conflicting_id}")]
    Conflict {
        table_id: u64,
        requested: NaiveDateTime,
        conflicting_id: u64,
    },

    #[error("No table in restaurant {restaurant_id} can seat {party_size} at {requested}")]
    NoCapacity {
        restaurant_id: u64,
        requested: NaiveDateTime,
        party_size: u32,
    },

    // -------------------------------------------------------------------------
    // Lifecycle Errors
    // -------------------------------------------------------------------------
    #[error("Reservation {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: u64,
        from: ReservationStatus,
        to: ReservationStatus,
    },

    #[error("Reservation {id} is {status} and can no longer be changed")]
    ReservationClosed { id: u64, status: ReservationStatus },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SeatwiseError {
    /// Build a validation error for a named field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Build a not-found error for an entity id
    pub fn not_found(entity: &'static str, id: u64) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::Duplicate { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    pub fn is_capacity(&self) -> bool {
        matches!(self, Self::Capacity { .. })
    }

    /// Storage failures are the only class a caller may reasonably retry
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Storage { .. })
    }
}
