//! Record Codec Module
//!
//! Converts between typed records and flat key/value rows.
//!
//! ## Responsibilities
//! - Define the `Record` contract every stored entity implements
//! - Tokenize and render delimited lines (quoting, multi-line fields)
//! - Validate required fields and primitive formats (email, id, timestamp)
//!
//! The store never inspects a record's fields directly: it only goes
//! through `to_row()` / `from_row()` / `validate()`.

mod line;
mod row;
mod validate;

pub use line::{decode_document, encode_document, encode_line, RawRow, DELIMITER};
pub use row::Row;
pub use validate::{
    format_timestamp, parse_id, parse_timestamp, require_text, validate_email, validate_phone,
    TIMESTAMP_FORMAT,
};

use crate::error::Result;

/// A typed entity that can live in a `TabularStore`
pub trait Record: Clone + Send + Sync + 'static {
    /// Entity name used in errors and logs ("Table", "Reservation", ...)
    const ENTITY: &'static str;

    /// Persisted column order; the first column is the identifier
    const COLUMNS: &'static [&'static str];

    /// Identifier, `None` before the first save
    fn id(&self) -> Option<u64>;

    fn set_id(&mut self, id: u64);

    /// Reject structurally invalid records before they reach disk
    fn validate(&self) -> Result<()>;

    fn to_row(&self) -> Row;

    fn from_row(row: &Row) -> Result<Self>;

    /// Name of the identifier column
    fn id_column() -> &'static str {
        Self::COLUMNS[0]
    }
}
