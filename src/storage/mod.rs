//! Storage Module
//!
//! Persistent record storage over flat delimited files.
//!
//! ## Responsibilities
//! - One file per record type, header row first
//! - In-memory cache keyed by id, loaded at open
//! - Whole-file atomic rewrite on every mutation (no appends, no WAL)
//! - Predicate and field-name queries over the cache
//!
//! ## File Layout
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ table_id,section_id,table_number,capacity,...│  ← header
//! ├──────────────────────────────────────────────┤
//! │ 1,1,1,2,true                                 │
//! │ 2,1,2,4,true                                 │  ← one row per record,
//! │ 3,2,1,6,false                                │    ascending by id
//! └──────────────────────────────────────────────┘
//! ```

mod file;
mod query;
mod store;

pub use file::FlatFile;
pub use query::FieldCriteria;
pub use store::{LoadStats, StoreTxn, TabularStore};
