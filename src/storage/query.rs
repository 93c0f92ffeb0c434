//! String-keyed query adapter
//!
//! `TabularStore::find_where` with a closure is the primary query API.
//! `FieldCriteria` matches column names against a record's encoded row for
//! callers that only have field names at hand (import tools, the CLI).

use crate::codec::{Record, Row};
use crate::error::{Result, SeatwiseError};

/// AND-combined `column == value` conditions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldCriteria {
    conditions: Vec<(String, String)>,
}

impl FieldCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition
    pub fn and(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions.push((column.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Reject column names the record type does not have
    pub fn check_columns<R: Record>(&self) -> Result<()> {
        for (column, _) in &self.conditions {
            if !R::COLUMNS.contains(&column.as_str()) {
                return Err(SeatwiseError::validation(
                    column.as_str(),
                    format!("{} has no such field", R::ENTITY),
                ));
            }
        }
        Ok(())
    }

    /// Whether every condition holds for the row (empty criteria match all)
    pub fn matches(&self, row: &Row) -> bool {
        self.conditions
            .iter()
            .all(|(column, value)| row.get(column) == Some(value.as_str()))
    }

    pub fn matches_record<R: Record>(&self, record: &R) -> bool {
        self.matches(&record.to_row())
    }
}

impl<K, V> FromIterator<(K, V)> for FieldCriteria
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            conditions: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
