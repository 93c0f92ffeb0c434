//! Key/value view of one record row

use std::str::FromStr;

use chrono::NaiveDateTime;

use crate::error::{Result, SeatwiseError};

use super::validate::{format_timestamp, parse_id, parse_timestamp};

/// A flat, ordered column → value row
///
/// Built by a record's `to_row()` for writing, or from a file's header and
/// field list for reading. Empty values stand for "absent".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    entries: Vec<(String, String)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zip a header with a decoded field list
    pub fn from_fields<S: AsRef<str>>(header: &[S], fields: Vec<String>) -> Self {
        let entries = header
            .iter()
            .map(|h| h.as_ref().to_string())
            .zip(fields)
            .collect();
        Self { entries }
    }

    // =========================================================================
    // Building
    // =========================================================================

    pub fn with(mut self, column: &str, value: impl Into<String>) -> Self {
        self.entries.push((column.to_string(), value.into()));
        self
    }

    pub fn with_id(self, column: &str, id: Option<u64>) -> Self {
        self.with(column, id.map(|v| v.to_string()).unwrap_or_default())
    }

    pub fn with_optional(self, column: &str, value: Option<&str>) -> Self {
        self.with(column, value.unwrap_or_default())
    }

    pub fn with_timestamp(self, column: &str, value: &NaiveDateTime) -> Self {
        self.with(column, format_timestamp(value))
    }

    pub fn with_optional_timestamp(self, column: &str, value: Option<&NaiveDateTime>) -> Self {
        self.with(column, value.map(format_timestamp).unwrap_or_default())
    }

    // =========================================================================
    // Reading
    // =========================================================================

    /// Raw value of a column, if the row has it
    pub fn get(&self, column: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == column)
    }

    /// Values in the given column order (missing columns become empty)
    pub fn values_for(&self, columns: &[&str]) -> Vec<String> {
        columns
            .iter()
            .map(|c| self.get(c).unwrap_or_default().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Non-empty value, or a validation error naming the column
    pub fn required(&self, column: &str) -> Result<&str> {
        match self.get(column) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(SeatwiseError::validation(column, "is required")),
        }
    }

    /// `None` when the column is missing or empty
    pub fn optional(&self, column: &str) -> Option<String> {
        self.get(column)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn id(&self, column: &str) -> Result<u64> {
        parse_id(column, self.required(column)?)
    }

    pub fn optional_id(&self, column: &str) -> Result<Option<u64>> {
        match self.get(column) {
            Some(raw) if !raw.trim().is_empty() => parse_id(column, raw).map(Some),
            _ => Ok(None),
        }
    }

    pub fn parse<T: FromStr>(&self, column: &str) -> Result<T> {
        let raw = self.required(column)?;
        raw.trim().parse().map_err(|_| {
            SeatwiseError::validation(column, format!("'{}' has the wrong format", raw))
        })
    }

    pub fn optional_parse<T: FromStr>(&self, column: &str) -> Result<Option<T>> {
        match self.get(column) {
            Some(raw) if !raw.trim().is_empty() => self.parse(column).map(Some),
            _ => Ok(None),
        }
    }

    pub fn timestamp(&self, column: &str) -> Result<NaiveDateTime> {
        parse_timestamp(column, self.required(column)?)
    }

    pub fn optional_timestamp(&self, column: &str) -> Result<Option<NaiveDateTime>> {
        match self.get(column) {
            Some(raw) if !raw.trim().is_empty() => parse_timestamp(column, raw).map(Some),
            _ => Ok(None),
        }
    }

    /// `true`/`false` (any case), also `1`/`0`
    pub fn boolean(&self, column: &str) -> Result<bool> {
        let raw = self.required(column)?;
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(SeatwiseError::validation(
                column,
                format!("'{}' is not a boolean", raw),
            )),
        }
    }
}
