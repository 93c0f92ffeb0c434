use serde::Serialize;

use crate::codec::{Record, Row};
use crate::error::{Result, SeatwiseError};

/// A bookable table inside a section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub id: Option<u64>,
    pub section_id: u64,
    /// Unique within the owning section
    pub table_number: u32,
    pub capacity: u32,
    /// Inactive tables keep their history but take no new bookings
    pub is_active: bool,
}

impl Table {
    pub fn new(section_id: u64, table_number: u32, capacity: u32) -> Self {
        Self {
            id: None,
            section_id,
            table_number,
            capacity,
            is_active: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Capacity check only; says nothing about time conflicts
    pub fn can_seat(&self, party_size: u32) -> bool {
        self.capacity >= party_size
    }
}

impl Record for Table {
    const ENTITY: &'static str = "Table";
    const COLUMNS: &'static [&'static str] =
        &["table_id", "section_id", "table_number", "capacity", "is_active"];

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }

    fn validate(&self) -> Result<()> {
        if self.section_id == 0 {
            return Err(SeatwiseError::validation("section_id", "is required"));
        }
        if self.table_number == 0 {
            return Err(SeatwiseError::validation("table_number", "must be positive"));
        }
        if self.capacity == 0 {
            return Err(SeatwiseError::validation("capacity", "must be positive"));
        }
        Ok(())
    }

    fn to_row(&self) -> Row {
        Row::new()
            .with_id("table_id", self.id)
            .with("section_id", self.section_id.to_string())
            .with("table_number", self.table_number.to_string())
            .with("capacity", self.capacity.to_string())
            .with("is_active", self.is_active.to_string())
    }

    fn from_row(row: &Row) -> Result<Self> {
        let table = Self {
            id: row.optional_id("table_id")?,
            section_id: row.id("section_id")?,
            table_number: row.parse("table_number")?,
            capacity: row.parse("capacity")?,
            is_active: row.boolean("is_active")?,
        };
        table.validate()?;
        Ok(table)
    }
}
