use serde::Serialize;

use crate::codec::{require_text, Record, Row};
use crate::error::{Result, SeatwiseError};

/// A named area of a restaurant (patio, bar, main room)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub id: Option<u64>,
    pub restaurant_id: u64,
    pub name: String,
    /// Declared table count; informational, not enforced against the table store
    pub num_tables: Option<u32>,
    pub notes: Option<String>,
}

impl Section {
    pub fn new(restaurant_id: u64, name: impl Into<String>) -> Self {
        Self {
            id: None,
            restaurant_id,
            name: name.into(),
            num_tables: None,
            notes: None,
        }
    }

    pub fn with_num_tables(mut self, count: u32) -> Self {
        self.num_tables = Some(count);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = super::non_empty(Some(notes.into()));
        self
    }
}

impl Record for Section {
    const ENTITY: &'static str = "Section";
    const COLUMNS: &'static [&'static str] =
        &["section_id", "restaurant_id", "name", "num_tables", "notes"];

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }

    fn validate(&self) -> Result<()> {
        if self.restaurant_id == 0 {
            return Err(SeatwiseError::validation("restaurant_id", "is required"));
        }
        require_text("name", &self.name)
    }

    fn to_row(&self) -> Row {
        Row::new()
            .with_id("section_id", self.id)
            .with("restaurant_id", self.restaurant_id.to_string())
            .with("name", self.name.as_str())
            .with(
                "num_tables",
                self.num_tables.map(|n| n.to_string()).unwrap_or_default(),
            )
            .with_optional("notes", self.notes.as_deref())
    }

    fn from_row(row: &Row) -> Result<Self> {
        let section = Self {
            id: row.optional_id("section_id")?,
            restaurant_id: row.id("restaurant_id")?,
            name: row.required("name")?.to_string(),
            num_tables: row.optional_parse("num_tables")?,
            notes: row.optional("notes"),
        };
        section.validate()?;
        Ok(section)
    }
}
