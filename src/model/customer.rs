use serde::Serialize;

use crate::codec::{require_text, validate_email, validate_phone, Record, Row};
use crate::error::{Result, SeatwiseError};

/// A guest profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    pub id: Option<u64>,
    pub first_name: String,
    pub last_name: String,
    /// Unique across the customer store (case-insensitive)
    pub email: String,
    pub phone: String,
    pub allergies: Option<String>,
    pub notes: Option<String>,
    pub restaurant_id: u64,
}

impl Customer {
    pub fn new(
        restaurant_id: u64,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: phone.into(),
            allergies: None,
            notes: None,
            restaurant_id,
        }
    }

    pub fn with_allergies(mut self, allergies: impl Into<String>) -> Self {
        self.allergies = super::non_empty(Some(allergies.into()));
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = super::non_empty(Some(notes.into()));
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Record for Customer {
    const ENTITY: &'static str = "Customer";
    const COLUMNS: &'static [&'static str] = &[
        "customer_id",
        "first_name",
        "last_name",
        "email",
        "phone",
        "allergies",
        "notes",
        "restaurant_id",
    ];

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }

    fn validate(&self) -> Result<()> {
        require_text("first_name", &self.first_name)?;
        require_text("last_name", &self.last_name)?;
        require_text("email", &self.email)?;
        validate_email("email", &self.email)?;
        require_text("phone", &self.phone)?;
        validate_phone("phone", &self.phone)?;
        if self.restaurant_id == 0 {
            return Err(SeatwiseError::validation("restaurant_id", "is required"));
        }
        Ok(())
    }

    fn to_row(&self) -> Row {
        Row::new()
            .with_id("customer_id", self.id)
            .with("first_name", self.first_name.as_str())
            .with("last_name", self.last_name.as_str())
            .with("email", self.email.as_str())
            .with("phone", self.phone.as_str())
            .with_optional("allergies", self.allergies.as_deref())
            .with_optional("notes", self.notes.as_deref())
            .with("restaurant_id", self.restaurant_id.to_string())
    }

    fn from_row(row: &Row) -> Result<Self> {
        let customer = Self {
            id: row.optional_id("customer_id")?,
            first_name: row.required("first_name")?.to_string(),
            last_name: row.required("last_name")?.to_string(),
            email: row.required("email")?.to_string(),
            phone: row.required("phone")?.to_string(),
            allergies: row.optional("allergies"),
            notes: row.optional("notes"),
            restaurant_id: row.id("restaurant_id")?,
        };
        customer.validate()?;
        Ok(customer)
    }
}
