use serde::Serialize;

use crate::codec::{require_text, validate_email, validate_phone, Record, Row};
use crate::error::Result;

/// A restaurant: the root owner of sections, tables and customers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Restaurant {
    pub id: Option<u64>,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Restaurant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            address: None,
            phone: None,
            email: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = super::non_empty(Some(address.into()));
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = super::non_empty(Some(phone.into()));
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = super::non_empty(Some(email.into()));
        self
    }
}

impl Record for Restaurant {
    const ENTITY: &'static str = "Restaurant";
    const COLUMNS: &'static [&'static str] = &["restaurant_id", "name", "address", "phone", "email"];

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }

    fn validate(&self) -> Result<()> {
        require_text("name", &self.name)?;
        if let Some(phone) = &self.phone {
            validate_phone("phone", phone)?;
        }
        if let Some(email) = &self.email {
            validate_email("email", email)?;
        }
        Ok(())
    }

    fn to_row(&self) -> Row {
        Row::new()
            .with_id("restaurant_id", self.id)
            .with("name", self.name.as_str())
            .with_optional("address", self.address.as_deref())
            .with_optional("phone", self.phone.as_deref())
            .with_optional("email", self.email.as_deref())
    }

    fn from_row(row: &Row) -> Result<Self> {
        let restaurant = Self {
            id: row.optional_id("restaurant_id")?,
            name: row.required("name")?.to_string(),
            address: row.optional("address"),
            phone: row.optional("phone"),
            email: row.optional("email"),
        };
        restaurant.validate()?;
        Ok(restaurant)
    }
}
