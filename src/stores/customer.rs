use std::ops::Deref;
use std::path::Path;

use crate::config::SyncMode;
use crate::error::{Result, SeatwiseError};
use crate::model::Customer;
use crate::storage::{StoreTxn, TabularStore};

/// Customers, keyed by `customer_id`
///
/// Emails are unique across the store, compared case-insensitively.
pub struct CustomerStore {
    store: TabularStore<Customer>,
}

impl CustomerStore {
    pub const FILE_NAME: &'static str = "customers.csv";

    pub fn open(path: impl AsRef<Path>, sync_mode: SyncMode) -> Result<Self> {
        Ok(Self {
            store: TabularStore::open_with(path, sync_mode)?,
        })
    }

    // =========================================================================
    // Writes
    // =========================================================================

    pub fn save(&self, customer: Customer) -> Result<Customer> {
        self.store.write(|txn| {
            Self::check_email(txn, &customer)?;
            txn.insert(customer)
        })
    }

    pub fn save_all(&self, customers: Vec<Customer>) -> Result<Vec<Customer>> {
        self.store.write(|txn| {
            customers
                .into_iter()
                .map(|customer| {
                    Self::check_email(txn, &customer)?;
                    txn.insert(customer)
                })
                .collect()
        })
    }

    pub fn update(&self, customer: Customer) -> Result<Customer> {
        self.store.write(|txn| {
            Self::check_email(txn, &customer)?;
            txn.replace(customer)
        })
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn find_by_email(&self, email: &str) -> Option<Customer> {
        let email = email_key(email);
        self.store.find_one_where(|c| email_key(&c.email) == email)
    }

    pub fn find_by_restaurant(&self, restaurant_id: u64) -> Vec<Customer> {
        self.store
            .find_where(|c| c.restaurant_id == restaurant_id)
    }

    /// Case-insensitive substring match on first or last name
    pub fn search_by_name(&self, fragment: &str) -> Vec<Customer> {
        let fragment = fragment.trim().to_lowercase();
        if fragment.is_empty() {
            return Vec::new();
        }
        self.store.find_where(|c| {
            c.first_name.to_lowercase().contains(&fragment)
                || c.last_name.to_lowercase().contains(&fragment)
        })
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn check_email(txn: &StoreTxn<'_, Customer>, customer: &Customer) -> Result<()> {
        let email = email_key(&customer.email);
        let taken = txn
            .records()
            .any(|other| other.id != customer.id && email_key(&other.email) == email);
        if taken {
            return Err(SeatwiseError::Duplicate {
                entity: "Customer",
                field: "email",
                value: customer.email.clone(),
            });
        }
        Ok(())
    }
}

/// Comparison form of an email address
fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

impl Deref for CustomerStore {
    type Target = TabularStore<Customer>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}
