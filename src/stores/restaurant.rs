use std::ops::Deref;
use std::path::Path;

use crate::config::SyncMode;
use crate::error::Result;
use crate::model::Restaurant;
use crate::storage::TabularStore;

/// Restaurants, keyed by `restaurant_id`
pub struct RestaurantStore {
    store: TabularStore<Restaurant>,
}

impl RestaurantStore {
    pub const FILE_NAME: &'static str = "restaurants.csv";

    pub fn open(path: impl AsRef<Path>, sync_mode: SyncMode) -> Result<Self> {
        Ok(Self {
            store: TabularStore::open_with(path, sync_mode)?,
        })
    }

    /// Case-insensitive exact name match
    pub fn find_by_name(&self, name: &str) -> Option<Restaurant> {
        let name = name.trim().to_lowercase();
        self.store
            .find_one_where(|r| r.name.trim().to_lowercase() == name)
    }
}

impl Deref for RestaurantStore {
    type Target = TabularStore<Restaurant>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}
