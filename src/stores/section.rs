use std::ops::Deref;
use std::path::Path;

use crate::config::SyncMode;
use crate::error::Result;
use crate::model::Section;
use crate::storage::TabularStore;

/// Restaurant sections, keyed by `section_id`
pub struct SectionStore {
    store: TabularStore<Section>,
}

impl SectionStore {
    pub const FILE_NAME: &'static str = "sections.csv";

    pub fn open(path: impl AsRef<Path>, sync_mode: SyncMode) -> Result<Self> {
        Ok(Self {
            store: TabularStore::open_with(path, sync_mode)?,
        })
    }

    pub fn find_by_restaurant(&self, restaurant_id: u64) -> Vec<Section> {
        self.store
            .find_where(|s| s.restaurant_id == restaurant_id)
    }

    /// Case-insensitive name match within one restaurant
    pub fn find_by_name(&self, restaurant_id: u64, name: &str) -> Option<Section> {
        let name = name.trim().to_lowercase();
        self.store.find_one_where(|s| {
            s.restaurant_id == restaurant_id && s.name.trim().to_lowercase() == name
        })
    }

    /// Owning restaurant of a section
    pub fn restaurant_of(&self, section_id: u64) -> Option<u64> {
        self.store
            .find_by_id(section_id)
            .map(|s| s.restaurant_id)
    }

    /// Ids of every section of a restaurant
    pub fn section_ids(&self, restaurant_id: u64) -> Vec<u64> {
        self.find_by_restaurant(restaurant_id)
            .into_iter()
            .filter_map(|s| s.id)
            .collect()
    }
}

impl Deref for SectionStore {
    type Target = TabularStore<Section>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}
