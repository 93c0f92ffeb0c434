//! Engine Module
//!
//! Opens every store under one data directory and wires the services.
//!
//! ## Responsibilities
//! - Create the data directory and store files on first run
//! - Own one store per entity type, shared by `Arc`
//! - Build the availability engine and reservation service over those stores

use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::availability::AvailabilityEngine;
use crate::config::Config;
use crate::error::Result;
use crate::reservation::ReservationService;
use crate::stores::{CustomerStore, ReservationStore, RestaurantStore, SectionStore, TableStore};

/// All stores and services of one Seatwise data directory
///
/// ## Concurrency Model
/// Each store has its own lock; `Engine` adds none. Clone the `Arc`
/// accessors to share stores across threads.
pub struct Engine {
    /// Engine configuration
    config: Config,

    restaurants: Arc<RestaurantStore>,
    sections: Arc<SectionStore>,
    tables: Arc<TableStore>,
    customers: Arc<CustomerStore>,
    reservations: Arc<ReservationStore>,

    availability: Arc<AvailabilityEngine>,
    service: ReservationService,
}

impl Engine {
    /// Open or create an engine with the given config
    ///
    /// On startup:
    /// 1. Validate config and create the data directory
    /// 2. Open every store (creating files with headers if absent)
    /// 3. Build the availability engine and reservation service
    pub fn open(config: Config) -> Result<Self> {
        // Step 1: Check config and create data directory
        config.validate()?;
        fs::create_dir_all(&config.data_dir)?;

        // Step 2: Open stores (paths derived from data_dir, not configurable)
        let dir = &config.data_dir;
        let sync = config.sync_mode;
        let restaurants = Arc::new(RestaurantStore::open(
            dir.join(RestaurantStore::FILE_NAME),
            sync,
        )?);
        let sections = Arc::new(SectionStore::open(dir.join(SectionStore::FILE_NAME), sync)?);
        let reservations = Arc::new(ReservationStore::open(
            dir.join(ReservationStore::FILE_NAME),
            sync,
        )?);
        let tables = Arc::new(TableStore::open_guarded(
            dir.join(TableStore::FILE_NAME),
            sync,
            Arc::clone(&reservations),
        )?);
        let customers = Arc::new(CustomerStore::open(dir.join(CustomerStore::FILE_NAME), sync)?);

        // Step 3: Wire services
        let availability = Arc::new(AvailabilityEngine::new(
            Arc::clone(&tables),
            Arc::clone(&sections),
            Arc::clone(&reservations),
            config.default_duration_minutes,
        ));
        let service = ReservationService::new(
            Arc::clone(&customers),
            Arc::clone(&restaurants),
            Arc::clone(&sections),
            Arc::clone(&tables),
            Arc::clone(&reservations),
            Arc::clone(&availability),
        );

        tracing::debug!(
            "Engine opened at {}: {} restaurants, {} tables, {} customers, {} reservations",
            config.data_dir.display(),
            restaurants.count(),
            tables.count(),
            customers.count(),
            reservations.count()
        );

        Ok(Self {
            config,
            restaurants,
            sections,
            tables,
            customers,
            reservations,
            availability,
            service,
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().data_dir(path).build())
    }

    /// Re-read every store file from disk
    pub fn reload_all(&self) -> Result<()> {
        self.restaurants.reload()?;
        self.sections.reload()?;
        self.tables.reload()?;
        self.customers.reload()?;
        self.reservations.reload()?;
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn restaurants(&self) -> &Arc<RestaurantStore> {
        &self.restaurants
    }

    pub fn sections(&self) -> &Arc<SectionStore> {
        &self.sections
    }

    pub fn tables(&self) -> &Arc<TableStore> {
        &self.tables
    }

    pub fn customers(&self) -> &Arc<CustomerStore> {
        &self.customers
    }

    pub fn reservation_store(&self) -> &Arc<ReservationStore> {
        &self.reservations
    }

    pub fn availability(&self) -> &Arc<AvailabilityEngine> {
        &self.availability
    }

    pub fn reservations(&self) -> &ReservationService {
        &self.service
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
