//! Configuration for Seatwise
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, SeatwiseError};

/// Occupancy window assumed for a reservation when none is given
pub const DEFAULT_DURATION_MINUTES: u32 = 120;

/// Main configuration for a Seatwise instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all data files
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── restaurants.csv
    ///     ├── sections.csv
    ///     ├── tables.csv
    ///     ├── customers.csv
    ///     └── reservations.csv
    pub data_dir: PathBuf,

    /// Whether each whole-file rewrite is fsynced before it is published
    pub sync_mode: SyncMode,

    // -------------------------------------------------------------------------
    // Scheduling Configuration
    // -------------------------------------------------------------------------
    /// Duration (minutes) given to new reservations that do not state one
    pub default_duration_minutes: u32,
}

/// Sync strategy for store rewrites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// fsync the temp file and its directory on every rewrite (safest)
    Always,

    /// Rely on rename atomicity only (tests, bulk imports)
    Never,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./seatwise_data"),
            sync_mode: SyncMode::Always,
            default_duration_minutes: DEFAULT_DURATION_MINUTES,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.default_duration_minutes == 0 {
            return Err(SeatwiseError::Config(
                "default reservation duration must be at least one minute".to_string(),
            ));
        }
        if self.data_dir.as_os_str().is_empty() {
            return Err(SeatwiseError::Config("data directory is empty".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for all store files)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the sync mode used for whole-file rewrites
    pub fn sync_mode(mut self, mode: SyncMode) -> Self {
        self.config.sync_mode = mode;
        self
    }

    /// Set the default reservation duration (in minutes)
    pub fn default_duration_minutes(mut self, minutes: u32) -> Self {
        self.config.default_duration_minutes = minutes;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
