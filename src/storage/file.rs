//! Flat file primitive
//!
//! Reads a whole store file and replaces it atomically.
//!
//! ## Overwrite protocol
//! 1. Write the full contents to `.{name}.tmp` next to the target
//! 2. fsync the temp file (`SyncMode::Always`)
//! 3. Rename over the target
//! 4. fsync the parent directory (`SyncMode::Always`, unix only)
//!
//! A reader (or a crash) sees either the old or the new file, never a mix.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::config::SyncMode;
use crate::error::{Result, SeatwiseError};

/// One backing file of a store
#[derive(Debug)]
pub struct FlatFile {
    path: PathBuf,
    sync_mode: SyncMode,
}

impl FlatFile {
    pub fn new(path: impl Into<PathBuf>, sync_mode: SyncMode) -> Self {
        Self {
            path: path.into(),
            sync_mode,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Create the file with `initial` contents if it is missing or empty
    ///
    /// Also removes a temp file left behind by an interrupted overwrite.
    /// Returns `true` when the file was (re)initialized.
    pub fn ensure(&self, initial: &str) -> Result<bool> {
        if let Some(parent) = self.parent_dir() {
            fs::create_dir_all(parent).map_err(|e| self.storage_error("create directory", e))?;
        }

        let temp = self.temp_path();
        if temp.exists() {
            tracing::warn!("Removing stale temp file {}", temp.display());
            fs::remove_file(&temp).map_err(|e| self.storage_error("remove stale temp file", e))?;
        }

        let is_empty = match fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == ErrorKind::NotFound => true,
            Err(e) => return Err(self.storage_error("stat", e)),
        };

        if is_empty {
            self.overwrite(initial)?;
        }
        Ok(is_empty)
    }

    /// Read the whole file as UTF-8 text
    pub fn read_all(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|e| self.storage_error("read", e))
    }

    /// Atomically replace the file contents
    pub fn overwrite(&self, contents: &str) -> Result<()> {
        let temp = self.temp_path();

        // Step 1: Write to temporary file
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&temp)
            .map_err(|e| self.storage_error("open temp file", e))?;
        file.write_all(contents.as_bytes())
            .map_err(|e| self.storage_error("write temp file", e))?;

        // Step 2: fsync the file
        if self.sync_mode == SyncMode::Always {
            file.sync_all()
                .map_err(|e| self.storage_error("sync temp file", e))?;
        }
        drop(file);

        // Step 3: Atomic rename
        if let Err(e) = fs::rename(&temp, &self.path) {
            let _ = fs::remove_file(&temp);
            return Err(self.storage_error("rename temp file", e));
        }

        // Step 4: fsync parent directory
        if self.sync_mode == SyncMode::Always {
            self.sync_parent_dir()?;
        }

        Ok(())
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }

    /// ".reservations.csv.tmp" next to "reservations.csv"
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "store".to_string());
        self.path.with_file_name(format!(".{}.tmp", name))
    }

    #[cfg(unix)]
    fn sync_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.parent_dir() {
            File::open(parent)
                .and_then(|dir| dir.sync_all())
                .map_err(|e| self.storage_error("sync directory", e))?;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn sync_parent_dir(&self) -> Result<()> {
        Ok(())
    }

    fn storage_error(&self, action: &str, error: std::io::Error) -> SeatwiseError {
        SeatwiseError::Storage {
            path: self.path.clone(),
            message: format!("{} failed: {}", action, error),
        }
    }
}
