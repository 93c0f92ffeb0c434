//! Tabular Store
//!
//! Generic cached CRUD over one flat file per record type.
//!
//! ## Responsibilities
//! - Create the backing file with a header row on first open
//! - Load every row into an id-keyed cache (skip-and-log on bad rows)
//! - Assign monotonic ids, never reused while the store is open
//! - Rewrite the whole file atomically on every mutation
//! - Serve snapshot reads and ad-hoc queries from the cache

use std::collections::BTreeMap;
use std::path::Path;

use parking_lot::RwLock;

use crate::codec::{decode_document, encode_document, Record, Row};
use crate::config::SyncMode;
use crate::error::{Result, SeatwiseError};

use super::{FieldCriteria, FlatFile};

/// Counters from the most recent load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Rows decoded into records
    pub rows_loaded: usize,

    /// Rows skipped as malformed, invalid, or duplicate ids
    pub rows_skipped: usize,
}

/// Cache contents guarded by the store lock
struct StoreState<R> {
    records: BTreeMap<u64, R>,
    next_id: u64,
    last_load: LoadStats,
}

/// A file-backed collection of one record type
///
/// ## Concurrency:
/// - One `RwLock` guards the cache and the id generator
/// - Writers hold the write lock across mutate → rewrite file → swap cache,
///   so readers see the state before or after a write, never in between
/// - Every method takes `&self`; share the store with `Arc`
pub struct TabularStore<R: Record> {
    file: FlatFile,
    state: RwLock<StoreState<R>>,
}

impl<R: Record> TabularStore<R> {
    /// Open or create a store file with fsync on every rewrite
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, SyncMode::Always)
    }

    /// Open or create a store file
    ///
    /// On open:
    /// 1. Create the file (and parent directories) with a header if absent
    /// 2. Parse every row, skipping malformed ones
    /// 3. Seed the id generator one past the highest id seen
    pub fn open_with(path: impl AsRef<Path>, sync_mode: SyncMode) -> Result<Self> {
        let file = FlatFile::new(path.as_ref(), sync_mode);

        if file.ensure(&encode_document::<&str>(R::COLUMNS, &[]))? {
            tracing::debug!("Created {} store at {}", R::ENTITY, file.path().display());
        }

        let state = Self::load(&file)?;
        tracing::debug!(
            "Opened {} store at {}: {} rows loaded, {} skipped, next id {}",
            R::ENTITY,
            file.path().display(),
            state.last_load.rows_loaded,
            state.last_load.rows_skipped,
            state.next_id
        );

        Ok(Self {
            file,
            state: RwLock::new(state),
        })
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Run `f` against a working copy under the store's exclusive lock
    ///
    /// If `f` succeeds and changed anything, the file is rewritten from the
    /// working copy, which then replaces the cache. If `f` or the rewrite
    /// fails, neither the cache nor the file changes.
    ///
    /// Everything `f` reads through the `StoreTxn` is consistent with what
    /// it writes, which is what makes check-then-act sequences safe.
    pub fn write<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut StoreTxn<'_, R>) -> Result<T>,
    {
        let mut state = self.state.write();
        let mut working = state.records.clone();
        let mut next_id = state.next_id;

        let (output, dirty) = {
            let mut txn = StoreTxn {
                records: &mut working,
                next_id: &mut next_id,
                dirty: false,
            };
            let output = f(&mut txn)?;
            (output, txn.dirty)
        };

        if dirty {
            self.persist(&working)?;
            state.records = working;
        }
        state.next_id = state.next_id.max(next_id);

        Ok(output)
    }

    /// Insert or replace; assigns an id when absent
    pub fn save(&self, record: R) -> Result<R> {
        self.write(|txn| txn.insert(record))
    }

    /// Save many records with a single rewrite; all or nothing
    pub fn save_all(&self, records: Vec<R>) -> Result<Vec<R>> {
        self.write(|txn| records.into_iter().map(|r| txn.insert(r)).collect())
    }

    /// Replace an existing record
    ///
    /// Fails if the record has no id, or the id is unknown.
    pub fn update(&self, record: R) -> Result<R> {
        self.write(|txn| txn.replace(record))
    }

    /// Returns whether a record was removed
    pub fn delete_by_id(&self, id: u64) -> Result<bool> {
        self.write(|txn| Ok(txn.remove(id).is_some()))
    }

    /// Returns the number of records removed
    pub fn delete_all_by_id(&self, ids: &[u64]) -> Result<usize> {
        self.write(|txn| Ok(ids.iter().filter(|id| txn.remove(**id).is_some()).count()))
    }

    pub fn delete_where<P>(&self, predicate: P) -> Result<usize>
    where
        P: Fn(&R) -> bool,
    {
        self.write(|txn| {
            let ids: Vec<u64> = txn
                .records()
                .filter(|r| predicate(r))
                .filter_map(|r| r.id())
                .collect();
            for id in &ids {
                txn.remove(*id);
            }
            Ok(ids.len())
        })
    }

    pub fn delete_by_fields(&self, criteria: &FieldCriteria) -> Result<usize> {
        criteria.check_columns::<R>()?;
        self.delete_where(|r| criteria.matches_record(r))
    }

    /// Discard the cache and re-read the backing file
    ///
    /// The id generator never moves backwards, so ids handed out before the
    /// reload are not reissued even if their rows vanished from the file.
    pub fn reload(&self) -> Result<()> {
        let mut state = self.state.write();
        let loaded = Self::load(&self.file)?;
        let next_id = state.next_id.max(loaded.next_id);
        *state = StoreState { next_id, ..loaded };

        tracing::debug!(
            "Reloaded {} store: {} records",
            R::ENTITY,
            state.records.len()
        );
        Ok(())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn find_by_id(&self, id: u64) -> Option<R> {
        self.state.read().records.get(&id).cloned()
    }

    /// Snapshot of every record, ascending by id
    pub fn find_all(&self) -> Vec<R> {
        self.state.read().records.values().cloned().collect()
    }

    pub fn exists_by_id(&self, id: u64) -> bool {
        self.state.read().records.contains_key(&id)
    }

    pub fn count(&self) -> usize {
        self.state.read().records.len()
    }

    /// Records matching a predicate, ascending by id
    pub fn find_where<P>(&self, predicate: P) -> Vec<R>
    where
        P: Fn(&R) -> bool,
    {
        self.state
            .read()
            .records
            .values()
            .filter(|r| predicate(r))
            .cloned()
            .collect()
    }

    /// Lowest-id record matching a predicate
    pub fn find_one_where<P>(&self, predicate: P) -> Option<R>
    where
        P: Fn(&R) -> bool,
    {
        self.state
            .read()
            .records
            .values()
            .find(|r| predicate(r))
            .cloned()
    }

    /// Records whose encoded `field` equals `value`
    pub fn find_by_field(&self, field: &str, value: &str) -> Result<Vec<R>> {
        self.find_by_fields(&FieldCriteria::new().and(field, value))
    }

    pub fn find_one_by_field(&self, field: &str, value: &str) -> Result<Option<R>> {
        let criteria = FieldCriteria::new().and(field, value);
        criteria.check_columns::<R>()?;
        Ok(self.find_one_where(|r| criteria.matches_record(r)))
    }

    /// Records matching every criterion
    pub fn find_by_fields(&self, criteria: &FieldCriteria) -> Result<Vec<R>> {
        criteria.check_columns::<R>()?;
        Ok(self.find_where(|r| criteria.matches_record(r)))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// The id the next inserted record without an id will receive
    pub fn next_id(&self) -> u64 {
        self.state.read().next_id
    }

    pub fn load_stats(&self) -> LoadStats {
        self.state.read().last_load
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn load(file: &FlatFile) -> Result<StoreState<R>> {
        let text = file.read_all()?;
        let mut rows = decode_document(&text).into_iter();

        let header = match rows.next() {
            None => {
                return Ok(StoreState {
                    records: BTreeMap::new(),
                    next_id: 1,
                    last_load: LoadStats::default(),
                })
            }
            Some(raw) => raw.fields.map_err(|e| SeatwiseError::Storage {
                path: file.path().to_path_buf(),
                message: format!("unreadable header: {}", e),
            })?,
        };

        if !header.iter().any(|h| h == R::id_column()) {
            return Err(SeatwiseError::Storage {
                path: file.path().to_path_buf(),
                message: format!("header is missing column '{}'", R::id_column()),
            });
        }

        let mut records = BTreeMap::new();
        let mut stats = LoadStats::default();

        for raw in rows {
            match Self::decode_row(&header, raw.line, raw.fields) {
                Ok((id, record)) if !records.contains_key(&id) => {
                    records.insert(id, record);
                    stats.rows_loaded += 1;
                }
                Ok((id, _)) => {
                    stats.rows_skipped += 1;
                    tracing::warn!(
                        "Skipping {} row at {}:{}: duplicate id {}",
                        R::ENTITY,
                        file.path().display(),
                        raw.line,
                        id
                    );
                }
                Err(e) => {
                    stats.rows_skipped += 1;
                    tracing::warn!(
                        "Skipping {} row at {}:{}: {}",
                        R::ENTITY,
                        file.path().display(),
                        raw.line,
                        e
                    );
                }
            }
        }

        let next_id = records.keys().next_back().map(|&id| id + 1).unwrap_or(1);

        Ok(StoreState {
            records,
            next_id,
            last_load: stats,
        })
    }

    fn decode_row(header: &[String], line: usize, fields: Result<Vec<String>>) -> Result<(u64, R)> {
        let fields = fields?;
        if fields.len() != header.len() {
            return Err(SeatwiseError::MalformedRow {
                line,
                reason: format!("expected {} fields, found {}", header.len(), fields.len()),
            });
        }

        let row = Row::from_fields(header, fields);
        let record = R::from_row(&row)?;
        let id = record.id().ok_or_else(|| SeatwiseError::MalformedRow {
            line,
            reason: format!("missing {}", R::id_column()),
        })?;
        Ok((id, record))
    }

    fn persist(&self, records: &BTreeMap<u64, R>) -> Result<()> {
        let rows: Vec<Vec<String>> = records
            .values()
            .map(|r| r.to_row().values_for(R::COLUMNS))
            .collect();

        self.file.overwrite(&encode_document(R::COLUMNS, &rows))?;
        tracing::debug!(
            "Rewrote {} store ({} records) at {}",
            R::ENTITY,
            rows.len(),
            self.file.path().display()
        );
        Ok(())
    }
}

/// Mutable view of a store inside `TabularStore::write`
pub struct StoreTxn<'a, R: Record> {
    records: &'a mut BTreeMap<u64, R>,
    next_id: &'a mut u64,
    dirty: bool,
}

impl<'a, R: Record> StoreTxn<'a, R> {
    /// Current records (including this transaction's changes), ascending by id
    pub fn records(&self) -> impl Iterator<Item = &R> + '_ {
        self.records.values()
    }

    pub fn get(&self, id: u64) -> Option<&R> {
        self.records.get(&id)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.records.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Save semantics: validate, assign an id if absent, insert or replace
    pub fn insert(&mut self, mut record: R) -> Result<R> {
        record.validate()?;

        let id = match record.id() {
            Some(id) => id,
            None => {
                let id = *self.next_id;
                record.set_id(id);
                id
            }
        };
        if id == 0 {
            return Err(SeatwiseError::validation(R::id_column(), "identifier must be positive"));
        }
        *self.next_id = (*self.next_id).max(id + 1);

        self.records.insert(id, record.clone());
        self.dirty = true;
        Ok(record)
    }

    /// Update semantics: the id must be present and known
    pub fn replace(&mut self, record: R) -> Result<R> {
        let id = record
            .id()
            .ok_or_else(|| SeatwiseError::validation(R::id_column(), "is required for update"))?;
        if !self.records.contains_key(&id) {
            return Err(SeatwiseError::not_found(R::ENTITY, id));
        }
        record.validate()?;

        self.records.insert(id, record.clone());
        self.dirty = true;
        Ok(record)
    }

    pub fn remove(&mut self, id: u64) -> Option<R> {
        let removed = self.records.remove(&id);
        if removed.is_some() {
            self.dirty = true;
        }
        removed
    }
}
