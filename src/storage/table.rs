//! Generic table storage
//!
//! `TableStore` loads, appends, mutates and filters typed rows kept in one
//! CSV file per table. There is no cache: every read goes back to disk, so a
//! reader always observes the last completed write.
//!
//! Every mutation re-reads the whole table, transforms it in memory and
//! rewrites it atomically. To keep concurrent mutations of the same table from
//! losing each other's changes, each table has an in-process lock that is held
//! across the load, transform and write. Waiting for a busy table is bounded;
//! a caller that times out gets [`LedgerError::ConflictRetry`].

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::file_io::{read_table, verify_table_header, write_table_atomic};
use super::Record;
use crate::error::{LedgerError, LedgerResult};

const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Durable, schema-fixed, multi-tenant row storage
pub struct TableStore {
    data_dir: PathBuf,
    lock_timeout: Duration,
    locks: Mutex<HashMap<&'static str, Arc<Mutex<()>>>>,
}

impl TableStore {
    /// Create a store over the given data directory
    pub fn new(data_dir: PathBuf, lock_timeout: Duration) -> Self {
        Self {
            data_dir,
            lock_timeout,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Backing file of a table
    pub fn path_of<R: Record>(&self) -> PathBuf {
        self.data_dir.join(format!("{}.csv", R::TABLE))
    }

    /// Create the table with its header if it does not exist yet
    ///
    /// An existing file is never rewritten; its header is checked instead.
    /// Returns whether the file was created.
    pub fn ensure<R: Record>(&self) -> LedgerResult<bool> {
        std::fs::create_dir_all(&self.data_dir).map_err(|e| {
            LedgerError::StorageUnavailable(format!(
                "Failed to create data directory {}: {}",
                self.data_dir.display(),
                e
            ))
        })?;

        let path = self.path_of::<R>();
        self.with_lock(R::TABLE, || {
            if path.exists() {
                verify_table_header::<R>(&path)?;
                return Ok(false);
            }

            write_table_atomic::<R>(&path, &[])?;
            debug!(table = R::TABLE, "created table");
            Ok(true)
        })
    }

    /// Read the entire table, preserving on-disk row order
    pub fn load<R: Record>(&self) -> LedgerResult<Vec<R>> {
        read_table(&self.path_of::<R>())
    }

    /// Rows belonging to one user, in table order
    pub fn filter<R: Record>(&self, username: &str) -> LedgerResult<Vec<R>> {
        Ok(self
            .load::<R>()?
            .into_iter()
            .filter(|row| row.username() == username)
            .collect())
    }

    /// Rows belonging to one user, paired with their index in the whole table
    pub fn filter_indexed<R: Record>(&self, username: &str) -> LedgerResult<Vec<(usize, R)>> {
        Ok(self
            .load::<R>()?
            .into_iter()
            .enumerate()
            .filter(|(_, row)| row.username() == username)
            .collect())
    }

    /// Add one row at the end of the table
    pub fn append<R: Record>(&self, row: R) -> LedgerResult<()> {
        self.rewrite::<R, _, _>(|rows| {
            rows.push(row);
            Ok(((), true))
        })
    }

    /// Add a row unless an existing row conflicts with it
    ///
    /// The check and the append happen under the same lock. Returns whether
    /// the row was written.
    pub fn append_unique<R, F>(&self, row: R, conflicts: F) -> LedgerResult<bool>
    where
        R: Record,
        F: Fn(&R, &R) -> bool,
    {
        self.rewrite::<R, _, _>(|rows| {
            if rows.iter().any(|existing| conflicts(existing, &row)) {
                return Ok((false, false));
            }
            rows.push(row);
            Ok((true, true))
        })
    }

    /// Replace the first row with the same key, or append if there is none
    ///
    /// Returns the replaced row, if any.
    pub fn upsert<R, F>(&self, row: R, same_key: F) -> LedgerResult<Option<R>>
    where
        R: Record,
        F: Fn(&R, &R) -> bool,
    {
        self.rewrite::<R, _, _>(|rows| {
            match rows.iter().position(|existing| same_key(existing, &row)) {
                Some(position) => Ok((Some(std::mem::replace(&mut rows[position], row)), true)),
                None => {
                    rows.push(row);
                    Ok((None, true))
                }
            }
        })
    }

    /// Apply `transform` to every row selected by `predicate`
    ///
    /// `predicate` sees each row with its index in the whole table. A
    /// transform returning `None` deletes the row. Returns how many rows were
    /// selected; the file is left untouched when that is zero.
    pub fn mutate<R, P, T>(&self, mut predicate: P, mut transform: T) -> LedgerResult<usize>
    where
        R: Record,
        P: FnMut(usize, &R) -> bool,
        T: FnMut(R) -> Option<R>,
    {
        self.rewrite::<R, _, _>(|rows| {
            let mut selected = 0;
            let mut next = Vec::with_capacity(rows.len());

            for (index, row) in rows.drain(..).enumerate() {
                if predicate(index, &row) {
                    selected += 1;
                    if let Some(updated) = transform(row) {
                        next.push(updated);
                    }
                } else {
                    next.push(row);
                }
            }

            *rows = next;
            Ok((selected, selected > 0))
        })
    }

    /// Update the `index`-th row of a user's filtered view
    ///
    /// If `edit` fails nothing is written. Returns `(before, after)`.
    pub fn update_in_view<R, F>(&self, username: &str, index: usize, edit: F) -> LedgerResult<(R, R)>
    where
        R: Record,
        F: FnOnce(&mut R) -> LedgerResult<()>,
    {
        self.rewrite::<R, _, _>(|rows| {
            let position = position_in_view(rows, username, index)
                .ok_or_else(|| LedgerError::row_not_found(R::TABLE, index))?;

            let before = rows[position].clone();
            edit(&mut rows[position])?;
            Ok(((before, rows[position].clone()), true))
        })
    }

    /// Delete the `index`-th row of a user's filtered view, returning it
    pub fn remove_in_view<R: Record>(&self, username: &str, index: usize) -> LedgerResult<R> {
        self.rewrite::<R, _, _>(|rows| {
            let position = position_in_view(rows, username, index)
                .ok_or_else(|| LedgerError::row_not_found(R::TABLE, index))?;

            Ok((rows.remove(position), true))
        })
    }

    /// Load, transform and write back a table under its lock
    ///
    /// `f` returns its result and whether the rows must be written back. An
    /// error from `f` leaves the file untouched.
    pub fn rewrite<R, T, F>(&self, f: F) -> LedgerResult<T>
    where
        R: Record,
        F: FnOnce(&mut Vec<R>) -> LedgerResult<(T, bool)>,
    {
        let path = self.path_of::<R>();
        self.with_lock(R::TABLE, || {
            let mut rows = read_table::<R>(&path)?;
            let (result, changed) = f(&mut rows)?;

            if changed {
                write_table_atomic(&path, &rows)?;
                debug!(table = R::TABLE, rows = rows.len(), "table rewritten");
            }

            Ok(result)
        })
    }

    fn with_lock<T>(&self, table: &'static str, f: impl FnOnce() -> LedgerResult<T>) -> LedgerResult<T> {
        let lock = self.table_lock(table)?;
        let _guard = self.acquire(table, &lock)?;
        f()
    }

    fn table_lock(&self, table: &'static str) -> LedgerResult<Arc<Mutex<()>>> {
        let mut locks = self.locks.lock().map_err(|e| {
            LedgerError::StorageUnavailable(format!("Failed to acquire lock registry: {}", e))
        })?;
        Ok(Arc::clone(locks.entry(table).or_default()))
    }

    fn acquire<'a>(&self, table: &'static str, lock: &'a Mutex<()>) -> LedgerResult<MutexGuard<'a, ()>> {
        let deadline = Instant::now() + self.lock_timeout;
        let mut contended = false;

        loop {
            match lock.try_lock() {
                Ok(guard) => return Ok(guard),
                // A panic mid-mutation cannot leave a half-written file behind
                Err(TryLockError::Poisoned(poisoned)) => return Ok(poisoned.into_inner()),
                Err(TryLockError::WouldBlock) => {
                    if !contended {
                        debug!(table, "waiting for table lock");
                        contended = true;
                    }
                    if Instant::now() >= deadline {
                        warn!(table, timeout_ms = self.lock_timeout.as_millis() as u64, "table lock timed out");
                        return Err(LedgerError::ConflictRetry { table });
                    }
                    thread::sleep(LOCK_POLL_INTERVAL);
                }
            }
        }
    }
}

/// Whole-table position of the `index`-th row owned by `username`
fn position_in_view<R: Record>(rows: &[R], username: &str, index: usize) -> Option<usize> {
    rows.iter()
        .enumerate()
        .filter(|(_, row)| row.username() == username)
        .nth(index)
        .map(|(position, _)| position)
}
