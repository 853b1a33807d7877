//! Lookout Storage Layer
//!
//! Implements the three series store traits (samples, index, state) over a
//! single SQLite database.
//!
//! # Architecture
//!
//! - `samples`: one row per `(series, stamp)`, clustered by series
//! - `series_index`: one row per known series with its last-write stamp
//! - `series_state`: one opaque blob per series
//!
//! The tables are independent; nothing ties them together transactionally.
//! Callers that delete across tables (the retention sweep) order their
//! deletes so a partial failure is repaired by the next pass.
//!
//! # Examples
//!
//! ```no_run
//! use lookout_domain::{IndexEntry, Sample};
//! use lookout_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! store.put_sample("cpu.host1", Sample::new(1_700_000_000, 0.5)).unwrap();
//! store.put_index(&IndexEntry::new("cpu.host1", 1_700_000_000)).unwrap();
//! ```

#![warn(missing_docs)]

use lookout_domain::traits::{MetadataStore, Removal, SampleStore, StateStore};
use lookout_domain::{AnalyticState, IndexEntry, Sample};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A thread panicked while holding the connection
    #[error("Connection lock poisoned")]
    Poisoned,
}

/// SQLite-based implementation of the series stores
///
/// # Thread Safety
///
/// The connection sits behind a mutex, so one `SqliteStore` can be shared
/// (via `Arc`) between the ingest path and the retention sweep. Each trait
/// method holds the lock for a single statement only.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a store at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())?;
        conn.execute_batch(include_str!("schema.sql"))?;
        tracing::debug!(path = %path.as_ref().display(), "Opened series store");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// SQLite integers are signed; stamps past `i64::MAX` saturate.
    fn stamp_to_sql(stamp: u64) -> i64 {
        i64::try_from(stamp).unwrap_or(i64::MAX)
    }

    /// Exclusive range end; `None` when no stored stamp can reach it.
    ///
    /// Stamps saturate at `i64::MAX`, so any end past that (notably
    /// `u64::MAX`, "all samples") must not exclude the saturated rows.
    fn range_end(to: u64) -> Option<i64> {
        i64::try_from(to).ok()
    }

    fn removal(rows: usize) -> Removal {
        match rows {
            0 => Removal::NotFound,
            n => Removal::Removed(n),
        }
    }

    /// Write (or overwrite) one sample of a series
    pub fn put_sample(&self, name: &str, sample: Sample) -> Result<(), StoreError> {
        self.conn()?.execute(
            "INSERT INTO samples (series, stamp, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(series, stamp) DO UPDATE SET value = excluded.value",
            params![name, Self::stamp_to_sql(sample.stamp), sample.value],
        )?;
        Ok(())
    }

    /// Write (or overwrite) the index entry of a series
    pub fn put_index(&self, entry: &IndexEntry) -> Result<(), StoreError> {
        self.conn()?.execute(
            "INSERT INTO series_index (series, stamp) VALUES (?1, ?2)
             ON CONFLICT(series) DO UPDATE SET stamp = excluded.stamp",
            params![&entry.name, Self::stamp_to_sql(entry.stamp)],
        )?;
        Ok(())
    }

    /// Write (or overwrite) the analytic state of a series
    pub fn put_state(&self, name: &str, state: &AnalyticState) -> Result<(), StoreError> {
        self.conn()?.execute(
            "INSERT INTO series_state (series, state) VALUES (?1, ?2)
             ON CONFLICT(series) DO UPDATE SET state = excluded.state",
            params![name, state.as_bytes()],
        )?;
        Ok(())
    }

    /// Get the index entry of a series, if any
    pub fn get_index(&self, name: &str) -> Result<Option<IndexEntry>, StoreError> {
        let entry = self
            .conn()?
            .query_row(
                "SELECT series, stamp FROM series_index WHERE series = ?1",
                params![name],
                |row| {
                    Ok(IndexEntry {
                        name: row.get(0)?,
                        stamp: row.get::<_, i64>(1)? as u64,
                    })
                },
            )
            .optional()?;
        Ok(entry)
    }
}

impl MetadataStore for SqliteStore {
    type Error = StoreError;

    fn list_all(&self) -> Result<Vec<IndexEntry>, Self::Error> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT series, stamp FROM series_index ORDER BY series")?;

        let entries = stmt
            .query_map([], |row| {
                Ok(IndexEntry {
                    name: row.get(0)?,
                    stamp: row.get::<_, i64>(1)? as u64,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    fn delete(&self, name: &str) -> Result<Removal, Self::Error> {
        let rows = self
            .conn()?
            .execute("DELETE FROM series_index WHERE series = ?1", params![name])?;
        Ok(Self::removal(rows))
    }
}

impl SampleStore for SqliteStore {
    type Error = StoreError;

    fn query_range(&self, name: &str, from: u64, to: u64) -> Result<Vec<Sample>, Self::Error> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT stamp, value FROM samples
             WHERE series = ?1 AND stamp >= ?2 AND (?3 IS NULL OR stamp < ?3)
             ORDER BY stamp",
        )?;

        let samples = stmt
            .query_map(
                params![name, Self::stamp_to_sql(from), Self::range_end(to)],
                |row| Ok(Sample::new(row.get::<_, i64>(0)? as u64, row.get(1)?)),
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(samples)
    }

    fn delete_range(&self, name: &str, from: u64, to: u64) -> Result<Removal, Self::Error> {
        let rows = self.conn()?.execute(
            "DELETE FROM samples WHERE series = ?1 AND stamp >= ?2 AND (?3 IS NULL OR stamp < ?3)",
            params![name, Self::stamp_to_sql(from), Self::range_end(to)],
        )?;
        Ok(Self::removal(rows))
    }

    fn has_samples(&self, name: &str, from: u64, to: u64) -> Result<bool, Self::Error> {
        let exists = self.conn()?.query_row(
            "SELECT EXISTS(SELECT 1 FROM samples WHERE series = ?1 AND stamp >= ?2 AND (?3 IS NULL OR stamp < ?3))",
            params![name, Self::stamp_to_sql(from), Self::range_end(to)],
            |row| row.get::<_, bool>(0),
        )?;
        Ok(exists)
    }
}

impl StateStore for SqliteStore {
    type Error = StoreError;

    fn get(&self, name: &str) -> Result<Option<AnalyticState>, Self::Error> {
        let state = self
            .conn()?
            .query_row(
                "SELECT state FROM series_state WHERE series = ?1",
                params![name],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(state.map(AnalyticState::from_bytes))
    }

    fn delete(&self, name: &str) -> Result<Removal, Self::Error> {
        let rows = self
            .conn()?
            .execute("DELETE FROM series_state WHERE series = ?1", params![name])?;
        Ok(Self::removal(rows))
    }
}
