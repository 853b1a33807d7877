//! Trait definitions for the three series stores
//!
//! These traits define the boundary between the retention sweep and the
//! storage engines. Infrastructure implementations live in other crates
//! (see `lookout-store`).
//!
//! All methods take `&self`: the stores are shared with the ingest and query
//! paths, so implementations handle their own interior synchronization and
//! every call is a self-contained operation keyed by series name.

use crate::{AnalyticState, IndexEntry, Sample};
use std::fmt;

/// Outcome of a delete against any store
///
/// Deleting something that is already gone is not an error: it is reported
/// as [`Removal::NotFound`] so callers can treat deletes as idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// Entries were removed (count of rows, samples or entries)
    Removed(usize),

    /// Nothing matched the key or range
    NotFound,
}

impl Removal {
    /// Number of entries actually removed
    pub fn count(&self) -> usize {
        match self {
            Removal::Removed(n) => *n,
            Removal::NotFound => 0,
        }
    }

    /// True if nothing matched
    pub fn is_not_found(&self) -> bool {
        matches!(self, Removal::NotFound)
    }
}

/// Per-series metadata ("index") store
///
/// Implemented by the infrastructure layer (lookout-store)
pub trait MetadataStore {
    /// Error type for store operations
    type Error: fmt::Display;

    /// List every known index entry
    fn list_all(&self) -> Result<Vec<IndexEntry>, Self::Error>;

    /// Delete the index entry for a series
    fn delete(&self, name: &str) -> Result<Removal, Self::Error>;
}

/// Raw sample store
///
/// Ranges are half-open: `[from, to)`.
///
/// Implemented by the infrastructure layer (lookout-store)
pub trait SampleStore {
    /// Error type for store operations
    type Error: fmt::Display;

    /// Samples of a series with `from <= stamp < to`, ordered by stamp
    fn query_range(&self, name: &str, from: u64, to: u64) -> Result<Vec<Sample>, Self::Error>;

    /// Delete samples of a series with `from <= stamp < to`
    fn delete_range(&self, name: &str, from: u64, to: u64) -> Result<Removal, Self::Error>;

    /// Whether any sample of the series lies in `[from, to)`
    ///
    /// The default materializes the range; implementations with an index
    /// should override it with an existence probe.
    fn has_samples(&self, name: &str, from: u64, to: u64) -> Result<bool, Self::Error> {
        Ok(!self.query_range(name, from, to)?.is_empty())
    }
}

/// Per-series analytic state store
///
/// Implemented by the infrastructure layer (lookout-store)
pub trait StateStore {
    /// Error type for store operations
    type Error: fmt::Display;

    /// Get the state of a series, if any
    fn get(&self, name: &str) -> Result<Option<AnalyticState>, Self::Error>;

    /// Delete the state of a series
    fn delete(&self, name: &str) -> Result<Removal, Self::Error>;
}
