//! Series module - samples, index entries and analytic state

use std::fmt;

/// A single observation of a series
///
/// Stamps are Unix seconds. The series name is not repeated here; stores
/// address samples by series name and return them in stamp order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// When the value was observed (seconds since Unix epoch)
    pub stamp: u64,

    /// Observed value
    pub value: f64,
}

impl Sample {
    /// Create a new sample
    pub fn new(stamp: u64, value: f64) -> Self {
        Self { stamp, value }
    }
}

/// Per-series metadata entry ("index")
///
/// One exists for every series that has ever been written, until the series
/// is fully removed. The stamp records the last write the ingest path saw and
/// is advisory only: nothing guarantees it is kept current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Series name (primary key across all stores)
    pub name: String,

    /// Last-write stamp as recorded by the ingest path
    pub stamp: u64,
}

impl IndexEntry {
    /// Create a new index entry
    ///
    /// # Examples
    ///
    /// ```
    /// use lookout_domain::IndexEntry;
    ///
    /// let entry = IndexEntry::new("cpu.host1", 1_700_000_000);
    /// assert_eq!(entry.name, "cpu.host1");
    /// ```
    pub fn new(name: impl Into<String>, stamp: u64) -> Self {
        Self {
            name: name.into(),
            stamp,
        }
    }
}

impl fmt::Display for IndexEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.stamp)
    }
}

/// Opaque per-series analytic state
///
/// Produced and consumed by anomaly detection. The retention sweep never
/// reads the contents, it only removes the entry when a series dies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyticState(Vec<u8>);

impl AnalyticState {
    /// Wrap raw state bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Borrow the raw state bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the state, returning its bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}
