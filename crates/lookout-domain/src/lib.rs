//! Lookout Domain Layer
//!
//! Core data model and store capability traits for the Lookout time-series
//! store. Like every domain crate in the workspace it has no external
//! dependencies: infrastructure implementations live in other crates.
//!
//! ## Key Concepts
//!
//! - **Series**: a uniquely named, time-ordered sequence of samples
//! - **Sample**: one `(stamp, value)` observation belonging to a series
//! - **Index entry**: per-series record of identity and last-write time
//! - **Analytic state**: opaque per-series data consumed by anomaly detection
//!
//! The three stores (samples, index, state) are independent and keyed by
//! series name. See [`traits`] for the capabilities the retention sweep
//! consumes.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod series;
pub mod traits;

// Re-exports for convenience
pub use series::{AnalyticState, IndexEntry, Sample};
pub use traits::{MetadataStore, Removal, SampleStore, StateStore};
