//! Lookout Janitor
//!
//! Background retention sweep for the Lookout time-series store.
//!
//! # Overview
//!
//! Samples accumulate without bound, so the Janitor periodically:
//! - **Trims** samples older than the retention window from live series
//! - **Removes** series that have gone silent from all three stores
//!   (samples, index, analytic state)
//! - **Reports** what it did per sweep and cumulatively
//!
//! # Thresholds
//!
//! Everything derives from one base period (one full cycle of the store's
//! time grid, a day by default):
//!
//! | Threshold | Value | Meaning |
//! |-----------|-------|---------|
//! | Sample retention | 2 periods | Older samples of live series are trimmed |
//! | Dead-series window | 3 periods | No sample inside it: the series is removed |
//! | Sweep interval | 1/8 period | Scheduler cadence |
//!
//! Liveness is always recomputed from the sample store. The index entry's
//! stamp is never trusted.
//!
//! # Usage
//!
//! ## One-time Sweep
//!
//! ```no_run
//! use lookout_janitor::{current_timestamp, Janitor, JanitorConfig};
//! use lookout_store::SqliteStore;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(SqliteStore::new("lookout.db")?);
//! let janitor = Janitor::shared(store, JanitorConfig::default().policy()?);
//!
//! let report = janitor.sweep(current_timestamp());
//! println!("trimmed {}, removed {}", report.trimmed, report.removed);
//! # Ok(())
//! # }
//! ```
//!
//! ## Background Worker
//!
//! ```no_run
//! use lookout_janitor::{Janitor, JanitorConfig, JanitorWorker};
//! use lookout_store::SqliteStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(SqliteStore::new("lookout.db")?);
//!     let janitor = Janitor::shared(store, JanitorConfig::default().policy()?);
//!     let mut worker = JanitorWorker::new(janitor);
//!
//!     worker.start()?;
//!     tokio::signal::ctrl_c().await?;
//!     worker.stop().await?;
//!     println!("{}", worker.metrics().summary());
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [janitor]
//! base_period_secs = 86400
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod janitor;
pub mod liveness;
mod metrics;
pub mod policy;
mod worker;

pub use config::JanitorConfig;
pub use error::JanitorError;
pub use janitor::{current_timestamp, Janitor};
pub use liveness::Liveness;
pub use metrics::{JanitorMetrics, SeriesFailure, SweepReport};
pub use policy::RetentionPolicy;
pub use worker::{JanitorWorker, SweepObserver, WorkerState};
