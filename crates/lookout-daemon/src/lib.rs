//! Lookout Janitor Daemon
//!
//! Opens the series store, derives the retention policy, and runs the
//! janitor until Ctrl+C (or for a single sweep with `--once`).

#![warn(missing_docs)]

pub mod cli;
pub mod config;

use config::DaemonConfig;
use lookout_janitor::{Janitor, JanitorError, JanitorWorker, SweepReport};
use lookout_store::{SqliteStore, StoreError};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Daemon error
#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Store could not be opened
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Janitor refused to start or failed to stop
    #[error("Janitor error: {0}")]
    Janitor(#[from] JanitorError),

    /// Signal handling error
    #[error("Signal error: {0}")]
    Signal(#[from] std::io::Error),

    /// Report serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Initialize tracing (log to stderr)
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

/// Run one sweep and return its report
pub async fn run_once(config: &DaemonConfig) -> Result<Option<SweepReport>, DaemonError> {
    let worker = build_worker(config)?;
    Ok(worker.run_once().await?)
}

/// Run the daemon
///
/// With `once`, performs a single sweep and prints its report as JSON on
/// stdout. Otherwise ticks until Ctrl+C, then waits for any in-flight sweep.
pub async fn run(config: DaemonConfig, once: bool) -> Result<(), DaemonError> {
    if once {
        if let Some(report) = run_once(&config).await? {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        return Ok(());
    }

    let mut worker = build_worker(&config)?;
    worker.start()?;

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, waiting for in-flight sweep");

    worker.stop().await?;
    Ok(())
}

fn build_worker(
    config: &DaemonConfig,
) -> Result<JanitorWorker<SqliteStore, SqliteStore, SqliteStore>, DaemonError> {
    config.validate()?;
    let policy = config.janitor.policy()?;

    info!("Starting Lookout janitor");
    info!("Database: {}", config.database_path.display());
    info!(
        "Base period: {:?} (retention {:?}, dead after {:?}, sweep every {:?})",
        policy.base_period(),
        policy.sample_retention(),
        policy.dead_series_window(),
        policy.sweep_interval()
    );

    let store = Arc::new(SqliteStore::new(&config.database_path)?);
    Ok(JanitorWorker::new(Janitor::shared(store, policy)))
}
