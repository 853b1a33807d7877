//! Error types for Janitor operations

use thiserror::Error;

/// Errors that can occur during Janitor operations
#[derive(Error, Debug)]
pub enum JanitorError {
    /// A store call failed for a reason other than a missing key
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Base period or derived thresholds are unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Worker error (lifecycle misuse, tokio runtime issues)
    #[error("Worker error: {0}")]
    Worker(String),
}
