//! Configuration for Janitor operations
//!
//! The sweep has a single knob: the base period of the store's time grid.
//! Every threshold and the sweep cadence are derived from it (see
//! [`RetentionPolicy`]).

use crate::{JanitorError, RetentionPolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Grids per base period in the default store layout
pub const DEFAULT_NUM_GRID: u32 = 288;

/// Seconds per grid in the default store layout
pub const DEFAULT_GRID_LEN: u32 = 300;

/// Configuration for the Janitor service
///
/// # Examples
///
/// ```
/// use lookout_janitor::JanitorConfig;
///
/// // Default: 288 grids of 5 minutes, one day per period
/// let config = JanitorConfig::default();
/// assert_eq!(config.base_period_secs, 86_400);
///
/// // Hourly grid cycle
/// let config = JanitorConfig::from_grid(60, 60);
/// assert_eq!(config.base_period_secs, 3_600);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JanitorConfig {
    /// Length of one full measurement cycle of the time grid (in seconds)
    /// Default: 86400 (288 grids x 300 seconds)
    #[serde(default = "default_base_period_secs")]
    pub base_period_secs: u64,
}

fn default_base_period_secs() -> u64 {
    u64::from(DEFAULT_NUM_GRID) * u64::from(DEFAULT_GRID_LEN)
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            base_period_secs: default_base_period_secs(),
        }
    }
}

impl JanitorConfig {
    /// Configuration for a grid of `num_grid` slots of `grid_len` seconds
    pub fn from_grid(num_grid: u32, grid_len: u32) -> Self {
        Self {
            base_period_secs: u64::from(num_grid) * u64::from(grid_len),
        }
    }

    /// Get base period as Duration
    pub fn base_period(&self) -> Duration {
        Duration::from_secs(self.base_period_secs)
    }

    /// Derive the retention policy
    ///
    /// # Errors
    ///
    /// Returns [`JanitorError::InvalidConfiguration`] for a zero or
    /// overflowing base period.
    pub fn policy(&self) -> Result<RetentionPolicy, JanitorError> {
        RetentionPolicy::from_base_period(self.base_period())
    }
}
