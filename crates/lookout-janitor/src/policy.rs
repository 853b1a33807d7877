//! Retention thresholds derived from the store's base period
//!
//! Every threshold is a fixed multiple (or fraction) of one base period, the
//! length of a full measurement cycle of the store's time grid.

use crate::JanitorError;
use std::time::Duration;

/// Samples older than this many base periods are trimmed
pub const SAMPLE_RETENTION_PERIODS: u32 = 2;

/// Series with no sample in this many base periods are removed entirely
pub const DEAD_SERIES_PERIODS: u32 = 3;

/// Sweeps run this many times per base period
pub const SWEEPS_PER_PERIOD: u32 = 8;

const _: () = assert!(SAMPLE_RETENTION_PERIODS >= 1);
const _: () = assert!(DEAD_SERIES_PERIODS > SAMPLE_RETENTION_PERIODS);
const _: () = assert!(SWEEPS_PER_PERIOD > 1);

/// Thresholds and cadence of the retention sweep
///
/// Built once when the sweep engine is constructed; immutable afterwards.
///
/// # Examples
///
/// ```
/// use lookout_janitor::RetentionPolicy;
/// use std::time::Duration;
///
/// let policy = RetentionPolicy::from_base_period(Duration::from_secs(86_400)).unwrap();
/// assert_eq!(policy.sample_retention(), Duration::from_secs(2 * 86_400));
/// assert_eq!(policy.dead_series_window(), Duration::from_secs(3 * 86_400));
/// assert_eq!(policy.sweep_interval(), Duration::from_secs(10_800));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    base_period: Duration,
    sample_retention: Duration,
    dead_series_window: Duration,
    sweep_interval: Duration,
}

impl RetentionPolicy {
    /// Derive all thresholds from a base period
    ///
    /// # Errors
    ///
    /// Returns [`JanitorError::InvalidConfiguration`] if the base period is
    /// zero, too short to yield a non-zero sweep interval, or so long that a
    /// derived window overflows.
    pub fn from_base_period(base_period: Duration) -> Result<Self, JanitorError> {
        if base_period.is_zero() {
            return Err(JanitorError::InvalidConfiguration(
                "base period must be positive".to_string(),
            ));
        }

        let sample_retention = base_period
            .checked_mul(SAMPLE_RETENTION_PERIODS)
            .ok_or_else(|| overflow("sample retention", base_period))?;
        let dead_series_window = base_period
            .checked_mul(DEAD_SERIES_PERIODS)
            .ok_or_else(|| overflow("dead-series window", base_period))?;

        let sweep_interval = base_period / SWEEPS_PER_PERIOD;
        if sweep_interval.is_zero() {
            return Err(JanitorError::InvalidConfiguration(format!(
                "base period {:?} is too short for a sweep interval",
                base_period
            )));
        }

        Ok(Self {
            base_period,
            sample_retention,
            dead_series_window,
            sweep_interval,
        })
    }

    /// Configured base period
    pub fn base_period(&self) -> Duration {
        self.base_period
    }

    /// Age past which samples of a live series are trimmed
    pub fn sample_retention(&self) -> Duration {
        self.sample_retention
    }

    /// Silence after which a series is removed entirely
    pub fn dead_series_window(&self) -> Duration {
        self.dead_series_window
    }

    /// Cadence of the scheduler
    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    /// Stamp below which samples are trimmed, in whole seconds
    pub fn sample_cutoff(&self, now: u64) -> u64 {
        now.saturating_sub(self.sample_retention.as_secs())
    }

    /// Stamp at or above which a sample keeps its series alive
    pub fn dead_cutoff(&self, now: u64) -> u64 {
        now.saturating_sub(self.dead_series_window.as_secs())
    }
}

fn overflow(what: &str, base_period: Duration) -> JanitorError {
    JanitorError::InvalidConfiguration(format!(
        "{} overflows for base period {:?}",
        what, base_period
    ))
}
