//! Core Janitor implementation: one retention sweep over every known series

use crate::liveness::{self, Liveness};
use crate::{JanitorError, RetentionPolicy, SweepReport};
use lookout_domain::traits::{MetadataStore, Removal, SampleStore, StateStore};
use std::fmt;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Current timestamp in seconds since Unix epoch
pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

fn store_error(store: &str, err: impl fmt::Display) -> JanitorError {
    JanitorError::StoreUnavailable(format!("{} store: {}", store, err))
}

/// Janitor service for retention sweeps
///
/// Responsible for:
/// - Listing every series through the index store
/// - Classifying each series by the samples it still holds
/// - Trimming samples past the retention window of live series
/// - Removing dead series from the sample, index and state stores
///
/// A sweep never writes anything but deletes, and a failure on one series
/// never stops the sweep: it is reported and the series is picked up again
/// on the next pass.
///
/// # Examples
///
/// ```no_run
/// use lookout_janitor::{current_timestamp, Janitor, JanitorConfig};
/// use lookout_store::SqliteStore;
/// use std::sync::Arc;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Arc::new(SqliteStore::new("lookout.db")?);
/// let policy = JanitorConfig::default().policy()?;
/// let janitor = Janitor::shared(store, policy);
///
/// let report = janitor.sweep(current_timestamp());
/// println!("removed {} series", report.removed);
/// # Ok(())
/// # }
/// ```
pub struct Janitor<M, S, T> {
    index: Arc<M>,
    samples: Arc<S>,
    states: Arc<T>,
    policy: RetentionPolicy,
}

impl<X> Janitor<X, X, X>
where
    X: MetadataStore + SampleStore + StateStore,
{
    /// Create a Janitor over one backend that provides all three stores
    pub fn shared(store: Arc<X>, policy: RetentionPolicy) -> Self {
        Self::new(Arc::clone(&store), Arc::clone(&store), store, policy)
    }
}

impl<M, S, T> Janitor<M, S, T>
where
    M: MetadataStore,
    S: SampleStore,
    T: StateStore,
{
    /// Create a new Janitor over separate stores
    pub fn new(index: Arc<M>, samples: Arc<S>, states: Arc<T>, policy: RetentionPolicy) -> Self {
        Self {
            index,
            samples,
            states,
            policy,
        }
    }

    /// Thresholds this Janitor sweeps with
    pub fn policy(&self) -> &RetentionPolicy {
        &self.policy
    }

    /// Perform a complete sweep at time `now`
    ///
    /// Lists the index once, then handles each series independently. Store
    /// failures are collected in the returned report, never propagated.
    pub fn sweep(&self, now: u64) -> SweepReport {
        let start = Instant::now();
        let mut report = SweepReport::new(now);

        let entries = match self.index.list_all() {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!(error = %e, "Failed to list series index, skipping sweep");
                report.record_failure(None, store_error("index", e).to_string());
                report.elapsed = start.elapsed();
                return report;
            }
        };

        for entry in &entries {
            report.scanned += 1;

            match self.sweep_series(&entry.name, now) {
                Ok((liveness, deleted)) => report.record(liveness, deleted),
                Err(e) => {
                    tracing::warn!(
                        series = %entry.name,
                        error = %e,
                        "Series sweep failed, will retry next sweep"
                    );
                    report.record_failure(Some(entry.name.as_str()), e.to_string());
                }
            }
        }

        report.elapsed = start.elapsed();
        tracing::info!(
            scanned = report.scanned,
            trimmed = report.trimmed,
            removed = report.removed,
            samples_deleted = report.samples_deleted,
            failures = report.failures.len(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Sweep completed"
        );

        report
    }

    /// Classify one series and apply the matching deletions
    ///
    /// Returns the classification and the number of samples deleted.
    pub fn sweep_series(&self, name: &str, now: u64) -> Result<(Liveness, usize), JanitorError> {
        let liveness = liveness::evaluate(&*self.samples, name, now, &self.policy)
            .map_err(|e| store_error("sample", e))?;

        let deleted = match liveness {
            Liveness::Alive => 0,
            Liveness::TrimOnly => self.trim_series(name, now)?,
            Liveness::Dead => self.remove_series(name)?,
        };

        tracing::debug!(
            series = %name,
            liveness = liveness.as_str(),
            samples_deleted = deleted,
            "Series swept"
        );

        Ok((liveness, deleted))
    }

    /// Delete samples older than the retention window
    fn trim_series(&self, name: &str, now: u64) -> Result<usize, JanitorError> {
        let cutoff = self.policy.sample_cutoff(now);
        let removal = self
            .samples
            .delete_range(name, 0, cutoff)
            .map_err(|e| store_error("sample", e))?;

        Ok(removal.count())
    }

    /// Remove a dead series from all three stores
    ///
    /// Samples go first, then the index entry, then the state. If any step
    /// fails the index entry (if still present) makes the next sweep find the
    /// series again, see it has no samples, and finish the job. Removing the
    /// index first could strand samples no future sweep would ever list.
    fn remove_series(&self, name: &str) -> Result<usize, JanitorError> {
        let samples = self
            .samples
            .delete_range(name, 0, u64::MAX)
            .map_err(|e| store_error("sample", e))?;

        let index = self.index.delete(name).map_err(|e| store_error("index", e))?;
        let state = self.states.delete(name).map_err(|e| store_error("state", e))?;

        if index == Removal::NotFound || state == Removal::NotFound {
            tracing::debug!(
                series = %name,
                index_missing = index.is_not_found(),
                state_missing = state.is_not_found(),
                "Dead series was already partially removed"
            );
        }

        Ok(samples.count())
    }
}
