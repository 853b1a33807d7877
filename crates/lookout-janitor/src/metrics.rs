//! Metrics collection for Janitor operations

use crate::Liveness;
use serde::Serialize;
use std::time::Duration;

/// A series the sweep could not finish with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesFailure {
    /// Series name, or `None` when the index itself could not be listed
    pub series: Option<String>,

    /// Rendered store error
    pub reason: String,
}

/// Outcome of a single sweep
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    /// Time the sweep evaluated thresholds against (seconds since Unix epoch)
    pub now: u64,

    /// Index entries examined
    pub scanned: usize,

    /// Series left as they were
    pub untouched: usize,

    /// Series whose stale samples were trimmed
    pub trimmed: usize,

    /// Series removed from all three stores
    pub removed: usize,

    /// Samples deleted, by trimming and by removal
    pub samples_deleted: usize,

    /// Series that hit a store error; retried next sweep
    pub failures: Vec<SeriesFailure>,

    /// Wall time spent sweeping
    pub elapsed: Duration,
}

impl SweepReport {
    /// Start an empty report for a sweep at `now`
    pub fn new(now: u64) -> Self {
        Self {
            now,
            ..Default::default()
        }
    }

    /// Record a series the sweep finished with
    pub fn record(&mut self, liveness: Liveness, samples_deleted: usize) {
        match liveness {
            Liveness::Alive => self.untouched += 1,
            Liveness::TrimOnly => self.trimmed += 1,
            Liveness::Dead => self.removed += 1,
        }
        self.samples_deleted += samples_deleted;
    }

    /// Record a store failure
    pub fn record_failure(&mut self, series: Option<&str>, reason: impl Into<String>) {
        self.failures.push(SeriesFailure {
            series: series.map(str::to_string),
            reason: reason.into(),
        });
    }

    /// True if every series was handled
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Cumulative metrics across sweeps
///
/// Tracks series trimmed and removed, samples deleted, failures, and
/// scheduler activity.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JanitorMetrics {
    /// Total sweep iterations completed
    pub sweep_count: usize,

    /// Ticks skipped because a sweep was still running
    pub ticks_dropped: usize,

    /// Series trimmed across all sweeps
    pub series_trimmed: usize,

    /// Series fully removed across all sweeps
    pub series_removed: usize,

    /// Samples deleted across all sweeps
    pub samples_deleted: usize,

    /// Per-series failures across all sweeps
    pub failures: usize,

    /// Total time spent sweeping
    pub total_runtime: Duration,
}

impl JanitorMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a completed sweep into the totals
    pub fn record_sweep(&mut self, report: &SweepReport) {
        self.sweep_count += 1;
        self.series_trimmed += report.trimmed;
        self.series_removed += report.removed;
        self.samples_deleted += report.samples_deleted;
        self.failures += report.failures.len();
        self.total_runtime += report.elapsed;
    }

    /// Record a tick dropped while a sweep was running
    pub fn record_dropped_tick(&mut self) {
        self.ticks_dropped += 1;
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let lines = [
            "Janitor Metrics Summary".to_string(),
            "======================".to_string(),
            format!("Sweep cycles: {}", self.sweep_count),
            format!("Ticks dropped: {}", self.ticks_dropped),
            format!("Total runtime: {:.3}s", self.total_runtime.as_secs_f64()),
            String::new(),
            format!("Series trimmed: {}", self.series_trimmed),
            format!("Series removed: {}", self.series_removed),
            format!("Samples deleted: {}", self.samples_deleted),
            format!("Failures: {}", self.failures),
        ];

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_record() {
        let mut report = SweepReport::new(100);
        report.record(Liveness::Alive, 0);
        report.record(Liveness::TrimOnly, 4);
        report.record(Liveness::Dead, 2);
        report.record(Liveness::Dead, 0);

        assert_eq!(report.now, 100);
        assert_eq!(report.untouched, 1);
        assert_eq!(report.trimmed, 1);
        assert_eq!(report.removed, 2);
        assert_eq!(report.samples_deleted, 6);
        assert!(report.is_clean());
    }

    #[test]
    fn test_report_failures() {
        let mut report = SweepReport::new(0);
        report.record_failure(Some("cpu"), "disk offline");
        report.record_failure(None, "index unavailable");

        assert!(!report.is_clean());
        assert_eq!(report.failures[0].series.as_deref(), Some("cpu"));
        assert_eq!(report.failures[1].series, None);
    }

    #[test]
    fn test_record_sweep() {
        let mut report = SweepReport::new(0);
        report.record(Liveness::TrimOnly, 3);
        report.record(Liveness::Dead, 1);
        report.record_failure(Some("mem"), "timeout");
        report.elapsed = Duration::from_millis(250);

        let mut metrics = JanitorMetrics::new();
        metrics.record_sweep(&report);
        metrics.record_sweep(&report);
        metrics.record_dropped_tick();

        assert_eq!(metrics.sweep_count, 2);
        assert_eq!(metrics.series_trimmed, 2);
        assert_eq!(metrics.series_removed, 2);
        assert_eq!(metrics.samples_deleted, 8);
        assert_eq!(metrics.failures, 2);
        assert_eq!(metrics.ticks_dropped, 1);
        assert_eq!(metrics.total_runtime, Duration::from_millis(500));
    }

    #[test]
    fn test_reset() {
        let mut metrics = JanitorMetrics::new();
        metrics.record_sweep(&SweepReport::new(0));
        metrics.record_dropped_tick();

        metrics.reset();

        assert_eq!(metrics.sweep_count, 0);
        assert_eq!(metrics.ticks_dropped, 0);
    }

    #[test]
    fn test_summary() {
        let mut report = SweepReport::new(0);
        report.record(Liveness::Dead, 5);
        report.elapsed = Duration::from_secs(2);

        let mut metrics = JanitorMetrics::new();
        metrics.record_sweep(&report);

        let summary = metrics.summary();
        assert!(summary.contains("Sweep cycles: 1"));
        assert!(summary.contains("Total runtime: 2.000s"));
        assert!(summary.contains("Series removed: 1"));
        assert!(summary.contains("Samples deleted: 5"));
    }
}
