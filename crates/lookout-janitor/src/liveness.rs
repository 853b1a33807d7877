//! Per-series liveness evaluation
//!
//! Liveness is recomputed from the sample store on every sweep. The index
//! entry's own stamp is never consulted: the ingest path does not keep it
//! current, so a series with a fresh stamp may be long dead and vice versa.

use crate::RetentionPolicy;
use lookout_domain::traits::SampleStore;

/// What a sweep should do with one series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Liveness {
    /// Recent samples only; nothing to reclaim
    Alive,

    /// Recent samples exist, but so do samples past the retention window
    TrimOnly,

    /// No sample inside the dead-series window (or no samples at all)
    Dead,
}

impl Liveness {
    /// Lowercase name for logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Liveness::Alive => "alive",
            Liveness::TrimOnly => "trim_only",
            Liveness::Dead => "dead",
        }
    }
}

/// Classify a series at time `now`
///
/// A series is dead unless some sample has `stamp >= dead_cutoff(now)`.
/// Samples stamped in the future count as recent. A live series with any
/// sample below `sample_cutoff(now)` needs trimming.
pub fn evaluate<S: SampleStore + ?Sized>(
    samples: &S,
    name: &str,
    now: u64,
    policy: &RetentionPolicy,
) -> Result<Liveness, S::Error> {
    if !samples.has_samples(name, policy.dead_cutoff(now), u64::MAX)? {
        return Ok(Liveness::Dead);
    }

    let sample_cutoff = policy.sample_cutoff(now);
    if sample_cutoff > 0 && samples.has_samples(name, 0, sample_cutoff)? {
        return Ok(Liveness::TrimOnly);
    }

    Ok(Liveness::Alive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookout_domain::traits::Removal;
    use lookout_domain::Sample;
    use std::time::Duration;

    const NOW: u64 = 1_000_000;

    // Mock store holding one series
    struct MockSamples {
        stamps: Vec<u64>,
        fail: bool,
    }

    impl MockSamples {
        fn with(stamps: &[u64]) -> Self {
            Self {
                stamps: stamps.to_vec(),
                fail: false,
            }
        }
    }

    impl SampleStore for MockSamples {
        type Error = String;

        fn query_range(&self, _name: &str, from: u64, to: u64) -> Result<Vec<Sample>, Self::Error> {
            if self.fail {
                return Err("disk offline".to_string());
            }
            Ok(self
                .stamps
                .iter()
                .filter(|s| **s >= from && **s < to)
                .map(|s| Sample::new(*s, 0.0))
                .collect())
        }

        fn delete_range(&self, _name: &str, _from: u64, _to: u64) -> Result<Removal, Self::Error> {
            Ok(Removal::NotFound)
        }
    }

    fn policy() -> RetentionPolicy {
        // retention 200s, dead window 300s
        RetentionPolicy::from_base_period(Duration::from_secs(100)).unwrap()
    }

    #[test]
    fn test_no_samples_is_dead() {
        let store = MockSamples::with(&[]);
        assert_eq!(evaluate(&store, "s", NOW, &policy()).unwrap(), Liveness::Dead);
    }

    #[test]
    fn test_only_old_samples_is_dead() {
        let store = MockSamples::with(&[NOW - 301, NOW - 5_000]);
        assert_eq!(evaluate(&store, "s", NOW, &policy()).unwrap(), Liveness::Dead);
    }

    #[test]
    fn test_sample_on_dead_cutoff_is_alive() {
        // Exactly at now - window still counts; it is older than retention though
        let store = MockSamples::with(&[NOW - 300]);
        assert_eq!(evaluate(&store, "s", NOW, &policy()).unwrap(), Liveness::TrimOnly);
    }

    #[test]
    fn test_old_and_recent_samples_trim() {
        let store = MockSamples::with(&[NOW - 10_000, NOW - 10]);
        assert_eq!(evaluate(&store, "s", NOW, &policy()).unwrap(), Liveness::TrimOnly);
    }

    #[test]
    fn test_recent_samples_alive() {
        let store = MockSamples::with(&[NOW - 200, NOW - 10, NOW]);
        assert_eq!(evaluate(&store, "s", NOW, &policy()).unwrap(), Liveness::Alive);
    }

    #[test]
    fn test_future_sample_keeps_series_alive() {
        let store = MockSamples::with(&[NOW + 3_600]);
        assert_eq!(evaluate(&store, "s", NOW, &policy()).unwrap(), Liveness::Alive);
    }

    #[test]
    fn test_young_clock_never_trims() {
        // now smaller than the retention window: cutoffs saturate to zero
        let store = MockSamples::with(&[0, 50]);
        assert_eq!(evaluate(&store, "s", 100, &policy()).unwrap(), Liveness::Alive);
    }

    #[test]
    fn test_store_error_propagates() {
        let store = MockSamples {
            stamps: vec![NOW],
            fail: true,
        };
        assert!(evaluate(&store, "s", NOW, &policy()).is_err());
    }

    #[test]
    fn test_as_str() {
        assert_eq!(Liveness::Alive.as_str(), "alive");
        assert_eq!(Liveness::TrimOnly.as_str(), "trim_only");
        assert_eq!(Liveness::Dead.as_str(), "dead");
    }
}
