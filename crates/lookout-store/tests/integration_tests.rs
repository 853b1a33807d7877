//! Integration tests for lookout-store
//!
//! These tests exercise each store trait against a real SQLite database.

use lookout_domain::traits::{MetadataStore, Removal, SampleStore, StateStore};
use lookout_domain::{AnalyticState, IndexEntry, Sample};
use lookout_store::SqliteStore;

fn seeded_store() -> SqliteStore {
    let store = SqliteStore::new(":memory:").unwrap();
    for stamp in [100, 200, 300] {
        store.put_sample("cpu", Sample::new(stamp, stamp as f64 / 100.0)).unwrap();
    }
    store.put_sample("mem", Sample::new(150, 7.0)).unwrap();
    store.put_index(&IndexEntry::new("cpu", 300)).unwrap();
    store.put_index(&IndexEntry::new("mem", 150)).unwrap();
    store.put_state("cpu", &AnalyticState::from_bytes(vec![1, 2])).unwrap();
    store
}

#[test]
fn test_store_initialization() {
    let store = SqliteStore::new(":memory:");
    assert!(store.is_ok(), "Store should initialize successfully");
}

#[test]
fn test_query_range_is_ordered_and_half_open() {
    let store = seeded_store();

    let samples = store.query_range("cpu", 100, 300).unwrap();
    assert_eq!(samples, vec![Sample::new(100, 1.0), Sample::new(200, 2.0)]);

    // Other series never leak into the range
    let samples = store.query_range("mem", 0, u64::MAX).unwrap();
    assert_eq!(samples, vec![Sample::new(150, 7.0)]);
}

#[test]
fn test_put_sample_overwrites_same_stamp() {
    let store = seeded_store();
    store.put_sample("cpu", Sample::new(200, 9.5)).unwrap();

    let samples = store.query_range("cpu", 200, 201).unwrap();
    assert_eq!(samples, vec![Sample::new(200, 9.5)]);
}

#[test]
fn test_delete_range() {
    let store = seeded_store();

    assert_eq!(store.delete_range("cpu", 0, 250).unwrap(), Removal::Removed(2));
    assert_eq!(store.delete_range("cpu", 0, 250).unwrap(), Removal::NotFound);
    assert_eq!(store.query_range("cpu", 0, u64::MAX).unwrap(), vec![Sample::new(300, 3.0)]);

    // Untouched series keeps its samples
    assert_eq!(store.query_range("mem", 0, u64::MAX).unwrap().len(), 1);
}

#[test]
fn test_has_samples() {
    let store = seeded_store();

    assert!(store.has_samples("cpu", 300, u64::MAX).unwrap());
    assert!(!store.has_samples("cpu", 301, u64::MAX).unwrap());
    assert!(!store.has_samples("missing", 0, u64::MAX).unwrap());
}

#[test]
fn test_index_list_and_delete() {
    let store = seeded_store();

    let entries = MetadataStore::list_all(&store).unwrap();
    assert_eq!(
        entries,
        vec![IndexEntry::new("cpu", 300), IndexEntry::new("mem", 150)]
    );

    assert_eq!(MetadataStore::delete(&store, "cpu").unwrap(), Removal::Removed(1));
    assert_eq!(MetadataStore::delete(&store, "cpu").unwrap(), Removal::NotFound);
    assert!(store.get_index("cpu").unwrap().is_none());
    assert_eq!(store.get_index("mem").unwrap(), Some(IndexEntry::new("mem", 150)));
}

#[test]
fn test_state_get_and_delete() {
    let store = seeded_store();

    let state = StateStore::get(&store, "cpu").unwrap();
    assert_eq!(state, Some(AnalyticState::from_bytes(vec![1, 2])));
    assert!(StateStore::get(&store, "mem").unwrap().is_none());

    assert_eq!(StateStore::delete(&store, "cpu").unwrap(), Removal::Removed(1));
    assert_eq!(StateStore::delete(&store, "cpu").unwrap(), Removal::NotFound);
    assert!(StateStore::get(&store, "cpu").unwrap().is_none());
}

#[test]
fn test_persistence_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lookout.db");

    {
        let store = SqliteStore::new(&path).unwrap();
        store.put_sample("disk", Sample::new(42, 0.25)).unwrap();
        store.put_index(&IndexEntry::new("disk", 42)).unwrap();
    }

    let store = SqliteStore::new(&path).unwrap();
    assert_eq!(store.query_range("disk", 0, 100).unwrap(), vec![Sample::new(42, 0.25)]);
    assert_eq!(MetadataStore::list_all(&store).unwrap().len(), 1);
}

#[test]
fn test_far_future_stamp_is_within_full_range() {
    let store = SqliteStore::new(":memory:").unwrap();
    store.put_sample("skewed", Sample::new(u64::MAX, 1.0)).unwrap();

    // Stamps saturate at i64::MAX but stay inside [0, u64::MAX)
    assert!(store.has_samples("skewed", 0, u64::MAX).unwrap());
    assert_eq!(store.query_range("skewed", 0, u64::MAX).unwrap().len(), 1);
    assert!(!store.has_samples("skewed", 0, i64::MAX as u64).unwrap());

    assert_eq!(store.delete_range("skewed", 0, u64::MAX).unwrap(), Removal::Removed(1));
    assert!(!store.has_samples("skewed", 0, u64::MAX).unwrap());
    assert_eq!(store.delete_range("skewed", 0, u64::MAX).unwrap(), Removal::NotFound);
}
