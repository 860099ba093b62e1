/*!
 * Concurrent Table Integration Tests
 *
 * Lookup, overwrite, removal, and growth under concurrent access
 */

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use sync_containers::{ConcurrentTable, TableConfig, TableError};

#[test]
fn test_add_get_overwrite_remove() {
    let table = ConcurrentTable::new();
    table.add_pair("alpha".to_string(), 1);
    table.add_pair("beta".to_string(), 2);
    table.add_pair("alpha".to_string(), 10);

    assert_eq!(table.len(), 2);
    assert_eq!(table.get_value(&"alpha".to_string(), 0), 10);
    assert_eq!(table.get_value(&"beta".to_string(), 0), 2);
    assert_eq!(table.get_value(&"gamma".to_string(), -1), -1);

    assert_eq!(table.remove_pair(&"alpha".to_string()), Some(10));
    assert_eq!(table.remove_pair(&"alpha".to_string()), None);
    assert_eq!(table.get_value(&"alpha".to_string(), 0), 0);
    assert_eq!(table.len(), 1);
}

#[test]
fn test_growth_follows_prime_ladder() {
    let table = ConcurrentTable::new();
    assert_eq!(table.bucket_count(), 53);

    for key in 0..52u32 {
        table.add_pair(key, key);
    }
    assert_eq!(table.bucket_count(), 53);

    table.add_pair(52, 52);
    assert_eq!(table.bucket_count(), 97);

    for key in 53..200u32 {
        table.add_pair(key, key);
    }
    assert_eq!(table.bucket_count(), 389);
    assert_eq!(table.stats().resizes, 3);

    for key in 0..200u32 {
        assert_eq!(table.get_value(&key, u32::MAX), key);
    }
}

#[test]
fn test_custom_initial_buckets() {
    let table = ConcurrentTable::with_config(TableConfig::with_buckets(7));
    for key in 0..6u8 {
        table.add_pair(key, ());
    }
    assert_eq!(table.bucket_count(), 7);

    table.add_pair(6, ());
    assert_eq!(table.bucket_count(), 53);
    assert_eq!(table.len(), 7);
}

#[test]
fn test_shuffled_keys_match_model() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut keys: Vec<u64> = (0..2_000).collect();
    keys.shuffle(&mut rng);

    let table = ConcurrentTable::new();
    let mut model = HashMap::new();
    for &key in &keys {
        let value: u32 = rng.gen();
        table.add_pair(key, value);
        model.insert(key, value);
        if rng.gen_bool(0.2) {
            let victim = keys[rng.gen_range(0..keys.len())];
            assert_eq!(table.remove_pair(&victim), model.remove(&victim));
        }
    }

    assert_eq!(table.len(), model.len());
    let mut entries = table.entries();
    entries.sort_unstable();
    let mut expected: Vec<_> = model.into_iter().collect();
    expected.sort_unstable();
    assert_eq!(entries, expected);
}

#[test]
fn test_disjoint_writers_all_land() {
    let table = Arc::new(ConcurrentTable::new());

    let writers: Vec<_> = (0..8u64)
        .map(|t| {
            let table = table.clone();
            thread::spawn(move || {
                for i in 0..2_000 {
                    let key = t * 2_000 + i;
                    table.add_pair(key, key * 2);
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    assert_eq!(table.len(), 16_000);
    for key in 0..16_000u64 {
        assert_eq!(table.get(&key), Some(key * 2));
    }
    assert!(table.bucket_count() > 16_000);
}

#[test]
fn test_same_key_writers_keep_single_entry() {
    let table = Arc::new(ConcurrentTable::new());

    let writers: Vec<_> = (0..8u32)
        .map(|t| {
            let table = table.clone();
            thread::spawn(move || {
                for _ in 0..500 {
                    table.add_pair("shared", t);
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    assert_eq!(table.len(), 1);
    assert!(table.get(&"shared").is_some_and(|v| v < 8));
}

#[test]
fn test_readers_see_stable_keys_during_resizes() {
    let table = Arc::new(ConcurrentTable::new());
    for key in 0..50u64 {
        table.add_pair(key, key);
    }

    let done = Arc::new(AtomicBool::new(false));
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let table = table.clone();
            let done = done.clone();
            thread::spawn(move || {
                let mut rounds = 0u64;
                while !done.load(Ordering::Acquire) {
                    for key in 0..50u64 {
                        assert_eq!(table.get_value(&key, u64::MAX), key);
                    }
                    rounds += 1;
                }
                rounds
            })
        })
        .collect();

    for key in 1_000..21_000u64 {
        table.add_pair(key, key);
    }
    done.store(true, Ordering::Release);

    for reader in readers {
        assert!(reader.join().unwrap() > 0);
    }
    assert!(table.stats().resizes >= 5);
}

#[test]
fn test_clear_keeps_bucket_count() {
    let table = ConcurrentTable::new();
    for key in 0..100u16 {
        table.add_pair(key, key);
    }
    let buckets = table.bucket_count();

    table.clear();
    assert!(table.is_empty());
    assert_eq!(table.bucket_count(), buckets);
    assert_eq!(table.get(&5), None);
}

#[test]
fn test_stats_serialize() {
    let table = ConcurrentTable::new();
    table.add_pair(1u8, 1u8);
    let stats = table.stats();

    let json = serde_json::to_value(stats).unwrap();
    assert_eq!(json["len"], 1);
    assert_eq!(json["bucket_count"], 53);
    assert!(stats.load_factor() > 0.0);
}

#[test]
fn test_config_from_json() {
    let config: TableConfig = serde_json::from_str(r#"{"initial_buckets": 97}"#).unwrap();
    let table = ConcurrentTable::<u64, u64>::try_with_config(config).unwrap();
    assert_eq!(table.bucket_count(), 97);

    let zero: TableConfig = serde_json::from_str(r#"{"initial_buckets": 0}"#).unwrap();
    assert_eq!(
        zero.validate(),
        Err(TableError::InvalidConfig(
            "initial bucket count must be at least 1".into()
        ))
    );
    assert!(ConcurrentTable::<u64, u64>::try_with_config(zero).is_err());
}
