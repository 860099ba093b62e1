/*!
 * Concurrent Table
 *
 * Sharded hash table: a fixed array of independently locked buckets, each a
 * chained list of pairs, grown through a ladder of primes.
 *
 * # Locking
 *
 * Two lock levels, always taken in this order:
 *
 * 1. The table-wide `RwLock` around the bucket array. Every get, add and
 *    remove holds it shared; only a resize holds it exclusively.
 * 2. The bucket's own `RwLock`, shared for lookups and exclusive for writes.
 *
 * Operations on different buckets therefore run fully in parallel, and no
 * bucket lock can be granted while a resize owns the array.
 *
 * # Resize
 *
 * Inserting a new key that would bring the element count up to the bucket
 * count triggers a stop-the-world resize. The fast path reserves its slot in
 * the element count with a compare-and-swap that fails at the threshold; the
 * refused insert retries under the exclusive table lock, re-validates, and
 * rebuilds the array at the next ladder prime.
 */

mod bucket;
mod ladder;

use crate::core::errors::TableResult;
use crate::core::sync::config::TableConfig;
use ahash::RandomState;
use bucket::{Bucket, Upsert};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Point-in-time table statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableStats {
    pub len: usize,
    pub bucket_count: usize,
    pub resizes: usize,
    pub longest_chain: usize,
}

impl TableStats {
    pub fn load_factor(&self) -> f64 {
        if self.bucket_count == 0 {
            return 0.0;
        }
        self.len as f64 / self.bucket_count as f64
    }
}

/// Sharded concurrent hash table with pluggable hashing
///
/// # Performance
///
/// - **Parallel access**: different buckets never contend
/// - **Reads**: shared table lock + shared bucket lock, linear chain scan
/// - **Resize**: O(n) rehash under the exclusive table lock, amortized by
///   roughly doubling the bucket count each time
///
/// # Example
///
/// ```
/// use sync_containers::ConcurrentTable;
///
/// let table = ConcurrentTable::new();
/// table.add_pair("a", 1);
/// table.add_pair("b", 2);
/// table.add_pair("a", 3);
///
/// assert_eq!(table.get_value(&"a", 0), 3);
/// assert_eq!(table.get_value(&"c", -1), -1);
/// ```
pub struct ConcurrentTable<K, V, S = RandomState> {
    /// Table-wide lock; exclusive only while the array is being replaced
    buckets: RwLock<Vec<Bucket<K, V>>>,
    len: AtomicUsize,
    resizes: AtomicUsize,
    hash_builder: S,
}

impl<K: Hash + Eq, V> ConcurrentTable<K, V, RandomState> {
    /// Create a table with the default bucket count
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    pub fn with_config(config: TableConfig) -> Self {
        Self::with_config_and_hasher(config, RandomState::new())
    }

    /// Create a table from untrusted configuration, rejecting zero buckets
    pub fn try_with_config(config: TableConfig) -> TableResult<Self> {
        Self::try_with_config_and_hasher(config, RandomState::new())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> ConcurrentTable<K, V, S> {
    /// Validating variant of [`Self::with_config_and_hasher`]
    pub fn try_with_config_and_hasher(
        config: TableConfig,
        hash_builder: S,
    ) -> TableResult<Self> {
        config.validate()?;
        Ok(Self::with_config_and_hasher(config, hash_builder))
    }

    /// Create a table with a caller-supplied hasher
    ///
    /// `initial_buckets` must be non-zero; use
    /// [`Self::try_with_config_and_hasher`] for configuration loaded at runtime.
    pub fn with_config_and_hasher(config: TableConfig, hash_builder: S) -> Self {
        assert!(
            config.initial_buckets > 0,
            "Table needs at least one bucket"
        );

        Self {
            buckets: RwLock::new(Self::empty_buckets(config.initial_buckets)),
            len: AtomicUsize::new(0),
            resizes: AtomicUsize::new(0),
            hash_builder,
        }
    }

    fn empty_buckets(count: usize) -> Vec<Bucket<K, V>> {
        (0..count).map(|_| Bucket::new()).collect()
    }

    #[inline]
    fn bucket_index(&self, key: &K, bucket_count: usize) -> usize {
        (self.hash_builder.hash_one(key) % bucket_count as u64) as usize
    }

    /// Value for `key`, or `default` when absent
    pub fn get_value(&self, key: &K, default: V) -> V
    where
        V: Clone,
    {
        self.get(key).unwrap_or(default)
    }

    /// Value for `key`, if present
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let buckets = self.buckets.read();
        buckets[self.bucket_index(key, buckets.len())].value(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        let buckets = self.buckets.read();
        buckets[self.bucket_index(key, buckets.len())].contains(key)
    }

    /// Insert a pair, overwriting the value of an existing key
    ///
    /// Resizes first when a new key would bring the element count up to the
    /// bucket count.
    pub fn add_pair(&self, key: K, value: V) {
        let (key, value) = {
            let buckets = self.buckets.read();
            let bucket_count = buckets.len();
            let bucket = &buckets[self.bucket_index(&key, bucket_count)];
            match bucket.upsert_if(key, value, || self.reserve_slot(bucket_count)) {
                Upsert::Updated | Upsert::Inserted => return,
                Upsert::Refused(key, value) => (key, value),
            }
        };
        self.add_pair_exclusive(key, value);
    }

    /// Claim one element slot while staying below the resize threshold
    fn reserve_slot(&self, bucket_count: usize) -> bool {
        self.len
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |len| {
                (len + 1 < bucket_count).then_some(len + 1)
            })
            .is_ok()
    }

    /// Slow path: insert under the exclusive table lock, resizing if needed
    fn add_pair_exclusive(&self, key: K, value: V) {
        let mut buckets = self.buckets.write();

        // Another writer may have inserted this key or resized meanwhile
        let index = self.bucket_index(&key, buckets.len());
        if let Some(slot) = buckets[index]
            .entries_mut()
            .iter_mut()
            .find(|(k, _)| *k == key)
        {
            slot.1 = value;
            return;
        }

        let len = self.len.load(Ordering::Acquire) + 1;
        if len >= buckets.len() {
            self.resize(&mut buckets, len);
        }

        let index = self.bucket_index(&key, buckets.len());
        buckets[index].entries_mut().push((key, value));
        self.len.fetch_add(1, Ordering::AcqRel);
    }

    /// Rebuild the bucket array at the next ladder size
    ///
    /// Caller holds the table-wide lock exclusively.
    fn resize(&self, buckets: &mut Vec<Bucket<K, V>>, len: usize) {
        let from = buckets.len();
        let Some(to) = ladder::next_bucket_count(from, len) else {
            debug!(buckets = from, len, "prime ladder exhausted, keeping bucket count");
            return;
        };

        let mut fresh = Self::empty_buckets(to);
        for (key, value) in std::mem::take(buckets)
            .into_iter()
            .flat_map(Bucket::into_entries)
        {
            let index = self.bucket_index(&key, to);
            fresh[index].entries_mut().push((key, value));
        }
        *buckets = fresh;

        self.resizes.fetch_add(1, Ordering::Relaxed);
        debug!(from, to, len, "table resized");
    }

    /// Remove `key`, returning its value; no-op when absent
    pub fn remove_pair(&self, key: &K) -> Option<V> {
        let buckets = self.buckets.read();
        let removed = buckets[self.bucket_index(key, buckets.len())].remove(key);
        if removed.is_some() {
            self.len.fetch_sub(1, Ordering::AcqRel);
        }
        removed
    }

    /// Drop every pair; the bucket count is kept
    pub fn clear(&self) {
        let mut buckets = self.buckets.write();
        for bucket in buckets.iter_mut() {
            bucket.entries_mut().clear();
        }
        self.len.store(0, Ordering::Release);
    }

    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.read().len()
    }

    /// Copy of every pair, bucket by bucket
    pub fn entries(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        let buckets = self.buckets.read();
        buckets.iter().flat_map(Bucket::snapshot).collect()
    }

    pub fn stats(&self) -> TableStats {
        let buckets = self.buckets.read();
        TableStats {
            len: self.len(),
            bucket_count: buckets.len(),
            resizes: self.resizes.load(Ordering::Relaxed),
            longest_chain: buckets.iter().map(Bucket::len).max().unwrap_or(0),
        }
    }
}

impl<K: Hash + Eq, V> Default for ConcurrentTable<K, V, RandomState> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> fmt::Debug for ConcurrentTable<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrentTable")
            .field("stats", &self.stats())
            .finish()
    }
}
