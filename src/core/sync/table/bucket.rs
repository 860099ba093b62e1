/*!
 * Table Bucket
 * One shard of the key space: a chained list of pairs behind its own RwLock
 */

use parking_lot::RwLock;

pub(super) struct Bucket<K, V> {
    entries: RwLock<Vec<(K, V)>>,
}

impl<K: Eq, V> Bucket<K, V> {
    pub(super) fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Clone out the value for `key` (shared lock)
    pub(super) fn value(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let entries = self.entries.read();
        entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    pub(super) fn contains(&self, key: &K) -> bool {
        self.entries.read().iter().any(|(k, _)| k == key)
    }

    /// Overwrite an existing entry or append a new one, as `admit` allows
    ///
    /// `admit` runs under the exclusive bucket lock and only when the key is
    /// absent; returning false hands the pair back untouched.
    pub(super) fn upsert_if<F>(&self, key: K, value: V, admit: F) -> Upsert<K, V>
    where
        F: FnOnce() -> bool,
    {
        let mut entries = self.entries.write();
        if let Some(slot) = entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
            return Upsert::Updated;
        }
        if admit() {
            entries.push((key, value));
            Upsert::Inserted
        } else {
            Upsert::Refused(key, value)
        }
    }

    /// Remove and return the first entry matching `key`
    pub(super) fn remove(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.write();
        let position = entries.iter().position(|(k, _)| k == key)?;
        Some(entries.remove(position).1)
    }

    /// Exclusive access for callers already holding the table-wide lock
    pub(super) fn entries_mut(&mut self) -> &mut Vec<(K, V)> {
        self.entries.get_mut()
    }

    pub(super) fn into_entries(self) -> Vec<(K, V)> {
        self.entries.into_inner()
    }

    pub(super) fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub(super) fn snapshot(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.entries.read().clone()
    }
}

/// Outcome of [`Bucket::upsert_if`]
pub(super) enum Upsert<K, V> {
    Updated,
    Inserted,
    Refused(K, V),
}
