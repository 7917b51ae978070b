//! # SyncMap: thread-safe key-value store.
//!
//! Besides plain CRUD, [`SyncMap`] offers the atomic read-modify-write helpers that
//! need the write lock held across the check and the update:
//! - [`SyncMap::load_or_store`] inserts only when absent;
//! - [`SyncMap::swap`] replaces and returns the previous value;
//! - [`SyncMap::compare_and_swap`] / [`SyncMap::compare_and_delete`] act only on an expected value.
//!
//! ## Example
//! ```rust
//! use retryvisor::SyncMap;
//!
//! let m: SyncMap<&str, u32> = SyncMap::new();
//! assert_eq!(m.load_or_store("a", 1), (1, false));
//! assert_eq!(m.load_or_store("a", 2), (1, true));
//! assert!(m.compare_and_swap(&"a", &1, 5));
//! assert_eq!(m.load(&"a"), Some(5));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::RwLock;

use super::{read, write};

/// `HashMap<K, V>` behind a `RwLock`; iteration works on snapshots.
pub struct SyncMap<K, V> {
    data: RwLock<HashMap<K, V>>,
}

impl<K, V> SyncMap<K, V>
where
    K: Eq + Hash,
{
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts or overwrites `key`.
    pub fn store(&self, key: K, value: V) {
        write(&self.data).insert(key, value);
    }

    /// Removes `key`; no-op when absent.
    pub fn delete(&self, key: &K) {
        write(&self.data).remove(key);
    }

    /// Removes `key` and returns its value, if any.
    pub fn load_and_delete(&self, key: &K) -> Option<V> {
        write(&self.data).remove(key)
    }

    /// Stores `value` and returns the previous value, if any.
    pub fn swap(&self, key: K, value: V) -> Option<V> {
        write(&self.data).insert(key, value)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        read(&self.data).len()
    }

    /// True if the map has no entries.
    pub fn is_empty(&self) -> bool {
        read(&self.data).is_empty()
    }

    /// True if `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        read(&self.data).contains_key(key)
    }

    /// Removes all entries.
    pub fn clear(&self) {
        write(&self.data).clear();
    }
}

impl<K, V> SyncMap<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Returns a copy of the value for `key`.
    pub fn load(&self, key: &K) -> Option<V> {
        read(&self.data).get(key).cloned()
    }

    /// Returns `(existing, true)` if `key` is present, otherwise stores `value`
    /// and returns `(value, false)`.
    pub fn load_or_store(&self, key: K, value: V) -> (V, bool) {
        let mut data = write(&self.data);
        if let Some(existing) = data.get(&key) {
            return (existing.clone(), true);
        }
        data.insert(key, value.clone());
        (value, false)
    }
}

impl<K, V> SyncMap<K, V>
where
    K: Eq + Hash,
    V: PartialEq,
{
    /// Replaces the value for `key` only when it currently equals `old`.
    pub fn compare_and_swap(&self, key: &K, old: &V, new: V) -> bool {
        match write(&self.data).get_mut(key) {
            Some(current) if *current == *old => {
                *current = new;
                true
            }
            _ => false,
        }
    }

    /// Removes `key` only when its value currently equals `old`.
    pub fn compare_and_delete(&self, key: &K, old: &V) -> bool {
        let mut data = write(&self.data);
        if data.get(key).is_some_and(|current| current == old) {
            data.remove(key);
            return true;
        }
        false
    }
}

impl<K, V> SyncMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Calls `f(key, value)` for each entry of a snapshot; stops when `f` returns `false`.
    ///
    /// Iteration order is unspecified.
    pub fn range<F>(&self, mut f: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        let snapshot = self.to_map();
        for (k, v) in &snapshot {
            if !f(k, v) {
                break;
            }
        }
    }

    /// Copies the current contents into a plain `HashMap`.
    pub fn to_map(&self) -> HashMap<K, V> {
        read(&self.data).clone()
    }
}

impl<K: Eq + Hash, V> Default for SyncMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Clone for SyncMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn clone(&self) -> Self {
        Self {
            data: RwLock::new(self.to_map()),
        }
    }
}

impl<K: Eq + Hash, V> FromIterator<(K, V)> for SyncMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            data: RwLock::new(iter.into_iter().collect()),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for SyncMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(read(&self.data).iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_store_load_delete() {
        let m = SyncMap::new();
        m.store("k", 1);
        m.store("k", 2);
        assert_eq!(m.load(&"k"), Some(2));
        assert_eq!(m.len(), 1);
        m.delete(&"k");
        m.delete(&"k");
        assert_eq!(m.load(&"k"), None);
        assert!(m.is_empty());
    }

    #[test]
    fn test_load_and_delete_returns_value_once() {
        let m: SyncMap<u8, &str> = [(1, "one")].into_iter().collect();
        assert_eq!(m.load_and_delete(&1), Some("one"));
        assert_eq!(m.load_and_delete(&1), None);
    }

    #[test]
    fn test_swap_returns_previous() {
        let m = SyncMap::new();
        assert_eq!(m.swap("k", 1), None);
        assert_eq!(m.swap("k", 2), Some(1));
        assert_eq!(m.load(&"k"), Some(2));
    }

    #[test]
    fn test_compare_and_swap_requires_match() {
        let m: SyncMap<&str, u32> = [("k", 1)].into_iter().collect();
        assert!(!m.compare_and_swap(&"k", &9, 5));
        assert!(!m.compare_and_swap(&"missing", &1, 5));
        assert!(m.compare_and_swap(&"k", &1, 5));
        assert_eq!(m.load(&"k"), Some(5));
    }

    #[test]
    fn test_compare_and_delete_requires_match() {
        let m: SyncMap<&str, u32> = [("k", 1)].into_iter().collect();
        assert!(!m.compare_and_delete(&"k", &2));
        assert!(m.contains_key(&"k"));
        assert!(m.compare_and_delete(&"k", &1));
        assert!(!m.contains_key(&"k"));
    }

    #[test]
    fn test_range_callback_may_mutate() {
        let m: SyncMap<u32, u32> = (0..5).map(|i| (i, i)).collect();
        let mut visited = 0;
        m.range(|k, _| {
            m.delete(k);
            m.store(k + 100, 0);
            visited += 1;
            true
        });
        assert_eq!(visited, 5);
        assert_eq!(m.len(), 5);
        assert!(m.to_map().keys().all(|k| *k >= 100));
    }

    #[test]
    fn test_range_stops_early() {
        let m: SyncMap<u32, ()> = (0..10).map(|i| (i, ())).collect();
        let mut visited = 0;
        m.range(|_, _| {
            visited += 1;
            false
        });
        assert_eq!(visited, 1);
    }

    #[test]
    fn test_load_or_store_single_winner() {
        let m = Arc::new(SyncMap::new());
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let m = Arc::clone(&m);
                thread::spawn(move || m.load_or_store("key", i))
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(results.iter().filter(|(_, loaded)| !loaded).count(), 1);
        let winner = m.load(&"key").unwrap();
        assert!(results.iter().all(|(v, _)| *v == winner));
    }

    #[test]
    fn test_clone_is_independent() {
        let m: SyncMap<u8, u8> = [(1, 1)].into_iter().collect();
        let copy = m.clone();
        m.clear();
        assert_eq!(copy.load(&1), Some(1));
        assert!(m.is_empty());
    }
}
