//! # SyncSet: thread-safe set of unique values.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::sync::RwLock;

use super::{read, write};

/// `HashSet<T>` behind a `RwLock`; iteration works on snapshots.
pub struct SyncSet<T> {
    data: RwLock<HashSet<T>>,
}

impl<T: Eq + Hash> SyncSet<T> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashSet::new()),
        }
    }

    /// Adds `value`. Returns `true` if it was not already present.
    pub fn insert(&self, value: T) -> bool {
        write(&self.data).insert(value)
    }

    /// True if `value` is present.
    pub fn contains(&self, value: &T) -> bool {
        read(&self.data).contains(value)
    }

    /// Removes `value`. Returns `true` if it was present.
    pub fn remove(&self, value: &T) -> bool {
        write(&self.data).remove(value)
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        read(&self.data).len()
    }

    /// True if the set is empty.
    pub fn is_empty(&self) -> bool {
        read(&self.data).is_empty()
    }

    /// Removes all values.
    pub fn clear(&self) {
        write(&self.data).clear();
    }
}

impl<T: Eq + Hash + Clone> SyncSet<T> {
    /// Calls `f(value)` for each value of a snapshot; stops when `f` returns `false`.
    pub fn range<F>(&self, mut f: F)
    where
        F: FnMut(&T) -> bool,
    {
        let snapshot = self.to_set();
        for v in &snapshot {
            if !f(v) {
                break;
            }
        }
    }

    /// Copies the current contents into a plain `HashSet`.
    pub fn to_set(&self) -> HashSet<T> {
        read(&self.data).clone()
    }
}

impl<T: Eq + Hash> Default for SyncSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash + Clone> Clone for SyncSet<T> {
    fn clone(&self) -> Self {
        Self {
            data: RwLock::new(self.to_set()),
        }
    }
}

impl<T: Eq + Hash> FromIterator<T> for SyncSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            data: RwLock::new(iter.into_iter().collect()),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SyncSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(read(&self.data).iter()).finish()
    }
}
