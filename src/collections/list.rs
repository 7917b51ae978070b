//! # SyncList: thread-safe ordered sequence.
//!
//! ## Example
//! ```rust
//! use retryvisor::SyncList;
//!
//! let list: SyncList<u32> = [1, 2, 3].into_iter().collect();
//! list.append([4, 5]);
//! assert_eq!(list.get(3), Some(4));
//! assert_eq!(list.remove_at(0), Some(1));
//!
//! let mut sum = 0;
//! list.range(|_, v| {
//!     sum += v;
//!     true
//! });
//! assert_eq!(sum, 14);
//! ```

use std::fmt;
use std::sync::RwLock;

use super::{read, write};

/// `Vec<T>` behind a `RwLock`; iteration works on snapshots.
pub struct SyncList<T> {
    data: RwLock<Vec<T>>,
}

impl<T> SyncList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            data: RwLock::new(Vec::new()),
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        read(&self.data).len()
    }

    /// True if the list has no elements.
    pub fn is_empty(&self) -> bool {
        read(&self.data).is_empty()
    }

    /// Removes all elements.
    pub fn clear(&self) {
        write(&self.data).clear();
    }

    /// Appends one element.
    pub fn push(&self, item: T) {
        write(&self.data).push(item);
    }

    /// Appends all `items` under a single lock and returns `self` for chaining.
    pub fn append<I: IntoIterator<Item = T>>(&self, items: I) -> &Self {
        let mut items = items.into_iter().peekable();
        if items.peek().is_some() {
            write(&self.data).extend(items);
        }
        self
    }

    /// Replaces the element at `index`. Returns `false` when out of bounds.
    pub fn set(&self, index: usize, value: T) -> bool {
        match write(&self.data).get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Removes and returns the element at `index`, shifting the rest left.
    pub fn remove_at(&self, index: usize) -> Option<T> {
        let mut data = write(&self.data);
        (index < data.len()).then(|| data.remove(index))
    }
}

impl<T: Clone> SyncList<T> {
    /// Returns a copy of the element at `index`.
    pub fn get(&self, index: usize) -> Option<T> {
        read(&self.data).get(index).cloned()
    }

    /// Calls `f(index, item)` for each element of a snapshot; stops when `f` returns `false`.
    pub fn range<F>(&self, mut f: F)
    where
        F: FnMut(usize, &T) -> bool,
    {
        let snapshot = self.to_vec();
        for (i, item) in snapshot.iter().enumerate() {
            if !f(i, item) {
                break;
            }
        }
    }

    /// Copies the current contents into a plain `Vec`.
    pub fn to_vec(&self) -> Vec<T> {
        read(&self.data).clone()
    }
}

impl<T> Default for SyncList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for SyncList<T> {
    fn clone(&self) -> Self {
        Self {
            data: RwLock::new(self.to_vec()),
        }
    }
}

impl<T> FromIterator<T> for SyncList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            data: RwLock::new(iter.into_iter().collect()),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SyncList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(read(&self.data).iter()).finish()
    }
}
