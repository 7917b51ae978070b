//! Thread-safe generic containers.
//!
//! Small CRUD facades over lock-guarded std collections, independent from the retry core:
//! - [`SyncList`] ordered sequence (`RwLock<Vec<T>>`)
//! - [`SyncMap`]  key-value store (`RwLock<HashMap<K, V>>`)
//! - [`SyncSet`]  unique values (`RwLock<HashSet<T>>`)
//!
//! ## Rules
//! - Every `range` call iterates over a **snapshot** taken under a read lock; the lock is
//!   released before the callback runs, so callbacks may freely mutate the container
//! - `Clone` produces an independent container from a snapshot
//! - A poisoned lock is recovered (the data is still structurally valid: every
//!   mutation is a single std collection call)

mod list;
mod map;
mod set;

pub use list::SyncList;
pub use map::SyncMap;
pub use set::SyncSet;

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[inline]
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

#[inline]
fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
