use crate::SharedRegistry;
use core::fmt::{Debug, Formatter, Result as FmtResult};
use prometheus::Registry;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Per-registry cache of facade instances
///
/// Lookups of existing facades take a shared read lock only. Construction is serialized
/// by a separate mutex and re-checks the map once it holds it, so two threads racing on
/// the same registry construct exactly one facade. A facade becomes visible only once its
/// construction has fully completed.
///
/// Entries are never removed. Each one holds a clone of its registry, which keeps the
/// allocation alive and its address from being reused as another registry's key.
pub struct FacadeCache<T> {
    entries: RwLock<BTreeMap<usize, Entry<T>>>,
    init_lock: Mutex<()>,
}

struct Entry<T> {
    _registry: SharedRegistry,
    facade: Arc<T>,
}

impl<T> FacadeCache<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            init_lock: Mutex::new(()),
        }
    }

    /// The facade already built for `registry`, if any
    #[must_use]
    pub fn get(&self, registry: &SharedRegistry) -> Option<Arc<T>> {
        self.read().get(&key(registry)).map(|entry| Arc::clone(&entry.facade))
    }

    /// Return the facade for `registry`, building it with `init` if there is none yet
    ///
    /// `init` runs at most once per registry across all threads. If it fails, nothing is
    /// cached and the error is returned; a later call tries again.
    ///
    /// `init` must not call back into this cache.
    ///
    /// # Errors
    ///
    /// Returns whatever error `init` returns.
    pub fn get_or_try_init<E, F>(&self, registry: &SharedRegistry, init: F) -> Result<Arc<T>, E>
    where
        F: FnOnce(&Registry) -> Result<T, E>,
    {
        if let Some(facade) = self.get(registry) {
            return Ok(facade);
        }

        let _guard = self.init_lock.lock().unwrap_or_else(PoisonError::into_inner);

        // another thread may have finished while this one waited for the lock
        if let Some(facade) = self.get(registry) {
            return Ok(facade);
        }

        let facade = Arc::new(init(registry.as_ref())?);
        let _ = self.write().insert(
            key(registry),
            Entry {
                _registry: Arc::clone(registry),
                facade: Arc::clone(&facade),
            },
        );

        Ok(facade)
    }

    /// Number of registries a facade has been built for
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<usize, Entry<T>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<usize, Entry<T>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for FacadeCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for FacadeCache<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("FacadeCache").field("len", &self.len()).finish_non_exhaustive()
    }
}

fn key(registry: &SharedRegistry) -> usize {
    Arc::as_ptr(registry).addr()
}
