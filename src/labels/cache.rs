//! Memoizing label cache
//!
//! Safe to share across threads. Each key has its own fill lock so a label
//! is fetched from the inner resolver at most once, even when several
//! threads ask for it at the same moment. Failed lookups are not cached and
//! leave no entry behind.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock, TryLockError};

use super::LabelResolver;
use crate::error::ResolutionError;

type Slot = Arc<Mutex<Option<String>>>;

pub struct LabelCache<R> {
    inner: R,
    slots: RwLock<HashMap<String, Slot>>,
}

impl<R: LabelResolver> LabelCache<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            slots: RwLock::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Number of labels currently cached
    pub fn len(&self) -> usize {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots
            .values()
            .filter(|slot| slot.lock().unwrap_or_else(PoisonError::into_inner).is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn slot(&self, uri: &str) -> Slot {
        if let Some(slot) = self
            .slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(uri)
        {
            return Arc::clone(slot);
        }
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(uri.to_string()).or_default())
    }

    /// Drop `slot` for `uri` unless another caller has filled, replaced or is
    /// currently filling it. A caller that is mid-fill cleans up after itself.
    ///
    /// Must be called without holding the slot's own lock.
    fn discard_empty(&self, uri: &str, slot: &Slot) {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        let unfilled = slots.get(uri).is_some_and(|current| {
            Arc::ptr_eq(current, slot)
                && match current.try_lock() {
                    Ok(label) => label.is_none(),
                    Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().is_none(),
                    Err(TryLockError::WouldBlock) => false,
                }
        });
        if unfilled {
            slots.remove(uri);
        }
    }
}

impl<R: LabelResolver> LabelResolver for LabelCache<R> {
    fn resolve(&self, uri: &str) -> Result<String, ResolutionError> {
        let slot = self.slot(uri);
        let mut cached = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(label) = cached.as_ref() {
            tracing::trace!(uri, "label cache hit");
            return Ok(label.clone());
        }
        match self.inner.resolve(uri) {
            Ok(label) => {
                tracing::debug!(uri, label = %label, "label cached");
                *cached = Some(label.clone());
                Ok(label)
            }
            Err(e) => {
                drop(cached);
                self.discard_empty(uri, &slot);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    impl LabelResolver for Counting {
        fn resolve(&self, uri: &str) -> Result<String, ResolutionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(5));
            if uri == "bad" {
                return Err(ResolutionError::LabelNotFound {
                    uri: uri.to_string(),
                });
            }
            Ok(format!("label:{}", uri))
        }
    }

    #[test]
    fn test_second_lookup_hits_cache() {
        let cache = LabelCache::new(Counting::default());
        assert_eq!(cache.resolve("a").unwrap(), "label:a");
        assert_eq!(cache.resolve("a").unwrap(), "label:a");
        assert_eq!(cache.inner().calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
        cache.resolve("a").unwrap();
        assert_eq!(cache.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let cache = LabelCache::new(Counting::default());
        assert!(cache.resolve("bad").is_err());
        assert!(cache.resolve("bad").is_err());
        assert_eq!(cache.inner().calls.load(Ordering::SeqCst), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_failed_lookups_leave_no_slots() {
        let cache = LabelCache::new(Counting::default());
        cache.resolve("a").unwrap();
        for _ in 0..5 {
            assert!(cache.resolve("bad").is_err());
        }
        assert_eq!(cache.slots.read().unwrap().len(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_concurrent_failures_leave_no_slots() {
        let cache = Arc::new(LabelCache::new(Counting::default()));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.resolve("bad").is_err())
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert!(cache.slots.read().unwrap().is_empty());
    }

    #[test]
    fn test_concurrent_fill_happens_once() {
        let cache = Arc::new(LabelCache::new(Counting::default()));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.resolve("shared").unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), "label:shared");
        }
        assert_eq!(cache.inner().calls.load(Ordering::SeqCst), 1);
    }
}
