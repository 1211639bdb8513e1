/*!
 * Slot Map
 *
 * Concurrent key → slot association used by the keyed lock manager.
 *
 * # Design: Trait-Based Abstraction for Backends
 *
 * The manager only needs load, store and an atomic load-or-store. Any
 * backend that provides those without external locking can be plugged in.
 */

use super::slot::Slot;
use ahash::RandomState;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

/// Concurrent map from key to slot
///
/// Implementations must be safe for unsynchronized concurrent use, and
/// `load_or_store` must be atomic per key: two racing calls for the same key
/// both observe the value installed by whichever call won.
pub trait SlotMap: Send + Sync {
    /// Look up the slot bound to `key`
    fn load(&self, key: &str) -> Option<Arc<Slot>>;

    /// Bind `slot` to `key`, replacing any previous binding
    fn store(&self, key: String, slot: Arc<Slot>);

    /// Insert `slot` if `key` is absent
    ///
    /// Returns the slot now bound to `key`, and `true` if it already existed
    /// (in which case `slot` was not stored).
    fn load_or_store(&self, key: String, slot: Arc<Slot>) -> (Arc<Slot>, bool);

    /// Number of bound keys
    fn len(&self) -> usize;

    /// Check if no key is bound
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Backend name for diagnostics
    fn name(&self) -> &'static str;
}

/// DashMap-backed slot map
///
/// # Performance
///
/// - **Reads**: Shard read lock, no global contention
/// - **Writes**: Shard write lock held only for the entry operation
pub struct ShardedSlotMap {
    slots: DashMap<String, Arc<Slot>, RandomState>,
}

impl ShardedSlotMap {
    pub fn new() -> Self {
        Self {
            slots: DashMap::with_hasher(RandomState::new()),
        }
    }
}

impl Default for ShardedSlotMap {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotMap for ShardedSlotMap {
    #[inline]
    fn load(&self, key: &str) -> Option<Arc<Slot>> {
        self.slots.get(key).map(|slot| Arc::clone(&slot))
    }

    fn store(&self, key: String, slot: Arc<Slot>) {
        self.slots.insert(key, slot);
    }

    fn load_or_store(&self, key: String, slot: Arc<Slot>) -> (Arc<Slot>, bool) {
        match self.slots.entry(key) {
            Entry::Occupied(existing) => (Arc::clone(existing.get()), true),
            Entry::Vacant(vacant) => {
                vacant.insert(Arc::clone(&slot));
                (slot, false)
            }
        }
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn name(&self) -> &'static str {
        "sharded"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_load_or_store() {
        let map = ShardedSlotMap::new();
        let first = Arc::new(Slot::new());
        let second = Arc::new(Slot::new());

        let (bound, existed) = map.load_or_store("k".into(), first.clone());
        assert!(!existed);
        assert!(Arc::ptr_eq(&bound, &first));

        let (bound, existed) = map.load_or_store("k".into(), second.clone());
        assert!(existed);
        assert!(Arc::ptr_eq(&bound, &first));

        assert!(Arc::ptr_eq(&map.load("k").unwrap(), &first));
        assert!(map.load("missing").is_none());
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_store_replaces() {
        let map = ShardedSlotMap::new();
        let first = Arc::new(Slot::new());
        let second = Arc::new(Slot::new());

        map.store("k".into(), first);
        map.store("k".into(), second.clone());
        assert!(Arc::ptr_eq(&map.load("k").unwrap(), &second));
    }

    #[test]
    fn test_racing_load_or_store_single_winner() {
        let map = Arc::new(ShardedSlotMap::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let map = map.clone();
                thread::spawn(move || map.load_or_store("race".into(), Arc::new(Slot::new())))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let winners = results.iter().filter(|(_, existed)| !existed).count();
        assert_eq!(winners, 1);

        let bound = map.load("race").unwrap();
        for (slot, _) in &results {
            assert!(Arc::ptr_eq(slot, &bound));
        }
    }
}
