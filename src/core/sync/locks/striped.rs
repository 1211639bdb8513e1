/*!
 * Lock Striping Pattern
 * Slot map partitioned across a fixed number of RwLock stripes
 */

use crate::core::sync::keyed::{Slot, SlotMap};
use ahash::RandomState;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::hash::BuildHasher;
use std::sync::Arc;

/// Lock-striped slot map
///
/// # Performance
///
/// - **Contention reduction**: N-way striping reduces lock contention by ~N
/// - **Typical stripe count**: 4-64 (balance between memory and contention)
/// - **Best for**: A small set of hot keys where sharding overhead dominates
///
/// Lookups take a stripe read lock. `load_or_store` checks under the read
/// lock first and only upgrades to the write lock for an absent key.
pub struct StripedSlotMap {
    stripes: Vec<RwLock<HashMap<String, Arc<Slot>>>>,
    stripe_mask: usize,
    hasher: RandomState,
}

impl StripedSlotMap {
    /// Create a striped map with `stripe_count` stripes
    ///
    /// `stripe_count` must be a power of two; `KeyedLockConfig::validate`
    /// rejects other values before a map is built.
    pub fn new(stripe_count: usize) -> Self {
        debug_assert!(
            stripe_count > 0 && stripe_count.is_power_of_two(),
            "Stripe count must be a power of 2"
        );

        let stripes = (0..stripe_count)
            .map(|_| RwLock::new(HashMap::new()))
            .collect();

        Self {
            stripes,
            stripe_mask: stripe_count - 1,
            hasher: RandomState::new(),
        }
    }

    /// Get stripe index for key
    #[inline]
    fn stripe(&self, key: &str) -> &RwLock<HashMap<String, Arc<Slot>>> {
        let idx = (self.hasher.hash_one(key) as usize) & self.stripe_mask;
        &self.stripes[idx]
    }

    /// Number of stripes
    pub fn stripe_count(&self) -> usize {
        self.stripes.len()
    }
}

impl SlotMap for StripedSlotMap {
    fn load(&self, key: &str) -> Option<Arc<Slot>> {
        self.stripe(key).read().get(key).cloned()
    }

    fn store(&self, key: String, slot: Arc<Slot>) {
        self.stripe(&key).write().insert(key, slot);
    }

    fn load_or_store(&self, key: String, slot: Arc<Slot>) -> (Arc<Slot>, bool) {
        let stripe = self.stripe(&key);

        if let Some(existing) = stripe.read().get(&key) {
            return (Arc::clone(existing), true);
        }

        // Another writer may have installed the key between the two locks
        let mut guard = stripe.write();
        match guard.get(&key) {
            Some(existing) => (Arc::clone(existing), true),
            None => {
                guard.insert(key, Arc::clone(&slot));
                (slot, false)
            }
        }
    }

    fn len(&self) -> usize {
        self.stripes.iter().map(|stripe| stripe.read().len()).sum()
    }

    fn name(&self) -> &'static str {
        "striped"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_basic_operations() {
        let map = StripedSlotMap::new(8);
        let slot = Arc::new(Slot::new());

        let (bound, existed) = map.load_or_store("key1".into(), slot.clone());
        assert!(!existed);
        assert!(Arc::ptr_eq(&bound, &slot));

        let (bound, existed) = map.load_or_store("key1".into(), Arc::new(Slot::new()));
        assert!(existed);
        assert!(Arc::ptr_eq(&bound, &slot));

        assert!(map.load("key2").is_none());
        assert_eq!(map.len(), 1);
        assert!(!map.is_empty());
    }

    #[test]
    fn test_concurrent_access() {
        let map = Arc::new(StripedSlotMap::new(16));
        let mut handles = vec![];

        for i in 0..16 {
            let map = map.clone();
            handles.push(thread::spawn(move || {
                for j in 0..100 {
                    map.load_or_store(format!("{}-{}", i, j), Arc::new(Slot::new()));
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(map.len(), 1600);
    }

    #[test]
    fn test_stripe_distribution() {
        let map = StripedSlotMap::new(8);

        for i in 0..1000 {
            map.store(format!("key-{}", i), Arc::new(Slot::new()));
        }

        // Each stripe should have roughly 1000/8 ≈ 125 keys
        for stripe in &map.stripes {
            let count = stripe.read().len();
            assert!(count > 50 && count < 250, "Bad distribution: {}", count);
        }
    }
}
