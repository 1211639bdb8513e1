/*!
 * Keyed Lock Manager
 *
 * Lazily binds one slot per key and recycles slots that lose the install race.
 *
 * # Protocol
 *
 * `acquire(key)`:
 * 1. Pull a candidate slot from the pool, or allocate an idle one
 * 2. `load_or_store(key, candidate)` into the slot map
 * 3. If the key already had a slot, push the candidate back into the pool
 * 4. Wait on the bound slot until it is idle, then mark it held
 *
 * `release(key)` loads the bound slot, clears the flag and wakes all waiters.
 *
 * Bindings are permanent, so the pool only ever sees rejected candidates.
 * A rejected candidate was never reachable through the map and therefore
 * never held by anyone.
 */

use super::guard::{KeyGuard, OwnedKeyGuard};
use super::slot::Slot;
use super::slot_map::{ShardedSlotMap, SlotMap};
use super::stats::{Counters, KeyedLockStats};
use crate::core::errors::KeyedLockResult;
use crate::core::sync::config::{KeyedLockConfig, MapBackend};
use crate::core::sync::lockfree::LockFreeStack;
use crate::core::sync::locks::StripedSlotMap;
use std::sync::Arc;
use tracing::{debug, instrument, trace};

/// Mutual exclusion per string key
///
/// Same key: at most one holder at a time. Different keys: no shared lock.
/// No fairness among waiters and no reentrancy: acquiring a key the calling
/// thread already holds deadlocks.
///
/// # Examples
///
/// ```
/// use keyed_lock::KeyedLock;
///
/// let locks = KeyedLock::new();
///
/// locks.acquire("user:42");
/// // ... critical section for user 42 ...
/// locks.release("user:42");
///
/// // Or scoped:
/// {
///     let _guard = locks.lock("user:42");
///     // ...
/// }
/// assert!(!locks.is_locked("user:42"));
/// ```
pub struct KeyedLock {
    pool: LockFreeStack<Arc<Slot>>,
    slots: Box<dyn SlotMap>,
    counters: Counters,
}

impl KeyedLock {
    /// Create a manager with an empty pool and an empty sharded slot map
    pub fn new() -> Self {
        Self::with_map(ShardedSlotMap::new())
    }

    /// Create a manager over a caller-provided slot map
    pub fn with_map<M>(map: M) -> Self
    where
        M: SlotMap + 'static,
    {
        Self {
            pool: LockFreeStack::new(),
            slots: Box::new(map),
            counters: Counters::default(),
        }
    }

    /// Create a manager from a validated configuration
    #[instrument(level = "debug", skip(config), fields(backend = ?config.backend))]
    pub fn with_config(config: KeyedLockConfig) -> KeyedLockResult<Self> {
        config.validate()?;

        let lock = match config.select_backend() {
            MapBackend::Striped => Self::with_map(StripedSlotMap::new(config.stripes)),
            _ => Self::with_map(ShardedSlotMap::new()),
        };

        for _ in 0..config.prewarm_slots {
            lock.pool.push(Arc::new(Slot::new()));
        }

        debug!(
            backend = lock.slots.name(),
            prewarm_slots = config.prewarm_slots,
            "Keyed lock initialized"
        );

        Ok(lock)
    }

    /// Take a slot from the pool, or allocate one if the pool is empty
    fn candidate(&self) -> Arc<Slot> {
        match self.pool.pull() {
            Some(slot) => {
                debug_assert!(!slot.is_held(), "pooled slot observed held");
                Counters::bump(&self.counters.recycled);
                slot
            }
            None => {
                Counters::bump(&self.counters.allocated);
                Arc::new(Slot::new())
            }
        }
    }

    /// Return the slot permanently bound to `key`, binding one if needed
    fn bind(&self, key: &str) -> Arc<Slot> {
        let candidate = self.candidate();
        let (bound, existed) = self
            .slots
            .load_or_store(key.to_owned(), Arc::clone(&candidate));

        if existed {
            // Never reachable through the map, so nobody can be waiting on it
            Counters::bump(&self.counters.rejected);
            self.pool.push(candidate);
        } else {
            trace!(key, "Bound new slot");
        }

        bound
    }

    /// Block until the caller holds `key` exclusively
    pub fn acquire(&self, key: &str) {
        let slot = self.bind(key);

        if slot.acquire() {
            Counters::bump(&self.counters.contended);
            trace!(key, "Acquired after waiting");
        } else {
            trace!(key, "Acquired");
        }
    }

    /// Take `key` if nobody holds it, without waiting
    pub fn try_acquire(&self, key: &str) -> bool {
        let acquired = self.bind(key).try_acquire();
        trace!(key, acquired, "Try acquire");
        acquired
    }

    /// Release `key`, waking every waiter
    ///
    /// Releasing a key that was never acquired is a silent no-op.
    pub fn release(&self, key: &str) {
        match self.slots.load(key) {
            Some(slot) => {
                slot.release();
                trace!(key, "Released");
            }
            None => debug!(key, "Release of unbound key ignored"),
        }
    }

    /// Acquire `key` and return a guard that releases it on drop
    pub fn lock(&self, key: &str) -> KeyGuard<'_> {
        self.acquire(key);
        KeyGuard::new(self, key.to_owned())
    }

    /// Non-blocking [`lock`](Self::lock)
    pub fn try_lock(&self, key: &str) -> Option<KeyGuard<'_>> {
        self.try_acquire(key)
            .then(|| KeyGuard::new(self, key.to_owned()))
    }

    /// Acquire `key` on a shared manager and return a `'static` guard
    pub fn lock_owned(self: &Arc<Self>, key: impl Into<String>) -> OwnedKeyGuard {
        let key = key.into();
        self.acquire(&key);
        OwnedKeyGuard::new(Arc::clone(self), key)
    }

    /// Async-compatible acquire using tokio::spawn_blocking
    ///
    /// The wait runs on the blocking pool, never on a runtime worker. If the
    /// returned future is dropped before completion, the guard produced by
    /// the blocking task is dropped with the task output and the key is
    /// released again.
    #[cfg(feature = "tokio")]
    pub async fn acquire_async(
        self: &Arc<Self>,
        key: impl Into<String>,
    ) -> KeyedLockResult<OwnedKeyGuard> {
        let lock = Arc::clone(self);
        let key = key.into();

        tokio::task::spawn_blocking(move || lock.lock_owned(key))
            .await
            .map_err(|_| crate::core::errors::KeyedLockError::Cancelled)
    }

    /// Snapshot of whether `key` is currently held (`false` if unbound)
    pub fn is_locked(&self, key: &str) -> bool {
        self.slots.load(key).is_some_and(|slot| slot.is_held())
    }

    /// Get manager statistics
    pub fn stats(&self) -> KeyedLockStats {
        self.counters.snapshot(self.slots.len(), self.pool.len())
    }

    /// Name of the active slot map backend
    pub fn backend_name(&self) -> &'static str {
        self.slots.name()
    }
}

impl Default for KeyedLock {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for KeyedLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyedLock")
            .field("backend", &self.slots.name())
            .field("stats", &self.stats())
            .finish()
    }
}
