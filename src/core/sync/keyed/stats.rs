/*!
 * Keyed Lock Statistics
 * Relaxed atomic counters; snapshots are approximate under concurrency
 */

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub(crate) allocated: AtomicU64,
    pub(crate) recycled: AtomicU64,
    pub(crate) rejected: AtomicU64,
    pub(crate) contended: AtomicU64,
}

impl Counters {
    #[inline]
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, keys: usize, pooled_slots: usize) -> KeyedLockStats {
        KeyedLockStats {
            keys,
            pooled_slots,
            slots_allocated: self.allocated.load(Ordering::Relaxed),
            slots_recycled: self.recycled.load(Ordering::Relaxed),
            slots_rejected: self.rejected.load(Ordering::Relaxed),
            contended_acquires: self.contended.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of a keyed lock manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyedLockStats {
    /// Keys with a bound slot
    pub keys: usize,
    /// Slots parked in the pool
    pub pooled_slots: usize,
    /// Slots allocated because the pool was empty
    pub slots_allocated: u64,
    /// Candidates taken from the pool instead of allocating
    pub slots_recycled: u64,
    /// Candidates that lost the install race and went back to the pool
    pub slots_rejected: u64,
    /// Acquires that had to wait at least once
    pub contended_acquires: u64,
}
