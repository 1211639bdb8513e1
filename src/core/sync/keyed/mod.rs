/*!
 * Keyed Locks
 *
 * Mutual exclusion per string key without pre-registering keys:
 * - `KeyedLock`: the manager (acquire/release, guards, stats)
 * - `Slot`: per-key blocking primitive (flag + condvar + mutex)
 * - `SlotMap`: concurrent key → slot map with atomic load-or-store
 *
 * # Architecture
 *
 * Slots come from a lock-free pool or are allocated on demand, and are
 * installed into the slot map with load-or-store. The slot that wins the
 * install race stays bound to its key for the lifetime of the manager.
 */

mod guard;
mod manager;
mod slot;
mod slot_map;
mod stats;

// Re-export public API
pub use guard::{KeyGuard, OwnedKeyGuard};
pub use manager::KeyedLock;
pub use slot::Slot;
pub use slot_map::{ShardedSlotMap, SlotMap};
pub use stats::KeyedLockStats;
