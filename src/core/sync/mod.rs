/*!
 * Synchronization Primitives
 *
 * - Keyed locks: per-key mutual exclusion with lazily bound slots
 * - Lock-free stack: Treiber stack backing the slot pool
 * - Striped locks: alternative slot map backend
 *
 * # Use Cases
 *
 * - **Per-user state**: Serialize updates to one account
 * - **Per-file writes**: One writer per path, different paths in parallel
 * - **Shard maintenance**: Exclusive compaction of one shard at a time
 */

mod config;
pub mod keyed;
pub mod lockfree;
pub mod locks;

pub use config::{KeyedLockConfig, MapBackend, DEFAULT_STRIPES, PREWARM_SLOTS_MAX};
pub use keyed::{
    KeyGuard, KeyedLock, KeyedLockStats, OwnedKeyGuard, ShardedSlotMap, Slot, SlotMap,
};
pub use lockfree::LockFreeStack;
pub use locks::StripedSlotMap;
