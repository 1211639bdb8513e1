/*!
 * Keyed Lock Library
 * Mutual exclusion per string key, backed by a lock-free slot pool
 */

pub mod core;
pub mod monitoring;

// Re-exports
pub use crate::core::errors::{KeyedLockError, KeyedLockResult};
pub use crate::core::sync::{
    KeyGuard, KeyedLock, KeyedLockConfig, KeyedLockStats, LockFreeStack, MapBackend,
    OwnedKeyGuard, ShardedSlotMap, Slot, SlotMap, StripedSlotMap,
};
pub use monitoring::init_tracing;
