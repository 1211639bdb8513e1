/*!
 * Key Guards
 * RAII ownership of a key; the key is released when the guard drops
 */

use super::manager::KeyedLock;
use std::sync::Arc;

/// Exclusive ownership of a key borrowed from a [`KeyedLock`]
#[must_use = "the key is released as soon as the guard is dropped"]
pub struct KeyGuard<'a> {
    lock: &'a KeyedLock,
    key: String,
}

impl<'a> KeyGuard<'a> {
    pub(crate) fn new(lock: &'a KeyedLock, key: String) -> Self {
        Self { lock, key }
    }

    /// The key this guard holds
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        self.lock.release(&self.key);
    }
}

impl std::fmt::Debug for KeyGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyGuard").field("key", &self.key).finish()
    }
}

/// Exclusive ownership of a key in a shared [`KeyedLock`]
///
/// Unlike [`KeyGuard`] this is `'static` and can cross thread and task
/// boundaries.
#[must_use = "the key is released as soon as the guard is dropped"]
pub struct OwnedKeyGuard {
    lock: Arc<KeyedLock>,
    key: String,
}

impl OwnedKeyGuard {
    pub(crate) fn new(lock: Arc<KeyedLock>, key: String) -> Self {
        Self { lock, key }
    }

    /// The key this guard holds
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for OwnedKeyGuard {
    fn drop(&mut self) {
        self.lock.release(&self.key);
    }
}

impl std::fmt::Debug for OwnedKeyGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnedKeyGuard").field("key", &self.key).finish()
    }
}
