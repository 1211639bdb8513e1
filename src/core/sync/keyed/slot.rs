/*!
 * Slot
 * Reusable blocking primitive: held flag + condvar + the mutex guarding both
 */

use parking_lot::{Condvar, Mutex};

/// Blocking primitive bound to at most one key
///
/// The mutex protects only the `held` flag and the condvar's wait queue. It
/// is never kept locked while a caller is inside its critical section.
#[derive(Debug, Default)]
pub struct Slot {
    held: Mutex<bool>,
    condvar: Condvar,
}

impl Slot {
    /// Create an idle slot
    pub fn new() -> Self {
        Self {
            held: Mutex::new(false),
            condvar: Condvar::new(),
        }
    }

    /// Block until the slot is idle, then mark it held
    ///
    /// Returns `true` if the caller had to wait at least once.
    pub(crate) fn acquire(&self) -> bool {
        let mut held = self.held.lock();
        let mut waited = false;

        // Re-check after every wakeup: broadcast wakes all, only one wins
        while *held {
            waited = true;
            self.condvar.wait(&mut held);
        }

        *held = true;
        waited
    }

    /// Mark the slot held if it is idle, without waiting
    pub(crate) fn try_acquire(&self) -> bool {
        let mut held = self.held.lock();
        if *held {
            return false;
        }
        *held = true;
        true
    }

    /// Mark the slot idle and wake every waiter
    pub(crate) fn release(&self) {
        let mut held = self.held.lock();
        *held = false;
        drop(held);
        self.condvar.notify_all();
    }

    /// Snapshot of the held flag
    pub fn is_held(&self) -> bool {
        *self.held.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_new_slot_is_idle() {
        let slot = Slot::new();
        assert!(!slot.is_held());
        assert!(!slot.acquire());
        assert!(slot.is_held());
    }

    #[test]
    fn test_try_acquire() {
        let slot = Slot::new();
        assert!(slot.try_acquire());
        assert!(!slot.try_acquire());
        slot.release();
        assert!(slot.try_acquire());
    }

    #[test]
    fn test_waiter_unblocks_on_release() {
        let slot = Arc::new(Slot::new());
        slot.acquire();

        let slot_clone = slot.clone();
        let handle = thread::spawn(move || slot_clone.acquire());

        // Give thread time to block
        thread::sleep(Duration::from_millis(50));
        assert!(slot.is_held());
        slot.release();

        assert!(handle.join().unwrap(), "waiter should report contention");
        assert!(slot.is_held());
    }
}
