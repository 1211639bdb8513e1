/*!
 * Lock-Free Stack
 * Treiber stack with epoch-based reclamation, used as an object pool
 */

use crossbeam_epoch::{self as epoch, Atomic, Owned};
use std::mem::ManuallyDrop;
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};

struct Node<T> {
    value: ManuallyDrop<T>,
    next: Atomic<Node<T>>,
}

/// Unbounded lock-free stack
///
/// # Performance
///
/// - **Push/Pull**: Lock-free, one CAS on the uncontended path
/// - **Memory reclamation**: Popped nodes are deferred via epochs
///
/// # Safety
///
/// Every dereference of the top node happens under an epoch guard, and a
/// popped node is only freed once no pinned thread can still observe it.
/// This rules out the ABA and use-after-free hazards of a naive Treiber stack.
pub struct LockFreeStack<T> {
    head: Atomic<Node<T>>,
    len: AtomicUsize,
}

impl<T> LockFreeStack<T> {
    /// Create an empty stack
    pub fn new() -> Self {
        Self {
            head: Atomic::null(),
            len: AtomicUsize::new(0),
        }
    }

    /// Push a value as the new top (never fails, never blocks)
    pub fn push(&self, value: T) {
        let mut node = Owned::new(Node {
            value: ManuallyDrop::new(value),
            next: Atomic::null(),
        });

        let guard = epoch::pin();

        loop {
            let head = self.head.load(Ordering::Relaxed, &guard);
            node.next.store(head, Ordering::Relaxed);

            match self
                .head
                .compare_exchange(head, node, Ordering::Release, Ordering::Relaxed, &guard)
            {
                Ok(_) => {
                    self.len.fetch_add(1, Ordering::Relaxed);
                    return;
                }
                // Lost the race, retry with the same allocation
                Err(e) => node = e.new,
            }
        }
    }

    /// Remove and return the top value, or `None` if the stack is empty
    pub fn pull(&self) -> Option<T> {
        let guard = epoch::pin();

        loop {
            let head = self.head.load(Ordering::Acquire, &guard);

            // Safety: head is protected by the guard for the whole iteration
            let node = unsafe { head.as_ref() }?;
            let next = node.next.load(Ordering::Relaxed, &guard);

            if self
                .head
                .compare_exchange(head, next, Ordering::AcqRel, Ordering::Relaxed, &guard)
                .is_ok()
            {
                self.len.fetch_sub(1, Ordering::Relaxed);

                // Safety: the CAS unlinked the node, so this thread is the only
                // one that moves the value out. The node itself is freed later
                // without dropping `value` (ManuallyDrop).
                unsafe {
                    let value = ManuallyDrop::into_inner(ptr::read(&node.value));
                    guard.defer_destroy(head);
                    return Some(value);
                }
            }
        }
    }

    /// Approximate number of values (exact when quiescent)
    #[inline]
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    /// Check whether the stack was empty at the moment of the call
    #[inline]
    pub fn is_empty(&self) -> bool {
        let guard = epoch::pin();
        self.head.load(Ordering::Acquire, &guard).is_null()
    }
}

impl<T> Default for LockFreeStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for LockFreeStack<T> {
    fn drop(&mut self) {
        // Safety: &mut self means no other thread can reach the chain
        unsafe {
            let guard = epoch::unprotected();
            let mut current = self.head.load(Ordering::Relaxed, guard);

            while !current.is_null() {
                let mut node = current.into_owned();
                current = node.next.load(Ordering::Relaxed, guard);
                ManuallyDrop::drop(&mut node.value);
            }
        }
    }
}

// Safety: values move between threads through push/pull only
unsafe impl<T: Send> Send for LockFreeStack<T> {}
unsafe impl<T: Send> Sync for LockFreeStack<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_pull_empty() {
        let stack = LockFreeStack::<u32>::new();
        assert!(stack.is_empty());
        assert_eq!(stack.pull(), None);
        assert_eq!(stack.len(), 0);
    }

    #[test]
    fn test_lifo_order() {
        let stack = LockFreeStack::new();

        for i in 1..=10 {
            stack.push(i);
        }
        assert_eq!(stack.len(), 10);

        for i in (1..=10).rev() {
            assert_eq!(stack.pull(), Some(i), "LIFO order violated");
        }
        assert!(stack.is_empty());
    }

    #[test]
    fn test_drop_releases_values() {
        let marker = Arc::new(());
        {
            let stack = LockFreeStack::new();
            for _ in 0..5 {
                stack.push(marker.clone());
            }
            drop(stack.pull());
            assert_eq!(Arc::strong_count(&marker), 5);
        }
        assert_eq!(Arc::strong_count(&marker), 1);
    }

    #[test]
    fn test_concurrent_push_pull() {
        let stack = Arc::new(LockFreeStack::new());
        let mut handles = vec![];

        for t in 0..4u64 {
            let stack = stack.clone();
            handles.push(thread::spawn(move || {
                let mut pulled = Vec::new();
                for i in 0..1000 {
                    stack.push(t * 10_000 + i);
                    if i % 2 == 0 {
                        if let Some(v) = stack.pull() {
                            pulled.push(v);
                        }
                    }
                }
                pulled
            }));
        }

        let mut seen = HashSet::new();
        for handle in handles {
            for v in handle.join().unwrap() {
                assert!(seen.insert(v), "duplicate value {}", v);
            }
        }
        while let Some(v) = stack.pull() {
            assert!(seen.insert(v), "duplicate value {}", v);
        }

        assert_eq!(seen.len(), 4000);
    }
}
