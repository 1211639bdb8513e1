/*!
 * Lock-Free Synchronization Primitives
 *
 * - Treiber stack with epoch-based reclamation (slot pool)
 */

mod stack;

// Re-export public API
pub use stack::LockFreeStack;
