/*!
 * Lock-Based Synchronization Primitives
 *
 * Striped slot map backend (reduces contention via partitioning)
 */

mod striped;

// Re-export public API
pub use striped::StripedSlotMap;
