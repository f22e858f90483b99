//! Atlas storage contract
//!
//! An atlas is a flat buffer of fixed-size quad records addressed by index.
//! It has a live range `[0, count)` and a capacity; growing the capacity moves
//! memory but never changes which quad lives at which index.

use crate::render::Quad;

/// Result type for atlas operations
pub type AtlasResult<T> = Result<T, AtlasError>;

/// Errors raised by atlas storage
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AtlasError {
    /// Index outside the live range
    #[error("Atlas index {index} out of bounds (count {count})")]
    IndexOutOfBounds {
        /// Requested index
        index: usize,
        /// Live quad count
        count: usize,
    },

    /// Writing would exceed the capacity
    #[error("Atlas capacity exceeded: {required} > {capacity}")]
    CapacityExceeded {
        /// Quads that would be live after the write
        required: usize,
        /// Current capacity
        capacity: usize,
    },

    /// Resizing below the live count would drop quads
    #[error("Cannot resize atlas to {requested}: {count} quads are live")]
    ShrinkBelowCount {
        /// Requested capacity
        requested: usize,
        /// Live quad count
        count: usize,
    },

    /// The allocator refused the backing memory
    #[error("Failed to allocate atlas storage for {capacity} quads")]
    AllocationFailed {
        /// Capacity that could not be allocated
        capacity: usize,
    },
}

/// Flat, index-addressed quad storage backing a batch
pub trait AtlasStorage {
    /// Quads that fit without reallocation
    fn capacity(&self) -> usize;

    /// Live quads
    fn count(&self) -> usize;

    /// Quad at `index`, if live
    fn get(&self, index: usize) -> Option<&Quad>;

    /// Overwrite the live quad at `index`
    fn set(&mut self, index: usize, quad: Quad) -> AtlasResult<()>;

    /// Reallocate to hold `capacity` quads, keeping every live quad at its index
    fn resize(&mut self, capacity: usize) -> AtlasResult<()>;

    /// Insert `quads` at `index`, shifting the tail forward
    fn insert_quads(&mut self, index: usize, quads: &[Quad]) -> AtlasResult<()>;

    /// Remove `amount` quads starting at `index`, shifting the tail back
    fn remove_quads(&mut self, index: usize, amount: usize) -> AtlasResult<()>;

    /// Drop every live quad, keeping the capacity
    fn remove_all(&mut self);

    /// Live quads in index order
    fn quads(&self) -> &[Quad];

    /// Whether no quads are live
    fn is_empty(&self) -> bool {
        self.count() == 0
    }
}
