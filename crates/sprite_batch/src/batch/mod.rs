//! # Sprite Batch Core
//!
//! Keeps a [`BatchNode`]'s quad atlas in step with the sprite tree under its
//! root.
//!
//! ## Architecture
//!
//! - **order**: The draw sequence of one node under a [`ChildOrder`](crate::core::config::ChildOrder)
//! - **resolver**: Where a new block starts, and where an existing block begins and ends
//! - **reindex**: Fills a block with consecutive indices in draw order
//! - **membership**: Insert, remove, reorder and reparent on whole blocks
//! - **node**: Construction, capacity, texture state, drawing and [`BatchNode::verify`]
//!
//! ## Invariants
//!
//! After every public call:
//!
//! 1. `descendants` is the draw-order traversal of the root
//! 2. `descendants[i]` has atlas index `i`, for every `i` in `0..count`
//! 3. every clean member's quad in the atlas equals its content's quad
//! 4. the atlas capacity is at least `count`
//! 5. every member samples the batch texture

mod error;
mod membership;
mod node;
mod order;
mod reindex;
mod resolver;

#[cfg(test)]
mod tests;

pub use error::{BatchError, BatchResult};
pub use node::BatchNode;
pub use resolver::IndexResolver;
