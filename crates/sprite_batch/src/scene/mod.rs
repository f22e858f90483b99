//! Sprite tree and batchable content
//!
//! The tree is the structure a batch mirrors: parents, children, z-orders.
//! Content is anything implementing [`AtlasRenderable`].

pub mod sprite;
pub mod tree;

pub use sprite::{AtlasRenderable, FrameAnimation, Sprite};
pub use tree::{SpriteTree, TreeError, TreeResult};
