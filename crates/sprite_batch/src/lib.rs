//! # Sprite Batch
//!
//! Keeps a flat, GPU-facing quad atlas in the exact draw order of a sprite tree
//! so that a whole subtree of sprites sharing one texture renders with a single
//! draw call.
//!
//! ## Features
//!
//! - **Incremental indexing**: inserts, removals, reorders and re-parents move only
//!   the affected block of quads
//! - **Dense atlas**: atlas indices are always `0..count` in z-ordered draw order
//! - **Automatic growth**: the backing atlas grows by a third when it runs out of room
//! - **Pluggable storage**: any [`atlas::AtlasStorage`] can back a batch
//!
//! ## Quick Start
//!
//! ```rust
//! use sprite_batch::prelude::*;
//!
//! let mut tree = SpriteTree::new();
//! let texture = Texture::new(TextureId(1), 256, 256);
//! let mut batch = BatchNode::new(&mut tree, texture)?;
//!
//! let ship = tree.create(batch.create_sprite(Rect::new(0.0, 0.0, 32.0, 32.0)));
//! let flame = tree.create(batch.create_sprite(Rect::new(32.0, 0.0, 16.0, 16.0)));
//! batch.add_child(&mut tree, ship, 0)?;
//! batch.add_child_to(&mut tree, ship, flame, -1)?;
//!
//! let mut renderer = RecordingRenderer::new();
//! assert_eq!(batch.draw(&mut tree, &mut renderer)?, 2);
//! assert_eq!(renderer.calls().len(), 1);
//! # Ok::<(), BatchError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core configuration
pub mod core;

pub mod foundation;
pub mod config;
pub mod render;
pub mod atlas;
pub mod scene;
pub mod batch;

/// Common imports for batch users
pub mod prelude {
    pub use crate::{
        atlas::{AtlasError, AtlasStorage, QuadAtlas},
        batch::{BatchError, BatchNode, BatchResult},
        core::config::{BatchConfig, ChildOrder, GrowthPolicy},
        foundation::{
            collections::SpriteId,
            math::{Rect, Vec2},
        },
        render::{
            BlendFactor, BlendFunc, DrawCall, Quad, QuadRenderer, QuadVertex, RecordingRenderer,
            Texture, TextureId,
        },
        scene::{AtlasRenderable, FrameAnimation, Sprite, SpriteTree, TreeError},
    };
}
