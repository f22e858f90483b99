//! Batch error types

use crate::atlas::AtlasError;
use crate::config::ConfigError;
use crate::foundation::collections::SpriteId;
use crate::render::{RenderError, TextureId};
use crate::scene::TreeError;

/// Result type for batch operations
pub type BatchResult<T> = Result<T, BatchError>;

/// Errors that can occur while maintaining a batch
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// A sprite samples a different texture than the batch
    #[error("Sprite {sprite:?} uses texture {found:?} but the batch draws {expected:?}")]
    InvalidTexture {
        /// Offending sprite
        sprite: SpriteId,
        /// Texture of the batch
        expected: TextureId,
        /// Texture of the sprite
        found: TextureId,
    },

    /// The sprite is neither a member nor the batch root
    #[error("Sprite {0:?} is not a member of this batch")]
    NotMember(SpriteId),

    /// The handle does not refer to a live node
    #[error("Unknown sprite: {0:?}")]
    UnknownSprite(SpriteId),

    /// The node has no content to put in the atlas
    #[error("Node {0:?} has no renderable content")]
    NotRenderable(SpriteId),

    /// The sprite already has a parent
    #[error("Sprite {0:?} is already attached to a parent")]
    AlreadyAttached(SpriteId),

    /// Batch bookkeeping disagrees with the tree
    #[error("Batch state inconsistent: {0}")]
    Inconsistent(String),

    /// Tree mutation failed
    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    /// Atlas storage failed
    #[error("Atlas error: {0}")]
    Atlas(#[from] AtlasError),

    /// The backend rejected the draw call
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Invalid batch configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
