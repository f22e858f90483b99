//! Batch-wide blend configuration

use serde::{Deserialize, Serialize};

/// Blend factor applied to the source or destination color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlendFactor {
    /// 0
    Zero,
    /// 1
    One,
    /// Source alpha
    SrcAlpha,
    /// 1 - source alpha
    OneMinusSrcAlpha,
    /// Destination alpha
    DstAlpha,
    /// 1 - destination alpha
    OneMinusDstAlpha,
    /// Source color
    SrcColor,
    /// Destination color
    DstColor,
}

/// Source and destination blend factors shared by every sprite in a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlendFunc {
    /// Factor applied to the incoming fragment
    pub src: BlendFactor,
    /// Factor applied to the framebuffer
    pub dst: BlendFactor,
}

impl BlendFunc {
    /// Blending for premultiplied-alpha textures
    pub const PREMULTIPLIED: Self = Self::new(BlendFactor::One, BlendFactor::OneMinusSrcAlpha);

    /// Blending for straight-alpha textures
    pub const ALPHA: Self = Self::new(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha);

    /// Additive blending
    pub const ADDITIVE: Self = Self::new(BlendFactor::SrcAlpha, BlendFactor::One);

    /// Create a blend function
    pub const fn new(src: BlendFactor, dst: BlendFactor) -> Self {
        Self { src, dst }
    }
}

impl Default for BlendFunc {
    fn default() -> Self {
        Self::PREMULTIPLIED
    }
}
