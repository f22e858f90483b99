//! Texture references
//!
//! Textures are loaded and owned elsewhere; the batch only needs an identity to
//! compare against and the size to normalize texture coordinates.

use serde::{Deserialize, Serialize};

use super::blend::BlendFunc;

/// Identity of a texture owned by the caller's texture manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureId(pub u32);

/// Description of a texture a batch draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Texture {
    /// Identity of the texture
    pub id: TextureId,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Whether color channels are premultiplied by alpha
    pub premultiplied_alpha: bool,
}

impl Texture {
    /// Create a texture description with premultiplied alpha
    pub fn new(id: TextureId, width: u32, height: u32) -> Self {
        Self {
            id,
            width,
            height,
            premultiplied_alpha: true,
        }
    }

    /// Set the alpha mode
    pub fn with_premultiplied_alpha(mut self, premultiplied: bool) -> Self {
        self.premultiplied_alpha = premultiplied;
        self
    }

    /// Blend function that draws this texture correctly
    pub fn default_blend_func(&self) -> BlendFunc {
        if self.premultiplied_alpha {
            BlendFunc::PREMULTIPLIED
        } else {
            BlendFunc::ALPHA
        }
    }

    /// Map a pixel coordinate to normalized texture space
    #[allow(clippy::cast_precision_loss)]
    pub fn normalize(&self, x: f32, y: f32) -> [f32; 2] {
        let width = self.width.max(1) as f32;
        let height = self.height.max(1) as f32;
        [x / width, y / height]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_follows_alpha_mode() {
        let texture = Texture::new(TextureId(7), 64, 64);
        assert_eq!(texture.default_blend_func(), BlendFunc::PREMULTIPLIED);

        let straight = texture.with_premultiplied_alpha(false);
        assert_eq!(straight.default_blend_func(), BlendFunc::ALPHA);
    }

    #[test]
    fn test_normalize() {
        let texture = Texture::new(TextureId(1), 128, 64);
        assert_eq!(texture.normalize(64.0, 32.0), [0.5, 0.5]);
    }
}
