//! # Draw Submission
//!
//! The boundary between a batch and the graphics backend. A batch hands the
//! backend exactly one [`DrawCall`] per draw: every live quad of its atlas,
//! one texture, one blend function.
//!
//! ## Architecture
//!
//! - **DrawCall**: Borrowed view of the quads to draw and the state to draw them with
//! - **QuadRenderer**: Implemented by the backend that turns a call into GPU work
//! - **RecordingRenderer**: Keeps a copy of every call, for tools and tests

use std::ops::Range;

use super::blend::BlendFunc;
use super::quad::{quad_bytes, Quad};
use super::texture::TextureId;

/// Result type for draw submission
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors reported by a backend while submitting a draw call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// General rendering errors from the GPU or graphics API
    #[error("Rendering error: {0}")]
    Backend(String),

    /// The backend does not know the texture
    #[error("Unknown texture: {0:?}")]
    UnknownTexture(TextureId),
}

/// A single batched draw over the live range of an atlas
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    /// Texture every quad samples from
    pub texture: TextureId,
    /// Blend function for the whole call
    pub blend: BlendFunc,
    /// Live quads, in draw order
    pub quads: &'a [Quad],
}

impl DrawCall<'_> {
    /// Atlas range covered by this call
    pub fn range(&self) -> Range<usize> {
        0..self.quads.len()
    }

    /// Raw bytes of the quads, ready for upload
    pub fn bytes(&self) -> &[u8] {
        quad_bytes(self.quads)
    }
}

/// Backend that turns draw calls into GPU work
pub trait QuadRenderer {
    /// Submit one draw call
    fn submit(&mut self, call: DrawCall<'_>) -> RenderResult<()>;
}

/// Owned copy of a submitted draw call
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Texture of the call
    pub texture: TextureId,
    /// Blend function of the call
    pub blend: BlendFunc,
    /// Copy of the submitted quads
    pub quads: Vec<Quad>,
}

/// Renderer that records every call instead of drawing
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    calls: Vec<RecordedCall>,
}

impl RecordingRenderer {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded so far
    pub fn calls(&self) -> &[RecordedCall] {
        &self.calls
    }

    /// Most recent call
    pub fn last_call(&self) -> Option<&RecordedCall> {
        self.calls.last()
    }

    /// Forget all recorded calls
    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl QuadRenderer for RecordingRenderer {
    fn submit(&mut self, call: DrawCall<'_>) -> RenderResult<()> {
        self.calls.push(RecordedCall {
            texture: call.texture,
            blend: call.blend,
            quads: call.quads.to_vec(),
        });
        Ok(())
    }
}
