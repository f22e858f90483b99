//! Rendering types shared between the batch and a graphics backend
//!
//! The batch never talks to a GPU API directly. It fills quads laid out for
//! upload and hands them to a [`QuadRenderer`] in one call.

pub mod blend;
pub mod quad;
pub mod submit;
pub mod texture;

pub use blend::{BlendFactor, BlendFunc};
pub use quad::{quad_bytes, Quad, QuadVertex};
pub use submit::{DrawCall, QuadRenderer, RecordedCall, RecordingRenderer, RenderError, RenderResult};
pub use texture::{Texture, TextureId};
