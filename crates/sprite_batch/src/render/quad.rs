//! GPU-facing quad layout
//!
//! One [`Quad`] is the per-sprite record stored in the atlas. The layout is
//! position (3 x f32), color (4 x u8), texture coordinates (2 x f32) per vertex,
//! four vertices per quad, with no padding so the atlas can be uploaded as raw
//! bytes.

use bytemuck::{Pod, Zeroable};

/// A single textured, colored vertex
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct QuadVertex {
    /// Vertex position (x, y, z)
    pub position: [f32; 3],
    /// RGBA color, 0-255 per channel
    pub color: [u8; 4],
    /// Texture coordinates (u, v), normalized
    pub tex_coords: [f32; 2],
}

impl QuadVertex {
    /// Create a vertex
    pub fn new(position: [f32; 3], color: [u8; 4], tex_coords: [f32; 2]) -> Self {
        Self {
            position,
            color,
            tex_coords,
        }
    }
}

/// Four vertices describing one sprite
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Quad {
    /// Top-left vertex
    pub top_left: QuadVertex,
    /// Bottom-left vertex
    pub bottom_left: QuadVertex,
    /// Top-right vertex
    pub top_right: QuadVertex,
    /// Bottom-right vertex
    pub bottom_right: QuadVertex,
}

impl Quad {
    /// Size of one quad in bytes
    pub const BYTES: usize = std::mem::size_of::<Self>();

    /// Vertices in top-left, bottom-left, top-right, bottom-right order
    pub fn vertices(&self) -> [QuadVertex; 4] {
        [self.top_left, self.bottom_left, self.top_right, self.bottom_right]
    }

    /// Whether every vertex collapses onto one point, as hidden sprites do
    pub fn is_degenerate(&self) -> bool {
        let first = self.top_left.position;
        self.vertices().iter().all(|vertex| vertex.position == first)
    }
}

/// View a slice of quads as raw bytes for upload
pub fn quad_bytes(quads: &[Quad]) -> &[u8] {
    bytemuck::cast_slice(quads)
}
