//! Shared fixtures for batch scenarios

use std::any::Any;

use crate::atlas::{AtlasError, AtlasResult, AtlasStorage, QuadAtlas};
use crate::batch::BatchNode;
use crate::foundation::collections::SpriteId;
use crate::foundation::math::{Rect, Vec2};
use crate::render::{Quad, QuadVertex, Texture, TextureId};
use crate::scene::{AtlasRenderable, Sprite, SpriteTree};

pub(super) const TEXTURE: Texture = Texture {
    id: TextureId(7),
    width: 256,
    height: 256,
    premultiplied_alpha: true,
};

pub(super) const OTHER_TEXTURE: Texture = Texture {
    id: TextureId(8),
    width: 64,
    height: 64,
    premultiplied_alpha: true,
};

/// Tree plus a default batch on [`TEXTURE`]
pub(super) fn setup() -> (SpriteTree, BatchNode) {
    let mut tree = SpriteTree::new();
    let batch = BatchNode::new(&mut tree, TEXTURE).unwrap();
    (tree, batch)
}

/// Sprite on [`TEXTURE`] whose quad is recognisable by its x position
pub(super) fn sprite_at(tree: &mut SpriteTree, x: f32) -> SpriteId {
    tree.create(Sprite::new(TEXTURE, Rect::new(0.0, 0.0, 8.0, 8.0)).with_position(Vec2::new(x, 0.0)))
}

/// Position marker of the quad stored for `id`
pub(super) fn stored_x(batch: &BatchNode, tree: &SpriteTree, id: SpriteId) -> Option<f32> {
    let index = tree.atlas_index(id)?;
    let quad = batch.atlas().quads().get(index)?;
    Some((quad.top_left.position[0] + quad.top_right.position[0]) / 2.0)
}

/// Atlas whose allocator refuses to grow past `limit` quads
#[derive(Debug, Default)]
pub(super) struct FixedAtlas {
    inner: QuadAtlas,
    limit: usize,
}

impl FixedAtlas {
    pub(super) fn new(limit: usize) -> Self {
        Self {
            inner: QuadAtlas::default(),
            limit,
        }
    }
}

impl AtlasStorage for FixedAtlas {
    fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    fn count(&self) -> usize {
        self.inner.count()
    }

    fn get(&self, index: usize) -> Option<&Quad> {
        self.inner.get(index)
    }

    fn set(&mut self, index: usize, quad: Quad) -> AtlasResult<()> {
        self.inner.set(index, quad)
    }

    fn resize(&mut self, capacity: usize) -> AtlasResult<()> {
        if capacity > self.limit {
            return Err(AtlasError::AllocationFailed { capacity });
        }
        self.inner.resize(capacity)
    }

    fn insert_quads(&mut self, index: usize, quads: &[Quad]) -> AtlasResult<()> {
        self.inner.insert_quads(index, quads)
    }

    fn remove_quads(&mut self, index: usize, amount: usize) -> AtlasResult<()> {
        self.inner.remove_quads(index, amount)
    }

    fn remove_all(&mut self) {
        self.inner.remove_all()
    }

    fn quads(&self) -> &[Quad] {
        self.inner.quads()
    }
}

/// Solid-color tile, a second kind of batchable content
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Tile {
    pub(super) texture: TextureId,
    pub(super) origin: [f32; 2],
    pub(super) size: f32,
    pub(super) cleaned: bool,
}

impl Tile {
    pub(super) fn new(texture: TextureId, origin: [f32; 2], size: f32) -> Self {
        Self {
            texture,
            origin,
            size,
            cleaned: false,
        }
    }
}

impl AtlasRenderable for Tile {
    fn texture_id(&self) -> TextureId {
        self.texture
    }

    fn quad(&self) -> Quad {
        let [x, y] = self.origin;
        let vertex = |dx: f32, dy: f32| QuadVertex::new([x + dx, y + dy, 0.0], [255; 4], [0.0, 0.0]);
        Quad {
            top_left: vertex(0.0, self.size),
            bottom_left: vertex(0.0, 0.0),
            top_right: vertex(self.size, self.size),
            bottom_right: vertex(self.size, 0.0),
        }
    }

    fn cleanup(&mut self) {
        self.cleaned = true;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
