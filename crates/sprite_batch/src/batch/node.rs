//! # Batch Node
//!
//! A [`BatchNode`] owns one quad atlas and one texture, and mirrors the subtree
//! under its root in the atlas. Membership changes live in
//! [`membership`](super::membership); this file holds construction, capacity,
//! texture state, drawing and consistency checks.

use crate::atlas::{grown_capacity, AtlasStorage, QuadAtlas};
use crate::core::config::BatchConfig;
use crate::foundation::collections::SpriteId;
use crate::foundation::math::Rect;
use crate::render::{BlendFunc, DrawCall, QuadRenderer, Texture};
use crate::scene::{Sprite, SpriteTree};

use super::error::{BatchError, BatchResult};
use super::order::collect_draw_order;
use super::resolver::IndexResolver;

/// Flat, draw-ordered quad atlas for every sprite under one root
///
/// All members share the batch texture and are drawn with a single call.
/// The root is a content-less node in the [`SpriteTree`]; attach sprites to it
/// (or to other members) through the batch, never through the tree directly.
#[derive(Debug)]
pub struct BatchNode<S: AtlasStorage = QuadAtlas> {
    pub(crate) root: SpriteId,
    pub(crate) texture: Texture,
    pub(crate) blend: BlendFunc,
    pub(crate) atlas: S,
    pub(crate) descendants: Vec<SpriteId>,
    pub(crate) config: BatchConfig,
}

impl BatchNode<QuadAtlas> {
    /// Create a batch with the default configuration
    pub fn new(tree: &mut SpriteTree, texture: Texture) -> BatchResult<Self> {
        Self::with_config(tree, texture, BatchConfig::default())
    }

    /// Create a batch reserving `capacity` quads up front
    pub fn with_capacity(tree: &mut SpriteTree, texture: Texture, capacity: usize) -> BatchResult<Self> {
        Self::with_config(tree, texture, BatchConfig::default().with_capacity(capacity))
    }

    /// Create a batch from an explicit configuration
    pub fn with_config(tree: &mut SpriteTree, texture: Texture, config: BatchConfig) -> BatchResult<Self> {
        Self::with_storage(tree, texture, QuadAtlas::default(), config)
    }
}

impl<S: AtlasStorage> BatchNode<S> {
    /// Create a batch over caller-provided, empty atlas storage
    pub fn with_storage(tree: &mut SpriteTree, texture: Texture, mut storage: S, config: BatchConfig) -> BatchResult<Self> {
        config.validate()?;
        if !storage.is_empty() {
            return Err(BatchError::Inconsistent(format!(
                "atlas storage must start empty, found {} quads",
                storage.count()
            )));
        }
        if storage.capacity() < config.initial_capacity {
            storage.resize(config.initial_capacity)?;
        }

        let root = tree.create_container();
        tree.set_batch_root(root, true);
        log::info!(
            "Created sprite batch {:?} for texture {:?} with capacity {}",
            root,
            texture.id,
            storage.capacity()
        );

        Ok(Self {
            root,
            blend: texture.default_blend_func(),
            texture,
            atlas: storage,
            descendants: Vec::new(),
            config,
        })
    }

    // -- Accessors --

    /// Root node that top-level sprites are attached to
    pub fn root(&self) -> SpriteId {
        self.root
    }

    /// Texture shared by every member
    pub fn texture(&self) -> Texture {
        self.texture
    }

    /// Blend function used for the draw call
    pub fn blend_func(&self) -> BlendFunc {
        self.blend
    }

    /// Override the blend function
    pub fn set_blend_func(&mut self, blend: BlendFunc) {
        self.blend = blend;
    }

    /// Members in atlas order
    pub fn descendants(&self) -> &[SpriteId] {
        &self.descendants
    }

    /// Number of quads in use
    pub fn count(&self) -> usize {
        self.descendants.len()
    }

    /// Number of quads the atlas can hold without growing
    pub fn capacity(&self) -> usize {
        self.atlas.capacity()
    }

    /// Backing atlas storage
    pub fn atlas(&self) -> &S {
        &self.atlas
    }

    /// Configuration the batch was created with
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Whether `id` is a member of this batch
    pub fn is_member(&self, tree: &SpriteTree, id: SpriteId) -> bool {
        tree.batch(id) == Some(self.root)
    }

    // -- Texture --

    /// Switch to another texture every member already samples from
    ///
    /// The blend function is reset from the texture's alpha mode.
    pub fn set_texture(&mut self, tree: &SpriteTree, texture: Texture) -> BatchResult<()> {
        for &id in &self.descendants {
            match tree.texture_id(id) {
                Some(found) if found == texture.id => {}
                Some(found) => {
                    return Err(BatchError::InvalidTexture {
                        sprite: id,
                        expected: texture.id,
                        found,
                    })
                }
                None => return Err(BatchError::NotRenderable(id)),
            }
        }

        log::debug!("Batch {:?} texture {:?} -> {:?}", self.root, self.texture.id, texture.id);
        self.texture = texture;
        self.blend = texture.default_blend_func();
        Ok(())
    }

    /// A sprite bound to the batch texture showing `rect`
    pub fn create_sprite(&self, rect: Rect) -> Sprite {
        Sprite::new(self.texture, rect)
    }

    // -- Capacity --

    /// Grow the atlas so it can hold at least `required` quads
    pub fn ensure_capacity(&mut self, required: usize) -> BatchResult<()> {
        let capacity = self.atlas.capacity();
        if required <= capacity {
            return Ok(());
        }

        let grown = grown_capacity(capacity, required, self.config.growth);
        self.atlas.resize(grown)?;
        log::info!("Resizing sprite batch {:?} atlas from {} to {} quads", self.root, capacity, grown);
        Ok(())
    }

    /// Grow the atlas by one step of the growth policy
    pub fn increase_atlas_capacity(&mut self) -> BatchResult<()> {
        let capacity = self.atlas.capacity();
        let grown = grown_capacity(capacity, capacity + 1, self.config.growth);
        self.atlas.resize(grown)?;
        log::info!("Increased sprite batch {:?} atlas from {} to {} quads", self.root, capacity, grown);
        Ok(())
    }

    /// Remove every member and shrink the atlas back to its initial capacity
    pub fn reset(&mut self, tree: &mut SpriteTree, cleanup: bool) -> BatchResult<()> {
        self.remove_all_children(tree, cleanup)?;
        self.atlas.resize(self.config.initial_capacity)?;
        log::debug!("Reset sprite batch {:?}", self.root);
        Ok(())
    }

    // -- Drawing --

    /// Rewrite the quads of members whose content changed; returns how many were written
    ///
    /// Fails with [`BatchError::InvalidTexture`] before writing anything if a
    /// changed member now samples another texture; that member stays dirty.
    pub fn update_quads(&mut self, tree: &mut SpriteTree) -> BatchResult<usize> {
        for &id in &self.descendants {
            if !tree.is_dirty(id) {
                continue;
            }
            match tree.texture_id(id) {
                Some(found) if found != self.texture.id => {
                    return Err(BatchError::InvalidTexture {
                        sprite: id,
                        expected: self.texture.id,
                        found,
                    })
                }
                _ => {}
            }
        }

        let mut written = 0;
        for (index, &id) in self.descendants.iter().enumerate() {
            if !tree.take_dirty(id) {
                continue;
            }
            if let Some(quad) = tree.quad(id) {
                self.atlas.set(index, quad)?;
                written += 1;
            }
        }
        if written > 0 {
            log::trace!("Refreshed {} quads in batch {:?}", written, self.root);
        }
        Ok(written)
    }

    /// Refresh dirty quads and submit the whole atlas in one call; returns the quads drawn
    pub fn draw<R: QuadRenderer + ?Sized>(&mut self, tree: &mut SpriteTree, renderer: &mut R) -> BatchResult<usize> {
        self.update_quads(tree)?;
        let count = self.descendants.len();
        if count == 0 {
            return Ok(0);
        }

        renderer.submit(DrawCall {
            texture: self.texture.id,
            blend: self.blend,
            quads: self.atlas.quads(),
        })?;
        log::trace!("Submitted {} quads for batch {:?}", count, self.root);
        Ok(count)
    }

    // -- Consistency --

    /// Check that the atlas mirrors the tree
    pub fn verify(&self, tree: &SpriteTree) -> BatchResult<()> {
        let mut expected = Vec::with_capacity(self.descendants.len());
        collect_draw_order(tree, self.root, self.config.child_order, &|id| id != self.root, &mut expected);
        if expected != self.descendants {
            return Err(BatchError::Inconsistent(format!(
                "descendants {:?} differ from draw order {:?}",
                self.descendants, expected
            )));
        }

        if self.atlas.count() != self.descendants.len() {
            return Err(BatchError::Inconsistent(format!(
                "atlas holds {} quads for {} members",
                self.atlas.count(),
                self.descendants.len()
            )));
        }
        if self.atlas.capacity() < self.descendants.len() {
            return Err(BatchError::Inconsistent(format!(
                "capacity {} below count {}",
                self.atlas.capacity(),
                self.descendants.len()
            )));
        }

        for (index, &id) in self.descendants.iter().enumerate() {
            if !self.is_member(tree, id) {
                return Err(BatchError::Inconsistent(format!("{id:?} at {index} is not a member")));
            }
            if tree.atlas_index(id) != Some(index) {
                return Err(BatchError::Inconsistent(format!(
                    "{id:?} at {index} has atlas index {:?}",
                    tree.atlas_index(id)
                )));
            }
            if tree.texture_id(id) != Some(self.texture.id) {
                return Err(BatchError::Inconsistent(format!(
                    "{id:?} uses texture {:?}, batch draws {:?}",
                    tree.texture_id(id),
                    self.texture.id
                )));
            }
            if !tree.is_dirty(id) && self.atlas.get(index).copied() != tree.quad(id) {
                return Err(BatchError::Inconsistent(format!("stale quad for {id:?} at {index}")));
            }
        }
        Ok(())
    }

    /// Drop the atlas and hand back the root; members stay in the tree unbatched
    pub fn release(self, tree: &mut SpriteTree) -> SpriteId {
        for &id in &self.descendants {
            tree.set_membership(id, None, None);
        }
        tree.set_batch_root(self.root, false);
        log::info!("Released sprite batch {:?} with {} members", self.root, self.descendants.len());
        self.root
    }

    // -- Internals --

    pub(crate) fn resolver<'a>(&self, tree: &'a SpriteTree) -> IndexResolver<'a> {
        IndexResolver::new(tree, self.root, self.config.child_order)
    }

    /// Refresh the stored atlas index of every member from `start` on
    pub(crate) fn renumber_from(&self, tree: &mut SpriteTree, start: usize) {
        for (index, &id) in self.descendants.iter().enumerate().skip(start) {
            tree.set_atlas_index(id, index);
        }
    }

    /// Whether `parent` may receive batched children
    pub(crate) fn accepts_children(&self, tree: &SpriteTree, parent: SpriteId) -> bool {
        parent == self.root || self.is_member(tree, parent)
    }
}
