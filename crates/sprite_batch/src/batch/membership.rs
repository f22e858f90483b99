//! # Membership
//!
//! Adding, removing and moving batched sprites.
//!
//! ## Architecture
//!
//! Every change works on whole blocks. A sprite's subtree always occupies one
//! contiguous run of the atlas, so:
//!
//! - **Insert**: attach in the tree, resolve where the block starts, open a gap
//!   of the subtree's size, let the reindexer fill it, renumber the tail
//! - **Remove**: find the block's bounds, close the gap, renumber the tail
//! - **Reorder**: the parent's block keeps its slots and is refilled in the new order
//! - **Reparent**: remove, then insert under the new parent
//!
//! Validation and capacity growth run before the tree is touched, so a failed
//! call leaves the tree and the batch contents unchanged.

use crate::atlas::AtlasStorage;
use crate::foundation::collections::SpriteId;
use crate::render::Quad;
use crate::scene::{SpriteTree, TreeError};

use super::error::{BatchError, BatchResult};
use super::node::BatchNode;
use super::reindex::reindex_subtree;

impl<S: AtlasStorage> BatchNode<S> {
    // -- Insertion --

    /// Add `sprite` and its subtree as a top-level child of the batch
    pub fn add_child(&mut self, tree: &mut SpriteTree, sprite: SpriteId, z: i32) -> BatchResult<()> {
        self.insert_child(tree, self.root, sprite, z, None)
    }

    /// Add `sprite` as a top-level child and tag it
    pub fn add_child_with_tag(&mut self, tree: &mut SpriteTree, sprite: SpriteId, z: i32, tag: i32) -> BatchResult<()> {
        self.insert_child(tree, self.root, sprite, z, Some(tag))
    }

    /// Add `sprite` under `parent`, which must be the root or a member
    pub fn add_child_to(&mut self, tree: &mut SpriteTree, parent: SpriteId, sprite: SpriteId, z: i32) -> BatchResult<()> {
        self.insert_child(tree, parent, sprite, z, None)
    }

    fn insert_child(
        &mut self,
        tree: &mut SpriteTree,
        parent: SpriteId,
        sprite: SpriteId,
        z: i32,
        tag: Option<i32>,
    ) -> BatchResult<()> {
        self.validate_insert(tree, parent, sprite)?;
        self.ensure_capacity(self.descendants.len() + tree.subtree(sprite).len())?;

        tree.attach_batched(parent, sprite, z, tag)?;
        self.insert_subtree(tree, sprite)
    }

    fn validate_insert(&self, tree: &SpriteTree, parent: SpriteId, sprite: SpriteId) -> BatchResult<()> {
        if !tree.contains(sprite) {
            return Err(BatchError::UnknownSprite(sprite));
        }
        if !tree.contains(parent) {
            return Err(BatchError::UnknownSprite(parent));
        }
        if !self.accepts_children(tree, parent) {
            return Err(BatchError::NotMember(parent));
        }
        if tree.parent(sprite).is_some() {
            return Err(BatchError::AlreadyAttached(sprite));
        }
        if tree.batch(sprite).is_some() {
            return Err(TreeError::Batched(sprite).into());
        }
        self.validate_content(tree, sprite)
    }

    /// Every node under `sprite` must be renderable with the batch texture
    fn validate_content(&self, tree: &SpriteTree, sprite: SpriteId) -> BatchResult<()> {
        for id in tree.subtree(sprite) {
            let found = tree.texture_id(id).ok_or(BatchError::NotRenderable(id))?;
            if found != self.texture.id {
                return Err(BatchError::InvalidTexture {
                    sprite: id,
                    expected: self.texture.id,
                    found,
                });
            }
        }
        Ok(())
    }

    /// Place the already attached, unbatched subtree of `sprite` in the atlas
    fn insert_subtree(&mut self, tree: &mut SpriteTree, sprite: SpriteId) -> BatchResult<()> {
        let start = self.resolver(tree).atlas_index_for_child(sprite);
        let members = tree.subtree(sprite);
        let amount = members.len();

        self.atlas.insert_quads(start, &vec![Quad::default(); amount])?;
        self.descendants.splice(start..start, members.iter().copied());
        for &id in &members {
            tree.set_membership(id, Some(self.root), None);
        }
        self.renumber_from(tree, start + amount);

        reindex_subtree(
            tree,
            &mut self.atlas,
            &mut self.descendants,
            self.root,
            self.config.child_order,
            sprite,
            start,
        )?;
        log::debug!("Batched {:?} with {} quads at {}", sprite, amount, start);
        Ok(())
    }

    // -- Removal --

    /// Remove a member and its subtree; returns `false` if it is not a member
    ///
    /// The sprite is detached from its parent but stays alive in the tree.
    /// With `cleanup`, transient state (such as running animations) on the
    /// whole subtree is cancelled.
    pub fn remove_child(&mut self, tree: &mut SpriteTree, sprite: SpriteId, cleanup: bool) -> BatchResult<bool> {
        if !self.is_member(tree, sprite) {
            log::warn!("Ignoring removal of {:?}: not a member of batch {:?}", sprite, self.root);
            return Ok(false);
        }

        self.remove_subtree(tree, sprite)?;
        tree.detach(sprite)?;
        if cleanup {
            tree.cleanup(sprite);
        }
        Ok(true)
    }

    /// Remove the member at atlas index `index` and its subtree
    pub fn remove_child_at_index(&mut self, tree: &mut SpriteTree, index: usize, cleanup: bool) -> BatchResult<bool> {
        match self.descendants.get(index) {
            Some(&sprite) => self.remove_child(tree, sprite, cleanup),
            None => {
                log::warn!("Ignoring removal at {}: batch {:?} holds {}", index, self.root, self.descendants.len());
                Ok(false)
            }
        }
    }

    /// Remove every member at once; the atlas keeps its capacity
    pub fn remove_all_children(&mut self, tree: &mut SpriteTree, cleanup: bool) -> BatchResult<()> {
        for id in self.descendants.drain(..) {
            tree.set_membership(id, None, None);
        }
        self.atlas.remove_all();

        let children = tree.children(self.root).to_vec();
        for child in children {
            tree.detach(child)?;
            if cleanup {
                tree.cleanup(child);
            }
        }
        log::debug!("Cleared sprite batch {:?}", self.root);
        Ok(())
    }

    /// Take `sprite`'s block out of the atlas and clear its membership; the tree is untouched
    fn remove_subtree(&mut self, tree: &mut SpriteTree, sprite: SpriteId) -> BatchResult<()> {
        let resolver = self.resolver(tree);
        let bounds = resolver
            .lowest_atlas_index_in_child(sprite)
            .zip(resolver.highest_atlas_index_in_child(sprite));
        let (low, high) = bounds.ok_or_else(|| BatchError::Inconsistent(format!("member {sprite:?} has no atlas index")))?;

        self.atlas.remove_quads(low, high - low + 1)?;
        for id in self.descendants.drain(low..=high) {
            tree.set_membership(id, None, None);
        }
        self.renumber_from(tree, low);
        log::debug!("Unbatched {:?} from {}..={}", sprite, low, high);
        Ok(())
    }

    // -- Moving --

    /// Change a member's z-order and move its block among its siblings
    pub fn reorder_child(&mut self, tree: &mut SpriteTree, sprite: SpriteId, z: i32) -> BatchResult<()> {
        if !self.is_member(tree, sprite) {
            return Err(BatchError::NotMember(sprite));
        }
        if tree.z_order(sprite) == Some(z) {
            return Ok(());
        }
        let parent = tree.parent(sprite).ok_or(TreeError::NotAttached(sprite))?;

        // The parent's block keeps its slots, so its first index is the start
        let start = self.resolver(tree).lowest_atlas_index_in_child(parent).unwrap_or(0);
        tree.set_z_order(sprite, z)?;
        self.rebuild_index_in_order(tree, parent, start)?;
        log::debug!("Reordered {:?} to z {}", sprite, z);
        Ok(())
    }

    /// Move a member under another parent of the same batch
    pub fn reparent(&mut self, tree: &mut SpriteTree, sprite: SpriteId, new_parent: SpriteId, z: i32) -> BatchResult<()> {
        if !self.is_member(tree, sprite) {
            return Err(BatchError::NotMember(sprite));
        }
        if !self.accepts_children(tree, new_parent) {
            return Err(BatchError::NotMember(new_parent));
        }
        if new_parent == sprite || tree.is_ancestor(sprite, new_parent) {
            return Err(TreeError::WouldCycle {
                parent: new_parent,
                child: sprite,
            }
            .into());
        }

        let tag = tree.tag(sprite);
        self.remove_subtree(tree, sprite)?;
        tree.detach(sprite)?;
        self.insert_child(tree, new_parent, sprite, z, tag)
    }

    /// Move a member of `source` under `parent` in this batch
    pub fn take_from<T: AtlasStorage>(
        &mut self,
        source: &mut BatchNode<T>,
        tree: &mut SpriteTree,
        sprite: SpriteId,
        parent: SpriteId,
        z: i32,
    ) -> BatchResult<()> {
        if !source.is_member(tree, sprite) {
            return Err(BatchError::NotMember(sprite));
        }
        if !tree.contains(parent) {
            return Err(BatchError::UnknownSprite(parent));
        }
        if !self.accepts_children(tree, parent) {
            return Err(BatchError::NotMember(parent));
        }
        self.validate_content(tree, sprite)?;
        self.ensure_capacity(self.descendants.len() + tree.subtree(sprite).len())?;

        let tag = tree.tag(sprite);
        source.remove_subtree(tree, sprite)?;
        tree.detach(sprite)?;
        self.insert_child(tree, parent, sprite, z, tag)?;
        log::debug!("Moved {:?} from batch {:?} to {:?}", sprite, source.root, self.root);
        Ok(())
    }

    // -- Resynchronisation --

    /// Reassign indices to `parent`'s subtree starting at `start`; returns the index after it
    ///
    /// Use after changing the z-order of a batched node directly through the tree.
    pub fn rebuild_index_in_order(&mut self, tree: &mut SpriteTree, parent: SpriteId, start: usize) -> BatchResult<usize> {
        if !self.accepts_children(tree, parent) {
            return Err(BatchError::NotMember(parent));
        }
        let next = reindex_subtree(
            tree,
            &mut self.atlas,
            &mut self.descendants,
            self.root,
            self.config.child_order,
            parent,
            start,
        )?;
        Ok(next)
    }
}
