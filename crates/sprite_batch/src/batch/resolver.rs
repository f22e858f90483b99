//! # Index Resolver
//!
//! Finds the atlas index a sprite must occupy without rescanning the batch.
//!
//! The atlas is the draw-order traversal of the batch, so a sprite's index is
//! one past the last batched node drawn before it. That node is found by walking
//! backwards through the sprite's siblings, then through its parent and the
//! parent's siblings, and so on up to the batch root. Each sibling subtree is
//! answered by [`IndexResolver::highest_atlas_index_in_child`], which only
//! descends along the last child at each level.
//!
//! The cost is `O(depth + siblings visited)` in the common case and `O(n)` only
//! when long runs of relatives have nothing batched.

use crate::core::config::ChildOrder;
use crate::foundation::collections::SpriteId;
use crate::scene::SpriteTree;

use super::order::{draw_slots, Slot};

/// Boundary queries over one batch's view of the tree
#[derive(Debug, Clone, Copy)]
pub struct IndexResolver<'a> {
    tree: &'a SpriteTree,
    root: SpriteId,
    order: ChildOrder,
}

impl<'a> IndexResolver<'a> {
    /// Create a resolver for the batch rooted at `root`
    pub fn new(tree: &'a SpriteTree, root: SpriteId, order: ChildOrder) -> Self {
        Self { tree, root, order }
    }

    /// Index at which `sprite`'s block must begin
    ///
    /// `sprite` must already be attached under the batch root and its subtree
    /// must not be batched yet. Debug builds also check the upper boundary and
    /// warn when it disagrees, which happens after a z-order change made
    /// through the tree and not yet rebuilt.
    pub fn atlas_index_for_child(&self, sprite: SpriteId) -> usize {
        let index = self.preceding_index(sprite).map_or(0, |index| index + 1);
        if cfg!(debug_assertions) {
            if let Some(next) = self.following_index(sprite).filter(|&next| next != index) {
                log::warn!(
                    "Atlas boundaries disagree for {:?}: placing at {} but next block starts at {}",
                    sprite,
                    index,
                    next
                );
            }
        }
        log::trace!("Resolved atlas index {} for {:?}", index, sprite);
        index
    }

    /// Last atlas index used by `node`'s subtree, if any of it is batched
    pub fn highest_atlas_index_in_child(&self, node: SpriteId) -> Option<usize> {
        draw_slots(self.tree, node, self.order)
            .into_iter()
            .rev()
            .find_map(|slot| self.slot_highest(node, slot))
    }

    /// First atlas index used by `node`'s subtree, if any of it is batched
    pub fn lowest_atlas_index_in_child(&self, node: SpriteId) -> Option<usize> {
        draw_slots(self.tree, node, self.order)
            .into_iter()
            .find_map(|slot| self.slot_lowest(node, slot))
    }

    /// Highest index among batched nodes drawn before `sprite`
    fn preceding_index(&self, sprite: SpriteId) -> Option<usize> {
        let mut current = sprite;
        while current != self.root {
            let parent = self.tree.parent(current)?;
            let slots = draw_slots(self.tree, parent, self.order);
            let position = slots.iter().position(|&slot| slot == Slot::Child(current))?;

            let found = slots[..position]
                .iter()
                .rev()
                .find_map(|&slot| self.slot_highest(parent, slot));
            if found.is_some() {
                return found;
            }
            current = parent;
        }
        None
    }

    /// Lowest index among batched nodes drawn after `sprite`'s subtree
    fn following_index(&self, sprite: SpriteId) -> Option<usize> {
        let mut current = sprite;
        while current != self.root {
            let parent = self.tree.parent(current)?;
            let slots = draw_slots(self.tree, parent, self.order);
            let position = slots.iter().position(|&slot| slot == Slot::Child(current))?;

            let found = slots[position + 1..]
                .iter()
                .find_map(|&slot| self.slot_lowest(parent, slot));
            if found.is_some() {
                return found;
            }
            current = parent;
        }
        None
    }

    fn slot_highest(&self, owner: SpriteId, slot: Slot) -> Option<usize> {
        match slot {
            Slot::Parent => self.member_index(owner),
            Slot::Child(child) => self.highest_atlas_index_in_child(child),
        }
    }

    fn slot_lowest(&self, owner: SpriteId, slot: Slot) -> Option<usize> {
        match slot {
            Slot::Parent => self.member_index(owner),
            Slot::Child(child) => self.lowest_atlas_index_in_child(child),
        }
    }

    fn member_index(&self, node: SpriteId) -> Option<usize> {
        if self.tree.batch(node) == Some(self.root) {
            self.tree.atlas_index(node)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Rect;
    use crate::render::{Texture, TextureId};
    use crate::scene::Sprite;

    struct Fixture {
        tree: SpriteTree,
        root: SpriteId,
    }

    impl Fixture {
        fn new() -> Self {
            let mut tree = SpriteTree::new();
            let root = tree.create_container();
            Self { tree, root }
        }

        fn sprite(&mut self) -> SpriteId {
            let texture = Texture::new(TextureId(1), 16, 16);
            self.tree.create(Sprite::new(texture, Rect::new(0.0, 0.0, 1.0, 1.0)))
        }

        /// Attach and mark batched at `index` without touching other indices
        fn batched(&mut self, parent: SpriteId, z: i32, index: usize) -> SpriteId {
            let id = self.sprite();
            self.tree.attach_batched(parent, id, z, None).unwrap();
            self.tree.set_membership(id, Some(self.root), Some(index));
            id
        }

        fn resolver(&self, order: ChildOrder) -> IndexResolver<'_> {
            IndexResolver::new(&self.tree, self.root, order)
        }
    }

    #[test]
    fn test_first_insertion_is_zero() {
        let mut fx = Fixture::new();
        let a = fx.sprite();
        fx.tree.attach_batched(fx.root, a, 0, None).unwrap();
        assert_eq!(fx.resolver(ChildOrder::ParentFirst).atlas_index_for_child(a), 0);
    }

    #[test]
    fn test_after_previous_sibling_subtree() {
        // root -> [a(0) -> [b(0)], new(1)]
        let mut fx = Fixture::new();
        let root = fx.root;
        let a = fx.batched(root, 0, 0);
        let b = fx.batched(a, 0, 1);
        let new = fx.sprite();
        fx.tree.attach_batched(root, new, 1, None).unwrap();

        let resolver = fx.resolver(ChildOrder::ParentFirst);
        assert_eq!(resolver.highest_atlas_index_in_child(a), Some(1));
        assert_eq!(resolver.lowest_atlas_index_in_child(a), Some(0));
        assert_eq!(resolver.atlas_index_for_child(new), 2);
        assert_eq!(resolver.highest_atlas_index_in_child(b), Some(1));
    }

    #[test]
    fn test_first_child_goes_after_parent() {
        // root -> [a(0), c(1)], inserting a -> [new]
        let mut fx = Fixture::new();
        let root = fx.root;
        let a = fx.batched(root, 0, 0);
        fx.batched(root, 1, 1);
        let new = fx.sprite();
        fx.tree.attach_batched(a, new, 5, None).unwrap();

        assert_eq!(fx.resolver(ChildOrder::ParentFirst).atlas_index_for_child(new), 1);
    }

    #[test]
    fn test_lower_z_goes_before_sibling() {
        let mut fx = Fixture::new();
        let root = fx.root;
        fx.batched(root, 3, 0);
        let new = fx.sprite();
        fx.tree.attach_batched(root, new, 1, None).unwrap();

        assert_eq!(fx.resolver(ChildOrder::ParentFirst).atlas_index_for_child(new), 0);
    }

    #[test]
    fn test_negative_child_goes_before_parent() {
        // NegativeZBehindParent: root -> [a(0) -> [b(-2)]], inserting a -> [new(-1)]
        let mut fx = Fixture::new();
        let root = fx.root;
        let a = fx.batched(root, 0, 1);
        fx.batched(a, -2, 0);
        let new = fx.sprite();
        fx.tree.attach_batched(a, new, -1, None).unwrap();

        let resolver = fx.resolver(ChildOrder::NegativeZBehindParent);
        assert_eq!(resolver.lowest_atlas_index_in_child(a), Some(0));
        assert_eq!(resolver.highest_atlas_index_in_child(a), Some(1));
        assert_eq!(resolver.atlas_index_for_child(new), 1);
    }

    #[test]
    fn test_walks_up_through_unbatched_relatives() {
        // root -> [a(0) -> [b(0)], c(1) -> [new]] where only a and b are batched
        let mut fx = Fixture::new();
        let root = fx.root;
        let a = fx.batched(root, 0, 0);
        fx.batched(a, 0, 1);
        let c = fx.sprite();
        fx.tree.attach_batched(root, c, 1, None).unwrap();
        let new = fx.sprite();
        fx.tree.attach_batched(c, new, 0, None).unwrap();

        assert_eq!(fx.resolver(ChildOrder::ParentFirst).atlas_index_for_child(new), 2);
    }

    #[test]
    fn test_ignores_nodes_of_other_batches() {
        let mut fx = Fixture::new();
        let root = fx.root;
        let other_root = fx.tree.create_container();
        let a = fx.sprite();
        fx.tree.attach_batched(root, a, 0, None).unwrap();
        fx.tree.set_membership(a, Some(other_root), Some(7));
        let new = fx.sprite();
        fx.tree.attach_batched(root, new, 1, None).unwrap();

        let resolver = fx.resolver(ChildOrder::ParentFirst);
        assert_eq!(resolver.highest_atlas_index_in_child(a), None);
        assert_eq!(resolver.atlas_index_for_child(new), 0);
    }
}
