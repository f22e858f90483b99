//! Subtree reindexing
//!
//! Assigns consecutive atlas indices to one subtree's members in draw order,
//! writing each member's quad and handle into the matching slot.

use crate::atlas::{AtlasError, AtlasResult, AtlasStorage};
use crate::core::config::ChildOrder;
use crate::foundation::collections::SpriteId;
use crate::scene::SpriteTree;

use super::order::collect_draw_order;

/// Members of `root`'s batch found under `node`, in draw order
pub(crate) fn members_in_draw_order(tree: &SpriteTree, root: SpriteId, node: SpriteId, order: ChildOrder) -> Vec<SpriteId> {
    let mut members = Vec::new();
    collect_draw_order(tree, node, order, &|id| tree.batch(id) == Some(root), &mut members);
    members
}

/// Renumber the members under `parent` starting at `start`; returns the index after the range
///
/// The range `start..start + members` must already exist in both the atlas and
/// `descendants`. Nothing is written if it does not.
pub(crate) fn reindex_subtree<S: AtlasStorage>(
    tree: &mut SpriteTree,
    atlas: &mut S,
    descendants: &mut [SpriteId],
    root: SpriteId,
    order: ChildOrder,
    parent: SpriteId,
    start: usize,
) -> AtlasResult<usize> {
    let members = members_in_draw_order(tree, root, parent, order);
    let end = start + members.len();
    let available = atlas.count().min(descendants.len());
    if end > available {
        return Err(AtlasError::IndexOutOfBounds {
            index: end.saturating_sub(1),
            count: available,
        });
    }

    for (index, id) in (start..end).zip(members) {
        if let Some(quad) = tree.quad(id) {
            atlas.set(index, quad)?;
        }
        descendants[index] = id;
        tree.set_atlas_index(id, index);
        tree.take_dirty(id);
    }

    log::trace!("Reindexed {:?} into {}..{}", parent, start, end);
    Ok(end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::QuadAtlas;
    use crate::foundation::math::{Rect, Vec2};
    use crate::render::{Quad, Texture, TextureId};
    use crate::scene::Sprite;

    fn sprite_at(tree: &mut SpriteTree, x: f32) -> SpriteId {
        let texture = Texture::new(TextureId(1), 16, 16);
        tree.create(Sprite::new(texture, Rect::new(0.0, 0.0, 2.0, 2.0)).with_position(Vec2::new(x, 0.0)))
    }

    #[test]
    fn test_reindex_writes_quads_in_draw_order() {
        let mut tree = SpriteTree::new();
        let root = tree.create_container();
        let a = sprite_at(&mut tree, 1.0);
        let b = sprite_at(&mut tree, 2.0);
        let c = sprite_at(&mut tree, 3.0);
        tree.attach(root, a, 0).unwrap();
        tree.attach(a, c, 2).unwrap();
        tree.attach(a, b, 1).unwrap();
        for id in [a, b, c] {
            tree.set_membership(id, Some(root), None);
            tree.mark_dirty(id);
        }

        let mut atlas = QuadAtlas::with_capacity(4).unwrap();
        atlas.insert_quads(0, &[Quad::default(); 3]).unwrap();
        let mut descendants = vec![root; 3];

        let next = reindex_subtree(&mut tree, &mut atlas, &mut descendants, root, ChildOrder::ParentFirst, root, 0).unwrap();

        assert_eq!(next, 3);
        assert_eq!(descendants, vec![a, b, c]);
        for (index, id) in descendants.iter().enumerate() {
            assert_eq!(tree.atlas_index(*id), Some(index));
            assert_eq!(atlas.get(index).copied(), tree.quad(*id));
            assert!(!tree.is_dirty(*id));
        }
    }

    #[test]
    fn test_reindex_rejects_missing_slots() {
        let mut tree = SpriteTree::new();
        let root = tree.create_container();
        let a = sprite_at(&mut tree, 1.0);
        tree.attach(root, a, 0).unwrap();
        tree.set_membership(a, Some(root), None);

        let mut atlas = QuadAtlas::with_capacity(4).unwrap();
        let mut descendants = Vec::new();
        let result = reindex_subtree(&mut tree, &mut atlas, &mut descendants, root, ChildOrder::ParentFirst, root, 0);

        assert_eq!(result, Err(AtlasError::IndexOutOfBounds { index: 0, count: 0 }));
        assert_eq!(tree.atlas_index(a), None);
    }
}
