//! Draw sequence of a single node
//!
//! A node's draw sequence lists the node itself and each child subtree in the
//! order they occupy the atlas. Children are already sorted by z-order in the
//! tree; [`ChildOrder`] decides where the node itself goes.

use crate::core::config::ChildOrder;
use crate::foundation::collections::SpriteId;
use crate::scene::SpriteTree;

/// One entry of a node's draw sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    /// The node itself
    Parent,
    /// The whole subtree of one child
    Child(SpriteId),
}

pub(crate) fn draw_slots(tree: &SpriteTree, node: SpriteId, order: ChildOrder) -> Vec<Slot> {
    let children = tree.children(node);
    let split = children.partition_point(|&child| order.draws_before_parent(tree.z_order(child).unwrap_or(0)));

    let mut slots = Vec::with_capacity(children.len() + 1);
    slots.extend(children[..split].iter().map(|&child| Slot::Child(child)));
    slots.push(Slot::Parent);
    slots.extend(children[split..].iter().map(|&child| Slot::Child(child)));
    slots
}

/// Append every node of `node`'s subtree accepted by `include`, in draw order
pub(crate) fn collect_draw_order<F>(tree: &SpriteTree, node: SpriteId, order: ChildOrder, include: &F, out: &mut Vec<SpriteId>)
where
    F: Fn(SpriteId) -> bool,
{
    for slot in draw_slots(tree, node, order) {
        match slot {
            Slot::Parent => {
                if include(node) {
                    out.push(node);
                }
            }
            Slot::Child(child) => collect_draw_order(tree, child, order, include, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Rect;
    use crate::render::{Texture, TextureId};
    use crate::scene::Sprite;

    fn build() -> (SpriteTree, SpriteId, [SpriteId; 4]) {
        let mut tree = SpriteTree::new();
        let texture = Texture::new(TextureId(1), 16, 16);
        let root = tree.create_container();
        let ids = [(); 4].map(|()| tree.create(Sprite::new(texture, Rect::new(0.0, 0.0, 1.0, 1.0))));
        let [a, b, c, d] = ids;
        tree.attach(root, a, 0).unwrap();
        tree.attach(a, b, -1).unwrap();
        tree.attach(a, c, 1).unwrap();
        tree.attach(b, d, 0).unwrap();
        (tree, root, ids)
    }

    #[test]
    fn test_parent_first_is_pre_order() {
        let (tree, root, [a, b, c, d]) = build();
        let mut out = Vec::new();
        collect_draw_order(&tree, root, ChildOrder::ParentFirst, &|id| id != root, &mut out);
        assert_eq!(out, vec![a, b, d, c]);
    }

    #[test]
    fn test_negative_z_draws_behind_parent() {
        let (tree, root, [a, b, c, d]) = build();
        assert_eq!(
            draw_slots(&tree, a, ChildOrder::NegativeZBehindParent),
            vec![Slot::Child(b), Slot::Parent, Slot::Child(c)]
        );

        let mut out = Vec::new();
        collect_draw_order(&tree, root, ChildOrder::NegativeZBehindParent, &|id| id != root, &mut out);
        assert_eq!(out, vec![b, d, a, c]);
    }
}
