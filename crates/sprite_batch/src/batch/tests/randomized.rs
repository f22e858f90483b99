//! Seeded random operation sequences
//!
//! Applies long runs of inserts, removals, reorders, reparents and content
//! edits, checking every invariant after each step.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::helpers::{sprite_at, TEXTURE};
use crate::batch::BatchNode;
use crate::core::config::{BatchConfig, ChildOrder};
use crate::foundation::collections::SpriteId;
use crate::foundation::math::Vec2;
use crate::render::RecordingRenderer;
use crate::scene::{Sprite, SpriteTree};

fn run_sequence(seed: u64, order: ChildOrder, steps: usize) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut tree = SpriteTree::new();
    let config = BatchConfig::default().with_capacity(4).with_child_order(order);
    let mut batch = BatchNode::with_config(&mut tree, TEXTURE, config).unwrap();
    let mut loose: Vec<SpriteId> = Vec::new();
    let mut renderer = RecordingRenderer::new();

    for step in 0..steps {
        let members = batch.descendants().to_vec();
        match rng.gen_range(0..7) {
            // Insert a fresh sprite, sometimes with a child of its own
            0 | 1 => {
                let sprite = sprite_at(&mut tree, step as f32);
                if rng.gen_bool(0.3) {
                    let child = sprite_at(&mut tree, step as f32 + 0.5);
                    tree.attach(sprite, child, rng.gen_range(-2..3)).unwrap();
                }
                let parent = members.choose(&mut rng).copied().filter(|_| rng.gen_bool(0.6));
                let z = rng.gen_range(-3..4);
                match parent {
                    Some(parent) => batch.add_child_to(&mut tree, parent, sprite, z).unwrap(),
                    None => batch.add_child(&mut tree, sprite, z).unwrap(),
                }
            }
            // Reinsert a previously removed subtree
            2 => {
                if let Some(index) = (!loose.is_empty()).then(|| rng.gen_range(0..loose.len())) {
                    let sprite = loose.swap_remove(index);
                    batch.add_child(&mut tree, sprite, rng.gen_range(-3..4)).unwrap();
                }
            }
            3 => {
                if let Some(&sprite) = members.choose(&mut rng) {
                    assert!(batch.remove_child(&mut tree, sprite, rng.gen_bool(0.5)).unwrap());
                    loose.push(sprite);
                }
            }
            4 => {
                if let Some(&sprite) = members.choose(&mut rng) {
                    batch.reorder_child(&mut tree, sprite, rng.gen_range(-3..4)).unwrap();
                }
            }
            5 => {
                if let (Some(&sprite), Some(&target)) = (members.choose(&mut rng), members.choose(&mut rng)) {
                    let new_parent = if target == sprite || tree.is_ancestor(sprite, target) {
                        batch.root()
                    } else {
                        target
                    };
                    batch.reparent(&mut tree, sprite, new_parent, rng.gen_range(-3..4)).unwrap();
                }
            }
            _ => {
                if let Some(&sprite) = members.choose(&mut rng) {
                    let dx = rng.gen_range(-1.0..1.0);
                    tree.content_as_mut::<Sprite>(sprite).unwrap().move_by(Vec2::new(dx, 0.0));
                }
                if rng.gen_bool(0.2) {
                    let drawn = batch.draw(&mut tree, &mut renderer).unwrap();
                    assert_eq!(drawn, batch.count());
                }
            }
        }

        if let Err(error) = batch.verify(&tree) {
            panic!("seed {seed}, step {step}: {error}");
        }
        assert!(batch.capacity() >= batch.count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_sequences_parent_first() {
        for seed in 0..8 {
            run_sequence(seed, ChildOrder::ParentFirst, 300);
        }
    }

    #[test]
    fn test_random_sequences_negative_z_behind_parent() {
        for seed in 100..108 {
            run_sequence(seed, ChildOrder::NegativeZBehindParent, 300);
        }
    }
}
