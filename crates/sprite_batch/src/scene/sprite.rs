//! Batchable sprite content
//!
//! [`AtlasRenderable`] is the capability a tree node needs to live in a batch:
//! report the texture it samples and produce its quad. [`Sprite`] is the stock
//! implementation.

use std::any::Any;
use std::fmt;

use crate::foundation::math::{rotate, Rect, Vec2};
use crate::render::{Quad, QuadVertex, Texture, TextureId};

/// Anything that can occupy one slot of a batch atlas
pub trait AtlasRenderable: Any + fmt::Debug {
    /// Texture this content samples from
    fn texture_id(&self) -> TextureId;

    /// Quad reflecting the current visual state
    fn quad(&self) -> Quad;

    /// Cancel transient state (running animations and the like) when the node
    /// leaves a batch with cleanup requested
    fn cleanup(&mut self) {}

    /// Downcast support
    fn as_any(&self) -> &dyn Any;

    /// Mutable downcast support
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Frame animation stepping a sprite through texture rects
#[derive(Debug, Clone, PartialEq)]
pub struct FrameAnimation {
    /// Texture rect of each frame
    pub frames: Vec<Rect>,
    /// Index of the frame currently shown
    pub current_frame: usize,
    /// Seconds each frame is shown
    pub frame_time: f32,
    /// Seconds accumulated on the current frame
    pub elapsed_time: f32,
    /// Restart from the first frame after the last one
    pub looping: bool,
    /// Whether a non-looping animation reached its last frame
    pub finished: bool,
}

impl FrameAnimation {
    /// Create a looping animation
    pub fn new(frames: Vec<Rect>, frame_time: f32) -> Self {
        Self {
            frames,
            current_frame: 0,
            frame_time,
            elapsed_time: 0.0,
            looping: true,
            finished: false,
        }
    }

    /// Frames laid out left to right, top to bottom in a grid of `cell`-sized cells
    #[allow(clippy::cast_precision_loss)]
    pub fn from_grid(cell: Vec2, columns: u32, start_frame: u32, frame_count: u32, frame_time: f32) -> Self {
        let columns = columns.max(1);
        let frames = (start_frame..start_frame + frame_count)
            .map(|frame| {
                let col = frame % columns;
                let row = frame / columns;
                Rect::new(col as f32 * cell.x, row as f32 * cell.y, cell.x, cell.y)
            })
            .collect();

        Self::new(frames, frame_time)
    }

    /// Play once and stop on the last frame
    pub fn once(mut self) -> Self {
        self.looping = false;
        self
    }

    /// Rect of the current frame
    pub fn current_rect(&self) -> Option<Rect> {
        self.frames.get(self.current_frame).copied()
    }

    /// Advance by `delta_time` seconds; returns whether the frame changed
    pub fn update(&mut self, delta_time: f32) -> bool {
        if self.finished || self.frames.len() < 2 || self.frame_time <= 0.0 {
            return false;
        }

        let start_frame = self.current_frame;
        self.elapsed_time += delta_time;
        while self.elapsed_time >= self.frame_time {
            self.elapsed_time -= self.frame_time;
            if self.current_frame + 1 < self.frames.len() {
                self.current_frame += 1;
            } else if self.looping {
                self.current_frame = 0;
            } else {
                self.finished = true;
                self.elapsed_time = 0.0;
                break;
            }
        }

        self.current_frame != start_frame
    }
}

/// Textured quad positioned around an anchor point
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    texture: Texture,
    texture_rect: Rect,
    position: Vec2,
    anchor: Vec2,
    rotation: f32,
    scale: Vec2,
    color: [u8; 4],
    opacity: u8,
    vertex_z: f32,
    visible: bool,
    animation: Option<FrameAnimation>,
}

impl Sprite {
    /// Create a sprite showing `texture_rect` of `texture`
    pub fn new(texture: Texture, texture_rect: Rect) -> Self {
        Self {
            texture,
            texture_rect,
            position: Vec2::zeros(),
            anchor: Vec2::new(0.5, 0.5),
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
            color: [255, 255, 255, 255],
            opacity: 255,
            vertex_z: 0.0,
            visible: true,
            animation: None,
        }
    }

    /// Set the position
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    /// Set the rotation in radians
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the color
    pub fn with_color(mut self, color: [u8; 4]) -> Self {
        self.color = color;
        self
    }

    /// Set the anchor, in fractions of the sprite size
    pub fn with_anchor(mut self, anchor: Vec2) -> Self {
        self.anchor = anchor;
        self
    }

    /// Attach a frame animation
    pub fn with_animation(mut self, animation: FrameAnimation) -> Self {
        if let Some(rect) = animation.current_rect() {
            self.texture_rect = rect;
        }
        self.animation = Some(animation);
        self
    }

    /// Texture the sprite samples from
    pub fn texture(&self) -> Texture {
        self.texture
    }

    /// Point the sprite at another texture region
    pub fn set_texture(&mut self, texture: Texture, texture_rect: Rect) {
        self.texture = texture;
        self.texture_rect = texture_rect;
    }

    /// Region of the texture shown
    pub fn texture_rect(&self) -> Rect {
        self.texture_rect
    }

    /// Change the region of the texture shown
    pub fn set_texture_rect(&mut self, rect: Rect) {
        self.texture_rect = rect;
    }

    /// Position of the anchor point
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Move the anchor point
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Move by a delta
    pub fn move_by(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Rotation in radians
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Set the rotation in radians
    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    /// Set a per-axis scale
    pub fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
    }

    /// Set the opacity, multiplied into the color alpha
    pub fn set_opacity(&mut self, opacity: u8) {
        self.opacity = opacity;
    }

    /// Set the depth written into every vertex
    pub fn set_vertex_z(&mut self, vertex_z: f32) {
        self.vertex_z = vertex_z;
    }

    /// Whether the sprite draws
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the sprite; a hidden sprite keeps its atlas slot
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Running animation, if any
    pub fn animation(&self) -> Option<&FrameAnimation> {
        self.animation.as_ref()
    }

    /// Advance the animation; returns whether the quad changed
    pub fn update(&mut self, delta_time: f32) -> bool {
        let Some(animation) = self.animation.as_mut() else {
            return false;
        };
        if !animation.update(delta_time) {
            return false;
        }
        match animation.current_rect() {
            Some(rect) => {
                self.texture_rect = rect;
                true
            }
            None => false,
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn vertex_color(&self) -> [u8; 4] {
        let scale = |channel: u8| (u16::from(channel) * u16::from(self.opacity) / 255) as u8;
        let [r, g, b, a] = self.color;
        if self.texture.premultiplied_alpha {
            [scale(r), scale(g), scale(b), scale(a)]
        } else {
            [r, g, b, scale(a)]
        }
    }
}

impl AtlasRenderable for Sprite {
    fn texture_id(&self) -> TextureId {
        self.texture.id
    }

    fn quad(&self) -> Quad {
        if !self.visible {
            return Quad::default();
        }

        let size = self.texture_rect.size.component_mul(&self.scale);
        let left = -self.anchor.x * size.x;
        let bottom = -self.anchor.y * size.y;
        let right = left + size.x;
        let top = bottom + size.y;

        let corner = |x: f32, y: f32| {
            let point = rotate(Vec2::new(x, y), self.rotation) + self.position;
            [point.x, point.y, self.vertex_z]
        };

        let rect = self.texture_rect;
        let [u0, v0] = self.texture.normalize(rect.min_x(), rect.min_y());
        let [u1, v1] = self.texture.normalize(rect.max_x(), rect.max_y());
        let color = self.vertex_color();

        Quad {
            top_left: QuadVertex::new(corner(left, top), color, [u0, v0]),
            bottom_left: QuadVertex::new(corner(left, bottom), color, [u0, v1]),
            top_right: QuadVertex::new(corner(right, top), color, [u1, v0]),
            bottom_right: QuadVertex::new(corner(right, bottom), color, [u1, v1]),
        }
    }

    fn cleanup(&mut self) {
        self.animation = None;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    fn texture() -> Texture {
        Texture::new(TextureId(1), 128, 128)
    }

    #[test]
    fn test_quad_corners_around_anchor() {
        let sprite = Sprite::new(texture(), Rect::new(0.0, 0.0, 32.0, 16.0)).with_position(Vec2::new(100.0, 50.0));
        let quad = sprite.quad();

        assert_eq!(quad.top_left.position, [84.0, 58.0, 0.0]);
        assert_eq!(quad.bottom_left.position, [84.0, 42.0, 0.0]);
        assert_eq!(quad.top_right.position, [116.0, 58.0, 0.0]);
        assert_eq!(quad.bottom_right.position, [116.0, 42.0, 0.0]);
    }

    #[test]
    fn test_quad_tex_coords() {
        let sprite = Sprite::new(texture(), Rect::new(32.0, 64.0, 32.0, 64.0));
        let quad = sprite.quad();

        assert_eq!(quad.top_left.tex_coords, [0.25, 0.5]);
        assert_eq!(quad.bottom_right.tex_coords, [0.5, 1.0]);
    }

    #[test]
    fn test_rotated_quad() {
        let sprite = Sprite::new(texture(), Rect::new(0.0, 0.0, 2.0, 2.0))
            .with_rotation(std::f32::consts::PI);
        let quad = sprite.quad();

        assert_relative_eq!(quad.top_left.position[0], 1.0, epsilon = EPSILON);
        assert_relative_eq!(quad.top_left.position[1], -1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_hidden_sprite_is_degenerate() {
        let mut sprite = Sprite::new(texture(), Rect::new(0.0, 0.0, 8.0, 8.0));
        assert!(!sprite.quad().is_degenerate());
        sprite.set_visible(false);
        assert!(sprite.quad().is_degenerate());
    }

    #[test]
    fn test_opacity_premultiplies() {
        let mut sprite = Sprite::new(texture(), Rect::new(0.0, 0.0, 8.0, 8.0));
        sprite.set_opacity(0);
        assert_eq!(sprite.quad().top_left.color, [0, 0, 0, 0]);

        let mut straight = Sprite::new(texture().with_premultiplied_alpha(false), Rect::new(0.0, 0.0, 8.0, 8.0));
        straight.set_opacity(0);
        assert_eq!(straight.quad().top_left.color, [255, 255, 255, 0]);
    }

    #[test]
    fn test_animation_from_grid() {
        let animation = FrameAnimation::from_grid(Vec2::new(16.0, 16.0), 4, 3, 3, 0.1);
        assert_eq!(animation.frames[0], Rect::new(48.0, 0.0, 16.0, 16.0));
        assert_eq!(animation.frames[1], Rect::new(0.0, 16.0, 16.0, 16.0));
    }

    #[test]
    fn test_animation_advances_texture_rect() {
        let animation = FrameAnimation::from_grid(Vec2::new(16.0, 16.0), 4, 0, 2, 0.5);
        let mut sprite = Sprite::new(texture(), Rect::default()).with_animation(animation);
        assert_eq!(sprite.texture_rect(), Rect::new(0.0, 0.0, 16.0, 16.0));

        assert!(!sprite.update(0.25));
        assert!(sprite.update(0.25));
        assert_eq!(sprite.texture_rect(), Rect::new(16.0, 0.0, 16.0, 16.0));
        assert!(sprite.update(0.5));
        assert_eq!(sprite.texture_rect(), Rect::new(0.0, 0.0, 16.0, 16.0));
    }

    #[test]
    fn test_non_looping_animation_finishes() {
        let mut animation = FrameAnimation::from_grid(Vec2::new(8.0, 8.0), 2, 0, 2, 1.0).once();
        assert!(animation.update(1.0));
        assert!(!animation.update(1.0));
        assert!(animation.finished);
        assert_eq!(animation.current_frame, 1);
    }

    #[test]
    fn test_cleanup_cancels_animation() {
        let animation = FrameAnimation::from_grid(Vec2::new(8.0, 8.0), 2, 0, 2, 1.0);
        let mut sprite = Sprite::new(texture(), Rect::default()).with_animation(animation);
        sprite.cleanup();
        assert!(sprite.animation().is_none());
        assert!(!sprite.update(5.0));
    }
}
