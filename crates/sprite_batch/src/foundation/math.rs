//! Math utilities and types
//!
//! Provides the small set of 2D math types sprite geometry needs.

pub use nalgebra::{Rotation2, Vector2};
use serde::{Deserialize, Serialize};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Axis-aligned rectangle in pixel space, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub origin: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    /// Create a rectangle from its origin and size
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Left edge
    pub fn min_x(&self) -> f32 {
        self.origin.x
    }

    /// Right edge
    pub fn max_x(&self) -> f32 {
        self.origin.x + self.size.x
    }

    /// Top edge
    pub fn min_y(&self) -> f32 {
        self.origin.y
    }

    /// Bottom edge
    pub fn max_y(&self) -> f32 {
        self.origin.y + self.size.y
    }

    /// Whether the rectangle has no area
    pub fn is_empty(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }
}

/// Rotate `point` by `radians` around the origin
pub fn rotate(point: Vec2, radians: f32) -> Vec2 {
    Rotation2::new(radians) * point
}
