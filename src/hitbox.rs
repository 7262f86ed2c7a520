//! Hitbox Geometry
//!
//! Axis-aligned bounding rectangles for discrete per-tick overlap tests.
//! `position` is the min corner (the world is y-up); `size` is always
//! non-negative. A zero-size hitbox means the entity has disappeared and
//! collides with nothing.

use serde::{Serialize, Deserialize};
use crate::math::Vec2;

/// Axis-aligned bounding rectangle
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    position: Vec2,
    size: Vec2,
}

impl Hitbox {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self { position, size }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
    }

    /// A zero-extent hitbox collides with nothing (disappeared entity).
    pub fn is_empty(&self) -> bool {
        self.size.x == 0.0 || self.size.y == 0.0
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Multiply the extents by a per-axis factor. Position is untouched;
    /// the entity applies its own pivot logic to rays.
    pub fn rescale(&mut self, factor: Vec2) {
        self.size = self.size * factor;
    }

    pub fn overlaps(&self, other: &Hitbox) -> bool {
        let d = self.displacement_to_collision(other);
        d != Vec2::ZERO
    }

    /// Signed minimal separation vector against an overlapping hitbox.
    ///
    /// Each axis carries the overlap depth on that axis, signed so that
    /// adding the result to this hitbox's position separates the pair
    /// (positive when this box should move toward +axis). Zero when the
    /// rectangles do not overlap - callers pre-filter to overlapping pairs.
    pub fn displacement_to_collision(&self, other: &Hitbox) -> Vec2 {
        let overlap_x = (self.position.x + self.size.x).min(other.position.x + other.size.x)
            - self.position.x.max(other.position.x);
        let overlap_y = (self.position.y + self.size.y).min(other.position.y + other.size.y)
            - self.position.y.max(other.position.y);

        if overlap_x <= 0.0 || overlap_y <= 0.0 {
            return Vec2::ZERO;
        }

        let this_center = self.center();
        let other_center = other.center();

        let x = if this_center.x < other_center.x {
            -overlap_x
        } else {
            overlap_x
        };
        let y = if this_center.y < other_center.y {
            -overlap_y
        } else {
            overlap_y
        };

        Vec2::new(x, y)
    }
}
