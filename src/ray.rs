//! Debug / Line-of-Sight Rays
//!
//! A ray is an origin/end point pair owned by an entity. Rays follow the
//! entity's transform (translate with it, rescale about its position) and
//! are re-expressed in screen space on demand for debug drawing.

use serde::{Serialize, Deserialize};
use crate::math::{segment_intersection, Vec2};

/// World-space line segment
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    origin: Vec2,
    end: Vec2,
}

impl Ray {
    pub fn new(origin: Vec2, end: Vec2) -> Self {
        Self { origin, end }
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn end(&self) -> Vec2 {
        self.end
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.origin += delta;
        self.end += delta;
    }

    /// Scale both endpoints about a pivot (the owning entity's position).
    pub fn rescale(&mut self, factor: Vec2, pivot: Vec2) {
        self.origin = pivot + (self.origin - pivot) * factor;
        self.end = pivot + (self.end - pivot) * factor;
    }

    /// Point where this ray crosses another, if they do.
    pub fn intersection(&self, other: &Ray) -> Option<Vec2> {
        segment_intersection(self.origin, self.end, other.origin, other.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_round_trip() {
        let original = Ray::new(Vec2::new(1.0, 1.0), Vec2::new(2.0, 3.0));
        let mut ray = original;

        let delta = Vec2::new(0.3, -0.7);
        ray.translate(delta);
        ray.translate(-delta);

        assert!((ray.origin().x - original.origin().x).abs() < 1e-6);
        assert!((ray.end().y - original.end().y).abs() < 1e-6);
    }

    #[test]
    fn test_rescale_about_pivot() {
        let mut ray = Ray::new(Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0));
        ray.rescale(Vec2::new(2.0, 2.0), Vec2::ZERO);

        assert_eq!(ray.origin(), Vec2::new(2.0, 0.0));
        assert_eq!(ray.end(), Vec2::new(4.0, 0.0));

        // Pivot point itself is a fixed point of the rescale
        let mut anchored = Ray::new(Vec2::new(1.0, 1.0), Vec2::new(3.0, 1.0));
        anchored.rescale(Vec2::new(0.5, 0.5), Vec2::new(1.0, 1.0));
        assert_eq!(anchored.origin(), Vec2::new(1.0, 1.0));
        assert_eq!(anchored.end(), Vec2::new(2.0, 1.0));
    }

    #[test]
    fn test_intersection() {
        let a = Ray::new(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0));
        let b = Ray::new(Vec2::new(-1.0, 1.0), Vec2::new(1.0, -1.0));
        let hit = a.intersection(&b).unwrap();
        assert!(hit.x.abs() < 1e-6);
        assert!(hit.y.abs() < 1e-6);

        let c = Ray::new(Vec2::new(5.0, 5.0), Vec2::new(6.0, 5.0));
        assert!(a.intersection(&c).is_none());
    }
}
