//! 2D vector math for the simulation core
//!
//! Everything here is a plain value type. The simulation world is y-up
//! (gravity points in negative y).

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};
use serde::{Serialize, Deserialize};

/// 2D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const ONE: Vec2 = Vec2 { x: 1.0, y: 1.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// 2D cross product (z component of the 3D cross product).
    pub fn cross(self, other: Vec2) -> f32 {
        self.x * other.y - self.y * other.x
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, other: Vec2) {
        *self = *self + other;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, other: Vec2) {
        *self = *self - other;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, s: f32) -> Vec2 {
        Vec2 {
            x: self.x * s,
            y: self.y * s,
        }
    }
}

/// Component-wise product (used for per-axis coefficients like friction).
impl Mul for Vec2 {
    type Output = Vec2;
    fn mul(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x * other.x,
            y: self.y * other.y,
        }
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;
    fn div(self, s: f32) -> Vec2 {
        Vec2 {
            x: self.x / s,
            y: self.y / s,
        }
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2 {
            x: -self.x,
            y: -self.y,
        }
    }
}

/// Linear interpolation between two scalars.
pub fn lerp(x0: f32, x1: f32, alpha: f32) -> f32 {
    x0 + (x1 - x0) * alpha
}

/// Linear interpolation between two points.
pub fn lerp_vec(p0: Vec2, p1: Vec2, alpha: f32) -> Vec2 {
    p0 + (p1 - p0) * alpha
}

/// Intersection point of two closed line segments, if they cross.
///
/// Collinear overlap returns `None` - the debug rays this serves only care
/// about transversal hits.
///
/// Algorithm from https://stackoverflow.com/a/565282/12557703
pub fn segment_intersection(l1p1: Vec2, l1p2: Vec2, l2p1: Vec2, l2p2: Vec2) -> Option<Vec2> {
    let r = l1p2 - l1p1;
    let s = l2p2 - l2p1;
    let rxs = r.cross(s);

    if rxs == 0.0 {
        return None;
    }

    let qp = l2p1 - l1p1;
    let t = qp.cross(s) / rxs;
    let u = qp.cross(r) / rxs;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(l1p1 + r * t)
    } else {
        None
    }
}
