// Minimal 2D vector math for the XZ ground plane.

use serde::{Deserialize, Serialize};

/// A point or direction on the ground plane. `z` is the second horizontal
/// axis, not height; heights are carried separately where they matter.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub z: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, z: 0.0 };

    pub fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.z * self.z).sqrt()
    }

    pub fn distance_to(&self, other: Vec2) -> f32 {
        (*self - other).length()
    }

    /// Returns the zero vector for near-zero inputs rather than NaN.
    pub fn normalized(&self) -> Vec2 {
        let len = self.length();
        if len < 1e-6 {
            Vec2::ZERO
        } else {
            Vec2::new(self.x / len, self.z / len)
        }
    }

    pub fn scaled(&self, factor: f32) -> Vec2 {
        Vec2::new(self.x * factor, self.z * factor)
    }

    pub fn dot(&self, other: Vec2) -> f32 {
        self.x * other.x + self.z * other.z
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.z + rhs.z)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.z - rhs.z)
    }
}

/// Axis-aligned rectangle described by its center and full extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub width: f32,
    pub depth: f32,
}

impl Rect {
    pub fn new(center: Vec2, width: f32, depth: f32) -> Self {
        Self {
            center,
            width,
            depth,
        }
    }

    pub fn min_x(&self) -> f32 {
        self.center.x - self.width / 2.0
    }

    pub fn max_x(&self) -> f32 {
        self.center.x + self.width / 2.0
    }

    pub fn min_z(&self) -> f32 {
        self.center.z - self.depth / 2.0
    }

    pub fn max_z(&self) -> f32 {
        self.center.z + self.depth / 2.0
    }

    pub fn area(&self) -> f32 {
        self.width * self.depth
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min_x()
            && point.x <= self.max_x()
            && point.z >= self.min_z()
            && point.z <= self.max_z()
    }

    /// AABB overlap test with an optional padding margin around `self`.
    pub fn overlaps(&self, other: &Rect, margin: f32) -> bool {
        !(self.max_x() + margin <= other.min_x()
            || other.max_x() <= self.min_x() - margin
            || self.max_z() + margin <= other.min_z()
            || other.max_z() <= self.min_z() - margin)
    }

    /// Grows the rectangle by `amount` on every side.
    pub fn expanded(&self, amount: f32) -> Rect {
        Rect::new(
            self.center,
            self.width + amount * 2.0,
            self.depth + amount * 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_handles_zero_length() {
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
        let unit = Vec2::new(3.0, 4.0).normalized();
        assert!((unit.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rect_overlap_respects_margin() {
        let a = Rect::new(Vec2::ZERO, 2.0, 2.0);
        let b = Rect::new(Vec2::new(2.5, 0.0), 2.0, 2.0);
        assert!(!a.overlaps(&b, 0.0));
        assert!(a.overlaps(&b, 1.0));
    }
}
