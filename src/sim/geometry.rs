//! Axis-aligned bounding boxes in world space
//!
//! World space has its origin at the top-left of the field, +x right, +y down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Box of the given size centered on `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size * 0.5,
            size,
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Shrink by `fraction` of the width on the left and right and by the
    /// same fraction of the height on the top and bottom
    pub fn shrunk(&self, fraction: f32) -> Self {
        let inset = self.size * fraction;
        Self {
            min: self.min + inset,
            size: (self.size - inset * 2.0).max(Vec2::ZERO),
        }
    }

    /// Strict overlap: touching edges do not count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x
            && a_max.x > other.min.x
            && self.min.y < b_max.y
            && a_max.y > other.min.y
    }

    /// Shared rectangle of two boxes, if they overlap
    pub fn intersection(&self, other: &Aabb) -> Option<Aabb> {
        let min = self.min.max(other.min);
        let max = self.max().min(other.max());
        let size = max - min;
        if size.x <= 0.0 || size.y <= 0.0 {
            return None;
        }
        Some(Aabb { min, size })
    }
}
