//! Axis-aligned bounding boxes
//!
//! Every collider in the simulation (tiles and entity bounds) is an AABB:
//! - min: lower-left corner (world units, y up)
//! - max: upper-right corner

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::COLLISION_EPSILON;

/// An axis-aligned rectangle in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Box centred on `center` extending `half_extents` on each side
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// Overlap depth on each axis (negative components mean a gap)
    #[inline]
    pub fn penetration(&self, other: &Aabb) -> Vec2 {
        self.max.min(other.max) - self.min.max(other.min)
    }

    /// True when the boxes interpenetrate on both axes.
    ///
    /// Faces that merely touch (or overlap by less than
    /// [`COLLISION_EPSILON`]) do not count, so an entity resting on a floor
    /// is not reported as overlapping it.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let p = self.penetration(other);
        p.x > COLLISION_EPSILON && p.y > COLLISION_EPSILON
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Euclidean distance from `point` to the nearest point of the box (0 inside)
    pub fn distance_to_point(&self, point: Vec2) -> f32 {
        let nearest = point.clamp(self.min, self.max);
        (point - nearest).length()
    }
}
