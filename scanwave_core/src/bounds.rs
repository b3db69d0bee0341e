// Copyright 2026 the Scanwave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned render bounds.
//!
//! Results that carry an [`Aabb`] are frustum-culled against it each frame;
//! results without bounds are treated as always visible.

use glam::DVec3;

/// An axis-aligned bounding box in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: DVec3,
    /// Maximum corner.
    pub max: DVec3,
}

impl Aabb {
    /// Creates a box from two corners, normalizing so that `min <= max` on
    /// every axis.
    #[inline]
    #[must_use]
    pub fn new(a: DVec3, b: DVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates a box centered on `center` extending `half_extent` on each axis.
    #[inline]
    #[must_use]
    pub fn from_center_half_extent(center: DVec3, half_extent: f64) -> Self {
        let h = DVec3::splat(half_extent.abs());
        Self {
            min: center - h,
            max: center + h,
        }
    }

    /// Returns the center point of the box.
    #[inline]
    #[must_use]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Returns `true` if `point` lies inside or on the boundary of the box.
    #[inline]
    #[must_use]
    pub fn contains(&self, point: DVec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes_corners() {
        let b = Aabb::new(DVec3::new(1.0, -2.0, 3.0), DVec3::new(-1.0, 2.0, 0.0));
        assert_eq!(b.min, DVec3::new(-1.0, -2.0, 0.0));
        assert_eq!(b.max, DVec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn contains_boundary_and_interior() {
        let b = Aabb::from_center_half_extent(DVec3::ZERO, 1.0);
        assert!(b.contains(DVec3::ZERO));
        assert!(b.contains(DVec3::splat(1.0)), "boundary counts as inside");
        assert!(!b.contains(DVec3::new(1.1, 0.0, 0.0)));
    }

    #[test]
    fn center_of_offset_box() {
        let b = Aabb::from_center_half_extent(DVec3::new(4.0, 5.0, 6.0), 2.0);
        assert_eq!(b.center(), DVec3::new(4.0, 5.0, 6.0));
    }
}
