// Copyright 2026 the Scanwave Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View-frustum extraction and intersection tests.
//!
//! Planes are extracted from a combined view-projection matrix with the
//! Gribb–Hartmann method: each clip plane is a sum or difference of the
//! matrix's fourth row with one of the other rows. The resulting planes live
//! in whatever space the matrix maps *from* — pass a world-to-clip matrix and
//! the tests below operate directly on world coordinates.

use glam::{DMat4, DVec3, DVec4};

use scanwave_core::bounds::Aabb;

/// A view frustum as six inward-facing planes.
///
/// Each plane is stored as `(normal, d)` packed into a [`DVec4`], with
/// `normal · p + d >= 0` for points on the visible side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frustum {
    planes: [DVec4; 6],
}

impl Frustum {
    /// Extracts the six planes from a view-projection matrix.
    #[must_use]
    pub fn from_view_projection(view_proj: &DMat4) -> Self {
        // Transposing turns the columns glam stores into the rows the
        // extraction is defined over.
        let m = view_proj.transpose();
        let rows = [m.x_axis, m.y_axis, m.z_axis, m.w_axis];

        let planes = [
            normalize_plane(rows[3] + rows[0]), // left
            normalize_plane(rows[3] - rows[0]), // right
            normalize_plane(rows[3] + rows[1]), // bottom
            normalize_plane(rows[3] - rows[1]), // top
            normalize_plane(rows[3] + rows[2]), // near
            normalize_plane(rows[3] - rows[2]), // far
        ];
        Self { planes }
    }

    /// Returns `true` if `point` is inside or on the boundary of the frustum.
    #[must_use]
    pub fn contains_point(&self, point: DVec3) -> bool {
        self.planes
            .iter()
            .all(|plane| signed_distance(plane, point) >= 0.0)
    }

    /// Returns `true` if `aabb` is at least partially inside the frustum.
    ///
    /// Conservative positive-vertex test: for each plane, only the box corner
    /// farthest along the plane normal is checked, so boxes straddling a
    /// plane are kept.
    #[must_use]
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        self.planes.iter().all(|plane| {
            let positive_vertex = DVec3::new(
                if plane.x >= 0.0 { aabb.max.x } else { aabb.min.x },
                if plane.y >= 0.0 { aabb.max.y } else { aabb.min.y },
                if plane.z >= 0.0 { aabb.max.z } else { aabb.min.z },
            );
            signed_distance(plane, positive_vertex) >= 0.0
        })
    }
}

fn normalize_plane(plane: DVec4) -> DVec4 {
    let len = plane.truncate().length();
    if len > 0.0 { plane / len } else { plane }
}

fn signed_distance(plane: &DVec4, point: DVec3) -> f64 {
    plane.truncate().dot(point) + plane.w
}
