// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plan space to scene space remapping
//!
//! Plan space is the game field: `x` to the right, `y` down the field, `z`
//! elevation, all in field units. Scene space is y-up and unit-centered:
//!
//! ```text
//! scene.x = plan.x / width - 0.5
//! scene.y = plan.z / width
//! scene.z = 0.5 - plan.y / height
//! ```
//!
//! Elevation shares the horizontal scale of the field width so walls keep
//! their proportions on square fields.

use crate::building::FieldSize;
use crate::mesh::Mesh;
use nalgebra::{Matrix3, Matrix4, Point2, Point3, Vector3};

/// Forward and inverse mapping between plan and scene coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    pub field: FieldSize,
}

impl CoordinateTransform {
    pub fn new(field: FieldSize) -> Self {
        Self { field }
    }

    /// Plan point `(x, y, elevation)` to scene point
    #[inline]
    pub fn forward(&self, p: &Point3<f64>) -> Point3<f64> {
        Point3::new(
            p.x / self.field.width - 0.5,
            p.z / self.field.width,
            0.5 - p.y / self.field.height,
        )
    }

    /// Scene point back to plan `(x, y, elevation)`
    #[inline]
    pub fn inverse(&self, s: &Point3<f64>) -> Point3<f64> {
        Point3::new(
            (s.x + 0.5) * self.field.width,
            (0.5 - s.z) * self.field.height,
            s.y * self.field.width,
        )
    }

    /// Ground position of a field cell: scene `(x, z)` for plan `(x, y)`
    #[inline]
    pub fn ground(&self, p: &Point2<f64>) -> Point2<f64> {
        Point2::new(p.x / self.field.width - 0.5, 0.5 - p.y / self.field.height)
    }

    /// Forward mapping as a homogeneous matrix
    #[rustfmt::skip]
    pub fn to_matrix(&self) -> Matrix4<f64> {
        let (w, h) = (self.field.width, self.field.height);
        Matrix4::new(
            1.0 / w, 0.0, 0.0, -0.5,
            0.0, 0.0, 1.0 / w, 0.0,
            0.0, -1.0 / h, 0.0, 0.5,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Map a plan-space mesh into scene space.
    ///
    /// Normals go through the inverse transpose of the linear part. Winding is
    /// flipped if the mapping ever mirrors, so faces keep pointing outward.
    pub fn apply_to_mesh(&self, mesh: &Mesh) -> Mesh {
        let mut out = mesh.clone();
        let matrix = self.to_matrix();

        out.positions.chunks_exact_mut(3).for_each(|chunk| {
            let point = Point3::new(chunk[0] as f64, chunk[1] as f64, chunk[2] as f64);
            let t = matrix.transform_point(&point);
            chunk[0] = t.x as f32;
            chunk[1] = t.y as f32;
            chunk[2] = t.z as f32;
        });

        let linear: Matrix3<f64> = matrix.fixed_view::<3, 3>(0, 0).into_owned();
        let normal_matrix = linear
            .try_inverse()
            .map(|inv| inv.transpose())
            .unwrap_or(linear);
        out.normals.chunks_exact_mut(3).for_each(|chunk| {
            let normal = Vector3::new(chunk[0] as f64, chunk[1] as f64, chunk[2] as f64);
            let t = (normal_matrix * normal)
                .try_normalize(1e-12)
                .unwrap_or_else(Vector3::zeros);
            chunk[0] = t.x as f32;
            chunk[1] = t.y as f32;
            chunk[2] = t.z as f32;
        });

        if linear.determinant() < 0.0 {
            out.flip_winding();
        }

        out
    }
}
