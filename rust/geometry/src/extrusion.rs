// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extrusion of the annular floor profile into the building shell
//!
//! Plan space is z-up: the floor cap sits at `z = 0` and the roof cap at
//! `z = height`. Every face is wound counter-clockwise when seen from outside
//! the solid.

use crate::config::CapMode;
use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::profile::{AnnularProfile, Triangulation};
use crate::triangulation::signed_area;
use nalgebra::{Point2, Point3, Vector3};

/// Cap triangles with less area than this are dropped
const DEGENERATE_AREA: f64 = 1e-14;

/// Extrude the wall annulus from the floor up to `height`
pub fn extrude_annulus(profile: &AnnularProfile, height: f64, cap_mode: CapMode) -> Result<Mesh> {
    if !(height > 0.0) {
        return Err(Error::InvalidExtrusion(format!(
            "Height must be positive, got {}",
            height
        )));
    }

    let triangulation = profile.triangulate(cap_mode)?;

    let n = profile.len();
    let cap_vertices = triangulation.points.len() * 2;
    let side_vertices = n * 4 * 2;
    let mut mesh = Mesh::with_capacity(
        cap_vertices + side_vertices,
        triangulation.indices.len() * 2 + n * 6 * 2,
    );

    create_cap_mesh(&triangulation, 0.0, false, &mut mesh);
    create_cap_mesh(&triangulation, height, true, &mut mesh);

    // Outer faces look away from the building, inner faces look into it
    create_side_walls(&profile.outer, 0.0, height, true, &mut mesh);
    create_side_walls(&profile.inner, 0.0, height, false, &mut mesh);

    mesh.assign_uvs();

    tracing::debug!(
        corners = n,
        height,
        triangles = mesh.triangle_count(),
        ?cap_mode,
        "extruded shell"
    );

    Ok(mesh)
}

/// Create a cap mesh (floor or roof) from the triangulation
fn create_cap_mesh(triangulation: &Triangulation, z: f64, facing_up: bool, mesh: &mut Mesh) {
    let base_index = mesh.vertex_count() as u32;
    let normal = if facing_up { Vector3::z() } else { -Vector3::z() };

    for point in &triangulation.points {
        mesh.add_vertex(Point3::new(point.x, point.y, z), normal);
    }

    for tri in triangulation.indices.chunks_exact(3) {
        let area = signed_area(&[
            triangulation.points[tri[0]],
            triangulation.points[tri[1]],
            triangulation.points[tri[2]],
        ]);
        if area.abs() < DEGENERATE_AREA {
            continue;
        }

        let (i0, i1, i2) = (
            base_index + tri[0] as u32,
            base_index + tri[1] as u32,
            base_index + tri[2] as u32,
        );

        // Counter-clockwise from above faces up
        if (area > 0.0) == facing_up {
            mesh.add_triangle(i0, i1, i2);
        } else {
            mesh.add_triangle(i0, i2, i1);
        }
    }
}

/// Create vertical quads along a counter-clockwise ring between `z0` and `z1`.
///
/// `facing_out` selects the right-hand side of each edge (away from the ring's
/// interior); otherwise the quads face into the ring.
pub fn create_side_walls(
    ring: &[Point2<f64>],
    z0: f64,
    z1: f64,
    facing_out: bool,
    mesh: &mut Mesh,
) {
    for i in 0..ring.len() {
        let p0 = &ring[i];
        let p1 = &ring[(i + 1) % ring.len()];

        let edge = Vector3::new(p1.x - p0.x, p1.y - p0.y, 0.0);
        let outward = Vector3::new(edge.y, -edge.x, 0.0);
        let normal = match outward.try_normalize(1e-10) {
            Some(n) if facing_out => n,
            Some(n) => -n,
            None => continue, // duplicate consecutive corners
        };

        let idx = mesh.vertex_count() as u32;
        mesh.add_vertex(Point3::new(p0.x, p0.y, z0), normal);
        mesh.add_vertex(Point3::new(p1.x, p1.y, z0), normal);
        mesh.add_vertex(Point3::new(p1.x, p1.y, z1), normal);
        mesh.add_vertex(Point3::new(p0.x, p0.y, z1), normal);

        if facing_out {
            mesh.add_triangle(idx, idx + 1, idx + 2);
            mesh.add_triangle(idx, idx + 2, idx + 3);
        } else {
            mesh.add_triangle(idx, idx + 2, idx + 1);
            mesh.add_triangle(idx, idx + 3, idx + 2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offset::miter_offset;
    use approx::assert_relative_eq;

    fn square_profile(size: f64, thickness: f64) -> AnnularProfile {
        let inner = vec![
            Point2::new(0.0, 0.0),
            Point2::new(size, 0.0),
            Point2::new(size, size),
            Point2::new(0.0, size),
        ];
        let outer = miter_offset(&inner, thickness, 1e-6).unwrap();
        AnnularProfile::new(outer, inner).unwrap()
    }

    /// Every face normal computed from the winding points away from the solid
    fn assert_outward(mesh: &Mesh, center: Point3<f64>) {
        for [a, b, c] in mesh.triangles() {
            let normal = (b - a).cross(&(c - a));
            let centroid = Point3::from((a.coords + b.coords + c.coords) / 3.0);
            let to_face = centroid - center;
            if normal.z.abs() > 0.5 * normal.norm() {
                // caps: floor down, roof up
                assert_eq!(normal.z > 0.0, centroid.z > center.z);
            } else {
                // courtyard-shaped solid: outer faces point away, inner faces toward the center
                let horizontal = Vector3::new(to_face.x, to_face.y, 0.0);
                let outer_face = horizontal.norm() > 5.5;
                assert_eq!(normal.dot(&horizontal) > 0.0, outer_face);
            }
        }
    }

    #[test]
    fn test_extrude_shell_bounds() {
        let profile = square_profile(10.0, 1.0);
        let mesh = extrude_annulus(&profile, 3.0, CapMode::Earcut).unwrap();

        let (min, max) = mesh.bounds();
        assert_relative_eq!(min.x, -1.0);
        assert_relative_eq!(max.x, 11.0);
        assert_relative_eq!(min.z, 0.0);
        assert_relative_eq!(max.z, 3.0);
    }

    #[test]
    fn test_extrude_shell_volume() {
        let profile = square_profile(10.0, 1.0);
        for mode in [CapMode::Earcut, CapMode::Stitched] {
            let mesh = extrude_annulus(&profile, 3.0, mode).unwrap();
            assert_relative_eq!(mesh.volume(), 44.0 * 3.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_extrude_faces_wind_outward() {
        let profile = square_profile(10.0, 1.0);
        let mesh = extrude_annulus(&profile, 3.0, CapMode::Earcut).unwrap();
        assert_outward(&mesh, Point3::new(5.0, 5.0, 1.5));
    }

    #[test]
    fn test_extrude_buffers_are_consistent() {
        let profile = square_profile(4.0, 0.5);
        let mesh = extrude_annulus(&profile, 2.0, CapMode::Stitched).unwrap();

        assert_eq!(mesh.positions.len(), mesh.normals.len());
        assert_eq!(mesh.uvs.len() / 2, mesh.vertex_count());
        // 2 caps x 8 triangles + 2 rings x 4 edges x 2 triangles
        assert_eq!(mesh.triangle_count(), 16 + 16);
    }

    #[test]
    fn test_invalid_height() {
        let profile = square_profile(10.0, 1.0);
        assert!(matches!(
            extrude_annulus(&profile, 0.0, CapMode::Earcut),
            Err(Error::InvalidExtrusion(_))
        ));
        assert!(extrude_annulus(&profile, -1.0, CapMode::Earcut).is_err());
    }
}
