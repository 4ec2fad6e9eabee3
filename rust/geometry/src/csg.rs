// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boolean subtraction of cutter volumes from the building shell
//!
//! The heavy lifting is done by csgrs (BSP-tree CSG). This module converts
//! between our flat buffers and csgrs polygons and builds the box-shaped
//! cutter solids.

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use crate::triangulation::{calculate_polygon_normal, project_to_2d, signed_area, triangulate_polygon};
use nalgebra::{Matrix3, Point3, Vector3};
use smallvec::SmallVec;

/// Boolean subtraction against csgrs
#[derive(Debug, Clone, Copy)]
pub struct ClippingProcessor {
    /// Triangles with a cross product shorter than this are skipped on import
    pub epsilon: f64,
}

impl ClippingProcessor {
    /// Create a new clipping processor
    pub fn new() -> Self {
        Self { epsilon: 1e-10 }
    }

    /// Subtract `cutter` from `host`.
    ///
    /// An empty cutter returns the host unchanged. The result has fresh face
    /// normals but no UVs assigned beyond the default origin.
    pub fn subtract_mesh(&self, host: &Mesh, cutter: &Mesh) -> Result<Mesh> {
        use csgrs::traits::CSG;

        if cutter.is_empty() {
            return Ok(host.clone());
        }

        let host_csg = self.mesh_to_csgrs(host);
        let cutter_csg = self.mesh_to_csgrs(cutter);

        let result_csg = host_csg.difference(&cutter_csg);

        let mut result = self.csgrs_to_mesh(&result_csg);
        if result.is_empty() && !host.is_empty() {
            return Err(Error::CsgError(format!(
                "subtraction removed the whole host ({} triangles)",
                host.triangle_count()
            )));
        }

        result.recompute_normals();
        Ok(result)
    }

    /// Flat buffers to csgrs triangles, one polygon per non-degenerate triangle
    fn mesh_to_csgrs(&self, mesh: &Mesh) -> csgrs::mesh::Mesh<()> {
        use csgrs::mesh::{polygon::Polygon, vertex::Vertex, Mesh as CSGMesh};
        use std::sync::OnceLock;

        if mesh.is_empty() {
            return CSGMesh {
                polygons: Vec::new(),
                bounding_box: OnceLock::new(),
                metadata: None,
            };
        }

        let polygons: Vec<Polygon<()>> = mesh
            .triangles()
            .filter_map(|[v0, v1, v2]| {
                let face_normal = (v1 - v0).cross(&(v2 - v0)).try_normalize(self.epsilon)?;
                let vertices = vec![
                    Vertex::new(v0, face_normal),
                    Vertex::new(v1, face_normal),
                    Vertex::new(v2, face_normal),
                ];
                Some(Polygon::new(vertices, None))
            })
            .collect();

        CSGMesh::from_polygons(&polygons, None)
    }

    /// csgrs polygons back to flat buffers.
    ///
    /// Polygons are triangulated by earcut in their own plane; each emitted
    /// triangle is checked against the polygon normal so the winding survives
    /// whatever orientation the triangulator picked.
    fn csgrs_to_mesh(&self, csg_mesh: &csgrs::mesh::Mesh<()>) -> Mesh {
        let mut mesh = Mesh::new();

        for polygon in &csg_mesh.polygons {
            let vertices = &polygon.vertices;
            if vertices.len() < 3 {
                continue;
            }

            let points: SmallVec<[Point3<f64>; 8]> = vertices
                .iter()
                .map(|v| Point3::new(v.pos[0], v.pos[1], v.pos[2]))
                .collect();

            // Vertex order is authoritative; csgrs flips it for inverted faces
            let normal = calculate_polygon_normal(&points);

            let base = mesh.vertex_count() as u32;
            for p in &points {
                mesh.add_vertex(*p, normal);
            }

            if points.len() == 3 {
                mesh.add_triangle(base, base + 1, base + 2);
                continue;
            }

            let (points_2d, _, _, _) = project_to_2d(&points, &normal);
            let indices = match triangulate_polygon(&points_2d) {
                Ok(indices) => indices,
                Err(e) => {
                    tracing::trace!(vertices = points.len(), error = %e, "skipping degenerate CSG polygon");
                    continue;
                }
            };

            for tri in indices.chunks_exact(3) {
                let area = signed_area(&[points_2d[tri[0]], points_2d[tri[1]], points_2d[tri[2]]]);
                let (a, b, c) = (base + tri[0] as u32, base + tri[1] as u32, base + tri[2] as u32);
                if area >= 0.0 {
                    mesh.add_triangle(a, b, c);
                } else {
                    mesh.add_triangle(a, c, b);
                }
            }
        }

        mesh
    }
}

impl Default for ClippingProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Closed box spanned by three edge vectors from `origin`.
///
/// The box covers `origin + a·axes[0] + b·axes[1] + c·axes[2]` for
/// `a, b, c ∈ [0, 1]`. Faces wind outward regardless of the handedness of
/// `axes`; each face gets its own four vertices and flat normal.
pub fn oriented_box(origin: Point3<f64>, axes: [Vector3<f64>; 3]) -> Mesh {
    let corner = |bits: [f64; 3]| origin + axes[0] * bits[0] + axes[1] * bits[1] + axes[2] * bits[2];
    let left_handed = Matrix3::from_columns(&axes).determinant() < 0.0;

    let mut mesh = Mesh::with_capacity(24, 36);
    for k in 0..3 {
        let (i, j) = ((k + 1) % 3, (k + 2) % 3);
        for side in [0.0, 1.0] {
            let mut quad = [[0.0; 3]; 4];
            for (q, (a, b)) in quad.iter_mut().zip([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]) {
                q[k] = side;
                q[i] = a;
                q[j] = b;
            }
            let mut face = quad.map(&corner);
            // axes[i] x axes[j] points along +axes[k] for right-handed axes
            if (side == 0.0) != left_handed {
                face.reverse();
            }

            let normal = (face[1] - face[0])
                .cross(&(face[2] - face[0]))
                .try_normalize(1e-12)
                .unwrap_or_else(Vector3::zeros);
            let base = mesh.vertex_count() as u32;
            for p in face {
                mesh.add_vertex(p, normal);
            }
            mesh.add_triangle(base, base + 1, base + 2);
            mesh.add_triangle(base, base + 2, base + 3);
        }
    }
    mesh
}

/// Axis-aligned box between two corners
pub fn aabb_to_mesh(min: Point3<f64>, max: Point3<f64>) -> Mesh {
    let size = max - min;
    oriented_box(
        min,
        [
            Vector3::new(size.x, 0.0, 0.0),
            Vector3::new(0.0, size.y, 0.0),
            Vector3::new(0.0, 0.0, size.z),
        ],
    )
}
