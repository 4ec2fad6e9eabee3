// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Free-standing interior walls
//!
//! A partition is a box slab around the segment `start → end`. Its eight
//! corners come from two face loops (front and back, each `thickness / 2` off
//! the centerline). The six faces are recovered from the corners themselves:
//! a face is the four corners sharing one local coordinate, and the corners
//! are chained around it by connecting those that agree on two of the three
//! local coordinates.

use crate::building::PlanVector;
use crate::error::{Error, Result};
use crate::mesh::{Mesh, MeshAssembly, SubMeshKind, SubMeshRange};
use nalgebra::{Point3, Vector2, Vector3};
use smallvec::SmallVec;

/// Partitions shorter than this are rejected
const MIN_PARTITION_LENGTH: f64 = 1e-9;

/// Corner position in the partition frame: (along, across, up)
type Local = [f64; 3];

/// Build the box mesh for a single interior wall.
///
/// `index` is only used to label errors.
pub fn partition_mesh(
    index: usize,
    segment: &[PlanVector; 2],
    thickness: f64,
    height: f64,
) -> Result<Mesh> {
    let [start, end] = segment;
    let delta = Vector2::new(end.x - start.x, end.y - start.y);
    let length = delta.norm();
    if !(length >= MIN_PARTITION_LENGTH) {
        return Err(Error::InvalidPartition {
            index,
            reason: format!("segment length {} is zero", length),
        });
    }
    if !(thickness > 0.0 && height > 0.0) {
        return Err(Error::InvalidPartition {
            index,
            reason: format!("thickness {} and height {} must be positive", thickness, height),
        });
    }

    let along = delta / length;
    let across = Vector2::new(-along.y, along.x);
    let half = thickness / 2.0;

    // Front and back loops: base-near, base-far, top-far, top-near
    let loop_at = |offset: f64| -> [Local; 4] {
        [
            [0.0, offset, 0.0],
            [length, offset, 0.0],
            [length, offset, height],
            [0.0, offset, height],
        ]
    };
    let corners: SmallVec<[Local; 8]> = loop_at(-half).into_iter().chain(loop_at(half)).collect();

    let to_world = |l: &Local| -> Point3<f64> {
        let p = Vector2::new(start.x, start.y) + along * l[0] + across * l[1];
        Point3::new(p.x, p.y, start.z + l[2])
    };
    let center = to_world(&[length / 2.0, 0.0, height / 2.0]);

    let mut mesh = Mesh::with_capacity(24, 36);
    for axis in 0..3 {
        for extreme in [min_on(&corners, axis), max_on(&corners, axis)] {
            let face: SmallVec<[Local; 4]> = corners
                .iter()
                .filter(|c| c[axis] == extreme)
                .copied()
                .collect();

            let mut ring: SmallVec<[Point3<f64>; 4]> = chain_by_adjacency(&face).iter().map(to_world).collect();
            if ring.len() != 4 {
                return Err(Error::InvalidPartition {
                    index,
                    reason: format!("face on axis {} has {} corners", axis, ring.len()),
                });
            }

            let mut normal = (ring[1] - ring[0]).cross(&(ring[2] - ring[0]));
            let centroid = Point3::from(ring.iter().map(|p| p.coords).sum::<Vector3<f64>>() / 4.0);
            if normal.dot(&(centroid - center)) < 0.0 {
                ring.reverse();
                normal = -normal;
            }
            let normal = normal.try_normalize(1e-12).unwrap_or_else(Vector3::zeros);

            let base = mesh.vertex_count() as u32;
            for p in &ring {
                mesh.add_vertex(*p, normal);
            }
            mesh.add_triangle(base, base + 1, base + 2);
            mesh.add_triangle(base, base + 2, base + 3);
        }
    }

    mesh.assign_uvs();

    tracing::debug!(
        partition = index,
        length,
        triangles = mesh.triangle_count(),
        "built interior wall"
    );

    Ok(mesh)
}

/// Build every interior wall and merge them into one buffer set.
///
/// The returned ranges locate each partition in the merged buffers.
pub fn assemble_partitions(
    segments: &[[PlanVector; 2]],
    thickness: f64,
    height: f64,
) -> Result<(Mesh, Vec<SubMeshRange>)> {
    let mut assembly = MeshAssembly::new();
    for (index, segment) in segments.iter().enumerate() {
        assembly.add(SubMeshKind::Partition(index), partition_mesh(index, segment, thickness, height)?);
    }
    Ok(assembly.combine())
}

fn min_on(corners: &[Local], axis: usize) -> f64 {
    corners.iter().map(|c| c[axis]).fold(f64::INFINITY, f64::min)
}

fn max_on(corners: &[Local], axis: usize) -> f64 {
    corners.iter().map(|c| c[axis]).fold(f64::NEG_INFINITY, f64::max)
}

/// Two corners are neighbours when they agree on exactly two coordinates
#[inline]
fn adjacent(a: &Local, b: &Local) -> bool {
    (0..3).filter(|&k| a[k] == b[k]).count() == 2
}

/// Order the corners of a quad face into a closed loop
fn chain_by_adjacency(face: &[Local]) -> SmallVec<[Local; 4]> {
    let mut ring: SmallVec<[Local; 4]> = SmallVec::new();
    let Some(&first) = face.first() else {
        return ring;
    };
    ring.push(first);

    while ring.len() < face.len() {
        let last = ring[ring.len() - 1];
        match face
            .iter()
            .find(|c| adjacent(&last, c) && !ring.contains(c))
        {
            Some(&next) => ring.push(next),
            None => break,
        }
    }
    ring
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn segment(x0: f64, y0: f64, x1: f64, y1: f64) -> [PlanVector; 2] {
        [PlanVector::new(x0, y0), PlanVector::new(x1, y1)]
    }

    #[test]
    fn test_partition_is_closed_box() {
        let mesh = partition_mesh(0, &segment(1.0, 2.0, 5.0, 5.0), 0.2, 3.0).unwrap();
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.vertex_count(), 24);
        // length 5
        assert_relative_eq!(mesh.volume(), 5.0 * 0.2 * 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_partition_faces_wind_outward() {
        let mesh = partition_mesh(0, &segment(0.0, 0.0, 4.0, 0.0), 0.4, 2.0).unwrap();
        let center = Point3::new(2.0, 0.0, 1.0);
        for [a, b, c] in mesh.triangles() {
            let normal = (b - a).cross(&(c - a));
            let centroid = Point3::from((a.coords + b.coords + c.coords) / 3.0);
            assert!(normal.dot(&(centroid - center)) > 0.0);
        }

        let (min, max) = mesh.bounds();
        assert_relative_eq!(min.y, -0.2, epsilon = 1e-6);
        assert_relative_eq!(max.y, 0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_partition_base_follows_start_elevation() {
        let seg = [PlanVector::with_elevation(0.0, 0.0, 1.5), PlanVector::new(0.0, 3.0)];
        let mesh = partition_mesh(0, &seg, 0.2, 2.0).unwrap();
        let (min, max) = mesh.bounds();
        assert_relative_eq!(min.z, 1.5, epsilon = 1e-6);
        assert_relative_eq!(max.z, 3.5, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_length_partition() {
        let result = partition_mesh(3, &segment(1.0, 1.0, 1.0, 1.0), 0.2, 3.0);
        assert!(matches!(result, Err(Error::InvalidPartition { index: 3, .. })));
    }

    #[test]
    fn test_assemble_rebases_indices() {
        let segments = vec![segment(0.0, 0.0, 2.0, 0.0), segment(0.0, 5.0, 0.0, 8.0)];
        let (mesh, ranges) = assemble_partitions(&segments, 0.2, 3.0).unwrap();

        assert_eq!(mesh.triangle_count(), 24);
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[1].vertex_offset, 24);
        let second = &mesh.indices[ranges[1].index_offset as usize..];
        assert!(second.iter().all(|&i| (24..48).contains(&i)));
        assert_relative_eq!(mesh.volume(), (2.0 + 3.0) * 0.2 * 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_chain_by_adjacency_walks_the_rim() {
        let face = [[0.0, 0.0, 0.0], [1.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
        let ring = chain_by_adjacency(&face);
        assert_eq!(ring.len(), 4);
        for i in 0..4 {
            assert!(adjacent(&ring[i], &ring[(i + 1) % 4]));
        }
    }
}
