// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon triangulation utilities
//!
//! Thin layer over earcutr plus the planar helpers the CSG conversion needs.

use crate::{Error, Point2, Point3, Result, Vector3};

/// Signed area of a ring (shoelace). Positive for counter-clockwise.
#[inline]
pub fn signed_area(ring: &[Point2<f64>]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..n {
        let p = &ring[i];
        let q = &ring[(i + 1) % n];
        area += p.x * q.y - q.x * p.y;
    }
    area * 0.5
}

/// Triangulate a simple polygon (no holes)
/// Returns triangle indices into the input points
#[inline]
pub fn triangulate_polygon(points: &[Point2<f64>]) -> Result<Vec<usize>> {
    triangulate_polygon_with_holes(points, &[])
}

/// Triangulate a polygon with holes
///
/// Returns triangle indices into the concatenation `outer ++ holes[0] ++ holes[1] ...`.
/// Output winding is whatever earcut produces; callers orient triangles themselves.
pub fn triangulate_polygon_with_holes(
    outer: &[Point2<f64>],
    holes: &[Vec<Point2<f64>>],
) -> Result<Vec<usize>> {
    if outer.len() < 3 {
        return Err(Error::TriangulationError(
            "Need at least 3 points in outer boundary".to_string(),
        ));
    }

    // Triangle needs no ear clipping
    if outer.len() == 3 && holes.is_empty() {
        return Ok(vec![0, 1, 2]);
    }

    if let Some(bad) = holes.iter().position(|h| h.len() < 3) {
        return Err(Error::TriangulationError(format!(
            "Hole {} has fewer than 3 points",
            bad
        )));
    }

    let total_points = outer.len() + holes.iter().map(|h| h.len()).sum::<usize>();
    let mut vertices = Vec::with_capacity(total_points * 2);
    for p in outer {
        vertices.push(p.x);
        vertices.push(p.y);
    }

    let mut hole_indices = Vec::with_capacity(holes.len());
    for hole in holes {
        hole_indices.push(vertices.len() / 2);
        for p in hole {
            vertices.push(p.x);
            vertices.push(p.y);
        }
    }

    let indices = earcutr::earcut(&vertices, &hole_indices, 2)
        .map_err(|e| Error::TriangulationError(format!("{:?}", e)))?;

    if indices.is_empty() {
        return Err(Error::TriangulationError(
            "Earcut produced no triangles (self-intersecting or collapsed ring?)".to_string(),
        ));
    }

    Ok(indices)
}

/// Project 3D points onto a 2D plane defined by a normal
/// Returns 2D points and the coordinate system (u_axis, v_axis, origin)
pub fn project_to_2d(
    points_3d: &[Point3<f64>],
    normal: &Vector3<f64>,
) -> (Vec<Point2<f64>>, Vector3<f64>, Vector3<f64>, Point3<f64>) {
    let Some(&origin) = points_3d.first() else {
        return (
            Vec::new(),
            Vector3::zeros(),
            Vector3::zeros(),
            Point3::origin(),
        );
    };

    // Reference axis least parallel to the normal keeps the cross product stable
    let (ax, ay, az) = (normal.x.abs(), normal.y.abs(), normal.z.abs());
    let reference = if ax <= ay && ax <= az {
        Vector3::x()
    } else if ay <= az {
        Vector3::y()
    } else {
        Vector3::z()
    };

    let u_axis = normal.cross(&reference).normalize();
    let v_axis = normal.cross(&u_axis).normalize();

    let points_2d = points_3d
        .iter()
        .map(|p| {
            let v = p - origin;
            Point2::new(v.dot(&u_axis), v.dot(&v_axis))
        })
        .collect();

    (points_2d, u_axis, v_axis, origin)
}

/// Newell normal of a planar polygon, `+Z` when degenerate
pub fn calculate_polygon_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let n = points.len();
    if n < 3 {
        return Vector3::z();
    }

    let mut normal = Vector3::<f64>::zeros();
    for i in 0..n {
        let current = &points[i];
        let next = &points[(i + 1) % n];

        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }

    normal.try_normalize(1e-10).unwrap_or_else(Vector3::z)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(min: f64, max: f64) -> Vec<Point2<f64>> {
        vec![
            Point2::new(min, min),
            Point2::new(max, min),
            Point2::new(max, max),
            Point2::new(min, max),
        ]
    }

    #[test]
    fn test_signed_area_orientation() {
        let ccw = square(0.0, 2.0);
        assert!((signed_area(&ccw) - 4.0).abs() < 1e-12);

        let cw: Vec<_> = ccw.iter().rev().cloned().collect();
        assert!((signed_area(&cw) + 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_triangulate_square() {
        let indices = triangulate_polygon(&square(0.0, 1.0)).unwrap();
        assert_eq!(indices.len(), 6);
    }

    #[test]
    fn test_triangulate_insufficient_points() {
        let points = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        assert!(triangulate_polygon(&points).is_err());
    }

    #[test]
    fn test_triangulate_annulus_covers_ring_area() {
        let outer = square(-1.0, 11.0);
        let hole = square(0.0, 10.0);
        let indices = triangulate_polygon_with_holes(&outer, &[hole.clone()]).unwrap();
        assert_eq!(indices.len() % 3, 0);

        let all: Vec<Point2<f64>> = outer.iter().chain(hole.iter()).cloned().collect();
        let covered: f64 = indices
            .chunks_exact(3)
            .map(|t| signed_area(&[all[t[0]], all[t[1]], all[t[2]]]).abs())
            .sum();
        assert!((covered - (144.0 - 100.0)).abs() < 1e-9);
    }

    #[test]
    fn test_calculate_polygon_normal() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let normal = calculate_polygon_normal(&points);
        assert!((normal.z - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_project_to_2d_preserves_distances() {
        let points = vec![
            Point3::new(0.0, 0.0, 5.0),
            Point3::new(3.0, 0.0, 5.0),
            Point3::new(3.0, 4.0, 5.0),
        ];
        let (projected, _, _, _) = project_to_2d(&points, &Vector3::z());
        assert_eq!(projected.len(), 3);
        assert!(((projected[2] - projected[0]).norm() - 5.0).abs() < 1e-9);
    }
}
