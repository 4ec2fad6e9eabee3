// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Annular floor profile (outer wall boundary around an inner hole) and its
//! cap triangulation

use crate::config::CapMode;
use crate::error::{Error, Result};
use crate::triangulation::{signed_area, triangulate_polygon_with_holes};
use nalgebra::Point2;

/// Ring between the outer and inner wall boundaries.
///
/// Both rings hold the same number of corners and corner `i` of one ring
/// corresponds to corner `i` of the other.
#[derive(Debug, Clone)]
pub struct AnnularProfile {
    /// Outer boundary (counter-clockwise)
    pub outer: Vec<Point2<f64>>,
    /// Inner boundary, the excluded hole (counter-clockwise)
    pub inner: Vec<Point2<f64>>,
}

impl AnnularProfile {
    /// Create a profile from paired rings, normalizing both to counter-clockwise
    pub fn new(mut outer: Vec<Point2<f64>>, mut inner: Vec<Point2<f64>>) -> Result<Self> {
        if inner.len() < 3 {
            return Err(Error::InvalidPlan(format!(
                "a closed wall loop needs at least 3 corners, got {}",
                inner.len()
            )));
        }
        if outer.len() != inner.len() {
            return Err(Error::InvalidPlan(format!(
                "outer ring has {} corners but inner ring has {}",
                outer.len(),
                inner.len()
            )));
        }

        if signed_area(&inner) < 0.0 {
            inner.reverse();
            outer.reverse();
        }

        Ok(Self { outer, inner })
    }

    /// Number of corners per ring
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Area covered by the walls (outer area minus hole area)
    pub fn area(&self) -> f64 {
        signed_area(&self.outer).abs() - signed_area(&self.inner).abs()
    }

    /// Triangulate the annulus for floor and roof caps
    pub fn triangulate(&self, mode: CapMode) -> Result<Triangulation> {
        let points: Vec<Point2<f64>> = self.outer.iter().chain(self.inner.iter()).cloned().collect();

        let indices = match mode {
            CapMode::Earcut => triangulate_polygon_with_holes(&self.outer, &[self.inner.clone()])?,
            CapMode::Stitched => stitch_rings(self.len()),
        };

        Ok(Triangulation { points, indices })
    }
}

/// Two triangles per edge between outer corner `i` and inner corner `n + i`
fn stitch_rings(n: usize) -> Vec<usize> {
    let mut indices = Vec::with_capacity(n * 6);
    for i in 0..n {
        let j = (i + 1) % n;
        let (o0, o1) = (i, j);
        let (c0, c1) = (n + i, n + j);

        indices.extend_from_slice(&[o0, o1, c1]);
        indices.extend_from_slice(&[o0, c1, c0]);
    }
    indices
}

/// Triangulated profile result
#[derive(Debug, Clone)]
pub struct Triangulation {
    /// All vertices (outer ring then inner ring)
    pub points: Vec<Point2<f64>>,
    /// Triangle indices
    pub indices: Vec<usize>,
}

impl Triangulation {
    /// Total unsigned area of all triangles
    pub fn area(&self) -> f64 {
        self.indices
            .chunks_exact(3)
            .map(|t| signed_area(&[self.points[t[0]], self.points[t[1]], self.points[t[2]]]).abs())
            .sum()
    }
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
    fn test_new_normalizes_clockwise_rings() {
        let mut inner = square(0.0, 10.0);
        let mut outer = square(-1.0, 11.0);
        inner.reverse();
        outer.reverse();

        let profile = AnnularProfile::new(outer, inner).unwrap();
        assert!(signed_area(&profile.inner) > 0.0);
        assert!(signed_area(&profile.outer) > 0.0);
        assert!((profile.area() - 44.0).abs() < 1e-9);
    }

    #[test]
    fn test_new_rejects_mismatched_rings() {
        let result = AnnularProfile::new(square(-1.0, 11.0), square(0.0, 10.0)[..3].to_vec());
        assert!(result.is_err());
    }

    #[test]
    fn test_both_cap_modes_cover_the_annulus() {
        let profile = AnnularProfile::new(square(-1.0, 11.0), square(0.0, 10.0)).unwrap();

        for mode in [CapMode::Earcut, CapMode::Stitched] {
            let tri = profile.triangulate(mode).unwrap();
            assert_eq!(tri.points.len(), 8);
            assert!((tri.area() - 44.0).abs() < 1e-9, "{:?}", mode);
        }
    }

    #[test]
    fn test_stitched_has_two_triangles_per_edge() {
        let indices = stitch_rings(5);
        assert_eq!(indices.len(), 5 * 6);
        assert!(indices.iter().all(|&i| i < 10));
    }
}
