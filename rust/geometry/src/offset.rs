// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mitered outward offset of the inner wall boundary
//!
//! For every inner corner `C[i]` the outer corner is
//!
//! ```text
//! O[i] = C[i] + n·t + û·(d·t / tan(α/2))
//! ```
//!
//! where `û` is the unit direction of the incoming edge `C[i] - C[i-1]`, `n` is
//! that edge's outward normal, `α` is the interior angle between the two edges
//! meeting at `C[i]` and `d = ±1` is the turn direction. The `û` term slides the
//! translated corner along the incoming edge until it meets the translated
//! outgoing edge, so `|O[i] - C[i]| = t / sin(α/2)`.

use crate::error::{Error, Result};
use crate::triangulation::signed_area;
use nalgebra::{Point2, Vector2};

/// Edges shorter than this are treated as duplicate corners
const MIN_EDGE_LENGTH: f64 = 1e-9;

/// Offset a closed ring outward by `thickness` with mitered corners.
///
/// The ring may wind either way; the offset always grows the polygon.
/// `min_corner_angle` rejects corners where the wall folds back onto itself.
pub fn miter_offset(
    corners: &[Point2<f64>],
    thickness: f64,
    min_corner_angle: f64,
) -> Result<Vec<Point2<f64>>> {
    let n = corners.len();
    if n < 3 {
        return Err(Error::InvalidPlan(format!(
            "a closed wall loop needs at least 3 corners, got {}",
            n
        )));
    }

    // Rotating clockwise yields the outward normal of a counter-clockwise ring
    let orientation = if signed_area(corners) < 0.0 { -1.0 } else { 1.0 };
    let offset = thickness * orientation;

    let mut outer = Vec::with_capacity(n);
    for i in 0..n {
        let prev = corners[(i + n - 1) % n];
        let current = corners[i];
        let next = corners[(i + 1) % n];

        let prev_edge = current - prev;
        let next_edge = next - current;

        let prev_len = prev_edge.norm();
        if prev_len < MIN_EDGE_LENGTH {
            return Err(Error::DegenerateEdge { index: (i + n - 1) % n });
        }
        if next_edge.norm() < MIN_EDGE_LENGTH {
            return Err(Error::DegenerateEdge { index: i });
        }

        let angle = interior_angle(&prev_edge, &next_edge);
        if angle < min_corner_angle {
            return Err(Error::DegenerateCorner { index: i, angle });
        }

        let direction = turn_direction(&prev_edge, &next_edge);
        let along = prev_edge / prev_len;
        let normal = Vector2::new(along.y, -along.x);

        let corner = current + normal * offset + along * (direction * offset / (angle / 2.0).tan());
        if !(corner.x.is_finite() && corner.y.is_finite()) {
            return Err(Error::DegenerateCorner { index: i, angle });
        }

        outer.push(corner);
    }

    tracing::trace!(corners = n, thickness, "miter offset computed");

    Ok(outer)
}

/// Angle between the two edges leaving a corner, in `[0, π]`
#[inline]
pub fn interior_angle(prev_edge: &Vector2<f64>, next_edge: &Vector2<f64>) -> f64 {
    let cos = (-prev_edge).dot(next_edge) / (prev_edge.norm() * next_edge.norm());
    cos.clamp(-1.0, 1.0).acos()
}

/// `+1` for a left (counter-clockwise) turn, `-1` for a right turn, `0` when straight
#[inline]
pub fn turn_direction(prev_edge: &Vector2<f64>, next_edge: &Vector2<f64>) -> f64 {
    let cross = prev_edge.perp(next_edge);
    if cross > 0.0 {
        1.0
    } else if cross < 0.0 {
        -1.0
    } else {
        0.0
    }
}
