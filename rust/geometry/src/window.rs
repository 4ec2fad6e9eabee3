// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Window niches carved through the wall thickness

use crate::building::{Building, WallWindow};
use crate::csg::{oriented_box, ClippingProcessor};
use crate::error::{Error, Result};
use crate::mesh::{Mesh, SubMesh, SubMeshKind};
use crate::triangulation::signed_area;
use nalgebra::{Point2, Point3, Vector2, Vector3};

/// Local frame of one wall: origin at its start corner on the inner boundary
#[derive(Debug, Clone, Copy)]
pub struct WallFrame {
    pub start: Point2<f64>,
    /// Unit direction from the start corner to the next corner
    pub along: Vector2<f64>,
    /// Unit normal pointing from the inner face to the outer face
    pub outward: Vector2<f64>,
    pub length: f64,
}

impl WallFrame {
    /// Frames for every wall of a closed inner ring, in wall order
    pub fn for_ring(corners: &[Point2<f64>]) -> Result<Vec<WallFrame>> {
        let n = corners.len();
        if n < 3 {
            return Err(Error::InvalidPlan(format!(
                "a closed wall loop needs at least 3 corners, got {}",
                n
            )));
        }
        let orientation = if signed_area(corners) < 0.0 { -1.0 } else { 1.0 };

        (0..n)
            .map(|i| {
                let start = corners[i];
                let edge = corners[(i + 1) % n] - start;
                let length = edge.norm();
                let along = edge
                    .try_normalize(1e-9)
                    .ok_or(Error::DegenerateEdge { index: i })?;
                let outward = Vector2::new(along.y, -along.x) * orientation;
                Ok(WallFrame {
                    start,
                    along,
                    outward,
                    length,
                })
            })
            .collect()
    }

    /// Plan-space point at `(distance along, distance outward, elevation)`
    #[inline]
    pub fn point(&self, along: f64, outward: f64, elevation: f64) -> Point3<f64> {
        let p = self.start + self.along * along + self.outward * outward;
        Point3::new(p.x, p.y, elevation)
    }
}

/// Cutter prism for one window.
///
/// Spans the window rectangle along the wall and reaches `overshoot` past
/// both wall faces. A window touching the floor or the roof is stretched past
/// that cap too, so no cutter face lies in a shell face.
pub fn niche_cutter(
    frame: &WallFrame,
    window: &WallWindow,
    thickness: f64,
    wall_height: f64,
    overshoot: f64,
) -> Mesh {
    let mut bottom = window.base;
    let mut top = window.base + window.height;
    if bottom <= 0.0 {
        bottom -= overshoot;
    }
    if top >= wall_height {
        top += overshoot;
    }

    let origin = frame.point(window.left, -overshoot, bottom);
    let along = Vector3::new(frame.along.x, frame.along.y, 0.0) * window.width;
    let through = Vector3::new(frame.outward.x, frame.outward.y, 0.0) * (thickness + 2.0 * overshoot);
    let up = Vector3::new(0.0, 0.0, top - bottom);

    oriented_box(origin, [along, through, up])
}

/// Cutters for every window of the building, tagged with their wall and window
pub fn niche_cutters(
    building: &Building,
    thickness: f64,
    wall_height: f64,
    overshoot: f64,
) -> Result<Vec<SubMesh>> {
    let frames = WallFrame::for_ring(&building.inner_corners())?;

    let mut cutters = Vec::with_capacity(building.window_count());
    for (wall_index, (wall, frame)) in building.walls.iter().zip(&frames).enumerate() {
        for (window_index, window) in wall.windows.iter().enumerate() {
            if !window.fits(frame.length, wall_height) {
                tracing::warn!(
                    wall = wall_index,
                    window = window_index,
                    left = window.left,
                    width = window.width,
                    wall_length = frame.length,
                    "window exceeds wall bounds, carving anyway"
                );
            }
            if !(window.width > 0.0 && window.height > 0.0) {
                continue;
            }

            cutters.push(SubMesh::new(
                SubMeshKind::Niche {
                    wall: wall_index,
                    window: window_index,
                },
                niche_cutter(frame, window, thickness, wall_height, overshoot),
            ));
        }
    }

    Ok(cutters)
}

/// Subtract every niche from the shell.
///
/// With no cutters the shell is returned as is. Otherwise normals and UVs are
/// recomputed on the carved result.
pub fn carve_windows(shell: Mesh, cutters: &[SubMesh]) -> Result<Mesh> {
    if cutters.is_empty() {
        return Ok(shell);
    }

    let processor = ClippingProcessor::new();
    let mut carved = shell;
    for cutter in cutters {
        carved = processor.subtract_mesh(&carved, &cutter.mesh)?;
        tracing::debug!(
            window = ?cutter.kind,
            triangles = carved.triangle_count(),
            "carved window niche"
        );
    }

    carved.recompute_normals();
    carved.assign_uvs();
    Ok(carved)
}
