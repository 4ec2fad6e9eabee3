// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor plan description consumed by the kernel
//!
//! Field names follow the game client's JSON (`innerWalls`, `thick`, ...), so a
//! building received over the wire deserializes directly.

use crate::error::{Error, Result};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// A plan-space point. `z` is an elevation and defaults to the floor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct PlanVector {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl PlanVector {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn with_elevation(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_point2(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }
}

/// Rectangular opening in a wall, in wall-local plan units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WallWindow {
    /// Distance from the wall's start corner along the wall
    pub left: f64,
    /// Height of the sill above the floor
    pub base: f64,
    pub width: f64,
    pub height: f64,
}

impl WallWindow {
    pub fn new(left: f64, base: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            base,
            width,
            height,
        }
    }

    /// Check the window fits inside a wall of the given length and height
    pub fn fits(&self, wall_length: f64, wall_height: f64) -> bool {
        self.width > 0.0
            && self.height > 0.0
            && self.left >= 0.0
            && self.base >= 0.0
            && self.left + self.width <= wall_length
            && self.base + self.height <= wall_height
    }
}

/// One segment of the closed outer wall polyline.
///
/// The wall runs from `corner` to the next wall's `corner`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Wall {
    pub corner: PlanVector,
    #[serde(default)]
    pub width: f64,
    pub height: f64,
    pub thick: f64,
    #[serde(default)]
    pub windows: Vec<WallWindow>,
}

impl Wall {
    pub fn new(corner: PlanVector, height: f64, thick: f64) -> Self {
        Self {
            corner,
            width: 0.0,
            height,
            thick,
            windows: Vec::new(),
        }
    }

    pub fn with_window(mut self, window: WallWindow) -> Self {
        self.windows.push(window);
        self
    }
}

/// A building: closed outer wall loop plus free-standing partitions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Building {
    pub walls: Vec<Wall>,
    /// Interior walls as `[start, end]` pairs
    #[serde(default)]
    pub inner_walls: Vec<[PlanVector; 2]>,
}

impl Building {
    /// Rectangle-or-polygon building from inner corners with uniform walls
    pub fn from_corners(corners: &[Point2<f64>], height: f64, thick: f64) -> Self {
        Self {
            walls: corners
                .iter()
                .map(|c| Wall::new(PlanVector::new(c.x, c.y), height, thick))
                .collect(),
            inner_walls: Vec::new(),
        }
    }

    /// Inner boundary corners in wall order
    pub fn inner_corners(&self) -> Vec<Point2<f64>> {
        self.walls.iter().map(|w| w.corner.to_point2()).collect()
    }

    /// Wall thickness and height, read from the first wall
    pub fn wall_dimensions(&self) -> Result<(f64, f64)> {
        let first = self
            .walls
            .first()
            .ok_or_else(|| Error::InvalidPlan("building has no walls".to_string()))?;
        if !(first.thick > 0.0) {
            return Err(Error::InvalidPlan(format!(
                "wall thickness must be positive, got {}",
                first.thick
            )));
        }
        if !(first.height > 0.0) {
            return Err(Error::InvalidPlan(format!(
                "wall height must be positive, got {}",
                first.height
            )));
        }
        Ok((first.thick, first.height))
    }

    /// True when every wall shares the first wall's thickness and height
    pub fn has_uniform_walls(&self) -> bool {
        match self.walls.first() {
            Some(first) => self
                .walls
                .iter()
                .all(|w| w.thick == first.thick && w.height == first.height),
            None => true,
        }
    }

    /// Total number of windows over all walls
    pub fn window_count(&self) -> usize {
        self.walls.iter().map(|w| w.windows.len()).sum()
    }
}

/// Declared size of the game field, in plan units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FieldSize {
    pub width: f64,
    pub height: f64,
}

impl FieldSize {
    pub fn new(width: f64, height: f64) -> Result<Self> {
        if !(width > 0.0 && height > 0.0) {
            return Err(Error::InvalidFieldSize { width, height });
        }
        Ok(Self { width, height })
    }
}
