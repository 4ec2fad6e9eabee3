// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wallforge Scene
//!
//! The render-facing side of wallforge: a name-keyed registry of player
//! markers and building meshes behind the [`Render`] trait, plus OBJ export.
//! The geometry kernel itself lives in `wallforge-geometry` and knows nothing
//! about this crate.

pub mod error;
pub mod obj;
pub mod registry;

pub use error::{Error, Result};
pub use obj::{save_obj, write_obj};
pub use registry::{Render, SceneNode, SceneRegistry};

use std::path::Path;
use wallforge_geometry::{miter_offset, Building, KernelConfig, Point2};

/// Read a building description from a JSON file
pub fn load_building(path: impl AsRef<Path>) -> Result<Building> {
    let json = std::fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&json)?)
}

/// Plan-space bounding rectangle of the outer wall boundary and partitions
pub fn plan_bounds(building: &Building, config: &KernelConfig) -> Result<(Point2<f64>, Point2<f64>)> {
    let (thickness, _) = building.wall_dimensions()?;
    let outer = miter_offset(&building.inner_corners(), thickness, config.min_corner_angle)?;

    let points = outer
        .into_iter()
        .chain(building.inner_walls.iter().flatten().map(|p| p.to_point2()));

    let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in points {
        min = min.inf(&p);
        max = max.sup(&p);
    }
    Ok((min, max))
}
