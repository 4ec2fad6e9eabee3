// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wallforge Geometry
//!
//! Turns a floor plan (a closed loop of walls with windows, plus free-standing
//! interior walls) into watertight triangle meshes: the wall ring is offset
//! outward with mitered corners, capped with earcut, extruded, and carved
//! with one csgrs subtraction per window.
//!
//! ```no_run
//! use wallforge_geometry::{build_building, BuildContext, Building, FieldSize, KernelConfig};
//!
//! # fn main() -> wallforge_geometry::Result<()> {
//! let building: Building = Building::default();
//! let ctx = BuildContext::new(FieldSize::new(64.0, 64.0)?, KernelConfig::from_env()?);
//! let meshes = build_building(&building, &ctx)?;
//! let scene = meshes.to_scene(&ctx.transform());
//! # let _ = scene;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod building;
pub mod config;
pub mod csg;
pub mod error;
pub mod extrusion;
pub mod mesh;
pub mod offset;
pub mod partition;
pub mod profile;
pub mod transform;
pub mod triangulation;
pub mod window;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use builder::{build_building, build_shell, BuildContext, BuildingMeshes};
pub use building::{Building, FieldSize, PlanVector, Wall, WallWindow};
pub use config::{CapMode, KernelConfig};
pub use csg::{aabb_to_mesh, oriented_box, ClippingProcessor};
pub use error::{Error, Result};
pub use extrusion::extrude_annulus;
pub use mesh::{Mesh, MeshAssembly, SubMesh, SubMeshKind, SubMeshRange};
pub use offset::miter_offset;
pub use partition::{assemble_partitions, partition_mesh};
pub use profile::{AnnularProfile, Triangulation};
pub use transform::CoordinateTransform;
pub use triangulation::{triangulate_polygon, triangulate_polygon_with_holes};
pub use window::{carve_windows, niche_cutter, niche_cutters, WallFrame};
