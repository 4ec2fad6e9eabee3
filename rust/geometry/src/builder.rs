// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor plan to building meshes
//!
//! Pipeline: miter offset → cap triangulation → shell extrusion → window
//! carving, with interior partitions built alongside the shell.

use crate::building::{Building, FieldSize};
use crate::config::KernelConfig;
use crate::error::Result;
use crate::extrusion::extrude_annulus;
use crate::mesh::{Mesh, MeshAssembly, SubMesh, SubMeshKind, SubMeshRange};
use crate::offset::miter_offset;
use crate::partition::assemble_partitions;
use crate::profile::AnnularProfile;
use crate::transform::CoordinateTransform;
use crate::window::{carve_windows, niche_cutters};

/// Everything a build needs besides the building itself
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub field: FieldSize,
    pub config: KernelConfig,
}

impl BuildContext {
    pub fn new(field: FieldSize, config: KernelConfig) -> Self {
        Self { field, config }
    }

    /// Plan-to-scene mapping for this context's field
    pub fn transform(&self) -> CoordinateTransform {
        CoordinateTransform::new(self.field)
    }
}

/// Meshes produced for one building
#[derive(Debug, Clone)]
pub struct BuildingMeshes {
    /// Closed outer shell with window niches carved out
    pub shell: Mesh,
    /// All interior walls in one buffer set
    pub partitions: Mesh,
    /// Location of each interior wall inside `partitions`
    pub partition_ranges: Vec<SubMeshRange>,
    /// The cutter volumes that were subtracted, kept for inspection
    pub niches: MeshAssembly,
}

impl BuildingMeshes {
    /// Shell and partitions merged into a single mesh
    pub fn combined(&self) -> Mesh {
        let mut combined = Mesh::with_capacity(
            self.shell.vertex_count() + self.partitions.vertex_count(),
            self.shell.indices.len() + self.partitions.indices.len(),
        );
        combined.merge(&self.shell);
        combined.merge(&self.partitions);
        combined
    }

    /// Where the shell and each interior wall sit inside [`Self::combined`]
    pub fn combined_ranges(&self) -> Vec<SubMeshRange> {
        let shell_vertices = self.shell.vertex_count() as u32;
        let shell_indices = self.shell.indices.len() as u32;

        let shell = SubMeshRange {
            kind: SubMeshKind::Shell,
            vertex_offset: 0,
            vertex_count: shell_vertices,
            index_offset: 0,
            index_count: shell_indices,
        };
        std::iter::once(shell)
            .chain(self.partition_ranges.iter().map(|range| SubMeshRange {
                vertex_offset: range.vertex_offset + shell_vertices,
                index_offset: range.index_offset + shell_indices,
                ..*range
            }))
            .collect()
    }

    /// Niche cutters of one wall
    pub fn niches_on_wall(&self, wall: usize) -> impl Iterator<Item = &SubMesh> + '_ {
        self.niches
            .filter(move |kind| matches!(kind, SubMeshKind::Niche { wall: w, .. } if *w == wall))
    }

    /// The same meshes mapped into scene space
    pub fn to_scene(&self, transform: &CoordinateTransform) -> BuildingMeshes {
        let mut niches = MeshAssembly::new();
        for niche in self.niches.iter() {
            niches.add(niche.kind, transform.apply_to_mesh(&niche.mesh));
        }

        BuildingMeshes {
            shell: transform.apply_to_mesh(&self.shell),
            partitions: transform.apply_to_mesh(&self.partitions),
            partition_ranges: self.partition_ranges.clone(),
            niches,
        }
    }
}

/// Build the closed shell (no windows) for the outer wall loop
pub fn build_shell(building: &Building, ctx: &BuildContext) -> Result<Mesh> {
    let (thickness, height) = building.wall_dimensions()?;
    let inner = building.inner_corners();

    let outer = miter_offset(&inner, thickness, ctx.config.min_corner_angle)?;
    tracing::debug!(walls = inner.len(), thickness, "offset outer boundary");

    let profile = AnnularProfile::new(outer, inner)?;
    extrude_annulus(&profile, height, ctx.config.cap_mode)
}

/// Build the shell with carved windows plus the interior partitions.
///
/// Thickness and height come from the first wall; the others are expected
/// to match.
pub fn build_building(building: &Building, ctx: &BuildContext) -> Result<BuildingMeshes> {
    let _span = tracing::debug_span!("build_building", walls = building.walls.len()).entered();

    let (thickness, height) = building.wall_dimensions()?;
    if !building.has_uniform_walls() {
        tracing::debug!(thickness, height, "walls differ in size, using the first wall's");
    }

    let shell = build_shell(building, ctx)?;

    let cutters = niche_cutters(building, thickness, height, ctx.config.cutter_overshoot)?;
    let shell = carve_windows(shell, &cutters)?;

    let (partitions, partition_ranges) =
        assemble_partitions(&building.inner_walls, thickness, height)?;

    let mut niches = MeshAssembly::new();
    for SubMesh { kind, mesh } in cutters {
        niches.add(kind, mesh);
    }

    tracing::debug!(
        triangles = shell.triangle_count(),
        windows = niches.len(),
        partitions = partition_ranges.len(),
        "building assembled"
    );

    Ok(BuildingMeshes {
        shell,
        partitions,
        partition_ranges,
        niches,
    })
}
