// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Name-keyed scene of marker and building meshes

use crate::error::{Error, Result};
use rustc_hash::FxHashMap;
use wallforge_geometry::{aabb_to_mesh, build_building, BuildContext, Building, Mesh, Point2, Point3, Vector3};

/// What the game client needs from a renderer
pub trait Render {
    /// Create a player marker cube under `name` and return it
    fn add_mesh(&mut self, name: &str) -> &SceneNode;

    /// Look up a mesh by name
    fn get_mesh_by_name(&self, name: &str) -> Option<&SceneNode>;

    /// Build a floor plan into the scene, returning the shell's name
    fn add_building(&mut self, building: &Building) -> Result<String>;
}

/// A mesh placed in the scene
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Geometry in the node's local frame
    pub mesh: Mesh,
    /// Translation applied to the local frame
    pub position: Point3<f64>,
}

impl SceneNode {
    pub fn new(mesh: Mesh) -> Self {
        Self {
            mesh,
            position: Point3::origin(),
        }
    }

    /// Mesh with the node translation baked into the positions
    pub fn world_mesh(&self) -> Mesh {
        let mut mesh = self.mesh.clone();
        let offset = self.position.coords.cast::<f32>();
        for chunk in mesh.positions.chunks_exact_mut(3) {
            chunk[0] += offset.x;
            chunk[1] += offset.y;
            chunk[2] += offset.z;
        }
        mesh
    }
}

/// Registry of named scene meshes
pub struct SceneRegistry {
    ctx: BuildContext,
    nodes: FxHashMap<String, SceneNode>,
    buildings: usize,
}

impl SceneRegistry {
    /// Create an empty scene for the given field and kernel settings
    pub fn new(ctx: BuildContext) -> Self {
        Self {
            ctx,
            nodes: FxHashMap::default(),
            buildings: 0,
        }
    }

    pub fn context(&self) -> &BuildContext {
        &self.ctx
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Insert or replace a node
    pub fn insert(&mut self, name: impl Into<String>, node: SceneNode) {
        self.nodes.insert(name.into(), node);
    }

    /// Dispose of a mesh, returning it
    pub fn remove_mesh(&mut self, name: &str) -> Result<SceneNode> {
        let node = self
            .nodes
            .remove(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        tracing::debug!(name, "removed mesh");
        Ok(node)
    }

    /// Rest a mesh on the ground above the field cell at plan `position`
    pub fn move_mesh_2d(&mut self, name: &str, position: Point2<f64>) -> Result<()> {
        let ground = self.ctx.transform().ground(&position);
        let lift = self.ctx.config.marker_side / 2.0;

        let node = self
            .nodes
            .get_mut(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        node.position = Point3::new(ground.x, lift, ground.y);

        tracing::trace!(name, x = ground.x, z = ground.y, "moved mesh");
        Ok(())
    }

    fn marker_cube(&self) -> Mesh {
        let half = Vector3::repeat(self.ctx.config.marker_side / 2.0);
        aabb_to_mesh(Point3::origin() - half, Point3::origin() + half)
    }
}

impl Render for SceneRegistry {
    fn add_mesh(&mut self, name: &str) -> &SceneNode {
        let node = SceneNode::new(self.marker_cube());
        tracing::debug!(name, "added marker mesh");
        self.nodes.insert(name.to_string(), node);
        &self.nodes[name]
    }

    fn get_mesh_by_name(&self, name: &str) -> Option<&SceneNode> {
        self.nodes.get(name)
    }

    fn add_building(&mut self, building: &Building) -> Result<String> {
        let meshes = build_building(building, &self.ctx)?.to_scene(&self.ctx.transform());

        let name = format!("building-{}", self.buildings);
        self.buildings += 1;

        tracing::info!(
            name = %name,
            walls = building.walls.len(),
            windows = building.window_count(),
            triangles = meshes.shell.triangle_count(),
            "added building"
        );

        if !meshes.partitions.is_empty() {
            self.insert(format!("{}-partitions", name), SceneNode::new(meshes.partitions));
        }
        self.insert(name.clone(), SceneNode::new(meshes.shell));
        Ok(name)
    }
}
