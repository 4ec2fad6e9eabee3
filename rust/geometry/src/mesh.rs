// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures

use nalgebra::{Point3, Vector3};

/// Cap faces are classified by a normal whose vertical component exceeds this
const CAP_NORMAL_THRESHOLD: f64 = 0.5;

/// Triangle mesh
///
/// Plan-space meshes are z-up; scene-space meshes (see
/// [`CoordinateTransform`](crate::transform::CoordinateTransform)) are y-up.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f32>,
    /// Vertex normals (nx, ny, nz)
    pub normals: Vec<f32>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
    /// Texture coordinates (u, v)
    pub uvs: Vec<f32>,
}

/// What a sub-mesh in an assembly represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubMeshKind {
    /// Outer building shell (caps, side faces, carved niches)
    Shell,
    /// Window cutter volume for the given wall and window index
    Niche { wall: usize, window: usize },
    /// Interior partition with the given index into `Building::inner_walls`
    Partition(usize),
}

/// A sub-mesh with the part of the building it came from.
#[derive(Debug, Clone)]
pub struct SubMesh {
    pub kind: SubMeshKind,
    /// The triangulated mesh data
    pub mesh: Mesh,
}

impl SubMesh {
    /// Create a new sub-mesh
    pub fn new(kind: SubMeshKind, mesh: Mesh) -> Self {
        Self { kind, mesh }
    }
}

/// Where a sub-mesh landed inside a combined mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubMeshRange {
    pub kind: SubMeshKind,
    /// First vertex of the sub-mesh in the combined buffers
    pub vertex_offset: u32,
    pub vertex_count: u32,
    /// First index (not triangle) of the sub-mesh in the combined index buffer
    pub index_offset: u32,
    pub index_count: u32,
}

/// Arena of sub-meshes merged once into a single buffer set
#[derive(Debug, Clone, Default)]
pub struct MeshAssembly {
    pub sub_meshes: Vec<SubMesh>,
}

impl MeshAssembly {
    /// Create a new empty assembly
    pub fn new() -> Self {
        Self {
            sub_meshes: Vec::new(),
        }
    }

    /// Add a sub-mesh (empty meshes are dropped)
    pub fn add(&mut self, kind: SubMeshKind, mesh: Mesh) {
        if !mesh.is_empty() {
            self.sub_meshes.push(SubMesh::new(kind, mesh));
        }
    }

    /// Check if assembly is empty
    pub fn is_empty(&self) -> bool {
        self.sub_meshes.is_empty()
    }

    /// Get number of sub-meshes
    pub fn len(&self) -> usize {
        self.sub_meshes.len()
    }

    /// Iterate over sub-meshes
    pub fn iter(&self) -> impl Iterator<Item = &SubMesh> {
        self.sub_meshes.iter()
    }

    /// Sub-meshes of a given kind predicate
    pub fn filter<'a>(
        &'a self,
        mut predicate: impl FnMut(&SubMeshKind) -> bool + 'a,
    ) -> impl Iterator<Item = &'a SubMesh> + 'a {
        self.sub_meshes.iter().filter(move |s| predicate(&s.kind))
    }

    /// Merge all sub-meshes into one preallocated mesh, recording where each went
    pub fn combine(&self) -> (Mesh, Vec<SubMeshRange>) {
        let total_vertices: usize = self.sub_meshes.iter().map(|s| s.mesh.vertex_count()).sum();
        let total_indices: usize = self.sub_meshes.iter().map(|s| s.mesh.indices.len()).sum();

        let mut combined = Mesh::with_capacity(total_vertices, total_indices);
        let mut ranges = Vec::with_capacity(self.sub_meshes.len());

        for sub in &self.sub_meshes {
            let vertex_offset = combined.vertex_count() as u32;
            let index_offset = combined.indices.len() as u32;
            combined.merge(&sub.mesh);
            ranges.push(SubMeshRange {
                kind: sub.kind,
                vertex_offset,
                vertex_count: sub.mesh.vertex_count() as u32,
                index_offset,
                index_count: sub.mesh.indices.len() as u32,
            });
        }

        (combined, ranges)
    }
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
            uvs: Vec::new(),
        }
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            normals: Vec::with_capacity(vertex_count * 3),
            indices: Vec::with_capacity(index_count),
            uvs: Vec::with_capacity(vertex_count * 2),
        }
    }

    /// Add a vertex with normal; its UV starts at the origin
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>, normal: Vector3<f64>) {
        self.positions.push(position.x as f32);
        self.positions.push(position.y as f32);
        self.positions.push(position.z as f32);

        self.normals.push(normal.x as f32);
        self.normals.push(normal.y as f32);
        self.normals.push(normal.z as f32);

        self.uvs.push(0.0);
        self.uvs.push(0.0);
    }

    /// Add a triangle
    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Add a flat triangle with its own three vertices and face normal
    pub fn add_flat_triangle(&mut self, v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) {
        let normal = (v1 - v0)
            .cross(&(v2 - v0))
            .try_normalize(1e-12)
            .unwrap_or_else(Vector3::zeros);
        let base = self.vertex_count() as u32;
        self.add_vertex(v0, normal);
        self.add_vertex(v1, normal);
        self.add_vertex(v2, normal);
        self.add_triangle(base, base + 1, base + 2);
    }

    /// Vertex position as f64 point
    #[inline]
    pub fn position(&self, index: usize) -> Point3<f64> {
        Point3::new(
            self.positions[index * 3] as f64,
            self.positions[index * 3 + 1] as f64,
            self.positions[index * 3 + 2] as f64,
        )
    }

    /// Iterate triangles as position triples
    pub fn triangles(&self) -> impl Iterator<Item = [Point3<f64>; 3]> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            [
                self.position(tri[0] as usize),
                self.position(tri[1] as usize),
                self.position(tri[2] as usize),
            ]
        })
    }

    /// Merge another mesh into this one
    #[inline]
    pub fn merge(&mut self, other: &Mesh) {
        if other.is_empty() {
            return;
        }

        let vertex_offset = (self.positions.len() / 3) as u32;

        // Pre-allocate for the incoming data
        self.positions.reserve(other.positions.len());
        self.normals.reserve(other.normals.len());
        self.uvs.reserve(other.uvs.len());
        self.indices.reserve(other.indices.len());

        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.uvs.extend_from_slice(&other.uvs);

        self.indices
            .extend(other.indices.iter().map(|&i| i + vertex_offset));
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Calculate bounds (min, max)
    #[inline]
    pub fn bounds(&self) -> (Point3<f32>, Point3<f32>) {
        if self.is_empty() {
            return (Point3::origin(), Point3::origin());
        }

        let mut min = Point3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max = Point3::new(f32::MIN, f32::MIN, f32::MIN);

        self.positions.chunks_exact(3).for_each(|chunk| {
            let (x, y, z) = (chunk[0], chunk[1], chunk[2]);
            min.x = min.x.min(x);
            min.y = min.y.min(y);
            min.z = min.z.min(z);
            max.x = max.x.max(x);
            max.y = max.y.max(y);
            max.z = max.z.max(z);
        });

        (min, max)
    }

    /// Signed enclosed volume (divergence theorem).
    ///
    /// Positive for a closed, outward-wound mesh. Works on triangle soups as
    /// long as the surface is geometrically closed.
    pub fn volume(&self) -> f64 {
        self.triangles()
            .map(|[a, b, c]| a.coords.dot(&b.coords.cross(&c.coords)))
            .sum::<f64>()
            / 6.0
    }

    /// Recompute vertex normals from triangle geometry.
    ///
    /// Face normals are accumulated per vertex (area weighted), so vertices that
    /// belong to a single planar face get that face's normal.
    pub fn recompute_normals(&mut self) {
        let vertex_count = self.vertex_count();
        if vertex_count == 0 {
            return;
        }

        let mut normals = vec![Vector3::<f64>::zeros(); vertex_count];

        for tri in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let v0 = self.position(i0);
            let face = (self.position(i1) - v0).cross(&(self.position(i2) - v0));

            normals[i0] += face;
            normals[i1] += face;
            normals[i2] += face;
        }

        self.normals.clear();
        self.normals.reserve(vertex_count * 3);

        for normal in normals {
            let normalized = normal.try_normalize(1e-12).unwrap_or_else(Vector3::zeros);
            self.normals.push(normalized.x as f32);
            self.normals.push(normalized.y as f32);
            self.normals.push(normalized.z as f32);
        }
    }

    /// Assign texture coordinates by face classification (plan space, z-up).
    ///
    /// Vertices on caps (mostly vertical normal) get a top-down `(x, y)`
    /// projection. Vertices on side faces get `(distance along the face's
    /// horizontal tangent, elevation)`.
    pub fn assign_uvs(&mut self) {
        let vertex_count = self.vertex_count();
        self.uvs.clear();
        self.uvs.reserve(vertex_count * 2);

        for i in 0..vertex_count {
            let p = self.position(i);
            let n = Vector3::new(
                self.normals[i * 3] as f64,
                self.normals[i * 3 + 1] as f64,
                self.normals[i * 3 + 2] as f64,
            );

            let (u, v) = if n.z.abs() > CAP_NORMAL_THRESHOLD {
                (p.x, p.y)
            } else {
                let tangent = Vector3::new(-n.y, n.x, 0.0)
                    .try_normalize(1e-12)
                    .unwrap_or_else(Vector3::x);
                (p.x * tangent.x + p.y * tangent.y, p.z)
            };

            self.uvs.push(u as f32);
            self.uvs.push(v as f32);
        }
    }

    /// Reverse the winding of every triangle
    pub fn flip_winding(&mut self) {
        for tri in self.indices.chunks_exact_mut(3) {
            tri.swap(1, 2);
        }
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
