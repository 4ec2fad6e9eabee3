// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wavefront OBJ export

use crate::error::Result;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use wallforge_geometry::Mesh;

/// Write named meshes as OBJ objects with positions, UVs and normals.
///
/// Buffers are written as they are; scene-space meshes are already y-up.
pub fn write_obj<W: Write>(mut out: W, objects: &[(&str, &Mesh)]) -> std::io::Result<()> {
    writeln!(out, "# Generated by floorplan-mesh (wallforge)")?;

    // OBJ indices are 1-based and global across objects
    let mut vertex_offset: usize = 1;

    for (name, mesh) in objects {
        writeln!(out, "o {}", name)?;

        for p in mesh.positions.chunks_exact(3) {
            writeln!(out, "v {:.6} {:.6} {:.6}", p[0], p[1], p[2])?;
        }
        for uv in mesh.uvs.chunks_exact(2) {
            writeln!(out, "vt {:.6} {:.6}", uv[0], uv[1])?;
        }
        for n in mesh.normals.chunks_exact(3) {
            writeln!(out, "vn {:.6} {:.6} {:.6}", n[0], n[1], n[2])?;
        }

        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize + vertex_offset);
            writeln!(out, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
        }

        vertex_offset += mesh.vertex_count();
    }

    out.flush()
}

/// Write an OBJ file
pub fn save_obj(path: impl AsRef<Path>, objects: &[(&str, &Mesh)]) -> Result<()> {
    let file = fs::File::create(path.as_ref())?;
    write_obj(BufWriter::new(file), objects)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallforge_geometry::{aabb_to_mesh, Point3};

    #[test]
    fn test_obj_layout() {
        let cube = aabb_to_mesh(Point3::origin(), Point3::new(1.0, 1.0, 1.0));
        let mut buffer = Vec::new();
        write_obj(&mut buffer, &[("a", &cube), ("b", &cube)]).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let count = |prefix: &str| text.lines().filter(|l| l.starts_with(prefix)).count();
        assert_eq!(count("o "), 2);
        assert_eq!(count("v "), 48);
        assert_eq!(count("vt "), 48);
        assert_eq!(count("vn "), 48);
        assert_eq!(count("f "), 24);

        // Second object's faces index past the first object's vertices
        let last_face = text.lines().filter(|l| l.starts_with("f ")).last().unwrap();
        let first_index: usize = last_face[2..].split('/').next().unwrap().parse().unwrap();
        assert!(first_index > 24);
    }
}
