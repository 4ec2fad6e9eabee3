// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use approx::assert_relative_eq;
use wallforge_geometry::{
    build_building, build_shell, BuildContext, Building, CapMode, FieldSize, KernelConfig, Mesh,
    Point2, Point3, Vector3, WallWindow,
};

const TOL: f64 = 1e-4;

fn square_building(thick: f64, height: f64) -> Building {
    let corners = [
        Point2::new(0.0, 0.0),
        Point2::new(10.0, 0.0),
        Point2::new(10.0, 10.0),
        Point2::new(0.0, 10.0),
    ];
    Building::from_corners(&corners, height, thick)
}

fn context(cap_mode: CapMode) -> BuildContext {
    BuildContext::new(
        FieldSize::new(10.0, 10.0).unwrap(),
        KernelConfig::default().with_cap_mode(cap_mode),
    )
}

/// Point strictly inside triangle `(a, b, c)` in the (x, z) plane
fn covers_xz(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>, x: f64, z: f64) -> bool {
    let side = |p: &Point3<f64>, q: &Point3<f64>| (q.x - p.x) * (z - p.z) - (q.z - p.z) * (x - p.x);
    let (d0, d1, d2) = (side(a, b), side(b, c), side(c, a));
    (d0 > 1e-9 && d1 > 1e-9 && d2 > 1e-9) || (d0 < -1e-9 && d1 < -1e-9 && d2 < -1e-9)
}

fn triangles_on_plane_y(mesh: &Mesh, y: f64) -> Vec<[Point3<f64>; 3]> {
    mesh.triangles()
        .filter(|tri| tri.iter().all(|p| (p.y - y).abs() < TOL))
        .collect()
}

#[test]
fn test_window_opens_both_wall_faces() {
    let mut building = square_building(0.2, 3.0);
    building.walls[0].windows.push(WallWindow::new(2.0, 1.0, 1.0, 1.0));

    let meshes = build_building(&building, &context(CapMode::Earcut)).unwrap();
    let shell = &meshes.shell;

    // Wall 0 runs along +x; its inner face is y = 0, its outer face y = -0.2
    for face_y in [0.0, -0.2] {
        let face = triangles_on_plane_y(shell, face_y);
        assert!(!face.is_empty(), "no triangles on wall face y = {}", face_y);

        for [a, b, c] in &face {
            for (x, z) in [(2.5, 1.5), (2.05, 1.05), (2.95, 1.95), (2.05, 1.95)] {
                assert!(
                    !covers_xz(a, b, c, x, z),
                    "face y = {} still covers the opening at ({}, {})",
                    face_y,
                    x,
                    z
                );
            }
        }

        // Wall around the opening is still there
        let solid = face.iter().any(|[a, b, c]| covers_xz(a, b, c, 5.3, 1.37));
        assert!(solid, "face y = {} lost its solid part", face_y);
    }
}

#[test]
fn test_niche_has_side_walls() {
    let mut building = square_building(0.2, 3.0);
    building.walls[0].windows.push(WallWindow::new(2.0, 1.0, 1.0, 1.0));

    let meshes = build_building(&building, &context(CapMode::Earcut)).unwrap();

    let in_niche_depth = |p: &Point3<f64>| p.y <= TOL && p.y >= -0.2 - TOL;
    let jamb = |x: f64| {
        meshes.shell.triangles().any(|tri| {
            tri.iter().all(|p| {
                (p.x - x).abs() < TOL && in_niche_depth(p) && p.z >= 1.0 - TOL && p.z <= 2.0 + TOL
            })
        })
    };
    let sill_or_lintel = |z: f64| {
        meshes.shell.triangles().any(|tri| {
            tri.iter().all(|p| {
                (p.z - z).abs() < TOL && in_niche_depth(p) && p.x >= 2.0 - TOL && p.x <= 3.0 + TOL
            })
        })
    };

    assert!(jamb(2.0), "missing left jamb");
    assert!(jamb(3.0), "missing right jamb");
    assert!(sill_or_lintel(1.0), "missing sill");
    assert!(sill_or_lintel(2.0), "missing lintel");
}

#[test]
fn test_carved_volume_loses_niche_volumes() {
    let (thick, height) = (0.2, 3.0);
    let mut building = square_building(thick, height);
    building.walls[0].windows.push(WallWindow::new(2.0, 1.0, 1.0, 1.0));
    building.walls[1].windows.push(WallWindow::new(4.0, 0.5, 2.0, 1.5));
    building.walls[2].windows.push(WallWindow::new(1.0, 1.0, 1.0, 1.2));
    building.walls[2].windows.push(WallWindow::new(6.0, 1.0, 1.0, 1.2));

    for mode in [CapMode::Earcut, CapMode::Stitched] {
        let ctx = context(mode);
        let shell = build_shell(&building, &ctx).unwrap();
        let carved = build_building(&building, &ctx).unwrap().shell;

        let niches: f64 = building
            .walls
            .iter()
            .flat_map(|w| &w.windows)
            .map(|w| w.width * w.height * thick)
            .sum();

        assert_relative_eq!(shell.volume(), (10.4 * 10.4 - 100.0) * height, epsilon = 1e-3);
        assert_relative_eq!(carved.volume(), shell.volume() - niches, epsilon = 1e-3);
    }
}

#[test]
fn test_carved_shell_buffers_are_consistent() {
    let mut building = square_building(0.2, 3.0);
    building.walls[3].windows.push(WallWindow::new(3.0, 1.0, 2.0, 1.0));

    let shell = build_building(&building, &context(CapMode::Earcut)).unwrap().shell;
    assert_eq!(shell.positions.len(), shell.normals.len());
    assert_eq!(shell.uvs.len() / 2, shell.positions.len() / 3);
    assert!(shell.indices.iter().all(|&i| (i as usize) < shell.vertex_count()));

    // Normals are unit length and agree with the winding
    for tri in shell.indices.chunks_exact(3) {
        let [a, b, c] = [0, 1, 2].map(|k| shell.position(tri[k] as usize));
        let face = (b - a).cross(&(c - a));
        if face.norm() < 1e-6 {
            continue;
        }
        let i = tri[0] as usize * 3;
        let n = Vector3::new(
            shell.normals[i] as f64,
            shell.normals[i + 1] as f64,
            shell.normals[i + 2] as f64,
        );
        assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-4);
        assert!(n.dot(&face) > 0.0);
    }
}

#[test]
fn test_clockwise_plan_carves_the_same_niche() {
    let mut ccw = square_building(0.2, 3.0);
    ccw.walls[0].windows.push(WallWindow::new(2.0, 1.0, 1.0, 1.0));

    // Same loop walked the other way; the window now belongs to the wall
    // running from (10, 0) back to (0, 0)
    let corners = [
        Point2::new(0.0, 10.0),
        Point2::new(10.0, 10.0),
        Point2::new(10.0, 0.0),
        Point2::new(0.0, 0.0),
    ];
    let mut cw = Building::from_corners(&corners, 3.0, 0.2);
    cw.walls[2].windows.push(WallWindow::new(7.0, 1.0, 1.0, 1.0));

    let ctx = context(CapMode::Earcut);
    let a = build_building(&ccw, &ctx).unwrap().shell;
    let b = build_building(&cw, &ctx).unwrap().shell;

    assert_relative_eq!(a.volume(), b.volume(), epsilon = 1e-3);
    let (a_min, a_max) = a.bounds();
    let (b_min, b_max) = b.bounds();
    assert_relative_eq!(a_min, b_min, epsilon = 1e-5);
    assert_relative_eq!(a_max, b_max, epsilon = 1e-5);
}

#[test]
fn test_windows_flush_with_wall_ends() {
    let (thick, height) = (0.2, 3.0);

    // Cutter end faces land on the neighbouring walls' inner face planes
    for left in [0.0, 9.0] {
        let mut building = square_building(thick, height);
        building.walls[0].windows.push(WallWindow::new(left, 1.0, 1.0, 1.0));

        for mode in [CapMode::Earcut, CapMode::Stitched] {
            let ctx = context(mode);
            let shell = build_shell(&building, &ctx).unwrap();
            let carved = build_building(&building, &ctx).unwrap().shell;

            assert_relative_eq!(
                carved.volume(),
                shell.volume() - 1.0 * 1.0 * thick,
                epsilon = 1e-3
            );

            // The corner post beyond the opening is untouched
            let (min, max) = carved.bounds();
            assert_relative_eq!(min.x, -0.2, epsilon = 1e-5);
            assert_relative_eq!(max.x, 10.2, epsilon = 1e-5);
        }
    }
}
