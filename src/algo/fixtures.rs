//! Test meshes shared by the algorithm tests.

use std::f64::consts::TAU;

use nalgebra::Point3;

use crate::mesh::{build_from_triangles, CornerTable};

/// Planar grid faces for an `n` x `n` cell grid, skipping listed cells and
/// listed single triangles (`(i, j, 0)` is the lower triangle of cell `(i, j)`).
fn grid_faces(n: usize, skip_cells: &[(usize, usize)], skip_triangles: &[(usize, usize, usize)]) -> Vec<[usize; 3]> {
    let mut faces = Vec::new();
    for j in 0..n {
        for i in 0..n {
            if skip_cells.contains(&(i, j)) {
                continue;
            }
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;

            if !skip_triangles.contains(&(i, j, 0)) {
                faces.push([v00, v10, v11]);
            }
            if !skip_triangles.contains(&(i, j, 1)) {
                faces.push([v00, v11, v01]);
            }
        }
    }
    faces
}

fn grid_vertices(n: usize) -> Vec<Point3<f64>> {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    for j in 0..=n {
        for i in 0..=n {
            vertices.push(Point3::new(i as f64, j as f64, 0.0));
        }
    }
    vertices
}

/// A planar unit grid of `n` x `n` cells. Its only boundary is the outer border.
pub fn grid(n: usize) -> CornerTable {
    build_from_triangles(&grid_vertices(n), &grid_faces(n, &[], &[])).unwrap()
}

/// A planar grid with some cells and single triangles removed.
pub fn grid_with_holes(
    n: usize,
    skip_cells: &[(usize, usize)],
    skip_triangles: &[(usize, usize, usize)],
) -> CornerTable {
    build_from_triangles(&grid_vertices(n), &grid_faces(n, skip_cells, skip_triangles)).unwrap()
}

/// A unit box missing its top face: one square hole at z = 1.
pub fn open_box() -> CornerTable {
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(1.0, 0.0, 1.0),
        Point3::new(1.0, 1.0, 1.0),
        Point3::new(0.0, 1.0, 1.0),
    ];
    let faces = vec![
        [0, 2, 1],
        [0, 3, 2],
        [0, 1, 5],
        [0, 5, 4],
        [1, 2, 6],
        [1, 6, 5],
        [2, 3, 7],
        [2, 7, 6],
        [3, 0, 4],
        [3, 4, 7],
    ];
    build_from_triangles(&vertices, &faces).unwrap()
}

/// A closed drum with one hole of `n` vertices in its top.
///
/// Vertices `0..n` form the hole rim (radius 1, height `rim_height(i)`),
/// `n..2n` the top outer ring (radius 2, z = 0), `2n..3n` the bottom ring
/// (radius 2, z = -1) and `3n` the bottom centre. The extracted loop is
/// `[1, 2, .., n - 1, 0]`.
pub fn drum(n: usize, rim_height: impl Fn(usize) -> f64) -> CornerTable {
    let mut vertices = Vec::with_capacity(3 * n + 1);
    for i in 0..n {
        let angle = i as f64 / n as f64 * TAU;
        vertices.push(Point3::new(angle.cos(), angle.sin(), rim_height(i)));
    }
    for z in [0.0, -1.0] {
        for i in 0..n {
            let angle = i as f64 / n as f64 * TAU;
            vertices.push(Point3::new(2.0 * angle.cos(), 2.0 * angle.sin(), z));
        }
    }
    vertices.push(Point3::new(0.0, 0.0, -1.0));

    let mut faces = Vec::with_capacity(5 * n);
    for i in 0..n {
        let i1 = (i + 1) % n;
        faces.push([i, n + i, n + i1]);
        faces.push([i, n + i1, i1]);
        faces.push([n + i, 2 * n + i, 2 * n + i1]);
        faces.push([n + i, 2 * n + i1, n + i1]);
        faces.push([3 * n, 2 * n + i1, 2 * n + i]);
    }
    build_from_triangles(&vertices, &faces).unwrap()
}

/// A planar drum: the hole rim lies in the top plane.
pub fn flat_drum(n: usize) -> CornerTable {
    drum(n, |_| 0.0)
}
