//! Corner table construction utilities.
//!
//! This module builds corner tables from face-vertex lists, as produced by
//! mesh loaders or by the hole triangulator, and converts them back.

use std::collections::HashMap;

use nalgebra::Point3;

use super::corner_table::CornerTable;
use super::index::{CornerId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// Build a corner table from vertices and triangle faces.
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `faces` - List of triangles, each as [v0, v1, v2] indices with consistent winding
///
/// # Returns
/// A corner table, or an error if the input is invalid. An empty face list
/// yields a table with isolated vertices only.
///
/// # Example
/// ```
/// use mend::mesh::{build_from_triangles, CornerTable};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
///
/// let table: CornerTable = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(table.num_vertices(), 3);
/// assert_eq!(table.num_triangles(), 1);
/// ```
pub fn build_from_triangles<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> Result<CornerTable<I>> {
    // Validate vertex indices
    for (ti, face) in faces.iter().enumerate() {
        for &vi in face {
            if vi >= vertices.len() {
                return Err(MeshError::InvalidVertexIndex {
                    triangle: ti,
                    vertex: vi,
                });
            }
        }
        if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
            return Err(MeshError::DegenerateFace { triangle: ti });
        }
    }

    let mut table = CornerTable::with_capacity(vertices.len(), faces.len());
    for &p in vertices {
        table.add_vertex(p);
    }

    // Directed edge facing each corner: (vertex of next, vertex of previous).
    let mut facing: HashMap<(usize, usize), CornerId<I>> = HashMap::with_capacity(faces.len() * 3);

    for face in faces {
        for slot in 0..3 {
            let c = CornerId::<I>::new(table.corner_vertex.len());
            let v = face[slot];
            table.corner_vertex.push(VertexId::new(v));
            table.opposite.push(CornerId::border());
            table.vertex_corner[v] = c;

            let edge = (face[(slot + 1) % 3], face[(slot + 2) % 3]);
            if facing.insert(edge, c).is_some() {
                return Err(MeshError::NonManifoldEdge {
                    v0: edge.0,
                    v1: edge.1,
                });
            }
        }
    }

    // Link opposites through the reversed edge.
    for (&(a, b), &c) in &facing {
        if let Some(&o) = facing.get(&(b, a)) {
            table.opposite[c.index()] = o;
        }
    }

    Ok(table)
}

/// Convert a corner table back to a face-vertex representation.
///
/// Returns (vertices, faces) tuple.
pub fn to_face_vertex<I: MeshIndex>(table: &CornerTable<I>) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let vertices = table.positions().to_vec();

    let faces: Vec<[usize; 3]> = table
        .triangle_ids()
        .map(|t| {
            let [v0, v1, v2] = table.triangle_vertices(t);
            [v0.index(), v1.index(), v2.index()]
        })
        .collect();

    (vertices, faces)
}
