//! Hole boundary extraction.
//!
//! A hole is bordered by a cycle of boundary edges: edges whose corner has no
//! opposite corner. [`extract_hole_boundaries`] walks the triangles once,
//! collects every boundary edge as a directed `origin -> destination` pair in
//! mesh winding order, and chains those pairs into loops.
//!
//! Each loop is reported reversed with respect to the surrounding triangles,
//! so a triangle `(loop[i], loop[j], loop[k])` with `i < j < k` has the same
//! orientation as the mesh around it.
//!
//! # Example
//!
//! ```
//! use mend::prelude::*;
//! use nalgebra::Point3;
//!
//! // A square made of two triangles has a single boundary loop of four vertices.
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let table: CornerTable = build_from_triangles(&vertices, &[[0, 1, 2], [0, 2, 3]]).unwrap();
//!
//! let loops = extract_hole_boundaries(&table).unwrap();
//! assert_eq!(loops.len(), 1);
//! assert_eq!(loops[0].len(), 4);
//! ```

use std::collections::{BTreeMap, VecDeque};

use log::{debug, trace};

use crate::error::{MeshError, Result};
use crate::mesh::{CornerTable, MeshIndex, TriangleId, VertexId};

/// An ordered, cyclic loop of vertices bordering a hole.
///
/// Every consecutive pair (wrapping around) is a boundary edge of the mesh the
/// loop was extracted from. The loop has at least three vertices and no repeats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoleBoundary<I: MeshIndex = u32> {
    vertices: Vec<VertexId<I>>,
}

impl<I: MeshIndex> HoleBoundary<I> {
    /// Create a loop from vertices already known to form a boundary cycle.
    ///
    /// # Errors
    ///
    /// Fails if fewer than three vertices are given or a vertex repeats.
    pub fn new(vertices: Vec<VertexId<I>>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(MeshError::invalid_param(
                "boundary length",
                vertices.len(),
                "a hole needs at least three vertices",
            ));
        }
        for (i, v) in vertices.iter().enumerate() {
            if vertices[..i].contains(v) {
                return Err(MeshError::NonManifoldBoundary { vertex: v.index() });
            }
        }
        Ok(Self { vertices })
    }

    /// Number of vertices (and edges) in the loop.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false: a loop has at least three vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The loop vertices in order.
    #[inline]
    pub fn vertices(&self) -> &[VertexId<I>] {
        &self.vertices
    }

    /// The vertex at loop position `i`.
    #[inline]
    pub fn vertex(&self, i: usize) -> VertexId<I> {
        self.vertices[i]
    }

    /// Iterate over the loop edges `(v_i, v_{i+1})`, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId<I>, VertexId<I>)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Positions of the loop vertices in `mesh`.
    pub fn positions(&self, mesh: &CornerTable<I>) -> Vec<nalgebra::Point3<f64>> {
        self.vertices.iter().map(|&v| *mesh.position(v)).collect()
    }
}

/// Find every hole boundary loop of a mesh.
///
/// The mesh must be a single connected, manifold component. A mesh without
/// triangles, or without boundary edges, has no holes.
///
/// Loops are returned in ascending order of the smallest boundary vertex that
/// starts their chain, so identical input always yields identical output.
///
/// # Errors
///
/// - [`MeshError::Disconnected`] if some triangle is unreachable from triangle 0
/// - [`MeshError::NonManifoldBoundary`] if a vertex starts two boundary edges or
///   a loop has fewer than three vertices
/// - [`MeshError::OpenBoundary`] if a chain of boundary edges does not close
pub fn extract_hole_boundaries<I: MeshIndex>(mesh: &CornerTable<I>) -> Result<Vec<HoleBoundary<I>>> {
    if mesh.is_empty() {
        return Ok(Vec::new());
    }

    let edges = collect_boundary_edges(mesh)?;
    debug!("Found {} boundary edges", edges.len());

    let loops = chain_boundary_edges(edges)?;
    debug!(
        "Extracted {} hole boundaries, sizes: {:?}",
        loops.len(),
        loops.iter().map(|l| l.len()).collect::<Vec<_>>()
    );

    Ok(loops)
}

/// Breadth-first walk over triangles recording each boundary edge by origin.
fn collect_boundary_edges<I: MeshIndex>(mesh: &CornerTable<I>) -> Result<BTreeMap<usize, usize>> {
    let num_triangles = mesh.num_triangles();
    let mut visited = vec![false; num_triangles];
    let mut visited_count = 0;
    let mut queue: VecDeque<TriangleId<I>> = VecDeque::new();
    let mut edges: BTreeMap<usize, usize> = BTreeMap::new();

    queue.push_back(TriangleId::new(0));

    while let Some(t) = queue.pop_front() {
        if visited[t.index()] {
            continue;
        }
        visited[t.index()] = true;
        visited_count += 1;

        for c in t.corners() {
            let o = mesh.corner_opposite(c);
            if o.is_valid() {
                queue.push_back(mesh.corner_triangle(o));
                continue;
            }

            let origin = mesh.corner_vertex(mesh.corner_next(c)).index();
            let destination = mesh.corner_vertex(mesh.corner_previous(c)).index();
            if edges.insert(origin, destination).is_some() {
                return Err(MeshError::NonManifoldBoundary { vertex: origin });
            }
        }
    }

    if visited_count != num_triangles {
        return Err(MeshError::Disconnected {
            visited: visited_count,
            total: num_triangles,
        });
    }

    Ok(edges)
}

/// Consume the `origin -> destination` map into closed loops.
///
/// Around every vertex of an edge-manifold mesh the boundary edges leaving it
/// match the ones arriving, so with at most one edge leaving each vertex every
/// chain closes. `OpenBoundary` only guards maps that break that balance.
fn chain_boundary_edges<I: MeshIndex>(mut edges: BTreeMap<usize, usize>) -> Result<Vec<HoleBoundary<I>>> {
    let mut loops = Vec::new();

    while let Some((start, first)) = edges.pop_first() {
        let mut chain = vec![VertexId::new(start)];
        let mut current = first;
        while current != start {
            let next = edges
                .remove(&current)
                .ok_or(MeshError::OpenBoundary { vertex: start })?;
            chain.push(VertexId::new(current));
            current = next;
        }

        if chain.len() < 3 {
            return Err(MeshError::NonManifoldBoundary { vertex: start });
        }

        chain.reverse();
        trace!("Boundary loop from vertex {} with {} vertices", start, chain.len());
        loops.push(HoleBoundary { vertices: chain });
    }

    Ok(loops)
}
