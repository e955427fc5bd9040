//! Hole patches.
//!
//! A [`Patch`] is a small, self-contained corner table that caps one hole. Its
//! first `n` vertices are copies of the hole's boundary vertices, in loop order,
//! so local vertex `i` stands for `boundary[i]` in the source mesh. Vertices
//! inserted by refinement follow.
//!
//! Every patch vertex carries a target edge-length scale. Boundary vertices take
//! the average length of their incident edges in the source mesh; refinement
//! assigns interior vertices the mean scale of the triangle they split.

use crate::algo::boundary::HoleBoundary;
use crate::error::{MeshError, Result};
use crate::mesh::{build_from_triangles, CornerTable, MeshIndex, VertexId};

/// A triangulated cap for one hole.
#[derive(Debug, Clone)]
pub struct Patch<I: MeshIndex = u32> {
    table: CornerTable<I>,
    boundary: HoleBoundary<I>,
    scales: Vec<f64>,
}

impl<I: MeshIndex> Patch<I> {
    /// Assemble a patch from its parts.
    ///
    /// # Errors
    ///
    /// Fails if the table has fewer vertices than the boundary, or if there is
    /// not exactly one scale per table vertex.
    pub fn new(table: CornerTable<I>, boundary: HoleBoundary<I>, scales: Vec<f64>) -> Result<Self> {
        if table.num_vertices() < boundary.len() {
            return Err(MeshError::InvalidAttributes {
                details: format!(
                    "patch has {} vertices but caps a hole of {}",
                    table.num_vertices(),
                    boundary.len()
                ),
            });
        }
        if scales.len() != table.num_vertices() {
            return Err(MeshError::InvalidAttributes {
                details: format!(
                    "{} scales for {} patch vertices",
                    scales.len(),
                    table.num_vertices()
                ),
            });
        }
        Ok(Self {
            table,
            boundary,
            scales,
        })
    }

    /// Build the minimal patch for a hole from a triangulation of its loop.
    ///
    /// `triangles` index into the boundary loop, as returned by
    /// [`min_weight_triangulation`](crate::algo::triangulate::min_weight_triangulation).
    pub fn from_triangulation(
        mesh: &CornerTable<I>,
        boundary: &HoleBoundary<I>,
        triangles: &[[usize; 3]],
    ) -> Result<Self> {
        let positions = boundary.positions(mesh);
        let table = build_from_triangles(&positions, triangles)?;
        let scales = boundary
            .vertices()
            .iter()
            .map(|&v| mesh.vertex_average_edge_length(v))
            .collect();

        Self::new(table, boundary.clone(), scales)
    }

    /// The patch connectivity and geometry.
    #[inline]
    pub fn table(&self) -> &CornerTable<I> {
        &self.table
    }

    /// The hole this patch caps.
    #[inline]
    pub fn boundary(&self) -> &HoleBoundary<I> {
        &self.boundary
    }

    /// Target edge-length scale of each patch vertex.
    #[inline]
    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    /// Number of vertices shared with the source mesh.
    #[inline]
    pub fn num_boundary_vertices(&self) -> usize {
        self.boundary.len()
    }

    /// Number of vertices inserted inside the hole.
    #[inline]
    pub fn num_interior_vertices(&self) -> usize {
        self.table.num_vertices() - self.boundary.len()
    }

    /// The source vertex a patch vertex stands for, or `None` for interior vertices.
    pub fn source_vertex(&self, local: VertexId<I>) -> Option<VertexId<I>> {
        self.boundary.vertices().get(local.index()).copied()
    }

    /// Split the patch into its table, boundary and scales.
    pub fn into_parts(self) -> (CornerTable<I>, HoleBoundary<I>, Vec<f64>) {
        (self.table, self.boundary, self.scales)
    }

    pub(crate) fn table_and_scales_mut(&mut self) -> (&mut CornerTable<I>, &mut Vec<f64>) {
        (&mut self.table, &mut self.scales)
    }
}
