//! Corner table data structure.
//!
//! A corner table stores a triangle mesh as a flat array of corners, three per
//! triangle, together with the opposite corner of each corner. Triangle `t`
//! owns corners `3t`, `3t + 1` and `3t + 2` in winding order, so `next`,
//! `previous` and the owning triangle are pure index arithmetic.
//!
//! # Structure
//!
//! - Each corner maps to the vertex it sits on
//! - Each corner knows its **opposite**: the corner across the edge facing it
//!   in the neighbouring triangle
//! - Each vertex stores one incident corner
//!
//! # Boundary Handling
//!
//! A corner whose facing edge has no neighbouring triangle has the
//! [`CornerId::border`] sentinel as its opposite. The fan of corners around a
//! boundary vertex is open and runs from one border edge to the other.
//!
//! # Local updates
//!
//! [`CornerTable::edge_flip`] and [`CornerTable::split_triangle`] rewrite only the
//! corners they touch. Corner and triangle ids stay stable across both
//! operations; a split appends two triangles and one vertex.

use nalgebra::{Point3, Vector3};

use super::index::{CornerId, MeshIndex, TriangleId, VertexId};
use crate::error::{MeshError, Result};

/// Relative tolerance below which a triangle counts as zero-area.
const AREA_EPSILON: f64 = 1e-12;

/// A corner table for triangle meshes.
#[derive(Debug, Clone)]
pub struct CornerTable<I: MeshIndex = u32> {
    /// Vertex positions.
    pub(crate) positions: Vec<Point3<f64>>,

    /// Vertex of each corner, three consecutive corners per triangle.
    pub(crate) corner_vertex: Vec<VertexId<I>>,

    /// Opposite corner of each corner, or the border sentinel.
    pub(crate) opposite: Vec<CornerId<I>>,

    /// One incident corner per vertex, invalid for isolated vertices.
    pub(crate) vertex_corner: Vec<CornerId<I>>,
}

impl<I: MeshIndex> Default for CornerTable<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> CornerTable<I> {
    /// Create a new empty corner table.
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            corner_vertex: Vec::new(),
            opposite: Vec::new(),
            vertex_corner: Vec::new(),
        }
    }

    /// Create a corner table with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_triangles: usize) -> Self {
        Self {
            positions: Vec::with_capacity(num_vertices),
            corner_vertex: Vec::with_capacity(num_triangles * 3),
            opposite: Vec::with_capacity(num_triangles * 3),
            vertex_corner: Vec::with_capacity(num_vertices),
        }
    }

    /// Build a corner table from flat index and attribute buffers.
    ///
    /// `indices` holds three vertex indices per triangle and `attributes` holds
    /// `attributes_per_vertex` values per vertex, of which the first three are
    /// the x, y and z coordinates. Extra attributes are ignored.
    ///
    /// # Example
    /// ```
    /// use mend::mesh::CornerTable;
    ///
    /// let attributes = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    /// let indices = [0, 1, 2];
    /// let table: CornerTable = CornerTable::from_raw(&indices, &attributes, 1, 3, 3).unwrap();
    /// assert_eq!(table.num_corners(), 3);
    /// assert!(table.corner_opposite(0.into()).is_border());
    /// ```
    pub fn from_raw(
        indices: &[usize],
        attributes: &[f64],
        num_triangles: usize,
        num_vertices: usize,
        attributes_per_vertex: usize,
    ) -> Result<Self> {
        if attributes_per_vertex < 3 {
            return Err(MeshError::invalid_param(
                "attributes_per_vertex",
                attributes_per_vertex,
                "must hold at least x, y and z",
            ));
        }
        if indices.len() < num_triangles * 3 {
            return Err(MeshError::InvalidAttributes {
                details: format!(
                    "{} triangles need {} indices, got {}",
                    num_triangles,
                    num_triangles * 3,
                    indices.len()
                ),
            });
        }
        if attributes.len() < num_vertices * attributes_per_vertex {
            return Err(MeshError::InvalidAttributes {
                details: format!(
                    "{} vertices with {} attributes need {} values, got {}",
                    num_vertices,
                    attributes_per_vertex,
                    num_vertices * attributes_per_vertex,
                    attributes.len()
                ),
            });
        }

        let points: Vec<Point3<f64>> = attributes
            .chunks_exact(attributes_per_vertex)
            .take(num_vertices)
            .map(|a| Point3::new(a[0], a[1], a[2]))
            .collect();
        let faces: Vec<[usize; 3]> = indices
            .chunks_exact(3)
            .take(num_triangles)
            .map(|t| [t[0], t[1], t[2]])
            .collect();

        super::build_from_triangles(&points, &faces)
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.corner_vertex.len() / 3
    }

    /// Get the number of corners.
    #[inline]
    pub fn num_corners(&self) -> usize {
        self.corner_vertex.len()
    }

    /// Check if the table holds no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.corner_vertex.is_empty()
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.positions[v.index()]
    }

    /// All vertex positions, indexed by vertex.
    #[inline]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Flat `x, y, z` attribute buffer, three values per vertex.
    pub fn attributes(&self) -> Vec<f64> {
        self.positions.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
    }

    /// Flat triangle index buffer, three vertex indices per triangle.
    pub fn triangle_list(&self) -> Vec<usize> {
        self.corner_vertex.iter().map(|v| v.index()).collect()
    }

    // ==================== Topology Queries ====================

    /// The triangle owning a corner.
    #[inline]
    pub fn corner_triangle(&self, c: CornerId<I>) -> TriangleId<I> {
        c.triangle()
    }

    /// The opposite corner, or [`CornerId::border`] on a boundary edge.
    #[inline]
    pub fn corner_opposite(&self, c: CornerId<I>) -> CornerId<I> {
        self.opposite[c.index()]
    }

    /// The next corner within the owning triangle.
    #[inline]
    pub fn corner_next(&self, c: CornerId<I>) -> CornerId<I> {
        c.next()
    }

    /// The previous corner within the owning triangle.
    #[inline]
    pub fn corner_previous(&self, c: CornerId<I>) -> CornerId<I> {
        c.prev()
    }

    /// The vertex a corner sits on.
    #[inline]
    pub fn corner_vertex(&self, c: CornerId<I>) -> VertexId<I> {
        self.corner_vertex[c.index()]
    }

    /// One corner incident to a vertex (invalid if the vertex is isolated).
    #[inline]
    pub fn vertex_corner(&self, v: VertexId<I>) -> CornerId<I> {
        self.vertex_corner[v.index()]
    }

    /// The three corners of a triangle, in winding order.
    #[inline]
    pub fn triangle_corners(&self, t: TriangleId<I>) -> [CornerId<I>; 3] {
        t.corners()
    }

    /// The three vertices of a triangle, in winding order.
    pub fn triangle_vertices(&self, t: TriangleId<I>) -> [VertexId<I>; 3] {
        let [c0, c1, c2] = self.triangle_corners(t);
        [self.corner_vertex(c0), self.corner_vertex(c1), self.corner_vertex(c2)]
    }

    /// Check if the edge facing a corner lies on the boundary.
    #[inline]
    pub fn is_border_corner(&self, c: CornerId<I>) -> bool {
        self.corner_opposite(c).is_border()
    }

    /// The ordered fan of corners sharing the vertex of `c`.
    ///
    /// For an interior vertex the fan starts at `c` and closes on itself. For a
    /// boundary vertex it runs from one border edge to the other and contains
    /// `c` somewhere in the middle.
    pub fn corner_neighbours(&self, c: CornerId<I>) -> Vec<CornerId<I>> {
        let limit = self.num_corners();
        let mut fan = vec![c];

        // Swing across the edge shared with the previous corner's vertex.
        let mut current = c;
        loop {
            let across = self.corner_opposite(current.next());
            if across.is_border() {
                break;
            }
            let swung = across.next();
            if swung == c || fan.len() > limit {
                return fan;
            }
            fan.push(swung);
            current = swung;
        }

        // Open fan: walk the other way and prepend.
        let mut backward = Vec::new();
        let mut current = c;
        loop {
            let across = self.corner_opposite(current.prev());
            if across.is_border() || backward.len() > limit {
                break;
            }
            let swung = across.prev();
            backward.push(swung);
            current = swung;
        }

        backward.reverse();
        backward.extend(fan);
        backward
    }

    /// The fan of corners around a vertex (empty for isolated vertices).
    pub fn vertex_corners(&self, v: VertexId<I>) -> Vec<CornerId<I>> {
        let c = self.vertex_corner(v);
        if c.is_valid() {
            self.corner_neighbours(c)
        } else {
            Vec::new()
        }
    }

    /// Iterate over the distinct vertices adjacent to a vertex.
    pub fn vertex_neighbors(&self, v: VertexId<I>) -> Vec<VertexId<I>> {
        let mut neighbors: Vec<VertexId<I>> = Vec::new();
        for c in self.vertex_corners(v) {
            for w in [self.corner_vertex(c.next()), self.corner_vertex(c.prev())] {
                if !neighbors.contains(&w) {
                    neighbors.push(w);
                }
            }
        }
        neighbors
    }

    /// Check if an edge between two vertices exists.
    pub fn has_edge(&self, a: VertexId<I>, b: VertexId<I>) -> bool {
        self.vertex_corners(a).into_iter().any(|c| {
            self.corner_vertex(c.next()) == b || self.corner_vertex(c.prev()) == b
        })
    }

    /// Find a triangle incident to both vertices by intersecting their corner fans.
    pub fn edge_triangle(&self, a: VertexId<I>, b: VertexId<I>) -> Option<TriangleId<I>> {
        let fan_a = self.vertex_corners(a);
        let fan_b = self.vertex_corners(b);
        fan_a
            .iter()
            .map(|&c| c.triangle())
            .find(|&t| fan_b.iter().any(|&c| c.triangle() == t))
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.positions.len()).map(VertexId::new)
    }

    /// Iterate over all corner IDs.
    pub fn corner_ids(&self) -> impl Iterator<Item = CornerId<I>> + '_ {
        (0..self.corner_vertex.len()).map(CornerId::new)
    }

    /// Iterate over all triangle IDs.
    pub fn triangle_ids(&self) -> impl Iterator<Item = TriangleId<I>> + '_ {
        (0..self.num_triangles()).map(TriangleId::new)
    }

    // ==================== Geometry ====================

    /// Get the positions of the three vertices of a triangle.
    pub fn triangle_positions(&self, t: TriangleId<I>) -> [Point3<f64>; 3] {
        let [v0, v1, v2] = self.triangle_vertices(t);
        [*self.position(v0), *self.position(v1), *self.position(v2)]
    }

    /// Unnormalized triangle normal: the cross product of two edge vectors.
    pub fn triangle_normal(&self, t: TriangleId<I>) -> Vector3<f64> {
        let [p0, p1, p2] = self.triangle_positions(t);
        (p1 - p0).cross(&(p2 - p0))
    }

    /// Compute the area of a triangle.
    pub fn triangle_area(&self, t: TriangleId<I>) -> f64 {
        0.5 * self.triangle_normal(t).norm()
    }

    /// Compute the centroid of a triangle.
    pub fn triangle_centroid(&self, t: TriangleId<I>) -> Point3<f64> {
        let [p0, p1, p2] = self.triangle_positions(t);
        Point3::from((p0.coords + p1.coords + p2.coords) / 3.0)
    }

    /// Average length of the edges incident to a vertex (0 for isolated vertices).
    pub fn vertex_average_edge_length(&self, v: VertexId<I>) -> f64 {
        let neighbors = self.vertex_neighbors(v);
        if neighbors.is_empty() {
            return 0.0;
        }
        let p = self.position(v);
        let total: f64 = neighbors.iter().map(|&w| (self.position(w) - p).norm()).sum();
        total / neighbors.len() as f64
    }

    /// Compute the total surface area of the mesh.
    pub fn surface_area(&self) -> f64 {
        self.triangle_ids().map(|t| self.triangle_area(t)).sum()
    }

    /// Compute the bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.positions.first()?;
        let mut min = first;
        let mut max = first;

        for p in &self.positions {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }

        Some((min, max))
    }

    // ==================== Modification ====================

    /// Add a new isolated vertex and return its ID.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId<I> {
        let id = VertexId::new(self.positions.len());
        self.positions.push(position);
        self.vertex_corner.push(CornerId::invalid());
        id
    }

    /// Link two corners as opposites. `b` may be the border sentinel.
    fn link(&mut self, a: CornerId<I>, b: CornerId<I>) {
        self.opposite[a.index()] = b;
        if b.is_valid() {
            self.opposite[b.index()] = a;
        }
    }

    /// Check whether the edge facing `c` can be flipped.
    pub fn is_flippable(&self, c: CornerId<I>) -> bool {
        self.flip_quad(c).is_ok()
    }

    /// Flip the edge facing corner `c`.
    ///
    /// With `c` on vertex `v` in triangle `(v, a, b)` and the opposite corner on
    /// `w` in `(w, b, a)`, the two triangles become `(v, a, w)` and `(w, b, v)`.
    /// Corner `c` keeps its triangle and vertex, as does its opposite.
    ///
    /// # Errors
    ///
    /// Fails without modifying the table if the edge is on the border, if the
    /// new diagonal already exists, or if either new triangle would be
    /// zero-area or inverted.
    pub fn edge_flip(&mut self, c: CornerId<I>) -> Result<()> {
        let FlipQuad { o, v, a, b, w } = self.flip_quad(c)?;

        let n = c.next();
        let p = c.prev();
        let no = o.next();
        let po = o.prev();

        let across_bv = self.opposite[n.index()];
        let across_aw = self.opposite[no.index()];

        self.corner_vertex[p.index()] = w;
        self.corner_vertex[po.index()] = v;

        self.link(c, across_aw);
        self.link(o, across_bv);
        self.link(n, no);

        self.vertex_corner[v.index()] = c;
        self.vertex_corner[a.index()] = n;
        self.vertex_corner[w.index()] = o;
        self.vertex_corner[b.index()] = no;

        Ok(())
    }

    fn flip_quad(&self, c: CornerId<I>) -> Result<FlipQuad<I>> {
        let refuse = |reason| MeshError::EdgeNotFlippable {
            corner: c.index(),
            reason,
        };

        if !c.is_valid() || c.index() >= self.num_corners() {
            return Err(refuse("corner out of range"));
        }
        let o = self.corner_opposite(c);
        if o.is_border() {
            return Err(refuse("border edge"));
        }

        let v = self.corner_vertex(c);
        let a = self.corner_vertex(c.next());
        let b = self.corner_vertex(c.prev());
        let w = self.corner_vertex(o);

        if v == w {
            return Err(refuse("opposite corners share a vertex"));
        }
        if self.has_edge(v, w) {
            return Err(refuse("diagonal already exists"));
        }

        let (pv, pa, pb, pw) = (
            self.position(v),
            self.position(a),
            self.position(b),
            self.position(w),
        );
        let reference = (pa - pv).cross(&(pb - pv)) + (pb - pw).cross(&(pa - pw));
        let first = (pa - pv).cross(&(pw - pv));
        let second = (pb - pw).cross(&(pv - pw));

        let scale = (pa - pv).norm_squared()
            + (pb - pv).norm_squared()
            + (pa - pw).norm_squared()
            + (pb - pw).norm_squared();
        if first.norm() <= AREA_EPSILON * scale || second.norm() <= AREA_EPSILON * scale {
            return Err(MeshError::degenerate(format!(
                "flipping the edge facing corner {} creates a zero-area triangle",
                c.index()
            )));
        }
        if first.dot(&reference) <= 0.0 || second.dot(&reference) <= 0.0 {
            return Err(MeshError::degenerate(format!(
                "flipping the edge facing corner {} inverts a triangle",
                c.index()
            )));
        }

        Ok(FlipQuad { o, v, a, b, w })
    }

    /// Insert a vertex at `point` inside triangle `t`, replacing it with three triangles.
    ///
    /// Triangle `(vi, vj, vk)` becomes `(p, vj, vk)` in place, and `(vi, p, vk)`
    /// and `(vi, vj, p)` are appended. Returns the new vertex.
    ///
    /// # Errors
    ///
    /// Fails without modifying the table if any of the three children would be
    /// zero-area or inverted.
    pub fn split_triangle(&mut self, t: TriangleId<I>, point: Point3<f64>) -> Result<VertexId<I>> {
        if t.index() >= self.num_triangles() {
            return Err(MeshError::invalid_param(
                "triangle",
                t.index(),
                "out of range",
            ));
        }

        let [ci, cj, ck] = t.corners();
        let [vi, vj, vk] = self.triangle_vertices(t);
        let [pi, pj, pk] = self.triangle_positions(t);

        let normal = (pj - pi).cross(&(pk - pi));
        let scale = (pj - pi).norm_squared() + (pk - pj).norm_squared() + (pi - pk).norm_squared();
        let children = [
            (pj - point).cross(&(pk - point)),
            (point - pi).cross(&(pk - pi)),
            (pj - pi).cross(&(point - pi)),
        ];
        if normal.norm() <= AREA_EPSILON * scale
            || children
                .iter()
                .any(|n| n.norm() <= AREA_EPSILON * scale || n.dot(&normal) <= 0.0)
        {
            return Err(MeshError::degenerate(format!(
                "splitting triangle {} produces a zero-area or inverted triangle",
                t.index()
            )));
        }

        let p = self.add_vertex(point);
        let base = self.num_corners();
        let corner = |offset: usize| CornerId::<I>::new(base + offset);

        self.corner_vertex[ci.index()] = p;
        self.corner_vertex.extend_from_slice(&[vi, p, vk, vi, vj, p]);
        self.opposite.extend(std::iter::repeat(CornerId::border()).take(6));

        let across_ki = self.opposite[cj.index()];
        let across_ij = self.opposite[ck.index()];

        self.link(cj, corner(0));
        self.link(ck, corner(3));
        self.link(corner(1), across_ki);
        self.link(corner(2), corner(4));
        self.link(corner(5), across_ij);

        self.vertex_corner[vi.index()] = corner(0);
        self.vertex_corner[p.index()] = ci;
        self.vertex_corner[vj.index()] = cj;
        self.vertex_corner[vk.index()] = ck;

        Ok(p)
    }

    // ==================== Validation ====================

    /// Check if the table is valid (all connectivity is consistent).
    pub fn is_valid(&self) -> bool {
        if self.corner_vertex.len() % 3 != 0
            || self.opposite.len() != self.corner_vertex.len()
            || self.vertex_corner.len() != self.positions.len()
        {
            return false;
        }

        for c in self.corner_ids() {
            if self.corner_vertex(c).index() >= self.num_vertices() {
                return false;
            }
            let o = self.corner_opposite(c);
            if o.is_border() {
                continue;
            }
            if o.index() >= self.num_corners() || self.corner_opposite(o) != c {
                return false;
            }
            // The facing edges must be the same edge traversed in reverse.
            if self.corner_vertex(c.next()) != self.corner_vertex(o.prev())
                || self.corner_vertex(c.prev()) != self.corner_vertex(o.next())
            {
                return false;
            }
        }

        for v in self.vertex_ids() {
            let c = self.vertex_corner(v);
            if c.is_valid() && (c.index() >= self.num_corners() || self.corner_vertex(c) != v) {
                return false;
            }
        }

        true
    }
}

/// The four vertices and opposite corner of a flippable edge.
struct FlipQuad<I: MeshIndex> {
    o: CornerId<I>,
    v: VertexId<I>,
    a: VertexId<I>,
    b: VertexId<I>,
    w: VertexId<I>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_triangles;

    //     2
    //    /|\
    //   / | \
    //  0--+--1  (edge 0-1 is shared)
    //   \ | /
    //    \|/
    //     3
    fn diamond() -> CornerTable {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(1.0, -1.0, 0.0),
        ];
        build_from_triangles(&vertices, &[[0, 1, 2], [1, 0, 3]]).unwrap()
    }

    fn fan(n: usize) -> CornerTable {
        let mut vertices = vec![Point3::origin()];
        for i in 0..n {
            let angle = i as f64 / n as f64 * std::f64::consts::TAU;
            vertices.push(Point3::new(angle.cos(), angle.sin(), 0.0));
        }
        let faces: Vec<[usize; 3]> = (0..n).map(|i| [0, 1 + i, 1 + (i + 1) % n]).collect();
        build_from_triangles(&vertices, &faces).unwrap()
    }

    #[test]
    fn test_empty_table() {
        let table = CornerTable::<u32>::new();
        assert!(table.is_empty());
        assert_eq!(table.num_vertices(), 0);
        assert!(table.is_valid());
        assert!(table.bounding_box().is_none());
    }

    #[test]
    fn test_from_raw_with_extra_attributes() {
        // x, y, z, u, v per vertex
        let attributes = [
            0.0, 0.0, 0.0, 9.0, 9.0, //
            1.0, 0.0, 0.0, 9.0, 9.0, //
            0.0, 1.0, 0.0, 9.0, 9.0,
        ];
        let table: CornerTable = CornerTable::from_raw(&[0, 1, 2], &attributes, 1, 3, 5).unwrap();
        assert_eq!(table.num_vertices(), 3);
        assert_eq!(table.position(VertexId::new(2)), &Point3::new(0.0, 1.0, 0.0));
        assert_eq!(table.attributes().len(), 9);
        assert_eq!(table.triangle_list(), vec![0, 1, 2]);
    }

    #[test]
    fn test_from_raw_rejects_short_buffers() {
        let result = CornerTable::<u32>::from_raw(&[0, 1], &[0.0; 9], 1, 3, 3);
        assert!(matches!(result, Err(MeshError::InvalidAttributes { .. })));

        let result = CornerTable::<u32>::from_raw(&[0, 1, 2], &[0.0; 6], 1, 3, 3);
        assert!(matches!(result, Err(MeshError::InvalidAttributes { .. })));

        let result = CornerTable::<u32>::from_raw(&[0, 1, 2], &[0.0; 6], 1, 3, 2);
        assert!(matches!(result, Err(MeshError::InvalidParameter { .. })));
    }

    #[test]
    fn test_opposites() {
        let table = diamond();
        assert!(table.is_valid());

        // Corner 2 sits on vertex 2 and faces edge 0-1; its opposite sits on vertex 3.
        let o = table.corner_opposite(CornerId::new(2));
        assert_eq!(table.corner_vertex(o).index(), 3);
        assert_eq!(table.corner_opposite(o), CornerId::new(2));

        let borders = table.corner_ids().filter(|&c| table.is_border_corner(c)).count();
        assert_eq!(borders, 4);
    }

    #[test]
    fn test_corner_neighbours_closed_fan() {
        let table = fan(6);
        let centre = VertexId::new(0);
        let ring = table.corner_neighbours(table.vertex_corner(centre));
        assert_eq!(ring.len(), 6);
        assert!(ring.iter().all(|&c| table.corner_vertex(c) == centre));
        assert_eq!(table.vertex_neighbors(centre).len(), 6);
        assert!((table.vertex_average_edge_length(centre) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_corner_neighbours_open_fan() {
        let table = diamond();
        // Vertex 0 has two triangles; whichever corner we start from, both are found.
        for start in table.vertex_corners(VertexId::new(0)) {
            let ring = table.corner_neighbours(start);
            assert_eq!(ring.len(), 2);
            assert!(ring.contains(&start));
        }
        assert_eq!(table.vertex_neighbors(VertexId::new(0)).len(), 3);
    }

    #[test]
    fn test_edge_triangle() {
        let table = diamond();
        let t = table.edge_triangle(VertexId::new(0), VertexId::new(2)).unwrap();
        assert_eq!(t.index(), 0);
        let t = table.edge_triangle(VertexId::new(1), VertexId::new(3)).unwrap();
        assert_eq!(t.index(), 1);
        assert!(table.edge_triangle(VertexId::new(2), VertexId::new(3)).is_none());
    }

    #[test]
    fn test_edge_flip_two_triangles() {
        let mut table = diamond();
        let c = CornerId::new(2);
        assert!(table.is_flippable(c));
        table.edge_flip(c).unwrap();

        assert!(table.is_valid());
        assert!(table.has_edge(VertexId::new(2), VertexId::new(3)));
        assert!(!table.has_edge(VertexId::new(0), VertexId::new(1)));
        assert!((table.surface_area() - 2.0).abs() < 1e-12);

        // Normals keep pointing the same way.
        for t in table.triangle_ids() {
            assert!(table.triangle_normal(t).z > 0.0);
        }

        // Corner 0 now faces the new diagonal; flipping it restores the first diagonal.
        assert_eq!(table.corner_vertex(CornerId::new(0)).index(), 0);
        table.edge_flip(CornerId::new(0)).unwrap();
        assert!(table.is_valid());
        assert!(table.has_edge(VertexId::new(0), VertexId::new(1)));
    }

    #[test]
    fn test_edge_flip_rejects_border() {
        let mut table = diamond();
        let result = table.edge_flip(CornerId::new(0));
        assert!(matches!(result, Err(MeshError::EdgeNotFlippable { .. })));
        assert!(table.is_valid());
    }

    #[test]
    fn test_edge_flip_rejects_inversion() {
        // Reflex quad: the other diagonal lies outside.
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(2.5, -0.1, 0.0),
        ];
        let mut table: CornerTable = build_from_triangles(&vertices, &[[0, 1, 2], [1, 0, 3]]).unwrap();
        let before = table.triangle_list();
        let result = table.edge_flip(CornerId::new(2));
        assert!(matches!(result, Err(MeshError::DegenerateGeometry { .. })));
        assert_eq!(table.triangle_list(), before);
    }

    #[test]
    fn test_edge_flip_rejects_existing_diagonal() {
        // Closed tetrahedron: every diagonal already exists.
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = [[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        let table: CornerTable = build_from_triangles(&vertices, &faces).unwrap();
        assert!(table.corner_ids().all(|c| !table.is_flippable(c)));
    }

    #[test]
    fn test_split_triangle() {
        let mut table = diamond();
        let centroid = table.triangle_centroid(TriangleId::new(0));
        let p = table.split_triangle(TriangleId::new(0), centroid).unwrap();

        assert_eq!(p.index(), 4);
        assert_eq!(table.num_triangles(), 4);
        assert!(table.is_valid());
        assert!((table.surface_area() - 2.0).abs() < 1e-12);
        assert_eq!(table.vertex_neighbors(p).len(), 3);

        // The shared edge still links to the lower triangle.
        assert!(table.edge_triangle(VertexId::new(0), VertexId::new(1)).is_some());
        let interior = table
            .corner_ids()
            .filter(|&c| !table.is_border_corner(c))
            .count();
        assert_eq!(interior, 8);
    }

    #[test]
    fn test_split_rejects_outside_point() {
        let mut table = diamond();
        let result = table.split_triangle(TriangleId::new(0), Point3::new(5.0, 5.0, 0.0));
        assert!(matches!(result, Err(MeshError::DegenerateGeometry { .. })));
        assert_eq!(table.num_vertices(), 4);
        assert!(table.is_valid());
    }
}
