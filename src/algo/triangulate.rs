//! Minimum-weight hole triangulation.
//!
//! A hole loop of `n` vertices is capped with `n - 2` triangles chosen by a
//! dynamic program over the cyclic boundary sequence. Every candidate triangle
//! `(i, j, k)` with `i < j < k` is scored by a [`DihedralAngleWeight`]: the
//! largest dihedral angle it forms with its neighbours, then its area. The
//! neighbours are the source-mesh triangles along the boundary edges and
//! the triangles already chosen for the sub-polygons on either side.
//!
//! The program runs in O(n³) time and O(n²) memory.
//!
//! # Example
//!
//! ```
//! use mend::prelude::*;
//! use nalgebra::Point3;
//!
//! // An open box: the missing lid is a square hole of four vertices.
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(0.0, 0.0, 1.0),
//!     Point3::new(1.0, 0.0, 1.0),
//!     Point3::new(1.0, 1.0, 1.0),
//!     Point3::new(0.0, 1.0, 1.0),
//! ];
//! let faces = vec![
//!     [0, 2, 1], [0, 3, 2],
//!     [0, 1, 5], [0, 5, 4],
//!     [1, 2, 6], [1, 6, 5],
//!     [2, 3, 7], [2, 7, 6],
//!     [3, 0, 4], [3, 4, 7],
//! ];
//! let table: CornerTable = build_from_triangles(&vertices, &faces).unwrap();
//! let hole = &extract_hole_boundaries(&table).unwrap()[0];
//!
//! let triangles = min_weight_triangulation(&table, hole).unwrap();
//! assert_eq!(triangles.len(), 2);
//! ```

use std::f64::consts::PI;
use std::ops::Add;

use log::trace;
use nalgebra::{Point3, Vector3};

use crate::algo::boundary::HoleBoundary;
use crate::algo::patch::Patch;
use crate::error::{MeshError, Result};
use crate::mesh::{CornerTable, MeshIndex};

/// Cost of a triangle in a hole triangulation.
///
/// Weights compare lexicographically, angle first, and add component-wise.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct DihedralAngleWeight {
    /// Largest dihedral angle against a neighbouring triangle, in radians.
    pub angle: f64,
    /// Triangle area.
    pub area: f64,
}

impl DihedralAngleWeight {
    /// The weight of an empty triangulation.
    pub const ZERO: Self = Self {
        angle: 0.0,
        area: 0.0,
    };

    /// Create a weight from an angle and an area.
    pub fn new(angle: f64, area: f64) -> Self {
        Self { angle, area }
    }
}

impl Add for DihedralAngleWeight {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            angle: self.angle + rhs.angle,
            area: self.area + rhs.area,
        }
    }
}

/// Angle between two triangle normals, in `[0, π]`.
///
/// The normals need not be unit length. A zero normal belongs to a degenerate
/// triangle and scores `π`.
pub fn dihedral_angle(n1: &Vector3<f64>, n2: &Vector3<f64>) -> f64 {
    match (n1.try_normalize(0.0), n2.try_normalize(0.0)) {
        (Some(a), Some(b)) => a.dot(&b).clamp(-1.0, 1.0).acos(),
        _ => PI,
    }
}

/// Compute the minimum-weight triangulation of a hole loop.
///
/// Returns `n - 2` triangles as index triples into the loop, each with the same
/// orientation as the surrounding mesh. A three-vertex loop yields `[0, 1, 2]`.
///
/// # Errors
///
/// - [`MeshError::InvalidParameter`] for loops shorter than three vertices
/// - [`MeshError::MissingIncidentTriangle`] if a loop edge has no source triangle
pub fn min_weight_triangulation<I: MeshIndex>(
    mesh: &CornerTable<I>,
    boundary: &HoleBoundary<I>,
) -> Result<Vec<[usize; 3]>> {
    let n = boundary.len();
    if n < 3 {
        return Err(MeshError::invalid_param(
            "boundary length",
            n,
            "a hole needs at least three vertices",
        ));
    }
    if n == 3 {
        return Ok(vec![[0, 1, 2]]);
    }

    let weighting = HoleWeighting::new(mesh, boundary)?;
    let table = DpTable::solve(&weighting);
    trace!(
        "Hole of {} vertices triangulated with weight {:?}",
        n,
        table.weight(0, n - 1)
    );

    Ok(table.triangles())
}

/// Triangulate a hole and build its minimal patch.
pub fn triangulate_hole<I: MeshIndex>(mesh: &CornerTable<I>, boundary: &HoleBoundary<I>) -> Result<Patch<I>> {
    let triangles = min_weight_triangulation(mesh, boundary)?;
    Patch::from_triangulation(mesh, boundary, &triangles)
}

// ==================== Weighting ====================

/// Geometry needed to score candidate triangles of one hole.
struct HoleWeighting {
    points: Vec<Point3<f64>>,
    /// Normal of the source triangle on loop edge `(i, i + 1)`; the last entry
    /// belongs to the closing edge `(n - 1, 0)`.
    edge_normals: Vec<Vector3<f64>>,
}

impl HoleWeighting {
    fn new<I: MeshIndex>(mesh: &CornerTable<I>, boundary: &HoleBoundary<I>) -> Result<Self> {
        let edge_normals = boundary
            .edges()
            .map(|(a, b)| {
                mesh.edge_triangle(a, b)
                    .map(|t| mesh.triangle_normal(t))
                    .ok_or(MeshError::MissingIncidentTriangle {
                        v0: a.index(),
                        v1: b.index(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            points: boundary.positions(mesh),
            edge_normals,
        })
    }

    #[inline]
    fn len(&self) -> usize {
        self.points.len()
    }

    fn normal(&self, i: usize, j: usize, k: usize) -> Vector3<f64> {
        let (pi, pj, pk) = (self.points[i], self.points[j], self.points[k]);
        (pj - pi).cross(&(pk - pi))
    }

    /// Normal of the triangle across span `(a, b)`: the source triangle for an
    /// edge of the hole loop, otherwise the chosen triangle `(a, apex, b)`.
    fn side_normal(&self, a: usize, b: usize, apex: Option<usize>) -> Vector3<f64> {
        match apex {
            Some(m) => self.normal(a, m, b),
            None => self.edge_normals[a],
        }
    }

    /// Score triangle `(i, j, k)` given the apexes chosen below its two sides.
    fn weight(
        &self,
        i: usize,
        j: usize,
        k: usize,
        left_apex: Option<usize>,
        right_apex: Option<usize>,
    ) -> DihedralAngleWeight {
        let normal = self.normal(i, j, k);
        let area = 0.5 * normal.norm();

        let mut angle = dihedral_angle(&normal, &self.side_normal(i, j, left_apex));
        angle = angle.max(dihedral_angle(&normal, &self.side_normal(j, k, right_apex)));

        let n = self.len();
        if i == 0 && k == n - 1 {
            angle = angle.max(dihedral_angle(&normal, &self.edge_normals[n - 1]));
        }

        DihedralAngleWeight::new(angle, area)
    }
}

// ==================== Dynamic Program ====================

/// Optimal weights and apexes for every sub-polygon `(i, k)`, `i < k`.
struct DpTable {
    n: usize,
    weights: Vec<DihedralAngleWeight>,
    apexes: Vec<Option<usize>>,
}

enum Frame {
    Visit(usize, usize),
    Emit([usize; 3]),
}

impl DpTable {
    fn solve(weighting: &HoleWeighting) -> Self {
        let n = weighting.len();
        let mut table = Self {
            n,
            weights: vec![DihedralAngleWeight::ZERO; n * n],
            apexes: vec![None; n * n],
        };

        for width in 2..n {
            for i in 0..n - width {
                let k = i + width;
                let mut best: Option<(DihedralAngleWeight, usize)> = None;

                for m in i + 1..k {
                    let candidate = table.weight(i, m)
                        + table.weight(m, k)
                        + weighting.weight(i, m, k, table.apex(i, m), table.apex(m, k));
                    if best.map_or(true, |(w, _)| candidate < w) {
                        best = Some((candidate, m));
                    }
                }

                if let Some((w, m)) = best {
                    table.weights[i * n + k] = w;
                    table.apexes[i * n + k] = Some(m);
                }
            }
        }

        table
    }

    #[inline]
    fn weight(&self, i: usize, k: usize) -> DihedralAngleWeight {
        self.weights[i * self.n + k]
    }

    #[inline]
    fn apex(&self, i: usize, k: usize) -> Option<usize> {
        self.apexes[i * self.n + k]
    }

    /// Walk the apex table from `(0, n - 1)`, emitting the left sub-polygon,
    /// then the triangle itself, then the right sub-polygon.
    fn triangles(&self) -> Vec<[usize; 3]> {
        let mut triangles = Vec::with_capacity(self.n.saturating_sub(2));
        let mut stack = vec![Frame::Visit(0, self.n - 1)];

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Emit(t) => triangles.push(t),
                Frame::Visit(i, k) => {
                    if let Some(m) = self.apex(i, k) {
                        stack.push(Frame::Visit(m, k));
                        stack.push(Frame::Emit([i, m, k]));
                        stack.push(Frame::Visit(i, m));
                    }
                }
            }
        }

        triangles
    }
}
