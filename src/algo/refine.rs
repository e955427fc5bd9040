//! Density-driven patch refinement.
//!
//! A minimal patch has only the hole's boundary vertices, so its triangles are
//! usually much larger than those of the surrounding surface. Refinement
//! repeatedly splits oversized triangles at their centroids and relaxes the
//! result with edge flips, until every triangle is small relative to the
//! target edge-length scale of its vertices.
//!
//! # Algorithm
//!
//! Each iteration:
//!
//! 1. **Split**: every triangle present at the start of the pass whose centroid
//!    is far from all three vertices is split at the centroid
//! 2. **Local relaxation**: edges facing each new vertex are flipped if the
//!    flip guard accepts them
//! 3. **Global relaxation**: sweeps over every corner flip accepted edges
//!    until a sweep flips nothing
//!
//! Iteration stops when a split pass splits nothing.
//!
//! # Example
//!
//! ```
//! use mend::prelude::*;
//! use nalgebra::Point3;
//!
//! // A ring of six triangles around a large triangular hole.
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(8.0, 0.0, 0.0),
//!     Point3::new(4.0, 7.0, 0.0),
//!     Point3::new(-3.0, -2.0, 0.0),
//!     Point3::new(11.0, -2.0, 0.0),
//!     Point3::new(4.0, 11.0, 0.0),
//! ];
//! let faces = vec![[0, 3, 4], [0, 4, 1], [1, 4, 5], [1, 5, 2], [2, 5, 3], [2, 3, 0]];
//! let table: CornerTable = build_from_triangles(&vertices, &faces).unwrap();
//!
//! // The inner loop is found first; the outer border is the second loop.
//! let hole = &extract_hole_boundaries(&table).unwrap()[0];
//! let (cap, boundary, _) = triangulate_hole(&table, hole).unwrap().into_parts();
//!
//! // Ask for edges of roughly unit length inside the hole.
//! let mut patch = Patch::new(cap, boundary, vec![1.0; 3]).unwrap();
//! let stats = refine_patch(&mut patch, &RefineOptions::default()).unwrap();
//! assert!(stats.splits > 0);
//! assert!(patch.table().is_valid());
//! ```

use std::f64::consts::PI;

use log::{debug, trace, warn};

use crate::algo::patch::Patch;
use crate::error::{MeshError, Result};
use crate::mesh::{CornerId, CornerTable, MeshIndex, TriangleId, VertexId};

/// Angle-sum slack before an edge counts as non-Delaunay.
const DELAUNAY_TOLERANCE: f64 = 1e-10;

/// Which edges relaxation flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlipGuard {
    /// Flip an edge only if the two angles facing it sum to more than π, so
    /// each flip moves the patch towards a Delaunay triangulation.
    #[default]
    Delaunay,
    /// Flip every flippable edge. Sweeps never settle, so relaxation always
    /// runs until `max_relaxation_sweeps`.
    Always,
}

/// Options for patch refinement.
#[derive(Debug, Clone)]
pub struct RefineOptions {
    /// A triangle is split when its centroid lies farther than
    /// `scale / density_factor` from each of its vertices (default: √2).
    pub density_factor: f64,

    /// Edge flip acceptance rule (default: [`FlipGuard::Delaunay`]).
    pub flip_guard: FlipGuard,

    /// Maximum number of global relaxation sweeps per iteration (default: 64).
    pub max_relaxation_sweeps: usize,

    /// Maximum number of split passes before giving up (default: 32).
    pub max_iterations: usize,
}

impl Default for RefineOptions {
    fn default() -> Self {
        Self {
            density_factor: std::f64::consts::SQRT_2,
            flip_guard: FlipGuard::Delaunay,
            max_relaxation_sweeps: 64,
            max_iterations: 32,
        }
    }
}

impl RefineOptions {
    /// Set the density factor.
    pub fn with_density_factor(mut self, density_factor: f64) -> Self {
        self.density_factor = density_factor;
        self
    }

    /// Set the flip guard.
    pub fn with_flip_guard(mut self, flip_guard: FlipGuard) -> Self {
        self.flip_guard = flip_guard;
        self
    }

    /// Set the maximum number of relaxation sweeps per iteration.
    pub fn with_max_relaxation_sweeps(mut self, sweeps: usize) -> Self {
        self.max_relaxation_sweeps = sweeps;
        self
    }

    /// Set the maximum number of split passes.
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }
}

/// Counters describing one refinement run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefineStats {
    /// Split passes that inserted at least one vertex.
    pub iterations: usize,
    /// Vertices inserted.
    pub splits: usize,
    /// Edge flips performed.
    pub flips: usize,
}

/// Refine a patch in place until its density matches its vertex scales.
///
/// Boundary vertices and boundary edges of the patch are never moved or
/// flipped. Refining an already refined patch changes nothing.
///
/// # Errors
///
/// - [`MeshError::InvalidParameter`] if the density factor or any vertex scale
///   is not finite and positive
/// - [`MeshError::ConvergenceFailed`] if splitting continues past
///   `max_iterations` passes
///
/// On error the patch is left unchanged.
pub fn refine_patch<I: MeshIndex>(patch: &mut Patch<I>, options: &RefineOptions) -> Result<RefineStats> {
    if !(options.density_factor.is_finite() && options.density_factor > 0.0) {
        return Err(MeshError::invalid_param(
            "density_factor",
            options.density_factor,
            "must be finite and positive",
        ));
    }

    if let Some(&bad) = patch.scales().iter().find(|s| !(s.is_finite() && **s > 0.0)) {
        return Err(MeshError::invalid_param(
            "scale",
            bad,
            "vertex scales must be finite and positive",
        ));
    }

    // Work on copies so a failed run leaves the patch as it was.
    let mut table = patch.table().clone();
    let mut scales = patch.scales().to_vec();
    let stats = refine_connectivity(&mut table, &mut scales, options)?;

    let (patch_table, patch_scales) = patch.table_and_scales_mut();
    *patch_table = table;
    *patch_scales = scales;

    Ok(stats)
}

/// Alternate split passes and relaxation until no triangle qualifies.
fn refine_connectivity<I: MeshIndex>(
    table: &mut CornerTable<I>,
    scales: &mut Vec<f64>,
    options: &RefineOptions,
) -> Result<RefineStats> {
    let mut stats = RefineStats::default();

    loop {
        let inserted = split_pass(table, scales, options.density_factor)?;
        if inserted.is_empty() {
            break;
        }

        stats.iterations += 1;
        stats.splits += inserted.len();
        if stats.iterations > options.max_iterations {
            return Err(MeshError::ConvergenceFailed {
                iterations: options.max_iterations,
            });
        }

        let local = relax_around(table, &inserted, options.flip_guard);
        let global = relax_all(table, options.flip_guard, options.max_relaxation_sweeps);
        stats.flips += local + global;

        debug!(
            "Refinement pass {}: {} splits, {} flips, {} triangles",
            stats.iterations,
            inserted.len(),
            local + global,
            table.num_triangles()
        );
    }

    Ok(stats)
}

// ==================== Splitting ====================

/// Mean scale of a triangle's vertices.
fn triangle_scale<I: MeshIndex>(table: &CornerTable<I>, scales: &[f64], t: TriangleId<I>) -> f64 {
    let [a, b, c] = table.triangle_vertices(t);
    (scales[a.index()] + scales[b.index()] + scales[c.index()]) / 3.0
}

/// Check whether a triangle is too large for the scales of its vertices.
pub(crate) fn should_split<I: MeshIndex>(
    table: &CornerTable<I>,
    scales: &[f64],
    t: TriangleId<I>,
    density_factor: f64,
) -> bool {
    let centroid = table.triangle_centroid(t);
    let scale = triangle_scale(table, scales, t);

    table.triangle_vertices(t).iter().all(|&v| {
        let distance = density_factor * (centroid - table.position(v)).norm();
        distance > scale && distance > scales[v.index()]
    })
}

/// Split every qualifying triangle present at the start of the pass.
fn split_pass<I: MeshIndex>(
    table: &mut CornerTable<I>,
    scales: &mut Vec<f64>,
    density_factor: f64,
) -> Result<Vec<VertexId<I>>> {
    let count = table.num_triangles();
    let mut inserted = Vec::new();

    for t in (0..count).map(TriangleId::new) {
        if !should_split(table, scales, t, density_factor) {
            continue;
        }

        let scale = triangle_scale(table, scales, t);
        match table.split_triangle(t, table.triangle_centroid(t)) {
            Ok(v) => {
                scales.push(scale);
                inserted.push(v);
            }
            Err(MeshError::DegenerateGeometry { .. }) => {
                trace!("Skipping split of degenerate triangle {}", t.index());
            }
            Err(e) => return Err(e),
        }
    }

    Ok(inserted)
}

// ==================== Relaxation ====================

/// Interior angle of the triangle at corner `c`.
fn corner_angle<I: MeshIndex>(table: &CornerTable<I>, c: CornerId<I>) -> f64 {
    let p = table.position(table.corner_vertex(c));
    let a = table.position(table.corner_vertex(c.next())) - p;
    let b = table.position(table.corner_vertex(c.prev())) - p;
    a.angle(&b)
}

/// Check whether the edge facing `c` fails the empty-circumcircle test.
pub(crate) fn violates_delaunay<I: MeshIndex>(table: &CornerTable<I>, c: CornerId<I>) -> bool {
    let o = table.corner_opposite(c);
    if o.is_border() {
        return false;
    }
    corner_angle(table, c) + corner_angle(table, o) > PI + DELAUNAY_TOLERANCE
}

/// Flip the edge facing `c` if the guard accepts it. Unflippable edges are skipped.
fn guarded_flip<I: MeshIndex>(table: &mut CornerTable<I>, c: CornerId<I>, guard: FlipGuard) -> bool {
    if table.is_border_corner(c) {
        return false;
    }
    if guard == FlipGuard::Delaunay && !violates_delaunay(table, c) {
        return false;
    }
    table.edge_flip(c).is_ok()
}

/// Try to flip the link edges of freshly inserted vertices.
fn relax_around<I: MeshIndex>(table: &mut CornerTable<I>, inserted: &[VertexId<I>], guard: FlipGuard) -> usize {
    let mut flips = 0;
    for &v in inserted {
        // Flips keep every corner on its vertex, so the fan snapshot stays on `v`.
        for c in table.vertex_corners(v) {
            if guarded_flip(table, c, guard) {
                flips += 1;
            }
        }
    }
    flips
}

/// Sweep every corner until nothing flips or the sweep cap is hit.
fn relax_all<I: MeshIndex>(table: &mut CornerTable<I>, guard: FlipGuard, max_sweeps: usize) -> usize {
    let mut total = 0;

    for sweep in 0..max_sweeps {
        let mut flips = 0;
        for c in (0..table.num_corners()).map(CornerId::new) {
            if guarded_flip(table, c, guard) {
                flips += 1;
            }
        }
        total += flips;

        if flips == 0 {
            trace!("Relaxation settled after {} sweeps", sweep + 1);
            return total;
        }
    }

    if max_sweeps > 0 {
        warn!(
            "Relaxation stopped at the sweep limit ({}) with edges still flipping",
            max_sweeps
        );
    }
    total
}
