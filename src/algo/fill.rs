//! Hole filling pipeline.
//!
//! [`fill_holes`] runs the three stages for every hole of a mesh: boundary
//! extraction, minimum-weight triangulation and density-driven refinement.
//! Holes are independent, so they can be processed in parallel. The source mesh
//! is only read; each hole yields a [`Patch`], and [`stitch_patches`] merges the
//! patches back into a copy of the source.
//!
//! # Example
//!
//! ```
//! use mend::prelude::*;
//! use nalgebra::Point3;
//!
//! // A unit box without its lid.
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
//! let mesh: CornerTable = build_from_triangles(&vertices, &faces).unwrap();
//!
//! let patches = fill_holes(&mesh, &FillOptions::default()).unwrap();
//! assert_eq!(patches.len(), 1);
//!
//! let closed = stitch_patches(&mesh, &patches).unwrap();
//! assert!(extract_hole_boundaries(&closed).unwrap().is_empty());
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::algo::boundary::{extract_hole_boundaries, HoleBoundary};
use crate::algo::patch::Patch;
use crate::algo::refine::{refine_patch, RefineOptions};
use crate::algo::triangulate::triangulate_hole;
use crate::algo::Progress;
use crate::error::Result;
use crate::mesh::{build_from_triangles, to_face_vertex, CornerTable, MeshIndex};

/// Options for hole filling.
#[derive(Debug, Clone, Default)]
pub struct FillOptions {
    /// Refinement parameters applied to every patch.
    pub refine: RefineOptions,

    /// Whether to fill holes in parallel (default: false).
    pub parallel: bool,

    /// Holes with more boundary vertices than this are left open (default: no limit).
    pub max_boundary_len: Option<usize>,
}

impl FillOptions {
    /// Set the refinement parameters.
    pub fn with_refine(mut self, refine: RefineOptions) -> Self {
        self.refine = refine;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Skip holes whose boundary has more than `len` vertices.
    pub fn with_max_boundary_len(mut self, len: usize) -> Self {
        self.max_boundary_len = Some(len);
        self
    }
}

/// Fill every hole of a mesh.
///
/// Returns one refined patch per filled hole, in the order the boundary loops
/// were extracted. The source mesh is not modified.
///
/// # Errors
///
/// Returns the first error raised by any stage; no patches are returned then.
pub fn fill_holes<I: MeshIndex>(mesh: &CornerTable<I>, options: &FillOptions) -> Result<Vec<Patch<I>>> {
    fill_holes_internal(mesh, options, None)
}

/// Fill every hole of a mesh with progress reporting.
///
/// Progress is reported once per finished hole. See [`fill_holes`].
pub fn fill_holes_with_progress<I: MeshIndex>(
    mesh: &CornerTable<I>,
    options: &FillOptions,
    progress: &Progress,
) -> Result<Vec<Patch<I>>> {
    fill_holes_internal(mesh, options, Some(progress))
}

/// Triangulate and refine a single hole.
pub fn fill_hole<I: MeshIndex>(
    mesh: &CornerTable<I>,
    boundary: &HoleBoundary<I>,
    options: &RefineOptions,
) -> Result<Patch<I>> {
    let mut patch = triangulate_hole(mesh, boundary)?;
    let stats = refine_patch(&mut patch, options)?;
    debug!(
        "Hole of {} vertices: {} triangles after {} splits and {} flips",
        boundary.len(),
        patch.table().num_triangles(),
        stats.splits,
        stats.flips
    );
    Ok(patch)
}

fn fill_holes_internal<I: MeshIndex>(
    mesh: &CornerTable<I>,
    options: &FillOptions,
    progress: Option<&Progress>,
) -> Result<Vec<Patch<I>>> {
    let boundaries: Vec<HoleBoundary<I>> = extract_hole_boundaries(mesh)?
        .into_iter()
        .filter(|boundary| match options.max_boundary_len {
            Some(limit) if boundary.len() > limit => {
                warn!(
                    "Skipping hole of {} vertices (limit {})",
                    boundary.len(),
                    limit
                );
                false
            }
            _ => true,
        })
        .collect();

    let total = boundaries.len();
    info!("Filling {} holes", total);

    let done = AtomicUsize::new(0);
    let fill_one = |boundary: &HoleBoundary<I>| {
        let patch = fill_hole(mesh, boundary, &options.refine);
        if let Some(p) = progress {
            let current = done.fetch_add(1, Ordering::Relaxed) + 1;
            p.report(current, total, "Filling holes");
        }
        patch
    };

    let patches: Vec<Patch<I>> = if options.parallel {
        boundaries.par_iter().map(fill_one).collect::<Result<_>>()?
    } else {
        boundaries.iter().map(fill_one).collect::<Result<_>>()?
    };

    info!(
        "Filled {} holes with {} new vertices",
        patches.len(),
        patches.iter().map(|p| p.num_interior_vertices()).sum::<usize>()
    );

    Ok(patches)
}

/// Merge patches into a copy of the source mesh.
///
/// Patch boundary vertices map back to their source vertices; interior patch
/// vertices are appended after the source vertices, patch by patch. If every
/// hole was filled the result is watertight.
///
/// # Errors
///
/// Fails if the merged triangles are not a manifold mesh, for example when the
/// same patch is stitched twice.
pub fn stitch_patches<I: MeshIndex>(mesh: &CornerTable<I>, patches: &[Patch<I>]) -> Result<CornerTable<I>> {
    let (mut vertices, mut faces) = to_face_vertex(mesh);

    for patch in patches {
        let table = patch.table();
        let local_to_merged: Vec<usize> = table
            .vertex_ids()
            .map(|v| match patch.source_vertex(v) {
                Some(source) => source.index(),
                None => {
                    vertices.push(*table.position(v));
                    vertices.len() - 1
                }
            })
            .collect();

        faces.extend(table.triangle_ids().map(|t| {
            let [a, b, c] = table.triangle_vertices(t);
            [
                local_to_merged[a.index()],
                local_to_merged[b.index()],
                local_to_merged[c.index()],
            ]
        }));
    }

    debug!(
        "Stitched {} patches: {} vertices, {} triangles",
        patches.len(),
        vertices.len(),
        faces.len()
    );

    build_from_triangles(&vertices, &faces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::fixtures::{drum, grid_with_holes, open_box};
    use crate::error::MeshError;
    use crate::mesh::VertexId;
    use nalgebra::Point3;
    use std::sync::Arc;

    fn closed_tetrahedron() -> CornerTable {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        build_from_triangles(&vertices, &faces).unwrap()
    }

    /// Closed genus-0 surface: 2V - F = 4.
    fn assert_closed_sphere(table: &CornerTable) {
        assert!(table.is_valid());
        assert!(table.corner_ids().all(|c| !table.is_border_corner(c)));
        assert_eq!(2 * table.num_vertices(), table.num_triangles() + 4);
    }

    #[test]
    fn test_default_options() {
        let options = FillOptions::default();
        assert!(!options.parallel);
        assert!(options.max_boundary_len.is_none());

        let options = options.with_parallel(true).with_max_boundary_len(10);
        assert!(options.parallel);
        assert_eq!(options.max_boundary_len, Some(10));
    }

    #[test]
    fn test_no_holes() {
        let mesh = closed_tetrahedron();
        let patches = fill_holes(&mesh, &FillOptions::default()).unwrap();
        assert!(patches.is_empty());

        let stitched = stitch_patches(&mesh, &patches).unwrap();
        assert_eq!(stitched.triangle_list(), mesh.triangle_list());
    }

    #[test]
    fn test_fill_open_box() {
        let mesh = open_box();
        let patches = fill_holes(&mesh, &FillOptions::default()).unwrap();
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].num_boundary_vertices(), 4);

        let closed = stitch_patches(&mesh, &patches).unwrap();
        assert_closed_sphere(&closed);
        assert!((closed.surface_area() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_fill_curved_hole() {
        let mesh = drum(12, |i| 0.3 * ((i as f64) * 0.9).cos());
        let patches = fill_holes(&mesh, &FillOptions::default()).unwrap();
        assert_eq!(patches.len(), 1);

        let closed = stitch_patches(&mesh, &patches).unwrap();
        assert_closed_sphere(&closed);
        assert_eq!(
            closed.num_vertices(),
            mesh.num_vertices() + patches[0].num_interior_vertices()
        );

        // Source vertices keep their indices and positions.
        for v in mesh.vertex_ids() {
            assert_eq!(closed.position(v), mesh.position(v));
        }
    }

    #[test]
    fn test_skips_long_boundaries() {
        // Three inner holes (3, 4 and 6 vertices) plus the 24-vertex outer border.
        let mesh = grid_with_holes(6, &[(1, 1), (1, 3), (2, 3)], &[(4, 4, 0)]);
        let options = FillOptions::default().with_max_boundary_len(10);
        let patches = fill_holes(&mesh, &options).unwrap();

        let mut sizes: Vec<usize> = patches.iter().map(|p| p.num_boundary_vertices()).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![3, 4, 6]);

        // Only the outer border remains open.
        let stitched = stitch_patches(&mesh, &patches).unwrap();
        assert!(stitched.is_valid());
        let loops = extract_hole_boundaries(&stitched).unwrap();
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].len(), 24);
        assert!((stitched.surface_area() - 36.0).abs() < 1e-9);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mesh = grid_with_holes(6, &[(1, 1), (1, 3), (2, 3)], &[(4, 4, 0)]);
        let sequential = FillOptions::default().with_max_boundary_len(10);
        let parallel = sequential.clone().with_parallel(true);

        let a = fill_holes(&mesh, &sequential).unwrap();
        let b = fill_holes(&mesh, &parallel).unwrap();

        assert_eq!(a.len(), b.len());
        for (pa, pb) in a.iter().zip(&b) {
            assert_eq!(pa.boundary(), pb.boundary());
            assert_eq!(pa.table().triangle_list(), pb.table().triangle_list());
            assert_eq!(pa.table().positions(), pb.table().positions());
        }
    }

    #[test]
    fn test_progress_reports_each_hole() {
        let mesh = grid_with_holes(6, &[(1, 1), (1, 3), (2, 3)], &[(4, 4, 0)]);
        let reports = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&reports);
        let progress = Progress::new(move |current, total, _| {
            assert!(current <= total);
            counter.fetch_add(1, Ordering::Relaxed);
        });

        let options = FillOptions::default().with_max_boundary_len(10).with_parallel(true);
        fill_holes_with_progress(&mesh, &options, &progress).unwrap();
        assert_eq!(reports.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_stage_errors_propagate() {
        let mesh = open_box();
        let options = FillOptions::default()
            .with_refine(RefineOptions::default().with_density_factor(-1.0));
        let result = fill_holes(&mesh, &options);
        assert!(matches!(result, Err(MeshError::InvalidParameter { .. })));

        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(5.0, 0.0, 0.0),
            Point3::new(6.0, 0.0, 0.0),
            Point3::new(5.0, 1.0, 0.0),
        ];
        let split: CornerTable = build_from_triangles(&vertices, &[[0, 1, 2], [3, 4, 5]]).unwrap();
        let result = fill_holes(&split, &FillOptions::default());
        assert!(matches!(result, Err(MeshError::Disconnected { .. })));
    }

    #[test]
    fn test_stitching_twice_is_rejected() {
        let mesh = open_box();
        let patches = fill_holes(&mesh, &FillOptions::default()).unwrap();
        let doubled = vec![patches[0].clone(), patches[0].clone()];
        let result = stitch_patches(&mesh, &doubled);
        assert!(matches!(result, Err(MeshError::NonManifoldEdge { .. })));
    }

    #[test]
    fn test_patch_boundary_maps_to_source() {
        let mesh = open_box();
        let patches = fill_holes(&mesh, &FillOptions::default()).unwrap();
        let patch = &patches[0];
        for i in 0..patch.num_boundary_vertices() {
            let source = patch.source_vertex(VertexId::new(i)).unwrap();
            assert_eq!(patch.table().position(VertexId::new(i)), mesh.position(source));
        }
    }
}
