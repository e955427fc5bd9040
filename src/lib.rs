//! # Mend
//!
//! Hole filling for triangle meshes.
//!
//! Mend finds the holes of a triangulated surface, caps each one with a
//! minimum-weight triangulation that keeps dihedral angles against the
//! surrounding surface small, and refines the cap until its triangle density
//! matches the density of the mesh around it.
//!
//! ## Features
//!
//! - **Corner table**: O(1) next, previous and opposite queries with type-safe indices
//! - **Flexible indexing**: Support for 16-bit, 32-bit, and 64-bit indices
//! - **Boundary extraction**: Every hole as an ordered vertex loop
//! - **Minimum-weight triangulation**: O(n³) dynamic program scoring dihedral angles
//! - **Patch refinement**: Centroid splits with Delaunay edge-flip relaxation
//! - **Parallel filling**: Independent holes processed with rayon
//!
//! ## Quick Start
//!
//! ```
//! use mend::prelude::*;
//! use nalgebra::Point3;
//!
//! // A square pyramid without its base.
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//! let faces = vec![[0, 1, 4], [1, 2, 4], [2, 3, 4], [3, 0, 4]];
//! let mesh: CornerTable = build_from_triangles(&vertices, &faces).unwrap();
//!
//! // One hole: the missing base.
//! let holes = extract_hole_boundaries(&mesh).unwrap();
//! assert_eq!(holes.len(), 1);
//! assert_eq!(holes[0].len(), 4);
//!
//! // Cap it and merge the cap back into the mesh.
//! let patches = fill_holes(&mesh, &FillOptions::default()).unwrap();
//! let closed = stitch_patches(&mesh, &patches).unwrap();
//! assert!(extract_hole_boundaries(&closed).unwrap().is_empty());
//! ```
//!
//! ## Building From Flat Buffers
//!
//! ```
//! use mend::prelude::*;
//!
//! // x, y, z per vertex and three indices per triangle
//! let attributes = [
//!     0.0, 0.0, 0.0,
//!     1.0, 0.0, 0.0,
//!     1.0, 1.0, 0.0,
//!     0.0, 1.0, 0.0,
//! ];
//! let indices = [0, 1, 2, 0, 2, 3];
//!
//! let mesh: CornerTable = CornerTable::from_raw(&indices, &attributes, 2, 4, 3).unwrap();
//! assert_eq!(mesh.num_triangles(), 2);
//!
//! // Corner 1 sits on vertex 1 and faces the shared diagonal.
//! let c = CornerId::new(1);
//! assert_eq!(mesh.corner_vertex(c), VertexId::new(1));
//! assert!(!mesh.corner_opposite(c).is_border());
//! ```
//!
//! ## Running The Stages Separately
//!
//! ```
//! use mend::prelude::*;
//! # use nalgebra::Point3;
//! # let vertices = vec![
//! #     Point3::new(0.0, 0.0, 0.0),
//! #     Point3::new(1.0, 0.0, 0.0),
//! #     Point3::new(1.0, 1.0, 0.0),
//! #     Point3::new(0.0, 1.0, 0.0),
//! #     Point3::new(0.5, 0.5, 1.0),
//! # ];
//! # let faces = vec![[0, 1, 4], [1, 2, 4], [2, 3, 4], [3, 0, 4]];
//! # let mesh: CornerTable = build_from_triangles(&vertices, &faces).unwrap();
//! for hole in extract_hole_boundaries(&mesh).unwrap() {
//!     let triangles = min_weight_triangulation(&mesh, &hole).unwrap();
//!     assert_eq!(triangles.len(), hole.len() - 2);
//!
//!     let mut patch = Patch::from_triangulation(&mesh, &hole, &triangles).unwrap();
//!     refine_patch(&mut patch, &RefineOptions::default()).unwrap();
//!     assert!(patch.table().is_valid());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use mend::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::boundary::{extract_hole_boundaries, HoleBoundary};
    pub use crate::algo::fill::{fill_hole, fill_holes, fill_holes_with_progress, stitch_patches, FillOptions};
    pub use crate::algo::patch::Patch;
    pub use crate::algo::refine::{refine_patch, FlipGuard, RefineOptions, RefineStats};
    pub use crate::algo::triangulate::{
        dihedral_angle, min_weight_triangulation, triangulate_hole, DihedralAngleWeight,
    };
    pub use crate::algo::Progress;
    pub use crate::error::{ErrorKind, MeshError, Result};
    pub use crate::mesh::{
        build_from_triangles, to_face_vertex, CornerId, CornerTable, MeshIndex, TriangleId, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
