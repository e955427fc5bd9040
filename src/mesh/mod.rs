//! Core mesh data structures.
//!
//! This module provides the corner-table representation used by every hole
//! filling stage.
//!
//! # Overview
//!
//! The primary type is [`CornerTable`], which represents a triangle mesh as
//! three corners per triangle plus the opposite corner of each corner. This
//! gives O(1) access to the next, previous and opposite corner and to the
//! triangle and vertex of any corner.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`CornerId`] - Identifies a (triangle, slot) incidence
//! - [`TriangleId`] - Identifies a triangle
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`] trait),
//! allowing you to choose `u16`, `u32`, or `u64` based on mesh size.
//!
//! # Construction
//!
//! ```
//! use mend::mesh::{CornerTable, build_from_triangles};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let table: CornerTable = build_from_triangles(&vertices, &faces).unwrap();
//! ```

mod builder;
mod corner_table;
mod index;

pub use builder::{build_from_triangles, to_face_vertex};
pub use corner_table::CornerTable;
pub use index::{CornerId, MeshIndex, TriangleId, VertexId};
