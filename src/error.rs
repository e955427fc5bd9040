//! Error types for mend.
//!
//! This module defines all error types used throughout the library. Every
//! variant belongs to one of the coarse categories returned by
//! [`MeshError::kind`], so callers can tell a malformed source mesh apart from
//! a geometric failure inside a patch.

use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Coarse classification of a [`MeshError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The source mesh is not a single manifold component, or its boundary
    /// edges do not decompose into simple cycles.
    Connectivity,
    /// An expected adjacency is missing from the corner table.
    Topology,
    /// An operation would produce a zero-area or inverted triangle.
    DegenerateGeometry,
    /// The caller passed invalid data or parameters.
    Input,
}

/// Errors that can occur during mesh operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// A triangle references an invalid vertex index.
    #[error("triangle {triangle} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The triangle index.
        triangle: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// The flat buffers handed to the corner table do not match the declared counts.
    #[error("invalid attribute layout: {details}")]
    InvalidAttributes {
        /// Description of the mismatch.
        details: String,
    },

    /// A triangle has duplicate vertex indices.
    #[error("triangle {triangle} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The triangle index.
        triangle: usize,
    },

    /// An edge is used by more than two triangles, or twice in the same direction.
    #[error("edge ({v0}, {v1}) is non-manifold")]
    NonManifoldEdge {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// The triangle traversal did not reach every triangle.
    #[error("mesh is not a single connected component: reached {visited} of {total} triangles")]
    Disconnected {
        /// Number of triangles reached from triangle 0.
        visited: usize,
        /// Number of triangles in the mesh.
        total: usize,
    },

    /// A vertex is the origin of more than one boundary edge, or closes a loop
    /// shorter than a triangle.
    #[error("boundary is non-manifold at vertex {vertex}")]
    NonManifoldBoundary {
        /// The offending vertex.
        vertex: usize,
    },

    /// A chain of boundary edges does not return to its start.
    #[error("boundary chain starting at vertex {vertex} is not closed")]
    OpenBoundary {
        /// First vertex of the open chain.
        vertex: usize,
    },

    /// No triangle of the source mesh is incident to both vertices of a boundary edge.
    #[error("no triangle is incident to boundary edge ({v0}, {v1})")]
    MissingIncidentTriangle {
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// The edge opposite a corner cannot be flipped.
    #[error("edge opposite corner {corner} cannot be flipped: {reason}")]
    EdgeNotFlippable {
        /// The corner whose opposite edge was requested.
        corner: usize,
        /// Why the flip was refused.
        reason: &'static str,
    },

    /// An operation would create a zero-area or inverted triangle.
    #[error("degenerate geometry: {details}")]
    DegenerateGeometry {
        /// Description of the degenerate configuration.
        details: String,
    },

    /// Algorithm failed to converge.
    #[error("algorithm failed to converge after {iterations} iterations")]
    ConvergenceFailed {
        /// Number of iterations attempted.
        iterations: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create a degenerate geometry error.
    pub fn degenerate(details: impl Into<String>) -> Self {
        MeshError::DegenerateGeometry {
            details: details.into(),
        }
    }

    /// The category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MeshError::Disconnected { .. }
            | MeshError::NonManifoldBoundary { .. }
            | MeshError::OpenBoundary { .. }
            | MeshError::NonManifoldEdge { .. } => ErrorKind::Connectivity,
            MeshError::MissingIncidentTriangle { .. } | MeshError::EdgeNotFlippable { .. } => {
                ErrorKind::Topology
            }
            MeshError::DegenerateGeometry { .. } | MeshError::DegenerateFace { .. } => {
                ErrorKind::DegenerateGeometry
            }
            MeshError::InvalidVertexIndex { .. }
            | MeshError::InvalidAttributes { .. }
            | MeshError::ConvergenceFailed { .. }
            | MeshError::InvalidParameter { .. } => ErrorKind::Input,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            MeshError::Disconnected { visited: 1, total: 2 }.kind(),
            ErrorKind::Connectivity
        );
        assert_eq!(
            MeshError::MissingIncidentTriangle { v0: 0, v1: 1 }.kind(),
            ErrorKind::Topology
        );
        assert_eq!(MeshError::degenerate("flat").kind(), ErrorKind::DegenerateGeometry);
        assert_eq!(
            MeshError::invalid_param("density_factor", -1.0, "must be positive").kind(),
            ErrorKind::Input
        );
    }

    #[test]
    fn test_display() {
        let err = MeshError::invalid_param("density_factor", 0.0, "must be positive");
        assert_eq!(
            err.to_string(),
            "invalid parameter: density_factor = 0 (must be positive)"
        );
    }
}
