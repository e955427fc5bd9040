//! Hole filling algorithms.
//!
//! The pipeline has three stages, each in its own module:
//!
//! - **Boundary extraction** ([`boundary`]): every hole as an ordered vertex loop
//! - **Triangulation** ([`triangulate`]): minimum-weight cap for one loop
//! - **Refinement** ([`refine`]): density-matched splitting and edge-flip relaxation
//!
//! [`fill`] runs the stages over all holes and stitches the resulting
//! [`patch::Patch`]es back into the source mesh.

pub mod boundary;
pub mod fill;
pub mod patch;
pub mod progress;
pub mod refine;
pub mod triangulate;

#[cfg(test)]
pub(crate) mod fixtures;

pub use progress::Progress;
