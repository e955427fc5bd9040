//! Index types for mesh elements.
//!
//! This module provides type-safe index wrappers for vertices, corners, and
//! triangles. The indices are generic over the underlying integer type so a
//! corner table can use u16 for small patches, u32 for typical meshes, or u64
//! for massive meshes.

use std::fmt::{self, Debug};
use std::hash::Hash;

/// Trait for types that can be used as mesh indices.
///
/// This trait is implemented for `u16`, `u32`, and `u64`.
pub trait MeshIndex: Copy + Clone + Eq + PartialEq + Ord + PartialOrd + Hash + Debug + Send + Sync + 'static {
    /// The maximum valid index value.
    const MAX: Self;

    /// A sentinel value representing an invalid/null index.
    const INVALID: Self;

    /// Convert from usize to this index type.
    ///
    /// # Panics
    /// Panics in debug builds if the value is too large for this index type.
    fn from_usize(v: usize) -> Self;

    /// Convert to usize.
    fn to_usize(self) -> usize;

    /// Check if this is a valid (non-sentinel) index.
    fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

macro_rules! impl_mesh_index {
    ($ty:ty) => {
        impl MeshIndex for $ty {
            const MAX: Self = <$ty>::MAX - 1;
            const INVALID: Self = <$ty>::MAX;

            #[inline]
            fn from_usize(v: usize) -> Self {
                debug_assert!(
                    v <= Self::MAX as usize,
                    "index {} too large for {}",
                    v,
                    stringify!($ty)
                );
                v as $ty
            }

            #[inline]
            fn to_usize(self) -> usize {
                self as usize
            }
        }
    };
}

impl_mesh_index!(u16);
impl_mesh_index!(u32);
impl_mesh_index!(u64);

/// A type-safe vertex index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId<I: MeshIndex = u32>(I);

/// A type-safe corner index: one (triangle, slot) incidence.
///
/// The invalid corner doubles as the `BORDER` sentinel returned for the
/// opposite of a corner whose edge lies on the mesh boundary.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct CornerId<I: MeshIndex = u32>(I);

/// A type-safe triangle index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct TriangleId<I: MeshIndex = u32>(I);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl<I: MeshIndex> $name<I> {
            /// Create a new index from a raw value.
            #[inline]
            pub fn new(index: usize) -> Self {
                Self(I::from_usize(index))
            }

            /// Create an invalid/null index.
            #[inline]
            pub fn invalid() -> Self {
                Self(I::INVALID)
            }

            /// Get the raw index value.
            #[inline]
            pub fn index(self) -> usize {
                self.0.to_usize()
            }

            /// Check if this is a valid (non-null) index.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0.is_valid()
            }
        }

        impl<I: MeshIndex> Debug for $name<I> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $display, self.index())
                } else {
                    write!(f, "{}(INVALID)", $display)
                }
            }
        }

        impl<I: MeshIndex> Default for $name<I> {
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl<I: MeshIndex> From<usize> for $name<I> {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(VertexId, "V");
impl_index_type!(CornerId, "C");
impl_index_type!(TriangleId, "T");

impl<I: MeshIndex> CornerId<I> {
    /// The sentinel for "no opposite corner".
    #[inline]
    pub fn border() -> Self {
        Self::invalid()
    }

    /// Check if this is the border sentinel.
    #[inline]
    pub fn is_border(self) -> bool {
        !self.is_valid()
    }

    /// The triangle owning this corner.
    #[inline]
    pub fn triangle(self) -> TriangleId<I> {
        TriangleId::new(self.index() / 3)
    }

    /// The next corner within the owning triangle.
    #[inline]
    pub fn next(self) -> Self {
        let i = self.index();
        Self::new(if i % 3 == 2 { i - 2 } else { i + 1 })
    }

    /// The previous corner within the owning triangle.
    #[inline]
    pub fn prev(self) -> Self {
        let i = self.index();
        Self::new(if i % 3 == 0 { i + 2 } else { i - 1 })
    }
}

impl<I: MeshIndex> TriangleId<I> {
    /// The three corners of this triangle, in winding order.
    #[inline]
    pub fn corners(self) -> [CornerId<I>; 3] {
        let base = 3 * self.index();
        [CornerId::new(base), CornerId::new(base + 1), CornerId::new(base + 2)]
    }
}
