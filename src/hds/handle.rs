// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Stable element handles
//!
//! Handles are plain slot indices into the element containers. They are
//! `Copy`, cheap to compare and hash, and never own anything. A handle stays
//! valid until the element it names is removed; growing a container does not
//! move slots. The slot of a removed element is not handed out again before
//! the structure is cleared, so a stale handle panics instead of naming a
//! newer element.

use std::fmt;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident, $tag:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) u32);

        impl $name {
            /// Sentinel used for links that are not set yet
            pub const INVALID: Self = Self(u32::MAX);

            pub(crate) fn new(index: usize) -> Self {
                debug_assert!(index < u32::MAX as usize);
                Self(index as u32)
            }

            /// Raw slot index
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}{}", $tag, self.0)
                } else {
                    write!(f, "{}-", $tag)
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(self, f)
            }
        }
    };
}

handle!(
    /// Handle to a vertex
    VertexHandle,
    "V"
);
handle!(
    /// Handle to a facet
    FacetHandle,
    "F"
);
handle!(
    /// Handle to a halfedge.
    ///
    /// The two halfedges of an edge share one edge slot: the handle is
    /// `2 * slot + side`, so the opposite halfedge is a single bit flip.
    HalfedgeHandle,
    "H"
);

impl HalfedgeHandle {
    pub(crate) fn from_edge(edge: usize, side: usize) -> Self {
        debug_assert!(side < 2);
        Self::new(edge * 2 + side)
    }

    /// The paired halfedge of the same edge, running the other way
    #[inline]
    pub fn opposite(self) -> Self {
        Self(self.0 ^ 1)
    }

    /// Slot of the edge this halfedge belongs to
    #[inline]
    pub(crate) fn edge(self) -> usize {
        (self.0 >> 1) as usize
    }

    #[inline]
    pub(crate) fn side(self) -> usize {
        (self.0 & 1) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_is_involution() {
        for raw in 0..16 {
            let h = HalfedgeHandle::new(raw);
            assert_ne!(h.opposite(), h);
            assert_eq!(h.opposite().opposite(), h);
            assert_eq!(h.edge(), h.opposite().edge());
            assert_ne!(h.side(), h.opposite().side());
        }
    }

    #[test]
    fn test_from_edge() {
        let h = HalfedgeHandle::from_edge(5, 1);
        assert_eq!(h.edge(), 5);
        assert_eq!(h.side(), 1);
        assert_eq!(h.index(), 11);
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", VertexHandle::new(3)), "V3");
        assert_eq!(format!("{}", FacetHandle::INVALID), "F-");
        assert!(!HalfedgeHandle::INVALID.is_valid());
    }
}
