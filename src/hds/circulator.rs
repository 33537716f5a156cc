// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Traversal sequences
//!
//! Each sequence starts at a halfedge and walks one full cycle: it yields
//! exactly *degree* items and stops when it is back at the start. The
//! sequences are lazy and cheap to clone; [`restart`](HalfedgesAroundFacet::restart)
//! rewinds one in place. They borrow the structure, so the borrow checker
//! rules out editing while one is alive.

use super::{FacetHandle, HalfedgeDs, HalfedgeHandle, Items, VertexHandle};
use std::iter::FusedIterator;

/// One full cycle of a successor function starting at `start`
struct Cycle {
    start: HalfedgeHandle,
    current: Option<HalfedgeHandle>,
}

impl Cycle {
    fn new(start: HalfedgeHandle) -> Self {
        Self {
            start,
            current: Some(start),
        }
    }

    fn advance(&mut self, step: impl FnOnce(HalfedgeHandle) -> HalfedgeHandle) -> Option<HalfedgeHandle> {
        let h = self.current?;
        let next = step(h);
        self.current = (next != self.start).then_some(next);
        Some(h)
    }
}

impl Clone for Cycle {
    fn clone(&self) -> Self {
        Self {
            start: self.start,
            current: self.current,
        }
    }
}

/// Halfedges around a facet or hole, following `next` (counter-clockwise
/// seen from outside)
pub struct HalfedgesAroundFacet<'a, C: Items> {
    hds: &'a HalfedgeDs<C>,
    cycle: Cycle,
}

impl<'a, C: Items> HalfedgesAroundFacet<'a, C> {
    pub(crate) fn new(hds: &'a HalfedgeDs<C>, start: HalfedgeHandle) -> Self {
        Self {
            hds,
            cycle: Cycle::new(start),
        }
    }

    /// Halfedge the cycle starts and ends at
    pub fn start(&self) -> HalfedgeHandle {
        self.cycle.start
    }

    /// Rewind to the start of the cycle
    pub fn restart(&mut self) {
        self.cycle.current = Some(self.cycle.start);
    }
}

impl<C: Items> Clone for HalfedgesAroundFacet<'_, C> {
    fn clone(&self) -> Self {
        Self {
            hds: self.hds,
            cycle: self.cycle.clone(),
        }
    }
}

impl<C: Items> Iterator for HalfedgesAroundFacet<'_, C> {
    type Item = HalfedgeHandle;

    fn next(&mut self) -> Option<HalfedgeHandle> {
        let hds = self.hds;
        self.cycle.advance(|h| hds.next(h))
    }
}

impl<C: Items> FusedIterator for HalfedgesAroundFacet<'_, C> {}

/// Halfedges pointing to a vertex, following `h.next().opposite()`
/// (clockwise seen from outside)
pub struct HalfedgesAroundVertex<'a, C: Items> {
    hds: &'a HalfedgeDs<C>,
    cycle: Cycle,
}

impl<'a, C: Items> HalfedgesAroundVertex<'a, C> {
    pub(crate) fn new(hds: &'a HalfedgeDs<C>, start: HalfedgeHandle) -> Self {
        Self {
            hds,
            cycle: Cycle::new(start),
        }
    }

    /// Halfedge the cycle starts and ends at
    pub fn start(&self) -> HalfedgeHandle {
        self.cycle.start
    }

    /// Rewind to the start of the cycle
    pub fn restart(&mut self) {
        self.cycle.current = Some(self.cycle.start);
    }
}

impl<C: Items> Clone for HalfedgesAroundVertex<'_, C> {
    fn clone(&self) -> Self {
        Self {
            hds: self.hds,
            cycle: self.cycle.clone(),
        }
    }
}

impl<C: Items> Iterator for HalfedgesAroundVertex<'_, C> {
    type Item = HalfedgeHandle;

    fn next(&mut self) -> Option<HalfedgeHandle> {
        let hds = self.hds;
        self.cycle.advance(|h| hds.next_on_vertex(h))
    }
}

impl<C: Items> FusedIterator for HalfedgesAroundVertex<'_, C> {}

/// Target vertices of the halfedges around a facet or hole
#[derive(Clone)]
pub struct VerticesAroundFacet<'a, C: Items> {
    inner: HalfedgesAroundFacet<'a, C>,
}

impl<C: Items> Iterator for VerticesAroundFacet<'_, C> {
    type Item = VertexHandle;

    fn next(&mut self) -> Option<VertexHandle> {
        let h = self.inner.next()?;
        Some(self.inner.hds.vertex(h))
    }
}

impl<C: Items> FusedIterator for VerticesAroundFacet<'_, C> {}

/// Facets around a vertex, one entry per incident halfedge. Holes show up
/// as `None`.
#[derive(Clone)]
pub struct FacetsAroundVertex<'a, C: Items> {
    inner: HalfedgesAroundVertex<'a, C>,
}

impl<C: Items> Iterator for FacetsAroundVertex<'_, C> {
    type Item = Option<FacetHandle>;

    fn next(&mut self) -> Option<Option<FacetHandle>> {
        let h = self.inner.next()?;
        Some(self.inner.hds.facet(h))
    }
}

impl<C: Items> FusedIterator for FacetsAroundVertex<'_, C> {}

impl<C: Items> HalfedgeDs<C> {
    /// Halfedges of the facet or hole of `h`, starting with `h`
    pub fn halfedges_around_facet(&self, h: HalfedgeHandle) -> HalfedgesAroundFacet<'_, C> {
        HalfedgesAroundFacet::new(self, h)
    }

    /// Halfedges pointing to the target of `h`, starting with `h`
    pub fn halfedges_around_vertex(&self, h: HalfedgeHandle) -> HalfedgesAroundVertex<'_, C> {
        HalfedgesAroundVertex::new(self, h)
    }

    /// Vertices of the facet or hole of `h`, starting with the target of `h`
    pub fn vertices_around_facet(&self, h: HalfedgeHandle) -> VerticesAroundFacet<'_, C> {
        VerticesAroundFacet {
            inner: self.halfedges_around_facet(h),
        }
    }

    /// Facets incident to the target of `h`, starting with the facet of `h`
    pub fn facets_around_vertex(&self, h: HalfedgeHandle) -> FacetsAroundVertex<'_, C> {
        FacetsAroundVertex {
            inner: self.halfedges_around_vertex(h),
        }
    }

    /// Halfedges of facet `f`. Needs facet back-pointers.
    pub fn facet_halfedges(&self, f: FacetHandle) -> HalfedgesAroundFacet<'_, C> {
        const { assert!(C::FACET_HALFEDGE, "facet_halfedges needs Items::FACET_HALFEDGE") }
        let start = self.facets[f.index()].halfedge.unwrap_or(HalfedgeHandle::INVALID);
        assert!(start.is_valid(), "facet {f} has no incident halfedge");
        HalfedgesAroundFacet::new(self, start)
    }

    /// Halfedges pointing to vertex `v`; empty for an isolated vertex.
    /// Needs vertex back-pointers.
    pub fn vertex_halfedges(&self, v: VertexHandle) -> impl Iterator<Item = HalfedgeHandle> + '_ {
        const { assert!(C::VERTEX_HALFEDGE, "vertex_halfedges needs Items::VERTEX_HALFEDGE") }
        self.vertices[v.index()]
            .halfedge
            .into_iter()
            .flat_map(move |h| HalfedgesAroundVertex::new(self, h))
    }
}
