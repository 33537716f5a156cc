// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Halfedge data structure
//!
//! [`HalfedgeDs`] owns the vertex, halfedge and facet collections and the
//! incidence relation between them. It offers read access, traversal and
//! predicates to everyone, and a set of raw low-level setters that can leave
//! the structure in an inconsistent state. The raw setters are the toolkit
//! for delegate agents (see [`crate::Modifier`]); the Euler operators in
//! [`crate::polyhedron`] are built from them.
//!
//! Each edge occupies one slot holding both of its halfedges, so
//! `opposite` is not stored but derived from the handle.

mod border;
mod circulator;
mod container;
mod handle;
mod items;
mod predicates;
mod validate;

pub use circulator::{
    FacetsAroundVertex, HalfedgesAroundFacet, HalfedgesAroundVertex, VerticesAroundFacet,
};
pub use handle::{FacetHandle, HalfedgeHandle, VertexHandle};
pub use items::{CompactItems, DefaultItems, Items, StaticItems};
pub use validate::ValidationError;

pub(crate) use border::BorderCache;
use container::InPlaceList;
use items::{Edge, Facet, Halfedge, Vertex};

use crate::error::PolyhedronError;
use std::fmt;
use std::mem;

/// Storage and incidence relation of a polyhedral surface
pub struct HalfedgeDs<C: Items> {
    vertices: InPlaceList<Vertex<C>>,
    edges: InPlaceList<Edge>,
    facets: InPlaceList<Facet<C>>,
    border: BorderCache,
}

impl<C: Items> Default for HalfedgeDs<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Items> Clone for HalfedgeDs<C> {
    fn clone(&self) -> Self {
        Self {
            vertices: self.vertices.clone(),
            edges: self.edges.clone(),
            facets: self.facets.clone(),
            border: self.border.clone(),
        }
    }
}

impl<C: Items> fmt::Debug for HalfedgeDs<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HalfedgeDs")
            .field("vertices", &self.size_of_vertices())
            .field("halfedges", &self.size_of_halfedges())
            .field("facets", &self.size_of_facets())
            .field("border", &self.border)
            .finish()
    }
}

impl<C: Items> HalfedgeDs<C> {
    /// Create an empty structure
    pub fn new() -> Self {
        Self {
            vertices: InPlaceList::new(),
            edges: InPlaceList::new(),
            facets: InPlaceList::new(),
            border: BorderCache::default(),
        }
    }

    /// Create an empty structure with room for `v` vertices, `h` halfedges
    /// and `f` facets
    pub fn with_capacity(v: usize, h: usize, f: usize) -> Self {
        Self {
            vertices: InPlaceList::with_capacity(v),
            edges: InPlaceList::with_capacity(h.div_ceil(2)),
            facets: InPlaceList::with_capacity(f),
            border: BorderCache::default(),
        }
    }

    // =========================================================================
    // Sizes and storage
    // =========================================================================

    #[inline]
    pub fn size_of_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of halfedges, border halfedges included
    #[inline]
    pub fn size_of_halfedges(&self) -> usize {
        self.edges.len() * 2
    }

    #[inline]
    pub fn size_of_edges(&self) -> usize {
        self.edges.len()
    }

    /// Number of facets (holes are not facets)
    #[inline]
    pub fn size_of_facets(&self) -> usize {
        self.facets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty() && self.facets.is_empty()
    }

    /// Same as [`is_empty`](Self::is_empty)
    #[inline]
    pub fn empty(&self) -> bool {
        self.is_empty()
    }

    pub fn capacity_of_vertices(&self) -> usize {
        self.vertices.capacity()
    }

    pub fn capacity_of_halfedges(&self) -> usize {
        self.edges.capacity() * 2
    }

    pub fn capacity_of_facets(&self) -> usize {
        self.facets.capacity()
    }

    /// Bytes used by the structure
    pub fn bytes(&self) -> usize {
        mem::size_of::<Self>() + self.vertices.bytes() + self.edges.bytes() + self.facets.bytes()
    }

    /// Bytes reserved by the structure
    pub fn bytes_reserved(&self) -> usize {
        mem::size_of::<Self>()
            + self.vertices.bytes_reserved()
            + self.edges.bytes_reserved()
            + self.facets.bytes_reserved()
    }

    /// Reserve storage for `v` vertices, `h` halfedges and `f` facets in
    /// total. Nothing happens for a collection whose capacity is already
    /// larger. Handles and traversal sequences stay valid since slots never
    /// move. A failed reservation leaves every element untouched.
    pub fn reserve(&mut self, v: usize, h: usize, f: usize) -> Result<(), PolyhedronError> {
        self.vertices.reserve(v)?;
        self.edges.reserve(h.div_ceil(2))?;
        self.facets.reserve(f)?;
        Ok(())
    }

    /// Make sure `v` more vertices, `h` more halfedges and `f` more facets
    /// fit without further allocation
    pub(crate) fn reserve_additional(
        &mut self,
        v: usize,
        h: usize,
        f: usize,
    ) -> Result<(), PolyhedronError> {
        self.vertices.reserve_additional(v)?;
        self.edges.reserve_additional(h.div_ceil(2))?;
        self.facets.reserve_additional(f)?;
        Ok(())
    }

    /// Remove all elements
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.facets.clear();
        self.border.invalidate();
    }

    #[inline]
    pub fn contains_vertex(&self, v: VertexHandle) -> bool {
        self.vertices.contains(v.index())
    }

    #[inline]
    pub fn contains_halfedge(&self, h: HalfedgeHandle) -> bool {
        h.is_valid() && self.edges.contains(h.edge())
    }

    #[inline]
    pub fn contains_facet(&self, f: FacetHandle) -> bool {
        self.facets.contains(f.index())
    }

    // =========================================================================
    // Incidence queries
    // =========================================================================

    #[inline]
    fn he(&self, h: HalfedgeHandle) -> &Halfedge {
        &self.edges[h.edge()].halves[h.side()]
    }

    #[inline]
    fn he_mut(&mut self, h: HalfedgeHandle) -> &mut Halfedge {
        &mut self.edges[h.edge()].halves[h.side()]
    }

    #[inline]
    pub fn opposite(&self, h: HalfedgeHandle) -> HalfedgeHandle {
        h.opposite()
    }

    /// Successor of `h` around its facet or hole
    #[inline]
    pub fn next(&self, h: HalfedgeHandle) -> HalfedgeHandle {
        self.he(h).next
    }

    /// Predecessor of `h` around its facet or hole. O(1) when `prev` is
    /// stored, otherwise a walk around the facet or hole.
    #[inline]
    pub fn prev(&self, h: HalfedgeHandle) -> HalfedgeHandle {
        if C::HALFEDGE_PREV {
            self.he(h).prev
        } else {
            self.find_prev(h)
        }
    }

    /// Target vertex of `h`
    #[inline]
    pub fn vertex(&self, h: HalfedgeHandle) -> VertexHandle {
        self.he(h).vertex
    }

    /// Incident facet of `h`, `None` for a border halfedge
    #[inline]
    pub fn facet(&self, h: HalfedgeHandle) -> Option<FacetHandle> {
        self.he(h).facet
    }

    /// Next halfedge around the target vertex (clockwise)
    #[inline]
    pub fn next_on_vertex(&self, h: HalfedgeHandle) -> HalfedgeHandle {
        self.next(h).opposite()
    }

    /// Previous halfedge around the target vertex (counter-clockwise)
    #[inline]
    pub fn prev_on_vertex(&self, h: HalfedgeHandle) -> HalfedgeHandle {
        self.prev(h.opposite())
    }

    /// `h` bounds a hole
    #[inline]
    pub fn is_border(&self, h: HalfedgeHandle) -> bool {
        self.he(h).facet.is_none()
    }

    /// `h` or its opposite bounds a hole
    #[inline]
    pub fn is_border_edge(&self, h: HalfedgeHandle) -> bool {
        self.is_border(h) || self.is_border(h.opposite())
    }

    /// Incident halfedge stored at `v`. Needs vertex back-pointers.
    pub fn vertex_halfedge(&self, v: VertexHandle) -> Option<HalfedgeHandle> {
        const { assert!(C::VERTEX_HALFEDGE, "vertex_halfedge needs Items::VERTEX_HALFEDGE") }
        self.vertices[v.index()].halfedge
    }

    /// Incident halfedge stored at `f`. Needs facet back-pointers.
    pub fn facet_halfedge(&self, f: FacetHandle) -> Option<HalfedgeHandle> {
        const { assert!(C::FACET_HALFEDGE, "facet_halfedge needs Items::FACET_HALFEDGE") }
        self.facets[f.index()].halfedge
    }

    /// Stored back-pointer of `v`, `None` when back-pointers are off
    #[inline]
    pub(crate) fn stored_vertex_halfedge(&self, v: VertexHandle) -> Option<HalfedgeHandle> {
        if C::VERTEX_HALFEDGE {
            self.vertices[v.index()].halfedge
        } else {
            None
        }
    }

    /// Stored back-pointer of `f`, `None` when back-pointers are off
    #[inline]
    pub(crate) fn stored_facet_halfedge(&self, f: FacetHandle) -> Option<HalfedgeHandle> {
        if C::FACET_HALFEDGE {
            self.facets[f.index()].halfedge
        } else {
            None
        }
    }

    #[inline]
    pub fn point(&self, v: VertexHandle) -> &C::Point {
        &self.vertices[v.index()].point
    }

    #[inline]
    pub fn point_mut(&mut self, v: VertexHandle) -> &mut C::Point {
        &mut self.vertices[v.index()].point
    }

    #[inline]
    pub fn plane(&self, f: FacetHandle) -> &C::Plane {
        &self.facets[f.index()].plane
    }

    #[inline]
    pub fn plane_mut(&mut self, f: FacetHandle) -> &mut C::Plane {
        &mut self.facets[f.index()].plane
    }

    /// Predecessor of `h` found by walking around its facet or hole
    pub(crate) fn find_prev(&self, h: HalfedgeHandle) -> HalfedgeHandle {
        let mut g = h;
        loop {
            let n = self.next(g);
            if n == h {
                return g;
            }
            g = n;
        }
    }

    // =========================================================================
    // Sequences
    // =========================================================================

    /// All vertices in sequence order
    pub fn vertices(&self) -> impl Iterator<Item = VertexHandle> + '_ {
        self.vertices.indices().map(VertexHandle::new)
    }

    /// All halfedges in sequence order. Both halfedges of an edge are
    /// adjacent in the sequence.
    pub fn halfedges(&self) -> impl Iterator<Item = HalfedgeHandle> + '_ {
        self.edges
            .indices()
            .flat_map(move |e| {
                let (first, second) = self.edge_halves(e);
                [first, second]
            })
    }

    /// The first halfedge of every edge, in sequence order
    pub fn edges(&self) -> impl Iterator<Item = HalfedgeHandle> + '_ {
        self.edges.indices().map(move |e| self.edge_halves(e).0)
    }

    /// All facets in sequence order
    pub fn facets(&self) -> impl Iterator<Item = FacetHandle> + '_ {
        self.facets.indices().map(FacetHandle::new)
    }

    /// Vertex payloads in vertex sequence order
    pub fn points(&self) -> impl Iterator<Item = &C::Point> + '_ {
        self.vertices.iter().map(|(_, v)| &v.point)
    }

    /// Facet payloads in facet sequence order
    pub fn planes(&self) -> impl Iterator<Item = &C::Plane> + '_ {
        self.facets.iter().map(|(_, f)| &f.plane)
    }

    /// The two halfedges of edge slot `e`, in sequence order
    #[inline]
    fn edge_halves(&self, e: usize) -> (HalfedgeHandle, HalfedgeHandle) {
        let first = self.edges[e].flipped as usize;
        (
            HalfedgeHandle::from_edge(e, first),
            HalfedgeHandle::from_edge(e, 1 - first),
        )
    }

    // =========================================================================
    // Raw construction and removal
    // =========================================================================

    /// Add a vertex with the given payload and no incident halfedge
    pub fn new_vertex(&mut self, point: C::Point) -> VertexHandle {
        VertexHandle::new(self.vertices.insert(Vertex {
            halfedge: None,
            point,
        }))
    }

    /// Add a vertex copying the payload of `v`
    pub fn new_vertex_like(&mut self, v: VertexHandle) -> VertexHandle {
        let point = self.point(v).clone();
        self.new_vertex(point)
    }

    /// Add an edge. The returned halfedge and its opposite are border
    /// halfedges linked to each other (`h.next() == h.opposite()`) with no
    /// target vertex set yet.
    pub fn new_edge(&mut self) -> HalfedgeHandle {
        let slot = self.edges.insert(Edge {
            halves: [Halfedge {
                next: HalfedgeHandle::INVALID,
                prev: HalfedgeHandle::INVALID,
                vertex: VertexHandle::INVALID,
                facet: None,
            }; 2],
            flipped: false,
        });
        let h = HalfedgeHandle::from_edge(slot, 0);
        let g = h.opposite();
        self.link(h, g);
        self.link(g, h);
        self.border.invalidate();
        h
    }

    /// Add a facet with the given payload and no incident halfedge
    pub fn new_facet(&mut self, plane: C::Plane) -> FacetHandle {
        FacetHandle::new(self.facets.insert(Facet {
            halfedge: None,
            plane,
        }))
    }

    /// Add a facet copying the payload of `f`
    pub fn new_facet_like(&mut self, f: FacetHandle) -> FacetHandle {
        let plane = self.plane(f).clone();
        self.new_facet(plane)
    }

    /// Remove a vertex. Halfedges still pointing to it are left dangling.
    pub fn delete_vertex(&mut self, v: VertexHandle) {
        const { assert!(C::REMOVAL, "delete_vertex needs Items::REMOVAL") }
        self.vertices.remove(v.index());
    }

    /// Remove the edge of `h`, i.e. `h` and its opposite
    pub fn delete_edge(&mut self, h: HalfedgeHandle) {
        const { assert!(C::REMOVAL, "delete_edge needs Items::REMOVAL") }
        self.edges.remove(h.edge());
        self.border.invalidate();
    }

    /// Remove a facet. Halfedges still referring to it are left dangling.
    pub fn delete_facet(&mut self, f: FacetHandle) {
        const { assert!(C::REMOVAL, "delete_facet needs Items::REMOVAL") }
        self.facets.remove(f.index());
    }

    // =========================================================================
    // Raw link setters
    // =========================================================================

    /// Set `h.next()`; does not touch `prev`
    #[inline]
    pub fn set_next(&mut self, h: HalfedgeHandle, next: HalfedgeHandle) {
        self.he_mut(h).next = next;
    }

    /// Set `h.prev()`; a no-op unless `prev` is stored
    #[inline]
    pub fn set_prev(&mut self, h: HalfedgeHandle, prev: HalfedgeHandle) {
        if C::HALFEDGE_PREV {
            self.he_mut(h).prev = prev;
        }
    }

    /// Make `next` follow `h`, keeping `prev` consistent
    #[inline]
    pub fn link(&mut self, h: HalfedgeHandle, next: HalfedgeHandle) {
        self.set_next(h, next);
        self.set_prev(next, h);
    }

    #[inline]
    pub fn set_vertex(&mut self, h: HalfedgeHandle, v: VertexHandle) {
        self.he_mut(h).vertex = v;
    }

    /// Set the incident facet; `None` makes `h` a border halfedge
    #[inline]
    pub fn set_facet(&mut self, h: HalfedgeHandle, f: Option<FacetHandle>) {
        self.he_mut(h).facet = f;
        self.border.invalidate();
    }

    /// Store `h` at `v`; a no-op without vertex back-pointers
    #[inline]
    pub fn set_vertex_halfedge(&mut self, v: VertexHandle, h: HalfedgeHandle) {
        if C::VERTEX_HALFEDGE {
            self.vertices[v.index()].halfedge = Some(h);
        }
    }

    /// Store `h` at `f`; a no-op without facet back-pointers
    #[inline]
    pub fn set_facet_halfedge(&mut self, f: FacetHandle, h: HalfedgeHandle) {
        if C::FACET_HALFEDGE {
            self.facets[f.index()].halfedge = Some(h);
        }
    }

    // =========================================================================
    // Helpers for the Euler operators
    // =========================================================================

    /// Store `h` at its target vertex
    #[inline]
    pub(crate) fn adopt_vertex_halfedge(&mut self, h: HalfedgeHandle) {
        let v = self.vertex(h);
        self.set_vertex_halfedge(v, h);
    }

    /// Store `h` at its facet, if it has one
    #[inline]
    pub(crate) fn adopt_facet_halfedge(&mut self, h: HalfedgeHandle) {
        if let Some(f) = self.facet(h) {
            self.set_facet_halfedge(f, h);
        }
    }

    /// Point every halfedge around the vertex cycle of `h` to `v`
    pub(crate) fn set_vertex_in_vertex_loop(&mut self, h: HalfedgeHandle, v: VertexHandle) {
        let mut g = h;
        loop {
            self.set_vertex(g, v);
            g = self.next_on_vertex(g);
            if g == h {
                break;
            }
        }
    }

    /// Assign `f` to every halfedge around the facet cycle of `h`
    pub(crate) fn set_facet_in_facet_loop(&mut self, h: HalfedgeHandle, f: Option<FacetHandle>) {
        let mut g = h;
        loop {
            self.set_facet(g, f);
            g = self.next(g);
            if g == h {
                break;
            }
        }
    }

    /// Insert the tip of `h` into the vertex cycle of `v`: `h.opposite()`
    /// becomes the successor of `v` and `h` takes over `v.next()`. The
    /// target of `h` becomes the target of `v`.
    pub(crate) fn insert_tip(&mut self, h: HalfedgeHandle, v: HalfedgeHandle) {
        let n = self.next(v);
        self.link(h, n);
        self.link(v, h.opposite());
        let target = self.vertex(v);
        self.set_vertex(h, target);
    }

    /// Remove the successor of `h` from its cycle around the target of `h`:
    /// `h.next()` becomes `h.next().opposite().next()`
    pub(crate) fn remove_tip(&mut self, h: HalfedgeHandle) {
        let n = self.next(self.next(h).opposite());
        self.link(h, n);
    }

    // =========================================================================
    // Border cache access
    // =========================================================================

    /// Drop the border normalization state
    pub(crate) fn invalidate_border(&mut self) {
        self.border.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_new_edge_is_self_linked() {
        let mut hds: HalfedgeDs<DefaultItems> = HalfedgeDs::new();
        let h = hds.new_edge();
        let g = hds.opposite(h);
        assert_eq!(hds.next(h), g);
        assert_eq!(hds.next(g), h);
        assert_eq!(hds.prev(h), g);
        assert!(hds.is_border(h) && hds.is_border(g));
        assert_eq!(hds.size_of_halfedges(), 2);
        assert_eq!(hds.size_of_edges(), 1);
    }

    #[test]
    fn test_find_prev_without_prev_links() {
        let mut hds: HalfedgeDs<CompactItems> = HalfedgeDs::new();
        let a = hds.new_edge();
        let b = hds.new_edge();
        let c = hds.new_edge();
        hds.link(a, b);
        hds.link(b, c);
        hds.link(c, a);
        assert_eq!(hds.prev(a), c);
        assert_eq!(hds.prev(b), a);
        assert_eq!(hds.prev(c), b);
    }

    #[test]
    fn test_payload_access() {
        let mut hds: HalfedgeDs<DefaultItems> = HalfedgeDs::new();
        let v = hds.new_vertex(Point3::new(1.0, 2.0, 3.0));
        let w = hds.new_vertex_like(v);
        assert_eq!(hds.point(w), &Point3::new(1.0, 2.0, 3.0));
        hds.point_mut(w).x = 5.0;
        assert_eq!(hds.point(v).x, 1.0);
        assert_eq!(hds.points().count(), 2);
        assert_eq!(hds.vertex_halfedge(v), None);
    }

    #[test]
    fn test_reserve_and_clear() {
        let mut hds: HalfedgeDs<DefaultItems> = HalfedgeDs::new();
        hds.reserve(10, 30, 12).unwrap();
        assert!(hds.capacity_of_vertices() >= 10);
        assert!(hds.capacity_of_halfedges() >= 30);
        assert!(hds.capacity_of_facets() >= 12);
        assert!(hds.bytes_reserved() >= hds.bytes());

        hds.new_vertex(Point3::origin());
        hds.new_edge();
        hds.new_facet(Default::default());
        assert!(!hds.is_empty());
        hds.clear();
        assert!(hds.empty());
        assert_eq!(hds.size_of_halfedges(), 0);
    }

    #[test]
    fn test_delete_edge_frees_both_halves() {
        let mut hds: HalfedgeDs<DefaultItems> = HalfedgeDs::new();
        let h = hds.new_edge();
        let keep = hds.new_edge();
        hds.delete_edge(h.opposite());
        assert!(!hds.contains_halfedge(h));
        assert!(hds.contains_halfedge(keep));
        assert_eq!(hds.halfedges().count(), 2);
    }

    #[test]
    fn test_removed_handles_are_not_reused() {
        let mut hds: HalfedgeDs<DefaultItems> = HalfedgeDs::new();
        let v = hds.new_vertex(Point3::origin());
        let h = hds.new_edge();
        let f = hds.new_facet(Default::default());
        hds.delete_vertex(v);
        hds.delete_edge(h);
        hds.delete_facet(f);

        let w = hds.new_vertex(Point3::origin());
        let g = hds.new_edge();
        let e = hds.new_facet(Default::default());
        assert_ne!(w, v);
        assert_ne!(g, h);
        assert_ne!(g, h.opposite());
        assert_ne!(e, f);
        assert!(!hds.contains_vertex(v));
        assert!(!hds.contains_halfedge(h));
        assert!(!hds.contains_facet(f));
    }

    #[test]
    #[should_panic(expected = "stale handle")]
    fn test_stale_vertex_after_new_vertex_panics() {
        let mut hds: HalfedgeDs<DefaultItems> = HalfedgeDs::new();
        let v = hds.new_vertex(Point3::origin());
        hds.delete_vertex(v);
        hds.new_vertex(Point3::new(1.0, 0.0, 0.0));
        let _ = hds.point(v);
    }

    #[test]
    #[should_panic(expected = "stale handle")]
    fn test_stale_halfedge_after_new_edge_panics() {
        let mut hds: HalfedgeDs<DefaultItems> = HalfedgeDs::new();
        let h = hds.new_edge();
        hds.delete_edge(h);
        hds.new_edge();
        let _ = hds.next(h);
    }
}
