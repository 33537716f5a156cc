// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Degree and shape predicates
//!
//! Halfedge-level predicates work for every configuration. Vertex- and
//! facet-level variants go through the stored back-pointer and refuse to
//! compile without it. Mesh-level `is_pure_*` tests scan every element.

use super::{FacetHandle, HalfedgeDs, HalfedgeHandle, Items, VertexHandle};
use ahash::{AHashMap, AHashSet};

/// Halfedges in a tetrahedron
const TETRAHEDRON_HALFEDGES: usize = 12;

impl<C: Items> HalfedgeDs<C> {
    // =========================================================================
    // Halfedge granularity
    // =========================================================================

    /// Number of halfedges pointing to the target of `h`
    pub fn vertex_degree(&self, h: HalfedgeHandle) -> usize {
        self.halfedges_around_vertex(h).count()
    }

    /// Number of halfedges around the facet or hole of `h`
    pub fn facet_degree(&self, h: HalfedgeHandle) -> usize {
        self.halfedges_around_facet(h).count()
    }

    /// The target of `h` has degree two
    pub fn is_bivalent(&self, h: HalfedgeHandle) -> bool {
        let g = self.next_on_vertex(h);
        g != h && self.next_on_vertex(g) == h
    }

    /// The target of `h` has degree three
    pub fn is_trivalent(&self, h: HalfedgeHandle) -> bool {
        let g = self.next_on_vertex(h);
        if g == h {
            return false;
        }
        let k = self.next_on_vertex(g);
        k != h && self.next_on_vertex(k) == h
    }

    /// The facet or hole of `h` has three sides
    pub fn facet_is_triangle(&self, h: HalfedgeHandle) -> bool {
        let n = self.next(h);
        n != h && self.next(n) != h && self.next(self.next(n)) == h
    }

    /// The facet or hole of `h` has four sides
    pub fn facet_is_quad(&self, h: HalfedgeHandle) -> bool {
        let mut g = h;
        for _ in 0..3 {
            g = self.next(g);
            if g == h {
                return false;
            }
        }
        self.next(g) == h
    }

    // =========================================================================
    // Vertex and facet granularity
    // =========================================================================

    /// Degree of `v`, zero when isolated. Needs vertex back-pointers.
    pub fn degree_of_vertex(&self, v: VertexHandle) -> usize {
        const { assert!(C::VERTEX_HALFEDGE, "degree_of_vertex needs Items::VERTEX_HALFEDGE") }
        self.stored_vertex_halfedge(v)
            .map_or(0, |h| self.vertex_degree(h))
    }

    pub fn is_bivalent_vertex(&self, v: VertexHandle) -> bool {
        const { assert!(C::VERTEX_HALFEDGE, "is_bivalent_vertex needs Items::VERTEX_HALFEDGE") }
        self.stored_vertex_halfedge(v)
            .is_some_and(|h| self.is_bivalent(h))
    }

    pub fn is_trivalent_vertex(&self, v: VertexHandle) -> bool {
        const { assert!(C::VERTEX_HALFEDGE, "is_trivalent_vertex needs Items::VERTEX_HALFEDGE") }
        self.stored_vertex_halfedge(v)
            .is_some_and(|h| self.is_trivalent(h))
    }

    /// Degree of `f`. Needs facet back-pointers.
    pub fn degree_of_facet(&self, f: FacetHandle) -> usize {
        const { assert!(C::FACET_HALFEDGE, "degree_of_facet needs Items::FACET_HALFEDGE") }
        self.stored_facet_halfedge(f)
            .map_or(0, |h| self.facet_degree(h))
    }

    pub fn is_triangle_facet(&self, f: FacetHandle) -> bool {
        const { assert!(C::FACET_HALFEDGE, "is_triangle_facet needs Items::FACET_HALFEDGE") }
        self.stored_facet_halfedge(f)
            .is_some_and(|h| self.facet_is_triangle(h))
    }

    pub fn is_quad_facet(&self, f: FacetHandle) -> bool {
        const { assert!(C::FACET_HALFEDGE, "is_quad_facet needs Items::FACET_HALFEDGE") }
        self.stored_facet_halfedge(f)
            .is_some_and(|h| self.facet_is_quad(h))
    }

    // =========================================================================
    // Whole mesh
    // =========================================================================

    /// No halfedge bounds a hole
    pub fn is_closed(&self) -> bool {
        self.halfedges().all(|h| !self.is_border(h))
    }

    /// Every vertex has degree two
    pub fn is_pure_bivalent(&self) -> bool {
        self.all_vertex_degrees(2)
    }

    /// Every vertex has degree three
    pub fn is_pure_trivalent(&self) -> bool {
        self.all_vertex_degrees(3)
    }

    /// Every facet is a triangle
    pub fn is_pure_triangle(&self) -> bool {
        self.facet_halfedge_representatives()
            .all(|h| self.facet_is_triangle(h))
    }

    /// Every facet is a quadrilateral
    pub fn is_pure_quad(&self) -> bool {
        self.facet_halfedge_representatives()
            .all(|h| self.facet_is_quad(h))
    }

    /// Number of halfedges pointing to each vertex; isolated vertices map
    /// to zero
    pub(crate) fn vertex_degrees(&self) -> AHashMap<VertexHandle, usize> {
        let mut degrees: AHashMap<VertexHandle, usize> =
            self.vertices().map(|v| (v, 0)).collect();
        for h in self.halfedges() {
            if let Some(d) = degrees.get_mut(&self.vertex(h)) {
                *d += 1;
            }
        }
        degrees
    }

    fn all_vertex_degrees(&self, degree: usize) -> bool {
        if C::VERTEX_HALFEDGE {
            self.vertices().all(|v| {
                self.stored_vertex_halfedge(v)
                    .is_some_and(|h| self.vertex_degree(h) == degree)
            })
        } else {
            self.vertex_degrees().values().all(|&d| d == degree)
        }
    }

    /// One halfedge per facet, found from the halfedges so it also works
    /// without facet back-pointers
    fn facet_halfedge_representatives(&self) -> impl Iterator<Item = HalfedgeHandle> + '_ {
        let mut seen = AHashSet::new();
        self.halfedges()
            .filter(move |&h| self.facet(h).is_some_and(|f| seen.insert(f)))
    }

    // =========================================================================
    // Connected component shape
    // =========================================================================

    /// The component of `h` is a single triangle with a hole on the other
    /// side
    pub fn is_triangle(&self, h: HalfedgeHandle) -> bool {
        if !self.facet_is_triangle(h) {
            return false;
        }
        let h1 = h;
        let h2 = self.next(h1);
        let h3 = self.next(h2);

        // Opposite cycle must be the reversed triangle
        if self.next(h1.opposite()) != h3.opposite()
            || self.next(h2.opposite()) != h1.opposite()
            || self.next(h3.opposite()) != h2.opposite()
        {
            return false;
        }

        // One side is the facet, the other the hole
        let inner_border = [h1, h2, h3].map(|g| self.is_border(g));
        let outer_border = [h1, h2, h3].map(|g| self.is_border(g.opposite()));
        let one_sided = (inner_border == [false; 3] && outer_border == [true; 3])
            || (inner_border == [true; 3] && outer_border == [false; 3]);
        if !one_sided {
            return false;
        }
        let facet = if inner_border[0] { h1.opposite() } else { h1 };
        if self.facet(facet) != self.facet(self.next(facet))
            || self.facet(facet) != self.facet(self.next(self.next(facet)))
        {
            return false;
        }

        let (a, b, c) = (self.vertex(h1), self.vertex(h2), self.vertex(h3));
        a != b && b != c && a != c
    }

    /// The component of `h` is a tetrahedron: four triangles, four
    /// trivalent vertices and no hole. The walk stops after twelve
    /// halfedges.
    pub fn is_tetrahedron(&self, h: HalfedgeHandle) -> bool {
        let mut seen = AHashSet::with_capacity(TETRAHEDRON_HALFEDGES);
        let mut stack = vec![h];
        while let Some(g) = stack.pop() {
            if !seen.insert(g) {
                continue;
            }
            if seen.len() > TETRAHEDRON_HALFEDGES {
                return false;
            }
            if self.is_border(g) || !self.facet_is_triangle(g) || !self.is_trivalent(g) {
                return false;
            }
            stack.push(self.next(g));
            stack.push(g.opposite());
        }
        if seen.len() != TETRAHEDRON_HALFEDGES {
            return false;
        }

        let vertices: AHashSet<_> = seen.iter().map(|&g| self.vertex(g)).collect();
        let facets: AHashSet<_> = seen.iter().filter_map(|&g| self.facet(g)).collect();
        vertices.len() == 4 && facets.len() == 4
    }
}
