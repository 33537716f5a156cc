// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Facet, vertex, edge and center-vertex operators
//!
//! Every splitting operator has an exact inverse:
//!
//! ```text
//! join_facet(split_facet(h, g))             == h
//! join_vertex(split_vertex(h, g))           == h
//! erase_center_vertex(create_center_vertex(h)) == h
//! ```
//!
//! Preconditions are checked before the first mutation and panic with the
//! name of the operator.

use super::Polyhedron;
use crate::hds::{HalfedgeHandle, Items};
use ahash::AHashSet;

impl<C: Items> Polyhedron<C> {
    /// Split the facet of `h` and `g` by a new edge from the target of `h`
    /// to the target of `g`. The new facet lies on the side of `g`.
    /// Returns the new halfedge, which is `h.next()` afterwards.
    pub fn split_facet(&mut self, h: HalfedgeHandle, g: HalfedgeHandle) -> HalfedgeHandle {
        let hds = &mut self.hds;
        let Some(f) = hds.facet(h) else {
            panic!("split_facet: {h} is a border halfedge");
        };
        assert!(h != g, "split_facet: {h} given twice");
        assert!(
            hds.facet(g) == Some(f),
            "split_facet: {h} and {g} lie on different facets"
        );
        assert!(
            hds.next(h) != g && hds.next(g) != h,
            "split_facet: {h} and {g} are adjacent"
        );

        let hnew = hds.new_edge();
        hds.insert_tip(hnew, g);
        hds.insert_tip(hnew.opposite(), h);

        hds.set_facet(hnew, Some(f));
        let fnew = hds.new_facet_like(f);
        hds.set_facet_in_facet_loop(hnew.opposite(), Some(fnew));
        hds.set_facet_halfedge(fnew, hnew.opposite());
        hds.adopt_facet_halfedge(hnew);
        hnew
    }

    /// Remove the edge of `h`, merging the facet of `h.opposite()` into the
    /// facet of `h`. Both sides of the edge must be facets. Returns the
    /// predecessor of `h` on the merged facet.
    pub fn join_facet(&mut self, h: HalfedgeHandle) -> HalfedgeHandle {
        const { assert!(C::REMOVAL, "join_facet needs Items::REMOVAL") }
        let hds = &mut self.hds;
        assert!(
            !hds.is_border_edge(h),
            "join_facet: the edge of {h} borders a hole"
        );
        assert!(
            hds.facet(h) != hds.facet(h.opposite()),
            "join_facet: both sides of {h} lie on the same facet"
        );
        assert!(
            hds.vertex_degree(h) >= 3 && hds.vertex_degree(h.opposite()) >= 3,
            "join_facet: an end vertex of {h} would be left dangling"
        );

        let hprev = hds.prev(h);
        let gprev = hds.prev(h.opposite());
        let f = hds.facet(h);
        let gone = hds.facet(h.opposite());

        hds.remove_tip(hprev);
        hds.remove_tip(gprev);
        hds.delete_edge(h);
        if let Some(gone) = gone {
            hds.delete_facet(gone);
        }
        hds.set_facet_in_facet_loop(hprev, f);
        hds.adopt_facet_halfedge(hprev);
        hds.adopt_vertex_halfedge(hprev);
        hds.adopt_vertex_halfedge(gprev);
        hprev
    }

    /// Split the target vertex of `h` and `g` in two, connected by a new
    /// edge. The halfedges from `g` (exclusive) around to `h` (inclusive)
    /// clockwise keep the old vertex; the others move to a copy of it.
    /// Returns the new halfedge pointing to the old vertex.
    pub fn split_vertex(&mut self, h: HalfedgeHandle, g: HalfedgeHandle) -> HalfedgeHandle {
        let hds = &mut self.hds;
        assert!(h != g, "split_vertex: {h} given twice");
        assert!(
            hds.vertex(h) == hds.vertex(g),
            "split_vertex: {h} and {g} point to different vertices"
        );

        let v = hds.vertex(h);
        let hnew = hds.new_edge();
        let gnew = hnew.opposite();
        let (hn, gn) = (hds.next(h), hds.next(g));

        hds.link(hnew, gn);
        hds.link(g, hnew);
        hds.link(gnew, hn);
        hds.link(h, gnew);
        let (fh, fg) = (hds.facet(h), hds.facet(g));
        hds.set_facet(hnew, fg);
        hds.set_facet(gnew, fh);

        hds.set_vertex(hnew, v);
        let vnew = hds.new_vertex_like(v);
        hds.set_vertex_in_vertex_loop(gnew, vnew);
        hds.set_vertex_halfedge(v, hnew);
        hds.set_vertex_halfedge(vnew, gnew);
        hnew
    }

    /// Contract the edge of `h` into the target of `h`, removing the
    /// source vertex. Returns the predecessor of `h` around the merged
    /// vertex.
    pub fn join_vertex(&mut self, h: HalfedgeHandle) -> HalfedgeHandle {
        const { assert!(C::REMOVAL, "join_vertex needs Items::REMOVAL") }
        let hds = &mut self.hds;
        assert!(
            hds.facet_degree(h) >= 4 && hds.facet_degree(h.opposite()) >= 4,
            "join_vertex: a facet incident to {h} has fewer than four sides"
        );

        let g = h.opposite();
        let v = hds.vertex(h);
        let removed = hds.vertex(g);
        let hp = hds.prev(g);
        let gp = hds.prev(h);
        let (hn, gn) = (hds.next(h), hds.next(g));

        hds.link(hp, gn);
        hds.link(gp, hn);
        hds.adopt_facet_halfedge(hp);
        hds.adopt_facet_halfedge(gp);
        hds.set_vertex_in_vertex_loop(hp, v);
        hds.set_vertex_halfedge(v, hp);

        hds.delete_vertex(removed);
        hds.delete_edge(h);
        hp
    }

    /// Subdivide the edge of `h` by a new vertex, a copy of the source of
    /// `h`. Returns the new halfedge `hnew` with `hnew.next() == h`.
    pub fn split_edge(&mut self, h: HalfedgeHandle) -> HalfedgeHandle {
        let prev = self.hds.prev(h);
        self.split_vertex(prev, h.opposite()).opposite()
    }

    /// Turn the edge of `h` within the quadrilateral formed by its two
    /// triangles: afterwards it connects the two apexes. Returns `h`.
    pub fn flip_edge(&mut self, h: HalfedgeHandle) -> HalfedgeHandle {
        let hds = &mut self.hds;
        let g = h.opposite();
        assert!(
            !hds.is_border_edge(h),
            "flip_edge: {h} is a border edge"
        );
        assert!(
            hds.facet_is_triangle(h) && hds.facet_is_triangle(g),
            "flip_edge: a facet incident to {h} is not a triangle"
        );

        let h1 = hds.next(h);
        let h2 = hds.next(h1);
        let g1 = hds.next(g);
        let g2 = hds.next(g1);
        let (fh, fg) = (hds.facet(h), hds.facet(g));
        let apex_h = hds.vertex(h1);
        let apex_g = hds.vertex(g1);

        hds.link(h, h2);
        hds.link(h2, g1);
        hds.link(g1, h);
        hds.link(g, g2);
        hds.link(g2, h1);
        hds.link(h1, g);

        hds.set_vertex(h, apex_h);
        hds.set_vertex(g, apex_g);
        hds.set_facet(g1, fh);
        hds.set_facet(h1, fg);
        hds.adopt_facet_halfedge(h);
        hds.adopt_facet_halfedge(g);
        hds.adopt_vertex_halfedge(h2);
        hds.adopt_vertex_halfedge(g2);
        h
    }

    /// Triangulate the facet of `h` by a new vertex connected to each of
    /// its vertices. The new vertex copies the target of `h`. Returns the
    /// new halfedge `h.next()`, pointing to the new vertex.
    pub fn create_center_vertex(&mut self, h: HalfedgeHandle) -> HalfedgeHandle {
        let hds = &mut self.hds;
        let Some(f) = hds.facet(h) else {
            panic!("create_center_vertex: {h} is a border halfedge");
        };

        let ring: Vec<_> = hds.halfedges_around_facet(h).collect();
        let center = hds.new_vertex_like(hds.vertex(h));
        let spokes: Vec<_> = ring
            .iter()
            .map(|&r| {
                let s = hds.new_edge();
                let outer = hds.vertex(r);
                hds.set_vertex(s, center);
                hds.set_vertex(s.opposite(), outer);
                s
            })
            .collect();

        let k = ring.len();
        for i in 0..k {
            let back = spokes[(i + k - 1) % k].opposite();
            hds.link(ring[i], spokes[i]);
            hds.link(spokes[i], back);
            hds.link(back, ring[i]);

            let facet = if i == 0 { f } else { hds.new_facet_like(f) };
            for x in [ring[i], spokes[i], back] {
                hds.set_facet(x, Some(facet));
            }
            hds.set_facet_halfedge(facet, ring[i]);
        }
        hds.set_vertex_halfedge(center, spokes[0]);
        spokes[0]
    }

    /// Remove the target vertex of `g` with all its edges, merging the
    /// incident facets into one. Returns `g.prev()`.
    pub fn erase_center_vertex(&mut self, g: HalfedgeHandle) -> HalfedgeHandle {
        const { assert!(C::REMOVAL, "erase_center_vertex needs Items::REMOVAL") }
        let hds = &mut self.hds;
        let spokes: Vec<_> = hds.halfedges_around_vertex(g).collect();
        assert!(
            spokes.iter().all(|&s| !hds.is_border(s)),
            "erase_center_vertex: the vertex of {g} is incident to a hole"
        );

        // Facets across the outer ring; a single one would close the
        // merged facet onto it
        let mut surrounding = AHashSet::new();
        for &s in &spokes {
            let stop = hds.prev(s);
            let mut r = hds.next(hds.next(s));
            loop {
                surrounding.insert(hds.facet(r.opposite()));
                if r == stop {
                    break;
                }
                r = hds.next(r);
            }
        }
        assert!(
            surrounding.len() >= 2 || surrounding.contains(&None),
            "erase_center_vertex: the merged facet of {g} would collapse onto its neighbor"
        );

        let hret = hds.prev(g);
        let mut s = hds.next_on_vertex(g);
        while s != g {
            let sprev = hds.prev(s);
            hds.adopt_vertex_halfedge(sprev);
            hds.remove_tip(sprev);
            if let Some(f) = hds.facet(s) {
                hds.delete_facet(f);
            }
            let snext = hds.next_on_vertex(s);
            hds.delete_edge(s);
            s = snext;
        }

        hds.adopt_vertex_halfedge(hret);
        hds.remove_tip(hret);
        let center = hds.vertex(g);
        hds.delete_vertex(center);
        hds.delete_edge(g);
        let f = hds.facet(hret);
        hds.set_facet_in_facet_loop(hret, f);
        hds.adopt_facet_halfedge(hret);
        hret
    }
}
