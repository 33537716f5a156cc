// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Loop operators
//!
//! `split_loop` cuts the surface along a cycle of three edges and closes
//! both sides with a triangle; `join_loop` glues two facets of equal
//! degree together. These change the genus or the number of components.

use super::Polyhedron;
use crate::hds::{HalfedgeHandle, Items};
use ahash::{AHashMap, AHashSet};

impl<C: Items> Polyhedron<C> {
    /// Cut along the edge cycle `h`, `i`, `j` (the target of each is the
    /// source of the next). The cycle is duplicated: `h`, `i` and `j` end
    /// up on a first new triangle with their opposites and old vertices,
    /// while copies of the edges and vertices take their place on the
    /// facets of `h`, `i` and `j` and bound a second new triangle.
    /// Returns the halfedge of the second triangle that copies
    /// `h.opposite()`.
    pub fn split_loop(
        &mut self,
        h: HalfedgeHandle,
        i: HalfedgeHandle,
        j: HalfedgeHandle,
    ) -> HalfedgeHandle {
        let hds = &mut self.hds;
        assert!(
            h != i && i != j && h != j,
            "split_loop: {h}, {i} and {j} must be distinct"
        );
        assert!(
            hds.vertex(h) == hds.vertex(i.opposite())
                && hds.vertex(i) == hds.vertex(j.opposite())
                && hds.vertex(j) == hds.vertex(h.opposite()),
            "split_loop: {h}, {i} and {j} do not form a cycle"
        );
        let around = [h, i, j, h.opposite(), i.opposite(), j.opposite()];
        let facets: AHashSet<_> = around.iter().filter_map(|&x| hds.facet(x)).collect();
        assert!(
            facets.len() == 6,
            "split_loop: the six facets along {h}, {i} and {j} must be distinct"
        );

        let cycle = [h, i, j];
        let neighbors = cycle.map(|x| (hds.prev(x), hds.next(x)));
        let old_facets = cycle.map(|x| hds.facet(x));
        let copies = cycle.map(|_| hds.new_edge());
        let vertices = cycle.map(|x| {
            let v = hds.vertex(x);
            hds.new_vertex_like(v)
        });
        let t1 = hds.new_facet(Default::default());
        let t2 = hds.new_facet(Default::default());

        // Copies take the place of the cycle on its facets
        for k in 0..3 {
            let (p, n) = neighbors[k];
            hds.link(p, copies[k]);
            hds.link(copies[k], n);
            hds.set_facet(copies[k], old_facets[k]);
            hds.adopt_facet_halfedge(copies[k]);
        }

        // First triangle: h -> i -> j
        for k in 0..3 {
            hds.link(cycle[k], cycle[(k + 1) % 3]);
            hds.set_facet(cycle[k], Some(t1));
        }
        hds.set_facet_halfedge(t1, h);

        // Second triangle runs the other way round
        let back = copies.map(|c| c.opposite());
        for k in 0..3 {
            hds.link(back[k], back[(k + 2) % 3]);
            hds.set_facet(back[k], Some(t2));
        }
        hds.set_facet_halfedge(t2, back[0]);

        // Copy k points to the copy of the target of cycle k; its opposite
        // to the copy of the source
        for k in 0..3 {
            hds.set_vertex(copies[k], vertices[k]);
            hds.set_vertex(back[k], vertices[(k + 2) % 3]);
        }
        for k in 0..3 {
            hds.set_vertex_in_vertex_loop(copies[k], vertices[k]);
            hds.set_vertex_halfedge(vertices[k], copies[k]);
            hds.adopt_vertex_halfedge(cycle[k]);
        }
        back[0]
    }

    /// Glue the facet of `g` onto the facet of `h`. The two facets must be
    /// distinct and of equal degree; `h` is matched with `g`, `h.next()`
    /// with `g.prev()` and so on. Both facets, the edges of the facet of
    /// `g` and its vertices are removed. Returns `h`.
    pub fn join_loop(&mut self, h: HalfedgeHandle, g: HalfedgeHandle) -> HalfedgeHandle {
        const { assert!(C::REMOVAL, "join_loop needs Items::REMOVAL") }
        let hds = &mut self.hds;
        let (Some(fh), Some(fg)) = (hds.facet(h), hds.facet(g)) else {
            panic!("join_loop: {h} and {g} must both lie on facets");
        };
        assert!(fh != fg, "join_loop: {h} and {g} lie on the same facet");

        let hs: Vec<_> = hds.halfedges_around_facet(h).collect();
        let mut gs = Vec::with_capacity(hs.len());
        let mut x = g;
        loop {
            gs.push(x);
            x = hds.prev(x);
            if x == g {
                break;
            }
        }
        assert!(
            hs.len() == gs.len(),
            "join_loop: facets of {h} and {g} differ in degree"
        );
        let kept: AHashSet<_> = hs.iter().map(|&x| hds.vertex(x)).collect();
        let dead: Vec<_> = gs.iter().map(|&x| hds.vertex(x.opposite())).collect();
        assert!(
            dead.iter().all(|v| !kept.contains(v)),
            "join_loop: facets of {h} and {g} share a vertex"
        );

        // Halfedges that take over from g's opposites
        let replaced: AHashMap<HalfedgeHandle, HalfedgeHandle> = gs
            .iter()
            .zip(&hs)
            .map(|(&x, &y)| (x.opposite(), y))
            .collect();
        let substitute = |x: HalfedgeHandle| replaced.get(&x).copied().unwrap_or(x);
        let links: Vec<_> = gs
            .iter()
            .map(|&x| {
                let outer = x.opposite();
                (
                    substitute(hds.prev(outer)),
                    substitute(hds.next(outer)),
                    hds.facet(outer),
                )
            })
            .collect();

        for (k, &(p, n, facet)) in links.iter().enumerate() {
            hds.link(p, hs[k]);
            hds.link(hs[k], n);
            hds.set_facet(hs[k], facet);
            hds.adopt_facet_halfedge(hs[k]);
        }
        for &x in &hs {
            let v = hds.vertex(x);
            hds.set_vertex_in_vertex_loop(x, v);
            hds.set_vertex_halfedge(v, x);
        }

        hds.delete_facet(fh);
        hds.delete_facet(fg);
        let mut removed = AHashSet::with_capacity(dead.len());
        for v in dead {
            if removed.insert(v) {
                hds.delete_vertex(v);
            }
        }
        for x in gs {
            hds.delete_edge(x);
        }
        h
    }
}
