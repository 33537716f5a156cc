// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Erasure of facets and connected components

use super::Polyhedron;
use crate::hds::{FacetHandle, HalfedgeDs, HalfedgeHandle, Items, VertexHandle};
use ahash::{AHashMap, AHashSet};
use std::collections::VecDeque;
use tracing::debug;

/// Elements reachable from one halfedge
#[derive(Debug, Default)]
struct Component {
    vertices: Vec<VertexHandle>,
    halfedges: Vec<HalfedgeHandle>,
    facets: Vec<FacetHandle>,
}

impl Component {
    fn collect<C: Items>(hds: &HalfedgeDs<C>, start: HalfedgeHandle) -> Self {
        let mut component = Component::default();
        let mut seen_halfedges = AHashSet::new();
        let mut seen_vertices = AHashSet::new();
        let mut seen_facets = AHashSet::new();
        let mut queue = VecDeque::from([start]);

        while let Some(h) = queue.pop_front() {
            if !seen_halfedges.insert(h) {
                continue;
            }
            component.halfedges.push(h);
            let v = hds.vertex(h);
            if seen_vertices.insert(v) {
                component.vertices.push(v);
            }
            if let Some(f) = hds.facet(h) {
                if seen_facets.insert(f) {
                    component.facets.push(f);
                }
            }
            queue.push_back(hds.next(h));
            queue.push_back(h.opposite());
        }
        component
    }

    fn size(&self) -> usize {
        self.vertices.len() + self.halfedges.len() + self.facets.len()
    }

    fn erase<C: Items>(self, hds: &mut HalfedgeDs<C>) {
        for f in self.facets {
            hds.delete_facet(f);
        }
        for v in self.vertices {
            hds.delete_vertex(v);
        }
        for h in self.halfedges {
            if h < h.opposite() {
                hds.delete_edge(h);
            }
        }
    }
}

impl<C: Items> Polyhedron<C> {
    /// Remove the facet of `h`. Its edges become border edges, except
    /// edges that already bordered a hole: those are removed, and so is
    /// every vertex left without edges. Unlike
    /// [`make_hole`](Self::make_hole) the facet may touch holes.
    pub fn erase_facet(&mut self, h: HalfedgeHandle) {
        const { assert!(C::REMOVAL, "erase_facet needs Items::REMOVAL") }
        let hds = &mut self.hds;
        let Some(f) = hds.facet(h) else {
            panic!("erase_facet: {h} is a border halfedge");
        };

        let cycle: Vec<_> = hds.halfedges_around_facet(h).collect();
        hds.delete_facet(f);
        hds.set_facet_in_facet_loop(h, None);

        for x in cycle {
            let y = x.opposite();
            if !hds.is_border(y) {
                continue;
            }
            // Both sides are holes now: splice the edge out at both ends
            let (px, nx) = (hds.prev(x), hds.next(x));
            let (py, ny) = (hds.prev(y), hds.next(y));
            let (vx, vy) = (hds.vertex(x), hds.vertex(y));
            if nx == y {
                hds.delete_vertex(vx);
            } else {
                hds.link(py, nx);
                hds.adopt_vertex_halfedge(py);
            }
            if ny == x {
                hds.delete_vertex(vy);
            } else {
                hds.link(px, ny);
                hds.adopt_vertex_halfedge(px);
            }
            hds.delete_edge(x);
        }
    }

    /// Remove every element reachable from `h`
    pub fn erase_connected_component(&mut self, h: HalfedgeHandle) {
        const { assert!(C::REMOVAL, "erase_connected_component needs Items::REMOVAL") }
        Component::collect(&self.hds, h).erase(&mut self.hds);
    }

    /// Keep the `n` largest connected components, ranked by their number
    /// of vertices, halfedges and facets, and remove the others together
    /// with all isolated vertices. Components of equal size rank in the
    /// order their first vertex appears. Returns the number of components
    /// removed, not counting isolated vertices.
    pub fn keep_largest_connected_components(&mut self, n: usize) -> usize {
        const {
            assert!(
                C::REMOVAL,
                "keep_largest_connected_components needs Items::REMOVAL"
            )
        }
        let hds = &mut self.hds;

        let mut incident: AHashMap<VertexHandle, HalfedgeHandle> =
            AHashMap::with_capacity(hds.size_of_vertices());
        for h in hds.halfedges() {
            incident.entry(hds.vertex(h)).or_insert(h);
        }

        let mut components = Vec::new();
        let mut isolated = Vec::new();
        let mut assigned = AHashSet::with_capacity(hds.size_of_vertices());
        for v in hds.vertices() {
            if assigned.contains(&v) {
                continue;
            }
            match incident.get(&v) {
                Some(&h) => {
                    let component = Component::collect(hds, h);
                    assigned.extend(component.vertices.iter().copied());
                    components.push(component);
                }
                None => isolated.push(v),
            }
        }

        // Stable sort keeps discovery order among equal sizes
        components.sort_by(|a, b| b.size().cmp(&a.size()));
        let found = components.len();
        let erased: Vec<_> = components.into_iter().skip(n).collect();
        let count = erased.len();
        for component in erased {
            component.erase(hds);
        }
        for v in &isolated {
            hds.delete_vertex(*v);
        }

        debug!(
            components = found,
            kept = found - count,
            erased = count,
            isolated_vertices = isolated.len(),
            "kept largest connected components"
        );
        count
    }
}
