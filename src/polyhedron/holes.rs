// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Hole operators

use super::Polyhedron;
use crate::hds::{HalfedgeDs, HalfedgeHandle, Items};

impl<C: Items> Polyhedron<C> {
    /// Remove the facet of `h`, turning its boundary into a hole. No edge
    /// of the facet may already lie on a hole. Returns `h`.
    pub fn make_hole(&mut self, h: HalfedgeHandle) -> HalfedgeHandle {
        const { assert!(C::REMOVAL, "make_hole needs Items::REMOVAL") }
        let hds = &mut self.hds;
        let Some(f) = hds.facet(h) else {
            panic!("make_hole: {h} is a border halfedge");
        };
        assert!(
            hds.halfedges_around_facet(h).all(|x| !hds.is_border(x.opposite())),
            "make_hole: the facet of {h} already touches a hole"
        );

        hds.delete_facet(f);
        hds.set_facet_in_facet_loop(h, None);
        h
    }

    /// Close the hole of `h` with a new facet. Returns `h`.
    pub fn fill_hole(&mut self, h: HalfedgeHandle) -> HalfedgeHandle {
        let hds = &mut self.hds;
        assert!(hds.is_border(h), "fill_hole: {h} is not a border halfedge");

        let f = hds.new_facet(Default::default());
        hds.set_facet_in_facet_loop(h, Some(f));
        hds.set_facet_halfedge(f, h);
        h
    }

    /// Cut off the part of the hole from `h.next()` to `g` with a new
    /// facet, closed by two new edges meeting at a new vertex. Returns the
    /// new halfedge pointing to the new vertex; it lies on the new facet,
    /// right after `g`.
    pub fn add_vertex_and_facet_to_border(
        &mut self,
        h: HalfedgeHandle,
        g: HalfedgeHandle,
    ) -> HalfedgeHandle {
        let hds = &mut self.hds;
        check_border_pair(hds, "add_vertex_and_facet_to_border", h, g);

        let (hn, gn) = (hds.next(h), hds.next(g));
        let (vh, vg) = (hds.vertex(h), hds.vertex(g));
        let w = hds.new_vertex(Default::default());
        let a = hds.new_edge();
        let b = hds.new_edge();

        hds.set_vertex(a, w);
        hds.set_vertex(b, w);
        hds.set_vertex(a.opposite(), vh);
        hds.set_vertex(b.opposite(), vg);
        hds.set_vertex_halfedge(w, b);

        // Remaining hole: h -> a -> b' -> gn
        hds.link(h, a);
        hds.link(a, b.opposite());
        hds.link(b.opposite(), gn);
        // New facet: g -> b -> a' -> hn
        hds.link(g, b);
        hds.link(b, a.opposite());
        hds.link(a.opposite(), hn);

        let f = hds.new_facet(Default::default());
        hds.set_facet_in_facet_loop(b, Some(f));
        hds.set_facet_halfedge(f, b);
        b
    }

    /// Cut off the part of the hole from `h.next()` to `g` with a new
    /// facet, closed by one new edge from the target of `g` to the target
    /// of `h`. Returns that new halfedge; it lies on the new facet.
    pub fn add_facet_to_border(&mut self, h: HalfedgeHandle, g: HalfedgeHandle) -> HalfedgeHandle {
        let hds = &mut self.hds;
        check_border_pair(hds, "add_facet_to_border", h, g);
        assert!(
            hds.next(h) != g,
            "add_facet_to_border: {g} follows {h}, the facet would have two sides"
        );

        let (hn, gn) = (hds.next(h), hds.next(g));
        let (vh, vg) = (hds.vertex(h), hds.vertex(g));
        let e = hds.new_edge();
        hds.set_vertex(e, vh);
        hds.set_vertex(e.opposite(), vg);

        hds.link(h, e.opposite());
        hds.link(e.opposite(), gn);
        hds.link(g, e);
        hds.link(e, hn);

        let f = hds.new_facet(Default::default());
        hds.set_facet_in_facet_loop(e, Some(f));
        hds.set_facet_halfedge(f, e);
        e
    }
}

fn check_border_pair<C: Items>(
    hds: &HalfedgeDs<C>,
    operator: &str,
    h: HalfedgeHandle,
    g: HalfedgeHandle,
) {
    assert!(
        hds.is_border(h) && hds.is_border(g),
        "{operator}: {h} and {g} must be border halfedges"
    );
    assert!(h != g, "{operator}: {h} given twice");
    debug_assert!(
        hds.halfedges_around_facet(h).any(|x| x == g),
        "{operator}: {h} and {g} lie on different holes"
    );
}

#[cfg(test)]
mod tests {
    use crate::hds::CompactItems;
    use crate::Polyhedron;
    use nalgebra::Point3;

    #[test]
    fn test_make_and_fill_hole() {
        let mut poly: Polyhedron = Polyhedron::new();
        let h = poly.make_tetrahedron().unwrap();

        assert_eq!(poly.make_hole(h), h);
        assert_eq!(poly.size_of_facets(), 3);
        assert!(poly.is_border(h));
        assert_eq!(poly.facet_degree(h), 3);
        assert!(!poly.is_closed());
        assert!(poly.is_valid(true, 0));

        assert_eq!(poly.fill_hole(h), h);
        assert_eq!(poly.size_of_facets(), 4);
        assert!(poly.is_closed());
        assert!(poly.is_tetrahedron(h));
        assert!(poly.is_valid(true, 0));
    }

    #[test]
    #[should_panic(expected = "already touches a hole")]
    fn test_make_hole_next_to_hole_panics() {
        let mut poly: Polyhedron = Polyhedron::new();
        let h = poly.make_tetrahedron().unwrap();
        poly.make_hole(h);
        poly.make_hole(h.opposite());
    }

    #[test]
    fn test_add_vertex_and_facet_to_border() {
        let mut poly: Polyhedron = Polyhedron::new();
        let h = poly.make_triangle().unwrap();
        let b0 = h.opposite();
        let b1 = poly.next(b0);

        let e = poly.add_vertex_and_facet_to_border(b0, b1);
        assert!(!poly.is_border(e));
        assert_eq!(poly.next(b1), e);
        assert_eq!(poly.facet(e), poly.facet(b1));
        assert_eq!(poly.vertex_degree(e), 2);
        assert_eq!(poly.point(poly.vertex(e)), &Point3::origin());

        assert_eq!(poly.size_of_vertices(), 4);
        assert_eq!(poly.size_of_halfedges(), 10);
        assert_eq!(poly.size_of_facets(), 2);
        assert_eq!(poly.facet_degree(e), 3);
        // The hole now runs around both triangles
        assert_eq!(poly.facet_degree(b0), 4);
        assert!(poly.is_pure_triangle());
        assert!(poly.is_valid(true, 0));
    }

    #[test]
    fn test_add_facet_to_border() {
        let mut poly: Polyhedron = Polyhedron::new();
        // Fan of two triangles around vertex 0, hole of length 4
        let mut soup = crate::PolygonSoup::from_triangles(
            (0..4).map(|i| Point3::new(i as f64, (i % 2) as f64, 0.0)).collect(),
            &[[0, 1, 2], [0, 2, 3]],
        );
        poly.delegate(&mut soup).unwrap();
        let border: Vec<_> = poly.halfedges().filter(|&x| poly.is_border(x)).collect();
        assert_eq!(border.len(), 4);

        // Close off two consecutive hole edges
        let h = border[0];
        let g = poly.next(poly.next(h));
        let e = poly.add_facet_to_border(h, g);
        assert_eq!(poly.vertex(e), poly.vertex(h));
        assert_eq!(poly.vertex(e.opposite()), poly.vertex(g));
        assert_eq!(poly.next(g), e);
        assert_eq!(poly.facet_degree(e), 3);
        assert_eq!(poly.facet_degree(h), 3);
        assert_eq!(poly.size_of_facets(), 3);
        assert!(poly.is_valid(true, 0));
    }

    #[test]
    #[should_panic(expected = "two sides")]
    fn test_add_facet_to_border_adjacent_panics() {
        let mut poly: Polyhedron = Polyhedron::new();
        let h = poly.make_triangle().unwrap();
        let b = h.opposite();
        let n = poly.next(b);
        poly.add_facet_to_border(b, n);
    }

    #[test]
    fn test_border_operators_without_back_pointers() {
        let mut poly: Polyhedron<CompactItems> = Polyhedron::new();
        let h = poly.make_triangle().unwrap();
        let b0 = h.opposite();
        let b1 = poly.next(b0);
        poly.add_vertex_and_facet_to_border(b0, b1);
        assert!(poly.is_valid(true, 0));

        // The hole is a quadrilateral: close it in two steps
        let g = poly.next(poly.next(b0));
        poly.add_facet_to_border(b0, g);
        assert!(poly.is_valid(true, 0));
        assert_eq!(poly.facet_degree(b0), 3);
        poly.fill_hole(b0);
        assert!(poly.is_closed());
        assert_eq!(poly.size_of_facets(), 4);
        assert!(poly.is_valid(true, 0));
    }
}
