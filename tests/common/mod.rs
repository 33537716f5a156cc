// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Shared fixtures and structural comparison for integration tests

#![allow(dead_code)]

use ahash::AHashMap;
use nalgebra::Point3;
use polyhedron::{HalfedgeDs, HalfedgeHandle, Items, PolygonSoup, Polyhedron};
use std::collections::VecDeque;

/// One entry per halfedge in discovery order: labels of `next`,
/// `opposite`, target vertex and facet (`None` on a hole)
pub type Signature = Vec<(usize, usize, usize, Option<usize>)>;

/// Relabel the component of `root` by a breadth-first walk over `next`
/// and `opposite`. Two components have equal signatures from two roots
/// exactly when an isomorphism maps one root onto the other.
pub fn signature<C: Items>(hds: &HalfedgeDs<C>, root: HalfedgeHandle) -> Signature {
    let mut halfedges: AHashMap<HalfedgeHandle, usize> = AHashMap::new();
    let mut vertices = AHashMap::new();
    let mut facets = AHashMap::new();
    let mut order = Vec::new();
    let mut queue = VecDeque::from([root]);
    halfedges.insert(root, 0);

    while let Some(h) = queue.pop_front() {
        order.push(h);
        for g in [hds.next(h), h.opposite()] {
            if !halfedges.contains_key(&g) {
                halfedges.insert(g, halfedges.len());
                queue.push_back(g);
            }
        }
    }

    order
        .into_iter()
        .map(|h| {
            let n = vertices.len();
            let v = *vertices.entry(hds.vertex(h)).or_insert(n);
            let f = hds.facet(h).map(|f| {
                let n = facets.len();
                *facets.entry(f).or_insert(n)
            });
            (halfedges[&hds.next(h)], halfedges[&h.opposite()], v, f)
        })
        .collect()
}

/// Root-independent form: the smallest signature over all roots
pub fn canonical<C: Items>(hds: &HalfedgeDs<C>) -> Signature {
    hds.halfedges()
        .map(|h| signature(hds, h))
        .min()
        .unwrap_or_default()
}

pub fn counts<C: Items>(hds: &HalfedgeDs<C>) -> (usize, usize, usize) {
    (
        hds.size_of_vertices(),
        hds.size_of_halfedges(),
        hds.size_of_facets(),
    )
}

/// Unit cube of six quads. Returns a halfedge pointing to a bottom corner.
pub fn cube<C: Items<Point = Point3<f64>>>() -> (Polyhedron<C>, HalfedgeHandle) {
    let points: Vec<Point3<f64>> = (0..8)
        .map(|i| Point3::new((i & 1) as f64, ((i >> 1) & 1) as f64, ((i >> 2) & 1) as f64))
        .collect();
    let mut soup = PolygonSoup::new(
        points,
        vec![
            vec![0, 2, 3, 1],
            vec![4, 5, 7, 6],
            vec![0, 1, 5, 4],
            vec![2, 6, 7, 3],
            vec![0, 4, 6, 2],
            vec![1, 3, 7, 5],
        ],
    );
    let mut poly: Polyhedron<C> = Polyhedron::new();
    poly.delegate(&mut soup).unwrap();
    let h = poly
        .halfedges()
        .find(|&h| poly.facet_degree(h) == 4 && poly.point(poly.vertex(h)).z == 0.0)
        .unwrap();
    (poly, h)
}

/// `n` triangles around a center vertex, open on the outside. Returns a
/// halfedge pointing to the center.
pub fn fan<C: Items<Point = Point3<f64>>>(n: usize) -> (Polyhedron<C>, HalfedgeHandle) {
    let mut points = vec![Point3::origin()];
    points.extend((0..n).map(|i| {
        let angle = i as f64 * std::f64::consts::TAU / n as f64;
        Point3::new(angle.cos(), angle.sin(), 0.0)
    }));
    let polygons = (0..n).map(|i| vec![0, i + 1, (i + 1) % n + 1]).collect();
    let mut poly: Polyhedron<C> = Polyhedron::new();
    poly.delegate(&mut PolygonSoup::new(points, polygons)).unwrap();
    let h = poly
        .halfedges()
        .find(|&h| !poly.is_border(h) && poly.point(poly.vertex(h)) == &Point3::origin())
        .unwrap();
    (poly, h)
}

/// Two tetrahedra glued along a facet. Returns the polyhedron and the
/// edge cycle around the shared triangle.
pub fn bipyramid<C: Items<Point = Point3<f64>>>() -> (Polyhedron<C>, [HalfedgeHandle; 3]) {
    let mut poly: Polyhedron<C> = Polyhedron::new();
    let h = poly
        .make_tetrahedron_with(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        )
        .unwrap();
    let i = poly.next(h);
    let j = poly.next(i);
    let g = poly
        .make_tetrahedron_with(
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, -1.0),
        )
        .unwrap();
    poly.join_loop(h, g);
    (poly, [h, i, j])
}
