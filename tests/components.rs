// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Facet and component erasure

mod common;

use common::{counts, cube, fan};
use nalgebra::Point3;
use polyhedron::{DefaultItems, HalfedgeDs, PolygonSoup, Polyhedron, Result};

fn add_isolated_vertices(poly: &mut Polyhedron, n: usize) {
    poly.delegate(&mut |hds: &mut HalfedgeDs<DefaultItems>| -> Result<()> {
        for i in 0..n {
            hds.new_vertex(Point3::new(i as f64, -1.0, 0.0));
        }
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_erase_every_facet_of_fan() {
    let (mut poly, _) = fan::<DefaultItems>(5);
    loop {
        let Some(h) = poly.halfedges().find(|&h| !poly.is_border(h)) else {
            break;
        };
        poly.erase_facet(h);
        assert!(poly.is_valid(true, 0));
    }
    assert!(poly.empty());
}

#[test]
fn test_erase_facet_next_to_hole() {
    let (mut poly, h) = cube::<DefaultItems>();
    poly.make_hole(h);
    let x = poly.next(h).opposite();
    assert!(!poly.is_border(x));

    // Shares one edge with the hole: that edge goes, the rest becomes border
    poly.erase_facet(x);
    assert_eq!(counts(&poly), (8, 22, 4));
    poly.normalize_border();
    assert_eq!(poly.size_of_border_edges(), 6);
    assert!(poly.is_valid(true, 1));
}

#[test]
fn test_erase_connected_component_of_cube() {
    let (mut poly, h) = cube::<DefaultItems>();
    let t = poly.make_tetrahedron().unwrap();
    poly.erase_connected_component(h);
    assert_eq!(counts(&poly), (4, 12, 4));
    assert!(poly.is_tetrahedron(t));
    assert!(poly.is_valid(true, 0));
}

#[test]
fn test_keep_largest_two() {
    let mut poly: Polyhedron = Polyhedron::new();
    poly.make_triangle().unwrap();
    let t = poly.make_tetrahedron().unwrap();
    poly.make_triangle().unwrap();
    // A unit cube off to the side
    let points: Vec<Point3<f64>> = (0..8)
        .map(|i| Point3::new((i & 1) as f64, ((i >> 1) & 1) as f64, 5.0 + ((i >> 2) & 1) as f64))
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
    poly.delegate(&mut soup).unwrap();
    add_isolated_vertices(&mut poly, 2);

    assert_eq!(poly.keep_largest_connected_components(2), 2);
    // The cube and the tetrahedron remain
    assert_eq!(counts(&poly), (12, 36, 10));
    assert!(poly.is_tetrahedron(t));
    assert!(poly.is_closed());
    assert!(poly.is_valid(true, 0));
}

#[test]
fn test_keep_all_strips_isolated_vertices() {
    let (mut poly, _) = cube::<DefaultItems>();
    add_isolated_vertices(&mut poly, 3);
    assert_eq!(poly.size_of_vertices(), 11);

    assert_eq!(poly.keep_largest_connected_components(1), 0);
    assert_eq!(counts(&poly), (8, 24, 6));
    assert_eq!(poly.keep_largest_connected_components(5), 0);
}

#[test]
fn test_keep_zero_removes_everything() {
    let (mut poly, _) = cube::<DefaultItems>();
    poly.make_triangle().unwrap();
    add_isolated_vertices(&mut poly, 1);

    assert_eq!(poly.keep_largest_connected_components(0), 2);
    assert!(poly.empty());
    assert_eq!(poly.keep_largest_connected_components(0), 0);
}

#[test]
fn test_erased_handles_never_name_new_elements() {
    let mut poly: Polyhedron = Polyhedron::new();
    let t = poly.make_tetrahedron().unwrap();
    let old_vertex = poly.vertex(t);
    let old_facet = poly.facet(t).unwrap();
    poly.erase_connected_component(t);
    assert!(poly.empty());

    let s = poly.make_tetrahedron().unwrap();
    assert_ne!(s, t);
    assert!(!poly.contains_halfedge(t));
    assert!(!poly.contains_vertex(old_vertex));
    assert!(!poly.contains_facet(old_facet));
    assert!(poly.halfedges().all(|h| h != t && h != t.opposite()));
    assert!(poly.is_tetrahedron(s));
}

#[test]
#[should_panic(expected = "stale handle")]
fn test_erased_halfedge_panics_after_rebuild() {
    let mut poly: Polyhedron = Polyhedron::new();
    let t = poly.make_tetrahedron().unwrap();
    poly.erase_connected_component(t);
    poly.make_tetrahedron().unwrap();
    poly.next(t);
}

#[test]
fn test_clear_starts_handles_over() {
    let mut poly: Polyhedron = Polyhedron::new();
    let t = poly.make_tetrahedron().unwrap();
    poly.clear();
    assert_eq!(poly.make_tetrahedron().unwrap(), t);
}
