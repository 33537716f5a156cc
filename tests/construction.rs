// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Construction, delegate and configuration tests

mod common;

use anyhow::Result;
use common::{counts, cube, fan};
use nalgebra::Point3;
use polyhedron::{
    CompactItems, DefaultItems, HalfedgeDs, PolygonSoup, Polyhedron, PolyhedronConfig,
    PolyhedronError, StaticItems, ValidationConfig,
};

#[test]
fn test_tetrahedron_scenario() -> Result<()> {
    let mut poly: Polyhedron = Polyhedron::new();
    let h = poly.make_tetrahedron()?;

    assert_eq!(counts(&poly), (4, 12, 4));
    assert!(poly.is_closed());
    assert!(poly.is_pure_triangle());
    assert!(poly.is_tetrahedron(h));
    assert!(!poly.is_triangle(h));
    Ok(())
}

#[test]
fn test_triangle_scenario() -> Result<()> {
    let mut poly: Polyhedron = Polyhedron::new();
    let h = poly.make_triangle()?;

    assert_eq!(counts(&poly), (3, 6, 1));
    assert!(!poly.is_closed());
    assert!(poly.is_triangle(h));
    assert!(!poly.is_tetrahedron(h));

    poly.normalize_border();
    assert_eq!(poly.size_of_border_edges(), 3);
    assert_eq!(poly.size_of_border_halfedges(), 3);
    assert_eq!(poly.non_border_halfedges().count(), 0);
    assert!(poly.is_valid(true, 1));
    Ok(())
}

#[test]
fn test_link_properties_hold_everywhere() {
    let (poly, _) = cube::<DefaultItems>();
    for h in poly.halfedges() {
        assert_eq!(h.opposite().opposite(), h);
        assert_ne!(h.opposite(), h);
        assert_eq!(poly.next(poly.prev(h)), h);
        assert_eq!(poly.prev(poly.next(h)), h);
    }

    // The same walks without stored prev links, on a hole too
    let (poly, _) = fan::<CompactItems>(5);
    for h in poly.halfedges() {
        assert_eq!(poly.next(poly.prev(h)), h);
        assert_eq!(poly.prev(poly.next(h)), h);
    }
}

#[test]
fn test_clear_empties_everything() {
    let (mut poly, _) = cube::<DefaultItems>();
    poly.make_triangle().unwrap();
    poly.clear();
    assert_eq!(counts(&poly), (0, 0, 0));
    assert!(poly.empty());
    assert_eq!(poly.halfedges().count(), 0);

    // Still usable afterwards
    let h = poly.make_tetrahedron().unwrap();
    assert!(poly.is_tetrahedron(h));
}

#[test]
fn test_reserve_keeps_handles() -> Result<()> {
    let mut poly: Polyhedron<StaticItems> = Polyhedron::new();
    let h = poly.make_tetrahedron()?;
    let v = poly.vertex(h);
    let before = *poly.point(v);

    poly.reserve(10_000, 60_000, 20_000)?;
    assert!(poly.capacity_of_vertices() >= 10_000);
    assert!(poly.bytes_reserved() >= poly.bytes());
    assert_eq!(poly.vertex(h), v);
    assert_eq!(poly.point(v), &before);
    assert!(poly.is_tetrahedron(h));
    Ok(())
}

#[test]
fn test_delegate_builds_quad_by_hand() -> Result<()> {
    let mut poly: Polyhedron = Polyhedron::new();
    poly.set_validation(ValidationConfig {
        level: 1,
        ..Default::default()
    });

    poly.delegate(&mut |hds: &mut HalfedgeDs<DefaultItems>| -> polyhedron::Result<()> {
        let vertices: Vec<_> = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
            .iter()
            .map(|&(x, y)| hds.new_vertex(Point3::new(x, y, 0.0)))
            .collect();
        let f = hds.new_facet(Default::default());
        let inner: Vec<_> = (0..4).map(|_| hds.new_edge()).collect();
        for k in 0..4 {
            let h = inner[k];
            hds.set_vertex(h, vertices[(k + 1) % 4]);
            hds.set_vertex(h.opposite(), vertices[k]);
            hds.set_facet(h, Some(f));
            hds.link(h, inner[(k + 1) % 4]);
            hds.link(inner[(k + 1) % 4].opposite(), h.opposite());
            hds.set_vertex_halfedge(vertices[(k + 1) % 4], h);
        }
        hds.set_facet_halfedge(f, inner[0]);
        hds.normalize_border();
        Ok(())
    })?;

    assert_eq!(counts(&poly), (4, 8, 1));
    assert!(poly.is_pure_quad());
    assert_eq!(poly.size_of_border_edges(), 4);
    Ok(())
}

#[test]
fn test_delegate_level_one_needs_normalized_border() {
    let mut poly: Polyhedron = Polyhedron::new();
    poly.set_validation(ValidationConfig {
        level: 1,
        ..Default::default()
    });
    let mut soup = PolygonSoup::from_triangles(
        vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
        &[[0, 1, 2]],
    );
    let err = poly.delegate(&mut soup).unwrap_err();
    assert!(matches!(err, PolyhedronError::InvalidAfterDelegate(_)));
}

#[test]
fn test_rejected_soup_leaves_polyhedron_untouched() {
    let (mut poly, h) = cube::<DefaultItems>();
    let before = counts(&poly);
    let mut soup = PolygonSoup::new(
        vec![Point3::<f64>::origin(); 3],
        vec![vec![0, 1, 2], vec![2, 1, 5]],
    );

    let err = poly.delegate(&mut soup).unwrap_err();
    assert!(err.is_soup_error());
    assert_eq!(counts(&poly), before);
    assert!(poly.is_valid(true, 0));
    assert_eq!(poly.facet_degree(h), 4);
}

#[test]
fn test_config_drives_polyhedron() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("polyhedron.toml");
    std::fs::write(
        &path,
        "[reserve]\nvertices = 64\nhalfedges = 384\nfacets = 128\n\n[validation]\ncheck_delegate = false\n",
    )?;

    let config = PolyhedronConfig::from_file(&path)?;
    let mut poly: Polyhedron = Polyhedron::from_config(&config)?;
    assert!(poly.capacity_of_halfedges() >= 384);
    assert!(!poly.validation().check_delegate);

    // Unchecked: an invalid batch goes through
    poly.delegate(&mut |hds: &mut HalfedgeDs<DefaultItems>| -> polyhedron::Result<()> {
        hds.new_edge();
        Ok(())
    })?;
    assert!(!poly.is_valid(false, 0));
    Ok(())
}
