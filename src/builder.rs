// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Indexed polygon construction
//!
//! [`PolygonSoup`] builds a surface from a point list and polygons given as
//! point indices, each polygon counter-clockwise seen from outside. The
//! input is checked completely and storage is reserved before the first
//! element is created, so a rejected soup or a failed allocation leaves the
//! structure untouched.

use crate::error::{PolyhedronError, Result};
use crate::hds::{HalfedgeDs, HalfedgeHandle, Items};
use crate::polyhedron::Modifier;
use ahash::{AHashMap, AHashSet};
use tracing::debug;

/// Points plus polygons referencing them by index
#[derive(Debug, Clone, Default)]
pub struct PolygonSoup<P> {
    pub points: Vec<P>,
    pub polygons: Vec<Vec<usize>>,
}

impl<P> PolygonSoup<P> {
    pub fn new(points: Vec<P>, polygons: Vec<Vec<usize>>) -> Self {
        Self { points, polygons }
    }

    /// Soup of triangles
    pub fn from_triangles(points: Vec<P>, triangles: &[[usize; 3]]) -> Self {
        Self {
            points,
            polygons: triangles.iter().map(|t| t.to_vec()).collect(),
        }
    }

    pub fn add_polygon(&mut self, polygon: impl Into<Vec<usize>>) -> &mut Self {
        self.polygons.push(polygon.into());
        self
    }

    /// Check the soup without building anything
    pub fn check(&self) -> Result<()> {
        check_soup(self.points.len(), &self.polygons).map(|_| ())
    }
}

impl<C: Items> Modifier<C> for PolygonSoup<C::Point> {
    fn modify(&mut self, hds: &mut HalfedgeDs<C>) -> Result<()> {
        append_polygons(hds, &self.points, &self.polygons).map(|_| ())
    }
}

/// Counts derived from a checked soup
struct SoupLayout {
    edges: usize,
    polygon_halfedges: usize,
}

/// Validate index range, degree, repeated vertices, duplicated directed
/// edges and manifold vertex neighborhoods
fn check_soup(points: usize, polygons: &[Vec<usize>]) -> Result<SoupLayout> {
    let mut directed: AHashSet<(usize, usize)> = AHashSet::new();
    let mut polygon_halfedges = 0;

    for (p, polygon) in polygons.iter().enumerate() {
        if polygon.len() < 3 {
            return Err(PolyhedronError::DegeneratePolygon {
                polygon: p,
                degree: polygon.len(),
            });
        }
        let mut seen = AHashSet::with_capacity(polygon.len());
        for &index in polygon {
            if index >= points {
                return Err(PolyhedronError::out_of_range(p, index, points));
            }
            if !seen.insert(index) {
                return Err(PolyhedronError::RepeatedVertex { polygon: p, index });
            }
        }
        for (from, to) in polygon_edges(polygon) {
            if !directed.insert((from, to)) {
                return Err(PolyhedronError::non_manifold_edge(p, from, to));
            }
        }
        polygon_halfedges += polygon.len();
    }

    // Corner of polygon `(.., u, v, w, ..)` at `v` is keyed by `u`; walking
    // clockwise around `v` it is followed by the corner keyed by `w`, if the
    // directed edge `w -> v` exists. The corners of a manifold vertex form
    // exactly one cycle or one chain.
    let mut corners: AHashMap<usize, AHashMap<usize, Option<usize>>> = AHashMap::new();
    for polygon in polygons {
        let n = polygon.len();
        for i in 0..n {
            let u = polygon[(i + n - 1) % n];
            let v = polygon[i];
            let w = polygon[(i + 1) % n];
            let successor = directed.contains(&(w, v)).then_some(w);
            corners.entry(v).or_default().insert(u, successor);
        }
    }
    for (&v, around) in &corners {
        if !is_single_fan(around) {
            return Err(PolyhedronError::NonManifoldVertex { index: v });
        }
    }

    let undirected = directed
        .iter()
        .filter(|&&(a, b)| a < b || !directed.contains(&(b, a)))
        .count();

    Ok(SoupLayout {
        edges: undirected,
        polygon_halfedges,
    })
}

fn is_single_fan(around: &AHashMap<usize, Option<usize>>) -> bool {
    let targets: AHashSet<usize> = around.values().flatten().copied().collect();
    let chain_ends = around.values().filter(|s| s.is_none()).count();
    let start = match chain_ends {
        0 => around.keys().next().copied(),
        1 => around.keys().copied().find(|u| !targets.contains(u)),
        _ => return false,
    };
    let Some(start) = start else {
        return false;
    };

    let mut visited = 1;
    let mut current = start;
    while let Some(Some(next)) = around.get(&current) {
        if *next == start {
            break;
        }
        visited += 1;
        if visited > around.len() {
            return false;
        }
        current = *next;
    }
    visited == around.len()
}

fn polygon_edges(polygon: &[usize]) -> impl Iterator<Item = (usize, usize)> + '_ {
    let n = polygon.len();
    (0..n).map(move |i| (polygon[i], polygon[(i + 1) % n]))
}

/// Append a checked soup to `hds`. Returns, per polygon, the halfedge
/// pointing to the polygon's first vertex.
pub(crate) fn append_polygons<C: Items>(
    hds: &mut HalfedgeDs<C>,
    points: &[C::Point],
    polygons: &[Vec<usize>],
) -> Result<Vec<HalfedgeHandle>> {
    let layout = check_soup(points.len(), polygons)?;
    hds.reserve_additional(points.len(), 2 * layout.edges, polygons.len())?;

    let vertices: Vec<_> = points.iter().map(|p| hds.new_vertex(p.clone())).collect();
    let mut halfedges: AHashMap<(usize, usize), HalfedgeHandle> =
        AHashMap::with_capacity(layout.polygon_halfedges);
    let mut firsts = Vec::with_capacity(polygons.len());

    for polygon in polygons {
        let f = hds.new_facet(Default::default());
        let ring: Vec<HalfedgeHandle> = polygon_edges(polygon)
            .map(|(from, to)| {
                let h = match halfedges.get(&(to, from)) {
                    Some(&twin) => twin.opposite(),
                    None => hds.new_edge(),
                };
                halfedges.insert((from, to), h);
                hds.set_vertex(h, vertices[to]);
                hds.set_vertex(h.opposite(), vertices[from]);
                hds.set_facet(h, Some(f));
                hds.set_vertex_halfedge(vertices[to], h);
                h
            })
            .collect();

        let n = ring.len();
        for i in 0..n {
            hds.link(ring[i], ring[(i + 1) % n]);
        }
        hds.set_facet_halfedge(f, ring[0]);
        // Edge i runs from polygon[i] to polygon[i + 1]; the last one ends
        // at the first vertex
        firsts.push(ring[n - 1]);
    }

    // Border halfedges: the opposite of every directed edge without a twin
    let border: Vec<HalfedgeHandle> = halfedges
        .iter()
        .filter(|&(&(from, to), _)| !halfedges.contains_key(&(to, from)))
        .map(|(_, &h)| h.opposite())
        .collect();
    let outgoing: AHashMap<_, _> = border
        .iter()
        .map(|&b| (hds.vertex(b.opposite()), b))
        .collect();
    for &b in &border {
        let target = hds.vertex(b);
        if let Some(&next) = outgoing.get(&target) {
            hds.link(b, next);
        }
        // Border vertices keep a border halfedge as their back-pointer
        hds.set_vertex_halfedge(target, b);
    }

    debug!(
        points = points.len(),
        polygons = polygons.len(),
        edges = layout.edges,
        border_halfedges = border.len(),
        "appended polygon soup"
    );
    Ok(firsts)
}
