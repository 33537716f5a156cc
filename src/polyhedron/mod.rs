// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polyhedral surface
//!
//! [`Polyhedron`] owns a [`HalfedgeDs`] and only lets it change through
//! operations that keep the surface a valid oriented 2-manifold: the
//! construction primitives, the Euler operators and [`Polyhedron::delegate`].
//! All read access goes through `Deref` to the structure.

mod erase;
mod euler;
mod genus;
mod holes;

use crate::builder::append_polygons;
use crate::config::{PolyhedronConfig, ValidationConfig};
use crate::error::Result;
use crate::hds::{DefaultItems, FacetHandle, HalfedgeDs, HalfedgeHandle, Items, VertexHandle};
use ahash::AHashSet;
use std::fmt;
use std::ops::Deref;
use tracing::{debug, warn};

/// Batch editor run with raw access to the structure.
///
/// The structure may be inconsistent while [`modify`](Modifier::modify)
/// runs but must be valid again when it returns.
pub trait Modifier<C: Items> {
    fn modify(&mut self, hds: &mut HalfedgeDs<C>) -> Result<()>;
}

impl<C, F> Modifier<C> for F
where
    C: Items,
    F: FnMut(&mut HalfedgeDs<C>) -> Result<()>,
{
    fn modify(&mut self, hds: &mut HalfedgeDs<C>) -> Result<()> {
        self(hds)
    }
}

/// Faces of the tetrahedron, consistently oriented
const TETRAHEDRON: [[usize; 3]; 4] = [[0, 1, 2], [1, 0, 3], [2, 1, 3], [0, 2, 3]];

/// Polyhedral surface with Euler operators
pub struct Polyhedron<C: Items = DefaultItems> {
    hds: HalfedgeDs<C>,
    validation: ValidationConfig,
}

impl<C: Items> Default for Polyhedron<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Items> Clone for Polyhedron<C> {
    fn clone(&self) -> Self {
        Self {
            hds: self.hds.clone(),
            validation: self.validation,
        }
    }
}

impl<C: Items> fmt::Debug for Polyhedron<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Polyhedron")
            .field("hds", &self.hds)
            .field("validation", &self.validation)
            .finish()
    }
}

impl<C: Items> Deref for Polyhedron<C> {
    type Target = HalfedgeDs<C>;

    fn deref(&self) -> &HalfedgeDs<C> {
        &self.hds
    }
}

impl<C: Items> Polyhedron<C> {
    pub fn new() -> Self {
        Self {
            hds: HalfedgeDs::new(),
            validation: ValidationConfig::default(),
        }
    }

    /// Empty surface with room for `v` vertices, `h` halfedges and `f`
    /// facets
    pub fn with_capacity(v: usize, h: usize, f: usize) -> Self {
        Self {
            hds: HalfedgeDs::with_capacity(v, h, f),
            validation: ValidationConfig::default(),
        }
    }

    /// Empty surface with the reserve hints and validation settings of
    /// `config`
    pub fn from_config(config: &PolyhedronConfig) -> Result<Self> {
        let mut polyhedron = Self::new();
        let hints = config.reserve;
        polyhedron.reserve(hints.vertices, hints.halfedges, hints.facets)?;
        polyhedron.validation = config.validation;
        Ok(polyhedron)
    }

    pub fn validation(&self) -> &ValidationConfig {
        &self.validation
    }

    pub fn set_validation(&mut self, validation: ValidationConfig) {
        self.validation = validation;
    }

    /// The underlying structure
    pub fn hds(&self) -> &HalfedgeDs<C> {
        &self.hds
    }

    pub fn into_hds(self) -> HalfedgeDs<C> {
        self.hds
    }

    /// Reserve storage for `v` vertices, `h` halfedges and `f` facets in
    /// total. Handles stay valid.
    pub fn reserve(&mut self, v: usize, h: usize, f: usize) -> Result<()> {
        self.hds.reserve(v, h, f)
    }

    /// Remove every element
    pub fn clear(&mut self) {
        self.hds.clear();
    }

    pub fn normalize_border(&mut self) {
        self.hds.normalize_border();
    }

    pub fn point_mut(&mut self, v: VertexHandle) -> &mut C::Point {
        self.hds.point_mut(v)
    }

    pub fn plane_mut(&mut self, f: FacetHandle) -> &mut C::Plane {
        self.hds.plane_mut(f)
    }

    // =========================================================================
    // Construction
    // =========================================================================

    /// Add a tetrahedron with default points. See
    /// [`make_tetrahedron_with`](Self::make_tetrahedron_with).
    pub fn make_tetrahedron(&mut self) -> Result<HalfedgeHandle> {
        self.make_tetrahedron_with(
            C::Point::default(),
            C::Point::default(),
            C::Point::default(),
            C::Point::default(),
        )
    }

    /// Add a tetrahedron as a new connected component. The returned
    /// halfedge `h` points to `p1`, `h.next()` to `p2`, `h.next().next()`
    /// to `p3` and `h.opposite().next()` to `p4`.
    pub fn make_tetrahedron_with(
        &mut self,
        p1: C::Point,
        p2: C::Point,
        p3: C::Point,
        p4: C::Point,
    ) -> Result<HalfedgeHandle> {
        let polygons: Vec<Vec<usize>> = TETRAHEDRON.iter().map(|t| t.to_vec()).collect();
        let firsts = append_polygons(&mut self.hds, &[p1, p2, p3, p4], &polygons)?;
        Ok(firsts[0])
    }

    /// Add a triangle with default points. See
    /// [`make_triangle_with`](Self::make_triangle_with).
    pub fn make_triangle(&mut self) -> Result<HalfedgeHandle> {
        self.make_triangle_with(C::Point::default(), C::Point::default(), C::Point::default())
    }

    /// Add a triangle with a hole on its back as a new connected component.
    /// The returned halfedge `h` is not a border halfedge and points to
    /// `p1`; `h.next()` points to `p2` and `h.next().next()` to `p3`.
    pub fn make_triangle_with(
        &mut self,
        p1: C::Point,
        p2: C::Point,
        p3: C::Point,
    ) -> Result<HalfedgeHandle> {
        let firsts = append_polygons(&mut self.hds, &[p1, p2, p3], &[vec![0, 1, 2]])?;
        Ok(firsts[0])
    }

    // =========================================================================
    // Orientation
    // =========================================================================

    /// Reverse the orientation of every facet and hole. Plane payloads are
    /// replaced by [`Items::opposite_plane`].
    pub fn inside_out(&mut self) {
        let hds = &mut self.hds;
        let mut visited = AHashSet::with_capacity(hds.size_of_halfedges());
        let starts: Vec<_> = hds.halfedges().collect();

        for start in starts {
            if visited.contains(&start) {
                continue;
            }
            let cycle: Vec<_> = hds.halfedges_around_facet(start).collect();
            let targets: Vec<_> = cycle.iter().map(|&h| hds.vertex(h)).collect();
            let k = cycle.len();
            for i in 0..k {
                let back = (i + k - 1) % k;
                hds.link(cycle[i], cycle[back]);
                hds.set_vertex(cycle[i], targets[back]);
            }
            visited.extend(cycle);
        }

        // The halfedge that pointed to `v` now leaves it
        let vertices: Vec<_> = hds.vertices().collect();
        for v in vertices {
            if let Some(h) = hds.stored_vertex_halfedge(v) {
                hds.set_vertex_halfedge(v, h.opposite());
            }
        }

        let facets: Vec<_> = hds.facets().collect();
        for f in facets {
            let flipped = C::opposite_plane(hds.plane(f));
            *hds.plane_mut(f) = flipped;
        }
    }

    // =========================================================================
    // Delegate port
    // =========================================================================

    /// Run `modifier` with raw access to the structure.
    ///
    /// The border normalization is dropped before the modifier runs; a
    /// modifier that needs it afterwards normalizes again itself. The
    /// result is validated at the configured level and a defect is reported
    /// as [`PolyhedronError::InvalidAfterDelegate`](crate::PolyhedronError::InvalidAfterDelegate).
    /// An error returned by the modifier is passed through unchanged.
    ///
    /// Clearing [`ValidationConfig::check_delegate`] skips that validation,
    /// and the structure may then be left invalid; callers opting out
    /// check it themselves with [`is_valid`](HalfedgeDs::is_valid).
    pub fn delegate<M>(&mut self, modifier: &mut M) -> Result<()>
    where
        M: Modifier<C> + ?Sized,
    {
        self.hds.invalidate_border();
        modifier.modify(&mut self.hds)?;

        let config = self.validation;
        if config.check_delegate {
            if let Err(error) = self.hds.validate(config.level) {
                if config.verbose {
                    self.hds.is_valid(true, config.level);
                }
                warn!(%error, "delegate left an invalid structure");
                return Err(error.into());
            }
        }

        debug!(
            vertices = self.hds.size_of_vertices(),
            halfedges = self.hds.size_of_halfedges(),
            facets = self.hds.size_of_facets(),
            "delegate finished"
        );
        Ok(())
    }
}
