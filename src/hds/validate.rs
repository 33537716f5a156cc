// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Structural validation
//!
//! The validator audits the incidence relation without trusting it: every
//! cycle walk is bounded by the number of halfedges, and the cycle checks
//! only run once every link has been found to point at a live element.

use super::{FacetHandle, HalfedgeDs, HalfedgeHandle, Items, VertexHandle};
use ahash::{AHashMap, AHashSet};
use thiserror::Error;
use tracing::{debug, warn};

/// First structural defect found by [`HalfedgeDs::validate`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("halfedge {halfedge}: next link points to a removed or unset halfedge")]
    DanglingNext { halfedge: HalfedgeHandle },

    #[error("halfedge {halfedge}: target vertex is removed or unset")]
    DanglingVertex { halfedge: HalfedgeHandle },

    #[error("halfedge {halfedge}: incident facet {facet} is removed")]
    DanglingFacet {
        halfedge: HalfedgeHandle,
        facet: FacetHandle,
    },

    #[error("halfedge {halfedge}: prev of its successor is not itself")]
    PrevMismatch { halfedge: HalfedgeHandle },

    #[error("halfedge {halfedge}: target differs from the source of its successor")]
    VertexMismatch { halfedge: HalfedgeHandle },

    #[error("halfedge {halfedge}: successor lies on a different facet")]
    FacetMismatch { halfedge: HalfedgeHandle },

    #[error("halfedge {halfedge}: facet cycle does not close")]
    OpenFacetCycle { halfedge: HalfedgeHandle },

    #[error("halfedge {halfedge}: vertex cycle does not close")]
    OpenVertexCycle { halfedge: HalfedgeHandle },

    #[error("facet {facet} has degree {degree}, at least 3 required")]
    DegenerateFacet { facet: FacetHandle, degree: usize },

    #[error("facet {facet} is bounded by {cycles} halfedge cycles")]
    FacetCycles { facet: FacetHandle, cycles: usize },

    #[error("vertex {vertex} is the target of {cycles} separate halfedge cycles")]
    VertexCycles { vertex: VertexHandle, cycles: usize },

    #[error("vertex {vertex}: stored halfedge does not point to it")]
    VertexHalfedge { vertex: VertexHandle },

    #[error("facet {facet}: stored halfedge does not bound it")]
    FacetHalfedge { facet: FacetHandle },

    #[error("edge {halfedge}: both halfedges bound the same facet")]
    SameFacetBothSides { halfedge: HalfedgeHandle },

    #[error("border normalization is stale or inconsistent")]
    BorderNotNormalized,
}

impl ValidationError {
    /// Handle of the offending halfedge, if the defect has one
    pub fn halfedge(&self) -> Option<HalfedgeHandle> {
        match *self {
            Self::DanglingNext { halfedge }
            | Self::DanglingVertex { halfedge }
            | Self::DanglingFacet { halfedge, .. }
            | Self::PrevMismatch { halfedge }
            | Self::VertexMismatch { halfedge }
            | Self::FacetMismatch { halfedge }
            | Self::OpenFacetCycle { halfedge }
            | Self::OpenVertexCycle { halfedge }
            | Self::SameFacetBothSides { halfedge } => Some(halfedge),
            _ => None,
        }
    }
}

/// Collects defects; stops after the first unless asked for all of them
struct Audit {
    all: bool,
    errors: Vec<ValidationError>,
}

impl Audit {
    fn report(&mut self, error: ValidationError) -> bool {
        self.errors.push(error);
        !self.all
    }
}

impl<C: Items> HalfedgeDs<C> {
    /// Check the structure and report the first defect.
    ///
    /// Level 0 audits the incidence relation: live links, `prev`
    /// consistency, closed facet and vertex cycles, back-pointers, facet
    /// degree of at least three and distinct facets on both sides of every
    /// non-border edge. Level 1 and up also require a current border
    /// normalization.
    pub fn validate(&self, level: u8) -> Result<(), ValidationError> {
        let mut audit = Audit {
            all: false,
            errors: Vec::new(),
        };
        self.audit(level, &mut audit);
        match audit.errors.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Check the structure. With `verbose`, every defect found is logged
    /// as a warning.
    pub fn is_valid(&self, verbose: bool, level: u8) -> bool {
        let mut audit = Audit {
            all: verbose,
            errors: Vec::new(),
        };
        self.audit(level, &mut audit);
        if verbose {
            for error in &audit.errors {
                warn!(%error, "structural check failed");
            }
            if audit.errors.is_empty() {
                debug!(
                    vertices = self.size_of_vertices(),
                    halfedges = self.size_of_halfedges(),
                    facets = self.size_of_facets(),
                    level,
                    "structure is valid"
                );
            }
        }
        audit.errors.is_empty()
    }

    fn audit(&self, level: u8, audit: &mut Audit) {
        // Walks below follow the links, so they need live targets first
        if self.audit_links(audit) || !audit.errors.is_empty() {
            return;
        }
        if self.audit_facet_cycles(audit) || self.audit_vertex_cycles(audit) {
            return;
        }
        for h in self.edges() {
            let (f, g) = (self.facet(h), self.facet(h.opposite()));
            if f.is_some() && f == g && audit.report(ValidationError::SameFacetBothSides { halfedge: h }) {
                return;
            }
        }
        if level >= 1 && !self.normalized_border_is_valid(audit.all) {
            audit.report(ValidationError::BorderNotNormalized);
        }
    }

    /// Returns true when the audit should stop
    fn audit_links(&self, audit: &mut Audit) -> bool {
        for h in self.halfedges() {
            let next = self.next(h);
            if !self.contains_halfedge(next) {
                if audit.report(ValidationError::DanglingNext { halfedge: h }) {
                    return true;
                }
                continue;
            }
            if !self.contains_vertex(self.vertex(h)) {
                if audit.report(ValidationError::DanglingVertex { halfedge: h }) {
                    return true;
                }
                continue;
            }
            if let Some(facet) = self.facet(h) {
                if !self.contains_facet(facet)
                    && audit.report(ValidationError::DanglingFacet { halfedge: h, facet })
                {
                    return true;
                }
            }
            if C::HALFEDGE_PREV
                && self.prev(next) != h
                && audit.report(ValidationError::PrevMismatch { halfedge: h })
            {
                return true;
            }
            if self.vertex(h) != self.vertex(next.opposite())
                && audit.report(ValidationError::VertexMismatch { halfedge: h })
            {
                return true;
            }
            if self.facet(h) != self.facet(next)
                && audit.report(ValidationError::FacetMismatch { halfedge: h })
            {
                return true;
            }
        }
        false
    }

    /// Walk the cycle of `start` under `step`, bounded by the halfedge
    /// count. Returns the cycle or `None` if it does not close.
    fn bounded_cycle(
        &self,
        start: HalfedgeHandle,
        step: impl Fn(HalfedgeHandle) -> HalfedgeHandle,
    ) -> Option<Vec<HalfedgeHandle>> {
        let limit = self.size_of_halfedges();
        let mut cycle = vec![start];
        let mut g = step(start);
        while g != start {
            if cycle.len() >= limit {
                return None;
            }
            cycle.push(g);
            g = step(g);
        }
        Some(cycle)
    }

    fn audit_facet_cycles(&self, audit: &mut Audit) -> bool {
        let mut visited = AHashSet::with_capacity(self.size_of_halfedges());
        let mut cycles: AHashMap<FacetHandle, usize> = AHashMap::new();

        for h in self.halfedges() {
            if visited.contains(&h) {
                continue;
            }
            let Some(cycle) = self.bounded_cycle(h, |g| self.next(g)) else {
                return audit.report(ValidationError::OpenFacetCycle { halfedge: h });
            };
            visited.extend(cycle.iter().copied());
            if let Some(facet) = self.facet(h) {
                *cycles.entry(facet).or_default() += 1;
                if cycle.len() < 3
                    && audit.report(ValidationError::DegenerateFacet {
                        facet,
                        degree: cycle.len(),
                    })
                {
                    return true;
                }
            }
        }

        for f in self.facets() {
            let count = cycles.get(&f).copied().unwrap_or(0);
            if count != 1
                && audit.report(ValidationError::FacetCycles {
                    facet: f,
                    cycles: count,
                })
            {
                return true;
            }
            if C::FACET_HALFEDGE {
                let bounds = self
                    .stored_facet_halfedge(f)
                    .is_some_and(|g| self.contains_halfedge(g) && self.facet(g) == Some(f));
                if !bounds && audit.report(ValidationError::FacetHalfedge { facet: f }) {
                    return true;
                }
            }
        }
        false
    }

    fn audit_vertex_cycles(&self, audit: &mut Audit) -> bool {
        let mut visited = AHashSet::with_capacity(self.size_of_halfedges());
        let mut cycles: AHashMap<VertexHandle, usize> = AHashMap::new();

        for h in self.halfedges() {
            if visited.contains(&h) {
                continue;
            }
            let Some(cycle) = self.bounded_cycle(h, |g| self.next_on_vertex(g)) else {
                return audit.report(ValidationError::OpenVertexCycle { halfedge: h });
            };
            visited.extend(cycle.iter().copied());
            *cycles.entry(self.vertex(h)).or_default() += 1;
        }

        for v in self.vertices() {
            let count = cycles.get(&v).copied().unwrap_or(0);
            if count > 1
                && audit.report(ValidationError::VertexCycles {
                    vertex: v,
                    cycles: count,
                })
            {
                return true;
            }
            if C::VERTEX_HALFEDGE {
                let stored = self.stored_vertex_halfedge(v);
                let consistent = match stored {
                    Some(g) => self.contains_halfedge(g) && self.vertex(g) == v,
                    None => count == 0,
                };
                if !consistent && audit.report(ValidationError::VertexHalfedge { vertex: v }) {
                    return true;
                }
            }
        }
        false
    }
}
