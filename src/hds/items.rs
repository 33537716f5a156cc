// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Compile-time configuration of a halfedge data structure
//!
//! An [`Items`] type fixes the payload types and the optional links a mesh
//! stores. The flags are associated constants, so every branch on them is
//! resolved at monomorphization time. Operations that cannot work without a
//! capability refuse to compile for a configuration that lacks it.
//!
//! `opposite`, `next`, the target vertex and the incident facet of a
//! halfedge are always stored.

use nalgebra::{Point3, Vector4};
use std::fmt::Debug;

/// Capability declaration for a [`HalfedgeDs`](super::HalfedgeDs)
pub trait Items: 'static {
    /// Payload attached to every vertex. Use `()` for none.
    type Point: Clone + Default + Debug;
    /// Payload attached to every facet. Use `()` for none.
    type Plane: Clone + Default + Debug;

    /// Vertices store one incident halfedge (a halfedge pointing to them)
    const VERTEX_HALFEDGE: bool;
    /// Halfedges store their predecessor, making `prev` O(1)
    const HALFEDGE_PREV: bool;
    /// Facets store one incident halfedge
    const FACET_HALFEDGE: bool;
    /// Elements can be removed
    const REMOVAL: bool;

    /// Plane payload of a facet whose orientation was reversed
    fn opposite_plane(plane: &Self::Plane) -> Self::Plane {
        plane.clone()
    }
}

/// Every link stored, removal supported, `nalgebra` point and plane payloads.
/// Planes are `(a, b, c, d)` coefficients of `ax + by + cz + d = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultItems {}

impl Items for DefaultItems {
    type Point = Point3<f64>;
    type Plane = Vector4<f64>;

    const VERTEX_HALFEDGE: bool = true;
    const HALFEDGE_PREV: bool = true;
    const FACET_HALFEDGE: bool = true;
    const REMOVAL: bool = true;

    fn opposite_plane(plane: &Vector4<f64>) -> Vector4<f64> {
        -*plane
    }
}

/// Minimal links: no `prev`, no back-pointers, no planes. Removal is
/// supported, so every operator runs on its fallback path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompactItems {}

impl Items for CompactItems {
    type Point = Point3<f64>;
    type Plane = ();

    const VERTEX_HALFEDGE: bool = false;
    const HALFEDGE_PREV: bool = false;
    const FACET_HALFEDGE: bool = false;
    const REMOVAL: bool = true;
}

/// Append-only mesh: every link stored but elements are never removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticItems {}

impl Items for StaticItems {
    type Point = Point3<f64>;
    type Plane = ();

    const VERTEX_HALFEDGE: bool = true;
    const HALFEDGE_PREV: bool = true;
    const FACET_HALFEDGE: bool = true;
    const REMOVAL: bool = false;
}

/// Vertex record
pub(crate) struct Vertex<C: Items> {
    /// A halfedge pointing to this vertex; only kept with
    /// `Items::VERTEX_HALFEDGE`, `None` while isolated
    pub halfedge: Option<super::HalfedgeHandle>,
    /// Vertex payload
    pub point: C::Point,
}

impl<C: Items> Clone for Vertex<C> {
    fn clone(&self) -> Self {
        Self {
            halfedge: self.halfedge,
            point: self.point.clone(),
        }
    }
}

/// Halfedge record. The opposite halfedge is the other half of the same
/// [`Edge`] and is not stored.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Halfedge {
    /// Successor around the facet or hole
    pub next: super::HalfedgeHandle,
    /// Predecessor around the facet or hole; only kept with
    /// `Items::HALFEDGE_PREV`
    pub prev: super::HalfedgeHandle,
    /// Target vertex
    pub vertex: super::VertexHandle,
    /// Incident facet, `None` on a hole
    pub facet: Option<super::FacetHandle>,
}

/// Both halfedges of an edge. `flipped` swaps which of the two comes first
/// in the halfedge sequence.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Edge {
    /// Halfedge records indexed by handle side
    pub halves: [Halfedge; 2],
    /// Side 1 comes first in the halfedge sequence
    pub flipped: bool,
}

/// Facet record
pub(crate) struct Facet<C: Items> {
    /// One halfedge of the boundary cycle; only kept with
    /// `Items::FACET_HALFEDGE`
    pub halfedge: Option<super::HalfedgeHandle>,
    /// Facet payload
    pub plane: C::Plane,
}

impl<C: Items> Clone for Facet<C> {
    fn clone(&self) -> Self {
        Self {
            halfedge: self.halfedge,
            plane: self.plane.clone(),
        }
    }
}
