// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polyframe Polyhedron
//!
//! Halfedge boundary representation of oriented 2-manifold polyhedral
//! surfaces, with or without holes, and the Euler operators that edit it.
//! The links and payloads stored per element are chosen at compile time
//! through an [`Items`] configuration.
//!
//! ```
//! use polyhedron::Polyhedron;
//!
//! let mut poly: Polyhedron = Polyhedron::new();
//! let h = poly.make_tetrahedron().unwrap();
//! let g = poly.create_center_vertex(h);
//! assert_eq!(poly.size_of_facets(), 6);
//! assert_eq!(poly.erase_center_vertex(g), h);
//! assert!(poly.is_valid(false, 0));
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod hds;
pub mod polyhedron;

pub use builder::PolygonSoup;
pub use config::{PolyhedronConfig, ReserveHints, ValidationConfig};
pub use error::{PolyhedronError, Result};
pub use hds::{
    CompactItems, DefaultItems, FacetHandle, HalfedgeDs, HalfedgeHandle, Items, StaticItems,
    ValidationError, VertexHandle,
};
pub use polyhedron::{Modifier, Polyhedron};
