// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types

use crate::hds::ValidationError;
use std::collections::TryReserveError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PolyhedronError>;

/// Recoverable failures of the polyhedral surface API.
///
/// Precondition violations of the Euler operators are programming errors
/// and panic instead.
#[derive(Debug, Error)]
pub enum PolyhedronError {
    /// The container could not grow; nothing was modified
    #[error("allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    #[error("polygon {polygon}: vertex index {index} out of range (have {vertices} points)")]
    VertexOutOfRange {
        polygon: usize,
        index: usize,
        vertices: usize,
    },

    #[error("polygon {polygon} has {degree} vertices, at least 3 required")]
    DegeneratePolygon { polygon: usize, degree: usize },

    #[error("polygon {polygon} visits vertex {index} twice")]
    RepeatedVertex { polygon: usize, index: usize },

    #[error("polygon {polygon}: directed edge {from} -> {to} already used by another polygon")]
    NonManifoldEdge {
        polygon: usize,
        from: usize,
        to: usize,
    },

    #[error("vertex {index} is not a manifold vertex of the polygon soup")]
    NonManifoldVertex { index: usize },

    /// A delegate returned a structure that fails validation
    #[error("structure invalid after delegate: {0}")]
    InvalidAfterDelegate(#[from] ValidationError),
}

impl PolyhedronError {
    pub fn out_of_range(polygon: usize, index: usize, vertices: usize) -> Self {
        Self::VertexOutOfRange {
            polygon,
            index,
            vertices,
        }
    }

    pub fn non_manifold_edge(polygon: usize, from: usize, to: usize) -> Self {
        Self::NonManifoldEdge { polygon, from, to }
    }

    /// The error comes from an input polygon soup
    pub fn is_soup_error(&self) -> bool {
        matches!(
            self,
            Self::VertexOutOfRange { .. }
                | Self::DegeneratePolygon { .. }
                | Self::RepeatedVertex { .. }
                | Self::NonManifoldEdge { .. }
                | Self::NonManifoldVertex { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = PolyhedronError::out_of_range(2, 9, 4);
        assert_eq!(
            err.to_string(),
            "polygon 2: vertex index 9 out of range (have 4 points)"
        );
        assert!(err.is_soup_error());

        let err: PolyhedronError = ValidationError::BorderNotNormalized.into();
        assert!(matches!(err, PolyhedronError::InvalidAfterDelegate(_)));
        assert!(!err.is_soup_error());
    }

    #[test]
    fn test_allocation_from_try_reserve() {
        let mut v: Vec<u64> = Vec::new();
        let err: PolyhedronError = v.try_reserve(usize::MAX).unwrap_err().into();
        assert!(matches!(err, PolyhedronError::Allocation(_)));
    }
}
