// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Border normalization
//!
//! [`HalfedgeDs::normalize_border`] reorders the halfedge sequence so that
//! all non-border edges come first and, within every border edge, the
//! halfedge incident to a facet precedes the one incident to the hole. The
//! counts and the split point are cached. Any insertion, removal or border
//! status change clears the cache; nothing re-derives it automatically.

use super::{HalfedgeDs, HalfedgeHandle, Items};
use tracing::{debug, warn};

/// Result of the last border normalization
#[derive(Debug, Clone, Default)]
pub(crate) struct BorderCache {
    valid: bool,
    border_halfedges: usize,
    border_edges: usize,
    /// Edge slot the border part of the sequence starts at
    first_border_edge: Option<usize>,
}

impl BorderCache {
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

impl<C: Items> HalfedgeDs<C> {
    /// Sort the halfedge sequence so non-border edges precede border edges,
    /// with the facet side of every border edge first
    pub fn normalize_border(&mut self) {
        let mut border_edges = Vec::new();
        let mut border_halfedges = 0;

        for e in self.edges.indices() {
            let (first, second) = self.edge_halves(e);
            let first_border = self.is_border(first);
            let second_border = self.is_border(second);
            if first_border || second_border {
                border_edges.push(e);
                border_halfedges += first_border as usize + second_border as usize;
            }
        }

        for &e in &border_edges {
            let edge = &mut self.edges[e];
            let side0_border = edge.halves[0].facet.is_none();
            let side1_border = edge.halves[1].facet.is_none();
            // Facet side first; an edge with two border halves keeps its order
            if side0_border != side1_border {
                edge.flipped = side0_border;
            }
            self.edges.move_to_back(e);
        }

        self.border = BorderCache {
            valid: true,
            border_halfedges,
            border_edges: border_edges.len(),
            first_border_edge: border_edges.first().copied(),
        };

        debug!(
            edges = self.size_of_edges(),
            border_edges = border_edges.len(),
            border_halfedges,
            "normalized border"
        );
    }

    /// Number of border halfedges found by the last normalization.
    ///
    /// # Panics
    ///
    /// If the structure changed since [`normalize_border`](Self::normalize_border).
    pub fn size_of_border_halfedges(&self) -> usize {
        self.assert_normalized("size_of_border_halfedges");
        self.border.border_halfedges
    }

    /// Number of border edges found by the last normalization. On a valid
    /// surface every border edge has exactly one border halfedge, so this
    /// equals [`size_of_border_halfedges`](Self::size_of_border_halfedges).
    ///
    /// # Panics
    ///
    /// If the structure changed since [`normalize_border`](Self::normalize_border).
    pub fn size_of_border_edges(&self) -> usize {
        self.assert_normalized("size_of_border_edges");
        self.border.border_edges
    }

    /// Halfedges of the border edges, from the split point to the end of
    /// the sequence. The non-border halfedges are the ones before.
    ///
    /// # Panics
    ///
    /// If the structure changed since [`normalize_border`](Self::normalize_border).
    pub fn border_halfedges(&self) -> impl Iterator<Item = HalfedgeHandle> + '_ {
        self.assert_normalized("border_halfedges");
        self.edges
            .indices_from(self.border.first_border_edge)
            .flat_map(move |e| {
                let (first, second) = self.edge_halves(e);
                [first, second]
            })
    }

    /// First halfedge of every border edge (the facet side)
    ///
    /// # Panics
    ///
    /// If the structure changed since [`normalize_border`](Self::normalize_border).
    pub fn border_edges(&self) -> impl Iterator<Item = HalfedgeHandle> + '_ {
        self.assert_normalized("border_edges");
        self.edges
            .indices_from(self.border.first_border_edge)
            .map(move |e| self.edge_halves(e).0)
    }

    /// Halfedges of the non-border edges, i.e. the sequence up to the split
    /// point
    ///
    /// # Panics
    ///
    /// If the structure changed since [`normalize_border`](Self::normalize_border).
    pub fn non_border_halfedges(&self) -> impl Iterator<Item = HalfedgeHandle> + '_ {
        self.assert_normalized("non_border_halfedges");
        let stop = self.border.first_border_edge;
        self.edges
            .indices()
            .take_while(move |&e| Some(e) != stop)
            .flat_map(move |e| {
                let (first, second) = self.edge_halves(e);
                [first, second]
            })
    }

    /// Check that the last normalization still describes the structure
    pub fn normalized_border_is_valid(&self, verbose: bool) -> bool {
        if !self.border.valid {
            if verbose {
                warn!("border normalization is stale");
            }
            return false;
        }

        let mut in_border = false;
        let mut border_edges = 0;
        let mut border_halfedges = 0;
        for e in self.edges.indices() {
            if Some(e) == self.border.first_border_edge {
                in_border = true;
            }
            let (first, second) = self.edge_halves(e);
            let first_border = self.is_border(first);
            let second_border = self.is_border(second);

            if !in_border {
                if first_border || second_border {
                    if verbose {
                        warn!(halfedge = %first, "border edge before the border split point");
                    }
                    return false;
                }
                continue;
            }

            if !first_border && !second_border {
                if verbose {
                    warn!(halfedge = %first, "non-border edge after the border split point");
                }
                return false;
            }
            if first_border && !second_border {
                if verbose {
                    warn!(halfedge = %first, "border halfedge precedes its facet halfedge");
                }
                return false;
            }
            border_edges += 1;
            border_halfedges += first_border as usize + second_border as usize;
        }

        if border_edges != self.border.border_edges
            || border_halfedges != self.border.border_halfedges
        {
            if verbose {
                warn!(
                    counted = border_halfedges,
                    cached = self.border.border_halfedges,
                    "border halfedge count mismatch"
                );
            }
            return false;
        }

        if verbose {
            debug!(border_edges, border_halfedges, "border normalization is valid");
        }
        true
    }

    fn assert_normalized(&self, what: &str) {
        assert!(
            self.border.is_valid(),
            "{what}: border normalization is stale, call normalize_border() first"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::super::{DefaultItems, HalfedgeDs};

    /// Two edges forming a lone triangle side plus one interior edge
    fn sample() -> (HalfedgeDs<DefaultItems>, [super::HalfedgeHandle; 3]) {
        let mut hds = HalfedgeDs::new();
        let f = hds.new_facet(Default::default());
        let a = hds.new_edge();
        let b = hds.new_edge();
        let c = hds.new_edge();
        // a: facet on one side only, flipped so the hole side comes first
        hds.set_facet(a.opposite(), Some(f));
        // b: facet on both sides
        hds.set_facet(b, Some(f));
        hds.set_facet(b.opposite(), Some(f));
        // c: facet on the first side
        hds.set_facet(c, Some(f));
        (hds, [a, b, c])
    }

    #[test]
    fn test_normalize_orders_sequence() {
        let (mut hds, [a, b, c]) = sample();
        assert!(!hds.normalized_border_is_valid(false));
        hds.normalize_border();
        assert!(hds.normalized_border_is_valid(true));
        assert_eq!(hds.size_of_border_halfedges(), 2);
        assert_eq!(hds.size_of_border_edges(), 2);

        let sequence: Vec<_> = hds.halfedges().collect();
        assert_eq!(sequence, vec![b, b.opposite(), a.opposite(), a, c, c.opposite()]);

        let border: Vec<_> = hds.border_edges().collect();
        assert_eq!(border, vec![a.opposite(), c]);
        assert_eq!(hds.non_border_halfedges().count(), 2);
        assert_eq!(hds.border_halfedges().count(), 4);
    }

    #[test]
    fn test_mutation_invalidates() {
        let (mut hds, [_, b, _]) = sample();
        hds.normalize_border();
        hds.set_facet(b, None);
        assert!(!hds.normalized_border_is_valid(false));
        hds.normalize_border();
        assert!(hds.normalized_border_is_valid(false));
        hds.new_edge();
        assert!(!hds.normalized_border_is_valid(false));
    }

    #[test]
    #[should_panic(expected = "stale")]
    fn test_stale_count_panics() {
        let (hds, _) = sample();
        hds.size_of_border_edges();
    }
}
