//! Undirected weighted neighbor graph using petgraph
//!
//! Nodes are chunk indices `0..N` (petgraph `NodeIndex(i)` is chunk `i`).
//! Edges are the symmetric closure of the per-chunk top-K relation, keyed
//! by the canonical pair `(min, max)`.

mod stats;

pub use stats::GraphStats;

// Use petgraph from rustworkx-core to ensure version compatibility
use rustworkx_core::petgraph::graph::{NodeIndex, UnGraph};
use rustworkx_core::petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::similarity::NeighborList;

// =============================================================================
// Types
// =============================================================================

/// An edge between two chunks, `source < target`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SemanticEdge {
    pub source: usize,
    pub target: usize,
    pub weight: f64,
}

// =============================================================================
// SemanticGraph
// =============================================================================

/// The chunk similarity graph.
#[derive(Debug, Clone, Default)]
pub struct SemanticGraph {
    graph: UnGraph<usize, f64>,
}

impl SemanticGraph {
    /// Graph with `node_count` isolated nodes.
    pub fn with_nodes(node_count: usize) -> Self {
        let mut graph = UnGraph::with_capacity(node_count, 0);
        for i in 0..node_count {
            graph.add_node(i);
        }
        Self { graph }
    }

    /// Build from neighbor lists.
    ///
    /// A pair reported from both directions with different scores keeps
    /// the larger one. Every chunk becomes a node, with or without edges.
    pub fn build(neighbors: &NeighborList) -> Self {
        let mut pairs: BTreeMap<(usize, usize), f64> = BTreeMap::new();

        for (i, list) in neighbors.iter() {
            for nb in list {
                if nb.index == i {
                    continue;
                }
                let key = (i.min(nb.index), i.max(nb.index));
                pairs
                    .entry(key)
                    .and_modify(|w| *w = w.max(nb.score))
                    .or_insert(nb.score);
            }
        }

        let mut sg = Self::with_nodes(neighbors.len());
        for ((a, b), weight) in pairs {
            sg.graph.add_edge(NodeIndex::new(a), NodeIndex::new(b), weight);
        }

        tracing::debug!(
            nodes = sg.node_count(),
            edges = sg.edge_count(),
            "semantic graph built"
        );

        sg
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Edges in canonical `(source, target)` order.
    pub fn edges(&self) -> Vec<SemanticEdge> {
        let mut edges: Vec<SemanticEdge> = self
            .graph
            .edge_references()
            .map(|e| {
                let (a, b) = (e.source().index(), e.target().index());
                SemanticEdge {
                    source: a.min(b),
                    target: a.max(b),
                    weight: *e.weight(),
                }
            })
            .collect();
        edges.sort_by(|x, y| (x.source, x.target).cmp(&(y.source, y.target)));
        edges
    }

    /// Weight of the edge between `a` and `b`, in either order.
    pub fn weight(&self, a: usize, b: usize) -> Option<f64> {
        if a >= self.node_count() || b >= self.node_count() {
            return None;
        }
        self.graph
            .find_edge(NodeIndex::new(a), NodeIndex::new(b))
            .and_then(|e| self.graph.edge_weight(e).copied())
    }

    pub fn degree(&self, node: usize) -> usize {
        if node >= self.node_count() {
            return 0;
        }
        self.graph.edges(NodeIndex::new(node)).count()
    }

    /// Neighbors of `node` in ascending index order.
    pub fn neighbors(&self, node: usize) -> Vec<usize> {
        if node >= self.node_count() {
            return vec![];
        }
        let mut out: Vec<usize> = self
            .graph
            .neighbors(NodeIndex::new(node))
            .map(|n| n.index())
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Access the underlying graph for algorithms.
    pub fn graph(&self) -> &UnGraph<usize, f64> {
        &self.graph
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats::of(self)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::Neighbor;

    fn nb(index: usize, score: f64) -> Neighbor {
        Neighbor { index, score }
    }

    #[test]
    fn test_symmetric_closure() {
        // 0 lists 1, 1 lists nothing: edge still exists.
        let nl = NeighborList::from_lists(vec![vec![nb(1, 0.8)], vec![], vec![]]);
        let g = SemanticGraph::build(&nl);

        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.weight(1, 0), Some(0.8));
        assert_eq!(g.degree(2), 0);
    }

    #[test]
    fn test_duplicate_direction_keeps_max_weight() {
        let nl = NeighborList::from_lists(vec![vec![nb(1, 0.6)], vec![nb(0, 0.7)]]);
        let g = SemanticGraph::build(&nl);

        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.edges(), vec![SemanticEdge { source: 0, target: 1, weight: 0.7 }]);

        // Same result regardless of which side reports the larger score.
        let nl = NeighborList::from_lists(vec![vec![nb(1, 0.7)], vec![nb(0, 0.6)]]);
        assert_eq!(SemanticGraph::build(&nl).weight(0, 1), Some(0.7));
    }

    #[test]
    fn test_no_self_loops_or_duplicates() {
        let nl = NeighborList::from_lists(vec![
            vec![nb(1, 0.9), nb(2, 0.5)],
            vec![nb(0, 0.9), nb(2, 0.4)],
            vec![nb(0, 0.5), nb(1, 0.4)],
        ]);
        let g = SemanticGraph::build(&nl);
        let edges = g.edges();

        assert_eq!(edges.len(), 3);
        assert!(edges.iter().all(|e| e.source < e.target));
        let mut keys: Vec<(usize, usize)> = edges.iter().map(|e| (e.source, e.target)).collect();
        keys.dedup();
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn test_empty_neighbor_list_gives_empty_graph() {
        let g = SemanticGraph::build(&NeighborList::default());
        assert!(g.is_empty());
        assert!(g.edges().is_empty());
    }

    #[test]
    fn test_neighbors_sorted() {
        let nl = NeighborList::from_lists(vec![
            vec![nb(3, 0.9), nb(1, 0.5)],
            vec![],
            vec![nb(0, 0.4)],
            vec![],
        ]);
        let g = SemanticGraph::build(&nl);
        assert_eq!(g.neighbors(0), vec![1, 2, 3]);
        assert!(g.neighbors(10).is_empty());
    }
}
