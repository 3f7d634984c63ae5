//! Summary statistics for a semantic graph.

use rustworkx_core::petgraph::algo::connected_components;
use serde::{Deserialize, Serialize};

use super::SemanticGraph;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub isolated_nodes: usize,
    pub components: usize,
    pub mean_degree: f64,
    /// Edges over possible edges, 0.0 below two nodes.
    pub density: f64,
    pub min_weight: Option<f64>,
    pub mean_weight: Option<f64>,
    pub max_weight: Option<f64>,
}

impl GraphStats {
    pub fn of(graph: &SemanticGraph) -> Self {
        let n = graph.node_count();
        let m = graph.edge_count();
        if n == 0 {
            return Self::default();
        }

        let isolated_nodes = (0..n).filter(|&i| graph.degree(i) == 0).count();
        let components = connected_components(graph.graph());

        let possible = n * (n - 1) / 2;
        let density = if possible > 0 { m as f64 / possible as f64 } else { 0.0 };

        let weights: Vec<f64> = graph.edges().iter().map(|e| e.weight).collect();
        let (min_weight, mean_weight, max_weight) = if weights.is_empty() {
            (None, None, None)
        } else {
            let min = weights.iter().copied().fold(f64::INFINITY, f64::min);
            let max = weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mean = weights.iter().sum::<f64>() / weights.len() as f64;
            (Some(min), Some(mean), Some(max))
        };

        Self {
            node_count: n,
            edge_count: m,
            isolated_nodes,
            components,
            mean_degree: 2.0 * m as f64 / n as f64,
            density,
            min_weight,
            mean_weight,
            max_weight,
        }
    }
}
