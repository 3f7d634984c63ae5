//! Layout Engine - 2D positions for semantic graph nodes
//!
//! Three graph layouts, selected through a closed enum:
//! - `Spring`: Fruchterman-Reingold force simulation, seeded
//! - `Circular`: evenly spaced on a circle in index order
//! - `Energy`: Kamada-Kawai stress minimization over hop distances
//!
//! Graph layouts are centred and rescaled so the largest absolute
//! coordinate equals the configured scale. Positions supplied by an
//! external reducer go through [`Layout::from_projection`] unchanged.

mod circular;
mod energy;
mod spring;

pub use circular::circular_positions;
pub use energy::energy_positions;
pub use spring::{spring_positions, Lcg};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::LayoutParams;
use crate::error::{Result, VizError};
use crate::graph::SemanticGraph;

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutAlgorithm {
    Spring,
    Circular,
    #[serde(rename = "kamada_kawai", alias = "energy", alias = "energy-minimizing")]
    Energy,
}

impl LayoutAlgorithm {
    pub const ALL: [LayoutAlgorithm; 3] = [
        LayoutAlgorithm::Spring,
        LayoutAlgorithm::Circular,
        LayoutAlgorithm::Energy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutAlgorithm::Spring => "spring",
            LayoutAlgorithm::Circular => "circular",
            LayoutAlgorithm::Energy => "kamada_kawai",
        }
    }

    /// Whether the output depends on the seed.
    pub fn is_seeded(&self) -> bool {
        matches!(self, LayoutAlgorithm::Spring)
    }
}

impl fmt::Display for LayoutAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutAlgorithm {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spring" => Ok(LayoutAlgorithm::Spring),
            "circular" => Ok(LayoutAlgorithm::Circular),
            "kamada_kawai" | "kamada-kawai" | "energy" | "energy-minimizing" | "energy_minimizing" => {
                Ok(LayoutAlgorithm::Energy)
            }
            other => Err(VizError::invalid(format!("unknown layout algorithm '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Point {
    fn from(p: [f64; 2]) -> Self {
        Point::new(p[0], p[1])
    }
}

/// Node index → position. One layout per render pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Layout {
    positions: Vec<Point>,
}

impl Layout {
    pub fn new(positions: Vec<Point>) -> Self {
        Self { positions }
    }

    /// Identity copy of externally projected coordinates.
    pub fn from_projection<P: Into<Point> + Copy>(coords: &[P]) -> Self {
        Self {
            positions: coords.iter().map(|&p| p.into()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Point> {
        self.positions.get(index).copied()
    }

    pub fn positions(&self) -> &[Point] {
        &self.positions
    }

    /// Weighted centroid of the given nodes; `None` if no weight lands.
    pub fn weighted_centroid(&self, members: &[(usize, f64)]) -> Option<Point> {
        let mut total = 0.0;
        let (mut x, mut y) = (0.0, 0.0);

        for &(index, weight) in members {
            let Some(p) = self.get(index) else { continue };
            let w = weight.max(0.0);
            x += p.x * w;
            y += p.y * w;
            total += w;
        }

        if total > 0.0 {
            return Some(Point::new(x / total, y / total));
        }

        // All weights non-positive: fall back to the plain mean
        let points: Vec<Point> = members.iter().filter_map(|&(i, _)| self.get(i)).collect();
        if points.is_empty() {
            return None;
        }
        let n = points.len() as f64;
        Some(Point::new(
            points.iter().map(|p| p.x).sum::<f64>() / n,
            points.iter().map(|p| p.y).sum::<f64>() / n,
        ))
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Lay out `graph` with the given algorithm, default parameters and `seed`.
pub fn layout(graph: &SemanticGraph, algorithm: LayoutAlgorithm, seed: u64) -> Layout {
    let params = LayoutParams {
        algorithm,
        seed,
        ..LayoutParams::default()
    };
    run(graph, &params)
}

/// Lay out `graph` as described by `params`.
pub fn compute_layout(graph: &SemanticGraph, params: &LayoutParams) -> Result<Layout> {
    params.validate()?;
    Ok(run(graph, params))
}

fn run(graph: &SemanticGraph, params: &LayoutParams) -> Layout {
    let raw = match params.algorithm {
        LayoutAlgorithm::Spring => spring_positions(
            graph,
            params.spring_distance,
            params.spring_iterations,
            params.seed,
        ),
        LayoutAlgorithm::Circular => circular_positions(graph.node_count()),
        LayoutAlgorithm::Energy => energy_positions(
            graph,
            params.energy_max_iterations,
            params.energy_tolerance,
        ),
    };

    tracing::debug!(
        algorithm = %params.algorithm,
        nodes = raw.len(),
        seed = params.seed,
        "layout computed"
    );

    Layout::new(rescale(raw, params.scale))
}

/// Centre on the mean and scale so the largest absolute coordinate equals
/// `scale`. Collapsed layouts stay at the origin.
pub fn rescale(mut positions: Vec<Point>, scale: f64) -> Vec<Point> {
    if positions.is_empty() {
        return positions;
    }

    let n = positions.len() as f64;
    let cx = positions.iter().map(|p| p.x).sum::<f64>() / n;
    let cy = positions.iter().map(|p| p.y).sum::<f64>() / n;

    let mut lim: f64 = 0.0;
    for p in positions.iter_mut() {
        p.x -= cx;
        p.y -= cy;
        lim = lim.max(p.x.abs()).max(p.y.abs());
    }

    if lim > 0.0 {
        let factor = scale / lim;
        for p in positions.iter_mut() {
            p.x *= factor;
            p.y *= factor;
        }
    }

    positions
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::{Neighbor, NeighborList};

    fn path_graph(n: usize) -> SemanticGraph {
        let lists = (0..n)
            .map(|i| {
                if i + 1 < n {
                    vec![Neighbor { index: i + 1, score: 0.8 }]
                } else {
                    vec![]
                }
            })
            .collect();
        SemanticGraph::build(&NeighborList::from_lists(lists))
    }

    #[test]
    fn test_parse_algorithm_names() {
        assert_eq!("spring".parse::<LayoutAlgorithm>().unwrap(), LayoutAlgorithm::Spring);
        assert_eq!("Circular".parse::<LayoutAlgorithm>().unwrap(), LayoutAlgorithm::Circular);
        assert_eq!("kamada_kawai".parse::<LayoutAlgorithm>().unwrap(), LayoutAlgorithm::Energy);
        assert_eq!("energy-minimizing".parse::<LayoutAlgorithm>().unwrap(), LayoutAlgorithm::Energy);
        assert!(matches!(
            "random".parse::<LayoutAlgorithm>(),
            Err(VizError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_algorithm_serde_names() {
        let json = serde_json::to_string(&LayoutAlgorithm::Energy).unwrap();
        assert_eq!(json, "\"kamada_kawai\"");
        let parsed: LayoutAlgorithm = serde_json::from_str("\"energy\"").unwrap();
        assert_eq!(parsed, LayoutAlgorithm::Energy);
    }

    #[test]
    fn test_every_algorithm_fits_scale() {
        let g = path_graph(6);
        for algorithm in LayoutAlgorithm::ALL {
            let l = layout(&g, algorithm, 42);
            assert_eq!(l.len(), 6);
            let max = l
                .positions()
                .iter()
                .map(|p| p.x.abs().max(p.y.abs()))
                .fold(0.0, f64::max);
            assert!((max - 500.0).abs() < 1e-6, "{} max coordinate {}", algorithm, max);
            assert!(l.positions().iter().all(Point::is_finite));
        }
    }

    #[test]
    fn test_single_node_at_origin() {
        let g = SemanticGraph::with_nodes(1);
        for algorithm in LayoutAlgorithm::ALL {
            assert_eq!(layout(&g, algorithm, 7).positions(), &[Point::ORIGIN]);
        }
    }

    #[test]
    fn test_empty_graph_empty_layout() {
        let g = SemanticGraph::default();
        for algorithm in LayoutAlgorithm::ALL {
            assert!(layout(&g, algorithm, 7).is_empty());
        }
    }

    #[test]
    fn test_compute_layout_validates() {
        let g = path_graph(3);
        let params = LayoutParams { scale: -1.0, ..LayoutParams::default() };
        assert!(compute_layout(&g, &params).is_err());
    }

    #[test]
    fn test_from_projection_is_identity() {
        let coords = [[1.5, -2.0], [0.0, 3.25]];
        let l = Layout::from_projection(&coords);
        assert_eq!(l.positions(), &[Point::new(1.5, -2.0), Point::new(0.0, 3.25)]);
    }

    #[test]
    fn test_rescale_centres_and_scales() {
        let out = rescale(vec![Point::new(1.0, 1.0), Point::new(3.0, 1.0)], 10.0);
        assert_eq!(out, vec![Point::new(-10.0, 0.0), Point::new(10.0, 0.0)]);

        let collapsed = rescale(vec![Point::new(2.0, 2.0), Point::new(2.0, 2.0)], 10.0);
        assert_eq!(collapsed, vec![Point::ORIGIN, Point::ORIGIN]);
    }

    #[test]
    fn test_weighted_centroid() {
        let l = Layout::new(vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(0.0, 10.0)]);
        assert_eq!(l.weighted_centroid(&[(0, 1.0), (1, 3.0)]), Some(Point::new(7.5, 0.0)));
        assert_eq!(l.weighted_centroid(&[(1, 0.0), (2, 0.0)]), Some(Point::new(5.0, 5.0)));
        assert_eq!(l.weighted_centroid(&[(9, 1.0)]), None);
    }
}
