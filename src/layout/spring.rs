//! Fruchterman-Reingold spring layout.
//!
//! Each pair is pushed along its separation vector with coefficient
//! `k² / d² - w * d / k` (repulsion minus weighted attraction), and a
//! linearly cooling temperature caps each step. Initial
//! positions come from a seeded LCG, so equal seeds give equal layouts.

use super::Point;
use crate::graph::SemanticGraph;

const MIN_DISTANCE: f64 = 0.01;
const CONVERGENCE: f64 = 1e-4;

/// 64-bit linear congruential generator (Knuth MMIX constants).
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Uniform in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Dense symmetric adjacency with edge weights.
fn adjacency(graph: &SemanticGraph) -> Vec<Vec<f64>> {
    let n = graph.node_count();
    let mut a = vec![vec![0.0; n]; n];
    for e in graph.edges() {
        a[e.source][e.target] = e.weight;
        a[e.target][e.source] = e.weight;
    }
    a
}

/// Unscaled spring positions.
///
/// `optimal_distance` defaults to `sqrt(1 / n)` when `None`.
pub fn spring_positions(
    graph: &SemanticGraph,
    optimal_distance: Option<f64>,
    iterations: usize,
    seed: u64,
) -> Vec<Point> {
    let n = graph.node_count();
    if n == 0 {
        return vec![];
    }
    if n == 1 {
        return vec![Point::ORIGIN];
    }

    let mut rng = Lcg::new(seed);
    let mut pos: Vec<Point> = (0..n)
        .map(|_| {
            let x = rng.next_f64();
            let y = rng.next_f64();
            Point::new(x, y)
        })
        .collect();

    let a = adjacency(graph);
    let k = optimal_distance.unwrap_or_else(|| (1.0 / n as f64).sqrt());

    // Temperature: a tenth of the initial extent, cooling to zero
    let extent = |axis: fn(&Point) -> f64| {
        let (lo, hi) = pos
            .iter()
            .map(axis)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        hi - lo
    };
    let mut t = extent(|p| p.x).max(extent(|p| p.y)) * 0.1;
    let dt = t / (iterations as f64 + 1.0);

    for _ in 0..iterations {
        let mut displacement = vec![Point::ORIGIN; n];

        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let dx = pos[i].x - pos[j].x;
                let dy = pos[i].y - pos[j].y;
                let d = (dx * dx + dy * dy).sqrt().max(MIN_DISTANCE);
                let force = k * k / (d * d) - a[i][j] * d / k;
                displacement[i].x += dx * force;
                displacement[i].y += dy * force;
            }
        }

        let mut moved = 0.0;
        for i in 0..n {
            let mut length = (displacement[i].x.powi(2) + displacement[i].y.powi(2)).sqrt();
            if length < MIN_DISTANCE {
                length = 0.1;
            }
            let sx = displacement[i].x * t / length;
            let sy = displacement[i].y * t / length;
            pos[i].x += sx;
            pos[i].y += sy;
            moved += (sx * sx + sy * sy).sqrt();
        }

        t -= dt;
        if moved / (n as f64) < CONVERGENCE {
            break;
        }
    }

    pos
}
