//! Kamada-Kawai energy layout.
//!
//! Minimizes `½ Σ (|pᵢ - pⱼ| / dᵢⱼ - 1)²` over ordered pairs, where `dᵢⱼ`
//! is the hop distance between nodes, plus a small term pulling the mean
//! position to the origin. Pairs in different components sit at a huge
//! distance and barely interact.
//!
//! Gradient descent from the circular layout with backtracking: a step is
//! accepted only if it does not raise the energy. The solver stops once
//! the gradient norm drops under the tolerance or the iteration cap hits.
//! No randomness is involved, so the result is bit-identical across calls.

use rustworkx_core::petgraph::algo::dijkstra;
use rustworkx_core::petgraph::graph::NodeIndex;

use super::{circular_positions, Point};
use crate::graph::SemanticGraph;

const DISCONNECTED: f64 = 1e6;
const MEAN_WEIGHT: f64 = 1e-3;
const INITIAL_STEP: f64 = 0.1;
const MIN_STEP: f64 = 1e-12;

/// All-pairs hop distances; the diagonal is 0.
///
/// Every edge counts as one hop. Similarity-weighted path lengths are not used.
fn hop_distances(graph: &SemanticGraph) -> Vec<Vec<f64>> {
    let n = graph.node_count();
    let g = graph.graph();

    (0..n)
        .map(|i| {
            let reached = dijkstra(g, NodeIndex::new(i), None, |_| 1.0f64);
            (0..n)
                .map(|j| {
                    if i == j {
                        0.0
                    } else {
                        reached.get(&NodeIndex::new(j)).copied().unwrap_or(DISCONNECTED)
                    }
                })
                .collect()
        })
        .collect()
}

/// Energy and its gradient at `pos`.
fn stress(pos: &[Point], inv: &[Vec<f64>]) -> (f64, Vec<Point>) {
    let n = pos.len();
    let mut cost = 0.0;
    let mut grad = vec![Point::ORIGIN; n];

    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let dx = pos[i].x - pos[j].x;
            let dy = pos[i].y - pos[j].y;
            let sep = (dx * dx + dy * dy).sqrt();
            let offset = sep * inv[i][j] - 1.0;
            cost += 0.5 * offset * offset;

            if sep > 0.0 {
                // Each unordered pair appears twice in the sum
                let scale = 2.0 * inv[i][j] * offset / sep;
                grad[i].x += scale * dx;
                grad[i].y += scale * dy;
            }
        }
    }

    let sx: f64 = pos.iter().map(|p| p.x).sum();
    let sy: f64 = pos.iter().map(|p| p.y).sum();
    cost += 0.5 * MEAN_WEIGHT * (sx * sx + sy * sy);
    for g in grad.iter_mut() {
        g.x += MEAN_WEIGHT * sx;
        g.y += MEAN_WEIGHT * sy;
    }

    (cost, grad)
}

fn norm(v: &[Point]) -> f64 {
    v.iter().map(|p| p.x * p.x + p.y * p.y).sum::<f64>().sqrt()
}

/// Unscaled energy-minimizing positions.
pub fn energy_positions(graph: &SemanticGraph, max_iterations: usize, tolerance: f64) -> Vec<Point> {
    let n = graph.node_count();
    if n <= 1 {
        return circular_positions(n);
    }

    let inv: Vec<Vec<f64>> = hop_distances(graph)
        .into_iter()
        .map(|row| row.into_iter().map(|d| if d > 0.0 { 1.0 / d } else { 0.0 }).collect())
        .collect();

    let mut pos = circular_positions(n);
    let (mut cost, mut grad) = stress(&pos, &inv);
    let mut step = INITIAL_STEP;
    let mut iterations = 0;

    'solve: while iterations < max_iterations {
        iterations += 1;
        if norm(&grad) < tolerance {
            break;
        }

        loop {
            let candidate: Vec<Point> = pos
                .iter()
                .zip(&grad)
                .map(|(p, g)| Point::new(p.x - step * g.x, p.y - step * g.y))
                .collect();
            let (c, g) = stress(&candidate, &inv);

            if c <= cost {
                pos = candidate;
                cost = c;
                grad = g;
                step *= 1.5;
                break;
            }

            step *= 0.5;
            if step < MIN_STEP {
                break 'solve;
            }
        }
    }

    tracing::trace!(iterations, energy = cost, "energy layout converged");

    pos
}
