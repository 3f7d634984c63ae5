use std::f64::consts::TAU;

use super::Point;

/// Unit-circle positions in node index order, starting at angle 0.
pub fn circular_positions(node_count: usize) -> Vec<Point> {
    match node_count {
        0 => vec![],
        1 => vec![Point::ORIGIN],
        n => (0..n)
            .map(|i| {
                let theta = TAU * i as f64 / n as f64;
                Point::new(theta.cos(), theta.sin())
            })
            .collect(),
    }
}
