//! Top-K semantic neighbor selection.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::matrix::SimilarityMatrix;
use crate::error::{Result, VizError};

/// One neighbor of a chunk together with its similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub index: usize,
    pub score: f64,
}

/// Highest score first; equal scores by ascending index.
fn rank(a: &Neighbor, b: &Neighbor) -> Ordering {
    b.score.total_cmp(&a.score).then(a.index.cmp(&b.index))
}

/// Per-chunk neighbor lists, indexed by chunk.
///
/// Every list is sorted by descending score, holds at most `k` entries,
/// never contains its own chunk and only keeps scores `>= threshold`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NeighborList {
    lists: Vec<Vec<Neighbor>>,
}

impl NeighborList {
    /// Wrap precomputed lists. Entries are re-sorted, self references and
    /// out-of-range indices are dropped.
    pub fn from_lists(lists: Vec<Vec<Neighbor>>) -> Self {
        let n = lists.len();
        let lists = lists
            .into_iter()
            .enumerate()
            .map(|(i, mut list)| {
                list.retain(|nb| nb.index != i && nb.index < n);
                list.sort_by(rank);
                list
            })
            .collect();
        Self { lists }
    }

    /// Number of chunks (not the number of neighbor pairs).
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    pub fn get(&self, index: usize) -> &[Neighbor] {
        self.lists.get(index).map(|l| l.as_slice()).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &[Neighbor])> {
        self.lists.iter().enumerate().map(|(i, l)| (i, l.as_slice()))
    }

    pub fn pair_count(&self) -> usize {
        self.lists.iter().map(|l| l.len()).sum()
    }
}

pub fn validate_params(k: usize, threshold: f64) -> Result<()> {
    if k < 1 {
        return Err(VizError::invalid("k must be at least 1"));
    }
    if !(-1.0..=1.0).contains(&threshold) {
        return Err(VizError::invalid(format!(
            "threshold {} is outside [-1, 1]",
            threshold
        )));
    }
    Ok(())
}

/// Select the top `k` neighbors of every chunk, then drop those under
/// `threshold`.
///
/// Ranking happens before filtering, so a chunk can end up with fewer than
/// `k` neighbors, possibly none.
pub fn find_neighbors(matrix: &SimilarityMatrix, k: usize, threshold: f64) -> Result<NeighborList> {
    validate_params(k, threshold)?;

    let lists: Vec<Vec<Neighbor>> = (0..matrix.len())
        .map(|i| {
            let mut candidates: Vec<Neighbor> = matrix
                .row(i)
                .map(|(index, score)| Neighbor { index, score })
                .collect();
            candidates.sort_by(rank);
            candidates.truncate(k);
            candidates.retain(|nb| nb.score >= threshold);
            candidates
        })
        .collect();

    let neighbors = NeighborList { lists };
    tracing::debug!(
        chunks = neighbors.len(),
        pairs = neighbors.pair_count(),
        k,
        threshold,
        "semantic neighbors selected"
    );

    Ok(neighbors)
}
