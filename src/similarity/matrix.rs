//! Embedding set and dense pairwise cosine similarity.
//!
//! Brute force over all unordered pairs: each score is computed once and
//! mirrored, so the matrix is symmetric by construction.

use serde::{Deserialize, Serialize};

use super::distance::{cosine_similarity, squared_magnitude};
use crate::error::{Result, VizError};

/// Ordered, index-addressed embeddings, one per chunk.
///
/// All vectors share one dimensionality; this is checked on construction
/// and on deserialization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f32>>", into = "Vec<Vec<f32>>")]
pub struct EmbeddingSet {
    vectors: Vec<Vec<f32>>,
    dimensions: usize,
}

impl EmbeddingSet {
    pub fn new(vectors: Vec<Vec<f32>>) -> Result<Self> {
        let dimensions = vectors.first().map(|v| v.len()).unwrap_or(0);

        for (index, v) in vectors.iter().enumerate() {
            if v.len() != dimensions {
                return Err(VizError::ShapeMismatch {
                    index,
                    expected: dimensions,
                    got: v.len(),
                });
            }
        }

        Ok(Self { vectors, dimensions })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Vector length shared by every embedding (0 for an empty set).
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn get(&self, index: usize) -> Option<&[f32]> {
        self.vectors.get(index).map(|v| v.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &[f32]> {
        self.vectors.iter().map(|v| v.as_slice())
    }

    /// Copy of this set with one extra vector appended (e.g. a query).
    pub fn with_appended(&self, vector: &[f32]) -> Result<Self> {
        if !self.is_empty() && vector.len() != self.dimensions {
            return Err(VizError::ShapeMismatch {
                index: self.len(),
                expected: self.dimensions,
                got: vector.len(),
            });
        }
        let mut vectors = self.vectors.clone();
        vectors.push(vector.to_vec());
        Self::new(vectors)
    }
}

impl TryFrom<Vec<Vec<f32>>> for EmbeddingSet {
    type Error = VizError;

    fn try_from(vectors: Vec<Vec<f32>>) -> Result<Self> {
        Self::new(vectors)
    }
}

impl From<EmbeddingSet> for Vec<Vec<f32>> {
    fn from(set: EmbeddingSet) -> Self {
        set.vectors
    }
}

/// Square matrix of cosine scores. The diagonal is not a score.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    // Row-major, diagonal left as NaN
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// Compute every unordered pair once and mirror it.
    pub fn compute(embeddings: &EmbeddingSet) -> Self {
        let n = embeddings.len();
        let mut values = vec![f64::NAN; n * n];

        let sq: Vec<f64> = embeddings.iter().map(squared_magnitude).collect();
        let vectors: Vec<&[f32]> = embeddings.iter().collect();

        for i in 0..n {
            for j in (i + 1)..n {
                let score = cosine_similarity(vectors[i], vectors[j], Some(sq[i]), Some(sq[j]));
                values[i * n + j] = score;
                values[j * n + i] = score;
            }
        }

        tracing::debug!(chunks = n, dimensions = embeddings.dimensions(), "similarity matrix computed");

        Self { size: n, values }
    }

    /// Build from explicit rows. Rows must be square and symmetric; the
    /// diagonal is ignored.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = rows.len();
        let mut values = vec![f64::NAN; n * n];

        if let Some((index, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != n) {
            return Err(VizError::ShapeMismatch {
                index,
                expected: n,
                got: row.len(),
            });
        }

        for (i, row) in rows.iter().enumerate() {
            for (j, &score) in row.iter().enumerate() {
                if i == j {
                    continue;
                }
                if !(-1.0..=1.0).contains(&score) {
                    return Err(VizError::invalid(format!(
                        "similarity [{}][{}] = {} is outside [-1, 1]",
                        i, j, score
                    )));
                }
                if score != rows[j][i] {
                    return Err(VizError::invalid(format!(
                        "similarity matrix is not symmetric at ({}, {})",
                        i, j
                    )));
                }
                values[i * n + j] = score;
            }
        }

        Ok(Self { size: n, values })
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Score between two distinct items; `None` on the diagonal or out of range.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i == j || i >= self.size || j >= self.size {
            return None;
        }
        Some(self.values[i * self.size + j])
    }

    /// Scores from `i` to every other item, in index order.
    pub fn row(&self, i: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let n = self.size;
        let start = i.min(n) * n;
        let row = if i < n { &self.values[start..start + n] } else { &[][..] };
        row.iter()
            .enumerate()
            .filter(move |(j, _)| *j != i)
            .map(|(j, &score)| (j, score))
    }
}
