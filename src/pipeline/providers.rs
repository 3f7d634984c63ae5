//! Contracts for the collaborators that live outside this crate.
//!
//! Failures from either side are precondition failures of the calling
//! request and surface as [`VizError::Provider`](crate::error::VizError).

use crate::error::{Result, VizError};
use crate::similarity::EmbeddingSet;

/// Turns chunk texts into embeddings, index-aligned with the input.
pub trait EmbeddingProvider {
    fn encode(&self, texts: &[String]) -> Result<EmbeddingSet>;
}

/// Projects embeddings to `target_dimensions` coordinates per vector,
/// index-aligned with the input (PCA, UMAP, ...).
pub trait DimensionalityReducer {
    fn reduce(&self, embeddings: &EmbeddingSet, target_dimensions: usize) -> Result<Vec<Vec<f64>>>;
}

impl<F> EmbeddingProvider for F
where
    F: Fn(&[String]) -> Result<EmbeddingSet>,
{
    fn encode(&self, texts: &[String]) -> Result<EmbeddingSet> {
        self(texts)
    }
}

/// Coordinates already projected by the caller, one row per vector passed
/// to [`DimensionalityReducer::reduce`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Precomputed(pub Vec<Vec<f64>>);

impl DimensionalityReducer for Precomputed {
    fn reduce(&self, embeddings: &EmbeddingSet, target_dimensions: usize) -> Result<Vec<Vec<f64>>> {
        if self.0.len() != embeddings.len() {
            return Err(VizError::ShapeMismatch {
                index: 0,
                expected: embeddings.len(),
                got: self.0.len(),
            });
        }
        Ok(self
            .0
            .iter()
            .map(|p| p.iter().take(target_dimensions).copied().collect())
            .collect())
    }
}
