//! Similarity layer: cosine kernels, the pairwise matrix and top-K
//! neighbor selection.
//!
//! ```text
//! EmbeddingSet → SimilarityMatrix → NeighborList
//! ```

pub mod distance;
mod matrix;
mod neighbors;

pub use matrix::{EmbeddingSet, SimilarityMatrix};
pub use neighbors::{find_neighbors, validate_params, Neighbor, NeighborList};
