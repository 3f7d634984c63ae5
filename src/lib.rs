//! RagViz Core: Semantic Neighbor Graph for RAG Visualization
//!
//! A Rust/WASM implementation of the retrieval visualization pipeline: chunk
//! embeddings in, render-ready scenes out.
//!
//! # Architecture
//!
//! - `similarity` - cosine kernels, pairwise `SimilarityMatrix`, top-K `find_neighbors`
//! - `graph` - `SemanticGraph`: undirected weighted graph over petgraph, plus `GraphStats`
//! - `layout` - spring, circular and energy-minimizing layouts, rescaled to a bounding box
//! - `scene` - `SceneEncoder`: node categories, edge width/opacity, hover text
//! - `pipeline` - `VizSession` request context, `visualize_network` / `visualize_scatter`
//! - `config` - `VizConfig` defaults, presets and JSON loading
//! - `wasm` - `SemanticGraphView` browser binding
//!
//! Every call is stateless: the session is read, derived structures are
//! rebuilt, and a fresh scene is returned.
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { SemanticGraphView } from 'ragviz-core';
//!
//! await init();
//!
//! const view = new SemanticGraphView(JSON.stringify({ neighbors: { k: 5, threshold: 0.3 } }));
//!
//! const { scene, stats } = view.visualize({
//!   session: {
//!     chunks: ['first chunk', 'second chunk'],
//!     embeddings: [[0.1, 0.9], [0.2, 0.8]],
//!     hits: [{ chunk: 1, distance: 0.12 }],
//!     query_text: 'what is in the second chunk?'
//!   },
//!   layout: 'kamada_kawai'
//! });
//!
//! console.log(scene.nodes);  // positions, categories, colours, hover text
//! console.log(scene.edges);  // endpoints, width, opacity
//! console.log(stats);        // node/edge counts, components, density
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod layout;
pub mod pipeline;
pub mod scene;
pub mod similarity;
pub mod wasm;

pub use config::{EdgeEncoding, LayoutParams, NeighborParams, NodeStyle, SceneStyle, ValueRange, VizConfig};
pub use error::{Result, VizError};
pub use graph::{GraphStats, SemanticEdge, SemanticGraph};
pub use layout::{compute_layout, layout, Layout, LayoutAlgorithm, Point};
pub use pipeline::{
    visualize_network, visualize_scatter, ChunkId, DimensionalityReducer, EmbeddingProvider, Precomputed,
    RetrievalHit, Visualization, VizSession,
};
pub use scene::{EdgeVisual, NodeCategory, NodeVisual, Scene, SceneEncoder};
pub use similarity::{find_neighbors, EmbeddingSet, Neighbor, NeighborList, SimilarityMatrix};
pub use wasm::SemanticGraphView;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("ragviz-core v{}", env!("CARGO_PKG_VERSION"))
}
