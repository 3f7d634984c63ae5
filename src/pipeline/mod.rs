//! Visualization pipeline
//!
//! One call runs the whole chain against a read-only session and returns
//! a fresh scene. Nothing is cached between calls.
//!
//! ```text
//! VizSession.embeddings → SimilarityMatrix → NeighborList → SemanticGraph
//!                                                             ↓
//!                     graph layout (network) | reducer (scatter) → Layout
//!                                                             ↓
//!                        selection + query marker → SceneEncoder → Scene
//! ```

mod providers;
mod session;

#[cfg(test)]
mod tests;

pub use providers::{DimensionalityReducer, EmbeddingProvider, Precomputed};
pub use session::{ChunkId, RetrievalHit, VizSession};

use serde::{Deserialize, Serialize};

use crate::config::{SceneStyle, VizConfig};
use crate::error::{Result, VizError};
use crate::graph::{GraphStats, SemanticGraph};
use crate::layout::{compute_layout, Layout, Point};
use crate::scene::{Scene, SceneEncoder};
use crate::similarity::{find_neighbors, NeighborList, SimilarityMatrix};

/// Scene plus the statistics of the graph it was drawn from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Visualization {
    pub scene: Scene,
    pub stats: GraphStats,
}

impl Visualization {
    fn empty(style: &SceneStyle) -> Self {
        Self {
            scene: Scene {
                title: style.title.clone(),
                ..Scene::default()
            },
            stats: GraphStats::default(),
        }
    }
}

fn neighbor_graph(session: &VizSession, config: &VizConfig) -> Result<(NeighborList, SemanticGraph)> {
    let matrix = SimilarityMatrix::compute(session.embeddings());
    let neighbors = find_neighbors(&matrix, config.neighbors.k, config.neighbors.threshold)?;
    let graph = SemanticGraph::build(&neighbors);
    Ok((neighbors, graph))
}

fn encoder<'a>(style: &'a SceneStyle, session: &'a VizSession, neighbors: &'a NeighborList) -> SceneEncoder<'a> {
    let encoder = SceneEncoder::new(style)
        .with_chunks(session.chunks())
        .with_neighbors(neighbors);
    match session.query_text() {
        Some(text) => encoder.with_query_text(text),
        None => encoder,
    }
}

/// Network view: nodes placed by a graph layout.
///
/// With at least one retrieval hit, the query marker sits at the
/// similarity-weighted centroid of the retrieved nodes.
pub fn visualize_network(session: &VizSession, config: &VizConfig) -> Result<Visualization> {
    config.validate()?;
    session.validate()?;

    let style = &config.network_style;
    if session.is_empty() {
        tracing::debug!("empty session, returning empty network scene");
        return Ok(Visualization::empty(style));
    }

    let (neighbors, graph) = neighbor_graph(session, config)?;
    let layout = compute_layout(&graph, &config.layout)?;

    let members: Vec<(usize, f64)> = session
        .valid_hits()
        .map(|h| (h.chunk.index(), h.similarity()))
        .collect();
    let query = layout.weighted_centroid(&members);

    let scene = encoder(style, session, &neighbors).encode(&graph, &layout, &session.selection(), query)?;

    Ok(Visualization {
        scene,
        stats: graph.stats(),
    })
}

/// Scatter view: nodes placed by an external 2D projection, with neighbor
/// connections drawn between them.
///
/// When the session holds a query embedding it is projected together with
/// the chunks and becomes the query marker.
pub fn visualize_scatter<R>(session: &VizSession, reducer: &R, config: &VizConfig) -> Result<Visualization>
where
    R: DimensionalityReducer + ?Sized,
{
    config.validate()?;
    session.validate()?;

    let style = &config.scatter_style;
    if session.is_empty() {
        tracing::debug!("empty session, returning empty scatter scene");
        return Ok(Visualization::empty(style));
    }

    let (neighbors, graph) = neighbor_graph(session, config)?;

    let n = session.len();
    let input = match session.query_embedding() {
        Some(q) => session.embeddings().with_appended(q)?,
        None => session.embeddings().clone(),
    };

    let projected = reducer.reduce(&input, 2)?;
    if projected.len() != input.len() {
        return Err(VizError::Provider(format!(
            "reducer returned {} points for {} vectors",
            projected.len(),
            input.len()
        )));
    }

    // Reducers may return fewer components than asked for; pad with zeros
    let points: Vec<Point> = projected
        .iter()
        .map(|p| Point::new(p.first().copied().unwrap_or(0.0), p.get(1).copied().unwrap_or(0.0)))
        .collect();

    let layout = Layout::from_projection(&points[..n]);
    let query = points.get(n).copied();

    let scene = encoder(style, session, &neighbors).encode(&graph, &layout, &session.selection(), query)?;

    Ok(Visualization {
        scene,
        stats: graph.stats(),
    })
}
