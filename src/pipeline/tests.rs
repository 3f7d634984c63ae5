use super::*;
use crate::config::{LayoutParams, NeighborParams};
use crate::layout::LayoutAlgorithm;
use crate::scene::NodeCategory;
use crate::similarity::EmbeddingSet;

fn set(vectors: Vec<Vec<f32>>) -> EmbeddingSet {
    EmbeddingSet::new(vectors).unwrap()
}

fn texts(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("chunk text number {}", i)).collect()
}

/// 0 and 1 at cosine 0.9, 2 near-orthogonal to both.
fn scenario_a() -> VizSession {
    let embeddings = set(vec![
        vec![1.0, 0.0, 0.0],
        vec![0.9, 0.19f32.sqrt(), 0.0],
        vec![0.1, 0.0, 0.99f32.sqrt()],
    ]);
    VizSession::new(texts(3), embeddings).unwrap()
}

/// `n` vectors with every pairwise cosine exactly 0.5.
fn star(n: usize) -> EmbeddingSet {
    let vectors = (0..n)
        .map(|i| {
            let mut v = vec![0.0f32; n + 1];
            v[0] = 1.0;
            v[i + 1] = 1.0;
            v
        })
        .collect();
    set(vectors)
}

fn config_with(k: usize, threshold: f64, algorithm: LayoutAlgorithm) -> VizConfig {
    VizConfig {
        neighbors: NeighborParams { k, threshold },
        layout: LayoutParams { algorithm, ..LayoutParams::default() },
        ..VizConfig::default()
    }
}

/// Keeps the first two components of every vector.
struct FirstTwo;

impl DimensionalityReducer for FirstTwo {
    fn reduce(&self, embeddings: &EmbeddingSet, target_dimensions: usize) -> Result<Vec<Vec<f64>>> {
        Ok(embeddings
            .iter()
            .map(|v| v.iter().take(target_dimensions).map(|&x| x as f64).collect())
            .collect())
    }
}

struct Failing;

impl DimensionalityReducer for Failing {
    fn reduce(&self, _: &EmbeddingSet, _: usize) -> Result<Vec<Vec<f64>>> {
        Err(VizError::Provider("reducer offline".into()))
    }
}

struct DropsOne;

impl DimensionalityReducer for DropsOne {
    fn reduce(&self, embeddings: &EmbeddingSet, _: usize) -> Result<Vec<Vec<f64>>> {
        Ok(vec![vec![0.0, 0.0]; embeddings.len().saturating_sub(1)])
    }
}

#[test]
fn test_single_strong_pair() {
    let viz = visualize_network(&scenario_a(), &config_with(5, 0.3, LayoutAlgorithm::Spring)).unwrap();

    assert_eq!(viz.scene.edges.len(), 1);
    assert_eq!((viz.scene.edges[0].source, viz.scene.edges[0].target), (0, 1));
    assert!((viz.scene.edges[0].weight - 0.9).abs() < 1e-6);
    assert_eq!(viz.stats.node_count, 3);
    assert_eq!(viz.stats.isolated_nodes, 1);
    assert!(viz.scene.node(2).unwrap().hover_text.ends_with("No close neighbors"));
}

#[test]
fn test_single_chunk() {
    let session = VizSession::new(texts(1), set(vec![vec![0.3, 0.4]])).unwrap();
    for algorithm in LayoutAlgorithm::ALL {
        let viz = visualize_network(&session, &config_with(5, 0.3, algorithm)).unwrap();
        assert_eq!(viz.scene.nodes.len(), 1);
        assert!(viz.scene.edges.is_empty());
        assert_eq!(viz.scene.nodes[0].position, crate::layout::Point::ORIGIN);
    }
}

#[test]
fn test_uniform_similarity_complete_graph() {
    let session = VizSession::new(vec![], star(4)).unwrap();
    let config = config_with(5, 0.5, LayoutAlgorithm::Circular);
    let viz = visualize_network(&session, &config).unwrap();

    assert_eq!(viz.scene.edges.len(), 6);
    assert_eq!(viz.stats.edge_count, 6);
    let style = &config.network_style;
    for e in &viz.scene.edges {
        assert_eq!(e.weight, 0.5);
        assert!((e.width - style.edge_width.lerp(0.5)).abs() < 1e-12);
        assert!((e.opacity - style.edge_opacity.lerp(0.5)).abs() < 1e-12);
    }
}

#[test]
fn test_retrieved_and_query_marker() {
    let session = scenario_a()
        .with_retrieval(vec![RetrievalHit::new(1, "chunk text number 1", 0.2)], None)
        .with_query_text("which chunk?");
    let viz = visualize_network(&session, &VizConfig::default()).unwrap();

    assert_eq!(viz.scene.node(1).unwrap().category, NodeCategory::Retrieved);
    assert_eq!(viz.scene.nodes_in(NodeCategory::Retrieved).count(), 1);
    assert_eq!(viz.scene.nodes_in(NodeCategory::Query).count(), 1);

    // A single hit puts the marker on the retrieved node
    let query = viz.scene.query_node().unwrap();
    assert!(query.position.distance(&viz.scene.node(1).unwrap().position) < 1e-9);
    assert!(query.hover_text.contains("which chunk?"));
}

#[test]
fn test_no_hits_no_query_marker() {
    let viz = visualize_network(&scenario_a(), &VizConfig::default()).unwrap();
    assert!(viz.scene.query_node().is_none());
    assert_eq!(viz.scene.nodes.len(), 3);
}

#[test]
fn test_stale_hits_are_ignored() {
    let session = scenario_a().with_retrieval(vec![RetrievalHit::new(9, "", 0.1)], None);
    let viz = visualize_network(&session, &VizConfig::default()).unwrap();
    assert_eq!(viz.scene.nodes_in(NodeCategory::Retrieved).count(), 0);
    assert!(viz.scene.query_node().is_none());
}

#[test]
fn test_same_seed_same_scene() {
    let session = VizSession::new(texts(6), star(6)).unwrap();
    for algorithm in LayoutAlgorithm::ALL {
        let config = config_with(3, 0.2, algorithm);
        let a = visualize_network(&session, &config).unwrap();
        let b = visualize_network(&session, &config).unwrap();
        assert_eq!(a, b, "{} not reproducible", algorithm);
    }
}

#[test]
fn test_empty_session() {
    let viz = visualize_network(&VizSession::default(), &VizConfig::default()).unwrap();
    assert!(viz.scene.is_empty());
    assert_eq!(viz.scene.title, SceneStyle::network().title);
    assert_eq!(viz.stats.node_count, 0);

    let viz = visualize_scatter(&VizSession::default(), &FirstTwo, &VizConfig::default()).unwrap();
    assert!(viz.scene.is_empty());
}

#[test]
fn test_invalid_parameters_rejected() {
    let session = scenario_a();
    for config in [
        config_with(0, 0.3, LayoutAlgorithm::Spring),
        config_with(5, 1.5, LayoutAlgorithm::Spring),
        config_with(5, -1.01, LayoutAlgorithm::Spring),
    ] {
        assert!(matches!(
            visualize_network(&session, &config),
            Err(VizError::InvalidParameter(_))
        ));
    }
}

#[test]
fn test_scatter_uses_projection_and_query() {
    let session = scenario_a().with_retrieval(
        vec![RetrievalHit::new(0, "", 0.05)],
        Some(vec![0.5, 0.5, 0.0]),
    );
    let viz = visualize_scatter(&session, &FirstTwo, &VizConfig::default()).unwrap();

    assert_eq!(viz.scene.title, SceneStyle::scatter().title);
    assert_eq!(viz.scene.node(0).unwrap().position, crate::layout::Point::new(1.0, 0.0));
    assert_eq!(viz.scene.node(0).unwrap().category, NodeCategory::Retrieved);
    assert_eq!(viz.scene.query_node().unwrap().position, crate::layout::Point::new(0.5, 0.5));

    // Absolute encoding: width follows the raw similarity
    let edge = &viz.scene.edges[0];
    let style = SceneStyle::scatter();
    assert!((edge.width - style.edge_width.lerp(edge.weight)).abs() < 1e-12);
}

#[test]
fn test_scatter_reducer_failures() {
    let session = scenario_a();
    assert_eq!(
        visualize_scatter(&session, &Failing, &VizConfig::default()),
        Err(VizError::Provider("reducer offline".into()))
    );
    assert!(matches!(
        visualize_scatter(&session, &DropsOne, &VizConfig::default()),
        Err(VizError::Provider(_))
    ));
}

#[test]
fn test_session_from_provider() {
    let provider = |chunks: &[String]| -> Result<EmbeddingSet> {
        EmbeddingSet::new(chunks.iter().map(|c| vec![c.len() as f32, 1.0]).collect())
    };
    let session = VizSession::from_provider(&provider, texts(4)).unwrap();
    assert_eq!(session.len(), 4);

    let broken = |_: &[String]| -> Result<EmbeddingSet> { Err(VizError::Provider("no model".into())) };
    assert!(matches!(
        VizSession::from_provider(&broken, texts(2)),
        Err(VizError::Provider(_))
    ));
}
