//! Graph + layout + selection → Scene.

use std::collections::BTreeSet;

use super::hover::{node_hover, query_hover};
use super::{EdgeVisual, NodeCategory, NodeVisual, Scene};
use crate::config::{EdgeEncoding, NodeStyle, SceneStyle};
use crate::error::{Result, VizError};
use crate::graph::SemanticGraph;
use crate::layout::{Layout, Point};
use crate::similarity::NeighborList;

/// Normalized value used when every edge has the same weight.
const MIDPOINT: f64 = 0.5;

/// Builds scenes under one style. Chunk texts and neighbor lists are only
/// used for hover text and are optional.
pub struct SceneEncoder<'a> {
    style: &'a SceneStyle,
    chunks: &'a [String],
    neighbors: Option<&'a NeighborList>,
    query_text: Option<&'a str>,
}

impl<'a> SceneEncoder<'a> {
    pub fn new(style: &'a SceneStyle) -> Self {
        Self {
            style,
            chunks: &[],
            neighbors: None,
            query_text: None,
        }
    }

    pub fn with_chunks(mut self, chunks: &'a [String]) -> Self {
        self.chunks = chunks;
        self
    }

    pub fn with_neighbors(mut self, neighbors: &'a NeighborList) -> Self {
        self.neighbors = Some(neighbors);
        self
    }

    pub fn with_query_text(mut self, text: &'a str) -> Self {
        self.query_text = Some(text);
        self
    }

    fn node_style(&self, category: NodeCategory) -> &NodeStyle {
        match category {
            NodeCategory::Query => &self.style.query,
            NodeCategory::Retrieved => &self.style.retrieved,
            NodeCategory::Regular => &self.style.regular,
        }
    }

    /// Encode one scene.
    ///
    /// `layout` must hold one position per graph node. Selection indices
    /// outside the graph are ignored. The query marker, if any, is the last
    /// node.
    pub fn encode(
        &self,
        graph: &SemanticGraph,
        layout: &Layout,
        selection: &BTreeSet<usize>,
        query: Option<Point>,
    ) -> Result<Scene> {
        let n = graph.node_count();
        if layout.len() != n {
            return Err(VizError::ShapeMismatch {
                index: 0,
                expected: n,
                got: layout.len(),
            });
        }

        let out_of_range = selection.iter().filter(|&&i| i >= n).count();
        if out_of_range > 0 {
            tracing::warn!(out_of_range, nodes = n, "selection indices outside graph ignored");
        }

        let mut nodes: Vec<NodeVisual> = layout
            .positions()
            .iter()
            .enumerate()
            .map(|(i, &position)| {
                let category = if selection.contains(&i) {
                    NodeCategory::Retrieved
                } else {
                    NodeCategory::Regular
                };
                let neighbors = self.neighbors.map(|nl| nl.get(i)).unwrap_or(&[]);
                self.node(Some(i), format!("C{}", i), position, category, node_hover(i, self.chunks, neighbors, self.style))
            })
            .collect();

        if let Some(position) = query {
            nodes.push(self.node(
                None,
                "Q".to_string(),
                position,
                NodeCategory::Query,
                query_hover(self.query_text, self.style),
            ));
        }

        let edges = self.encode_edges(graph, layout);

        tracing::debug!(nodes = nodes.len(), edges = edges.len(), "scene encoded");

        Ok(Scene {
            title: self.style.title.clone(),
            nodes,
            edges,
        })
    }

    fn node(
        &self,
        index: Option<usize>,
        label: String,
        position: Point,
        category: NodeCategory,
        hover_text: String,
    ) -> NodeVisual {
        let style = self.node_style(category);
        NodeVisual {
            index,
            label,
            position,
            category,
            color: style.color.clone(),
            size: style.size,
            opacity: style.opacity,
            hover_text,
        }
    }

    fn encode_edges(&self, graph: &SemanticGraph, layout: &Layout) -> Vec<EdgeVisual> {
        let edges = graph.edges();
        let (min_w, max_w) = edges.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), e| {
            (lo.min(e.weight), hi.max(e.weight))
        });
        let range = max_w - min_w;
        let (r, g, b) = self.style.edge_rgb;

        edges
            .into_iter()
            .map(|e| {
                let t = match self.style.edge_encoding {
                    EdgeEncoding::Normalized if range > 0.0 => (e.weight - min_w) / range,
                    EdgeEncoding::Normalized => MIDPOINT,
                    EdgeEncoding::Absolute => e.weight.clamp(0.0, 1.0),
                };
                let width = self.style.edge_width.lerp(t);
                let opacity = self.style.edge_opacity.lerp(t);

                EdgeVisual {
                    source: e.source,
                    target: e.target,
                    from: layout.get(e.source).unwrap_or_default(),
                    to: layout.get(e.target).unwrap_or_default(),
                    weight: e.weight,
                    width,
                    opacity,
                    color: format!("rgba({}, {}, {}, {:.3})", r, g, b, opacity),
                }
            })
            .collect()
    }
}
