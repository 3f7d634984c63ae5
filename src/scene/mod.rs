//! Scene - render-ready nodes and edges
//!
//! The scene is the only thing handed to the render surface. It is derived
//! from a graph, a layout, the retrieved selection and an optional query
//! marker, and carries every visual channel precomputed.

mod encoder;
mod hover;

pub use encoder::SceneEncoder;
pub use hover::{node_hover, query_hover, truncate_preview};

use serde::{Deserialize, Serialize};

use crate::layout::Point;

/// Colour category of a node. Checked in priority order query, retrieved,
/// regular.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeCategory {
    Regular,
    Retrieved,
    Query,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeVisual {
    /// Chunk index; `None` for the query marker.
    pub index: Option<usize>,
    /// Short on-canvas label: `C{i}` or `Q`.
    pub label: String,
    pub position: Point,
    pub category: NodeCategory,
    pub color: String,
    pub size: f64,
    pub opacity: f64,
    pub hover_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeVisual {
    pub source: usize,
    pub target: usize,
    pub from: Point,
    pub to: Point,
    pub weight: f64,
    pub width: f64,
    pub opacity: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scene {
    pub title: String,
    pub nodes: Vec<NodeVisual>,
    pub edges: Vec<EdgeVisual>,
}

impl Scene {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn query_node(&self) -> Option<&NodeVisual> {
        self.nodes.iter().find(|n| n.category == NodeCategory::Query)
    }

    pub fn nodes_in(&self, category: NodeCategory) -> impl Iterator<Item = &NodeVisual> {
        self.nodes.iter().filter(move |n| n.category == category)
    }

    pub fn node(&self, index: usize) -> Option<&NodeVisual> {
        self.nodes.iter().find(|n| n.index == Some(index))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
