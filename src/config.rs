//! Configuration types and defaults for the visualization core
//!
//! Every struct deserializes with `#[serde(default)]`, so a JSON document
//! only needs the fields it overrides. Scene styles are laid over their own
//! preset, nested objects included.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{Result, VizError};
use crate::layout::LayoutAlgorithm;
use crate::similarity::validate_params;

// =============================================================================
// Neighbor Parameters
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeighborParams {
    /// Neighbors kept per chunk before thresholding. Default: 5
    pub k: usize,
    /// Minimum similarity for a neighbor. Default: 0.3
    pub threshold: f64,
}

impl Default for NeighborParams {
    fn default() -> Self {
        Self { k: 5, threshold: 0.3 }
    }
}

// =============================================================================
// Layout Parameters
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Default: spring
    pub algorithm: LayoutAlgorithm,
    /// Seed for the spring layout's initial positions. Default: 42
    pub seed: u64,
    /// Half-width of the output bounding box. Default: 500.0
    pub scale: f64,
    /// Optimal node distance for the spring layout; `None` uses 1/sqrt(N). Default: 2.0
    pub spring_distance: Option<f64>,
    /// Default: 50
    pub spring_iterations: usize,
    /// Iteration cap for the energy solver. Default: 500
    pub energy_max_iterations: usize,
    /// Gradient norm under which the energy solver stops. Default: 1e-6
    pub energy_tolerance: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            algorithm: LayoutAlgorithm::Spring,
            seed: 42,
            scale: 500.0,
            spring_distance: Some(2.0),
            spring_iterations: 50,
            energy_max_iterations: 500,
            energy_tolerance: 1e-6,
        }
    }
}

impl LayoutParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(VizError::invalid(format!("scale must be positive, got {}", self.scale)));
        }
        if let Some(k) = self.spring_distance {
            if !(k.is_finite() && k > 0.0) {
                return Err(VizError::invalid(format!(
                    "spring_distance must be positive, got {}",
                    k
                )));
            }
        }
        if self.spring_iterations == 0 {
            return Err(VizError::invalid("spring_iterations must be at least 1"));
        }
        if self.energy_max_iterations == 0 {
            return Err(VizError::invalid("energy_max_iterations must be at least 1"));
        }
        if !(self.energy_tolerance.is_finite() && self.energy_tolerance >= 0.0) {
            return Err(VizError::invalid("energy_tolerance must be a non-negative number"));
        }
        Ok(())
    }
}

// =============================================================================
// Scene Style
// =============================================================================

/// Size, opacity and colour for one node category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStyle {
    pub size: f64,
    pub opacity: f64,
    pub color: String,
}

impl NodeStyle {
    pub fn new(size: f64, opacity: f64, color: impl Into<String>) -> Self {
        Self { size, opacity, color: color.into() }
    }
}

/// Inclusive output range for a derived visual channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Linear interpolation, `t` clamped to [0, 1].
    pub fn lerp(&self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };
        self.min + (self.max - self.min) * t
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min.min(self.max) && value <= self.max.max(self.min)
    }
}

/// How edge weights map onto the width/opacity ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeEncoding {
    /// Min-max normalization over the current edge set.
    Normalized,
    /// The similarity itself (clamped to [0, 1]) drives the channel.
    Absolute,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneStyle {
    pub title: String,
    pub query: NodeStyle,
    pub retrieved: NodeStyle,
    pub regular: NodeStyle,
    pub edge_encoding: EdgeEncoding,
    pub edge_width: ValueRange,
    pub edge_opacity: ValueRange,
    /// RGB of the edge colour; opacity is appended per edge.
    pub edge_rgb: (u8, u8, u8),
    /// Characters of chunk text shown in a node's hover text. Default: 60
    pub preview_chars: usize,
    /// Characters of each neighbor's text in the hover text. Default: 40
    pub neighbor_preview_chars: usize,
    /// Neighbors listed in the hover text. Default: 3
    pub hover_neighbors: usize,
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self::network()
    }
}

impl SceneStyle {
    /// Force/energy graph view.
    pub fn network() -> Self {
        Self {
            title: "Semantic Network: Chunks Connected by Similarity".to_string(),
            query: NodeStyle::new(20.0, 1.0, "#ffd93d"),
            retrieved: NodeStyle::new(16.0, 0.9, "#ff6b6b"),
            regular: NodeStyle::new(12.0, 0.7, "#667eea"),
            edge_encoding: EdgeEncoding::Normalized,
            edge_width: ValueRange::new(1.0, 3.0),
            edge_opacity: ValueRange::new(0.2, 0.8),
            edge_rgb: (150, 150, 150),
            preview_chars: 60,
            neighbor_preview_chars: 40,
            hover_neighbors: 3,
        }
    }

    /// Projected 2D scatter with neighbor connections.
    pub fn scatter() -> Self {
        Self {
            title: "2D Embedding Space with Semantic Connections".to_string(),
            query: NodeStyle::new(15.0, 1.0, "#ffd93d"),
            retrieved: NodeStyle::new(12.0, 0.8, "#ff6b6b"),
            regular: NodeStyle::new(8.0, 0.8, "#667eea"),
            edge_encoding: EdgeEncoding::Absolute,
            edge_width: ValueRange::new(0.5, 1.5),
            edge_opacity: ValueRange::new(0.1, 0.5),
            edge_rgb: (150, 150, 150),
            preview_chars: 50,
            neighbor_preview_chars: 40,
            hover_neighbors: 3,
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    pub neighbors: NeighborParams,
    pub layout: LayoutParams,
    #[serde(deserialize_with = "network_overlay")]
    pub network_style: SceneStyle,
    #[serde(deserialize_with = "scatter_overlay")]
    pub scatter_style: SceneStyle,
}

/// Recursively copy `overrides` onto `base`; non-object values replace.
fn merge(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

fn overlay<'de, D>(preset: SceneStyle, deserializer: D) -> std::result::Result<SceneStyle, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = Value::deserialize(deserializer)?;
    if !overrides.is_object() {
        return Err(D::Error::custom("scene style must be an object"));
    }
    let mut style = serde_json::to_value(preset).map_err(D::Error::custom)?;
    merge(&mut style, overrides);
    serde_json::from_value(style).map_err(D::Error::custom)
}

fn network_overlay<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<SceneStyle, D::Error> {
    overlay(SceneStyle::network(), deserializer)
}

fn scatter_overlay<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<SceneStyle, D::Error> {
    overlay(SceneStyle::scatter(), deserializer)
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            neighbors: NeighborParams::default(),
            layout: LayoutParams::default(),
            network_style: SceneStyle::network(),
            scatter_style: SceneStyle::scatter(),
        }
    }
}

impl VizConfig {
    /// Sparse view: only the strongest relationships.
    pub fn focused() -> Self {
        Self {
            neighbors: NeighborParams { k: 3, threshold: 0.5 },
            ..Self::default()
        }
    }

    /// Dense view: broad neighborhoods, low threshold.
    pub fn comprehensive() -> Self {
        Self {
            neighbors: NeighborParams { k: 10, threshold: 0.2 },
            ..Self::default()
        }
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| VizError::invalid(format!("config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_params(self.neighbors.k, self.neighbors.threshold)?;
        self.layout.validate()
    }
}
